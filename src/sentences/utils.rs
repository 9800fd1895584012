//! Shared field-parsing helpers used by every sentence parser: NMEA
//! time/date, signed NDEG lat/lon, and the empty-field-as-absence
//! convention the field tables rely on.
//!
//! Lat/lon are kept as the raw signed NDEG value rather than decimal
//! degrees — the wire token `4807.038` already *is* the NDEG value, no
//! degree/minute split is needed until [`crate::Info::unit_conversion`]
//! actually changes representation.

use nom::bytes::complete::take;
use nom::character::complete::digit1;
use nom::combinator::{all_consuming, map_res};
use nom::number::complete::double;
use nom::{IResult, Parser as _};

use crate::error::Error;
use crate::time::Time;

/// Splits a sentence's data portion (after the `XXYYY,` header) into its
/// comma-separated fields. An empty field yields `""`, never `None` — the
/// caller decides whether an empty token means "absent".
pub fn fields(data: &str) -> impl Iterator<Item = &str> {
    data.split(',')
}

fn two_digit(i: &str) -> IResult<&str, u8> {
    map_res(take(2usize), str::parse::<u8>).parse(i)
}

fn take_char(i: &str) -> IResult<&str, char> {
    map_res(take(1usize), |s: &str| s.chars().next().ok_or("missing char")).parse(i)
}

/// Parses `HHMMSS[.h[h]]` into hour/min/sec/hundredths. Returns `None` for
/// an empty field (absence, not error).
pub fn parse_time(field: &str) -> Result<Option<(u8, u8, u8, u8)>, Error<'_>> {
    if field.is_empty() {
        return Ok(None);
    }
    let (_, (hour, min, sec_f)) = all_consuming((two_digit, two_digit, double)).parse(field)?;
    let sec = sec_f.trunc() as u8;
    let hundredths = (sec_f.fract() * 100.0).round() as u8;
    if !crate::validate::valid_time(hour, min, sec, hundredths) {
        return Err(Error::InvalidField("time"));
    }
    Ok(Some((hour, min, sec, hundredths)))
}

/// Parses `DDMMYY` into a full calendar year/month/day. Returns `None` for
/// an empty field.
pub fn parse_date(field: &str) -> Result<Option<(u16, u8, u8)>, Error<'_>> {
    if field.is_empty() {
        return Ok(None);
    }
    let (_, (day, month, two_digit_year)) = all_consuming((two_digit, two_digit, two_digit)).parse(field)?;
    let year = Time::expand_year(two_digit_year);
    if !crate::validate::valid_date(year, month, day) {
        return Err(Error::InvalidField("date"));
    }
    Ok(Some((year, month, day)))
}

/// Parses a raw NDEG magnitude field together with its hemisphere letter
/// into a signed NDEG value, e.g. `("4807.038", "N") -> 4807.038` and
/// `("4807.038", "S") -> -4807.038`. Returns `None` if either half is empty.
///
/// `positive` is `'N'` for a lat field (hemisphere validated against
/// [`crate::validate::valid_ns`]) or `'E'` for a lon field (validated
/// against [`crate::validate::valid_ew`]); any other hemisphere letter is
/// rejected rather than silently treated as negative.
pub fn parse_signed_ndeg<'a>(magnitude: &'a str, hemisphere: &'a str, positive: char) -> Result<Option<f64>, Error<'a>> {
    if magnitude.is_empty() && hemisphere.is_empty() {
        return Ok(None);
    }
    if magnitude.is_empty() || hemisphere.is_empty() {
        return Err(Error::InvalidField("lat/lon"));
    }
    let (_, value) = all_consuming(double).parse(magnitude)?;
    let (_, hemi) = all_consuming(take_char).parse(hemisphere)?;

    let valid = if positive.eq_ignore_ascii_case(&'N') {
        crate::validate::valid_ns(hemi)
    } else {
        crate::validate::valid_ew(hemi)
    };
    if !valid {
        return Err(Error::InvalidField("hemisphere"));
    }

    let sign = if hemi.to_ascii_uppercase() == positive.to_ascii_uppercase() { 1.0 } else { -1.0 };
    Ok(Some(sign * value))
}

/// Parses an optional floating-point field, `None` when empty.
pub fn parse_f64(field: &str) -> Result<Option<f64>, Error<'_>> {
    if field.is_empty() {
        return Ok(None);
    }
    let (_, value) = all_consuming(double).parse(field)?;
    Ok(Some(value))
}

/// Parses an optional unsigned integer field, `None` when empty.
pub fn parse_u32(field: &str) -> Result<Option<u32>, Error<'_>> {
    if field.is_empty() {
        return Ok(None);
    }
    let (_, value) = all_consuming(map_res(digit1, str::parse::<u32>)).parse(field)?;
    Ok(Some(value))
}

/// Parses a single non-empty character field, upper-cased.
pub fn parse_char(field: &str) -> Result<Option<char>, Error<'_>> {
    if field.is_empty() {
        return Ok(None);
    }
    let (_, c) = all_consuming(take_char).parse(field)?;
    Ok(Some(c.to_ascii_uppercase()))
}
