//! RMC: recommended minimum position/velocity fix. Speed arrives on the
//! wire in knots; conversion to the aggregate's kph happens at merge time
//! in [`crate::Info::merge_rmc`].

use alloc::string::String;
use core::fmt::Write as _;

use crate::error::Error;
use crate::info::{Info, Sig};
use crate::mask::{Field, PresenceMask};
use crate::time::Time;
use crate::validate::valid_sig;

use super::utils::{fields, parse_char, parse_date, parse_f64, parse_signed_ndeg, parse_time};

const FIELD_COUNT_V23: usize = 12;
const FIELD_COUNT_V20: usize = 11;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RmcData {
    pub present: PresenceMask,
    pub time: Time,
    pub date: Time,
    pub sig: Sig,
    pub lat: f64,
    pub lon: f64,
    pub speed_knots: f64,
    pub track: f64,
    pub magvar: f64,
}

pub fn parse(data: &str) -> Result<RmcData, Error<'_>> {
    let f: alloc::vec::Vec<&str> = fields(data).collect();
    if f.len() != FIELD_COUNT_V23 && f.len() != FIELD_COUNT_V20 {
        return Err(Error::FieldCount { expected: FIELD_COUNT_V23, found: f.len() });
    }

    let mut pkt = RmcData::default();

    if let Some((hour, min, sec, hundredths)) = parse_time(f[0])? {
        pkt.time = Time { hour, min, sec, hundredths, ..Time::default() };
        pkt.present.insert(Field::UtcTime);
    }

    if let Some(status) = parse_char(f[1])? {
        if status != 'A' && status != 'V' {
            return Err(Error::InvalidField("status"));
        }
        pkt.sig = if status == 'A' { Sig::Fix } else { Sig::Invalid };
        if !valid_sig(pkt.sig) {
            return Err(Error::InvalidField("status"));
        }
        pkt.present.insert(Field::Sig);
    }

    if let Some(lat) = parse_signed_ndeg(f[2], f[3], 'N')? {
        pkt.lat = lat;
        pkt.present.insert(Field::Lat);
    }
    if let Some(lon) = parse_signed_ndeg(f[4], f[5], 'E')? {
        pkt.lon = lon;
        pkt.present.insert(Field::Lon);
    }

    if let Some(speed) = parse_f64(f[6])? {
        pkt.speed_knots = speed;
        pkt.present.insert(Field::Speed);
    }
    if let Some(track) = parse_f64(f[7])? {
        pkt.track = track;
        pkt.present.insert(Field::Track);
    }

    if let Some((year, month, day)) = parse_date(f[8])? {
        pkt.date = Time { year, month, day, ..Time::default() };
        pkt.present.insert(Field::UtcDate);
    }

    if let Some(magvar) = parse_signed_ndeg(f[9], f[10], 'E')? {
        pkt.magvar = magvar;
        pkt.present.insert(Field::Magvar);
    }

    if f.len() == FIELD_COUNT_V23 {
        if let Some(mode) = parse_char(f[11])? {
            if !crate::validate::valid_mode(mode) {
                return Err(Error::InvalidField("mode"));
            }
        }
    }

    Ok(pkt)
}

/// Appends a `$GPRMC,...*HH\r\n` frame projected from `info`.
pub fn generate(info: &Info, out: &mut String) {
    let mut body = String::new();
    body.push_str("GPRMC,");

    if info.present.contains(Field::UtcTime) {
        let _ = write!(body, "{:02}{:02}{:02}.{:02}", info.utc.hour, info.utc.min, info.utc.sec, info.utc.hundredths);
    }
    body.push(',');

    if info.present.contains(Field::Sig) {
        body.push(if info.sig != Sig::Invalid { 'A' } else { 'V' });
    }
    body.push(',');

    if info.present.contains(Field::Lat) {
        let _ = write!(body, "{:09.4}", info.lat.abs());
        body.push(',');
        body.push(if info.lat < 0.0 { 'S' } else { 'N' });
    } else {
        body.push(',');
    }
    body.push(',');

    if info.present.contains(Field::Lon) {
        let _ = write!(body, "{:010.4}", info.lon.abs());
        body.push(',');
        body.push(if info.lon < 0.0 { 'W' } else { 'E' });
    } else {
        body.push(',');
    }
    body.push(',');

    if info.present.contains(Field::Speed) {
        let _ = write!(body, "{:03.1}", info.speed / 1.852);
    }
    body.push(',');

    if info.present.contains(Field::Track) {
        let _ = write!(body, "{:03.1}", info.track);
    }
    body.push(',');

    if info.present.contains(Field::UtcDate) {
        let _ = write!(body, "{:02}{:02}{:02}", info.utc.day, info.utc.month, info.utc.year % 100);
    }
    body.push(',');

    if info.present.contains(Field::Magvar) {
        let _ = write!(body, "{:03.1}", info.magvar.abs());
        body.push(',');
        body.push(if info.magvar < 0.0 { 'W' } else { 'E' });
    } else {
        body.push(',');
    }
    body.push_str(",A");

    super::finish_sentence(&body, out);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn knots_field_survives_parse_unconverted() {
        let pkt = parse(",A,,,,,10.000,,,,,A").unwrap();
        assert!((pkt.speed_knots - 10.0).abs() < 1e-9);
        assert_eq!(pkt.sig, Sig::Fix);
    }

    #[test]
    fn void_status_is_invalid_sig() {
        let pkt = parse(",V,,,,,,,,,,").unwrap();
        assert_eq!(pkt.sig, Sig::Invalid);
    }

    #[test]
    fn accepts_pre_v23_sentence_without_mode() {
        let pkt = parse(",A,,,,,10.000,,,,").unwrap();
        assert!((pkt.speed_knots - 10.0).abs() < 1e-9);
    }
}
