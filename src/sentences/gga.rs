//! GGA: time, fix position and quality, geoid height and DGPS age/ID.

use alloc::string::String;
use core::fmt::Write as _;

use crate::error::Error;
use crate::info::{Info, Sig};
use crate::mask::{Field, PresenceMask};
use crate::time::Time;
use crate::validate::valid_sig;

use super::utils::{fields, parse_char, parse_f64, parse_signed_ndeg, parse_time, parse_u32};

const FIELD_COUNT: usize = 14;

/// A decoded GGA packet.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GgaData {
    pub present: PresenceMask,
    pub time: Time,
    pub lat: f64,
    pub lon: f64,
    pub sig: Sig,
    pub sat_in_use_count: u32,
    pub hdop: f64,
    pub elv: f64,
    pub height: f64,
    pub dgps_age: f64,
    pub dgps_sid: u32,
}

pub fn parse(data: &str) -> Result<GgaData, Error<'_>> {
    let f: alloc::vec::Vec<&str> = fields(data).collect();
    if f.len() != FIELD_COUNT {
        return Err(Error::FieldCount { expected: FIELD_COUNT, found: f.len() });
    }

    let mut pkt = GgaData::default();

    if let Some((hour, min, sec, hundredths)) = parse_time(f[0])? {
        pkt.time = Time { hour, min, sec, hundredths, ..Time::default() };
        pkt.present.insert(Field::UtcTime);
    }

    if let Some(lat) = parse_signed_ndeg(f[1], f[2], 'N')? {
        pkt.lat = lat;
        pkt.present.insert(Field::Lat);
    }
    if let Some(lon) = parse_signed_ndeg(f[3], f[4], 'E')? {
        pkt.lon = lon;
        pkt.present.insert(Field::Lon);
    }

    if let Some(n) = parse_u32(f[5])? {
        // GGA's quality indicator is a digit 0-8, not the GSA/RMC letter code.
        let sig = digit_to_sig(n as u8)?;
        if !valid_sig(sig) {
            return Err(Error::InvalidField("sig"));
        }
        pkt.sig = sig;
        pkt.present.insert(Field::Sig);
    }

    if let Some(n) = parse_u32(f[6])? {
        pkt.sat_in_use_count = n;
        pkt.present.insert(Field::SatInUseCount);
    }

    if let Some(hdop) = parse_f64(f[7])? {
        pkt.hdop = hdop;
        pkt.present.insert(Field::Hdop);
    }

    if f[8].is_empty() != f[9].is_empty() {
        return Err(Error::InvalidField("elv"));
    }
    if let Some(elv) = parse_f64(f[8])? {
        if parse_char(f[9])? != Some('M') {
            return Err(Error::InvalidField("elv"));
        }
        pkt.elv = elv;
        pkt.present.insert(Field::Elv);
    }

    if f[10].is_empty() != f[11].is_empty() {
        return Err(Error::InvalidField("geoid separation"));
    }
    if let Some(height) = parse_f64(f[10])? {
        if parse_char(f[11])? != Some('M') {
            return Err(Error::InvalidField("geoid separation unit"));
        }
        pkt.height = height;
        pkt.present.insert(Field::Height);
    }

    if let Some(dgps_age) = parse_f64(f[12])? {
        pkt.dgps_age = dgps_age;
        pkt.present.insert(Field::DgpsAge);
    }
    if let Some(dgps_sid) = parse_u32(f[13])? {
        pkt.dgps_sid = dgps_sid;
        pkt.present.insert(Field::DgpsSid);
    }

    Ok(pkt)
}

fn digit_to_sig(digit: u8) -> Result<Sig, Error<'static>> {
    match digit {
        0 => Ok(Sig::Invalid),
        1 => Ok(Sig::Fix),
        2 => Ok(Sig::Differential),
        3 => Ok(Sig::Sensitive),
        4 => Ok(Sig::RtkIn),
        5 => Ok(Sig::FloatRtk),
        6 => Ok(Sig::Estimated),
        7 => Ok(Sig::Manual),
        8 => Ok(Sig::Simulation),
        _ => Err(Error::InvalidField("sig")),
    }
}

fn sig_to_digit(sig: Sig) -> u8 {
    match sig {
        Sig::Invalid => 0,
        Sig::Fix => 1,
        Sig::Differential => 2,
        Sig::Sensitive => 3,
        Sig::RtkIn => 4,
        Sig::FloatRtk => 5,
        Sig::Estimated => 6,
        Sig::Manual => 7,
        Sig::Simulation => 8,
    }
}

/// Appends a `$GPGGA,...*HH\r\n` frame projected from `info`.
pub fn generate(info: &Info, out: &mut String) {
    let mut body = String::new();
    body.push_str("GPGGA,");

    if info.present.contains(Field::UtcTime) {
        let _ = write!(body, "{:02}{:02}{:02}.{:02}", info.utc.hour, info.utc.min, info.utc.sec, info.utc.hundredths);
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

    if info.present.contains(Field::Sig) {
        let _ = write!(body, "{}", sig_to_digit(info.sig));
    }
    body.push(',');

    if info.present.contains(Field::SatInUseCount) {
        let _ = write!(body, "{}", info.sats.in_use_count);
    }
    body.push(',');

    if info.present.contains(Field::Hdop) {
        let _ = write!(body, "{:03.1}", info.hdop);
    }
    body.push(',');

    if info.present.contains(Field::Elv) {
        let _ = write!(body, "{:.1}", info.elv);
        body.push_str(",M");
    } else {
        body.push(',');
    }
    body.push(',');

    if info.present.contains(Field::Height) {
        let _ = write!(body, "{:.1}", info.height);
        body.push_str(",M");
    } else {
        body.push(',');
    }
    body.push(',');

    if info.present.contains(Field::DgpsAge) {
        let _ = write!(body, "{:.1}", info.dgps_age);
    }
    body.push(',');

    if info.present.contains(Field::DgpsSid) {
        let _ = write!(body, "{}", info.dgps_sid);
    }

    super::finish_sentence(&body, out);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_time_only_sentence() {
        let pkt = parse("104559.64,,,,,,,,,,,,,").unwrap();
        assert_eq!(pkt.time.hour, 10);
        assert_eq!(pkt.time.min, 45);
        assert_eq!(pkt.time.sec, 59);
        assert_eq!(pkt.time.hundredths, 64);
        assert!(pkt.present.contains(Field::UtcTime));
        assert!(!pkt.present.contains(Field::Lat));
    }

    #[test]
    fn rejects_wrong_field_count() {
        let err = parse("104559.64,,,").unwrap_err();
        assert!(matches!(err, Error::FieldCount { .. }));
    }

    #[test]
    fn parses_full_fix() {
        let pkt = parse("123519,4807.038,N,01131.000,E,1,08,0.9,545.4,M,46.9,M,1.2,0031").unwrap();
        assert!((pkt.lat - 4807.038).abs() < 1e-9);
        assert!((pkt.lon - 1131.000).abs() < 1e-9);
        assert_eq!(pkt.sig, Sig::Fix);
        assert_eq!(pkt.sat_in_use_count, 8);
        assert!((pkt.hdop - 0.9).abs() < 1e-9);
        assert!((pkt.elv - 545.4).abs() < 1e-9);
        assert!((pkt.height - 46.9).abs() < 1e-9);
        assert!(pkt.present.contains(Field::Height));
        assert!((pkt.dgps_age - 1.2).abs() < 1e-9);
        assert!(pkt.present.contains(Field::DgpsAge));
        assert_eq!(pkt.dgps_sid, 31);
        assert!(pkt.present.contains(Field::DgpsSid));
    }

    #[test]
    fn rejects_geoid_separation_without_unit() {
        let err = parse("123519,4807.038,N,01131.000,E,1,08,0.9,545.4,M,46.9,,,").unwrap_err();
        assert!(matches!(err, Error::InvalidField("geoid separation")));
    }

    #[test]
    fn rejects_geoid_separation_with_wrong_unit_letter() {
        let err = parse("123519,4807.038,N,01131.000,E,1,08,0.9,545.4,M,46.9,X,,").unwrap_err();
        assert!(matches!(err, Error::InvalidField("geoid separation unit")));
    }
}
