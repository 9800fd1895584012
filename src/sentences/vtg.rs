//! VTG: track made good and ground speed. Speed arrives in both knots and
//! kph units, each guarded by its own unit-letter field; whichever half is
//! missing is derived from the other via `1 knot = 1.852 kph`.

use alloc::string::String;
use core::fmt::Write as _;

use crate::error::Error;
use crate::info::Info;
use crate::mask::{Field, PresenceMask};

use super::utils::{fields, parse_char, parse_f64};

const FIELD_COUNT_V23: usize = 9;
const FIELD_COUNT_V20: usize = 8;

const KNOTS_PER_KPH: f64 = 1.0 / 1.852;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct VtgData {
    pub present: PresenceMask,
    pub track: f64,
    pub mtrack: f64,
    pub speed_kph: f64,
}

pub fn parse(data: &str) -> Result<VtgData, Error<'_>> {
    let f: alloc::vec::Vec<&str> = fields(data).collect();
    if f.len() != FIELD_COUNT_V23 && f.len() != FIELD_COUNT_V20 {
        return Err(Error::FieldCount { expected: FIELD_COUNT_V23, found: f.len() });
    }

    let mut pkt = VtgData::default();

    if let Some(track) = parse_unit_guarded(f[0], f[1], 'T')? {
        pkt.track = track;
        pkt.present.insert(Field::Track);
    }

    if let Some(mtrack) = parse_unit_guarded(f[2], f[3], 'M')? {
        pkt.mtrack = mtrack;
        pkt.present.insert(Field::Mtrack);
    }

    let speed_knots = parse_unit_guarded(f[4], f[5], 'N')?;
    let speed_kph = parse_unit_guarded(f[6], f[7], 'K')?;

    match (speed_knots, speed_kph) {
        (Some(knots), Some(kph)) => {
            pkt.speed_kph = kph;
            let _ = knots;
            pkt.present.insert(Field::Speed);
        }
        (Some(knots), None) => {
            pkt.speed_kph = knots * 1.852;
            pkt.present.insert(Field::Speed);
        }
        (None, Some(kph)) => {
            pkt.speed_kph = kph;
            pkt.present.insert(Field::Speed);
        }
        (None, None) => {}
    }

    if f.len() == FIELD_COUNT_V23 {
        if let Some(mode) = parse_char(f[8])? {
            if !crate::validate::valid_mode(mode) {
                return Err(Error::InvalidField("mode"));
            }
        }
    }

    Ok(pkt)
}

fn parse_unit_guarded<'a>(value: &'a str, unit: &'a str, expected: char) -> Result<Option<f64>, Error<'a>> {
    if value.is_empty() && unit.is_empty() {
        return Ok(None);
    }
    if value.is_empty() || unit.is_empty() {
        return Err(Error::InvalidField("unit"));
    }
    let parsed = parse_f64(value)?.ok_or(Error::InvalidField("value"))?;
    let actual = parse_char(unit)?.ok_or(Error::InvalidField("unit"))?;
    if actual != expected {
        return Err(Error::InvalidField("unit"));
    }
    Ok(Some(parsed))
}

/// Appends a `$GPVTG,...*HH\r\n` frame projected from `info`. Always emits
/// both speed units, derived from the aggregate's single kph value.
pub fn generate(info: &Info, out: &mut String) {
    let mut body = String::new();
    body.push_str("GPVTG,");

    if info.present.contains(Field::Track) {
        let _ = write!(body, "{:03.1},T", info.track);
    } else {
        body.push(',');
    }
    body.push(',');

    if info.present.contains(Field::Mtrack) {
        let _ = write!(body, "{:03.1},M", info.mtrack);
    } else {
        body.push(',');
    }
    body.push(',');

    if info.present.contains(Field::Speed) {
        let _ = write!(body, "{:03.1},N", info.speed * KNOTS_PER_KPH);
        body.push(',');
        let _ = write!(body, "{:03.1},K", info.speed);
    } else {
        body.push_str(",,,");
    }

    super::finish_sentence(&body, out);
}
