//! GSA: DOP and active satellites selection.

use alloc::string::String;
use core::fmt::Write as _;

use crate::error::Error;
use crate::info::{Fix, Info, Sig};
use crate::mask::{Field, PresenceMask};
use crate::validate::{valid_fix, valid_sig};

use super::utils::{fields, parse_char, parse_f64, parse_u32};

/// Classic GSA carries up to 12 satellite-in-use ID slots.
pub const GSA_MAX_SATS: usize = 12;

const FIELD_COUNT: usize = 2 + GSA_MAX_SATS + 3;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GsaData {
    pub present: PresenceMask,
    pub sig: Sig,
    pub fix: Fix,
    pub sat_in_use: [u32; GSA_MAX_SATS],
    pub pdop: f64,
    pub hdop: f64,
    pub vdop: f64,
}

impl Default for GsaData {
    fn default() -> Self {
        GsaData {
            present: PresenceMask::empty(),
            sig: Sig::Invalid,
            fix: Fix::Bad,
            sat_in_use: [0; GSA_MAX_SATS],
            pdop: 0.0,
            hdop: 0.0,
            vdop: 0.0,
        }
    }
}

pub fn parse(data: &str) -> Result<GsaData, Error<'_>> {
    let f: alloc::vec::Vec<&str> = fields(data).collect();
    if f.len() != FIELD_COUNT {
        return Err(Error::FieldCount { expected: FIELD_COUNT, found: f.len() });
    }

    let mut pkt = GsaData::default();

    let selection = match parse_char(f[0])? {
        None => None,
        Some(c) if crate::validate::valid_mode(c) => Some(c),
        Some(_) => return Err(Error::InvalidField("selection")),
    };

    let fix = match parse_u32(f[1])? {
        None => None,
        Some(digit) => {
            let fix = match digit {
                1 => Fix::Bad,
                2 => Fix::Fix2D,
                3 => Fix::Fix3D,
                _ => return Err(Error::InvalidField("fix")),
            };
            if !valid_fix(fix) {
                return Err(Error::InvalidField("fix"));
            }
            pkt.fix = fix;
            pkt.present.insert(Field::Fix);
            Some(fix)
        }
    };

    if let Some(selection) = selection {
        pkt.sig = match selection {
            'M' => Sig::Manual,
            'A' => {
                if fix.is_some() {
                    Sig::Fix
                } else {
                    Sig::Invalid
                }
            }
            _ => Sig::Invalid,
        };
        if !valid_sig(pkt.sig) {
            return Err(Error::InvalidField("sig"));
        }
        pkt.present.insert(Field::Sig);
    }

    let mut any_sat = false;
    for (slot, field) in pkt.sat_in_use.iter_mut().zip(f[2..2 + GSA_MAX_SATS].iter()) {
        let Some(prn) = parse_u32(field)? else {
            continue;
        };
        *slot = prn;
        any_sat = true;
    }
    if any_sat {
        pkt.sat_in_use.sort_unstable_by(|a, b| match (*a == 0, *b == 0) {
            (false, false) => a.cmp(b),
            (true, true) => core::cmp::Ordering::Equal,
            (true, false) => core::cmp::Ordering::Greater,
            (false, true) => core::cmp::Ordering::Less,
        });
        pkt.present.insert(Field::SatInUse);
    }

    let dop_base = 2 + GSA_MAX_SATS;
    if let Some(pdop) = parse_f64(f[dop_base])? {
        pkt.pdop = pdop;
        pkt.present.insert(Field::Pdop);
    }
    if let Some(hdop) = parse_f64(f[dop_base + 1])? {
        pkt.hdop = hdop;
        pkt.present.insert(Field::Hdop);
    }
    if let Some(vdop) = parse_f64(f[dop_base + 2])? {
        pkt.vdop = vdop;
        pkt.present.insert(Field::Vdop);
    }

    Ok(pkt)
}

/// Appends a `$GPGSA,...*HH\r\n` frame projected from `info`.
pub fn generate(info: &Info, out: &mut String) {
    let mut body = String::new();
    body.push_str("GPGSA,");

    if info.present.contains(Field::Sig) {
        body.push(if info.sig == Sig::Manual { 'M' } else { 'A' });
    }
    body.push(',');

    if info.present.contains(Field::Fix) {
        let digit = match info.fix {
            Fix::Bad => '1',
            Fix::Fix2D => '2',
            Fix::Fix3D => '3',
        };
        body.push(digit);
    }
    body.push(',');

    for (i, prn) in info.sats.in_use.iter().take(GSA_MAX_SATS).enumerate() {
        if *prn != 0 {
            let _ = write!(body, "{prn}");
        }
        if i + 1 < GSA_MAX_SATS {
            body.push(',');
        }
    }
    body.push(',');

    if info.present.contains(Field::Pdop) {
        let _ = write!(body, "{:03.1}", info.pdop);
    }
    body.push(',');
    if info.present.contains(Field::Hdop) {
        let _ = write!(body, "{:03.1}", info.hdop);
    }
    body.push(',');
    if info.present.contains(Field::Vdop) {
        let _ = write!(body, "{:03.1}", info.vdop);
    }

    super::finish_sentence(&body, out);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_sentence() {
        let pkt = parse("A,3,04,05,,09,12,,,24,,,,,2.5,1.3,2.1").unwrap();
        assert_eq!(pkt.fix, Fix::Fix3D);
        assert_eq!(pkt.sig, Sig::Fix);
        assert!(pkt.sat_in_use.contains(&4));
        assert!(pkt.sat_in_use.contains(&24));
        assert!((pkt.pdop - 2.5).abs() < 1e-9);
        assert!((pkt.hdop - 1.3).abs() < 1e-9);
        assert!((pkt.vdop - 2.1).abs() < 1e-9);
    }

    #[test]
    fn manual_selection_is_manual_regardless_of_fix() {
        let pkt = parse("M,1,,,,,,,,,,,,,,,").unwrap();
        assert_eq!(pkt.sig, Sig::Manual);
    }

    #[test]
    fn auto_selection_without_fix_is_invalid() {
        let pkt = parse("A,,,,,,,,,,,,,,,,").unwrap();
        assert_eq!(pkt.sig, Sig::Invalid);
    }
}
