//! GSV: satellites in view, arriving as a fan-out of up to four-at-a-time
//! sentences that positionally merge into one in-view table.

use alloc::string::String;
use core::fmt::Write as _;

use crate::error::Error;
use crate::info::Info;
use crate::mask::Field;
use crate::satellite::{Satellite, MAX_SATELLITES};

use super::utils::{fields, parse_f64, parse_u32};

const SATS_PER_SENTENCE: usize = 4;
const MAX_SENTENCES: u32 = (MAX_SATELLITES as u32).div_ceil(SATS_PER_SENTENCE as u32);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GsvData {
    pub sentences: u32,
    pub sentence: u32,
    pub satellites: u32,
    pub sats: [Option<Satellite>; SATS_PER_SENTENCE],
}

pub fn parse(data: &str) -> Result<GsvData, Error<'_>> {
    let f: alloc::vec::Vec<&str> = fields(data).collect();
    if f.len() < 3 {
        return Err(Error::FieldCount { expected: 3, found: f.len() });
    }
    let sat_field_count = f.len() - 3;
    if sat_field_count % 4 != 0 || sat_field_count / 4 > SATS_PER_SENTENCE {
        return Err(Error::FieldCount { expected: 3 + SATS_PER_SENTENCE * 4, found: f.len() });
    }

    let sentences = parse_u32(f[0])?.ok_or(Error::InvalidField("sentences"))?;
    let sentence = parse_u32(f[1])?.ok_or(Error::InvalidField("sentence"))?;
    let satellites = parse_u32(f[2])?.ok_or(Error::InvalidField("satellites"))?;

    if sentences < 1 || sentences > MAX_SENTENCES {
        return Err(Error::GsvSequencing);
    }
    if sentence < 1 || sentence > sentences {
        return Err(Error::GsvSequencing);
    }
    if satellites as usize > MAX_SATELLITES {
        return Err(Error::GsvSequencing);
    }
    if sentences != (satellites as u32).div_ceil(SATS_PER_SENTENCE as u32).max(1) {
        return Err(Error::GsvSequencing);
    }

    let mut sats = [None; SATS_PER_SENTENCE];
    for (i, chunk) in f[3..].chunks(4).enumerate() {
        let [prn, elv, azimuth, snr] = chunk else {
            return Err(Error::FieldCount { expected: 4, found: chunk.len() });
        };
        let Some(prn) = parse_u32(prn)? else {
            continue;
        };
        if prn == 0 {
            continue;
        }
        let elevation = parse_f64(elv)?.unwrap_or(0.0);
        let azimuth = parse_f64(azimuth)?.unwrap_or(0.0);
        let snr = parse_f64(snr)?.unwrap_or(0.0);
        sats[i] = Some(Satellite { prn, elevation, azimuth, snr });
    }

    Ok(GsvData { sentences, sentence, satellites, sats })
}

/// Appends `ceil(inViewCount / 4)` (at least one) `$GPGSV,...*HH\r\n` frames
/// projected from `info`.
pub fn generate(info: &Info, out: &mut String) {
    if !info.present.contains(Field::SatInView) && !info.present.contains(Field::SatInViewCount) {
        return;
    }
    let in_view = &info.sats.in_view[..info.sats.in_view_count.min(MAX_SATELLITES)];
    let total_sentences = (in_view.len() as u32).div_ceil(SATS_PER_SENTENCE as u32).max(1);

    for sentence_idx in 0..total_sentences {
        let mut body = String::new();
        let _ = write!(body, "GPGSV,{},{},{:02}", total_sentences, sentence_idx + 1, in_view.len());

        let start = sentence_idx as usize * SATS_PER_SENTENCE;
        for slot in 0..SATS_PER_SENTENCE {
            body.push(',');
            match in_view.get(start + slot) {
                Some(sat) if sat.prn != 0 => {
                    let _ = write!(body, "{:02}", sat.prn);
                    let _ = write!(body, ",{:02.0}", sat.elevation);
                    let _ = write!(body, ",{:03.0}", sat.azimuth);
                    let _ = write!(body, ",{:02.0}", sat.snr);
                }
                _ => body.push_str(",,,"),
            }
        }

        super::finish_sentence(&body, out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_four_satellite_block() {
        let pkt = parse("2,1,05,01,10,020,30,02,15,050,40,03,20,080,35,04,25,110,25").unwrap();
        assert_eq!(pkt.sentences, 2);
        assert_eq!(pkt.sentence, 1);
        assert_eq!(pkt.satellites, 5);
        assert_eq!(pkt.sats[0].unwrap().prn, 1);
        assert_eq!(pkt.sats[3].unwrap().prn, 4);
    }

    #[test]
    fn rejects_inconsistent_sentence_count() {
        let err = parse("1,1,05,01,10,020,30,,,,,,,,,,,,,").unwrap_err();
        assert!(matches!(err, Error::GsvSequencing));
    }

    #[test]
    fn skips_zero_prn_slots() {
        let pkt = parse("2,2,05,05,30,140,20,,,,,,,,,,,,,").unwrap();
        assert!(pkt.sats[0].is_some());
        assert!(pkt.sats[1].is_none());
    }
}
