//! Streaming NMEA 0183 sentence parser, validator and generator.
//!
//! Feed raw bytes from a GNSS receiver into a [`frame::Parser`] and it
//! reassembles, checksums and merges GGA/GSA/GSV/RMC/VTG sentences into an
//! [`info::Info`] aggregate. The aggregate can also be driven directly (one
//! sentence at a time, via [`sentence::sentence_to_info`]) and serialized
//! back into well-formed frames with [`sentence::sentence_from_info`].
//!
//! ```
//! use nmea0183::{frame::Parser, frame::Context, info::Info};
//!
//! let mut parser = Parser::new();
//! let mut info = Info::default();
//! let mut ctx = Context::new();
//! let frames = parser.parse(b"$GPGGA,104559.64,,,,,,,,,,,,,\r\n", &mut info, &mut ctx);
//! assert_eq!(frames, 1);
//! assert_eq!(info.utc.hour, 10);
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub mod error;
pub mod frame;
pub mod generate;
pub mod info;
pub mod mask;
pub mod satellite;
pub mod sentence;
pub mod sentences;
pub mod time;
pub mod tokenize;
pub mod validate;

pub use error::Error;
pub use frame::{Context, Parser};
pub use info::{Fix, Info, Sig};
pub use mask::{Field, PresenceMask, SentenceFlag, SentenceMask};
pub use satellite::{Satellite, Satellites};
pub use sentence::{parse_nmea_sentence, sentence_from_info, sentence_to_info, NmeaSentence, SentenceType};
pub use time::Time;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scenario_s1_gga_time_only() {
        let mut info = Info::default();
        sentence_to_info("$GPGGA,104559.64,,,,,,,,,,,,,*", &mut info).unwrap();
        assert_eq!(info.utc.hour, 10);
        assert_eq!(info.utc.min, 45);
        assert_eq!(info.utc.sec, 59);
        assert_eq!(info.utc.hundredths, 64);
        assert!(info.present.contains(Field::Smask));
        assert!(info.present.contains(Field::UtcTime));
        assert!(info.smask.contains(SentenceFlag::Gpgga));
    }

    #[test]
    fn scenario_s2_rmc_knots_to_kph() {
        let mut info = Info::default();
        sentence_to_info("$GPRMC,,A,,,,,10.000,,,,,A*", &mut info).unwrap();
        assert!((info.speed - 18.52).abs() < 1e-9);
        assert!(info.present.contains(Field::Speed));
        assert!(info.present.contains(Field::Sig));
    }

    #[test]
    fn scenario_s3_gsv_multi_sentence_merge() {
        let mut info = Info::default();
        sentence_to_info(
            "$GPGSV,2,1,05,01,10,020,30,02,15,050,40,03,20,080,35,04,25,110,25*",
            &mut info,
        )
        .unwrap();
        assert!(info.gsv_in_progress);
        sentence_to_info("$GPGSV,2,2,05,05,30,140,20,,,,,,,,,,,,*", &mut info).unwrap();
        assert_eq!(info.sats.in_view_count, 5);
        assert_eq!(
            info.sats.in_view[0..5].iter().map(|s| s.prn).collect::<alloc::vec::Vec<_>>(),
            alloc::vec![1, 2, 3, 4, 5]
        );
        assert!(!info.gsv_in_progress);
    }

    #[test]
    fn scenario_s4_latitude_fold() {
        let mut info = Info::default();
        info.lat = 9500.0;
        info.present.insert(Field::UtcDate);
        info.present.insert(Field::UtcTime);
        info.sanitise();
        assert_eq!(info.lat, 8500.0);
    }

    #[test]
    fn scenario_s5_checksum_mismatch_drops_frame() {
        let mut parser = Parser::new();
        let mut info = Info::default();
        let mut ctx = Context::new();
        let count = parser.parse(
            b"$GPGGA,104559.64,,,,,,,,,,,,,*00\r\n",
            &mut info,
            &mut ctx,
        );
        assert_eq!(count, 0);
    }

    #[test]
    fn scenario_s6_vtg_knot_only_fills_kph() {
        let mut info = Info::default();
        sentence_to_info("$GPVTG,,,,,10.0,N,,*", &mut info).unwrap();
        assert!((info.speed - 18.52).abs() < 1e-9);
    }

    #[test]
    fn round_trip_identity_on_k_relevant_subset() {
        let mut info = Info::default();
        sentence_to_info("$GPGGA,104559.64,4807.038,N,01131.000,E,1,08,0.9,545.4,M,,,,*", &mut info).unwrap();
        info.sanitise();

        let frame = sentence_from_info(&info, SentenceFlag::Gpgga.into());
        let mut roundtripped = Info::default();
        let body = frame.trim_end_matches("\r\n");
        sentence_to_info(body, &mut roundtripped).unwrap();

        assert_eq!(roundtripped.utc.hour, info.utc.hour);
        assert_eq!(roundtripped.utc.min, info.utc.min);
        assert!((roundtripped.lat - info.lat).abs() < 1e-3);
        assert!((roundtripped.lon - info.lon).abs() < 1e-3);
        assert_eq!(roundtripped.sig, info.sig);
    }

    #[test]
    fn gga_geoid_height_and_dgps_merge_into_info() {
        let mut info = Info::default();
        sentence_to_info("$GPGGA,104559.64,4807.038,N,01131.000,E,1,08,0.9,545.4,M,46.9,M,1.2,0031*", &mut info).unwrap();
        assert!((info.height - 46.9).abs() < 1e-9);
        assert!(info.present.contains(Field::Height));
        assert!((info.dgps_age - 1.2).abs() < 1e-9);
        assert!(info.present.contains(Field::DgpsAge));
        assert_eq!(info.dgps_sid, 31);
        assert!(info.present.contains(Field::DgpsSid));
    }

    #[test]
    fn gga_rejects_wrong_hemisphere_letter() {
        let mut info = Info::default();
        let err = sentence_to_info("$GPGGA,104559.64,4807.038,X,01131.000,E,1,08,0.9,,,,,*", &mut info).unwrap_err();
        assert!(matches!(err, Error::InvalidField("hemisphere")));
    }

    #[test]
    fn checksum_property_holds_over_frame_body() {
        let body = b"GPGGA,104559.64,,,,,,,,,,,,,";
        let calculated = tokenize::crc(body);
        let frame = alloc::format!("${}*{:02X}\r\n", core::str::from_utf8(body).unwrap(), calculated);
        let mut parser = Parser::new();
        let mut info = Info::default();
        let mut ctx = Context::new();
        assert_eq!(parser.parse(frame.as_bytes(), &mut info, &mut ctx), 1);
    }
}
