//! Pure range/enumerant/character-class predicates shared by every
//! sentence parser, consolidated into one table-driven module so that
//! adding a sixth sentence kind is a one-variant change plus one table row.

use crate::info::{Fix, Sig};

/// ASCII printable minus the NMEA-reserved delimiter characters.
pub fn valid_char(c: char) -> bool {
    c.is_ascii_graphic() && !matches!(c, '$' | '*' | '!' | '\\' | '^' | '~')
}

/// Whole-sentence character-class check, used before any field-level
/// parsing: every byte must be printable ASCII outside the reserved set.
pub fn valid_body(body: &str) -> bool {
    body.chars().all(valid_char)
}

pub fn valid_time(hour: u8, min: u8, sec: u8, hundredths: u8) -> bool {
    hour <= 23 && min <= 59 && sec <= 60 && hundredths <= 99
}

pub fn valid_date(year: u16, month: u8, day: u8) -> bool {
    (1990..=2089).contains(&year) && (1..=12).contains(&month) && (1..=31).contains(&day)
}

/// `'N'`/`'S'` after upper-casing.
pub fn valid_ns(c: char) -> bool {
    matches!(c.to_ascii_uppercase(), 'N' | 'S')
}

/// `'E'`/`'W'` after upper-casing.
pub fn valid_ew(c: char) -> bool {
    matches!(c.to_ascii_uppercase(), 'E' | 'W')
}

pub fn valid_fix(fix: Fix) -> bool {
    matches!(fix, Fix::Bad | Fix::Fix2D | Fix::Fix3D)
}

pub fn valid_sig(sig: Sig) -> bool {
    matches!(
        sig,
        Sig::Invalid
            | Sig::Fix
            | Sig::Differential
            | Sig::Sensitive
            | Sig::RtkIn
            | Sig::FloatRtk
            | Sig::Estimated
            | Sig::Manual
            | Sig::Simulation
    )
}

/// GSA/RMC mode character after upper-casing: `{N,A,D,P,R,F,E,M,S}`.
pub fn valid_mode(c: char) -> bool {
    matches!(c.to_ascii_uppercase(), 'N' | 'A' | 'D' | 'P' | 'R' | 'F' | 'E' | 'M' | 'S')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_char_rejects_reserved_delimiters() {
        assert!(valid_char('A'));
        assert!(!valid_char('$'));
        assert!(!valid_char('*'));
        assert!(!valid_char('~'));
    }

    #[test]
    fn valid_time_enforces_ranges() {
        assert!(valid_time(23, 59, 60, 99));
        assert!(!valid_time(24, 0, 0, 0));
        assert!(!valid_time(0, 60, 0, 0));
    }

    #[test]
    fn valid_date_enforces_year_window() {
        assert!(valid_date(2026, 1, 31));
        assert!(!valid_date(1989, 1, 1));
        assert!(!valid_date(2090, 1, 1));
        assert!(!valid_date(2026, 13, 1));
    }

    #[test]
    fn valid_ns_ew_upper_case_first() {
        assert!(valid_ns('n'));
        assert!(valid_ns('S'));
        assert!(!valid_ns('E'));
        assert!(valid_ew('w'));
        assert!(!valid_ew('N'));
    }

    #[test]
    fn valid_mode_covers_full_set() {
        for c in "NADPRFEMS".chars() {
            assert!(valid_mode(c));
        }
        assert!(!valid_mode('X'));
    }
}
