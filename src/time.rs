//! NMEA date/time, stored as a single struct rather than a separate
//! `chrono::NaiveDate`/`NaiveTime` pair — the aggregate needs both halves to
//! arrive independently (a GGA carries only time, an RMC carries both) and
//! recombines them, which a bare `NaiveDateTime` can't represent half-filled.

use chrono::{Datelike, NaiveDate, NaiveTime, Timelike};

/// UTC timestamp of a position fix.
///
/// Two-digit wire years below 90 map to `2000 + y`, otherwise `1900 + y`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Time {
    pub year: u16,
    pub month: u8,
    pub day: u8,
    pub hour: u8,
    pub min: u8,
    pub sec: u8,
    pub hundredths: u8,
}

impl Time {
    /// Maps a two-digit wire year onto a full calendar year.
    pub fn expand_year(two_digit: u8) -> u16 {
        if two_digit < 90 {
            2000 + u16::from(two_digit)
        } else {
            1900 + u16::from(two_digit)
        }
    }

    pub(crate) fn set_time(&mut self, time: NaiveTime) {
        self.hour = time.hour() as u8;
        self.min = time.minute() as u8;
        self.sec = time.second() as u8;
        self.hundredths = (time.nanosecond() / 10_000_000) as u8;
    }

    pub(crate) fn set_date(&mut self, date: NaiveDate) {
        self.year = date.year() as u16;
        self.month = date.month() as u8;
        self.day = date.day() as u8;
    }

    /// The wall-clock `Time`, used by [`crate::Info::sanitise`] to fill a
    /// missing UTC date/time.
    #[cfg(feature = "std")]
    pub fn now() -> Self {
        let now = chrono::Utc::now();
        let mut t = Time::default();
        t.set_date(now.date_naive());
        t.set_time(now.time());
        t
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expand_year_folds_around_1990() {
        assert_eq!(Time::expand_year(89), 2089);
        assert_eq!(Time::expand_year(90), 1990);
        assert_eq!(Time::expand_year(0), 2000);
        assert_eq!(Time::expand_year(99), 1999);
    }
}
