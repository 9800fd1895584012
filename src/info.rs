//! The aggregate navigation record: merge rules from each sentence packet,
//! the sanitiser enforcing the aggregate's global invariants, and the
//! NDEG/metric unit-conversion toggle.

use crate::mask::{Field, PresenceMask, SentenceFlag, SentenceMask};
use crate::satellite::{Satellite, Satellites, MAX_SATELLITES};
use crate::sentences::{gga::GgaData, gsa::GsaData, gsv::GsvData, rmc::RmcData, vtg::VtgData};
use crate::time::Time;

/// Signal quality, in ascending order of "how good a fix this implies".
///
/// The ordinal ordering doubles as the strength ranking [`Info::merge_gsa`]
/// uses to decide whether a GSA-derived value may overwrite an
/// already-present one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Sig {
    #[default]
    Invalid = 0,
    Fix = 1,
    Differential = 2,
    Sensitive = 3,
    RtkIn = 4,
    FloatRtk = 5,
    Estimated = 6,
    Manual = 7,
    Simulation = 8,
}

impl Sig {
    /// Decodes the wire character; unrecognised characters fold to
    /// [`Sig::Invalid`].
    pub fn from_wire(c: char) -> Self {
        match c.to_ascii_uppercase() {
            'A' => Sig::Fix,
            'D' => Sig::Differential,
            'P' => Sig::Sensitive,
            'R' => Sig::RtkIn,
            'F' => Sig::FloatRtk,
            'E' => Sig::Estimated,
            'M' => Sig::Manual,
            'S' => Sig::Simulation,
            _ => Sig::Invalid,
        }
    }

    pub fn to_wire(self) -> char {
        match self {
            Sig::Invalid => 'N',
            Sig::Fix => 'A',
            Sig::Differential => 'D',
            Sig::Sensitive => 'P',
            Sig::RtkIn => 'R',
            Sig::FloatRtk => 'F',
            Sig::Estimated => 'E',
            Sig::Manual => 'M',
            Sig::Simulation => 'S',
        }
    }
}

/// Navigation solution dimensionality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Fix {
    #[default]
    Bad = 1,
    Fix2D = 2,
    Fix3D = 3,
}

impl Fix {
    pub fn from_wire(c: char) -> Self {
        match c {
            '2' => Fix::Fix2D,
            '3' => Fix::Fix3D,
            _ => Fix::Bad,
        }
    }

    pub fn to_wire(self) -> char {
        match self {
            Fix::Bad => '1',
            Fix::Fix2D => '2',
            Fix::Fix3D => '3',
        }
    }
}

/// The aggregate navigation record: fused state from every sentence merged
/// into it so far, plus the presence mask recording which fields actually
/// hold a meaningful value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Info {
    pub present: PresenceMask,
    pub smask: SentenceMask,
    pub utc: Time,
    pub sig: Sig,
    pub fix: Fix,
    pub pdop: f64,
    pub hdop: f64,
    pub vdop: f64,
    pub lat: f64,
    pub lon: f64,
    pub elv: f64,
    pub height: f64,
    pub speed: f64,
    pub track: f64,
    pub mtrack: f64,
    pub magvar: f64,
    pub dgps_age: f64,
    pub dgps_sid: u32,
    pub sats: Satellites,
    /// `true` once `unit_conversion(true)` has been applied: distances in
    /// meters and angles in decimal degrees rather than NDEG/dimensionless.
    pub metric: bool,
    /// `true` from the first sentence of a GSV fan-out until the last one
    /// is merged.
    pub gsv_in_progress: bool,
}

impl Default for Info {
    fn default() -> Self {
        Info {
            present: PresenceMask::empty(),
            smask: SentenceMask::empty(),
            utc: Time::default(),
            sig: Sig::default(),
            fix: Fix::default(),
            pdop: 0.0,
            hdop: 0.0,
            vdop: 0.0,
            lat: 0.0,
            lon: 0.0,
            elv: 0.0,
            height: 0.0,
            speed: 0.0,
            track: 0.0,
            mtrack: 0.0,
            magvar: 0.0,
            dgps_age: 0.0,
            dgps_sid: 0,
            sats: Satellites::default(),
            metric: false,
            gsv_in_progress: false,
        }
    }
}

impl Info {
    /// Resets every field and presence bit, as if freshly constructed.
    pub fn clear(&mut self) {
        *self = Info::default();
    }

    fn mark(&mut self, field: Field) {
        self.present.insert(field);
        self.present.insert(Field::Smask);
    }

    pub(crate) fn merge_gga(&mut self, pkt: GgaData) {
        if pkt.present.contains(Field::UtcTime) {
            self.utc.hour = pkt.time.hour;
            self.utc.min = pkt.time.min;
            self.utc.sec = pkt.time.sec;
            self.utc.hundredths = pkt.time.hundredths;
            self.mark(Field::UtcTime);
        }
        if pkt.present.contains(Field::Lat) {
            self.lat = pkt.lat;
            self.mark(Field::Lat);
        }
        if pkt.present.contains(Field::Lon) {
            self.lon = pkt.lon;
            self.mark(Field::Lon);
        }
        if pkt.present.contains(Field::Sig) {
            self.sig = pkt.sig;
            self.mark(Field::Sig);
        }
        if pkt.present.contains(Field::SatInUseCount) {
            self.sats.in_use_count = pkt.sat_in_use_count as usize;
            self.mark(Field::SatInUseCount);
        }
        if pkt.present.contains(Field::Hdop) {
            self.hdop = pkt.hdop;
            self.mark(Field::Hdop);
        }
        if pkt.present.contains(Field::Elv) {
            self.elv = pkt.elv;
            self.mark(Field::Elv);
        }
        if pkt.present.contains(Field::Height) {
            self.height = pkt.height;
            self.mark(Field::Height);
        }
        if pkt.present.contains(Field::DgpsAge) {
            self.dgps_age = pkt.dgps_age;
            self.mark(Field::DgpsAge);
        }
        if pkt.present.contains(Field::DgpsSid) {
            self.dgps_sid = pkt.dgps_sid;
            self.mark(Field::DgpsSid);
        }
        self.smask.insert(SentenceFlag::Gpgga);
    }

    pub(crate) fn merge_gsa(&mut self, pkt: GsaData) {
        if pkt.present.contains(Field::Sig) {
            let existing = if self.present.contains(Field::Sig) {
                self.sig
            } else {
                Sig::Invalid
            };
            if pkt.sig > existing {
                self.sig = pkt.sig;
            }
            self.mark(Field::Sig);
        }
        if pkt.present.contains(Field::Fix) {
            self.fix = pkt.fix;
            self.mark(Field::Fix);
        }
        if pkt.present.contains(Field::SatInUse) {
            self.sats.in_use = [0; crate::satellite::MAX_SATELLITES];
            for (slot, prn) in self.sats.in_use.iter_mut().zip(pkt.sat_in_use.iter()) {
                *slot = *prn;
            }
            self.sats.in_use_count = self.sats.in_use.iter().filter(|p| **p != 0).count();
            self.mark(Field::SatInUse);
        }
        if pkt.present.contains(Field::Pdop) {
            self.pdop = pkt.pdop;
            self.mark(Field::Pdop);
        }
        if pkt.present.contains(Field::Hdop) {
            self.hdop = pkt.hdop;
            self.mark(Field::Hdop);
        }
        if pkt.present.contains(Field::Vdop) {
            self.vdop = pkt.vdop;
            self.mark(Field::Vdop);
        }
        self.smask.insert(SentenceFlag::Gpgsa);
    }

    pub(crate) fn merge_gsv(&mut self, pkt: GsvData) {
        if pkt.sentence == 1 {
            self.sats.in_view = [Satellite::empty(); MAX_SATELLITES];
        }
        let base = (pkt.sentence as usize - 1) * 4;
        for (offset, sat) in pkt.sats.into_iter().enumerate() {
            if let Some(sat) = sat {
                if base + offset < self.sats.in_view.len() {
                    self.sats.in_view[base + offset] = sat;
                }
            }
        }
        self.sats.in_view_count = self.sats.in_view.iter().filter(|s| s.prn != 0).count();
        self.gsv_in_progress = pkt.sentence != pkt.sentences;
        self.mark(Field::SatInView);
        self.mark(Field::SatInViewCount);
        self.smask.insert(SentenceFlag::Gpgsv);
    }

    pub(crate) fn merge_rmc(&mut self, pkt: RmcData) {
        if pkt.present.contains(Field::UtcTime) {
            self.utc.hour = pkt.time.hour;
            self.utc.min = pkt.time.min;
            self.utc.sec = pkt.time.sec;
            self.utc.hundredths = pkt.time.hundredths;
            self.mark(Field::UtcTime);
        }
        if pkt.present.contains(Field::UtcDate) {
            self.utc.year = pkt.date.year;
            self.utc.month = pkt.date.month;
            self.utc.day = pkt.date.day;
            self.mark(Field::UtcDate);
        }
        if pkt.present.contains(Field::Sig) {
            self.sig = pkt.sig;
            self.mark(Field::Sig);
        }
        if pkt.present.contains(Field::Lat) {
            self.lat = pkt.lat;
            self.mark(Field::Lat);
        }
        if pkt.present.contains(Field::Lon) {
            self.lon = pkt.lon;
            self.mark(Field::Lon);
        }
        if pkt.present.contains(Field::Speed) {
            self.speed = pkt.speed_knots * 1.852;
            self.mark(Field::Speed);
        }
        if pkt.present.contains(Field::Track) {
            self.track = pkt.track;
            self.mark(Field::Track);
        }
        if pkt.present.contains(Field::Magvar) {
            self.magvar = pkt.magvar;
            self.mark(Field::Magvar);
        }
        self.smask.insert(SentenceFlag::Gprmc);
    }

    pub(crate) fn merge_vtg(&mut self, pkt: VtgData) {
        if pkt.present.contains(Field::Track) {
            self.track = pkt.track;
            self.mark(Field::Track);
        }
        if pkt.present.contains(Field::Mtrack) {
            self.mtrack = pkt.mtrack;
            self.mark(Field::Mtrack);
        }
        if pkt.present.contains(Field::Speed) {
            self.speed = pkt.speed_kph;
            self.mark(Field::Speed);
        }
        self.smask.insert(SentenceFlag::Gpvtg);
    }

    /// Enforces every aggregate invariant: signal/fix clamped to their valid
    /// ranges, DOPs non-negative, lat/lon folded into range, speed sign
    /// absorbed into track, satellite table folded and recounted, missing
    /// UTC date/time filled from the wall clock.
    pub fn sanitise(&mut self) {
        if !matches!(
            self.sig,
            Sig::Invalid
                | Sig::Fix
                | Sig::Differential
                | Sig::Sensitive
                | Sig::RtkIn
                | Sig::FloatRtk
                | Sig::Estimated
                | Sig::Manual
                | Sig::Simulation
        ) {
            self.sig = Sig::Invalid;
        }
        if !matches!(self.fix, Fix::Bad | Fix::Fix2D | Fix::Fix3D) {
            self.fix = Fix::Bad;
        }

        self.pdop = self.pdop.max(0.0);
        self.hdop = self.hdop.max(0.0);
        self.vdop = self.vdop.max(0.0);

        if self.lat > 9000.0 && self.lat <= 18000.0 {
            self.lat = 18000.0 - self.lat;
            self.lon += 18000.0;
        } else if self.lat < -9000.0 && self.lat >= -18000.0 {
            self.lat = -18000.0 - self.lat;
            self.lon += 18000.0;
        }
        while self.lon > 18000.0 {
            self.lon -= 36000.0;
        }
        while self.lon <= -18000.0 {
            self.lon += 36000.0;
        }

        if self.speed < 0.0 {
            self.speed = -self.speed;
            self.track = wrap_360(self.track + 180.0);
            self.mtrack = wrap_360(self.mtrack + 180.0);
        }
        self.track = wrap_360(self.track);
        self.mtrack = wrap_360(self.mtrack);
        self.magvar = wrap_360(self.magvar);

        self.sats.sanitise();

        if !self.present.contains(Field::UtcDate) || !self.present.contains(Field::UtcTime) {
            fill_from_wall_clock(self);
        }

        for field in [Field::Sig, Field::Fix, Field::Pdop, Field::Hdop, Field::Vdop, Field::Lat, Field::Lon,
            Field::Elv, Field::Height, Field::Speed, Field::Track, Field::Mtrack, Field::Magvar,
            Field::DgpsAge, Field::DgpsSid]
        {
            if !self.present.contains(field) {
                self.zero_field(field);
            }
        }
    }

    fn zero_field(&mut self, field: Field) {
        match field {
            Field::Sig => self.sig = Sig::Invalid,
            Field::Fix => self.fix = Fix::Bad,
            Field::Pdop => self.pdop = 0.0,
            Field::Hdop => self.hdop = 0.0,
            Field::Vdop => self.vdop = 0.0,
            Field::Lat => self.lat = 0.0,
            Field::Lon => self.lon = 0.0,
            Field::Elv => self.elv = 0.0,
            Field::Height => self.height = 0.0,
            Field::Speed => self.speed = 0.0,
            Field::Track => self.track = 0.0,
            Field::Mtrack => self.mtrack = 0.0,
            Field::Magvar => self.magvar = 0.0,
            Field::DgpsAge => self.dgps_age = 0.0,
            Field::DgpsSid => self.dgps_sid = 0,
            _ => {}
        }
    }

    /// Idempotent toggle between NDEG/dimensionless and decimal-degrees/
    /// meters. `to_metric == self.metric` is a no-op.
    pub fn unit_conversion(&mut self, to_metric: bool) {
        if to_metric == self.metric {
            return;
        }
        if to_metric {
            self.lat = ndeg_to_decimal(self.lat);
            self.lon = ndeg_to_decimal(self.lon);
            self.pdop *= 5.0;
            self.hdop *= 5.0;
            self.vdop *= 5.0;
        } else {
            self.lat = decimal_to_ndeg(self.lat);
            self.lon = decimal_to_ndeg(self.lon);
            self.pdop /= 5.0;
            self.hdop /= 5.0;
            self.vdop /= 5.0;
        }
        self.metric = to_metric;
    }
}

fn wrap_360(mut deg: f64) -> f64 {
    deg %= 360.0;
    if deg < 0.0 {
        deg += 360.0;
    }
    deg
}

fn ndeg_to_decimal(ndeg: f64) -> f64 {
    let sign = if ndeg < 0.0 { -1.0 } else { 1.0 };
    let ndeg = ndeg.abs();
    let degrees = (ndeg / 100.0).floor();
    let minutes = ndeg - degrees * 100.0;
    sign * (degrees + minutes / 60.0)
}

fn decimal_to_ndeg(decimal: f64) -> f64 {
    let sign = if decimal < 0.0 { -1.0 } else { 1.0 };
    let decimal = decimal.abs();
    let degrees = decimal.floor();
    let minutes = (decimal - degrees) * 60.0;
    sign * (degrees * 100.0 + minutes)
}

#[cfg(feature = "std")]
fn fill_from_wall_clock(info: &mut Info) {
    let now = Time::now();
    if !info.present.contains(Field::UtcDate) {
        info.utc.year = now.year;
        info.utc.month = now.month;
        info.utc.day = now.day;
    }
    if !info.present.contains(Field::UtcTime) {
        info.utc.hour = now.hour;
        info.utc.min = now.min;
        info.utc.sec = now.sec;
        info.utc.hundredths = now.hundredths;
    }
}

#[cfg(not(feature = "std"))]
fn fill_from_wall_clock(_info: &mut Info) {}
