//! Satellite tracking data: a combined in-view table the aggregate's
//! presence model reads and writes.

/// Maximum number of satellites tracked by a [`Satellites`] block.
pub const MAX_SATELLITES: usize = 72;

/// One tracked satellite.
///
/// `prn == 0` is the sentinel for "empty slot" — it never appears as a
/// genuine PRN on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Satellite {
    pub prn: u32,
    /// Elevation in degrees, folded to `[0, 90]` by `sanitise`.
    pub elevation: f64,
    /// Azimuth in degrees, folded to `[0, 360)` by `sanitise`.
    pub azimuth: f64,
    /// Signal-to-noise ratio in dB, clamped to `[0, 99]` by `sanitise`.
    pub snr: f64,
}

impl Satellite {
    pub(crate) const fn empty() -> Self {
        Satellite {
            prn: 0,
            elevation: 0.0,
            azimuth: 0.0,
            snr: 0.0,
        }
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.prn == 0
    }
}

/// Satellites in use for the current fix, and satellites currently in view.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Satellites {
    pub in_use_count: usize,
    pub in_use: [u32; MAX_SATELLITES],
    pub in_view_count: usize,
    pub in_view: [Satellite; MAX_SATELLITES],
}

impl Default for Satellites {
    fn default() -> Self {
        Satellites {
            in_use_count: 0,
            in_use: [0; MAX_SATELLITES],
            in_view_count: 0,
            in_view: [Satellite::empty(); MAX_SATELLITES],
        }
    }
}

impl Satellites {
    /// Rebuilds `in_use_count`/`in_view_count` from the arrays and drops any
    /// `in_use` PRN that has no matching `in_view` entry.
    pub(crate) fn sanitise(&mut self) {
        for sat in &mut self.in_view {
            if sat.is_empty() {
                continue;
            }
            sat.elevation = fold_elevation(sat.elevation);
            sat.azimuth = fold_degrees_360(sat.azimuth);
            sat.snr = sat.snr.clamp(0.0, 99.0);
        }

        for prn in &mut self.in_use {
            if *prn == 0 {
                continue;
            }
            let tracked = self.in_view.iter().any(|sat| sat.prn == *prn);
            if !tracked {
                *prn = 0;
            }
        }

        compact_zeros_to_end(&mut self.in_use);
        compact_empty_to_end(&mut self.in_view);

        self.in_use_count = self.in_use.iter().filter(|prn| **prn != 0).count();
        self.in_view_count = self.in_view.iter().filter(|sat| !sat.is_empty()).count();
    }
}

fn fold_elevation(elv: f64) -> f64 {
    let elv = if elv > 90.0 && elv <= 180.0 {
        180.0 - elv
    } else if elv < -90.0 && elv >= -180.0 {
        -180.0 - elv
    } else {
        elv
    };
    elv.abs().clamp(0.0, 90.0)
}

fn fold_degrees_360(mut deg: f64) -> f64 {
    deg %= 360.0;
    if deg < 0.0 {
        deg += 360.0;
    }
    deg
}

/// Stable partition by `prn != 0`, then ascending sort — equivalent to the
/// source's qsort-to-compact-zeros, per the design notes.
fn compact_zeros_to_end(prns: &mut [u32; MAX_SATELLITES]) {
    let mut nonzero: heapless::Vec<u32, MAX_SATELLITES> = heapless::Vec::new();
    for prn in prns.iter() {
        if *prn != 0 {
            let _ = nonzero.push(*prn);
        }
    }
    nonzero.sort_unstable();
    for (slot, prn) in prns.iter_mut().zip(nonzero.iter().chain(core::iter::repeat(&0))) {
        *slot = *prn;
    }
}

fn compact_empty_to_end(sats: &mut [Satellite; MAX_SATELLITES]) {
    let mut present: heapless::Vec<Satellite, MAX_SATELLITES> = heapless::Vec::new();
    for sat in sats.iter() {
        if !sat.is_empty() {
            let _ = present.push(*sat);
        }
    }
    for (slot, sat) in sats
        .iter_mut()
        .zip(present.iter().chain(core::iter::repeat(&Satellite::empty())))
    {
        *slot = *sat;
    }
}
