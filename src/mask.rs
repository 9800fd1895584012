//! Bit-set newtypes for the two closed field universes the aggregate
//! tracks: which `Info` fields are meaningful, and which sentence kinds
//! have contributed to it.

use core::ops::{BitOr, BitOrAssign};

use crate::sentence::SentenceType;

macro_rules! bitset {
    ($(#[$outer:meta])* $Name:ident, $Flag:ident { $($(#[$variant:meta])* $Variant:ident = $bit:expr),* $(,)? }) => {
        $(#[$outer])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        pub struct $Name(u32);

        /// Individual flags of [`$Name`].
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        #[repr(u32)]
        pub enum $Flag {
            $($(#[$variant])* $Variant = $bit),*
        }

        impl $Name {
            /// An empty mask.
            pub const fn empty() -> Self {
                Self(0)
            }

            /// Sets `flag` in this mask.
            pub fn insert(&mut self, flag: $Flag) {
                self.0 |= flag as u32;
            }

            /// Clears `flag` in this mask.
            pub fn remove(&mut self, flag: $Flag) {
                self.0 &= !(flag as u32);
            }

            /// Whether `flag` is set.
            pub const fn contains(&self, flag: $Flag) -> bool {
                self.0 & (flag as u32) != 0
            }

            /// Whether every flag set in `other` is also set in `self`.
            pub const fn is_superset_of(&self, other: Self) -> bool {
                self.0 & other.0 == other.0
            }

            /// The raw bit-mask value.
            pub const fn bits(&self) -> u32 {
                self.0
            }
        }

        impl From<$Flag> for $Name {
            fn from(flag: $Flag) -> Self {
                Self(flag as u32)
            }
        }

        impl BitOr for $Name {
            type Output = Self;
            fn bitor(self, rhs: Self) -> Self {
                Self(self.0 | rhs.0)
            }
        }

        impl BitOr<$Flag> for $Name {
            type Output = Self;
            fn bitor(self, rhs: $Flag) -> Self {
                Self(self.0 | rhs as u32)
            }
        }

        impl BitOrAssign<$Flag> for $Name {
            fn bitor_assign(&mut self, rhs: $Flag) {
                self.0 |= rhs as u32;
            }
        }

        impl BitOrAssign for $Name {
            fn bitor_assign(&mut self, rhs: Self) {
                self.0 |= rhs.0;
            }
        }
    };
}

bitset!(
    /// Which `Info` fields currently hold a meaningful value.
    ///
    /// Reading a field whose bit is unset is undefined for callers;
    /// [`crate::Info::sanitise`] zeroes the backing storage for unset
    /// fields so "undefined" in practice means "reads as zero".
    PresenceMask, Field {
        Smask          = 1 << 0,
        UtcDate        = 1 << 1,
        UtcTime        = 1 << 2,
        Sig            = 1 << 3,
        Fix            = 1 << 4,
        Pdop           = 1 << 5,
        Hdop           = 1 << 6,
        Vdop           = 1 << 7,
        Lat            = 1 << 8,
        Lon            = 1 << 9,
        Elv            = 1 << 10,
        Height         = 1 << 11,
        Speed          = 1 << 12,
        Track          = 1 << 13,
        Mtrack         = 1 << 14,
        Magvar         = 1 << 15,
        SatInUseCount  = 1 << 16,
        SatInUse       = 1 << 17,
        SatInViewCount = 1 << 18,
        SatInView      = 1 << 19,
        DgpsAge        = 1 << 20,
        DgpsSid        = 1 << 21,
    }
);

bitset!(
    /// Which sentence kinds have contributed to an aggregate.
    SentenceMask, SentenceFlag {
        Gpgga = 1 << 0,
        Gpgsa = 1 << 1,
        Gpgsv = 1 << 2,
        Gprmc = 1 << 3,
        Gpvtg = 1 << 4,
    }
);

impl SentenceMask {
    /// The full mask: every supported sentence kind.
    pub fn all() -> Self {
        let mut m = Self::empty();
        m.insert(SentenceFlag::Gpgga);
        m.insert(SentenceFlag::Gpgsa);
        m.insert(SentenceFlag::Gpgsv);
        m.insert(SentenceFlag::Gprmc);
        m.insert(SentenceFlag::Gpvtg);
        m
    }
}

impl From<SentenceType> for SentenceFlag {
    fn from(kind: SentenceType) -> Self {
        match kind {
            SentenceType::Gga => SentenceFlag::Gpgga,
            SentenceType::Gsa => SentenceFlag::Gpgsa,
            SentenceType::Gsv => SentenceFlag::Gpgsv,
            SentenceType::Rmc => SentenceFlag::Gprmc,
            SentenceType::Vtg => SentenceFlag::Gpvtg,
        }
    }
}
