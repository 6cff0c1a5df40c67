use crate::constants::SPEED_OF_LIGHT_M_S;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Frequency band. Double differences are formed on a single band,
/// so one wavelength applies to every satellite of a batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, PartialOrd, Eq, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Carrier {
    /// L1 (GPS/QZSS/SBAS)
    #[default]
    L1,
    /// L2 (GPS/QZSS)
    L2,
    /// L5 (GPS/QZSS/SBAS)
    L5,
    /// E1 (Galileo), same frequency as L1
    E1,
    /// E5a (Galileo), same frequency as L5
    E5a,
    /// E5b (Galileo)
    E5b,
    /// E6 (Galileo)
    E6,
    /// B1I (BDS)
    B1I,
    /// B3 (BDS)
    B3,
}

impl std::fmt::Display for Carrier {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::L1 => write!(f, "L1"),
            Self::L2 => write!(f, "L2"),
            Self::L5 => write!(f, "L5"),
            Self::E1 => write!(f, "E1"),
            Self::E5a => write!(f, "E5a"),
            Self::E5b => write!(f, "E5b"),
            Self::E6 => write!(f, "E6"),
            Self::B1I => write!(f, "B1I"),
            Self::B3 => write!(f, "B3"),
        }
    }
}

impl Carrier {
    /// Carrier frequency in Hz
    pub fn frequency(&self) -> f64 {
        match self {
            Self::L1 | Self::E1 => 1575.42E6_f64,
            Self::L2 => 1227.60E6_f64,
            Self::L5 | Self::E5a => 1176.45E6_f64,
            Self::E5b => 1207.14E6_f64,
            Self::E6 => 1278.75E6_f64,
            Self::B1I => 1561.098E6_f64,
            Self::B3 => 1268.52E6_f64,
        }
    }

    /// Carrier wavelength in meters
    pub fn wavelength(&self) -> f64 {
        SPEED_OF_LIGHT_M_S / self.frequency()
    }
}
