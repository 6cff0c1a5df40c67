//! Satellite geometry inputs and reference satellite selection
use itertools::Itertools;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::prelude::{Error, Position, Vector3, SV};

/// Satellite phase center at signal transmission, already corrected
/// for Earth rotation during signal travel time.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Satellite {
    /// Satellite identifier
    pub sv: SV,
    /// ECEF coordinates [m]
    pub position_ecef_m: Vector3<f64>,
    /// Elevation angle [deg], when known ahead of time.
    /// Derived from the nominal rover position otherwise.
    pub elevation_deg: Option<f64>,
}

impl Satellite {
    /// Builds a new [Satellite] from ECEF coordinates in meters.
    pub fn new(sv: SV, x_m: f64, y_m: f64, z_m: f64) -> Self {
        Self {
            sv,
            position_ecef_m: Vector3::new(x_m, y_m, z_m),
            elevation_deg: None,
        }
    }

    /// Copies and returns [Satellite] with known elevation angle (degrees)
    pub fn with_elevation_deg(mut self, elevation_deg: f64) -> Self {
        self.elevation_deg = Some(elevation_deg);
        self
    }

    /// Elevation angle in degrees, as provided or as seen from `from`.
    pub fn elevation_deg(&self, from: &Position) -> f64 {
        match self.elevation_deg {
            Some(elevation) => elevation,
            None => from.elevation_azimuth_deg(&self.position_ecef_m).0,
        }
    }
}

/// Index of the highest elevation. On ties, the first one in the
/// canonical ordering wins.
pub(crate) fn highest_elevation(elevations: &[f64]) -> Option<usize> {
    let mut best = Option::<(usize, f64)>::None;
    for (index, elevation) in elevations.iter().enumerate() {
        match best {
            Some((_, max)) if *elevation <= max => {},
            _ => best = Some((index, *elevation)),
        }
    }
    best.map(|(index, _)| index)
}

/// Locates the reference satellite in the canonical ordering.
/// The reference must appear exactly once and no other satellite may be repeated.
pub(crate) fn reference_index(satellites: &[SV], reference: SV) -> Result<usize, Error> {
    let mut occurrences = satellites.iter().positions(|sv| *sv == reference);

    let index = occurrences.next().ok_or(Error::UnknownReference(reference))?;

    if let Some(twice) = occurrences.next() {
        return Err(Error::InvalidReference(twice));
    }

    if let Some(duplicate) = satellites.iter().duplicates().next() {
        return Err(Error::DuplicateSatellite(*duplicate));
    }

    Ok(index)
}

#[cfg(test)]
mod test {
    use super::{highest_elevation, reference_index, Satellite};
    use crate::prelude::{Constellation, Error, Position, SV};

    fn sv(prn: u8) -> SV {
        SV::new(Constellation::GPS, prn)
    }

    #[test]
    fn highest_elevation_selection() {
        assert_eq!(highest_elevation(&[]), None);
        assert_eq!(highest_elevation(&[10.0, 71.0, 45.0]), Some(1));
        assert_eq!(highest_elevation(&[30.0, 71.0, 71.0, 12.0]), Some(1));
        assert_eq!(highest_elevation(&[50.0, 50.0]), Some(0));
    }

    #[test]
    fn reference_lookup() {
        let sats = [sv(10), sv(12), sv(24)];
        assert_eq!(reference_index(&sats, sv(24)), Ok(2));
        assert_eq!(
            reference_index(&sats, sv(13)),
            Err(Error::UnknownReference(sv(13)))
        );

        let sats = [sv(24), sv(12), sv(24)];
        assert_eq!(reference_index(&sats, sv(24)), Err(Error::InvalidReference(2)));

        let sats = [sv(24), sv(12), sv(12)];
        assert_eq!(
            reference_index(&sats, sv(24)),
            Err(Error::DuplicateSatellite(sv(12)))
        );
    }

    #[test]
    fn provided_elevation_prevails() {
        let rover = Position::from_ecef_m(6378137.0, 0.0, 0.0);
        let sat = Satellite::new(sv(1), 26_000_000.0, 0.0, 0.0);
        assert!((sat.elevation_deg(&rover) - 90.0).abs() < 1.0E-6);

        let sat = sat.with_elevation_deg(12.5);
        assert_eq!(sat.elevation_deg(&rover), 12.5);
    }
}
