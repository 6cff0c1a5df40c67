//! 3D Position coordinates
use map_3d::{ecef2aer, ecef2geodetic, rad2deg, Ellipsoid};

use crate::prelude::Vector3;

/// Receiver antenna phase center. Used for the known base station
/// and the nominal (approximate) rover location.
#[derive(Default, Debug, Copy, Clone, PartialEq)]
pub struct Position {
    /// ECEF coordinates in meters
    pub(crate) ecef: Vector3<f64>,
    /// Geodetic coordinates (latitude [rad], longitude [rad], height [m])
    pub(crate) geodetic: Vector3<f64>,
}

impl Position {
    /// Builds new [Position] from ECEF coordinates expressed in meter.
    pub fn from_ecef(ecef: Vector3<f64>) -> Self {
        let (x, y, z) = (ecef[0], ecef[1], ecef[2]);
        let (lat, lon, h) = ecef2geodetic(x, y, z, Ellipsoid::WGS84);
        Self {
            ecef,
            geodetic: Vector3::new(lat, lon, h),
        }
    }

    /// Builds new [Position] from ECEF coordinates expressed in meter.
    pub fn from_ecef_m(x_m: f64, y_m: f64, z_m: f64) -> Self {
        Self::from_ecef(Vector3::new(x_m, y_m, z_m))
    }

    /// Returns ECEF coordinates.
    pub fn ecef(&self) -> Vector3<f64> {
        self.ecef
    }

    /// Returns Geodetic coordinates
    /// - latitude [rad]
    /// - longitude [rad]
    /// - height above ellipsoid [m]
    pub fn geodetic(&self) -> Vector3<f64> {
        self.geodetic
    }

    /// Returns a new [Position] shifted by this ECEF correction (meters).
    pub fn corrected(&self, dx: &Vector3<f64>) -> Self {
        Self::from_ecef(self.ecef + dx)
    }

    /// Returns (elevation, azimuth) in degrees of the target (ECEF meters)
    /// as seen from this [Position]. Azimuth is counted clockwise from north, in [0, 360[.
    pub fn elevation_azimuth_deg(&self, target: &Vector3<f64>) -> (f64, f64) {
        let (lat, lon, h) = (self.geodetic[0], self.geodetic[1], self.geodetic[2]);
        let (azim, elev, _) =
            ecef2aer(target[0], target[1], target[2], lat, lon, h, Ellipsoid::WGS84);
        (rad2deg(elev), rad2deg(azim).rem_euclid(360.0))
    }
}
