//! Range geometry and linearized double difference model
use log::trace;
use nalgebra::DMatrix;

use crate::{
    constants::MIN_RANGE_M,
    differencing::DifferencingMatrices,
    prelude::{Error, Satellite, Vector3},
};

/// Euclidean distance between two ECEF points [m]
pub fn geometric_range(from: &Vector3<f64>, to: &Vector3<f64>) -> f64 {
    let dx = to[0] - from[0];
    let dy = to[1] - from[1];
    let dz = to[2] - from[2];
    (dx * dx + dy * dy + dz * dz).sqrt()
}

/// [geometric_range] to a [Satellite], rejecting colocated points.
fn satellite_range(from: &Vector3<f64>, satellite: &Satellite) -> Result<f64, Error> {
    let range = geometric_range(from, &satellite.position_ecef_m);
    if range < MIN_RANGE_M {
        Err(Error::ZeroRange(satellite.sv))
    } else {
        Ok(range)
    }
}

pub(crate) fn validate_wavelength(wavelength: f64) -> Result<(), Error> {
    if wavelength > 0.0 && wavelength.is_finite() {
        Ok(())
    } else {
        Err(Error::NonPositiveWavelength)
    }
}

/// Partial derivatives of the (reference - satellite) double differenced range,
/// in cycles, with respect to the rover coordinates:
/// `(1/λ) · [(P - Xs)/ρ(P,s) - (P - Xref)/ρ(P,ref)]`.
pub fn double_difference_partials(
    rover: &Vector3<f64>,
    satellite: &Satellite,
    reference: &Satellite,
    wavelength: f64,
) -> Result<Vector3<f64>, Error> {
    validate_wavelength(wavelength)?;

    let rho_s = satellite_range(rover, satellite)?;
    let rho_ref = satellite_range(rover, reference)?;

    let los_s = (rover - satellite.position_ecef_m) / rho_s;
    let los_ref = (rover - reference.position_ecef_m) / rho_ref;

    Ok((los_s - los_ref) / wavelength)
}

/// Double differenced geometric range [m], predicted from the known base
/// and the nominal rover: `(ρ(B,ref) - ρ(R,ref)) - (ρ(B,s) - ρ(R,s))`.
pub fn predicted_double_difference_m(
    base: &Vector3<f64>,
    rover: &Vector3<f64>,
    satellite: &Satellite,
    reference: &Satellite,
) -> Result<f64, Error> {
    let sd_ref = satellite_range(base, reference)? - satellite_range(rover, reference)?;
    let sd_s = satellite_range(base, satellite)? - satellite_range(rover, satellite)?;
    Ok(sd_ref - sd_s)
}

/// Linearized double difference model around the nominal rover position.
///
/// Row `j` binds the `j`-th non reference satellite: `[∂X, ∂Y, ∂Z, e_j]`,
/// `e_j` selecting the single ambiguity unknown of this double difference.
#[derive(Debug, Clone, PartialEq)]
pub struct DesignMatrix {
    /// (N-1) x 3 position partials, in cycles per meter
    partials: DMatrix<f64>,
}

impl DesignMatrix {
    /// Builds the [DesignMatrix]. `satellites` must follow the canonical
    /// ordering the [DifferencingMatrices] were built for.
    pub fn new(
        rover: &Vector3<f64>,
        satellites: &[Satellite],
        matrices: &DifferencingMatrices,
        wavelength: f64,
    ) -> Result<Self, Error> {
        validate_wavelength(wavelength)?;

        if satellites.len() != matrices.size() {
            return Err(Error::DimensionMismatch {
                expected: matrices.size(),
                found: satellites.len(),
            });
        }

        let reference = &satellites[matrices.reference()];
        let mut partials = DMatrix::<f64>::zeros(matrices.size() - 1, 3);

        for (row, index) in matrices.paired_indexes().enumerate() {
            let satellite = &satellites[index];
            let dx = double_difference_partials(rover, satellite, reference, wavelength)?;
            trace!("{}-{} - partials={}", reference.sv, satellite.sv, dx.transpose());
            partials.row_mut(row).copy_from(&dx.transpose());
        }

        Ok(Self { partials })
    }

    /// Number of double differences
    pub fn nrows(&self) -> usize {
        self.partials.nrows()
    }

    /// Position partials only: (N-1) x 3
    pub fn position(&self) -> &DMatrix<f64> {
        &self.partials
    }

    /// Phase model, (N-1) x (3 + N-1): position partials and ambiguity identity block.
    pub fn phase(&self) -> DMatrix<f64> {
        let n = self.nrows();
        let mut a = DMatrix::<f64>::zeros(n, 3 + n);
        a.view_mut((0, 0), (n, 3)).copy_from(&self.partials);
        a.view_mut((0, 3), (n, n)).fill_with_identity();
        a
    }

    /// Code model, (N-1) x (3 + N-1): pseudo range double differences
    /// do not carry any ambiguity.
    pub fn code(&self) -> DMatrix<f64> {
        let n = self.nrows();
        let mut a = DMatrix::<f64>::zeros(n, 3 + n);
        a.view_mut((0, 0), (n, 3)).copy_from(&self.partials);
        a
    }
}
