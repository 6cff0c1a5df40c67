//! Baseline solutions
use nalgebra::{DMatrix, DVector};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::prelude::{Epoch, Position, Vector3, SV};

/// Satellite pair of one double difference: reference minus satellite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AmbiguityPair {
    /// Reference satellite
    pub reference: SV,
    /// Paired satellite
    pub satellite: SV,
}

impl std::fmt::Display for AmbiguityPair {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}-{}", self.reference, self.satellite)
    }
}

/// Double difference phase ambiguity [cycles]
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Ambiguity {
    pub pair: AmbiguityPair,
    /// Real valued estimate for float solutions,
    /// integer value that was applied for fixed solutions.
    pub cycles: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum SolutionType {
    /// Position and real valued ambiguities
    Float,
    /// Position only, integer ambiguities provided ahead of time
    Fixed,
}

impl std::fmt::Display for SolutionType {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::Float => write!(f, "float"),
            Self::Fixed => write!(f, "fixed"),
        }
    }
}

/// Single epoch baseline [Solution]. Never modified once formed.
#[derive(Debug, Clone, PartialEq)]
pub struct Solution {
    /// Epoch of observation
    pub epoch: Epoch,
    /// [SolutionType]
    pub solution_type: SolutionType,
    /// Reference satellite
    pub reference: SV,
    /// Double differenced phase observations [cycles],
    /// one per paired satellite, in canonical order.
    pub double_differences: DVector<f64>,
    /// Estimated correction vector: 3 position corrections [m],
    /// followed by the N-1 real valued ambiguities [cycles] for float solutions.
    pub correction: DVector<f64>,
    /// Corrected rover [Position]
    pub position: Position,
    /// Rover minus base vector, ECEF [m]
    pub baseline: Vector3<f64>,
    /// [Ambiguity] per paired satellite, in canonical order.
    pub ambiguities: Vec<Ambiguity>,
    /// Covariance of the correction vector (AᵗWA)⁻¹
    pub covariance: DMatrix<f64>,
    /// Post-fit residuals [cycles]
    pub residuals: DVector<f64>,
    /// A posteriori variance factor
    pub variance_factor: Option<f64>,
}

impl Solution {
    /// Position correction applied to the nominal rover position [m]
    pub fn position_correction(&self) -> Vector3<f64> {
        Vector3::new(self.correction[0], self.correction[1], self.correction[2])
    }

    /// Formal position standard deviation, per ECEF axis [m]
    pub fn position_std_dev(&self) -> Vector3<f64> {
        Vector3::new(
            self.covariance[(0, 0)].sqrt(),
            self.covariance[(1, 1)].sqrt(),
            self.covariance[(2, 2)].sqrt(),
        )
    }

    /// Baseline length [m]
    pub fn baseline_length(&self) -> f64 {
        self.baseline.norm()
    }

    /// Ambiguity [cycles] between reference and this satellite
    pub fn ambiguity(&self, satellite: SV) -> Option<f64> {
        self.ambiguities
            .iter()
            .find(|ambiguity| ambiguity.pair.satellite == satellite)
            .map(|ambiguity| ambiguity.cycles)
    }
}
