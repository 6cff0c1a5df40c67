use thiserror::Error;

use crate::prelude::{Receiver, SV};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// Vector or satellite set does not match the expected dimension.
    #[error("dimension mismatch: expected {expected}, got {found}")]
    DimensionMismatch { expected: usize, found: usize },

    /// Each satellite of the batch must be observed by both receivers.
    #[error("missing {0} observation for {1}")]
    MissingObservation(Receiver, SV),

    /// Reference index is out of range, or the reference satellite
    /// appears more than once in the satellite ordering.
    #[error("invalid reference satellite index #{0}")]
    InvalidReference(usize),

    /// [ReferenceSelection::Fixed] names a satellite that is not part of this batch.
    #[error("reference satellite {0} is not part of this batch")]
    UnknownReference(SV),

    /// Satellite ordering must not contain duplicates.
    #[error("{0} appears more than once")]
    DuplicateSatellite(SV),

    /// Double differences require at least two satellites.
    #[error("not enough satellites to form double differences ({0})")]
    NotEnoughSatellites(usize),

    /// Geometric range between rover and satellite vanished:
    /// colocated point, physically impossible.
    #[error("zero geometric range to {0}")]
    ZeroRange(SV),

    #[error("wavelength must be strictly positive")]
    NonPositiveWavelength,

    /// Weight model down weighting factor vanishes or turns negative at this
    /// elevation: at or below the horizon (sine), at zenith (cosine).
    #[error("{0}: invalid elevation angle for weight model")]
    InvalidElevation(SV),

    #[error("observation noise must be strictly positive")]
    NonPositiveSigma,

    /// Normal matrix is rank deficient: not enough observations for the
    /// number of unknowns, or degenerate geometry.
    #[error("singular normal matrix")]
    SingularNormalMatrix,

    /// Fixed solution requires one integer ambiguity per non reference satellite.
    #[error("missing integer ambiguity for {0}")]
    MissingAmbiguity(SV),
}
