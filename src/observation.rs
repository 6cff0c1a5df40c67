//! Raw receiver observations and observation vector builder
use std::collections::HashMap;

use itertools::Itertools;
use log::trace;
use nalgebra::DVector;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::prelude::{Error, SV};

/// Receiver of the baseline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Receiver {
    /// Reference receiver, at known coordinates
    Base,
    /// Receiver whose coordinates are to be determined
    Rover,
}

impl std::fmt::Display for Receiver {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::Base => write!(f, "base"),
            Self::Rover => write!(f, "rover"),
        }
    }
}

/// Observable used to form the raw observation vector
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Observable {
    /// Carrier phase in cycles
    PhaseCycles,
    /// Pseudo range in meters
    PseudoRangeMeters,
}

/// Simultaneous measurement of one satellite by one receiver.
/// Phase is expressed in cycles: it must be scaled by the wavelength
/// before being mixed with metric quantities.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Observation {
    /// Pseudo range [m]
    pub pseudo_range_m: f64,
    /// Carrier phase [cycles]
    pub phase_cycles: f64,
}

impl Observation {
    pub fn new(pseudo_range_m: f64, phase_cycles: f64) -> Self {
        Self {
            pseudo_range_m,
            phase_cycles,
        }
    }

    /// Returns the value of requested [Observable]
    pub fn value(&self, observable: Observable) -> f64 {
        match observable {
            Observable::PhaseCycles => self.phase_cycles,
            Observable::PseudoRangeMeters => self.pseudo_range_m,
        }
    }
}

/// [Observation]s of one epoch, per [Receiver] and [SV].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Observations {
    inner: HashMap<(Receiver, SV), Observation>,
}

impl Observations {
    /// Insert (or replace) an [Observation]
    pub fn insert(&mut self, receiver: Receiver, sv: SV, observation: Observation) {
        self.inner.insert((receiver, sv), observation);
    }

    /// Copies and returns [Observations] with one more [Observation]
    pub fn with(mut self, receiver: Receiver, sv: SV, observation: Observation) -> Self {
        self.insert(receiver, sv, observation);
        self
    }

    /// Copies and returns [Observations] with base and rover [Observation]s of this [SV]
    pub fn with_pair(self, sv: SV, base: Observation, rover: Observation) -> Self {
        self.with(Receiver::Base, sv, base)
            .with(Receiver::Rover, sv, rover)
    }

    pub fn get(&self, receiver: Receiver, sv: SV) -> Option<&Observation> {
        self.inner.get(&(receiver, sv))
    }

    /// Total number of (receiver, satellite) observations
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Distinct observed [SV]s, sorted
    pub fn satellites(&self) -> Vec<SV> {
        self.inner.keys().map(|(_, sv)| *sv).unique().sorted().collect()
    }

    /// Builds the raw observation vector `l` of length 2N, interleaved
    /// (base₁, rover₁, base₂, rover₂, ...) following the provided satellite ordering.
    pub fn raw_vector(&self, satellites: &[SV], observable: Observable) -> Result<DVector<f64>, Error> {
        let size = satellites.len();
        let mut l = DVector::<f64>::zeros(2 * size);

        for (i, sv) in satellites.iter().enumerate() {
            for (offset, receiver) in [Receiver::Base, Receiver::Rover].into_iter().enumerate() {
                let observation = self
                    .get(receiver, *sv)
                    .ok_or(Error::MissingObservation(receiver, *sv))?;

                l[2 * i + offset] = observation.value(observable);
            }
            trace!("{} - l[{}]=({}, {})", sv, i, l[2 * i], l[2 * i + 1]);
        }

        let observed = self.satellites().len();
        if observed != size {
            return Err(Error::DimensionMismatch {
                expected: size,
                found: observed,
            });
        }

        Ok(l)
    }
}
