#![doc = include_str!("../README.md")]
#![cfg_attr(docrs, feature(doc_cfg))]

extern crate gnss_rs as gnss;

// private modules
mod carrier;
mod cfg;
mod constants;
mod differencing;
mod error;
mod geometry;
mod observation;
mod position;
mod satellite;
mod solution;
mod solver;

#[cfg(test)]
mod tests;

// prelude
pub mod prelude {
    pub use crate::carrier::Carrier;
    pub use crate::cfg::{Config, ReferenceSelection, WeightModel};
    pub use crate::constants::SPEED_OF_LIGHT_M_S;
    pub use crate::differencing::DifferencingMatrices;
    pub use crate::error::Error;
    pub use crate::geometry::{
        double_difference_partials, geometric_range, predicted_double_difference_m, DesignMatrix,
    };
    pub use crate::observation::{Observable, Observation, Observations, Receiver};
    pub use crate::position::Position;
    pub use crate::satellite::Satellite;
    pub use crate::solution::{Ambiguity, AmbiguityPair, Solution, SolutionType};
    pub use crate::solver::{Input, Solver};
    // re-export
    pub use gnss::prelude::{Constellation, SV};
    pub use hifitime::Epoch;
    pub use nalgebra::Vector3;
}

pub use error::Error;
