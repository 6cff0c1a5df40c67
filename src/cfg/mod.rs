#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::prelude::{Carrier, SV};

/// Down weighting factors below this value are rejected:
/// the observation would carry no weight at all.
const MIN_WEIGHT_FACTOR: f64 = 1.0E-6;

/// Elevation dependent down weighting: `variance = σ² / f(elevation)`.
/// Low elevation signals travel longer through the atmosphere and
/// are given less weight.
#[derive(Default, Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum WeightModel {
    /// σ² / sin(elevation)
    #[default]
    Sine,
    /// σ² / cos(elevation)
    Cosine,
    /// σ², whatever the elevation
    Uniform,
}

impl WeightModel {
    /// Down weighting factor f(elevation), elevation in degrees.
    pub(crate) fn factor(&self, elevation_deg: f64) -> f64 {
        match self {
            Self::Sine => elevation_deg.to_radians().sin(),
            Self::Cosine => elevation_deg.to_radians().cos(),
            Self::Uniform => 1.0,
        }
    }

    /// Observation variance, in squared unit of `sigma`.
    /// Returns None when the model does not apply at this elevation:
    /// at or below the horizon (sine), at zenith (cosine).
    pub fn variance(&self, sigma: f64, elevation_deg: f64) -> Option<f64> {
        let factor = self.factor(elevation_deg);
        if factor > MIN_WEIGHT_FACTOR && factor.is_finite() {
            Some(sigma * sigma / factor)
        } else {
            None
        }
    }
}

/// Reference (pivot) satellite selection, for double differencing.
#[derive(Default, Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ReferenceSelection {
    /// Satellite with the highest elevation angle.
    /// On ties, the first in canonical ordering.
    #[default]
    HighestElevation,
    /// Use this satellite
    Fixed(SV),
}

fn default_phase_sigma() -> f64 {
    0.003
}

fn default_code_sigma() -> f64 {
    0.3
}

fn default_code_aided() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize))]
pub struct Config {
    /// Frequency band of the phase observations
    #[cfg_attr(feature = "serde", serde(default))]
    pub carrier: Carrier,
    /// Custom wavelength [m], prevails over the [Carrier] wavelength
    #[cfg_attr(feature = "serde", serde(default))]
    pub wavelength_m: Option<f64>,
    /// One way carrier phase noise [m]
    #[cfg_attr(feature = "serde", serde(default = "default_phase_sigma"))]
    pub phase_sigma_m: f64,
    /// One way pseudo range noise [m]
    #[cfg_attr(feature = "serde", serde(default = "default_code_sigma"))]
    pub code_sigma_m: f64,
    /// Elevation [WeightModel]
    #[cfg_attr(feature = "serde", serde(default))]
    pub weight_model: WeightModel,
    /// Reference satellite selection
    #[cfg_attr(feature = "serde", serde(default))]
    pub reference: ReferenceSelection,
    /// Stack pseudo range double differences under the phase
    /// double differences, when solving float ambiguities.
    /// A single epoch of phase double differences
    /// cannot be solved without them.
    #[cfg_attr(feature = "serde", serde(default = "default_code_aided"))]
    pub code_aided: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            carrier: Carrier::default(),
            wavelength_m: None,
            phase_sigma_m: default_phase_sigma(),
            code_sigma_m: default_code_sigma(),
            weight_model: WeightModel::default(),
            reference: ReferenceSelection::default(),
            code_aided: default_code_aided(),
        }
    }
}

impl Config {
    /// Wavelength [m] in use
    pub fn wavelength(&self) -> f64 {
        self.wavelength_m
            .unwrap_or_else(|| self.carrier.wavelength())
    }

    /// Copies and returns [Config] with desired [Carrier]
    pub fn with_carrier(mut self, carrier: Carrier) -> Self {
        self.carrier = carrier;
        self
    }

    /// Copies and returns [Config] with custom wavelength [m]
    pub fn with_wavelength(mut self, wavelength_m: f64) -> Self {
        self.wavelength_m = Some(wavelength_m);
        self
    }

    /// Copies and returns [Config] with desired [WeightModel]
    pub fn with_weight_model(mut self, model: WeightModel) -> Self {
        self.weight_model = model;
        self
    }

    /// Copies and returns [Config] with desired noise levels [m]
    pub fn with_sigmas(mut self, phase_sigma_m: f64, code_sigma_m: f64) -> Self {
        self.phase_sigma_m = phase_sigma_m;
        self.code_sigma_m = code_sigma_m;
        self
    }

    /// Copies and returns [Config] with desired [ReferenceSelection]
    pub fn with_reference(mut self, reference: ReferenceSelection) -> Self {
        self.reference = reference;
        self
    }

    /// Copies and returns [Config] with pseudo range aiding turned on or off
    pub fn with_code_aiding(mut self, code_aided: bool) -> Self {
        self.code_aided = code_aided;
        self
    }
}
