/// Speed of light in m.s⁻¹
pub const SPEED_OF_LIGHT_M_S: f64 = 299_792_458.0;

/// Ranges below this value are considered null (meters)
pub(crate) const MIN_RANGE_M: f64 = 1.0E-6;
