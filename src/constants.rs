//! Baseline physical constants and unit helpers.
//!
//! ## References
//!
//! ε₀ follows the CODATA 2018 recommended value:
//! - NIST Reference on Constants, Units, and Uncertainty: <https://physics.nist.gov/cuu/Constants/>

use std::f64::consts::PI;

/// Vacuum permittivity ε₀ in farads per meter (F/m).
/// Approximate value: 8.8541878128 × 10⁻¹² F/m (11 significant figures).
pub const VACUUM_PERMITTIVITY: f64 = 8.854_187_812_8e-12;

/// Hertz per megahertz. Frequency bands are specified in MHz and sampled in Hz.
pub const HZ_PER_MHZ: f64 = 1.0e6;

/// Returns the angular frequency corresponding to a linear frequency `hz`.
#[inline]
#[must_use]
pub fn angular_frequency(hz: f64) -> f64 {
    2.0 * PI * hz
}

/// Converts a frequency in megahertz to hertz.
#[inline]
#[must_use]
pub fn mhz_to_hz(mhz: f64) -> f64 {
    mhz * HZ_PER_MHZ
}
