//! Frequency band discretization, spectra and post-processing helpers.

use num_complex::Complex;
use serde::Serialize;

use crate::constants::{mhz_to_hz, HZ_PER_MHZ};
use crate::errors::MasonError;
use crate::math::{CScalar, Scalar};

/// Simulation band in MHz, sampled at 1 MHz steps with the upper bound excluded.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FrequencyBand {
    lower_mhz: Scalar,
    upper_mhz: Scalar,
}

impl FrequencyBand {
    /// Creates a band. Requires `0 < lower < upper`, both finite.
    pub fn new(lower_mhz: Scalar, upper_mhz: Scalar) -> Result<Self, MasonError> {
        if !(lower_mhz.is_finite() && upper_mhz.is_finite()) || lower_mhz <= 0.0 || upper_mhz <= lower_mhz {
            return Err(MasonError::Configuration(format!(
                "invalid frequency band ({lower_mhz}, {upper_mhz}) MHz"
            )));
        }
        Ok(Self {
            lower_mhz,
            upper_mhz,
        })
    }

    /// Lower bound in MHz.
    #[must_use]
    pub fn lower_mhz(&self) -> Scalar {
        self.lower_mhz
    }

    /// Upper bound (exclusive) in MHz.
    #[must_use]
    pub fn upper_mhz(&self) -> Scalar {
        self.upper_mhz
    }

    /// Number of samples in the band.
    #[must_use]
    pub fn len(&self) -> usize {
        let (start, stop) = self.bounds_hz();
        ((stop - start) / HZ_PER_MHZ).ceil().max(0.0) as usize
    }

    /// True when the band holds no samples.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Integer-Hz samples from `lower·1e6` up to, but excluding, `upper·1e6`.
    #[must_use]
    pub fn frequencies(&self) -> Vec<Scalar> {
        let (start, _) = self.bounds_hz();
        (0..self.len())
            .map(|i| start + HZ_PER_MHZ * i as Scalar)
            .collect()
    }

    // Both bounds snapped to whole Hz, so MHz rounding noise cannot add a sample.
    fn bounds_hz(&self) -> (Scalar, Scalar) {
        (
            mhz_to_hz(self.lower_mhz).round(),
            mhz_to_hz(self.upper_mhz).round(),
        )
    }
}

/// Complex quantity sampled over a frequency band.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Spectrum {
    frequencies: Vec<Scalar>,
    values: Vec<CScalar>,
}

impl Spectrum {
    pub(crate) fn from_parts(frequencies: Vec<Scalar>, values: Vec<CScalar>) -> Self {
        debug_assert_eq!(frequencies.len(), values.len());
        Self {
            frequencies,
            values,
        }
    }

    /// Evaluates `f` at every frequency, stopping at the first error.
    pub fn try_from_fn<F>(frequencies: &[Scalar], mut f: F) -> Result<Self, MasonError>
    where
        F: FnMut(Scalar) -> Result<CScalar, MasonError>,
    {
        let values = frequencies
            .iter()
            .map(|&hz| f(hz))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            frequencies: frequencies.to_vec(),
            values,
        })
    }

    /// Combines two spectra sample by sample. Both must share one frequency grid.
    pub fn try_zip_with<F>(&self, other: &Self, mut f: F) -> Result<Self, MasonError>
    where
        F: FnMut(Scalar, CScalar, CScalar) -> Result<CScalar, MasonError>,
    {
        if self.frequencies != other.frequencies {
            return Err(MasonError::Configuration(
                "spectra sampled on different frequency grids".into(),
            ));
        }
        let values = self
            .frequencies
            .iter()
            .zip(self.values.iter().zip(&other.values))
            .map(|(&hz, (&a, &b))| f(hz, a, b))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            frequencies: self.frequencies.clone(),
            values,
        })
    }

    /// Maps every sample through `f`, stopping at the first error.
    pub fn try_map<F>(&self, mut f: F) -> Result<Self, MasonError>
    where
        F: FnMut(Scalar, CScalar) -> Result<CScalar, MasonError>,
    {
        let values = self
            .iter()
            .map(|(hz, z)| f(hz, z))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            frequencies: self.frequencies.clone(),
            values,
        })
    }

    /// Frequency samples in Hz.
    #[must_use]
    pub fn frequencies(&self) -> &[Scalar] {
        &self.frequencies
    }

    /// Complex values, one per frequency.
    #[must_use]
    pub fn values(&self) -> &[CScalar] {
        &self.values
    }

    /// Number of samples.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True when the spectrum holds no samples.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// `(frequency, value)` pairs in frequency order.
    pub fn iter(&self) -> impl Iterator<Item = (Scalar, CScalar)> + '_ {
        self.frequencies.iter().copied().zip(self.values.iter().copied())
    }

    /// Splits into the frequency and value arrays.
    #[must_use]
    pub fn into_pair(self) -> (Vec<Scalar>, Vec<CScalar>) {
        (self.frequencies, self.values)
    }

    /// |Z| per sample.
    #[must_use]
    pub fn magnitude(&self) -> Vec<Scalar> {
        mag(self.values.iter().copied())
    }

    /// Phase in degrees per sample.
    #[must_use]
    pub fn phase_deg(&self) -> Vec<Scalar> {
        phase_deg(self.values.iter().copied())
    }
}

/// Magnitude of complex sequence.
#[must_use]
pub fn mag(values: impl IntoIterator<Item = Complex<Scalar>>) -> Vec<Scalar> {
    values.into_iter().map(|v| v.norm()).collect()
}

/// Magnitude in dB (20*log10(|x|)), clamping very small values.
#[must_use]
pub fn mag_db(values: impl IntoIterator<Item = Complex<Scalar>>) -> Vec<Scalar> {
    const MIN: Scalar = 1e-300;
    values
        .into_iter()
        .map(|v| 20.0 * (v.norm().max(MIN)).log10())
        .collect()
}

/// Phase in radians of complex sequence.
#[must_use]
pub fn phase_rad(values: impl IntoIterator<Item = Complex<Scalar>>) -> Vec<Scalar> {
    values.into_iter().map(|v| v.arg()).collect()
}

/// Phase in degrees of complex sequence.
#[must_use]
pub fn phase_deg(values: impl IntoIterator<Item = Complex<Scalar>>) -> Vec<Scalar> {
    phase_rad(values).into_iter().map(|r| r.to_degrees()).collect()
}
