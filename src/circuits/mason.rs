//! Mason T-network of the piezo slab.

use serde::Serialize;

use crate::characteristics::CharacteristicImpedanceSet;
use crate::errors::MasonError;
use crate::math::{finite, CScalar, Scalar, J};
use crate::sweep::Spectrum;
use crate::transducer::{LayerRole, TransducerStack};

use super::transmission::propagation_constant;

/// Branch impedances of a T-network.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TNetwork {
    /// Series branch facing the top side.
    pub top: CScalar,
    /// Shunt branch joined to the electrical port.
    pub center: CScalar,
    /// Series branch facing the bottom side.
    pub bottom: CScalar,
}

/// Piezo slab as a Mason T-network:
/// `Z_top = Z_bottom = jZ0·tan(βt/2)`, `Z_center = -jZ0 / sin(βt)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MasonPiezoNetwork {
    z0: Scalar,
    sound_speed: Scalar,
    thickness: Scalar,
}

impl MasonPiezoNetwork {
    /// Network for a slab of characteristic impedance `z0`, speed and thickness.
    #[must_use]
    pub fn new(z0: Scalar, sound_speed: Scalar, thickness: Scalar) -> Self {
        Self {
            z0,
            sound_speed,
            thickness,
        }
    }

    /// Network for the piezo layer of `stack`.
    #[must_use]
    pub fn from_stack(stack: &TransducerStack, z0: &CharacteristicImpedanceSet) -> Self {
        let piezo = stack.piezo();
        Self::new(z0.z0(LayerRole::Piezo), piezo.material().sound_speed, piezo.length())
    }

    /// Branches at frequency `hz`. An exactly vanishing `sin(βt)` is degenerate.
    pub fn at(&self, hz: Scalar) -> Result<TNetwork, MasonError> {
        let bt = propagation_constant(hz, self.sound_speed) * self.thickness;
        let sin = bt.sin();
        if sin == 0.0 {
            return Err(MasonError::degenerate("mason center branch", hz));
        }
        let side = finite(J * self.z0 * (bt / 2.0).tan())
            .ok_or_else(|| MasonError::degenerate("mason side branch", hz))?;
        let center = finite(-J * self.z0 / sin)
            .ok_or_else(|| MasonError::degenerate("mason center branch", hz))?;
        Ok(TNetwork {
            top: side,
            center,
            bottom: side,
        })
    }

    /// Branches over `frequencies`.
    pub fn spectrum(&self, frequencies: &[Scalar]) -> Result<TNetworkSpectrum, MasonError> {
        let branches = frequencies
            .iter()
            .map(|&hz| self.at(hz))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(TNetworkSpectrum::from_parts(frequencies.to_vec(), branches))
    }
}

/// One T-network per frequency sample.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TNetworkSpectrum {
    frequencies: Vec<Scalar>,
    branches: Vec<TNetwork>,
}

impl TNetworkSpectrum {
    pub(crate) fn from_parts(frequencies: Vec<Scalar>, branches: Vec<TNetwork>) -> Self {
        debug_assert_eq!(frequencies.len(), branches.len());
        Self {
            frequencies,
            branches,
        }
    }

    /// Frequency samples in Hz.
    #[must_use]
    pub fn frequencies(&self) -> &[Scalar] {
        &self.frequencies
    }

    /// Branch triples in frequency order.
    #[must_use]
    pub fn branches(&self) -> &[TNetwork] {
        &self.branches
    }

    /// Top branch as a spectrum.
    #[must_use]
    pub fn top(&self) -> Spectrum {
        self.branch(|t| t.top)
    }

    /// Center branch as a spectrum.
    #[must_use]
    pub fn center(&self) -> Spectrum {
        self.branch(|t| t.center)
    }

    /// Bottom branch as a spectrum.
    #[must_use]
    pub fn bottom(&self) -> Spectrum {
        self.branch(|t| t.bottom)
    }

    fn branch(&self, pick: impl Fn(&TNetwork) -> CScalar) -> Spectrum {
        Spectrum::from_parts(
            self.frequencies.clone(),
            self.branches.iter().map(pick).collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn side_branches_are_equal_and_reactive() {
        let net = MasonPiezoNetwork::new(250.0, 2260.0, 200.0e-6);
        let t = net.at(2.0e6).unwrap();
        assert_eq!(t.top, t.bottom);
        assert_relative_eq!(t.top.re, 0.0);
        let bt = 2.0 * std::f64::consts::PI * 2.0e6 / 2260.0 * 200.0e-6;
        assert_relative_eq!(t.top.im, 250.0 * (bt / 2.0).tan(), max_relative = 1e-12);
        assert_relative_eq!(t.center.im, -250.0 / bt.sin(), max_relative = 1e-12);
    }

    #[test]
    fn center_branch_diverges_at_half_wave_resonance() {
        let (v, t) = (2260.0, 200.0e-6);
        let net = MasonPiezoNetwork::new(250.0, v, t);
        let resonance = v / (2.0 * t);
        match net.at(resonance) {
            Ok(branches) => assert!(branches.center.norm() > 1.0e12 * 250.0),
            Err(err) => assert!(matches!(err, MasonError::NumericDegeneracy { .. })),
        }
        let off = net.at(0.5 * resonance).unwrap();
        assert!(off.center.norm() < 1.0e3);
    }

    #[test]
    fn spectrum_keeps_sample_order() {
        let net = MasonPiezoNetwork::new(250.0, 2260.0, 200.0e-6);
        let freqs = [1.0e6, 2.0e6, 3.0e6];
        let s = net.spectrum(&freqs).unwrap();
        assert_eq!(s.branches().len(), 3);
        assert_eq!(s.center().frequencies(), &freqs);
        assert_eq!(s.top().values()[2], net.at(3.0e6).unwrap().top);
    }
}
