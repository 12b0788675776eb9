//! Lossless acoustic transmission lines and the per-side load reduction.

use crate::characteristics::CharacteristicImpedanceSet;
use crate::constants::angular_frequency;
use crate::errors::MasonError;
use crate::math::{finite, CScalar, Scalar, J};
use crate::sweep::Spectrum;
use crate::transducer::{Side, TransducerStack};

/// Phase constant `β = 2πf / v` of a lossless line (attenuation α = 0).
#[inline]
#[must_use]
pub fn propagation_constant(hz: Scalar, sound_speed: Scalar) -> Scalar {
    angular_frequency(hz) / sound_speed
}

/// Uniform lossless acoustic line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AcousticLine {
    /// Characteristic impedance ρ·v·A.
    pub z0: Scalar,
    /// Sound speed in m/s.
    pub sound_speed: Scalar,
    /// Physical length in meters.
    pub length_m: Scalar,
}

impl AcousticLine {
    /// Line with the given characteristic impedance, speed and length.
    #[must_use]
    pub fn new(z0: Scalar, sound_speed: Scalar, length_m: Scalar) -> Self {
        Self {
            z0,
            sound_speed,
            length_m,
        }
    }

    /// Input impedance with load `z_load` at frequency `hz`:
    /// `Z0·(ZL + jZ0·tan βl) / (Z0 + jZL·tan βl)`.
    /// Returns `None` if the denominator vanishes or the result is not finite.
    #[must_use]
    pub fn input_impedance(&self, hz: Scalar, z_load: CScalar) -> Option<CScalar> {
        let z0 = CScalar::new(self.z0, 0.0);
        let t = (propagation_constant(hz, self.sound_speed) * self.length_m).tan();
        let den = z0 + J * z_load * t;
        if den.norm() == 0.0 {
            return None;
        }
        finite(z0 * (z_load + J * z0 * t) / den)
    }
}

/// Boundary impedance plus the lines crossed on the way to the piezo.
#[derive(Debug, Clone, PartialEq)]
pub struct LineChain {
    side: Side,
    boundary: Scalar,
    lines: Vec<AcousticLine>,
}

impl LineChain {
    /// Builds the chain of `side`.
    ///
    /// The outermost layer is the acoustic boundary. Every layer from there up
    /// to and including the electrode becomes a folded line; the number of
    /// folds is the electrode's position in the boundary-to-piezo ordering.
    pub fn from_stack(
        stack: &TransducerStack,
        z0: &CharacteristicImpedanceSet,
        side: Side,
    ) -> Result<Self, MasonError> {
        let chain = stack.side_chain(side);
        let boundary = chain
            .first()
            .ok_or_else(|| MasonError::Configuration(format!("{side:?} side has no layers")))?;
        let folds = chain
            .iter()
            .position(|layer| layer.role().is_electrode())
            .ok_or_else(|| MasonError::Configuration(format!("{side:?} side has no electrode")))?;
        let lines = chain[1..=folds]
            .iter()
            .map(|layer| {
                AcousticLine::new(z0.z0(layer.role()), layer.material().sound_speed, layer.length())
            })
            .collect();
        Ok(Self {
            side,
            boundary: z0.z0(boundary.role()),
            lines,
        })
    }

    /// Which half the chain belongs to.
    #[must_use]
    pub fn side(&self) -> Side {
        self.side
    }

    /// Lines in folding order.
    #[must_use]
    pub fn lines(&self) -> &[AcousticLine] {
        &self.lines
    }

    /// Load seen at the piezo face at frequency `hz`.
    pub fn load_at(&self, hz: Scalar) -> Result<CScalar, MasonError> {
        self.lines
            .iter()
            .try_fold(CScalar::new(self.boundary, 0.0), |z_load, line| {
                line.input_impedance(hz, z_load)
            })
            .ok_or_else(|| MasonError::degenerate("transmission line", hz))
    }
}

/// Equivalent acoustic loads seen by the piezo on both faces.
#[derive(Debug, Clone, PartialEq)]
pub struct AcousticLoads {
    /// Load on the top face.
    pub top: Spectrum,
    /// Load on the bottom face.
    pub bottom: Spectrum,
}

impl AcousticLoads {
    /// Load spectrum for `side`.
    #[must_use]
    pub fn get(&self, side: Side) -> &Spectrum {
        match side {
            Side::Top => &self.top,
            Side::Bottom => &self.bottom,
        }
    }
}

/// Reduces each half of the stack to a single load per frequency.
#[derive(Debug, Clone, PartialEq)]
pub struct TransmissionLineSolver {
    top: LineChain,
    bottom: LineChain,
}

impl TransmissionLineSolver {
    /// Prepares both chains.
    pub fn new(stack: &TransducerStack, z0: &CharacteristicImpedanceSet) -> Result<Self, MasonError> {
        Ok(Self {
            top: LineChain::from_stack(stack, z0, Side::Top)?,
            bottom: LineChain::from_stack(stack, z0, Side::Bottom)?,
        })
    }

    /// Chain for `side`.
    #[must_use]
    pub fn chain(&self, side: Side) -> &LineChain {
        match side {
            Side::Top => &self.top,
            Side::Bottom => &self.bottom,
        }
    }

    /// Evaluates both loads over `frequencies`.
    pub fn solve(&self, frequencies: &[Scalar]) -> Result<AcousticLoads, MasonError> {
        Ok(AcousticLoads {
            top: Spectrum::try_from_fn(frequencies, |hz| self.top.load_at(hz))?,
            bottom: Spectrum::try_from_fn(frequencies, |hz| self.bottom.load_at(hz))?,
        })
    }
}
