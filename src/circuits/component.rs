use crate::math::{CScalar, Scalar, J};

/// Trait implemented by all circuit components that can provide a frequency-domain impedance.
pub trait Component {
    /// Returns the component's impedance for an angular frequency `omega` (rad/s).
    fn impedance(&self, omega: Scalar) -> CScalar;

    /// Human-readable identifier (e.g. `C0`).
    fn name(&self) -> &str;
}

/// Lumped capacitor model (ideal).
#[derive(Debug, Clone, PartialEq)]
pub struct Capacitor {
    name: String,
    capacitance: Scalar,
}

impl Capacitor {
    /// Creates a capacitor.
    #[must_use]
    pub fn new(name: impl Into<String>, capacitance_f: Scalar) -> Self {
        Self {
            name: name.into(),
            capacitance: capacitance_f,
        }
    }

    /// Returns the capacitance magnitude in farads.
    #[must_use]
    pub fn capacitance(&self) -> Scalar {
        self.capacitance
    }
}

impl Component for Capacitor {
    /// `1 / (jωC)`; infinite for ω = 0 or C = 0.
    fn impedance(&self, omega: Scalar) -> CScalar {
        let jwc = J * omega * self.capacitance;
        if jwc.norm() == 0.0 {
            CScalar::new(Scalar::INFINITY, 0.0)
        } else {
            jwc.inv()
        }
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Ideal electromechanical transformer with turns ratio `N` (acoustic : electric = N : 1).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transformer {
    ratio: Scalar,
}

impl Transformer {
    /// Creates a transformer with ratio `ratio`.
    #[must_use]
    pub const fn new(ratio: Scalar) -> Self {
        Self { ratio }
    }

    /// Turns ratio.
    #[must_use]
    pub const fn ratio(&self) -> Scalar {
        self.ratio
    }

    /// Refers an acoustic-side impedance to the electrical side, `Z / N²`.
    /// Returns `None` when the ratio is zero or the result is not finite.
    #[must_use]
    pub fn to_electrical(&self, z_acoustic: CScalar) -> Option<CScalar> {
        let n2 = self.ratio * self.ratio;
        if n2 == 0.0 {
            return None;
        }
        let z = z_acoustic / n2;
        z.is_finite().then_some(z)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn capacitor_impedance_is_negative_reactance() {
        let c = Capacitor::new("C0", 1.0e-9);
        let z = c.impedance(1.0e6);
        assert_relative_eq!(z.re, 0.0, epsilon = 1e-12);
        assert_relative_eq!(z.im, -1.0e3, max_relative = 1e-12);
        assert_eq!(c.name(), "C0");
        assert_eq!(c.capacitance(), 1.0e-9);
    }

    #[test]
    fn capacitor_is_open_at_dc() {
        let z = Capacitor::new("C0", 1.0e-9).impedance(0.0);
        assert!(z.re.is_infinite());
    }

    #[test]
    fn transformer_divides_by_ratio_squared() {
        let t = Transformer::new(2.0);
        assert_eq!(t.ratio(), 2.0);
        let z = t.to_electrical(CScalar::new(8.0, -4.0)).unwrap();
        assert_relative_eq!(z.re, 2.0);
        assert_relative_eq!(z.im, -1.0);
        assert!(Transformer::new(0.0).to_electrical(CScalar::new(1.0, 0.0)).is_none());
    }
}
