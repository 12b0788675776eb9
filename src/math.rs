//! Shared numerical primitives.

use num_complex::Complex;

/// Primary scalar type used across the crate.
pub type Scalar = f64;
/// Primary complex scalar type used for impedances.
pub type CScalar = Complex<Scalar>;

/// Imaginary unit `j`.
pub const J: CScalar = Complex::new(0.0, 1.0);

/// Returns `z` when it is finite, `None` when either component is NaN or infinite.
#[inline]
#[must_use]
pub fn finite(z: CScalar) -> Option<CScalar> {
    z.is_finite().then_some(z)
}

/// Area of a circular cross-section with diameter `d`.
#[inline]
#[must_use]
pub fn circular_area(d: Scalar) -> Scalar {
    d * d * std::f64::consts::PI / 4.0
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn unit_circle_area() {
        assert_relative_eq!(circular_area(2.0), std::f64::consts::PI, epsilon = 1.0e-15);
    }

    #[test]
    fn finite_rejects_nan_and_infinity() {
        assert!(finite(CScalar::new(1.0, -2.0)).is_some());
        assert!(finite(CScalar::new(Scalar::NAN, 0.0)).is_none());
        assert!(finite(CScalar::new(0.0, Scalar::INFINITY)).is_none());
    }
}
