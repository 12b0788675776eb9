use serde::Serialize;

use crate::math::{finite, CScalar};

/// Connection topology for a pair of impedances.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ConnectionKind {
    /// Series connection (impedances add linearly).
    Series,
    /// Parallel connection (admittances add linearly).
    Parallel,
}

impl ConnectionKind {
    /// Combines two impedances.
    ///
    /// Parallel fusion uses the product-over-sum form `Z1·Z2 / (Z1 + Z2)`.
    /// Returns `None` when the sum vanishes or the result is not finite.
    #[must_use]
    pub fn combine(self, z1: CScalar, z2: CScalar) -> Option<CScalar> {
        match self {
            Self::Series => finite(z1 + z2),
            Self::Parallel => {
                let sum = z1 + z2;
                if sum.norm() == 0.0 {
                    return None;
                }
                finite((z1 * z2) / sum)
            }
        }
    }

    /// Folds a sequence of impedances with this topology. `None` for an empty
    /// sequence or any degenerate step.
    #[must_use]
    pub fn combine_all(self, impedances: impl IntoIterator<Item = CScalar>) -> Option<CScalar> {
        let mut iter = impedances.into_iter();
        let first = iter.next()?;
        iter.try_fold(first, |acc, z| self.combine(acc, z))
    }
}
