//! Shared error type used across submodules.

use thiserror::Error;

use crate::math::Scalar;
use crate::transducer::LayerRole;

/// Top-level error type for the crate.
#[derive(Debug, Error)]
pub enum MasonError {
    /// Raised when simulation parameters are invalid or incomplete.
    #[error("configuration error: {0}")]
    Configuration(String),
    /// Raised when layer-role keywords are not recognized.
    #[error("unrecognized layer keywords: {}", .0.join(", "))]
    UnknownLayerKeys(Vec<String>),
    /// Raised when layer roles are left without a material.
    #[error("missing layer keywords: {}", .0.join(", "))]
    MissingLayerKeys(Vec<String>),
    /// Raised when a material name is not present in the material table.
    #[error("material `{0}` not found in material table")]
    MaterialNotFound(String),
    /// Raised when a layer is neither strictly circular nor strictly rectangular.
    #[error("geometry of layer {role} is neither strictly circular nor strictly rectangular")]
    GeometryAmbiguity {
        /// Offending layer.
        role: LayerRole,
    },
    /// Raised when a division by zero or a non-finite value appears in the pipeline.
    #[error("numeric degeneracy in {stage} at {frequency_hz} Hz")]
    NumericDegeneracy {
        /// Pipeline stage that produced the degenerate value.
        stage: &'static str,
        /// Frequency sample at which it occurred.
        frequency_hz: Scalar,
    },
    /// Raised when a material table source is malformed.
    #[error("material table line {line}: {message}")]
    MaterialTable {
        /// One-based line number in the source.
        line: usize,
        /// Description of the problem.
        message: String,
    },
    /// Wraps I/O failures while reading input files.
    #[error(transparent)]
    Io(#[from] std::io::Error),
    /// Wraps CSV decoding failures in a material table.
    #[error(transparent)]
    Csv(#[from] csv::Error),
    /// Wraps TOML parse failures.
    #[error(transparent)]
    Toml(#[from] toml::de::Error),
    /// Wraps JSON parse failures.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl MasonError {
    pub(crate) fn degenerate(stage: &'static str, frequency_hz: Scalar) -> Self {
        Self::NumericDegeneracy {
            stage,
            frequency_hz,
        }
    }
}
