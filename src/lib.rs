#![cfg_attr(docsrs, feature(doc_auto_cfg))]
#![warn(clippy::all, clippy::cargo, clippy::nursery, missing_docs)]
#![doc = include_str!("../README.md")]

/// Physical constants and frequency conversions.
pub mod constants;
/// Scalar and complex aliases shared across the crate.
pub mod math;
/// Acoustic and piezoelectric material properties and the material table.
pub mod materials;
/// Layer roles, geometry and the assembled transducer stack.
pub mod transducer;
/// Characteristic impedances and the electrical port of the piezo.
pub mod characteristics;
/// Transmission lines, Mason T-network and circuit fusion.
pub mod circuits;
/// Frequency band discretization and spectrum post-processing.
pub mod sweep;
/// Simulation parameter files.
pub mod config;
/// End-to-end simulation orchestration.
pub mod simulation;
/// Error types.
pub mod errors;

/// Common exports for downstream crates.
pub mod prelude;
