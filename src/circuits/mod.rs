//! Acoustic and electrical circuit primitives of the Mason model.

/// Lumped component definitions and traits.
pub mod component;
/// Series and parallel impedance combination.
pub mod network;
/// Lossless acoustic transmission lines and per-side load reduction.
pub mod transmission;
/// Mason T-network of the piezo slab.
pub mod mason;
/// Fusion of acoustic loads, T-network, transformer and static capacitance.
pub mod fusion;

pub use component::{Capacitor, Component, Transformer};
pub use fusion::{CircuitFusion, FusionStages};
pub use mason::{MasonPiezoNetwork, TNetwork, TNetworkSpectrum};
pub use network::ConnectionKind;
pub use transmission::{AcousticLine, AcousticLoads, LineChain, TransmissionLineSolver};
