//! Convenience re-exports for running transducer simulations.

pub use crate::characteristics::{acoustic_impedance, CharacteristicImpedanceSet, ElectricalPort};
pub use crate::circuits::{
    component::{Capacitor, Component, Transformer},
    fusion::{CircuitFusion, FusionStages},
    mason::{MasonPiezoNetwork, TNetwork, TNetworkSpectrum},
    network::ConnectionKind,
    transmission::{AcousticLine, AcousticLoads, LineChain, TransmissionLineSolver},
};
pub use crate::config::{load_parameters, RawParameters, SimulationParameters};
pub use crate::constants::*;
pub use crate::errors::MasonError;
pub use crate::materials::{MaterialProperties, MaterialTable};
pub use crate::math::{CScalar, Scalar};
pub use crate::simulation::{Orchestrator, SimulationOutcome, Stage, StageObserver, StageReport};
pub use crate::sweep::{mag, mag_db, phase_deg, phase_rad, FrequencyBand, Spectrum};
pub use crate::transducer::{
    CrossSection, Layer, LayerGeometry, LayerMaterials, LayerRole, Side, StackGeometry, StackSlot,
    TransducerStack,
};
