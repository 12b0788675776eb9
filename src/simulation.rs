//! End-to-end orchestration of a transducer impedance simulation.

use std::fmt;
use std::time::{Duration, Instant};

use crate::characteristics::CharacteristicImpedanceSet;
use crate::circuits::fusion::{CircuitFusion, FusionStages};
use crate::circuits::mason::{MasonPiezoNetwork, TNetworkSpectrum};
use crate::circuits::transmission::{AcousticLoads, TransmissionLineSolver};
use crate::config::SimulationParameters;
use crate::errors::MasonError;
use crate::materials::MaterialTable;
use crate::sweep::Spectrum;
use crate::transducer::TransducerStack;

/// Pipeline stages in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    /// Material lookup and stack assembly.
    Stack,
    /// Characteristic impedances, C0 and N.
    Characteristics,
    /// Transmission-line reduction of both halves.
    TransmissionLines,
    /// Piezo T-network.
    MasonNetwork,
    /// Circuit fusion into the electrical impedance.
    Fusion,
}

impl Stage {
    /// Short label used in log events.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Stack => "stack",
            Self::Characteristics => "characteristics",
            Self::TransmissionLines => "transmission_lines",
            Self::MasonNetwork => "mason_network",
            Self::Fusion => "fusion",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Progress notification emitted after each completed stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageReport {
    /// Stage that just finished.
    pub stage: Stage,
    /// Wall time spent in the stage.
    pub elapsed: Duration,
}

/// Callback receiving stage reports.
pub type StageObserver = Box<dyn Fn(&StageReport) + Send + Sync>;

/// Every artifact produced by a run.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationOutcome {
    /// Assembled stack.
    pub stack: TransducerStack,
    /// Characteristic impedances and electrical port.
    pub characteristics: CharacteristicImpedanceSet,
    /// Equivalent loads on both piezo faces.
    pub loads: AcousticLoads,
    /// Piezo T-network per frequency.
    pub piezo: TNetworkSpectrum,
    /// Intermediate fusion spectra.
    pub stages: FusionStages,
    /// Electrical input impedance.
    pub electrical: Spectrum,
}

/// Runs the stack → impedances → loads/T-network → fusion pipeline against a
/// material table.
pub struct Orchestrator<'a> {
    materials: &'a MaterialTable,
    observer: Option<StageObserver>,
}

impl fmt::Debug for Orchestrator<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Orchestrator")
            .field("materials", &self.materials.len())
            .field("observer", &self.observer.is_some())
            .finish()
    }
}

impl<'a> Orchestrator<'a> {
    /// Orchestrator resolving material names in `materials`.
    #[must_use]
    pub fn new(materials: &'a MaterialTable) -> Self {
        Self {
            materials,
            observer: None,
        }
    }

    /// Installs a callback notified after every stage.
    #[must_use]
    pub fn with_observer(mut self, observer: StageObserver) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Electrical input impedance over the parameter band.
    pub fn run(&self, params: &SimulationParameters) -> Result<Spectrum, MasonError> {
        self.run_detailed(params).map(|outcome| outcome.electrical)
    }

    /// Runs the pipeline and keeps every intermediate artifact.
    pub fn run_detailed(&self, params: &SimulationParameters) -> Result<SimulationOutcome, MasonError> {
        let span = tracing::info_span!("mason_simulation", piezo = %params.materials.piezo);
        let _guard = span.enter();
        let started = Instant::now();

        let stack = self.stage(Stage::Stack, || {
            TransducerStack::build(&params.geometry, &params.materials, self.materials)
        })?;
        let characteristics =
            self.stage(Stage::Characteristics, || CharacteristicImpedanceSet::from_stack(&stack))?;
        let port = characteristics.electrical();
        tracing::info!(c0 = port.c0, n = port.n, "electrical port");

        let frequencies = params.band.frequencies();
        let loads = self.stage(Stage::TransmissionLines, || {
            TransmissionLineSolver::new(&stack, &characteristics)?.solve(&frequencies)
        })?;
        let piezo = self.stage(Stage::MasonNetwork, || {
            MasonPiezoNetwork::from_stack(&stack, &characteristics).spectrum(&frequencies)
        })?;
        let stages = self.stage(Stage::Fusion, || CircuitFusion::new(port).stages(&loads, &piezo))?;

        tracing::info!(
            samples = frequencies.len(),
            elapsed_s = started.elapsed().as_secs_f64(),
            "simulation finished"
        );
        let electrical = stages.electrical.clone();
        Ok(SimulationOutcome {
            stack,
            characteristics,
            loads,
            piezo,
            stages,
            electrical,
        })
    }

    fn stage<T>(
        &self,
        stage: Stage,
        work: impl FnOnce() -> Result<T, MasonError>,
    ) -> Result<T, MasonError> {
        let span = tracing::info_span!("stage", stage = stage.label());
        let _guard = span.enter();
        let started = Instant::now();
        let result = work();
        let elapsed = started.elapsed();
        match &result {
            Ok(_) => {
                tracing::debug!(stage = stage.label(), elapsed_s = elapsed.as_secs_f64(), "stage complete");
                if let Some(observer) = &self.observer {
                    observer(&StageReport { stage, elapsed });
                }
            }
            Err(err) => tracing::warn!(stage = stage.label(), error = %err, "stage failed"),
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use approx::assert_relative_eq;

    use super::*;
    use crate::sweep::FrequencyBand;
    use crate::transducer::tests::{sample_geometry, sample_materials, sample_table};
    use crate::transducer::LayerMaterials;

    fn params() -> SimulationParameters {
        SimulationParameters {
            band: FrequencyBand::new(1.0, 60.0).unwrap(),
            geometry: sample_geometry(),
            materials: sample_materials(),
        }
    }

    #[test]
    fn spectrum_covers_the_band() {
        let table = sample_table();
        let z = Orchestrator::new(&table).run(&params()).unwrap();
        assert_eq!(z.len(), 59);
        assert_eq!(z.frequencies()[0], 1.0e6);
        assert!(z.values().iter().all(|v| v.re.is_finite() && v.im.is_finite()));
    }

    #[test]
    fn repeated_runs_are_bit_identical() {
        let table = sample_table();
        let orchestrator = Orchestrator::new(&table);
        let first = orchestrator.run(&params()).unwrap();
        let second = orchestrator.run(&params()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn swapping_top_and_bottom_keeps_the_magnitude() {
        let table = sample_table();
        let geometry = crate::transducer::StackGeometry {
            thickness_substrate: 0.0,
            ..sample_geometry()
        };
        let forward = SimulationParameters {
            geometry,
            ..params()
        };
        let m = &forward.materials;
        let swapped = SimulationParameters {
            materials: LayerMaterials {
                top_load: m.bottom_load.clone(),
                top_electrode: m.bottom_electrode.clone(),
                piezo: m.piezo.clone(),
                bottom_electrode: m.top_electrode.clone(),
                substrate: m.substrate.clone(),
                bottom_load: m.top_load.clone(),
            },
            ..forward.clone()
        };

        let orchestrator = Orchestrator::new(&table);
        let a = orchestrator.run(&forward).unwrap().magnitude();
        let b = orchestrator.run(&swapped).unwrap().magnitude();
        for (x, y) in a.iter().zip(&b) {
            assert_relative_eq!(*x, *y, max_relative = 1.0e-7);
        }
    }

    #[test]
    fn unknown_material_stops_the_run() {
        let table = sample_table();
        let mut p = params();
        p.materials.substrate = "Unobtainium".into();
        let err = Orchestrator::new(&table).run(&p).unwrap_err();
        assert!(matches!(err, MasonError::MaterialNotFound(name) if name == "Unobtainium"));
    }

    #[test]
    fn detailed_run_exposes_consistent_artifacts() {
        let table = sample_table();
        let outcome = Orchestrator::new(&table).run_detailed(&params()).unwrap();
        assert_eq!(outcome.electrical, outcome.stages.electrical);
        assert_eq!(outcome.loads.top.len(), 59);
        assert_eq!(outcome.piezo.branches().len(), 59);
        assert!(outcome.characteristics.electrical().c0 > 0.0);
    }

    #[test]
    fn observer_sees_every_stage_in_order() {
        let table = sample_table();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let orchestrator = Orchestrator::new(&table).with_observer(Box::new(move |report: &StageReport| {
            sink.lock().unwrap().push(report.stage);
        }));
        orchestrator.run(&params()).unwrap();
        assert_eq!(
            *seen.lock().unwrap(),
            vec![
                Stage::Stack,
                Stage::Characteristics,
                Stage::TransmissionLines,
                Stage::MasonNetwork,
                Stage::Fusion,
            ]
        );
    }
}
