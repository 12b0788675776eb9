//! Fusion of the acoustic loads, the piezo T-network, the transformer and the
//! static capacitance into the electrical input impedance.

use crate::characteristics::ElectricalPort;
use crate::constants::angular_frequency;
use crate::errors::MasonError;
use crate::math::{finite, CScalar, Scalar};
use crate::sweep::Spectrum;

use super::component::{Capacitor, Component, Transformer};
use super::mason::TNetworkSpectrum;
use super::network::ConnectionKind;
use super::transmission::AcousticLoads;

/// Every intermediate spectrum of the fusion chain, in evaluation order.
#[derive(Debug, Clone, PartialEq)]
pub struct FusionStages {
    /// `Z_top + Z_TL_top`.
    pub top_total: Spectrum,
    /// `Z_bottom + Z_TL_bottom`.
    pub bottom_total: Spectrum,
    /// `top_total ∥ bottom_total`.
    pub parallel: Spectrum,
    /// Acoustic transducer impedance `Z_center + parallel`.
    pub acoustic: Spectrum,
    /// Acoustic impedance referred through the transformer, `Z_ac / N²`.
    pub electrical_raw: Spectrum,
    /// Static capacitor impedance `1 / (j2πf·C0)`.
    pub capacitive: Spectrum,
    /// `electrical_raw - capacitive` (negative series capacitor).
    pub series: Spectrum,
    /// Final electrical impedance `capacitive ∥ series`.
    pub electrical: Spectrum,
}

/// Combines the pieces of the Mason circuit.
#[derive(Debug, Clone, PartialEq)]
pub struct CircuitFusion {
    capacitor: Capacitor,
    transformer: Transformer,
}

impl CircuitFusion {
    /// Fusion for the given electrical port.
    #[must_use]
    pub fn new(port: ElectricalPort) -> Self {
        Self {
            capacitor: Capacitor::new("C0", port.c0),
            transformer: Transformer::new(port.n),
        }
    }

    /// Runs the whole chain and keeps every stage.
    pub fn stages(
        &self,
        loads: &AcousticLoads,
        piezo: &TNetworkSpectrum,
    ) -> Result<FusionStages, MasonError> {
        let series = |stage: &'static str| fusion_step(ConnectionKind::Series, stage);
        let parallel = |stage: &'static str| fusion_step(ConnectionKind::Parallel, stage);

        let top_total = piezo.top().try_zip_with(&loads.top, series("top series fusion"))?;
        let bottom_total = piezo
            .bottom()
            .try_zip_with(&loads.bottom, series("bottom series fusion"))?;
        let parallel_acoustic =
            top_total.try_zip_with(&bottom_total, parallel("acoustic parallel fusion"))?;
        let acoustic = piezo
            .center()
            .try_zip_with(&parallel_acoustic, series("center series fusion"))?;

        let electrical_raw = acoustic.try_map(|hz, z| {
            self.transformer
                .to_electrical(z)
                .ok_or_else(|| MasonError::degenerate("transformer", hz))
        })?;
        let capacitive = Spectrum::try_from_fn(acoustic.frequencies(), |hz| {
            finite(self.capacitor.impedance(angular_frequency(hz)))
                .ok_or_else(|| MasonError::degenerate("static capacitance", hz))
        })?;
        let negative_capacitor = series("negative capacitor fusion");
        let series_el =
            electrical_raw.try_zip_with(&capacitive, |hz, z, zc| negative_capacitor(hz, z, -zc))?;
        let electrical = capacitive.try_zip_with(&series_el, parallel("electrical parallel fusion"))?;

        Ok(FusionStages {
            top_total,
            bottom_total,
            parallel: parallel_acoustic,
            acoustic,
            electrical_raw,
            capacitive,
            series: series_el,
            electrical,
        })
    }

    /// Electrical input impedance only.
    pub fn fuse(&self, loads: &AcousticLoads, piezo: &TNetworkSpectrum) -> Result<Spectrum, MasonError> {
        self.stages(loads, piezo).map(|stages| stages.electrical)
    }
}

fn fusion_step(
    kind: ConnectionKind,
    stage: &'static str,
) -> impl Fn(Scalar, CScalar, CScalar) -> Result<CScalar, MasonError> {
    move |hz, a, b| {
        kind.combine(a, b)
            .ok_or_else(|| MasonError::degenerate(stage, hz))
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::circuits::mason::{MasonPiezoNetwork, TNetwork, TNetworkSpectrum};

    fn constant_loads(freqs: &[Scalar], top: CScalar, bottom: CScalar) -> AcousticLoads {
        AcousticLoads {
            top: Spectrum::try_from_fn(freqs, |_| Ok(top)).unwrap(),
            bottom: Spectrum::try_from_fn(freqs, |_| Ok(bottom)).unwrap(),
        }
    }

    #[test]
    fn stages_follow_the_mason_formulae() {
        let freqs = [2.0e6, 7.0e6];
        let port = ElectricalPort { c0: 3.5e-9, n: 0.8 };
        let net = MasonPiezoNetwork::new(300.0, 2260.0, 200.0e-6);
        let loads = constant_loads(&freqs, CScalar::new(120.0, 4.0), CScalar::new(40.0, -7.0));
        let stages = CircuitFusion::new(port).stages(&loads, &net.spectrum(&freqs).unwrap()).unwrap();

        for (i, &hz) in freqs.iter().enumerate() {
            let t = net.at(hz).unwrap();
            let top = t.top + CScalar::new(120.0, 4.0);
            let bottom = t.bottom + CScalar::new(40.0, -7.0);
            let z_ac = t.center + top * bottom / (top + bottom);
            let zc = CScalar::new(0.0, -1.0 / (angular_frequency(hz) * port.c0));
            let series = z_ac / (port.n * port.n) - zc;
            let expected = zc * series / (zc + series);

            let got = stages.electrical.values()[i];
            assert_relative_eq!(got.re, expected.re, max_relative = 1e-9);
            assert_relative_eq!(got.im, expected.im, max_relative = 1e-9);
            assert_relative_eq!(stages.acoustic.values()[i].im, z_ac.im, max_relative = 1e-12);
        }
        assert_eq!(stages.electrical.frequencies(), &freqs);
    }

    #[test]
    fn zero_transformer_ratio_is_reported() {
        let freqs = [1.0e6];
        let net = MasonPiezoNetwork::new(300.0, 2260.0, 200.0e-6);
        let loads = constant_loads(&freqs, CScalar::new(1.0, 0.0), CScalar::new(1.0, 0.0));
        let err = CircuitFusion::new(ElectricalPort { c0: 1.0e-9, n: 0.0 })
            .fuse(&loads, &net.spectrum(&freqs).unwrap())
            .unwrap_err();
        assert!(matches!(err, MasonError::NumericDegeneracy { stage: "transformer", .. }));
    }

    #[test]
    fn zero_capacitance_is_reported() {
        let freqs = [1.0e6];
        let net = MasonPiezoNetwork::new(300.0, 2260.0, 200.0e-6);
        let loads = constant_loads(&freqs, CScalar::new(1.0, 0.0), CScalar::new(1.0, 0.0));
        let err = CircuitFusion::new(ElectricalPort { c0: 0.0, n: 1.0 })
            .fuse(&loads, &net.spectrum(&freqs).unwrap())
            .unwrap_err();
        assert!(matches!(
            err,
            MasonError::NumericDegeneracy { stage: "static capacitance", frequency_hz } if frequency_hz == 1.0e6
        ));
    }

    #[test]
    fn cancelling_branches_are_reported() {
        let freqs = [1.0e6];
        let net = MasonPiezoNetwork::new(300.0, 2260.0, 200.0e-6);
        let side = net.at(1.0e6).unwrap().top;
        // top_total = side, bottom_total = -side: the parallel sum vanishes.
        let loads = constant_loads(&freqs, CScalar::new(0.0, 0.0), -2.0 * side);
        let err = CircuitFusion::new(ElectricalPort { c0: 1.0e-9, n: 1.0 })
            .fuse(&loads, &net.spectrum(&freqs).unwrap())
            .unwrap_err();
        assert!(matches!(
            err,
            MasonError::NumericDegeneracy { stage: "acoustic parallel fusion", .. }
        ));
    }

    #[test]
    fn vanishing_acoustic_impedance_shorts_the_port() {
        let freqs = [1.0e6];
        // top_total = bottom_total = 1, parallel = 0.5, Z_ac = -0.5 + 0.5 = 0.
        let piezo = TNetworkSpectrum::from_parts(
            freqs.to_vec(),
            vec![TNetwork {
                top: CScalar::new(0.0, 0.0),
                center: CScalar::new(-0.5, 0.0),
                bottom: CScalar::new(0.0, 0.0),
            }],
        );
        let loads = constant_loads(&freqs, CScalar::new(1.0, 0.0), CScalar::new(1.0, 0.0));
        let err = CircuitFusion::new(ElectricalPort { c0: 1.0e-9, n: 1.0 })
            .fuse(&loads, &piezo)
            .unwrap_err();
        assert!(matches!(
            err,
            MasonError::NumericDegeneracy { stage: "electrical parallel fusion", frequency_hz } if frequency_hz == 1.0e6
        ));
    }

    #[test]
    fn overflowing_series_step_names_its_stage() {
        let step = fusion_step(ConnectionKind::Series, "negative capacitor fusion");
        let huge = CScalar::new(0.0, Scalar::MAX);
        let err = step(4.0e6, huge, huge).unwrap_err();
        assert!(matches!(
            err,
            MasonError::NumericDegeneracy { stage: "negative capacitor fusion", frequency_hz } if frequency_hz == 4.0e6
        ));
        assert!(step(4.0e6, huge, -huge).is_ok());
    }
}
