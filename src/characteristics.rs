//! Characteristic impedances and electrical port of the stack.
//!
//! Arshed A.M. et al. 2014, "Influence of a silver epoxy dopant on the
//! performance of broken piezoelectric ceramic transducer based on an
//! analytical model", Smart Mater. Struct. 23, 045036.

use serde::Serialize;

use crate::errors::MasonError;
use crate::math::Scalar;
use crate::transducer::{CrossSection, LayerRole, Side, TransducerStack};

/// Static capacitance and electromechanical transformer ratio of the piezo.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ElectricalPort {
    /// Clamped capacitance C0 = ε33·A/t in farads.
    pub c0: Scalar,
    /// Transformer ratio N = C0·h33.
    pub n: Scalar,
}

/// Acoustic characteristic impedance `ρ·v·A` of a slab.
#[must_use]
pub fn acoustic_impedance(density: Scalar, sound_speed: Scalar, section: &CrossSection) -> Scalar {
    density * sound_speed * section.area()
}

/// Per-layer characteristic impedances plus the electrical port.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CharacteristicImpedanceSet {
    z0: [Scalar; 6],
    port: ElectricalPort,
}

impl CharacteristicImpedanceSet {
    /// Derives Z0 for every layer and C0/N from the piezo layer.
    pub fn from_stack(stack: &TransducerStack) -> Result<Self, MasonError> {
        let mut z0 = [0.0; 6];
        for layer in stack.layers() {
            let material = layer.material();
            let section = layer.cross_section()?;
            z0[layer.role().index()] =
                acoustic_impedance(material.density, material.sound_speed, &section);
        }

        let piezo = stack.piezo();
        let section = piezo.cross_section()?;
        let thickness = piezo.length();
        let missing = |what: &str| {
            MasonError::Configuration(format!(
                "piezo material `{}` has no {what}",
                piezo.material_name()
            ))
        };
        let eps33 = piezo.material().permittivity.ok_or_else(|| missing("eps33"))?;
        let h33 = piezo.material().piezo_constant.ok_or_else(|| missing("h33"))?;

        let c0 = eps33 * section.area() / thickness;
        let port = ElectricalPort { c0, n: c0 * h33 };
        tracing::debug!(c0 = port.c0, n = port.n, "electrical port derived");
        Ok(Self { z0, port })
    }

    /// Characteristic impedance of `role`.
    #[must_use]
    pub fn z0(&self, role: LayerRole) -> Scalar {
        self.z0[role.index()]
    }

    /// Impedances of one half in whole-stack order (the piezo belongs to both).
    #[must_use]
    pub fn side(&self, side: Side) -> Vec<(LayerRole, Scalar)> {
        LayerRole::ALL
            .into_iter()
            .filter(|role| role.belongs_to(side))
            .map(|role| (role, self.z0(role)))
            .collect()
    }

    /// Electrical port parameters.
    #[must_use]
    pub fn electrical(&self) -> ElectricalPort {
        self.port
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::transducer::tests::{sample_geometry, sample_materials, sample_table};
    use crate::transducer::StackGeometry;

    #[test]
    fn pvdf_port_matches_hand_computation() {
        let stack = TransducerStack::build(&sample_geometry(), &sample_materials(), &sample_table()).unwrap();
        let set = CharacteristicImpedanceSet::from_stack(&stack).unwrap();

        let area = std::f64::consts::PI * 0.01 * 0.01 / 4.0;
        let c0 = 10.0 * area / 200.0e-6;
        let port = set.electrical();
        assert_relative_eq!(port.c0, c0, max_relative = 1.0e-9);
        assert_relative_eq!(port.n, c0 * 2.5e9, max_relative = 1.0e-9);
        assert_relative_eq!(set.z0(LayerRole::Piezo), 1780.0 * 2260.0 * area, max_relative = 1.0e-12);
    }

    #[test]
    fn every_layer_impedance_is_positive() {
        let stack = TransducerStack::build(&sample_geometry(), &sample_materials(), &sample_table()).unwrap();
        let set = CharacteristicImpedanceSet::from_stack(&stack).unwrap();
        for role in LayerRole::ALL {
            assert!(set.z0(role) > 0.0, "{role} has Z0 {}", set.z0(role));
        }
    }

    #[test]
    fn rectangular_substrate_uses_width_times_height() {
        let geometry = StackGeometry {
            substrate_rect: Some((20.0e-3, 15.0e-3)),
            ..sample_geometry()
        };
        let stack = TransducerStack::build(&geometry, &sample_materials(), &sample_table()).unwrap();
        let set = CharacteristicImpedanceSet::from_stack(&stack).unwrap();
        assert_relative_eq!(set.z0(LayerRole::Substrate), 2500.0 * 5640.0 * 20.0e-3 * 15.0e-3, max_relative = 1e-12);
        let circular = std::f64::consts::PI * 1.0e-4 / 4.0;
        assert_relative_eq!(set.z0(LayerRole::BottomLoad), 1.2 * 343.0 * circular, max_relative = 1e-12);
    }

    #[test]
    fn sides_share_the_piezo() {
        let stack = TransducerStack::build(&sample_geometry(), &sample_materials(), &sample_table()).unwrap();
        let set = CharacteristicImpedanceSet::from_stack(&stack).unwrap();
        let top: Vec<_> = set.side(Side::Top).into_iter().map(|(r, _)| r).collect();
        let bottom: Vec<_> = set.side(Side::Bottom).into_iter().map(|(r, _)| r).collect();
        assert_eq!(top, vec![LayerRole::TopLoad, LayerRole::TopElectrode, LayerRole::Piezo]);
        assert_eq!(bottom.first(), Some(&LayerRole::Piezo));
        assert_eq!(bottom.len(), 4);
    }

    #[test]
    fn passive_piezo_material_is_rejected() {
        let mut materials = sample_materials();
        materials.piezo = "Glass".into();
        let stack = TransducerStack::build(&sample_geometry(), &materials, &sample_table()).unwrap();
        let err = CharacteristicImpedanceSet::from_stack(&stack).unwrap_err();
        assert!(matches!(err, MasonError::Configuration(msg) if msg.contains("eps33")));
    }
}
