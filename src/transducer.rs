//! Layered transducer stack: roles, geometry and per-layer materials.
//!
//! The stack is ordered from the top acoustic load down to the bottom acoustic
//! load. The piezo layer splits it into a Top half and a Bottom half; for the
//! transmission-line view the piezo itself is split into `Tpiezo` / `Bpiezo`
//! slots that share material and geometry.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::errors::MasonError;
use crate::materials::{MaterialProperties, MaterialTable};
use crate::math::{circular_area, Scalar};

/// Acoustic half of the stack, relative to the piezo layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Side {
    /// Layers above the piezo (front face).
    Top,
    /// Layers below the piezo (backing side).
    Bottom,
}

/// Physical role of a layer, in stack order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum LayerRole {
    /// Acoustic load on the top face.
    #[serde(rename = "Tload")]
    TopLoad,
    /// Top electrode.
    #[serde(rename = "Telectrode")]
    TopElectrode,
    /// Piezoelectric layer.
    #[serde(rename = "piezo")]
    Piezo,
    /// Bottom electrode.
    #[serde(rename = "Belectrode")]
    BottomElectrode,
    /// Substrate (backing) below the bottom electrode.
    #[serde(rename = "Bsubstrate")]
    Substrate,
    /// Acoustic load below the substrate.
    #[serde(rename = "Bload")]
    BottomLoad,
}

impl LayerRole {
    /// All roles in stack order.
    pub const ALL: [Self; 6] = [
        Self::TopLoad,
        Self::TopElectrode,
        Self::Piezo,
        Self::BottomElectrode,
        Self::Substrate,
        Self::BottomLoad,
    ];

    /// Configuration keyword for this role.
    #[must_use]
    pub const fn keyword(self) -> &'static str {
        match self {
            Self::TopLoad => "Tload",
            Self::TopElectrode => "Telectrode",
            Self::Piezo => "piezo",
            Self::BottomElectrode => "Belectrode",
            Self::Substrate => "Bsubstrate",
            Self::BottomLoad => "Bload",
        }
    }

    /// Position of the role in the stack.
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// True for the acoustic boundary loads, which carry no thickness.
    #[must_use]
    pub const fn is_load(self) -> bool {
        matches!(self, Self::TopLoad | Self::BottomLoad)
    }

    /// True for either electrode.
    #[must_use]
    pub const fn is_electrode(self) -> bool {
        matches!(self, Self::TopElectrode | Self::BottomElectrode)
    }

    /// Whole-stack membership: Top covers everything up to and including the
    /// piezo, Bottom covers the piezo and everything after it.
    #[must_use]
    pub fn belongs_to(self, side: Side) -> bool {
        match side {
            Side::Top => self <= Self::Piezo,
            Side::Bottom => self >= Self::Piezo,
        }
    }
}

impl fmt::Display for LayerRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

impl FromStr for LayerRole {
    type Err = MasonError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|role| role.keyword() == s)
            .ok_or_else(|| MasonError::UnknownLayerKeys(vec![s.to_owned()]))
    }
}

/// Entry of the split stack used by the transmission-line view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StackSlot {
    /// Top acoustic load.
    Tload,
    /// Top electrode.
    Telectrode,
    /// Upper half of the piezo.
    Tpiezo,
    /// Lower half of the piezo.
    Bpiezo,
    /// Bottom electrode.
    Belectrode,
    /// Substrate.
    Bsubstrate,
    /// Bottom acoustic load.
    Bload,
}

impl StackSlot {
    /// Slots in stack order.
    pub const ALL: [Self; 7] = [
        Self::Tload,
        Self::Telectrode,
        Self::Tpiezo,
        Self::Bpiezo,
        Self::Belectrode,
        Self::Bsubstrate,
        Self::Bload,
    ];

    /// Physical layer behind the slot.
    #[must_use]
    pub const fn role(self) -> LayerRole {
        match self {
            Self::Tload => LayerRole::TopLoad,
            Self::Telectrode => LayerRole::TopElectrode,
            Self::Tpiezo | Self::Bpiezo => LayerRole::Piezo,
            Self::Belectrode => LayerRole::BottomElectrode,
            Self::Bsubstrate => LayerRole::Substrate,
            Self::Bload => LayerRole::BottomLoad,
        }
    }

    /// Half of the split stack the slot belongs to.
    #[must_use]
    pub const fn side(self) -> Side {
        match self {
            Self::Tload | Self::Telectrode | Self::Tpiezo => Side::Top,
            _ => Side::Bottom,
        }
    }
}

/// Resolved cross-section of a layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CrossSection {
    /// Disc of the given diameter (m).
    Circular {
        /// Diameter in meters.
        diameter: Scalar,
    },
    /// Rectangle of the given sides (m).
    Rectangular {
        /// Width in meters.
        width: Scalar,
        /// Height in meters.
        height: Scalar,
    },
}

impl CrossSection {
    /// Area in m².
    #[must_use]
    pub fn area(&self) -> Scalar {
        match *self {
            Self::Circular { diameter } => circular_area(diameter),
            Self::Rectangular { width, height } => width * height,
        }
    }
}

/// Geometry row of one layer. Fields that do not apply are `None`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct LayerGeometry {
    /// Diameter (m) for circular layers.
    pub diameter: Option<Scalar>,
    /// Width (m) for rectangular layers.
    pub width: Option<Scalar>,
    /// Height (m) for rectangular layers.
    pub height: Option<Scalar>,
    /// Thickness (m); `None` for the acoustic loads.
    pub thickness: Option<Scalar>,
}

impl LayerGeometry {
    /// Circular layer.
    #[must_use]
    pub const fn circular(diameter: Scalar, thickness: Option<Scalar>) -> Self {
        Self {
            diameter: Some(diameter),
            width: None,
            height: None,
            thickness,
        }
    }

    /// Rectangular layer.
    #[must_use]
    pub const fn rectangular(width: Scalar, height: Scalar, thickness: Option<Scalar>) -> Self {
        Self {
            diameter: None,
            width: Some(width),
            height: Some(height),
            thickness,
        }
    }

    /// Resolves the cross-section. Only "diameter alone" and "width and height
    /// alone" are accepted; any other pattern is ambiguous.
    pub fn cross_section(&self, role: LayerRole) -> Result<CrossSection, MasonError> {
        match (self.diameter, self.width, self.height) {
            (Some(diameter), None, None) => Ok(CrossSection::Circular { diameter }),
            (None, Some(width), Some(height)) => Ok(CrossSection::Rectangular { width, height }),
            _ => Err(MasonError::GeometryAmbiguity { role }),
        }
    }
}

/// Material name assigned to every layer role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LayerMaterials {
    /// Top acoustic load.
    #[serde(rename = "Tload")]
    pub top_load: String,
    /// Top electrode.
    #[serde(rename = "Telectrode")]
    pub top_electrode: String,
    /// Piezo layer.
    #[serde(rename = "piezo")]
    pub piezo: String,
    /// Bottom electrode.
    #[serde(rename = "Belectrode")]
    pub bottom_electrode: String,
    /// Substrate.
    #[serde(rename = "Bsubstrate")]
    pub substrate: String,
    /// Bottom acoustic load.
    #[serde(rename = "Bload")]
    pub bottom_load: String,
}

impl LayerMaterials {
    /// Builds the assignment from `(keyword, material)` pairs.
    ///
    /// Every unrecognized keyword is reported at once; so is every role left
    /// without a material.
    pub fn from_keywords<'a, I>(pairs: I) -> Result<Self, MasonError>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut slots: [Option<String>; 6] = Default::default();
        let mut unknown = Vec::new();
        for (key, material) in pairs {
            match key.parse::<LayerRole>() {
                Ok(role) => slots[role.index()] = Some(material.to_owned()),
                Err(_) => unknown.push(key.to_owned()),
            }
        }
        if !unknown.is_empty() {
            return Err(MasonError::UnknownLayerKeys(unknown));
        }
        let missing: Vec<String> = LayerRole::ALL
            .iter()
            .filter(|role| slots[role.index()].is_none())
            .map(|role| role.keyword().to_owned())
            .collect();
        if !missing.is_empty() {
            return Err(MasonError::MissingLayerKeys(missing));
        }
        let [top_load, top_electrode, piezo, bottom_electrode, substrate, bottom_load] =
            slots.map(Option::unwrap_or_default);
        Ok(Self {
            top_load,
            top_electrode,
            piezo,
            bottom_electrode,
            substrate,
            bottom_load,
        })
    }

    /// Material name for `role`.
    #[must_use]
    pub fn get(&self, role: LayerRole) -> &str {
        match role {
            LayerRole::TopLoad => &self.top_load,
            LayerRole::TopElectrode => &self.top_electrode,
            LayerRole::Piezo => &self.piezo,
            LayerRole::BottomElectrode => &self.bottom_electrode,
            LayerRole::Substrate => &self.substrate,
            LayerRole::BottomLoad => &self.bottom_load,
        }
    }
}

/// Geometric input for a stack. Lengths in meters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StackGeometry {
    /// Diameter shared by every circular layer.
    pub diameter: Scalar,
    /// Substrate `(width, height)`; when set, only the substrate is rectangular.
    pub substrate_rect: Option<(Scalar, Scalar)>,
    /// Piezo thickness.
    pub thickness_piezo: Scalar,
    /// Thickness shared by both electrodes.
    pub thickness_electrode: Scalar,
    /// Substrate thickness.
    pub thickness_substrate: Scalar,
}

impl StackGeometry {
    fn validate(&self) -> Result<(), MasonError> {
        let check = |label: &str, value: Scalar, allow_zero: bool| {
            let ok = value.is_finite() && (value > 0.0 || (allow_zero && value == 0.0));
            if ok {
                Ok(())
            } else {
                Err(MasonError::Configuration(format!("invalid {label}: {value}")))
            }
        };
        check("diameter", self.diameter, false)?;
        if let Some((w, h)) = self.substrate_rect {
            check("substrate width", w, false)?;
            check("substrate height", h, false)?;
        }
        check("piezo thickness", self.thickness_piezo, false)?;
        check("electrode thickness", self.thickness_electrode, true)?;
        check("substrate thickness", self.thickness_substrate, true)
    }

    fn layer_geometry(&self, role: LayerRole) -> LayerGeometry {
        let thickness = match role {
            LayerRole::TopLoad | LayerRole::BottomLoad => None,
            LayerRole::TopElectrode | LayerRole::BottomElectrode => Some(self.thickness_electrode),
            LayerRole::Piezo => Some(self.thickness_piezo),
            LayerRole::Substrate => Some(self.thickness_substrate),
        };
        match (role, self.substrate_rect) {
            (LayerRole::Substrate, Some((w, h))) => LayerGeometry::rectangular(w, h, thickness),
            _ => LayerGeometry::circular(self.diameter, thickness),
        }
    }
}

/// One slab of the stack.
#[derive(Debug, Clone, PartialEq)]
pub struct Layer {
    role: LayerRole,
    material_name: String,
    material: MaterialProperties,
    geometry: LayerGeometry,
}

impl Layer {
    /// Role of the layer.
    #[must_use]
    pub fn role(&self) -> LayerRole {
        self.role
    }

    /// Name of the assigned material.
    #[must_use]
    pub fn material_name(&self) -> &str {
        &self.material_name
    }

    /// Material properties.
    #[must_use]
    pub fn material(&self) -> &MaterialProperties {
        &self.material
    }

    /// Geometry row.
    #[must_use]
    pub fn geometry(&self) -> &LayerGeometry {
        &self.geometry
    }

    /// Resolved cross-section.
    pub fn cross_section(&self) -> Result<CrossSection, MasonError> {
        self.geometry.cross_section(self.role)
    }

    /// Thickness, treating the boundary loads as zero-length.
    #[must_use]
    pub fn length(&self) -> Scalar {
        self.geometry.thickness.unwrap_or(0.0)
    }
}

/// Ordered six-layer transducer stack.
#[derive(Debug, Clone, PartialEq)]
pub struct TransducerStack {
    layers: [Layer; 6],
}

impl TransducerStack {
    /// Builds the stack, looking every material up in `table`.
    pub fn build(
        geometry: &StackGeometry,
        materials: &LayerMaterials,
        table: &MaterialTable,
    ) -> Result<Self, MasonError> {
        geometry.validate()?;
        let mut layers = Vec::with_capacity(LayerRole::ALL.len());
        for role in LayerRole::ALL {
            let name = materials.get(role);
            let material = *table.get(name)?;
            material.validate(name)?;
            layers.push(Layer {
                role,
                material_name: name.to_owned(),
                material,
                geometry: geometry.layer_geometry(role),
            });
        }
        let layers: [Layer; 6] = layers
            .try_into()
            .map_err(|_| MasonError::Configuration("stack must contain six layers".into()))?;
        tracing::debug!(
            piezo = %layers[LayerRole::Piezo.index()].material_name,
            rectangular_substrate = geometry.substrate_rect.is_some(),
            "transducer stack built"
        );
        Ok(Self { layers })
    }

    /// Layer for `role`.
    #[must_use]
    pub fn layer(&self, role: LayerRole) -> &Layer {
        &self.layers[role.index()]
    }

    /// Layers in stack order.
    #[must_use]
    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    /// The piezo layer.
    #[must_use]
    pub fn piezo(&self) -> &Layer {
        self.layer(LayerRole::Piezo)
    }

    /// Split-stack view: every slot paired with its layer.
    pub fn slots(&self) -> impl Iterator<Item = (StackSlot, &Layer)> + '_ {
        StackSlot::ALL.into_iter().map(|slot| (slot, self.layer(slot.role())))
    }

    /// Layers of one half, ordered from the acoustic boundary inward to the piezo.
    #[must_use]
    pub fn side_chain(&self, side: Side) -> Vec<&Layer> {
        let mut chain: Vec<&Layer> = self
            .slots()
            .filter(|(slot, _)| slot.side() == side)
            .map(|(_, layer)| layer)
            .collect();
        if side == Side::Bottom {
            chain.reverse();
        }
        chain
    }
}
