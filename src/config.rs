//! Simulation parameter loading and validation.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::MasonError;
use crate::math::Scalar;
use crate::sweep::FrequencyBand;
use crate::transducer::{LayerMaterials, StackGeometry};

/// Parameter record as written in a TOML or JSON file.
///
/// ```toml
/// fband = [1, 60]
/// diameter = 0.01
/// thickness_td = 200e-6
/// thickness_el = 1e-6
/// thickness_sub = 1e-3
/// Tload = "Water"
/// Telectrode = "Gold"
/// piezo = "PVDF-TrFE"
/// Belectrode = "Gold"
/// Bsubstrate = "Glass"
/// Bload = "Air"
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawParameters {
    /// `(lower, upper)` band in MHz.
    pub fband: (Scalar, Scalar),
    /// Diameter of the circular layers in meters.
    #[serde(default)]
    pub diameter: Option<Scalar>,
    /// Radius of the circular layers in meters; converted to a diameter.
    #[serde(default)]
    pub radius: Option<Scalar>,
    /// Optional rectangular substrate `(width, height)` in meters.
    #[serde(default, rename = "substrateWHratio")]
    pub substrate_wh: Option<(Scalar, Scalar)>,
    /// Piezo thickness in meters.
    pub thickness_td: Scalar,
    /// Electrode thickness in meters (both electrodes).
    pub thickness_el: Scalar,
    /// Substrate thickness in meters.
    pub thickness_sub: Scalar,
    /// Top acoustic load material.
    #[serde(rename = "Tload")]
    pub top_load: String,
    /// Top electrode material.
    #[serde(rename = "Telectrode")]
    pub top_electrode: String,
    /// Piezo material.
    pub piezo: String,
    /// Bottom electrode material.
    #[serde(rename = "Belectrode")]
    pub bottom_electrode: String,
    /// Substrate material.
    #[serde(rename = "Bsubstrate")]
    pub substrate: String,
    /// Bottom acoustic load material.
    #[serde(rename = "Bload")]
    pub bottom_load: String,
}

/// Validated simulation parameters.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(try_from = "RawParameters")]
pub struct SimulationParameters {
    /// Frequency band.
    pub band: FrequencyBand,
    /// Stack geometry.
    pub geometry: StackGeometry,
    /// Material for every layer role.
    pub materials: LayerMaterials,
}

impl TryFrom<RawParameters> for SimulationParameters {
    type Error = MasonError;

    fn try_from(raw: RawParameters) -> Result<Self, Self::Error> {
        let diameter = match (raw.diameter, raw.radius) {
            (Some(d), None) => d,
            (None, Some(r)) => 2.0 * r,
            (Some(_), Some(_)) => {
                return Err(MasonError::Configuration(
                    "specify either `diameter` or `radius`, not both".into(),
                ))
            }
            (None, None) => {
                return Err(MasonError::Configuration(
                    "missing `diameter` (or `radius`)".into(),
                ))
            }
        };
        Ok(Self {
            band: FrequencyBand::new(raw.fband.0, raw.fband.1)?,
            geometry: StackGeometry {
                diameter,
                substrate_rect: raw.substrate_wh,
                thickness_piezo: raw.thickness_td,
                thickness_electrode: raw.thickness_el,
                thickness_substrate: raw.thickness_sub,
            },
            materials: LayerMaterials {
                top_load: raw.top_load,
                top_electrode: raw.top_electrode,
                piezo: raw.piezo,
                bottom_electrode: raw.bottom_electrode,
                substrate: raw.substrate,
                bottom_load: raw.bottom_load,
            },
        })
    }
}

impl SimulationParameters {
    /// Parses TOML content.
    pub fn from_toml_str(content: &str) -> Result<Self, MasonError> {
        let raw: RawParameters = toml::from_str(content)?;
        raw.try_into()
    }

    /// Parses JSON content.
    pub fn from_json_str(content: &str) -> Result<Self, MasonError> {
        let raw: RawParameters = serde_json::from_str(content)?;
        raw.try_into()
    }
}

/// Loads parameters from a file; `.json` files are parsed as JSON, anything else as TOML.
pub fn load_parameters(path: &Path) -> Result<SimulationParameters, MasonError> {
    let content = std::fs::read_to_string(path)?;
    let params = if path.extension().map_or(false, |e| e == "json") {
        SimulationParameters::from_json_str(&content)?
    } else {
        SimulationParameters::from_toml_str(&content)?
    };
    tracing::info!(path = %path.display(), "simulation parameters loaded");
    Ok(params)
}
