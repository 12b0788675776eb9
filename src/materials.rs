//! Material property models and the keyed material table.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::StringRecord;
use serde::{Deserialize, Serialize};

use crate::constants::VACUUM_PERMITTIVITY;
use crate::errors::MasonError;
use crate::math::Scalar;

/// Acoustic and electromechanical properties of one material, in SI units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MaterialProperties {
    /// Density ρ in kg/m³.
    #[serde(rename = "roh")]
    pub density: Scalar,
    /// Longitudinal sound speed v in m/s.
    #[serde(rename = "v")]
    pub sound_speed: Scalar,
    /// Thickness-mode permittivity ε33 in F/m. Only required for the piezo layer.
    #[serde(rename = "eps33", default)]
    pub permittivity: Option<Scalar>,
    /// Thickness-mode piezoelectric constant h33 in V/m. Only required for the piezo layer.
    #[serde(rename = "h33", default)]
    pub piezo_constant: Option<Scalar>,
}

impl MaterialProperties {
    /// Passive (non-piezoelectric) material.
    #[must_use]
    pub const fn passive(density: Scalar, sound_speed: Scalar) -> Self {
        Self {
            density,
            sound_speed,
            permittivity: None,
            piezo_constant: None,
        }
    }

    /// Piezoelectric material with absolute permittivity `eps33` (F/m) and constant `h33` (V/m).
    #[must_use]
    pub const fn piezoelectric(
        density: Scalar,
        sound_speed: Scalar,
        eps33: Scalar,
        h33: Scalar,
    ) -> Self {
        Self {
            density,
            sound_speed,
            permittivity: Some(eps33),
            piezo_constant: Some(h33),
        }
    }

    /// Replaces ε33 with `relative` times the vacuum permittivity.
    #[must_use]
    pub fn with_relative_permittivity(mut self, relative: Scalar) -> Self {
        self.permittivity = Some(relative * VACUUM_PERMITTIVITY);
        self
    }

    /// Specific acoustic impedance ρ·v in Rayl.
    #[must_use]
    pub fn specific_acoustic_impedance(&self) -> Scalar {
        self.density * self.sound_speed
    }

    pub(crate) fn validate(&self, name: &str) -> Result<(), MasonError> {
        let positive = |x: Scalar| x.is_finite() && x > 0.0;
        if !positive(self.density) {
            return Err(MasonError::Configuration(format!(
                "material `{name}` has non-positive density {}",
                self.density
            )));
        }
        if !positive(self.sound_speed) {
            return Err(MasonError::Configuration(format!(
                "material `{name}` has non-positive sound speed {}",
                self.sound_speed
            )));
        }
        Ok(())
    }
}

/// Read-only table of materials keyed by name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MaterialTable {
    materials: BTreeMap<String, MaterialProperties>,
}

impl MaterialTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a material, returning the previous entry.
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        properties: MaterialProperties,
    ) -> Option<MaterialProperties> {
        self.materials.insert(name.into(), properties)
    }

    /// Looks up a material by exact name.
    pub fn get(&self, name: &str) -> Result<&MaterialProperties, MasonError> {
        self.materials
            .get(name)
            .ok_or_else(|| MasonError::MaterialNotFound(name.to_owned()))
    }

    /// True if `name` is present.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.materials.contains_key(name)
    }

    /// Material names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.materials.keys().map(String::as_str)
    }

    /// Number of materials.
    #[must_use]
    pub fn len(&self) -> usize {
        self.materials.len()
    }

    /// True when the table holds no materials.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }

    /// Reads a row-per-material CSV file. See [`MaterialTable::from_csv_reader`].
    pub fn from_csv_path(path: impl AsRef<Path>) -> Result<Self, MasonError> {
        let file = File::open(path.as_ref())?;
        Self::from_csv_reader(file)
    }

    /// Parses a row-per-material CSV held in memory.
    pub fn from_csv_str(content: &str) -> Result<Self, MasonError> {
        Self::from_csv_reader(content.as_bytes())
    }

    /// Parses a row-per-material CSV.
    ///
    /// The first record is the header. Columns `Material`, `roh`, `v`, `eps33`
    /// and `h33` are located by name; descriptive columns such as `Details` and
    /// `Source` are ignored. Unit or symbol rows directly below the header, whose
    /// `roh` and `v` cells are both non-numeric, are skipped. Empty `eps33`/`h33`
    /// cells mean the material is not piezoelectric. Blank lines and lines
    /// starting with `#` are ignored.
    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self, MasonError> {
        let mut records = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .trim(csv::Trim::All)
            .comment(Some(b'#'))
            .from_reader(reader);

        let mut table = Self::new();
        let mut columns: Option<CsvColumns> = None;
        let mut in_header = true;

        for record in records.records() {
            let record = record?;
            let line_no = record.position().map_or(0, |p| p.line() as usize);

            let Some(cols) = &columns else {
                columns = Some(CsvColumns::from_header(&record, line_no)?);
                continue;
            };

            if in_header && cols.is_sub_header(&record) {
                tracing::debug!(line = line_no, "skipping material table sub-header row");
                continue;
            }
            in_header = false;

            let name = cols.field(&record, cols.material);
            if name.is_empty() {
                return Err(table_error(line_no, "empty material name"));
            }
            let properties = MaterialProperties {
                density: parse_required(cols.field(&record, cols.density), "roh", line_no)?,
                sound_speed: parse_required(cols.field(&record, cols.speed), "v", line_no)?,
                permittivity: parse_optional(cols.optional_field(&record, cols.eps33), "eps33", line_no)?,
                piezo_constant: parse_optional(cols.optional_field(&record, cols.h33), "h33", line_no)?,
            };
            if table.insert(name, properties).is_some() {
                return Err(table_error(line_no, format!("duplicate material `{name}`")));
            }
        }

        if columns.is_none() {
            return Err(table_error(0, "missing header row"));
        }
        tracing::debug!(materials = table.len(), "material table loaded");
        Ok(table)
    }
}

struct CsvColumns {
    material: usize,
    density: usize,
    speed: usize,
    eps33: Option<usize>,
    h33: Option<usize>,
}

impl CsvColumns {
    fn from_header(header: &StringRecord, line: usize) -> Result<Self, MasonError> {
        let find = |name: &str| header.iter().position(|h| h == name);
        let require = |name: &str| {
            find(name).ok_or_else(|| table_error(line, format!("missing column `{name}`")))
        };
        Ok(Self {
            material: require("Material")?,
            density: require("roh")?,
            speed: require("v")?,
            eps33: find("eps33"),
            h33: find("h33"),
        })
    }

    fn field<'a>(&self, record: &'a StringRecord, idx: usize) -> &'a str {
        record.get(idx).unwrap_or("")
    }

    fn optional_field<'a>(&self, record: &'a StringRecord, idx: Option<usize>) -> &'a str {
        idx.map_or("", |i| self.field(record, i))
    }

    /// Units or symbols row: neither `roh` nor `v` holds a number.
    fn is_sub_header(&self, record: &StringRecord) -> bool {
        let numeric = |idx| self.field(record, idx).parse::<Scalar>().is_ok();
        !numeric(self.density) && !numeric(self.speed)
    }
}

fn table_error(line: usize, message: impl Into<String>) -> MasonError {
    MasonError::MaterialTable {
        line,
        message: message.into(),
    }
}

fn parse_required(cell: &str, column: &str, line: usize) -> Result<Scalar, MasonError> {
    parse_optional(cell, column, line)?
        .ok_or_else(|| table_error(line, format!("empty `{column}` value")))
}

fn parse_optional(cell: &str, column: &str, line: usize) -> Result<Option<Scalar>, MasonError> {
    if cell.is_empty() || cell.eq_ignore_ascii_case("nan") {
        return Ok(None);
    }
    cell.parse::<Scalar>()
        .map(Some)
        .map_err(|_| table_error(line, format!("invalid `{column}` value `{cell}`")))
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    const CSV: &str = "\
# acoustic materials
Material,Details,Source,roh,v,eps33,h33
Water,\"distilled, 20 C\",handbook,1000,1480,,
PVDF-TrFE,copolymer,datasheet,1780,2260,1.0e-10,2.5e9

Gold,sputtered,handbook,19300,3240,,
";

    #[test]
    fn csv_rows_become_materials() {
        let table = MaterialTable::from_csv_str(CSV).expect("valid table");
        assert_eq!(table.len(), 3);
        let water = table.get("Water").unwrap();
        assert_relative_eq!(water.density, 1000.0);
        assert_relative_eq!(water.sound_speed, 1480.0);
        assert_eq!(water.permittivity, None);
        let pvdf = table.get("PVDF-TrFE").unwrap();
        assert_eq!(pvdf.permittivity, Some(1.0e-10));
        assert_eq!(pvdf.piezo_constant, Some(2.5e9));
    }

    #[test]
    fn unit_and_symbol_rows_below_header_are_skipped() {
        let csv = "\
Material,Details,Source,roh,v,eps33,h33
-,-,-,kg/m3,m/s,F/m,V/m
-,-,-,rho,v,e33,h33
PVDF-TrFE,copolymer,datasheet,1780,2260,7.08e-11,2.5e9
Water,,handbook,1000,1480,,
";
        let table = MaterialTable::from_csv_str(csv).expect("three-row header");
        assert_eq!(table.names().collect::<Vec<_>>(), vec!["PVDF-TrFE", "Water"]);
        assert!(table.contains("Water"));
        assert!(!table.contains("-"));
        let pvdf = table.get("PVDF-TrFE").unwrap();
        assert_relative_eq!(pvdf.specific_acoustic_impedance(), 1780.0 * 2260.0);
        assert_eq!(pvdf.piezo_constant, Some(2.5e9));
    }

    #[test]
    fn non_numeric_row_after_data_is_an_error() {
        let csv = "Material,roh,v\nAir,1.2,343\nunits,kg/m3,m/s\n";
        assert!(matches!(
            MaterialTable::from_csv_str(csv),
            Err(MasonError::MaterialTable { line: 3, .. })
        ));
    }

    #[test]
    fn table_deserializes_from_keyed_json() {
        let table: MaterialTable = serde_json::from_str(
            r#"{"Air": {"roh": 1.2, "v": 343.0}, "PZT": {"roh": 7500, "v": 4350, "eps33": 7.3e-9, "h33": 2.1e9}}"#,
        )
        .unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.get("Air").unwrap().permittivity, None);
        assert_eq!(table.get("PZT").unwrap().piezo_constant, Some(2.1e9));
    }

    #[test]
    fn unknown_material_is_a_lookup_error() {
        let table = MaterialTable::from_csv_str(CSV).unwrap();
        let err = table.get("Unobtainium").unwrap_err();
        assert!(matches!(err, MasonError::MaterialNotFound(name) if name == "Unobtainium"));
    }

    #[test]
    fn malformed_number_reports_line() {
        let csv = "Material,roh,v\nSteel,7850,fast\n";
        let err = MaterialTable::from_csv_str(csv).unwrap_err();
        assert!(matches!(err, MasonError::MaterialTable { line: 2, .. }), "{err}");
    }

    #[test]
    fn duplicate_and_missing_columns_are_rejected() {
        let dup = "Material,roh,v\nAir,1.2,343\nAir,1.2,343\n";
        assert!(matches!(
            MaterialTable::from_csv_str(dup),
            Err(MasonError::MaterialTable { line: 3, .. })
        ));
        let no_speed = "Material,roh\nAir,1.2\n";
        assert!(matches!(
            MaterialTable::from_csv_str(no_speed),
            Err(MasonError::MaterialTable { line: 1, .. })
        ));
    }

    #[test]
    fn relative_permittivity_scales_vacuum_value() {
        let m = MaterialProperties::passive(1780.0, 2260.0).with_relative_permittivity(10.0);
        assert_relative_eq!(m.permittivity.unwrap(), 8.854_187_812_8e-11, max_relative = 1e-12);
    }

    #[test]
    fn validation_rejects_non_positive_speed() {
        let m = MaterialProperties::passive(1000.0, 0.0);
        assert!(m.validate("Broken").is_err());
        assert!(MaterialProperties::passive(1000.0, 1480.0).validate("Water").is_ok());
    }
}
