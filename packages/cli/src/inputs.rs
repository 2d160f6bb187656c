//! Input loading: per-source CSV tables, the GeoJSON boundary file, and
//! the optional TOML run configuration.
//!
//! Absent secondary files are treated as empty tables (every unit then
//! gets the column default), so the only required input is the
//! demographics CSV.

use std::path::Path;

use geojson::{FeatureCollection, GeoJson};
use heat_map_pipeline::PipelineConfig;
use heat_map_tract_models::{
    AcAccessRow, DemographicRow, GreenSpaceRow, RawTables, TemperatureRow, UnitBoundary,
};
use serde::de::DeserializeOwned;
use thiserror::Error;

/// Errors raised while reading input files.
#[derive(Debug, Error)]
pub enum LoadError {
    /// Reading a file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A CSV row failed to parse.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// The boundary file is not valid GeoJSON.
    #[error("GeoJSON error: {0}")]
    Geojson(#[from] geojson::Error),

    /// The configuration file is not valid TOML.
    #[error("config error: {0}")]
    Config(#[from] toml::de::Error),
}

/// File paths for one run's inputs. Only demographics is required.
pub struct InputPaths<'a> {
    pub demographics: &'a Path,
    pub temperature: Option<&'a Path>,
    pub green_space: Option<&'a Path>,
    pub ac_access: Option<&'a Path>,
    pub boundaries: Option<&'a Path>,
    pub boundary_id_property: &'a str,
}

/// Loads all raw input tables.
///
/// # Errors
///
/// Returns an error if any provided file cannot be read or parsed.
pub fn load_tables(paths: &InputPaths<'_>) -> Result<RawTables, LoadError> {
    Ok(RawTables {
        demographics: read_csv::<DemographicRow>(paths.demographics)?,
        temperatures: read_optional_csv::<TemperatureRow>(paths.temperature)?,
        green_space: read_optional_csv::<GreenSpaceRow>(paths.green_space)?,
        ac_access: read_optional_csv::<AcAccessRow>(paths.ac_access)?,
        boundaries: match paths.boundaries {
            Some(path) => read_boundaries(path, paths.boundary_id_property)?,
            None => Vec::new(),
        },
    })
}

/// Loads the run configuration, falling back to defaults when no file
/// is given.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not valid TOML.
pub fn load_config(path: Option<&Path>) -> Result<PipelineConfig, LoadError> {
    match path {
        Some(path) => {
            let text = std::fs::read_to_string(path)?;
            Ok(toml::from_str(&text)?)
        }
        None => Ok(PipelineConfig::default()),
    }
}

fn read_csv<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, LoadError> {
    let mut reader = csv::Reader::from_path(path)?;
    let mut rows = Vec::new();
    for row in reader.deserialize() {
        rows.push(row?);
    }
    log::info!("Loaded {} rows from {}", rows.len(), path.display());
    Ok(rows)
}

fn read_optional_csv<T: DeserializeOwned>(path: Option<&Path>) -> Result<Vec<T>, LoadError> {
    path.map_or_else(|| Ok(Vec::new()), read_csv)
}

/// Reads unit boundaries from a GeoJSON `FeatureCollection`.
///
/// Features without a geometry or without the configured id property are
/// skipped with a warning; the unit still appears in the tabular output
/// as long as it has a demographics row.
fn read_boundaries(path: &Path, id_property: &str) -> Result<Vec<UnitBoundary>, LoadError> {
    let text = std::fs::read_to_string(path)?;
    let collection = FeatureCollection::try_from(text.parse::<GeoJson>()?)?;

    let mut boundaries = Vec::new();
    for feature in collection.features {
        let Some(unit_id) = property_as_string(&feature, id_property) else {
            log::warn!(
                "Skipping boundary feature without \"{id_property}\" property in {}",
                path.display()
            );
            continue;
        };
        let Some(geometry) = feature.geometry else {
            log::warn!("Skipping boundary feature {unit_id} without geometry");
            continue;
        };
        boundaries.push(UnitBoundary { unit_id, geometry });
    }

    log::info!(
        "Loaded {} boundaries from {}",
        boundaries.len(),
        path.display()
    );
    Ok(boundaries)
}

fn property_as_string(feature: &geojson::Feature, key: &str) -> Option<String> {
    match feature.property(key)? {
        geojson::JsonValue::String(s) => Some(s.clone()),
        geojson::JsonValue::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write as _;

    use super::*;

    fn write_file(dir: &tempfile::TempDir, name: &str, contents: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn demographics_csv_parses_with_optional_income() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(
            &dir,
            "demographics.csv",
            "unit_id,population,median_income\n400101,3421,45000\n400102,2950,\n",
        );

        let rows: Vec<DemographicRow> = read_csv(&path).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].unit_id, "400101");
        assert_eq!(rows[0].population, 3421);
        assert_eq!(rows[0].median_income, Some(45_000.0));
        assert_eq!(rows[1].median_income, None);
    }

    #[test]
    fn absent_secondary_tables_load_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let demographics = write_file(
            &dir,
            "demographics.csv",
            "unit_id,population,median_income\nA,1000,30000\n",
        );

        let tables = load_tables(&InputPaths {
            demographics: &demographics,
            temperature: None,
            green_space: None,
            ac_access: None,
            boundaries: None,
            boundary_id_property: "unit_id",
        })
        .unwrap();

        assert_eq!(tables.demographics.len(), 1);
        assert!(tables.temperatures.is_empty());
        assert!(tables.boundaries.is_empty());
    }

    #[test]
    fn boundaries_keep_configured_id_property() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(
            &dir,
            "boundaries.geojson",
            r#"{
              "type": "FeatureCollection",
              "features": [
                {
                  "type": "Feature",
                  "properties": { "GEOID": "400101" },
                  "geometry": {
                    "type": "Polygon",
                    "coordinates": [[[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 0.0]]]
                  }
                },
                {
                  "type": "Feature",
                  "properties": { "name": "unlabeled" },
                  "geometry": null
                }
              ]
            }"#,
        );

        let boundaries = read_boundaries(&path, "GEOID").unwrap();
        assert_eq!(boundaries.len(), 1);
        assert_eq!(boundaries[0].unit_id, "400101");
    }

    #[test]
    fn numeric_id_property_is_stringified() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(
            &dir,
            "boundaries.geojson",
            r#"{
              "type": "FeatureCollection",
              "features": [
                {
                  "type": "Feature",
                  "properties": { "unit_id": 400101 },
                  "geometry": {
                    "type": "Polygon",
                    "coordinates": [[[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 0.0]]]
                  }
                }
              ]
            }"#,
        );

        let boundaries = read_boundaries(&path, "unit_id").unwrap();
        assert_eq!(boundaries[0].unit_id, "400101");
    }

    #[test]
    fn config_defaults_when_no_file_given() {
        let config = load_config(None).unwrap();
        assert_eq!(config, PipelineConfig::default());
    }

    #[test]
    fn config_file_overrides_weights() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(
            &dir,
            "config.toml",
            "[weights]\ntemperature = 0.40\nac_access = 0.20\nincome = 0.20\ngreen_space = 0.20\n",
        );

        let config = load_config(Some(&path)).unwrap();
        assert!((config.weights.temperature - 0.40).abs() < 1e-9);
        assert_eq!(config.level_count, 5);
    }
}
