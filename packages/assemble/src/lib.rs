#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Stage 1 of the vulnerability pipeline: the tract dataset assembler.
//!
//! Merges the five raw source tables (demographics, temperature, green
//! space, AC access, boundaries) into one [`ArealUnitRecord`] per unit.
//! The demographic table is the authoritative unit universe: every
//! demographic unit appears in the output exactly once, and units missing
//! from a secondary source receive the column's mean over present values
//! rather than being dropped.
//!
//! Defaults are filled here, before normalization, so no downstream
//! [0, 1]-range computation ever sees an absent value.

use std::collections::BTreeMap;

use heat_map_tract_models::{ArealUnitRecord, Column, RawTables, RunNotice, unit_id};
use thiserror::Error;

/// Bounds enforced on AC-access probabilities at intake. The upstream
/// housing model guarantees [0.1, 0.99]; values outside that range are
/// clamped rather than rejected.
const AC_PROBABILITY_BOUNDS: (f64, f64) = (0.1, 0.99);

/// Errors that can occur during dataset assembly.
#[derive(Debug, Error)]
pub enum AssembleError {
    /// The authoritative demographic table was empty, so there is no
    /// unit universe to score.
    #[error("Incomplete unit universe: the demographic table is empty")]
    IncompleteUnitUniverse,
}

/// The assembled dataset: one record per unit in the demographic table,
/// plus the notices accumulated while filling defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct AssembledDataset {
    /// Assembled records, in demographic-table order.
    pub units: Vec<ArealUnitRecord>,
    /// One notice per defaulted (unit, column) pair.
    pub notices: Vec<RunNotice>,
}

/// Assembles the five raw tables into one record per demographic unit.
///
/// Joins are left joins against the demographic table, keyed by the
/// normalized unit id. A duplicate unit id in the demographic table is
/// collapsed (last row wins) with a logged warning, since the output
/// unit set must contain no duplicates.
///
/// # Errors
///
/// Returns [`AssembleError::IncompleteUnitUniverse`] if the demographic
/// table contains no usable rows.
pub fn assemble(tables: &RawTables) -> Result<AssembledDataset, AssembleError> {
    // Collapse the unit universe, preserving first-seen order.
    let mut order: Vec<String> = Vec::with_capacity(tables.demographics.len());
    let mut demographics: BTreeMap<String, (u64, Option<f64>)> = BTreeMap::new();
    for row in &tables.demographics {
        if !unit_id::is_valid(&row.unit_id) {
            log::warn!("Dropping demographic row with blank unit id");
            continue;
        }
        let id = unit_id::normalize(&row.unit_id);
        if demographics
            .insert(id.clone(), (row.population, row.median_income))
            .is_some()
        {
            log::warn!("Duplicate unit id '{id}' in demographic table, keeping the last row");
        } else {
            order.push(id);
        }
    }

    if order.is_empty() {
        return Err(AssembleError::IncompleteUnitUniverse);
    }

    let temperatures = index_column(&tables.temperatures, |r| (&r.unit_id, r.mean_temperature));
    let green_space = index_column(&tables.green_space, |r| {
        (&r.unit_id, r.green_space_fraction.map(clamp_fraction))
    });
    let ac_access = index_column(&tables.ac_access, |r| {
        (&r.unit_id, r.ac_access_probability.map(clamp_ac_probability))
    });

    let mut boundaries: BTreeMap<String, geojson::Geometry> = BTreeMap::new();
    for boundary in &tables.boundaries {
        boundaries.insert(
            unit_id::normalize(&boundary.unit_id),
            boundary.geometry.clone(),
        );
    }

    // Column means over the units that do have a value. A min-max column
    // with no values at all defaults to 0.0; the normalizer's
    // degenerate-range policy then neutralizes it to 0.5 for every unit.
    // AC access is not min-max normalized, so its empty-column fallback
    // is the neutral probability 0.5 directly.
    let income_default =
        present_mean(order.iter().filter_map(|id| demographics[id].1)).unwrap_or(0.0);
    let temperature_default =
        present_mean(order.iter().filter_map(|id| lookup(&temperatures, id))).unwrap_or(0.0);
    let green_default =
        present_mean(order.iter().filter_map(|id| lookup(&green_space, id))).unwrap_or(0.0);
    let ac_default =
        present_mean(order.iter().filter_map(|id| lookup(&ac_access, id))).unwrap_or(0.5);

    let mut units = Vec::with_capacity(order.len());
    let mut notices = Vec::new();

    for id in &order {
        let (population, median_income) = demographics[id];

        let median_income = median_income.unwrap_or_else(|| {
            notices.push(defaulted(id, Column::MedianIncome, income_default));
            income_default
        });
        let mean_temperature = lookup(&temperatures, id).unwrap_or_else(|| {
            notices.push(defaulted(id, Column::MeanTemperature, temperature_default));
            temperature_default
        });
        let green_space_fraction = lookup(&green_space, id).unwrap_or_else(|| {
            notices.push(defaulted(id, Column::GreenSpaceFraction, green_default));
            green_default
        });
        let ac_access_probability = lookup(&ac_access, id).unwrap_or_else(|| {
            notices.push(defaulted(id, Column::AcAccessProbability, ac_default));
            ac_default
        });

        let geometry = boundaries.get(id).cloned();
        if geometry.is_none() {
            log::warn!("No boundary geometry for unit '{id}', it will not be drawable");
        }

        units.push(ArealUnitRecord {
            unit_id: id.clone(),
            population,
            median_income,
            mean_temperature,
            ac_access_probability,
            green_space_fraction,
            geometry,
        });
    }

    log::info!(
        "Assembled {} units ({} values defaulted)",
        units.len(),
        notices.len()
    );

    Ok(AssembledDataset { units, notices })
}

/// Indexes a secondary table by normalized unit id, dropping rows whose
/// value is absent (they fall through to the column default).
fn index_column<R>(
    rows: &[R],
    extract: impl Fn(&R) -> (&String, Option<f64>),
) -> BTreeMap<String, f64> {
    let mut index = BTreeMap::new();
    for row in rows {
        let (id, value) = extract(row);
        if let Some(value) = value {
            index.insert(unit_id::normalize(id), value);
        }
    }
    index
}

fn lookup(index: &BTreeMap<String, f64>, id: &str) -> Option<f64> {
    index.get(id).copied()
}

/// Mean of the present values, or `None` if the column is entirely empty.
fn present_mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let mut sum = 0.0;
    let mut count: u64 = 0;
    for value in values {
        sum += value;
        count += 1;
    }
    if count == 0 {
        None
    } else {
        #[allow(clippy::cast_precision_loss)]
        Some(sum / count as f64)
    }
}

fn defaulted(unit_id: &str, column: Column, default: f64) -> RunNotice {
    log::warn!("Unit '{unit_id}' missing {column}, defaulting to column mean {default}");
    RunNotice::MissingColumnDefaulted {
        unit_id: unit_id.to_string(),
        column,
        default,
    }
}

fn clamp_fraction(value: f64) -> f64 {
    value.clamp(0.0, 1.0)
}

fn clamp_ac_probability(value: f64) -> f64 {
    value.clamp(AC_PROBABILITY_BOUNDS.0, AC_PROBABILITY_BOUNDS.1)
}

#[cfg(test)]
mod tests {
    use heat_map_tract_models::{
        AcAccessRow, DemographicRow, GreenSpaceRow, TemperatureRow, UnitBoundary,
    };

    use super::*;

    fn demographic(id: &str, population: u64, income: Option<f64>) -> DemographicRow {
        DemographicRow {
            unit_id: id.to_string(),
            population,
            median_income: income,
        }
    }

    fn temperature(id: &str, value: f64) -> TemperatureRow {
        TemperatureRow {
            unit_id: id.to_string(),
            mean_temperature: Some(value),
        }
    }

    fn green(id: &str, value: f64) -> GreenSpaceRow {
        GreenSpaceRow {
            unit_id: id.to_string(),
            green_space_fraction: Some(value),
        }
    }

    fn ac(id: &str, value: f64) -> AcAccessRow {
        AcAccessRow {
            unit_id: id.to_string(),
            ac_access_probability: Some(value),
        }
    }

    fn square() -> geojson::Geometry {
        geojson::Geometry::new(geojson::Value::Polygon(vec![vec![
            vec![0.0, 0.0],
            vec![1.0, 0.0],
            vec![1.0, 1.0],
            vec![0.0, 1.0],
            vec![0.0, 0.0],
        ]]))
    }

    fn three_unit_tables() -> RawTables {
        RawTables {
            demographics: vec![
                demographic("a", 1000, Some(40_000.0)),
                demographic("b", 2000, Some(60_000.0)),
                demographic("c", 3000, Some(80_000.0)),
            ],
            temperatures: vec![
                temperature("a", 29.0),
                temperature("b", 27.0),
                temperature("c", 25.0),
            ],
            green_space: vec![green("a", 0.1), green("b", 0.2), green("c", 0.3)],
            ac_access: vec![ac("a", 0.4), ac("b", 0.6), ac("c", 0.8)],
            boundaries: vec![UnitBoundary {
                unit_id: "a".to_string(),
                geometry: square(),
            }],
        }
    }

    #[test]
    fn empty_demographic_table_is_fatal() {
        let result = assemble(&RawTables::default());
        assert!(matches!(
            result,
            Err(AssembleError::IncompleteUnitUniverse)
        ));
    }

    #[test]
    fn blank_unit_ids_are_dropped() {
        let mut tables = three_unit_tables();
        tables.demographics.push(demographic("   ", 999, None));

        let dataset = assemble(&tables).unwrap();
        assert_eq!(dataset.units.len(), 3);

        let only_blank = RawTables {
            demographics: vec![demographic("", 1, None)],
            ..RawTables::default()
        };
        assert!(matches!(
            assemble(&only_blank),
            Err(AssembleError::IncompleteUnitUniverse)
        ));
    }

    #[test]
    fn unit_universe_follows_demographic_table() {
        let dataset = assemble(&three_unit_tables()).unwrap();
        let ids: Vec<&str> = dataset.units.iter().map(|u| u.unit_id.as_str()).collect();
        assert_eq!(ids, vec!["A", "B", "C"]);
        assert!(dataset.notices.is_empty());
    }

    #[test]
    fn missing_income_defaults_to_mean_of_present() {
        let mut tables = three_unit_tables();
        tables.demographics.push(demographic("d", 500, None));
        tables.temperatures.push(temperature("d", 26.0));
        tables.green_space.push(green("d", 0.25));
        tables.ac_access.push(ac("d", 0.5));

        let dataset = assemble(&tables).unwrap();
        let d = &dataset.units[3];
        // Mean of 40k/60k/80k.
        assert!((d.median_income - 60_000.0).abs() < 1e-9);
        assert_eq!(
            dataset.notices,
            vec![RunNotice::MissingColumnDefaulted {
                unit_id: "D".to_string(),
                column: Column::MedianIncome,
                default: 60_000.0,
            }]
        );
    }

    #[test]
    fn unit_absent_from_secondary_source_is_kept() {
        let mut tables = three_unit_tables();
        // No temperature row for "b" at all.
        tables.temperatures.retain(|r| r.unit_id != "b");

        let dataset = assemble(&tables).unwrap();
        assert_eq!(dataset.units.len(), 3);
        let b = &dataset.units[1];
        // Mean of 29.0 and 25.0.
        assert!((b.mean_temperature - 27.0).abs() < 1e-9);
    }

    #[test]
    fn duplicate_demographic_unit_keeps_last_row() {
        let mut tables = three_unit_tables();
        tables.demographics.push(demographic("a", 1234, Some(50_000.0)));

        let dataset = assemble(&tables).unwrap();
        assert_eq!(dataset.units.len(), 3);
        assert_eq!(dataset.units[0].unit_id, "A");
        assert_eq!(dataset.units[0].population, 1234);
    }

    #[test]
    fn join_keys_are_normalized() {
        let mut tables = three_unit_tables();
        tables.temperatures[0].unit_id = "  a ".to_string();

        let dataset = assemble(&tables).unwrap();
        assert!((dataset.units[0].mean_temperature - 29.0).abs() < 1e-9);
    }

    #[test]
    fn ac_probability_is_clamped_to_model_bounds() {
        let mut tables = three_unit_tables();
        tables.ac_access[0].ac_access_probability = Some(1.5);
        tables.ac_access[1].ac_access_probability = Some(0.0);

        let dataset = assemble(&tables).unwrap();
        assert!((dataset.units[0].ac_access_probability - 0.99).abs() < 1e-9);
        assert!((dataset.units[1].ac_access_probability - 0.1).abs() < 1e-9);
    }

    #[test]
    fn entirely_missing_column_defaults_to_zero() {
        let mut tables = three_unit_tables();
        tables.green_space.clear();

        let dataset = assemble(&tables).unwrap();
        assert!(dataset
            .units
            .iter()
            .all(|u| u.green_space_fraction.abs() < f64::EPSILON));
        let green_notices = dataset
            .notices
            .iter()
            .filter(|n| {
                matches!(
                    n,
                    RunNotice::MissingColumnDefaulted {
                        column: Column::GreenSpaceFraction,
                        ..
                    }
                )
            })
            .count();
        assert_eq!(green_notices, 3);
    }

    #[test]
    fn geometry_is_attached_when_available() {
        let dataset = assemble(&three_unit_tables()).unwrap();
        assert!(dataset.units[0].geometry.is_some());
        assert!(dataset.units[1].geometry.is_none());
    }
}
