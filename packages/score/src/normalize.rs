//! Stage 2: component normalization.
//!
//! Rescales each raw metric to [0, 1] with min-max normalization over the
//! current run's unit set, then applies vulnerability directionality:
//!
//! | Raw metric              | Direction                                  |
//! |-------------------------|--------------------------------------------|
//! | `mean_temperature`      | higher raw → higher vulnerability (as-is)  |
//! | `median_income`         | higher raw → lower vulnerability (1 - n)   |
//! | `ac_access_probability` | higher raw → lower vulnerability (1 - raw) |
//! | `green_space_fraction`  | higher raw → lower vulnerability (1 - n)   |
//!
//! AC access is already a probability in [0, 1], so it is inverted
//! directly rather than min-max normalized.
//!
//! This is the one place where unit records interact: the extrema depend
//! on the whole cohort, so normalization is an explicit two-pass
//! transformation (collect extrema, then map) and cannot be computed
//! per-unit in isolation.

use heat_map_score_models::ComponentScores;
use heat_map_tract_models::{ArealUnitRecord, Column, RunNotice};

/// Observed min/max of one raw column.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Extent {
    /// Smallest observed value.
    pub min: f64,
    /// Largest observed value.
    pub max: f64,
}

impl Extent {
    fn collect(values: impl Iterator<Item = f64>) -> Self {
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for value in values {
            min = min.min(value);
            max = max.max(value);
        }
        Self { min, max }
    }

    /// Whether the column has zero spread (all units identical).
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        self.max <= self.min
    }

    /// Min-max normalizes a value against this extent.
    ///
    /// A degenerate extent maps every value to the neutral 0.5 to avoid
    /// division by zero.
    #[must_use]
    pub fn normalize(&self, value: f64) -> f64 {
        if self.is_degenerate() {
            0.5
        } else {
            ((value - self.min) / (self.max - self.min)).clamp(0.0, 1.0)
        }
    }
}

/// Per-run min/max statistics for the min-max normalized columns.
///
/// Ephemeral: recomputed from scratch every run, never cached across
/// runs or updated incrementally from partial batches.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalizationContext {
    /// Extent of `mean_temperature`.
    pub temperature: Extent,
    /// Extent of `median_income`.
    pub income: Extent,
    /// Extent of `green_space_fraction`.
    pub green_space: Extent,
}

impl NormalizationContext {
    /// First pass: collects column extrema over the full unit set.
    #[must_use]
    pub fn collect(units: &[ArealUnitRecord]) -> Self {
        Self {
            temperature: Extent::collect(units.iter().map(|u| u.mean_temperature)),
            income: Extent::collect(units.iter().map(|u| u.median_income)),
            green_space: Extent::collect(units.iter().map(|u| u.green_space_fraction)),
        }
    }
}

/// Normalizes every unit's raw metrics into directional component scores.
///
/// Returns one [`ComponentScores`] per unit (input order preserved) and a
/// [`RunNotice::DegenerateRange`] for each zero-spread column.
#[must_use]
pub fn normalize(units: &[ArealUnitRecord]) -> (Vec<ComponentScores>, Vec<RunNotice>) {
    let context = NormalizationContext::collect(units);

    let mut notices = Vec::new();
    if !units.is_empty() {
        for (extent, column) in [
            (context.temperature, Column::MeanTemperature),
            (context.income, Column::MedianIncome),
            (context.green_space, Column::GreenSpaceFraction),
        ] {
            if extent.is_degenerate() {
                log::warn!("Zero spread in {column}, every unit normalizes to 0.5");
                notices.push(RunNotice::DegenerateRange { column });
            }
        }
    }

    let components = units
        .iter()
        .map(|unit| ComponentScores {
            temperature: context.temperature.normalize(unit.mean_temperature),
            ac_access: (1.0 - unit.ac_access_probability).clamp(0.0, 1.0),
            income: 1.0 - context.income.normalize(unit.median_income),
            green_space: 1.0 - context.green_space.normalize(unit.green_space_fraction),
        })
        .collect();

    (components, notices)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit(id: &str, income: f64, temp: f64, ac: f64, green: f64) -> ArealUnitRecord {
        ArealUnitRecord {
            unit_id: id.to_string(),
            population: 0,
            median_income: income,
            mean_temperature: temp,
            ac_access_probability: ac,
            green_space_fraction: green,
            geometry: None,
        }
    }

    #[test]
    fn extremes_map_to_zero_and_one() {
        let units = vec![
            unit("cool", 80_000.0, 24.0, 0.9, 0.5),
            unit("hot", 30_000.0, 32.0, 0.3, 0.1),
        ];
        let (components, notices) = normalize(&units);

        assert!(notices.is_empty());
        // Coolest, richest, greenest unit scores 0 on all min-max columns.
        assert!((components[0].temperature - 0.0).abs() < 1e-9);
        assert!((components[0].income - 0.0).abs() < 1e-9);
        assert!((components[0].green_space - 0.0).abs() < 1e-9);
        assert!((components[1].temperature - 1.0).abs() < 1e-9);
        assert!((components[1].income - 1.0).abs() < 1e-9);
        assert!((components[1].green_space - 1.0).abs() < 1e-9);
    }

    #[test]
    fn ac_access_is_inverted_not_normalized() {
        // Both units have nonzero AC access; min-max would map the lower
        // one to 1.0, but the contract is 1 - raw.
        let units = vec![
            unit("a", 50_000.0, 28.0, 0.40, 0.2),
            unit("b", 60_000.0, 26.0, 0.95, 0.3),
        ];
        let (components, _) = normalize(&units);
        assert!((components[0].ac_access - 0.60).abs() < 1e-9);
        assert!((components[1].ac_access - 0.05).abs() < 1e-9);
    }

    #[test]
    fn identical_column_yields_neutral_half_for_every_unit() {
        let units = vec![
            unit("a", 40_000.0, 28.0, 0.5, 0.2),
            unit("b", 40_000.0, 26.0, 0.7, 0.3),
            unit("c", 40_000.0, 30.0, 0.9, 0.4),
        ];
        let (components, notices) = normalize(&units);

        assert!(components.iter().all(|c| (c.income - 0.5).abs() < 1e-9));
        assert_eq!(
            notices,
            vec![RunNotice::DegenerateRange {
                column: Column::MedianIncome,
            }]
        );
    }

    #[test]
    fn midpoint_normalizes_to_half() {
        let units = vec![
            unit("a", 40_000.0, 20.0, 0.5, 0.0),
            unit("b", 60_000.0, 25.0, 0.5, 0.2),
            unit("c", 80_000.0, 30.0, 0.5, 0.4),
        ];
        let (components, _) = normalize(&units);
        assert!((components[1].temperature - 0.5).abs() < 1e-9);
        assert!((components[1].income - 0.5).abs() < 1e-9);
        assert!((components[1].green_space - 0.5).abs() < 1e-9);
    }

    #[test]
    fn empty_unit_set_produces_nothing() {
        let (components, notices) = normalize(&[]);
        assert!(components.is_empty());
        assert!(notices.is_empty());
    }
}
