#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Areal unit (census tract) domain types.
//!
//! These types represent the raw per-tract rows produced by the external
//! data collaborators (demographics, temperature, green space, AC access,
//! boundaries) and the assembled per-unit record that the scoring pipeline
//! consumes. Geometry is carried opaquely for rendering; the scoring logic
//! never inspects it.

pub mod unit_id;

use serde::{Deserialize, Serialize};

/// A row from the demographic table.
///
/// The demographic table is the authoritative unit universe: every unit
/// that appears here appears in the pipeline output, and no other unit
/// does.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DemographicRow {
    /// Geographic unit identifier (e.g. a census tract GEOID).
    pub unit_id: String,
    /// Total population of the unit.
    pub population: u64,
    /// Median household income in dollars. Absent rows are filled with
    /// the column mean during assembly.
    pub median_income: Option<f64>,
}

/// A row from the temperature table, pre-aggregated to unit level by the
/// remote sensing collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemperatureRow {
    /// Geographic unit identifier.
    pub unit_id: String,
    /// Mean surface temperature for the target period, in °C.
    pub mean_temperature: Option<f64>,
}

/// A row from the green-space coverage table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GreenSpaceRow {
    /// Geographic unit identifier.
    pub unit_id: String,
    /// Fraction of the unit's area covered by green space, in [0, 1].
    pub green_space_fraction: Option<f64>,
}

/// A row from the housing/AC table.
///
/// The probability is typically the output of a separate predictive
/// housing model, consumed here as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AcAccessRow {
    /// Geographic unit identifier.
    pub unit_id: String,
    /// Probability that a household in this unit has air conditioning,
    /// in [0, 1].
    pub ac_access_probability: Option<f64>,
}

/// A polygon boundary for one unit, from the geometry source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitBoundary {
    /// Geographic unit identifier.
    pub unit_id: String,
    /// `GeoJSON` polygon (or multi-polygon) boundary.
    pub geometry: geojson::Geometry,
}

/// The five raw input tables consumed by the assembler.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RawTables {
    /// Authoritative demographic table.
    pub demographics: Vec<DemographicRow>,
    /// Per-unit mean temperatures.
    pub temperatures: Vec<TemperatureRow>,
    /// Per-unit green-space coverage.
    pub green_space: Vec<GreenSpaceRow>,
    /// Per-unit AC-access probabilities.
    pub ac_access: Vec<AcAccessRow>,
    /// Per-unit polygon boundaries.
    pub boundaries: Vec<UnitBoundary>,
}

/// One assembled row per geographic unit, with every numeric field
/// concrete (missing values already defaulted to the column mean).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArealUnitRecord {
    /// Normalized geographic unit identifier.
    pub unit_id: String,
    /// Total population.
    pub population: u64,
    /// Median household income in dollars.
    pub median_income: f64,
    /// Mean surface temperature in °C.
    pub mean_temperature: f64,
    /// AC-access probability in [0, 1].
    pub ac_access_probability: f64,
    /// Green-space coverage fraction in [0, 1].
    pub green_space_fraction: f64,
    /// Polygon boundary, if the geometry source had one for this unit.
    /// Units without a boundary stay in the dataset; they just cannot
    /// be drawn.
    pub geometry: Option<geojson::Geometry>,
}

/// A raw metric column that feeds the vulnerability score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Column {
    /// Mean surface temperature.
    MeanTemperature,
    /// Median household income.
    MedianIncome,
    /// AC-access probability.
    AcAccessProbability,
    /// Green-space coverage fraction.
    GreenSpaceFraction,
    /// The derived composite vulnerability score.
    CompositeScore,
}

impl std::fmt::Display for Column {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MeanTemperature => write!(f, "mean_temperature"),
            Self::MedianIncome => write!(f, "median_income"),
            Self::AcAccessProbability => write!(f, "ac_access_probability"),
            Self::GreenSpaceFraction => write!(f, "green_space_fraction"),
            Self::CompositeScore => write!(f, "composite_score"),
        }
    }
}

/// A non-fatal condition observed during a run.
///
/// Notices are accumulated and attached to the run report rather than
/// aborting the run, so a reviewer can audit defaulted or degenerate
/// units without losing the rest of the result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum RunNotice {
    /// A unit lacked a value for a column and received the column-mean
    /// default.
    #[serde(rename_all = "camelCase")]
    MissingColumnDefaulted {
        /// The affected unit.
        unit_id: String,
        /// The column that was defaulted.
        column: Column,
        /// The column-mean value that was substituted.
        default: f64,
    },
    /// A column (or the composite score) had zero spread across the run,
    /// so the degenerate-case policy was applied.
    #[serde(rename_all = "camelCase")]
    DegenerateRange {
        /// The column with zero spread.
        column: Column,
    },
}

impl std::fmt::Display for RunNotice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingColumnDefaulted {
                unit_id,
                column,
                default,
            } => {
                write!(f, "unit {unit_id}: missing {column}, defaulted to column mean {default}")
            }
            Self::DegenerateRange { column } => {
                write!(f, "column {column} has zero spread across the run")
            }
        }
    }
}
