#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Orchestrates the vulnerability pipeline: assemble → normalize →
//! score → classify → render, as a pure function of the input snapshot
//! and configuration.
//!
//! Fatal errors (empty unit universe, invalid weights) abort the run
//! with no output. Non-fatal conditions are accumulated as notices and
//! attached to the run report instead of thrown. No state survives
//! between runs: every run recomputes its normalization context and bin
//! edges from its own cohort.

mod config;
pub mod export;
pub mod report;

use heat_map_assemble::{AssembleError, assemble};
use heat_map_render::RenderDataset;
use heat_map_render::render_dataset;
use heat_map_score::{ScoreError, score_units};
use heat_map_score_models::VulnerabilityRecord;
use heat_map_tract_models::RawTables;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use config::{ColorTableEntry, PipelineConfig};
pub use report::RunReport;

/// Errors that abort a pipeline run. No artifact is produced when any
/// of these occur.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Dataset assembly failed.
    #[error(transparent)]
    Assemble(#[from] AssembleError),

    /// Scoring failed.
    #[error(transparent)]
    Score(#[from] ScoreError),
}

/// One row of the flat tabular artifact: raw fields, normalized
/// components, and derived values for one unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlatRecord {
    /// Geographic unit identifier.
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
    /// Normalized temperature component.
    pub temperature_score: f64,
    /// Normalized AC-access component.
    pub ac_access_score: f64,
    /// Normalized income component.
    pub income_score: f64,
    /// Normalized green-space component.
    pub green_space_score: f64,
    /// Weighted composite vulnerability score.
    pub composite_score: f64,
    /// Ordinal risk level.
    pub risk_level: u8,
}

impl From<&VulnerabilityRecord> for FlatRecord {
    fn from(record: &VulnerabilityRecord) -> Self {
        Self {
            unit_id: record.unit_id.clone(),
            population: record.population,
            median_income: record.median_income,
            mean_temperature: record.mean_temperature,
            ac_access_probability: record.ac_access_probability,
            green_space_fraction: record.green_space_fraction,
            temperature_score: record.components.temperature,
            ac_access_score: record.components.ac_access,
            income_score: record.components.income,
            green_space_score: record.components.green_space,
            composite_score: record.composite_score,
            risk_level: record.risk_level,
        }
    }
}

/// Everything one run produces: the flat table, the render-ready
/// dataset, and the run report.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineOutput {
    /// Flat tabular rows, one per unit, in demographic-table order.
    pub flat: Vec<FlatRecord>,
    /// Render-ready map dataset.
    pub render: RenderDataset,
    /// Run metadata and audit trail.
    pub report: RunReport,
}

/// Runs the full pipeline over one input snapshot.
///
/// # Errors
///
/// Returns [`PipelineError::Score`] if the configured weights are
/// invalid (checked up front, before assembly) and
/// [`PipelineError::Assemble`] if the demographic table is empty.
pub fn run(tables: &RawTables, config: &PipelineConfig) -> Result<PipelineOutput, PipelineError> {
    // Fail on a bad weight configuration before doing any work.
    config
        .weights
        .validate()
        .map_err(ScoreError::InvalidWeightConfiguration)?;

    log::info!(
        "Starting vulnerability run over {} demographic rows",
        tables.demographics.len()
    );

    let assembled = assemble(tables)?;
    let scored = score_units(&assembled.units, &config.weights, config.level_count)?;

    let mut notices = assembled.notices;
    notices.extend(scored.notices);

    let render = render_dataset(
        &assembled.units,
        &scored.records,
        config.level_count,
        &config.color_table(),
    );
    let flat = scored.records.iter().map(FlatRecord::from).collect();
    let report = report::build(&scored.records, notices);

    log::info!(
        "Run complete: {} units, {} notices",
        report.unit_count,
        report.notices.len()
    );

    Ok(PipelineOutput {
        flat,
        render,
        report,
    })
}
