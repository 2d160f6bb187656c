#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Stages 2-4a of the vulnerability pipeline: component normalization,
//! composite scoring, and ordinal risk classification.
//!
//! All three stages are pure functions of the full assembled unit set.
//! Normalization and classification are run-relative by design: min-max
//! extrema and bin edges are recomputed from the current cohort every
//! run, so a level 5 unit in one run is not numerically comparable to a
//! level 5 unit in another.

pub mod classify;
pub mod composite;
pub mod normalize;

use heat_map_score_models::{InvalidWeightsError, VulnerabilityRecord, Weights};
use heat_map_tract_models::{ArealUnitRecord, RunNotice};
use thiserror::Error;

/// Errors that can occur during scoring.
#[derive(Debug, Error)]
pub enum ScoreError {
    /// The configured component weights are unusable. Checked before any
    /// scoring happens, so a bad configuration never produces output.
    #[error("Invalid weight configuration: {0}")]
    InvalidWeightConfiguration(#[from] InvalidWeightsError),
}

/// Scored output for a unit set, plus notices from degenerate columns.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredDataset {
    /// One record per input unit, in input order.
    pub records: Vec<VulnerabilityRecord>,
    /// Degenerate-range notices for any zero-spread column.
    pub notices: Vec<RunNotice>,
}

/// Runs normalization, composite scoring, and classification over an
/// assembled unit set.
///
/// # Errors
///
/// Returns [`ScoreError::InvalidWeightConfiguration`] if `weights` do
/// not validate; no scoring happens in that case.
pub fn score_units(
    units: &[ArealUnitRecord],
    weights: &Weights,
    level_count: u8,
) -> Result<ScoredDataset, ScoreError> {
    weights.validate()?;

    let (components, mut notices) = normalize::normalize(units);
    let scores = composite::composite_scores(&components, weights);
    let (levels, classify_notice) = classify::classify(&scores, level_count);
    notices.extend(classify_notice);

    let records = units
        .iter()
        .zip(&components)
        .zip(scores.iter().zip(&levels))
        .map(|((unit, components), (&composite_score, &risk_level))| VulnerabilityRecord {
            unit_id: unit.unit_id.clone(),
            population: unit.population,
            median_income: unit.median_income,
            mean_temperature: unit.mean_temperature,
            ac_access_probability: unit.ac_access_probability,
            green_space_fraction: unit.green_space_fraction,
            components: *components,
            composite_score,
            risk_level,
        })
        .collect();

    Ok(ScoredDataset { records, notices })
}
