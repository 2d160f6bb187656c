#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Vulnerability scoring types: component weights, normalized component
//! scores, and the per-unit scored record.
//!
//! The composite score is a fixed-weight linear combination of four
//! normalized components. Weights are a configuration surface, so they
//! carry their own validation (non-negative, summing to 1.0 within
//! floating tolerance).

use serde::{Deserialize, Serialize};

/// Tolerance for the weight-sum invariant check.
pub const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

/// Component weights for the composite vulnerability score.
///
/// Must be non-negative and sum to 1.0 within [`WEIGHT_SUM_TOLERANCE`];
/// this is asserted via [`Weights::validate`] before any scoring happens.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Weights {
    /// Weight of the temperature component.
    pub temperature: f64,
    /// Weight of the AC-access component.
    pub ac_access: f64,
    /// Weight of the income component.
    pub income: f64,
    /// Weight of the green-space component.
    pub green_space: f64,
}

impl Default for Weights {
    /// The published 0.30/0.25/0.25/0.20 split.
    fn default() -> Self {
        Self {
            temperature: 0.30,
            ac_access: 0.25,
            income: 0.25,
            green_space: 0.20,
        }
    }
}

impl Weights {
    /// Returns the sum of the four weights.
    #[must_use]
    pub fn sum(&self) -> f64 {
        self.temperature + self.ac_access + self.income + self.green_space
    }

    /// Checks the weight invariants: all weights non-negative, sum equal
    /// to 1.0 within [`WEIGHT_SUM_TOLERANCE`].
    ///
    /// # Errors
    ///
    /// Returns [`InvalidWeightsError`] if either invariant is violated.
    pub fn validate(&self) -> Result<(), InvalidWeightsError> {
        if self.temperature < 0.0
            || self.ac_access < 0.0
            || self.income < 0.0
            || self.green_space < 0.0
        {
            return Err(InvalidWeightsError { sum: self.sum() });
        }

        let sum = self.sum();
        if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(InvalidWeightsError { sum });
        }

        Ok(())
    }
}

/// Error returned when a weight configuration is unusable.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InvalidWeightsError {
    /// The sum of the configured weights.
    pub sum: f64,
}

impl std::fmt::Display for InvalidWeightsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "invalid weight configuration: weights must be non-negative and sum to 1.0 (got {})",
            self.sum
        )
    }
}

impl std::error::Error for InvalidWeightsError {}

/// The four normalized vulnerability components for one unit.
///
/// All values lie in [0, 1] with vulnerability directionality already
/// applied: higher always means more vulnerable.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentScores {
    /// Normalized temperature score (hotter is higher).
    pub temperature: f64,
    /// Inverted AC-access probability (less access is higher).
    pub ac_access: f64,
    /// Inverted normalized income (poorer is higher).
    pub income: f64,
    /// Inverted normalized green-space coverage (less green is higher).
    pub green_space: f64,
}

/// The fully scored output record for one unit: raw pass-through fields,
/// component scores, composite score, and ordinal risk level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VulnerabilityRecord {
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
    /// The normalized components.
    pub components: ComponentScores,
    /// Weighted composite vulnerability score in [0, 1].
    pub composite_score: f64,
    /// Ordinal risk level in 1..=`level_count` (default 1-5,
    /// 1 = lowest risk).
    pub risk_level: u8,
}
