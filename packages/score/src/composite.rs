//! Stage 3: the composite scorer.
//!
//! The composite vulnerability score is the weighted sum of the four
//! normalized components. With components in [0, 1] and weights
//! non-negative summing to 1.0, the result is guaranteed to lie in
//! [0, 1]; the clamp only absorbs floating rounding at the edges.

use heat_map_score_models::{ComponentScores, Weights};

/// Computes the weighted composite score for one unit.
#[must_use]
pub fn composite(components: &ComponentScores, weights: &Weights) -> f64 {
    let score = weights.temperature * components.temperature
        + weights.ac_access * components.ac_access
        + weights.income * components.income
        + weights.green_space * components.green_space;
    score.clamp(0.0, 1.0)
}

/// Computes composite scores for a full unit set, input order preserved.
///
/// Callers are expected to have validated `weights` already (the
/// pipeline does so before normalization).
#[must_use]
pub fn composite_scores(components: &[ComponentScores], weights: &Weights) -> Vec<f64> {
    components
        .iter()
        .map(|c| composite(c, weights))
        .collect()
}
