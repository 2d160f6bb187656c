//! Stage 4a: the risk classifier.
//!
//! Buckets continuous composite scores into ordinal levels using
//! equal-width bins spanning the observed score range of the current
//! run. Levels are relative to the run's cohort, not an absolute
//! heat-risk scale.
//!
//! Edge policy: the minimum-scoring unit is level 1, the maximum-scoring
//! unit is the top level, and a value exactly on a bin boundary belongs
//! to the lower bin.

use heat_map_tract_models::{Column, RunNotice};

/// Classifies composite scores into 1..=`level_count` levels.
///
/// Returns one level per score (input order preserved) and a
/// [`RunNotice::DegenerateRange`] if all scores were equal, in which
/// case every unit is assigned level 1 (the deliberate default: with
/// zero spread there is no bin width to divide by, and no evidence any
/// unit is more at risk than another).
#[must_use]
pub fn classify(scores: &[f64], level_count: u8) -> (Vec<u8>, Option<RunNotice>) {
    if scores.is_empty() || level_count == 0 {
        return (vec![1; scores.len()], None);
    }

    let min = scores.iter().copied().fold(f64::INFINITY, f64::min);
    let max = scores.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    if max <= min {
        log::warn!("Zero spread in composite scores, every unit is level 1");
        return (
            vec![1; scores.len()],
            Some(RunNotice::DegenerateRange {
                column: Column::CompositeScore,
            }),
        );
    }

    let width = (max - min) / f64::from(level_count);
    let levels = scores
        .iter()
        .map(|&score| {
            // Ceiling puts boundary values in the lower bin; the clamp
            // pins the global minimum to level 1 and the global maximum
            // (plus any rounding overshoot) to the top level.
            let bin = ((score - min) / width).ceil();
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            {
                bin.clamp(1.0, f64::from(level_count)) as u8
            }
        })
        .collect();

    (levels, None)
}
