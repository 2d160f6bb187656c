//! Per-run summary report.
//!
//! Captures the run metadata a reviewer needs to audit a result without
//! re-running it: level distribution with population shares, the most
//! vulnerable tracts, and every accumulated notice (defaulted values,
//! degenerate ranges).

use heat_map_score_models::VulnerabilityRecord;
use heat_map_tract_models::RunNotice;
use serde::{Deserialize, Serialize};

/// Number of top-scoring units listed in the report.
const MOST_VULNERABLE_COUNT: usize = 5;

/// Summary of one risk level's share of the run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelSummary {
    /// Risk level.
    pub level: u8,
    /// Number of units at this level.
    pub unit_count: usize,
    /// Total population at this level.
    pub population: u64,
    /// Fraction of the run's population at this level, in [0, 1].
    pub population_share: f64,
}

/// One entry in the most-vulnerable listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopUnit {
    /// Geographic unit identifier.
    pub unit_id: String,
    /// Composite vulnerability score.
    pub composite_score: f64,
    /// Risk level.
    pub risk_level: u8,
    /// Population of the unit.
    pub population: u64,
}

/// Metadata and audit trail for one pipeline run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunReport {
    /// ISO 8601 timestamp of the run.
    pub generated_at: String,
    /// Number of units scored.
    pub unit_count: usize,
    /// Total population across all units.
    pub total_population: u64,
    /// Per-level distribution, ascending by level. Only levels with at
    /// least one unit appear.
    pub level_distribution: Vec<LevelSummary>,
    /// The highest-scoring units, descending by composite score.
    pub most_vulnerable: Vec<TopUnit>,
    /// Non-fatal conditions observed during the run.
    pub notices: Vec<RunNotice>,
}

/// Builds the run report from the scored records and accumulated
/// notices.
#[must_use]
pub fn build(records: &[VulnerabilityRecord], notices: Vec<RunNotice>) -> RunReport {
    let total_population: u64 = records.iter().map(|r| r.population).sum();

    let mut levels: Vec<u8> = records.iter().map(|r| r.risk_level).collect();
    levels.sort_unstable();
    levels.dedup();

    let level_distribution = levels
        .into_iter()
        .map(|level| {
            let at_level: Vec<&VulnerabilityRecord> =
                records.iter().filter(|r| r.risk_level == level).collect();
            let population: u64 = at_level.iter().map(|r| r.population).sum();
            LevelSummary {
                level,
                unit_count: at_level.len(),
                population,
                population_share: if total_population == 0 {
                    0.0
                } else {
                    #[allow(clippy::cast_precision_loss)]
                    {
                        population as f64 / total_population as f64
                    }
                },
            }
        })
        .collect();

    let mut ranked: Vec<&VulnerabilityRecord> = records.iter().collect();
    ranked.sort_by(|a, b| b.composite_score.total_cmp(&a.composite_score));
    let most_vulnerable = ranked
        .into_iter()
        .take(MOST_VULNERABLE_COUNT)
        .map(|r| TopUnit {
            unit_id: r.unit_id.clone(),
            composite_score: r.composite_score,
            risk_level: r.risk_level,
            population: r.population,
        })
        .collect();

    RunReport {
        generated_at: chrono::Utc::now().to_rfc3339(),
        unit_count: records.len(),
        total_population,
        level_distribution,
        most_vulnerable,
        notices,
    }
}

#[cfg(test)]
mod tests {
    use heat_map_score_models::ComponentScores;

    use super::*;

    fn record(id: &str, population: u64, score: f64, level: u8) -> VulnerabilityRecord {
        VulnerabilityRecord {
            unit_id: id.to_string(),
            population,
            median_income: 50_000.0,
            mean_temperature: 27.0,
            ac_access_probability: 0.6,
            green_space_fraction: 0.2,
            components: ComponentScores {
                temperature: 0.5,
                ac_access: 0.4,
                income: 0.5,
                green_space: 0.8,
            },
            composite_score: score,
            risk_level: level,
        }
    }

    #[test]
    fn distribution_sums_population_per_level() {
        let records = vec![
            record("a", 1000, 0.2, 1),
            record("b", 2000, 0.3, 1),
            record("c", 3000, 0.9, 5),
        ];
        let report = build(&records, Vec::new());

        assert_eq!(report.unit_count, 3);
        assert_eq!(report.total_population, 6000);
        assert_eq!(report.level_distribution.len(), 2);

        let level_one = &report.level_distribution[0];
        assert_eq!(level_one.level, 1);
        assert_eq!(level_one.unit_count, 2);
        assert_eq!(level_one.population, 3000);
        assert!((level_one.population_share - 0.5).abs() < 1e-9);
    }

    #[test]
    fn most_vulnerable_is_descending_and_capped() {
        let records: Vec<VulnerabilityRecord> = (0..8)
            .map(|i| record(&format!("u{i}"), 100, f64::from(i) / 10.0, 1))
            .collect();
        let report = build(&records, Vec::new());

        assert_eq!(report.most_vulnerable.len(), 5);
        assert_eq!(report.most_vulnerable[0].unit_id, "u7");
        for pair in report.most_vulnerable.windows(2) {
            assert!(pair[0].composite_score >= pair[1].composite_score);
        }
    }

    #[test]
    fn notices_are_carried_through() {
        let notices = vec![heat_map_tract_models::RunNotice::DegenerateRange {
            column: heat_map_tract_models::Column::CompositeScore,
        }];
        let report = build(&[], notices.clone());
        assert_eq!(report.notices, notices);
        assert_eq!(report.total_population, 0);
        assert!(report.level_distribution.is_empty());
    }
}
