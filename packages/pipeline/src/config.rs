//! Run configuration: component weights, level count, and color table.
//!
//! Deserialized from an optional TOML file by the CLI; every field has a
//! default, so an absent or empty file yields the published
//! 0.30/0.25/0.25/0.20 weights, five levels, and the fixed color table.

use heat_map_render::style::{ColorTable, LevelStyle};
use heat_map_score_models::Weights;
use serde::{Deserialize, Serialize};

/// Configuration surface for one pipeline run.
///
/// ```toml
/// level_count = 5
///
/// [weights]
/// temperature = 0.30
/// ac_access = 0.25
/// income = 0.25
/// green_space = 0.20
///
/// [[color_table]]
/// level = 1
/// color = "#2E8B57"
/// fill_opacity = 0.6
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Component weights; validated before scoring.
    pub weights: Weights,
    /// Number of ordinal risk buckets.
    pub level_count: u8,
    /// Level style overrides; `None` keeps the fixed default table.
    pub color_table: Option<Vec<ColorTableEntry>>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            weights: Weights::default(),
            level_count: 5,
            color_table: None,
        }
    }
}

/// One configured level style row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorTableEntry {
    /// Risk level the style applies to.
    pub level: u8,
    /// Hex fill color.
    pub color: String,
    /// Fill opacity in [0, 1].
    pub fill_opacity: f64,
}

impl PipelineConfig {
    /// Resolves the configured color table, falling back to the fixed
    /// default when no override is present.
    #[must_use]
    pub fn color_table(&self) -> ColorTable {
        self.color_table.as_ref().map_or_else(ColorTable::default, |entries| {
            ColorTable(
                entries
                    .iter()
                    .map(|entry| {
                        (
                            entry.level,
                            LevelStyle {
                                color: entry.color.clone(),
                                fill_opacity: entry.fill_opacity,
                            },
                        )
                    })
                    .collect(),
            )
        })
    }
}
