//! Level style table: fill color and opacity keyed by risk level.
//!
//! The default table is fixed for compatibility with existing map
//! consumers and must not be reordered or recolored:
//!
//! | Level | Color     | Fill opacity |
//! |-------|-----------|--------------|
//! | 1     | `#2E8B57` | 0.6          |
//! | 2     | `#90EE90` | 0.7          |
//! | 3     | `#FFFF00` | 0.8          |
//! | 4     | `#FFA500` | 0.9          |
//! | 5     | `#FF4500` | 1.0          |

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Stroke color drawn around every tract polygon.
pub const STROKE_COLOR: &str = "white";

/// Stroke opacity for every tract polygon.
pub const STROKE_OPACITY: f64 = 0.8;

/// Stroke weight in pixels for every tract polygon.
pub const STROKE_WEIGHT: f64 = 1.0;

/// Fill color used for a level with no entry in the table (only
/// reachable with a custom `level_count`/`color_table` configuration).
pub const FALLBACK_COLOR: &str = "#CCCCCC";

/// Fill opacity used for a level with no entry in the table.
pub const FALLBACK_OPACITY: f64 = 0.8;

/// Fill style for one risk level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelStyle {
    /// Hex fill color (e.g. `#FF4500`).
    pub color: String,
    /// Fill opacity in [0, 1].
    pub fill_opacity: f64,
}

/// Mapping from risk level to fill style.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColorTable(pub BTreeMap<u8, LevelStyle>);

impl Default for ColorTable {
    fn default() -> Self {
        let entries = [
            (1, "#2E8B57", 0.6),
            (2, "#90EE90", 0.7),
            (3, "#FFFF00", 0.8),
            (4, "#FFA500", 0.9),
            (5, "#FF4500", 1.0),
        ];
        Self(
            entries
                .into_iter()
                .map(|(level, color, fill_opacity)| {
                    (
                        level,
                        LevelStyle {
                            color: color.to_string(),
                            fill_opacity,
                        },
                    )
                })
                .collect(),
        )
    }
}

impl ColorTable {
    /// Returns the fill style for a level, falling back to the neutral
    /// gray for levels outside the table.
    #[must_use]
    pub fn style_for(&self, level: u8) -> LevelStyle {
        self.0.get(&level).cloned().unwrap_or_else(|| LevelStyle {
            color: FALLBACK_COLOR.to_string(),
            fill_opacity: FALLBACK_OPACITY,
        })
    }
}

/// Human-readable name for a level, used in the map legend.
///
/// The five canonical levels keep their published names; other level
/// counts fall back to plain "Level N" labels.
#[must_use]
pub fn level_name(level: u8, level_count: u8) -> String {
    if level_count == 5 {
        match level {
            1 => return "1 (Lowest)".to_string(),
            2 => return "2 (Low)".to_string(),
            3 => return "3 (Moderate)".to_string(),
            4 => return "4 (High)".to_string(),
            5 => return "5 (Highest)".to_string(),
            _ => {}
        }
    }
    format!("Level {level}")
}
