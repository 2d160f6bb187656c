#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Stage 4b of the vulnerability pipeline: the render-ready dataset.
//!
//! Pairs each scored unit's geometry with a style descriptor (fill color
//! and opacity keyed by risk level, constant white stroke), a formatted
//! popup field set, and a tooltip line. The output serializes to the
//! JSON shape the interactive map consumes.

pub mod format;
pub mod style;

use heat_map_score_models::VulnerabilityRecord;
use heat_map_tract_models::ArealUnitRecord;
use serde::{Deserialize, Serialize};

use crate::style::ColorTable;

/// Full style descriptor for one tract polygon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TractStyle {
    /// Hex fill color keyed by risk level.
    pub color: String,
    /// Fill opacity keyed by risk level.
    pub fill_opacity: f64,
    /// Stroke color (constant).
    pub stroke_color: String,
    /// Stroke opacity (constant).
    pub stroke_opacity: f64,
    /// Stroke weight in pixels (constant).
    pub stroke_weight: f64,
}

impl TractStyle {
    /// Builds the style for a risk level from the color table plus the
    /// constant stroke settings.
    #[must_use]
    pub fn for_level(level: u8, table: &ColorTable) -> Self {
        let fill = table.style_for(level);
        Self {
            color: fill.color,
            fill_opacity: fill.fill_opacity,
            stroke_color: style::STROKE_COLOR.to_string(),
            stroke_opacity: style::STROKE_OPACITY,
            stroke_weight: style::STROKE_WEIGHT,
        }
    }
}

/// Pre-formatted display fields for one tract's popup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PopupFields {
    /// Population with thousands separators (e.g. "3,421").
    pub population: String,
    /// Median income in whole dollars (e.g. "$45,000").
    pub median_income: String,
    /// Mean temperature (e.g. "29.5°C").
    pub temperature: String,
    /// AC-access percentage (e.g. "72.5%").
    pub ac_access: String,
    /// Green-space percentage (e.g. "12.0%").
    pub green_space: String,
    /// Composite score to three decimals (e.g. "0.613").
    pub vulnerability_score: String,
}

impl PopupFields {
    fn from_record(record: &VulnerabilityRecord) -> Self {
        Self {
            population: format::thousands(record.population),
            median_income: format::money(record.median_income),
            temperature: format::temperature(record.mean_temperature),
            ac_access: format::percent(record.ac_access_probability),
            green_space: format::percent(record.green_space_fraction),
            vulnerability_score: format::score(record.composite_score),
        }
    }
}

/// One render-ready tract: geometry plus everything the map layer needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderFeature {
    /// Geographic unit identifier.
    pub unit_id: String,
    /// Risk level, 1 = lowest.
    pub risk_level: u8,
    /// Polygon boundary; `None` when the geometry source had no boundary
    /// for this unit (the unit still appears in the tabular output).
    pub geometry: Option<geojson::Geometry>,
    /// Fill and stroke style.
    pub style: TractStyle,
    /// Formatted popup fields.
    pub popup_fields: PopupFields,
    /// Tooltip line ("Tract 400101: Level 4 Risk").
    pub tooltip_text: String,
}

/// One legend row: level, fill color, display name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegendEntry {
    /// Risk level.
    pub level: u8,
    /// Hex fill color for the level.
    pub color: String,
    /// Display name (e.g. "4 (High)").
    pub name: String,
}

/// The complete render-ready dataset for one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderDataset {
    /// Number of tracts in the dataset.
    pub total_units: usize,
    /// Legend rows, one per level.
    pub legend: Vec<LegendEntry>,
    /// One feature per tract, in dataset order.
    pub features: Vec<RenderFeature>,
}

/// Builds the render-ready dataset from the assembled units and their
/// scored records.
///
/// `units` and `records` must be parallel slices in the same order (the
/// pipeline guarantees this: scoring preserves assembly order).
#[must_use]
pub fn render_dataset(
    units: &[ArealUnitRecord],
    records: &[VulnerabilityRecord],
    level_count: u8,
    table: &ColorTable,
) -> RenderDataset {
    let legend = (1..=level_count)
        .map(|level| LegendEntry {
            level,
            color: table.style_for(level).color,
            name: style::level_name(level, level_count),
        })
        .collect();

    let features = units
        .iter()
        .zip(records)
        .map(|(unit, record)| RenderFeature {
            unit_id: record.unit_id.clone(),
            risk_level: record.risk_level,
            geometry: unit.geometry.clone(),
            style: TractStyle::for_level(record.risk_level, table),
            popup_fields: PopupFields::from_record(record),
            tooltip_text: format!(
                "Tract {}: Level {} Risk",
                record.unit_id, record.risk_level
            ),
        })
        .collect();

    RenderDataset {
        total_units: records.len(),
        legend,
        features,
    }
}
