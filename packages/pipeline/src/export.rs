//! Artifact export: flat CSV table, render JSON, and run report JSON.
//!
//! Export is all-or-nothing: every artifact is serialized to bytes in
//! memory first, then each file is written to a `.tmp` sibling and
//! renamed into place, so an interrupted run never leaves a partial or
//! corrupt artifact behind.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::PipelineOutput;

/// File name of the flat tabular artifact.
pub const FLAT_TABLE_FILE: &str = "vulnerability_data.csv";

/// File name of the render-ready dataset artifact.
pub const RENDER_DATASET_FILE: &str = "render_dataset.json";

/// File name of the run report artifact.
pub const RUN_REPORT_FILE: &str = "run_report.json";

/// Errors that can occur while exporting artifacts.
#[derive(Debug, Error)]
pub enum ExportError {
    /// Writing an artifact file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serializing the flat table failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Serializing a JSON artifact failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Writes the three run artifacts into `dir`, creating it if needed.
///
/// Returns the paths of the written files in the order flat table,
/// render dataset, run report.
///
/// # Errors
///
/// Returns an error if serialization or any file write fails. On
/// failure no artifact is renamed into place.
pub fn write_artifacts(output: &PipelineOutput, dir: &Path) -> Result<Vec<PathBuf>, ExportError> {
    std::fs::create_dir_all(dir)?;

    // Serialize everything before touching the filesystem.
    let flat_bytes = flat_table_csv(output)?;
    let render_bytes = serde_json::to_vec_pretty(&output.render)?;
    let report_bytes = serde_json::to_vec_pretty(&output.report)?;

    let artifacts = [
        (FLAT_TABLE_FILE, flat_bytes),
        (RENDER_DATASET_FILE, render_bytes),
        (RUN_REPORT_FILE, report_bytes),
    ];

    let mut written = Vec::with_capacity(artifacts.len());
    for (name, bytes) in &artifacts {
        let path = dir.join(name);
        let tmp_path = dir.join(format!("{name}.tmp"));
        std::fs::write(&tmp_path, bytes)?;
        std::fs::rename(&tmp_path, &path)?;
        log::info!("Wrote {}", path.display());
        written.push(path);
    }

    Ok(written)
}

/// Serializes the flat per-unit table as CSV bytes.
fn flat_table_csv(output: &PipelineOutput) -> Result<Vec<u8>, ExportError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for record in &output.flat {
        writer.serialize(record)?;
    }
    Ok(writer.into_inner().map_err(|e| e.into_error())?)
}
