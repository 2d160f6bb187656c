#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! CLI entry point for the heat vulnerability pipeline.
//!
//! Reads per-source CSV tables and an optional GeoJSON boundary file,
//! runs the scoring pipeline, and writes the flat table, render dataset,
//! and run report into the output directory.

mod inputs;

use std::path::PathBuf;

use clap::Parser;
use heat_map_pipeline::export::write_artifacts;
use inputs::InputPaths;

#[derive(Parser)]
#[command(name = "heat_map_cli", about = "Heat vulnerability scoring pipeline")]
struct Cli {
    /// Demographics CSV (`unit_id`, `population`, `median_income`)
    #[arg(long)]
    demographics: PathBuf,
    /// Surface temperature CSV (`unit_id`, `mean_temperature`)
    #[arg(long)]
    temperature: Option<PathBuf>,
    /// Green space CSV (`unit_id`, `green_space_fraction`)
    #[arg(long)]
    green_space: Option<PathBuf>,
    /// AC access CSV (`unit_id`, `ac_access_probability`)
    #[arg(long)]
    ac_access: Option<PathBuf>,
    /// GeoJSON `FeatureCollection` of unit boundaries
    #[arg(long)]
    boundaries: Option<PathBuf>,
    /// Feature property holding the unit identifier
    #[arg(long, default_value = "unit_id")]
    boundary_id_property: String,
    /// TOML run configuration (weights, level count, color table)
    #[arg(long)]
    config: Option<PathBuf>,
    /// Directory the artifacts are written into
    #[arg(long, default_value = "output")]
    output_dir: PathBuf,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();
    let cli = Cli::parse();

    let config = inputs::load_config(cli.config.as_deref())?;
    let tables = inputs::load_tables(&InputPaths {
        demographics: &cli.demographics,
        temperature: cli.temperature.as_deref(),
        green_space: cli.green_space.as_deref(),
        ac_access: cli.ac_access.as_deref(),
        boundaries: cli.boundaries.as_deref(),
        boundary_id_property: &cli.boundary_id_property,
    })?;

    let output = heat_map_pipeline::run(&tables, &config)?;
    let written = write_artifacts(&output, &cli.output_dir)?;

    print_summary(&output.report);

    for notice in &output.report.notices {
        log::warn!("{notice}");
    }
    for path in &written {
        log::info!("Artifact: {}", path.display());
    }

    Ok(())
}

fn print_summary(report: &heat_map_pipeline::RunReport) {
    println!("Heat Vulnerability Summary");
    println!(
        "{} units, total population {}",
        report.unit_count, report.total_population
    );
    println!();
    println!("{:<7} {:>6} {:>12} {:>7}", "LEVEL", "UNITS", "POPULATION", "SHARE");
    println!("{}", "-".repeat(36));
    for level in &report.level_distribution {
        println!(
            "{:<7} {:>6} {:>12} {:>6.1}%",
            level.level,
            level.unit_count,
            level.population,
            level.population_share * 100.0
        );
    }
    println!();
    println!("Most vulnerable:");
    for unit in &report.most_vulnerable {
        println!(
            "  {} (score {:.3}, level {}, pop {})",
            unit.unit_id, unit.composite_score, unit.risk_level, unit.population
        );
    }
}
