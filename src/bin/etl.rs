//! Batch scorer: reads a GeoJSON feature collection, writes scored segments as CSV.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use pathguard::{etl, telemetry};

#[derive(Parser)]
#[command(name = "pathguard-etl")]
#[command(about = "Score street segments from a GeoJSON feature collection", long_about = None)]
struct Cli {
    /// GeoJSON FeatureCollection with segment properties
    #[arg(short, long, default_value = etl::DEFAULT_INPUT)]
    input: PathBuf,

    /// CSV file to write scored segments to
    #[arg(short, long, default_value = etl::DEFAULT_OUTPUT)]
    output: PathBuf,
}

fn main() -> Result<()> {
    let _ = dotenvy::dotenv();
    telemetry::init();

    let cli = Cli::parse();
    let summary = etl::run(&cli.input, &cli.output)?;
    println!(
        "Wrote {} with {} rows",
        summary.output.display(),
        summary.rows
    );
    Ok(())
}
