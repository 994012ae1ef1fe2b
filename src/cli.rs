//! Command-line arguments.

use std::path::PathBuf;

use clap::Parser;

use crate::estimator::DEFAULT_HORIZON_YEARS;

/// Longest payback schedule the CLI will build.
pub const MAX_HORIZON_YEARS: i64 = 100;

#[derive(Parser, Debug)]
#[command(
    name = "solar-proposal",
    version,
    about = "Production, savings and payback estimates for solar proposals"
)]
pub struct Cli {
    /// Load the proposal from a TOML file
    #[arg(long, value_name = "PATH", conflicts_with = "preset")]
    pub proposal: Option<PathBuf>,

    /// Use a built-in preset (residential, commercial, bill_based)
    #[arg(long, value_name = "NAME")]
    pub preset: Option<String>,

    /// Daily irradiance CSV used when the proposal has no solar_irradiance_hsp
    #[arg(long, value_name = "PATH")]
    pub irradiance_csv: Option<PathBuf>,

    /// Export monthly production to CSV
    #[arg(long, value_name = "PATH")]
    pub production_out: Option<PathBuf>,

    /// Export the payback schedule to CSV
    #[arg(long, value_name = "PATH")]
    pub payback_out: Option<PathBuf>,

    /// Write the computed proposal record as JSON
    #[arg(long, value_name = "PATH")]
    pub json_out: Option<PathBuf>,

    /// Years covered by the payback schedule (1-100)
    #[arg(
        long,
        value_name = "YEARS",
        default_value_t = DEFAULT_HORIZON_YEARS,
        value_parser = clap::value_parser!(u32).range(1..=MAX_HORIZON_YEARS)
    )]
    pub horizon_years: u32,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Preset used when neither `--proposal` nor `--preset` is given.
    pub const DEFAULT_PRESET: &'static str = "residential";
}
