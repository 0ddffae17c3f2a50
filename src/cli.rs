//! Command-line arguments.

use std::path::PathBuf;

use clap::Parser;

#[derive(Debug, Parser)]
#[command(name = "solar-quote")]
#[command(version, about = "30-year financial projection of a solar installation quote")]
#[command(after_help = "If neither --scenario nor --preset is given, the baseline preset is used.")]
pub struct Cli {
    /// Load the quote from a TOML file
    #[arg(long, value_name = "PATH", conflicts_with = "preset")]
    pub scenario: Option<PathBuf>,

    /// Use a built-in preset (baseline, subscription, smart_battery, mybattery, physical_battery)
    #[arg(long, value_name = "NAME")]
    pub preset: Option<String>,

    /// Export the yearly rows to CSV
    #[arg(long, value_name = "PATH")]
    pub export: Option<PathBuf>,

    /// Print only the summary, not the yearly rows
    #[arg(long)]
    pub summary_only: bool,

    /// Start the REST API server after printing the projection
    #[cfg(feature = "api")]
    #[arg(long)]
    pub serve: bool,

    /// API server port
    #[cfg(feature = "api")]
    #[arg(long, default_value_t = 3000)]
    pub port: u16,
}
