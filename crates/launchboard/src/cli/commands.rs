//! CLI command definitions.
//!
//! This module defines the structure of all CLI subcommands.

use std::path::PathBuf;

use clap::{Args, Subcommand, ValueEnum};

/// Serve command arguments.
#[derive(Debug, Args)]
pub struct ServeCommand {
    /// Host to bind (overrides `server.host`)
    #[arg(long)]
    pub host: Option<String>,

    /// Port to bind (overrides `server.port`)
    #[arg(short, long)]
    pub port: Option<u16>,
}

/// Outcome-rate view arguments.
#[derive(Debug, Args)]
pub struct RatesCommand {
    /// Launch site, or `ALL` for every site
    #[arg(short, long, default_value = "ALL")]
    pub site: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "plain")]
    pub format: OutputFormat,
}

/// Scatter view arguments.
#[derive(Debug, Args)]
pub struct ScatterCommand {
    /// Launch site, or `ALL` for every site
    #[arg(short, long, default_value = "ALL")]
    pub site: String,

    /// Lowest payload mass in kg (defaults to the dataset minimum)
    #[arg(long, allow_negative_numbers = true)]
    pub low: Option<f64>,

    /// Highest payload mass in kg (defaults to the dataset maximum)
    #[arg(long, allow_negative_numbers = true)]
    pub high: Option<f64>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "plain")]
    pub format: OutputFormat,
}

/// Dataset summary arguments.
#[derive(Debug, Args)]
pub struct DatasetCommand {
    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the configuration file path
    Path,

    /// Validate configuration
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

/// Output format for view results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Plain text output
    #[default]
    Plain,
    /// Aligned table output
    Table,
    /// JSON output
    Json,
}
