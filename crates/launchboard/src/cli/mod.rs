//! Command-line interface for launchboard.
//!
//! This module provides the CLI structure for the `launchboard` binary.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::{
    ConfigCommand, DatasetCommand, OutputFormat, RatesCommand, ScatterCommand, ServeCommand,
};

/// launchboard - SpaceX Falcon9 launch dashboard
///
/// Serves an interactive dashboard of launch success rates and payload mass
/// against launch outcome, and prints the same views on the command line.
#[derive(Debug, Parser)]
#[command(name = "launchboard")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Dataset URL or CSV file (overrides the configured source)
    #[arg(long, global = true, value_name = "URL|FILE")]
    pub data: Option<String>,

    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the dashboard web server
    Serve(ServeCommand),

    /// Print launch success rates
    Rates(RatesCommand),

    /// Print launches within a payload range
    Scatter(ScatterCommand),

    /// Summarize the loaded dataset
    Dataset(DatasetCommand),

    /// View or validate configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> crate::logging::Verbosity {
        crate::logging::Verbosity::from_flags(self.quiet, self.verbose)
    }
}
