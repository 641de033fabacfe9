//! `launchboard` - CLI for the launch dashboard
//!
//! This binary serves the dashboard and prints its views on the command line.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;

use launchboard::cli::{
    Cli, Command, ConfigCommand, DatasetCommand, OutputFormat, RatesCommand, ScatterCommand,
    ServeCommand,
};
use launchboard::dataset::{self, Dataset};
use launchboard::layout::Layout;
use launchboard::views::{
    compute_outcome_rate_view, compute_scatter_view, PayloadRange, SiteFilter,
};
use launchboard::{init_logging, server, Config};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Validation must not depend on the default file being loadable
    if let Command::Config(ConfigCommand::Validate { file }) = &cli.command {
        init_logging(cli.verbosity());
        let path = file
            .clone()
            .or_else(|| cli.config.clone())
            .unwrap_or_else(Config::default_config_path);
        return handle_validate(&path);
    }

    // Load configuration first so debug mode can raise the log level
    let mut config = Config::load_from(cli.config.clone())?;

    let verbosity = match &cli.command {
        Command::Serve(_) => cli.verbosity().with_debug(config.server.debug),
        _ => cli.verbosity(),
    };
    init_logging(verbosity);

    let data = cli.data.as_deref();
    match &cli.command {
        Command::Serve(serve_cmd) => {
            apply_serve_overrides(&mut config, serve_cmd);
            let dataset = load_dataset(&config, data).await?;
            server::serve(&config, dataset).await?;
        }
        Command::Rates(rates_cmd) => {
            let dataset = load_dataset(&config, data).await?;
            handle_rates(&dataset, rates_cmd)?;
        }
        Command::Scatter(scatter_cmd) => {
            let dataset = load_dataset(&config, data).await?;
            handle_scatter(&config, &dataset, scatter_cmd)?;
        }
        Command::Dataset(dataset_cmd) => {
            let dataset = load_dataset(&config, data).await?;
            handle_dataset(&dataset, dataset_cmd)?;
        }
        Command::Config(config_cmd) => handle_config(&config, config_cmd)?,
    }
    Ok(())
}

fn apply_serve_overrides(config: &mut Config, cmd: &ServeCommand) {
    if let Some(host) = &cmd.host {
        config.server.host.clone_from(host);
    }
    if let Some(port) = cmd.port {
        config.server.port = port;
    }
}

async fn load_dataset(config: &Config, location: Option<&str>) -> anyhow::Result<Arc<Dataset>> {
    let source = dataset::source_for(&config.dataset, location)?;
    let dataset = dataset::load(source.as_ref())
        .await
        .with_context(|| format!("could not load launch dataset from {}", source.describe()))?;
    Ok(Arc::new(dataset))
}

fn handle_rates(dataset: &Dataset, cmd: &RatesCommand) -> anyhow::Result<()> {
    let site = SiteFilter::parse(&cmd.site);
    let view = compute_outcome_rate_view(dataset, &site);

    match cmd.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&view)?),
        _ if view.is_empty() => println!("No launches recorded for {site}"),
        OutputFormat::Plain => {
            println!("Outcome rates for {site}");
            for slice in &view.slices {
                println!(
                    "  {}: {:.1}% ({} launches)",
                    slice.label,
                    slice.value * 100.0,
                    slice.launches
                );
            }
        }
        OutputFormat::Table => {
            println!("{:<20} {:>8} {:>8} {:>9}", "Label", "Share", "Rate", "Launches");
            println!("{}", "-".repeat(48));
            for slice in &view.slices {
                println!(
                    "{:<20} {:>7.1}% {:>8.3} {:>9}",
                    slice.label,
                    slice.value * 100.0,
                    slice.rate,
                    slice.launches
                );
            }
        }
    }
    Ok(())
}

fn handle_scatter(config: &Config, dataset: &Dataset, cmd: &ScatterCommand) -> anyhow::Result<()> {
    let site = SiteFilter::parse(&cmd.site);
    let initial = Layout::build(&config.dashboard, dataset).slider.value;
    let range = PayloadRange::new(
        cmd.low.unwrap_or(initial.low),
        cmd.high.unwrap_or(initial.high),
    );
    let view = compute_scatter_view(dataset, &site, range);

    let outcome_label = |success: bool| if success { "Success" } else { "Failure" };

    match cmd.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&view)?),
        OutputFormat::Plain => {
            println!(
                "{} launches from {site} with payload in {range} kg",
                view.len()
            );
            for point in &view.points {
                println!(
                    "  {:.1} kg  {}  {}",
                    point.payload_mass_kg,
                    outcome_label(point.outcome.is_success()),
                    point.booster_version_category
                );
            }
        }
        OutputFormat::Table => {
            println!("{:>12} {:<8} {:<12}", "Payload (kg)", "Outcome", "Booster");
            println!("{}", "-".repeat(34));
            for point in &view.points {
                println!(
                    "{:>12.1} {:<8} {:<12}",
                    point.payload_mass_kg,
                    outcome_label(point.outcome.is_success()),
                    point.booster_version_category
                );
            }
        }
    }
    Ok(())
}

fn handle_dataset(dataset: &Dataset, cmd: &DatasetCommand) -> anyhow::Result<()> {
    let summary = dataset.summary();
    if cmd.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!("Launch Dataset");
    println!("==============");
    println!("Source:       {}", summary.info.source);
    println!("Fingerprint:  {}", summary.info.fingerprint);
    println!("Loaded at:    {}", summary.info.loaded_at.to_rfc3339());
    println!("Rows:         {}", summary.rows);
    println!("Sites:        {}", summary.sites.join(", "));
    println!("Boosters:     {}", summary.booster_categories.join(", "));
    if let Some(bounds) = summary.payload_bounds {
        println!("Payload (kg): {} - {}", bounds.min, bounds.max);
    }
    if let Some(rate) = summary.success_rate {
        println!("Success rate: {:.1}%", rate * 100.0);
    }
    Ok(())
}

fn handle_config(config: &Config, cmd: &ConfigCommand) -> anyhow::Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            if *json {
                println!("{}", serde_json::to_string_pretty(config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Dataset]");
                match &config.dataset.path {
                    Some(path) => println!("  Path:            {}", path.display()),
                    None => println!("  URL:             {}", config.dataset.url),
                }
                println!("  Timeout (secs):  {}", config.dataset.timeout_secs);
                println!();
                println!("[Server]");
                println!("  Listen address:  {}", config.listen_addr());
                println!("  Debug:           {}", config.server.debug);
                println!();
                println!("[Dashboard]");
                println!("  Title:           {}", config.dashboard.title);
                println!("  Sites:           {}", config.dashboard.sites.join(", "));
                println!(
                    "  Payload scale:   {} - {} kg (step {})",
                    config.dashboard.payload_min,
                    config.dashboard.payload_max,
                    config.dashboard.payload_step
                );
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => {
            let path = file.clone().unwrap_or_else(Config::default_config_path);
            handle_validate(&path)?;
        }
    }
    Ok(())
}

fn handle_validate(path: &Path) -> anyhow::Result<()> {
    println!("Validating configuration: {}", path.display());
    Config::check_file(path)
        .with_context(|| format!("configuration {} is invalid", path.display()))?;
    println!("Configuration is valid.");
    Ok(())
}
