//! `fdeck` - CLI for flightdeck
//!
//! This binary computes flight statistics over a stored collection of
//! flight records and manages the record store itself.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use anyhow::Context;
use clap::Parser;
use tracing::info;

use flightdeck::cli::{Cli, Command, ConfigCommand, ImportCommand, StatsCommand};
use flightdeck::stats::FlightStatsSummary;
use flightdeck::{init_logging, Config, Flight, SqliteRepository, StatsService, Storage};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    init_logging(cli.verbosity());

    // Load configuration
    let config = Config::load_from(cli.config.clone())?;

    // Execute the command
    match cli.command {
        Command::Stats(stats_cmd) => handle_stats(&config, &stats_cmd).await,
        Command::Import(import_cmd) => handle_import(&config, &import_cmd),
        Command::Config(config_cmd) => handle_config(&config, config_cmd),
    }
}

async fn handle_stats(config: &Config, cmd: &StatsCommand) -> anyhow::Result<()> {
    let storage = Storage::open(config.database_path())?;
    let service = StatsService::new(SqliteRepository::new(storage));

    let mode = cmd
        .window
        .map_or_else(|| config.default_window(), Into::into);
    let summary = service.refresh(mode).await?;

    if cmd.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print_summary(mode.to_string().as_str(), &summary);
    }
    Ok(())
}

fn print_summary(window: &str, summary: &FlightStatsSummary) {
    println!("Flight statistics ({window})");
    println!("--------------------------");
    println!("Flights:     {}", summary.total_flights);
    println!("Passengers:  {}", summary.total_pax);
    println!("Delays:      {}", summary.total_delays);
    println!("On-time:     {}%", summary.on_time_percent);

    if !summary.delay_bar.is_empty() {
        println!();
        println!("Delays by route:");
        for bar in &summary.delay_bar {
            println!("  {:<16} {}", bar.route, bar.count);
        }
    }

    if !summary.pax_per_day.is_empty() {
        println!();
        println!("Passengers per day:");
        for day in &summary.pax_per_day {
            println!("  {}  {}", day.date, day.count);
        }
    }

    if !summary.delay_pie.is_empty() {
        println!();
        println!("Delay reasons:");
        for slice in &summary.delay_pie {
            println!("  {:<16} {}", slice.name, slice.count);
        }
    }
}

fn handle_import(config: &Config, cmd: &ImportCommand) -> anyhow::Result<()> {
    let contents = std::fs::read_to_string(&cmd.file)
        .with_context(|| format!("failed to read {}", cmd.file.display()))?;
    let flights: Vec<Flight> = serde_json::from_str(&contents)
        .with_context(|| format!("failed to parse {}", cmd.file.display()))?;

    let storage = Storage::open(config.database_path())?;
    for flight in &flights {
        storage.insert(flight)?;
    }

    info!("Imported {} flights from {}", flights.len(), cmd.file.display());
    println!("Imported {} flight records.", flights.len());
    Ok(())
}

fn handle_config(config: &Config, cmd: ConfigCommand) -> anyhow::Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Storage]");
                println!("  Database path:  {}", config.database_path().display());
                println!();
                println!("[Stats]");
                println!("  Default window: {}", config.default_window());
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => {
            let path = file.unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            match Config::load_from(Some(path)) {
                Ok(_) => println!("Configuration is valid."),
                Err(e) => println!("Configuration error: {e}"),
            }
        }
    }
    Ok(())
}
