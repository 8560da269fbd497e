use homero::cli::{Cli, execute};
use homero::error::HomeroError;
use homero::logger::initialize as LoggerInitialize;

use player_core::config::HomeroConfig;
use player_core::mpv::MpvClient;

use common::ErrorLocation;

use std::fs::create_dir_all;
use std::panic::Location;
use std::process::ExitCode;

use clap::Parser;
use log::{error, info};
use serde_json::to_string_pretty;

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<(), HomeroError> {
    // A missing .env is fine
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let mut config = HomeroConfig::from_env().map_err(|e| HomeroError::Core {
        message: e.to_string(),
        location: ErrorLocation::from(Location::caller()),
    })?;
    cli.apply_to(&mut config)?;

    let log_dir = cli.log_dir()?;
    create_dir_all(&log_dir).map_err(|e| HomeroError::Homero {
        message: format!("Failed to create log directory: {e}"),
        location: ErrorLocation::from(Location::caller()),
    })?;

    let level = config.level_filter().map_err(|e| HomeroError::Core {
        message: e.to_string(),
        location: ErrorLocation::from(Location::caller()),
    })?;
    LoggerInitialize(&log_dir, level)?;

    info!("Homero starting (dry_run={})", config.dry_run);
    info!("Log directory: {}", log_dir.display());

    let client = MpvClient::new(&config.mpv_socket, config.dry_run).with_timeout(config.timeout);

    let output = execute(&cli.command, &config, &client).await?;

    let rendered = to_string_pretty(&output).map_err(|e| HomeroError::Homero {
        message: format!("Failed to render output: {e}"),
        location: ErrorLocation::from(Location::caller()),
    })?;
    println!("{rendered}");

    Ok(())
}
