use crate::actions::{Exchange, PlayerAction, load_episode, run_action};
use crate::error::HomeroError;

use player_core::catalog::{Catalog, load_episodes};
use player_core::config::HomeroConfig;
use player_core::mpv::{CommandInput, Connector, MpvClient};

use common::ErrorLocation;

use std::panic::Location;
use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};
use log::{error, info};
use serde::Serialize;
use serde_json::{Value, to_value};

const APP_DIR_NAME: &str = "homero";
const LOG_DIR_NAME: &str = "logs";

#[derive(Debug, Parser)]
#[command(name = "homero")]
#[command(about = "Drive an mpv player over its JSON IPC socket")]
#[command(version)]
pub struct Cli {
    /// Path to mpv's IPC socket (overrides MPV_SOCKET)
    #[arg(long, global = true)]
    pub socket: Option<PathBuf>,

    /// Never touch the socket (overrides DRY_RUN)
    #[arg(long, global = true, conflicts_with = "live")]
    pub dry_run: bool,

    /// Talk to mpv even if DRY_RUN is set
    #[arg(long, global = true)]
    pub live: bool,

    /// Episode list file (overrides PATH_HOMERO_EPISODES)
    #[arg(long, global = true)]
    pub episodes: Option<PathBuf>,

    /// Deadline for one mpv exchange in milliseconds (overrides MPV_TIMEOUT_MS)
    #[arg(long, global = true)]
    pub timeout_ms: Option<u64>,

    /// Directory for homero.log
    #[arg(long, global = true)]
    pub log_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run a named player action (toggle_pause, toggle_mute, next, prev)
    Action {
        /// The action name
        name: String,
    },
    /// Load the catalog episode at INDEX, replacing the current file
    Load {
        /// Zero-based catalog index
        index: usize,
    },
    /// Send a raw mpv command
    Send {
        /// Split a single string on whitespace instead of taking each argument as one token
        #[arg(long)]
        line: bool,

        /// Command tokens, e.g. `set_property volume 50`
        #[arg(required = true, allow_hyphen_values = true)]
        tokens: Vec<String>,
    },
    /// List catalog episodes grouped by season
    Episodes,
    /// Print the effective configuration
    Config,
}

impl Cli {
    /// Apply command-line overrides on top of `config`.
    ///
    /// # Errors
    ///
    /// Returns [`HomeroError::Core`] if the overridden config no longer validates.
    pub fn apply_to(&self, config: &mut HomeroConfig) -> Result<(), HomeroError> {
        if let Some(socket) = &self.socket {
            config.mpv_socket = socket.clone();
        }
        if self.dry_run {
            config.dry_run = true;
        }
        if self.live {
            config.dry_run = false;
        }
        if let Some(episodes) = &self.episodes {
            config.episodes_file = episodes.clone();
        }
        if let Some(timeout_ms) = self.timeout_ms {
            config.timeout = Duration::from_millis(timeout_ms);
        }

        config.validate().map_err(|e| HomeroError::Core {
            message: e.to_string(),
            location: ErrorLocation::from(Location::caller()),
        })
    }

    /// `--log-dir`, or `homero/logs` under the platform's local data directory.
    pub fn log_dir(&self) -> Result<PathBuf, HomeroError> {
        if let Some(log_dir) = &self.log_dir {
            return Ok(log_dir.clone());
        }

        dirs::data_local_dir()
            .map(|dir| dir.join(APP_DIR_NAME).join(LOG_DIR_NAME))
            .ok_or_else(|| HomeroError::Homero {
                message: "Failed to resolve local data directory for logs".to_string(),
                location: ErrorLocation::from(Location::caller()),
            })
    }
}

/// Run `command` against `client` and render the result as JSON.
///
/// # Returns
///
/// - `action`: every exchange of the action, in order
/// - `load`, `send`: the single exchange
/// - `episodes`: a season number → episodes map
/// - `config`: the effective configuration
///
/// # Errors
///
/// Only calling-layer failures (unknown action, bad index, catalog problems)
/// are errors. An mpv reply other than `success` is part of the output.
pub async fn execute<C: Connector>(
    command: &Command,
    config: &HomeroConfig,
    client: &MpvClient<C>,
) -> Result<Value, HomeroError> {
    match command {
        Command::Action { name } => {
            let action = name.parse::<PlayerAction>()?;
            render(&run_action(client, action).await)
        }
        Command::Load { index } => {
            let catalog = open_catalog(config)?;
            render(&load_episode(client, &catalog, *index).await?)
        }
        Command::Send { line, tokens } => {
            let input = if *line {
                CommandInput::Line(tokens.join(" "))
            } else {
                CommandInput::Tokens(tokens.clone())
            };
            render(&Exchange::from(client.send(input).await))
        }
        Command::Episodes => {
            let catalog = open_catalog(config)?;
            render(&catalog.by_season())
        }
        Command::Config => render(config),
    }
}

fn open_catalog(config: &HomeroConfig) -> Result<Catalog, HomeroError> {
    info!("Opening catalog {}", config.episodes_file.display());

    load_episodes(&config.episodes_file).map_err(|e| {
        error!("Failed to load episodes: {e}");
        HomeroError::Core {
            message: e.to_string(),
            location: ErrorLocation::from(Location::caller()),
        }
    })
}

#[track_caller]
fn render<T: Serialize + ?Sized>(output: &T) -> Result<Value, HomeroError> {
    to_value(output).map_err(|e| HomeroError::Homero {
        message: format!("Failed to render output: {e}"),
        location: ErrorLocation::from(Location::caller()),
    })
}
