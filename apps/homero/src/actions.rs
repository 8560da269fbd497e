//! Maps user-facing actions onto mpv command sequences.
//!
//! The IPC client only knows token lists; everything that gives those lists a
//! meaning (`toggle_pause`, `next`, loading an episode by index) lives here.

use crate::error::HomeroError;

use player_core::catalog::Catalog;
use player_core::mpv::{CommandInput, Connector, MpvClient, MpvCommand, MpvResponse};

use common::ErrorLocation;

use std::fmt::{Display, Formatter, Result as FormatResult};
use std::panic::Location;
use std::str::FromStr;

use log::{info, warn};
use serde::Serialize;

const LOADFILE_MODE: &str = "replace";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerAction {
    TogglePause,
    ToggleMute,
    Next,
    Prev,
}

impl PlayerAction {
    pub const ALL: [PlayerAction; 4] = [
        PlayerAction::TogglePause,
        PlayerAction::ToggleMute,
        PlayerAction::Next,
        PlayerAction::Prev,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            PlayerAction::TogglePause => "toggle_pause",
            PlayerAction::ToggleMute => "toggle_mute",
            PlayerAction::Next => "next",
            PlayerAction::Prev => "prev",
        }
    }

    /// Commands to send, in order.
    pub fn commands(&self) -> Vec<CommandInput> {
        match self {
            PlayerAction::TogglePause => vec![["cycle", "pause"].into()],
            PlayerAction::ToggleMute => vec![["cycle", "mute"].into()],
            // Rewind explicitly: mpv may resume the next entry where it was left.
            PlayerAction::Next => vec![
                ["playlist-next", "force"].into(),
                ["set_property", "time-pos", "0"].into(),
            ],
            PlayerAction::Prev => vec![["playlist-prev", "force"].into()],
        }
    }
}

impl Display for PlayerAction {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> FormatResult {
        formatter.write_str(self.name())
    }
}

impl FromStr for PlayerAction {
    type Err = HomeroError;

    #[track_caller]
    fn from_str(action: &str) -> Result<Self, Self::Err> {
        PlayerAction::ALL
            .into_iter()
            .find(|candidate| candidate.name() == action)
            .ok_or_else(|| {
                warn!("Unknown action requested: '{action}'");
                HomeroError::UnknownAction {
                    action: action.to_string(),
                    location: ErrorLocation::from(Location::caller()),
                }
            })
    }
}

/// One command and what came back for it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Exchange {
    pub command: MpvCommand,
    pub response: MpvResponse,
}

impl From<(MpvCommand, MpvResponse)> for Exchange {
    fn from((command, response): (MpvCommand, MpvResponse)) -> Self {
        Self { command, response }
    }
}

/// Send every command of `action` in order and collect the results.
///
/// Later commands are sent even if an earlier one failed; the caller sees
/// each outcome.
pub async fn run_action<C: Connector>(client: &MpvClient<C>, action: PlayerAction) -> Vec<Exchange> {
    info!("Running action {action}");

    let mut exchanges = Vec::new();
    for command in action.commands() {
        exchanges.push(Exchange::from(client.send(command).await));
    }
    exchanges
}

/// Replace the current file with the catalog entry at `index`.
///
/// # Errors
///
/// Returns [`HomeroError::IndexOutOfRange`] if the catalog has no such entry.
pub async fn load_episode<C: Connector>(
    client: &MpvClient<C>,
    catalog: &Catalog,
    index: usize,
) -> Result<Exchange, HomeroError> {
    let episode = catalog.get(index).ok_or_else(|| {
        warn!("Episode not found for index: {index}");
        HomeroError::IndexOutOfRange {
            index,
            len: catalog.len(),
            location: ErrorLocation::from(Location::caller()),
        }
    })?;

    info!("Loading episode {}: {}", episode.index, episode.label);

    let tokens = vec![
        "loadfile".to_string(),
        episode.path_token(),
        LOADFILE_MODE.to_string(),
    ];

    Ok(Exchange::from(client.send(tokens).await))
}
