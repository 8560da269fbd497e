use common::ErrorLocation;

use serde::Serialize;
use thiserror::Error;

/// Errors raised by the calling layer.
///
/// A failed mpv exchange is not one of these: it comes back from the client as a
/// response and is printed like any other.
#[derive(Debug, Error, Serialize)]
#[serde(tag = "type", content = "data")]
pub enum HomeroError {
    /// Error from this App
    #[error("Homero Error: {message} {location}")]
    Homero {
        message: String,
        location: ErrorLocation,
    },

    /// Error from player-core (config, catalog)
    #[error("Core Error: {message} {location}")]
    Core {
        message: String,
        location: ErrorLocation,
    },

    #[error("Unknown Action Error: '{action}' {location}")]
    UnknownAction {
        action: String,
        location: ErrorLocation,
    },

    #[error("Episode Index Error: {index} is out of range (catalog has {len}) {location}")]
    IndexOutOfRange {
        index: usize,
        len: usize,
        location: ErrorLocation,
    },
}
