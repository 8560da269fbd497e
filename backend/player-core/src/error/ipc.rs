use crate::error::codec::CodecError;

use common::ErrorLocation;

use std::io::{Error as IoError, ErrorKind};
use std::panic::Location;
use std::path::{Path, PathBuf};
use std::time::Duration;

use thiserror::Error as ThisError;

pub const SOCKET_NOT_FOUND: &str = "MPV socket not found";
pub const CONNECTION_REFUSED: &str = "Connection refused";
pub const SOCKET_TIMEOUT: &str = "MPV socket timeout";
pub const CONNECTION_RESET: &str = "Connection reset by MPV";
pub const PERMISSION_DENIED: &str = "Permission denied on MPV socket";
pub const EMPTY_RESPONSE: &str = "Empty response from MPV";
pub const REPLY_TOO_LARGE: &str = "MPV reply too large";
pub const INVALID_JSON_PREFIX: &str = "Invalid JSON response from MPV: ";
pub const ENCODE_FAILED_PREFIX: &str = "Failed to encode MPV command: ";
pub const SOCKET_ERROR_PREFIX: &str = "MPV socket error: ";

/// Every way a single mpv exchange can fail.
///
/// The client never lets one of these escape `send`; [`IpcError::reason`] is the
/// string that ends up in the synthesized response's `error` field.
#[derive(Debug, ThisError)]
pub enum IpcError {
    #[error("Socket Not Found Error: {path} {location}")]
    NotFound {
        path: PathBuf,
        location: ErrorLocation,
    },

    #[error("Connection Refused Error: {path} {location}")]
    Refused {
        path: PathBuf,
        location: ErrorLocation,
    },

    #[error("Timeout Error: no reply within {timeout:?} {location}")]
    Timeout {
        timeout: Duration,
        location: ErrorLocation,
    },

    #[error("Connection Reset Error: {message} {location}")]
    Reset {
        message: String,
        location: ErrorLocation,
    },

    #[error("Permission Denied Error: {path} {location}")]
    PermissionDenied {
        path: PathBuf,
        location: ErrorLocation,
    },

    #[error("Empty Response Error: peer sent no data {location}")]
    EmptyResponse { location: ErrorLocation },

    #[error("Reply Too Large Error: no newline within {limit} bytes {location}")]
    ReplyTooLarge {
        limit: usize,
        location: ErrorLocation,
    },

    #[error("Codec Error: {source} {location}")]
    Codec {
        location: ErrorLocation,
        #[source]
        source: CodecError,
    },

    #[error("IO Error: {kind:?}: {message} {location}")]
    Io {
        kind: ErrorKind,
        message: String,
        location: ErrorLocation,
    },
}

impl IpcError {
    /// Classify an OS-level socket failure against the endpoint at `path`.
    ///
    /// `timeout` is the deadline the failing call was running under.
    #[track_caller]
    pub fn from_io(error: IoError, path: &Path, timeout: Duration) -> Self {
        let location = ErrorLocation::from(Location::caller());

        match error.kind() {
            ErrorKind::NotFound => IpcError::NotFound {
                path: path.to_path_buf(),
                location,
            },
            ErrorKind::ConnectionRefused => IpcError::Refused {
                path: path.to_path_buf(),
                location,
            },
            ErrorKind::PermissionDenied => IpcError::PermissionDenied {
                path: path.to_path_buf(),
                location,
            },
            ErrorKind::ConnectionReset
            | ErrorKind::ConnectionAborted
            | ErrorKind::BrokenPipe
            | ErrorKind::UnexpectedEof => IpcError::Reset {
                message: error.to_string(),
                location,
            },
            // Socket-level read timeouts surface as either kind depending on platform.
            ErrorKind::TimedOut | ErrorKind::WouldBlock => IpcError::Timeout { timeout, location },
            kind => IpcError::Io {
                kind,
                message: error.to_string(),
                location,
            },
        }
    }

    #[track_caller]
    pub fn timeout(timeout: Duration) -> Self {
        IpcError::Timeout {
            timeout,
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn empty_response() -> Self {
        IpcError::EmptyResponse {
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn reply_too_large(limit: usize) -> Self {
        IpcError::ReplyTooLarge {
            limit,
            location: ErrorLocation::from(Location::caller()),
        }
    }

    /// Sentinel carried in the `error` field of a locally synthesized response.
    pub fn reason(&self) -> String {
        match self {
            IpcError::NotFound { .. } => SOCKET_NOT_FOUND.to_string(),
            IpcError::Refused { .. } => CONNECTION_REFUSED.to_string(),
            IpcError::Timeout { .. } => SOCKET_TIMEOUT.to_string(),
            IpcError::Reset { .. } => CONNECTION_RESET.to_string(),
            IpcError::PermissionDenied { .. } => PERMISSION_DENIED.to_string(),
            IpcError::EmptyResponse { .. } => EMPTY_RESPONSE.to_string(),
            IpcError::ReplyTooLarge { .. } => REPLY_TOO_LARGE.to_string(),
            IpcError::Codec {
                source: source @ CodecError::Decode { .. },
                ..
            } => format!("{INVALID_JSON_PREFIX}{}", source.message()),
            IpcError::Codec {
                source: source @ CodecError::Encode { .. },
                ..
            } => format!("{ENCODE_FAILED_PREFIX}{}", source.message()),
            IpcError::Io { message, .. } => format!("{SOCKET_ERROR_PREFIX}{message}"),
        }
    }

    /// Raw reply text, present only when the peer answered with something undecodable.
    pub fn raw(&self) -> Option<&str> {
        match self {
            IpcError::Codec { source, .. } => source.raw(),
            _ => None,
        }
    }
}

impl From<CodecError> for IpcError {
    #[track_caller]
    fn from(error: CodecError) -> Self {
        IpcError::Codec {
            location: ErrorLocation::from(Location::caller()),
            source: error,
        }
    }
}
