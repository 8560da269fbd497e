use common::ErrorLocation;

use std::panic::Location;

use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum CodecError {
    #[error("Encode Error: {message} {location}")]
    Encode {
        message: String,
        location: ErrorLocation,
    },

    /// Reply bytes were not a JSON object of the expected shape.
    ///
    /// `raw` holds the text exactly as it was handed to the decoder.
    #[error("Decode Error: {message} {location}")]
    Decode {
        raw: String,
        message: String,
        location: ErrorLocation,
    },
}

impl CodecError {
    #[track_caller]
    pub(crate) fn decode(raw: &str, message: impl Into<String>) -> Self {
        CodecError::Decode {
            raw: raw.to_string(),
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    /// The offending reply text, for decode failures.
    pub fn raw(&self) -> Option<&str> {
        match self {
            CodecError::Decode { raw, .. } => Some(raw),
            CodecError::Encode { .. } => None,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            CodecError::Encode { message, .. } | CodecError::Decode { message, .. } => message,
        }
    }
}

impl From<serde_json::Error> for CodecError {
    #[track_caller]
    fn from(error: serde_json::Error) -> Self {
        CodecError::Encode {
            message: error.to_string(),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}
