//! Wire form of mpv's JSON IPC protocol.
//!
//! One record per line:
//!
//! ```text
//! -> {"command":["cycle","pause"],"request_id":101}\n
//! <- {"error":"success","data":null,"request_id":101}\n
//! ```
//!
//! Everything here is pure; socket handling lives in [`crate::mpv::client`].

use crate::error::codec::CodecError;
use crate::error::ipc::IpcError;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// `error` value mpv uses for a command that worked.
pub const SUCCESS: &str = "success";

/// `error` value the client reports when dry-run skipped the socket.
pub const DRY_RUN: &str = "dry_run";

const RECORD_DELIMITER: u8 = b'\n';

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MpvCommand {
    command: Vec<String>,
    request_id: u64,
}

impl MpvCommand {
    pub fn new(tokens: Vec<String>, request_id: u64) -> Self {
        Self {
            command: tokens,
            request_id,
        }
    }

    pub fn tokens(&self) -> &[String] {
        &self.command
    }

    pub fn request_id(&self) -> u64 {
        self.request_id
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MpvResponse {
    pub error: String,
    pub data: Option<Value>,
    pub request_id: u64,
}

impl Default for MpvResponse {
    fn default() -> Self {
        Self {
            error: String::new(),
            data: None,
            request_id: 0,
        }
    }
}

impl MpvResponse {
    pub fn dry_run(request_id: u64) -> Self {
        Self {
            error: DRY_RUN.to_string(),
            data: None,
            request_id,
        }
    }

    /// Response standing in for an exchange that never produced a usable reply.
    ///
    /// `data` carries the raw reply text when the peer sent something undecodable.
    pub fn from_failure(failure: &IpcError, request_id: u64) -> Self {
        Self {
            error: failure.reason(),
            data: failure.raw().map(|raw| Value::String(raw.to_string())),
            request_id,
        }
    }

    pub fn is_success(&self) -> bool {
        self.error == SUCCESS
    }

    pub fn is_dry_run(&self) -> bool {
        self.error == DRY_RUN
    }
}

/// Serialize `command` as a single newline-terminated JSON record.
pub fn encode(command: &MpvCommand) -> Result<Vec<u8>, CodecError> {
    let mut bytes = serde_json::to_vec(command)?;
    bytes.push(RECORD_DELIMITER);
    Ok(bytes)
}

/// Parse one reply record.
///
/// Missing fields fall back to their defaults. Input that is not a JSON object,
/// or whose fields carry the wrong types, is rejected with the raw text attached.
pub fn decode(record: &str) -> Result<MpvResponse, CodecError> {
    let value: Value = serde_json::from_str(record)
        .map_err(|e| CodecError::decode(record, e.to_string()))?;

    if !value.is_object() {
        return Err(CodecError::decode(
            record,
            format!("expected a JSON object, found {}", json_kind(&value)),
        ));
    }

    serde_json::from_value(value).map_err(|e| CodecError::decode(record, e.to_string()))
}

/// Parse a request record, as the player side of the socket sees it.
pub fn decode_command(record: &str) -> Result<MpvCommand, CodecError> {
    serde_json::from_str(record.trim_end()).map_err(|e| CodecError::decode(record, e.to_string()))
}

/// First newline-delimited record of `buffer`, lossily decoded and trimmed.
pub fn first_record(buffer: &[u8]) -> String {
    let line = buffer
        .split(|byte| *byte == RECORD_DELIMITER)
        .next()
        .unwrap_or_default();

    String::from_utf8_lossy(line).trim().to_string()
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
