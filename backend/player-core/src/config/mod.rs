use crate::error::config::ConfigError;
use crate::{DEFAULT_EPISODES_FILE, DEFAULT_IPC_TIMEOUT, DEFAULT_MPV_SOCKET};

use common::ErrorLocation;

use std::panic::Location;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use log::{LevelFilter, info};
use serde::Serialize;

pub const ENV_DRY_RUN: &str = "DRY_RUN";
pub const ENV_MPV_SOCKET: &str = "MPV_SOCKET";
pub const ENV_EPISODES_FILE: &str = "PATH_HOMERO_EPISODES";
pub const ENV_LOG_LEVEL: &str = "LOG_LEVEL";
pub const ENV_MPV_TIMEOUT_MS: &str = "MPV_TIMEOUT_MS";

const DEFAULT_DRY_RUN: &str = "1";
const DEFAULT_LOG_LEVEL: &str = "DEBUG";
const TRUTHY_VALUES: [&str; 3] = ["1", "true", "yes"];

// ============================================
// CONFIG STRUCT
// ============================================

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct HomeroConfig {
    pub dry_run: bool,
    pub mpv_socket: PathBuf,
    pub episodes_file: PathBuf,
    pub log_level: String,
    #[serde(serialize_with = "serialize_millis")]
    pub timeout: Duration,
}

impl Default for HomeroConfig {
    fn default() -> Self {
        Self {
            dry_run: true,
            mpv_socket: PathBuf::from(DEFAULT_MPV_SOCKET),
            episodes_file: PathBuf::from(DEFAULT_EPISODES_FILE),
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            timeout: DEFAULT_IPC_TIMEOUT,
        }
    }
}

// ============================================
// IMPLEMENTATION
// ============================================

impl HomeroConfig {
    /// Read configuration from the process environment.
    ///
    /// Load a `.env` file first (e.g. with `dotenvy`) if one should apply.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through `lookup`, falling back to defaults for unset keys.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ParseError`] for a malformed timeout and
    /// [`ConfigError::ValidationError`] if the result fails [`validate`](Self::validate).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let dry_run = lookup(ENV_DRY_RUN).unwrap_or_else(|| DEFAULT_DRY_RUN.to_string());

        let timeout = match lookup(ENV_MPV_TIMEOUT_MS) {
            Some(raw) => Duration::from_millis(raw.trim().parse::<u64>().map_err(|e| {
                ConfigError::ParseError {
                    location: ErrorLocation::from(Location::caller()),
                    key: ENV_MPV_TIMEOUT_MS.to_string(),
                    value: raw.clone(),
                    reason: e.to_string(),
                }
            })?),
            None => DEFAULT_IPC_TIMEOUT,
        };

        let config = Self {
            dry_run: is_truthy(&dry_run),
            mpv_socket: lookup(ENV_MPV_SOCKET)
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_MPV_SOCKET)),
            episodes_file: lookup(ENV_EPISODES_FILE)
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_EPISODES_FILE)),
            log_level: lookup(ENV_LOG_LEVEL)
                .map(|level| level.trim().to_uppercase())
                .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string()),
            timeout,
        };

        config.validate()?;

        info!(
            "Config: dry_run={}, mpv_socket={}",
            config.dry_run,
            config.mpv_socket.display()
        );
        Ok(config)
    }

    /// Validate config values.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ValidationError`] if any value is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.mpv_socket.as_os_str().is_empty() {
            return Err(ConfigError::ValidationError {
                location: ErrorLocation::from(Location::caller()),
                reason: format!("{ENV_MPV_SOCKET} cannot be empty"),
            });
        }

        if self.timeout.is_zero() {
            return Err(ConfigError::ValidationError {
                location: ErrorLocation::from(Location::caller()),
                reason: format!("{ENV_MPV_TIMEOUT_MS} must be greater than zero"),
            });
        }

        self.level_filter()?;

        Ok(())
    }

    /// `log` filter for `log_level`, accepting loguru-style
    /// names (`WARNING`, `CRITICAL`, `SUCCESS`) as well.
    pub fn level_filter(&self) -> Result<LevelFilter, ConfigError> {
        let level = match self.log_level.as_str() {
            "WARNING" => "WARN",
            "CRITICAL" => "ERROR",
            "SUCCESS" => "INFO",
            other => other,
        };

        LevelFilter::from_str(level).map_err(|_| ConfigError::ValidationError {
            location: ErrorLocation::from(Location::caller()),
            reason: format!("Invalid {ENV_LOG_LEVEL}: {}", self.log_level),
        })
    }
}

fn is_truthy(value: &str) -> bool {
    let value = value.trim().to_lowercase();
    TRUTHY_VALUES.contains(&value.as_str())
}

fn serialize_millis<S: serde::Serializer>(
    timeout: &Duration,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.serialize_u64(u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX))
}
