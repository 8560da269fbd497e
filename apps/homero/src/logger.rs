//! Logging for the homero CLI.
//!
//! Records go to stderr (colored) and to `homero.log` (plain); stdout is left
//! for the JSON results. Setup runs at most once per process.

use crate::error::HomeroError;

use common::ErrorLocation;

use std::fmt::{Arguments, Display};
use std::io::stderr;
use std::panic::Location;
use std::path::Path;
use std::sync::Once;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::SystemTime;

use fern::colors::Color::{Blue, Green, Magenta, Red, Yellow};
use fern::colors::ColoredLevelConfig;
use fern::{Dispatch, FormatCallback};
use humantime::format_rfc3339;
use log::{LevelFilter, Record, info, warn};

static SETUP: Once = Once::new();

static SETUP_REQUESTED: AtomicBool = AtomicBool::new(false);

pub const LOG_FILE_NAME: &str = "homero.log";

/// Install the global logger.
///
/// Later calls are no-ops that log a warning.
///
/// # Arguments
///
/// * `log_dir` - Existing directory that receives `homero.log`
/// * `level` - Most verbose level written to either output
///
/// # Errors
///
/// Returns [`HomeroError::Homero`] if the log file cannot be opened or
/// another global logger is already installed.
pub fn initialize(log_dir: &Path, level: LevelFilter) -> Result<(), HomeroError> {
    if SETUP_REQUESTED.swap(true, Ordering::SeqCst) {
        warn!("Logger already initialized, keeping the first configuration");
        return Ok(());
    }

    let mut result = Ok(());

    SETUP.call_once(|| {
        result = initialize_internal(log_dir, level);
        if result.is_ok() {
            info!("Logging at {level} to {}", log_dir.join(LOG_FILE_NAME).display());
        }
    });

    result
}

#[track_caller]
pub(crate) fn initialize_internal(log_dir: &Path, level: LevelFilter) -> Result<(), HomeroError> {
    let log_file_path = log_dir.join(LOG_FILE_NAME);

    let log_file = fern::log_file(&log_file_path).map_err(|e| HomeroError::Homero {
        message: format!("Failed to create log file {}: {e}", log_file_path.display()),
        location: ErrorLocation::from(Location::caller()),
    })?;

    let colors = ColoredLevelConfig::new()
        .trace(Magenta)
        .debug(Blue)
        .info(Green)
        .warn(Yellow)
        .error(Red);

    let terminal = Dispatch::new()
        .format(move |out, message, record| {
            write_line(out, message, record, colors.color(record.level()))
        })
        .chain(stderr());

    let file = Dispatch::new()
        .format(|out, message, record| write_line(out, message, record, record.level()))
        .chain(log_file);

    Dispatch::new()
        .level(level)
        .chain(terminal)
        .chain(file)
        .apply()
        .map_err(|e| HomeroError::Homero {
            message: format!("Failed to initialize logger: {e}"),
            location: ErrorLocation::from(Location::caller()),
        })
}

/// `[<rfc3339> - LEVEL] message [file:line]`
fn write_line(
    out: FormatCallback<'_>,
    message: &Arguments<'_>,
    record: &Record<'_>,
    level: impl Display,
) {
    out.finish(format_args!(
        "[{} - {level}] {message} [{}:{}]",
        format_rfc3339(SystemTime::now()),
        record.file().unwrap_or("unknown"),
        record.line().unwrap_or(0),
    ))
}
