// Unit tests for logger initialization
// The global logger can be installed once per process, so only one test installs it

use crate::error::HomeroError;
use crate::logger::{LOG_FILE_NAME, initialize, initialize_internal};

use log::LevelFilter;
use std::path::PathBuf;
use tempfile::TempDir;

/// **VALUE**: Calling initialize() more than once neither panics nor fails.
///
/// **BUG THIS CATCHES**: Would catch removal of the Once/AtomicBool guards, which makes
/// fern fail when a second global logger is set.
#[test]
fn given_logger_initialized_when_called_again_then_returns_ok() {
    // GIVEN: A writable temp directory
    let temp_dir = TempDir::new().unwrap();

    // WHEN: Calling initialize twice
    let result1 = initialize(temp_dir.path(), LevelFilter::Debug);
    let result2 = initialize(temp_dir.path(), LevelFilter::Info);

    // THEN: Both succeed and the log file exists
    assert!(result1.is_ok(), "First initialization should succeed");
    assert!(result2.is_ok(), "Second initialization should be a no-op");
    assert!(temp_dir.path().join(LOG_FILE_NAME).exists());
}

/// **VALUE**: An unusable log directory is an error, not a panic.
///
/// **BUG THIS CATCHES**: Would catch `fern::log_file()` being unwrapped.
#[test]
fn given_invalid_log_dir_when_initializing_then_returns_homero_error() {
    // GIVEN: A path below a character device
    let invalid_dir = PathBuf::from("/dev/null/invalid-path");

    // WHEN: Building the dispatch (fails before the global logger is touched)
    let result = initialize_internal(&invalid_dir, LevelFilter::Debug);

    // THEN: A Homero error naming the log file
    match result {
        Err(HomeroError::Homero { message, .. }) => {
            assert!(message.contains("Failed to create log file"), "{message}");
            assert!(message.contains(LOG_FILE_NAME), "{message}");
        }
        other => panic!("Expected HomeroError::Homero, got {other:?}"),
    }
}
