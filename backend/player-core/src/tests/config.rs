// Unit tests for environment-driven configuration

use crate::config::{
    ENV_DRY_RUN, ENV_EPISODES_FILE, ENV_LOG_LEVEL, ENV_MPV_SOCKET, ENV_MPV_TIMEOUT_MS,
    HomeroConfig,
};
use crate::error::config::ConfigError;
use crate::{DEFAULT_EPISODES_FILE, DEFAULT_IPC_TIMEOUT, DEFAULT_MPV_SOCKET};

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use log::LevelFilter;

fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key| map.get(key).cloned()
}

/// **VALUE**: With nothing set, the client starts in dry-run against the default socket.
///
/// **WHY THIS MATTERS**: Dry-run by default means a freshly deployed front-end cannot
/// drive a real player until someone opts in.
#[test]
fn given_empty_environment_when_loaded_then_defaults_apply() {
    let config = HomeroConfig::from_lookup(lookup_from(&[])).expect("defaults are valid");

    assert!(config.dry_run);
    assert_eq!(config.mpv_socket, PathBuf::from(DEFAULT_MPV_SOCKET));
    assert_eq!(config.episodes_file, PathBuf::from(DEFAULT_EPISODES_FILE));
    assert_eq!(config.timeout, DEFAULT_IPC_TIMEOUT);
    assert_eq!(config.level_filter().unwrap(), LevelFilter::Debug);
    assert_eq!(config, HomeroConfig::default());
}

#[test]
fn given_dry_run_values_when_loaded_then_only_truthy_words_enable_it() {
    for (raw, expected) in [
        ("1", true),
        ("TRUE", true),
        (" yes ", true),
        ("0", false),
        ("false", false),
        ("on", false),
        ("", false),
    ] {
        let config = HomeroConfig::from_lookup(lookup_from(&[(ENV_DRY_RUN, raw)])).unwrap();
        assert_eq!(config.dry_run, expected, "DRY_RUN={raw:?}");
    }
}

#[test]
fn given_all_keys_set_when_loaded_then_values_used() {
    let config = HomeroConfig::from_lookup(lookup_from(&[
        (ENV_DRY_RUN, "0"),
        (ENV_MPV_SOCKET, "/tmp/mpv.sock"),
        (ENV_EPISODES_FILE, "/srv/episodes.m3u"),
        (ENV_LOG_LEVEL, "warning"),
        (ENV_MPV_TIMEOUT_MS, "750"),
    ]))
    .expect("config should load");

    assert!(!config.dry_run);
    assert_eq!(config.mpv_socket, PathBuf::from("/tmp/mpv.sock"));
    assert_eq!(config.episodes_file, PathBuf::from("/srv/episodes.m3u"));
    assert_eq!(config.timeout, Duration::from_millis(750));
    assert_eq!(config.level_filter().unwrap(), LevelFilter::Warn);
}

#[test]
fn given_non_numeric_timeout_when_loaded_then_parse_error() {
    let result = HomeroConfig::from_lookup(lookup_from(&[(ENV_MPV_TIMEOUT_MS, "soon")]));

    match result {
        Err(ConfigError::ParseError { key, value, .. }) => {
            assert_eq!(key, ENV_MPV_TIMEOUT_MS);
            assert_eq!(value, "soon");
        }
        other => panic!("expected ParseError, got {other:?}"),
    }
}

/// **VALUE**: Values that would make every call fail are rejected up front.
///
/// **BUG THIS CATCHES**: Would catch a zero timeout slipping through, which turns every
/// mpv call into an instant "MPV socket timeout".
#[test]
fn given_invalid_values_when_loaded_then_validation_error() {
    for pairs in [
        vec![(ENV_MPV_TIMEOUT_MS, "0")],
        vec![(ENV_MPV_SOCKET, "")],
        vec![(ENV_LOG_LEVEL, "chatty")],
    ] {
        let result = HomeroConfig::from_lookup(lookup_from(&pairs));
        assert!(
            matches!(result, Err(ConfigError::ValidationError { .. })),
            "{pairs:?} should fail validation"
        );
    }
}

#[test]
fn given_config_when_serialized_then_timeout_in_millis() {
    let json = serde_json::to_value(HomeroConfig::default()).unwrap();

    assert_eq!(json["timeout"], 5000);
    assert_eq!(json["dry_run"], true);
}

/// **BUG THIS CATCHES**: Would catch an `as u64` cast that wraps a huge timeout
/// around to a small (or zero) millisecond count in `homero config` output.
#[test]
fn given_timeout_beyond_u64_millis_when_serialized_then_saturates() {
    // GIVEN
    let config = HomeroConfig {
        timeout: Duration::MAX,
        ..HomeroConfig::default()
    };

    // WHEN
    let json = serde_json::to_value(&config).unwrap();

    // THEN
    assert_eq!(json["timeout"], u64::MAX);
}
