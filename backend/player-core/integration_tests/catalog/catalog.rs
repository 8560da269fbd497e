use player_core::catalog::load_episodes;
use player_core::error::CatalogError;

use std::fs;

use tempfile::TempDir;

/// **VALUE**: A catalog file on disk loads into indexed, labelled episodes.
///
/// **WHY THIS MATTERS**: The calling layer turns "load episode 3" into a `loadfile` with
/// the fourth entry's path. If loading drops or reorders entries, the wrong episode plays.
#[test]
fn given_catalog_file_when_loaded_then_episodes_in_file_order() {
    // GIVEN: A playlist file with a header, a bad line and three episodes
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = dir.path().join("simpsons.m3u");
    fs::write(
        &path,
        "#EXTM3U\n/media/S01E01_Simpsons Roasting on an Open Fire.mkv\nnotes.txt\n\n/media/S01E02_Bart the Genius.mkv\n/media/S02E01.mkv\n",
    )
    .expect("Failed to write catalog");

    // WHEN: Loading it
    let catalog = load_episodes(&path).expect("catalog should load");

    // THEN: Valid entries are kept in order with contiguous indices
    let labels: Vec<&str> = catalog.episodes().iter().map(|e| e.label.as_str()).collect();
    assert_eq!(
        labels,
        vec![
            "S01E01 - Simpsons Roasting on an Open Fire",
            "S01E02 - Bart the Genius",
            "S02E01",
        ]
    );
    assert_eq!(catalog.season_count(), 2);
    assert_eq!(
        catalog.get(1).map(|e| e.path_token()),
        Some("/media/S01E02_Bart the Genius.mkv".to_string())
    );
    assert!(catalog.get(3).is_none());
}

#[test]
fn given_missing_file_when_loaded_then_missing_error() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = dir.path().join("absent.m3u");

    let result = load_episodes(&path);

    assert!(matches!(result, Err(CatalogError::Missing { .. })));
}

/// **VALUE**: Pointing the loader at a directory is a configuration error, not a crash.
#[test]
fn given_directory_path_when_loaded_then_missing_error() {
    let dir = TempDir::new().expect("Failed to create temp dir");

    let result = load_episodes(dir.path());

    match result {
        Err(CatalogError::Missing { path, .. }) => assert_eq!(path, dir.path()),
        other => panic!("expected Missing, got {other:?}"),
    }
}

#[test]
fn given_non_utf8_file_when_loaded_then_read_error() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = dir.path().join("binary.m3u");
    fs::write(&path, [0xff, 0xfe, 0x00, 0x53]).expect("Failed to write catalog");

    let result = load_episodes(&path);

    assert!(matches!(result, Err(CatalogError::Read { .. })));
}

#[test]
fn given_empty_file_when_loaded_then_empty_catalog() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = dir.path().join("empty.m3u");
    fs::write(&path, "").expect("Failed to write catalog");

    let catalog = load_episodes(&path).expect("empty catalog is valid");

    assert!(catalog.is_empty());
    assert_eq!(catalog.season_count(), 0);
}
