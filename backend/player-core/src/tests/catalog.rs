// Unit tests for catalog line parsing
// File loading is covered in integration_tests/catalog/catalog.rs

use crate::catalog::{get_code_regex, parse_episodes, parse_line};

use std::path::PathBuf;

/// **VALUE**: A well-formed path yields season, episode, title and label.
#[test]
fn given_path_with_title_when_parsed_then_all_fields_extracted() {
    let episode = parse_line("/media/simpsons/S01E02_Bart the Genius.mkv", 4)
        .expect("line should parse");

    assert_eq!(episode.index, 4);
    assert_eq!(episode.season, 1);
    assert_eq!(episode.episode, 2);
    assert_eq!(episode.title, "Bart the Genius");
    assert_eq!(episode.label, "S01E02 - Bart the Genius");
    assert_eq!(
        episode.filepath,
        PathBuf::from("/media/simpsons/S01E02_Bart the Genius.mkv")
    );
}

#[test]
fn given_path_without_title_when_parsed_then_label_is_code_only() {
    let episode = parse_line("C:/shows/S10E101.mp4", 0).expect("line should parse");

    assert_eq!(episode.title, "");
    assert_eq!(episode.label, "S10E101");
}

/// **VALUE**: Only the first `.` ends the name and only the first `_` starts the title.
///
/// **BUG THIS CATCHES**: Would catch splitting on the last dot (keeping `.part1` in the
/// title) or on every underscore (truncating titles that contain one).
#[test]
fn given_name_with_extra_dots_and_underscores_when_parsed_then_split_once() {
    let episode = parse_line("/m/S02E03_Homer_s Odyssey.part1.mkv", 0).expect("line should parse");

    assert_eq!(episode.title, "Homer_s Odyssey");
}

#[test]
fn given_malformed_codes_when_parsed_then_rejected() {
    for line in [
        "/m/E01S01_Title.mkv",
        "/m/S1_Title.mkv",
        "/m/SxxE01.mkv",
        "/m/S01E.mkv",
        "/m/s01e01.mkv",
        "#EXTM3U",
        "/",
    ] {
        assert!(parse_line(line, 0).is_none(), "{line} should be rejected");
    }
}

/// **VALUE**: Skipped lines do not consume an index.
///
/// **WHY THIS MATTERS**: The calling layer loads episodes by index. Gaps would make
/// `load 3` play something other than the fourth listed entry.
#[test]
fn given_contents_with_blank_and_invalid_lines_when_parsed_then_indices_contiguous() {
    let contents = "\n#EXTM3U\n/m/S01E01_Pilot.mkv\n   \nrandom.mkv\n  /m/S01E02.mkv  \n/m/S02E01_Next.mkv\n";

    let catalog = parse_episodes(contents);

    let indices: Vec<usize> = catalog.episodes().iter().map(|e| e.index).collect();
    assert_eq!(indices, vec![0, 1, 2]);
    assert_eq!(catalog.get(1).map(|e| e.label.as_str()), Some("S01E02"));
    assert_eq!(catalog.season_count(), 2);
}

#[test]
fn given_episodes_across_seasons_when_grouped_then_ordered_by_season() {
    let catalog = parse_episodes("/m/S02E01.mkv\n/m/S01E01.mkv\n/m/S02E02.mkv\n");

    let seasons = catalog.by_season();

    assert_eq!(seasons.keys().copied().collect::<Vec<_>>(), vec![1, 2]);
    assert_eq!(seasons[&2].len(), 2);
    assert_eq!(seasons[&1][0].index, 1);
}

#[test]
fn given_code_regex_when_applied_then_captures_named_groups() {
    let caps = get_code_regex().captures("S07E22").expect("should match");

    assert_eq!(&caps["season"], "07");
    assert_eq!(&caps["episode"], "22");
}
