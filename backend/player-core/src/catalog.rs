//! Episode catalog loaded from a playlist-style text file.
//!
//! Each non-blank line is a path to one media file whose name follows
//! `SxxEyy[_Title].ext`, e.g. `/media/simpsons/S01E02_Bart the Genius.mkv`.
//! Lines that do not follow the pattern are skipped with a warning.

use crate::error::catalog::CatalogError;

use common::ErrorLocation;

use std::collections::BTreeMap;
use std::panic::Location;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use log::{debug, info, warn};
use regex::Regex;
use serde::Serialize;

const EPISODE_CODE_PATTERN: &str = r"^S(?P<season>\d+)E(?P<episode>\d+)$";
const CODE_CAPTURE_SEASON: &str = "season";
const CODE_CAPTURE_EPISODE: &str = "episode";
const TITLE_SEPARATOR: char = '_';

static CODE_REGEX: OnceLock<Regex> = OnceLock::new();

pub(crate) fn get_code_regex() -> &'static Regex {
    CODE_REGEX.get_or_init(|| Regex::new(EPISODE_CODE_PATTERN).expect("valid regex pattern"))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Episode {
    pub index: usize,
    pub filepath: PathBuf,
    pub season: u32,
    pub episode: u32,
    /// May be empty.
    pub title: String,
    /// `S01E02` or `S01E02 - Title`.
    pub label: String,
}

impl Episode {
    /// The path as the single token mpv's `loadfile` expects.
    pub fn path_token(&self) -> String {
        self.filepath.to_string_lossy().into_owned()
    }
}

#[derive(Debug, Clone, Default)]
pub struct Catalog {
    episodes: Vec<Episode>,
}

impl Catalog {
    pub fn episodes(&self) -> &[Episode] {
        &self.episodes
    }

    pub fn get(&self, index: usize) -> Option<&Episode> {
        self.episodes.get(index)
    }

    pub fn len(&self) -> usize {
        self.episodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.episodes.is_empty()
    }

    pub fn season_count(&self) -> usize {
        self.by_season().len()
    }

    pub fn by_season(&self) -> BTreeMap<u32, Vec<&Episode>> {
        let mut seasons: BTreeMap<u32, Vec<&Episode>> = BTreeMap::new();
        for episode in &self.episodes {
            seasons.entry(episode.season).or_default().push(episode);
        }
        seasons
    }
}

/// Load the catalog at `path`.
///
/// # Errors
///
/// Returns [`CatalogError::Missing`] if `path` is not an existing file and
/// [`CatalogError::Read`] if it cannot be read as UTF-8 text.
pub fn load_episodes(path: &Path) -> Result<Catalog, CatalogError> {
    if !path.is_file() {
        return Err(CatalogError::Missing {
            path: path.to_path_buf(),
            location: ErrorLocation::from(Location::caller()),
        });
    }

    let contents = std::fs::read_to_string(path).map_err(|e| CatalogError::Read {
        path: path.to_path_buf(),
        location: ErrorLocation::from(Location::caller()),
        source: e,
    })?;

    let catalog = parse_episodes(&contents);

    info!(
        "Loaded {} episodes from {} seasons from {}",
        catalog.len(),
        catalog.season_count(),
        path.display()
    );

    Ok(catalog)
}

/// Build a catalog from file contents. Unparseable lines are skipped.
pub fn parse_episodes(contents: &str) -> Catalog {
    let mut episodes = Vec::new();

    for line in contents.lines().map(str::trim).filter(|l| !l.is_empty()) {
        match parse_line(line, episodes.len()) {
            Some(episode) => episodes.push(episode),
            None => warn!("Skipping file with invalid format: {line}"),
        }
    }

    Catalog { episodes }
}

pub(crate) fn parse_line(line: &str, index: usize) -> Option<Episode> {
    let filepath = PathBuf::from(line);
    let name = filepath.file_name()?.to_string_lossy().into_owned();

    let stem = name.split('.').next().unwrap_or_default();
    let (code, title) = match stem.split_once(TITLE_SEPARATOR) {
        Some((code, title)) => (code, title.to_string()),
        None => (stem, String::new()),
    };

    let captures = get_code_regex().captures(code)?;
    let season = captures.name(CODE_CAPTURE_SEASON)?.as_str().parse::<u32>().ok()?;
    let episode = captures.name(CODE_CAPTURE_EPISODE)?.as_str().parse::<u32>().ok()?;

    let mut label = format!("S{season:02}E{episode:02}");
    if !title.is_empty() {
        label.push_str(" - ");
        label.push_str(&title);
    }

    debug!("Catalog entry {index}: {label}");

    Some(Episode {
        index,
        filepath,
        season,
        episode,
        title,
        label,
    })
}
