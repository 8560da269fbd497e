use common::ErrorLocation;

use std::path::PathBuf;

use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum CatalogError {
    #[error("Catalog Missing Error: {path} is not a readable file {location}")]
    Missing {
        path: PathBuf,
        location: ErrorLocation,
    },

    #[error("Catalog Read Error: {path}: {source} {location}")]
    Read {
        path: PathBuf,
        location: ErrorLocation,
        #[source]
        source: std::io::Error,
    },
}
