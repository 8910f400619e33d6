use std::path::PathBuf;

use thiserror::Error;

use crate::mapping::traits::ParseError;

/// Failures talking to the metadata service or the artifact repository
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Unexpected status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Failures reading or writing the on-disk mapping data
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl StoreError {
    pub(crate) fn io(path: impl Into<PathBuf>) -> impl FnOnce(std::io::Error) -> Self {
        let path = path.into();
        move |source| StoreError::Io { path, source }
    }
}

#[derive(Debug, Error)]
pub enum MappingError {
    /// No mapping data exists (or is cached) for the product version
    #[error("No mappings available for version {0}")]
    NoSuchVersion(String),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Failed to parse mappings: {0}")]
    Parse(#[from] ParseError),

    #[error("Background task failed: {0}")]
    Task(String),
}
