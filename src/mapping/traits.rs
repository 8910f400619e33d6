//! Format parser trait definition

use std::path::Path;

use crate::mapping::types::MappingEntry;

/// Trait for turning a mapping artifact into mapping entries
pub trait FormatParser: Send + Sync {
    /// Parse raw artifact bytes into entries, preserving file order
    fn parse(&self, bytes: &[u8]) -> Result<Vec<MappingEntry>, ParseError>;

    /// Read an artifact from disk and parse it
    fn parse_file(&self, path: &Path) -> Result<Vec<MappingEntry>, ParseError> {
        let bytes = std::fs::read(path)?;
        self.parse(&bytes)
    }
}

/// Error type for parsing operations
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// Failed to read the artifact container (jar)
    #[error("Failed to read archive: {0}")]
    Archive(String),

    /// Failed to decompress the artifact
    #[error("Failed to decompress: {0}")]
    Decompress(String),

    /// Mapping file header is missing or not the expected format
    #[error("Invalid header: {0}")]
    InvalidHeader(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
