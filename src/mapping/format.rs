//! Artifact generations and on-disk format detection

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::mapping::tiny_v1::TinyV1Parser;
use crate::mapping::tiny_v2::TinyV2Parser;
use crate::mapping::traits::FormatParser;

/// The two generations of the Yarn mapping artifact
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArtifactFormat {
    /// Newer generation: Tiny v2 inside a jar
    MergedV2,
    /// Older generation: gzipped Tiny v1
    TinyV1,
}

impl ArtifactFormat {
    /// Detection order; the newer generation wins when both are present
    pub const PREFERENCE: [ArtifactFormat; 2] = [ArtifactFormat::MergedV2, ArtifactFormat::TinyV1];

    /// Maven classifier of the artifact
    pub fn classifier(&self) -> &'static str {
        match self {
            ArtifactFormat::MergedV2 => "mergedv2",
            ArtifactFormat::TinyV1 => "tiny",
        }
    }

    /// File extension of the artifact
    pub fn extension(&self) -> &'static str {
        match self {
            ArtifactFormat::MergedV2 => "jar",
            ArtifactFormat::TinyV1 => "gz",
        }
    }

    /// Returns the parser able to read this format
    pub fn parser(&self) -> Arc<dyn FormatParser> {
        match self {
            ArtifactFormat::MergedV2 => Arc::new(TinyV2Parser),
            ArtifactFormat::TinyV1 => Arc::new(TinyV1Parser),
        }
    }
}

/// Builds the artifact file name for an artifact id and version
pub fn artifact_file_name(artifact: &str, version: &str, format: ArtifactFormat) -> String {
    format!(
        "{}-{}-{}.{}",
        artifact,
        version,
        format.classifier(),
        format.extension()
    )
}

/// Detect which artifact generation is present in a version directory
///
/// Checks for the newer generation first.
pub fn detect_format(dir: &Path, artifact: &str, version: &str) -> Option<(ArtifactFormat, PathBuf)> {
    ArtifactFormat::PREFERENCE.into_iter().find_map(|format| {
        let path = dir.join(artifact_file_name(artifact, version, format));
        path.is_file().then_some((format, path))
    })
}
