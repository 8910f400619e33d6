//! Mapping build descriptor returned by the metadata service

use serde::{Deserialize, Serialize};

use crate::mapping::format::{ArtifactFormat, artifact_file_name};
use crate::yarn::error::FetchError;

/// One published mapping build for a product version
///
/// Two descriptors for the same product version are interchangeable when
/// their `build` numbers match, see [`VersionDescriptor::same_build`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionDescriptor {
    pub build: u32,
    /// Maven coordinate, `group:artifact:version`
    pub maven: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub game_version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub separator: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default)]
    pub stable: bool,
}

/// Parsed `group:artifact:version` coordinate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MavenCoordinate<'a> {
    pub group: &'a str,
    pub artifact: &'a str,
    pub version: &'a str,
}

impl VersionDescriptor {
    /// Creates a descriptor with only the required fields
    pub fn new(build: u32, maven: &str) -> Self {
        Self {
            build,
            maven: maven.to_string(),
            game_version: None,
            separator: None,
            version: None,
            stable: false,
        }
    }

    /// Whether both descriptors refer to the same mapping build
    pub fn same_build(&self, other: &VersionDescriptor) -> bool {
        self.build == other.build
    }

    /// Split the maven coordinate into its parts
    pub fn coordinate(&self) -> Result<MavenCoordinate<'_>, FetchError> {
        let mut parts = self.maven.split(':');
        match (parts.next(), parts.next(), parts.next(), parts.next()) {
            (Some(group), Some(artifact), Some(version), None)
                if !group.is_empty() && !artifact.is_empty() && !version.is_empty() =>
            {
                Ok(MavenCoordinate {
                    group,
                    artifact,
                    version,
                })
            }
            _ => Err(FetchError::InvalidResponse(format!(
                "invalid maven coordinate: {}",
                self.maven
            ))),
        }
    }

    /// Derive the download URL of an artifact in the given format
    pub fn maven_url(&self, base_url: &str, format: ArtifactFormat) -> Result<String, FetchError> {
        let coordinate = self.coordinate()?;
        Ok(format!(
            "{}/{}/{}/{}/{}",
            base_url.trim_end_matches('/'),
            coordinate.group.replace('.', "/"),
            coordinate.artifact,
            coordinate.version,
            artifact_file_name(coordinate.artifact, coordinate.version, format)
        ))
    }
}
