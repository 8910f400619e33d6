//! Artifact download with newer-to-older format fallback

#[cfg(test)]
use mockall::automock;

use tracing::{debug, info, warn};

use crate::config::{DEFAULT_MAVEN_URL, USER_AGENT};
use crate::mapping::format::ArtifactFormat;
use crate::yarn::descriptor::VersionDescriptor;
use crate::yarn::error::FetchError;

/// Statuses meaning "this build has no artifact in the requested format"
pub const FORMAT_UNAVAILABLE_STATUSES: [u16; 4] = [400, 403, 404, 500];

/// Whether a status from the newer-generation URL should trigger the fallback
pub fn is_format_unavailable(status: u16) -> bool {
    FORMAT_UNAVAILABLE_STATUSES.contains(&status)
}

/// A downloaded artifact, not yet written to disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadedArtifact {
    pub format: ArtifactFormat,
    /// Final path segment of the download URL
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// Trait for downloading mapping artifacts
#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait ArtifactFetcher: Send + Sync {
    /// Downloads the newest available artifact generation for a build
    async fn fetch(&self, descriptor: &VersionDescriptor) -> Result<DownloadedArtifact, FetchError>;
}

/// Fetcher for artifacts published to a maven repository
pub struct MavenArtifactFetcher {
    client: reqwest::Client,
    base_url: String,
}

impl MavenArtifactFetcher {
    /// Creates a new MavenArtifactFetcher with a custom repository URL
    pub fn new(base_url: &str) -> Self {
        Self {
            client: reqwest::Client::builder()
                .user_agent(USER_AGENT)
                .build()
                .expect("Failed to create HTTP client"),
            base_url: base_url.to_string(),
        }
    }

    async fn request(
        &self,
        descriptor: &VersionDescriptor,
        format: ArtifactFormat,
    ) -> Result<(String, reqwest::Response), FetchError> {
        let url = descriptor.maven_url(&self.base_url, format)?;
        debug!("Downloading {}", url);
        let response = self.client.get(&url).send().await?;
        Ok((url, response))
    }
}

impl Default for MavenArtifactFetcher {
    fn default() -> Self {
        Self::new(DEFAULT_MAVEN_URL)
    }
}

#[async_trait::async_trait]
impl ArtifactFetcher for MavenArtifactFetcher {
    async fn fetch(&self, descriptor: &VersionDescriptor) -> Result<DownloadedArtifact, FetchError> {
        let (mut url, mut response) = self.request(descriptor, ArtifactFormat::MergedV2).await?;
        let mut format = ArtifactFormat::MergedV2;

        if is_format_unavailable(response.status().as_u16()) {
            warn!(
                "No {} artifact for {} (status {}), falling back to {}",
                ArtifactFormat::MergedV2.classifier(),
                descriptor.maven,
                response.status(),
                ArtifactFormat::TinyV1.classifier()
            );
            format = ArtifactFormat::TinyV1;
            (url, response) = self.request(descriptor, format).await?;
        }

        let status = response.status();
        if !status.is_success() {
            warn!("Artifact repository returned status {}: {}", status, url);
            return Err(FetchError::UnexpectedStatus {
                status: status.as_u16(),
                url,
            });
        }

        let bytes = response.bytes().await?.to_vec();
        let file_name = url.rsplit('/').next().unwrap_or_default().to_string();
        info!("Downloaded {} ({} bytes)", file_name, bytes.len());

        Ok(DownloadedArtifact {
            format,
            file_name,
            bytes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Server;
    use rstest::rstest;

    const MERGED_PATH: &str = "/net/fabricmc/yarn/1.20.1+build.7/yarn-1.20.1+build.7-mergedv2.jar";
    const TINY_PATH: &str = "/net/fabricmc/yarn/1.20.1+build.7/yarn-1.20.1+build.7-tiny.gz";

    fn descriptor() -> VersionDescriptor {
        VersionDescriptor::new(7, "net.fabricmc:yarn:1.20.1+build.7")
    }

    #[rstest]
    #[case(400, true)]
    #[case(403, true)]
    #[case(404, true)]
    #[case(500, true)]
    #[case(401, false)]
    #[case(502, false)]
    #[case(503, false)]
    fn is_format_unavailable_returns_expected(#[case] status: u16, #[case] expected: bool) {
        assert_eq!(is_format_unavailable(status), expected);
    }

    #[tokio::test]
    async fn fetch_prefers_merged_v2() {
        let mut server = Server::new_async().await;

        let merged = server
            .mock("GET", MERGED_PATH)
            .with_status(200)
            .with_body("jar-bytes")
            .create_async()
            .await;
        let tiny = server
            .mock("GET", TINY_PATH)
            .expect(0)
            .create_async()
            .await;

        let fetcher = MavenArtifactFetcher::new(&server.url());
        let artifact = fetcher.fetch(&descriptor()).await.unwrap();

        merged.assert_async().await;
        tiny.assert_async().await;
        assert_eq!(
            artifact,
            DownloadedArtifact {
                format: ArtifactFormat::MergedV2,
                file_name: "yarn-1.20.1+build.7-mergedv2.jar".to_string(),
                bytes: b"jar-bytes".to_vec(),
            }
        );
    }

    #[rstest]
    #[case(400)]
    #[case(403)]
    #[case(404)]
    #[case(500)]
    #[tokio::test]
    async fn fetch_falls_back_to_tiny_v1_on_format_unavailable(#[case] status: usize) {
        let mut server = Server::new_async().await;

        let merged = server
            .mock("GET", MERGED_PATH)
            .with_status(status)
            .create_async()
            .await;
        let tiny = server
            .mock("GET", TINY_PATH)
            .with_status(200)
            .with_body("gz-bytes")
            .create_async()
            .await;

        let fetcher = MavenArtifactFetcher::new(&server.url());
        let artifact = fetcher.fetch(&descriptor()).await.unwrap();

        merged.assert_async().await;
        tiny.assert_async().await;
        assert_eq!(artifact.format, ArtifactFormat::TinyV1);
        assert_eq!(artifact.file_name, "yarn-1.20.1+build.7-tiny.gz");
        assert_eq!(artifact.bytes, b"gz-bytes".to_vec());
    }

    #[tokio::test]
    async fn fetch_propagates_other_statuses_without_fallback() {
        let mut server = Server::new_async().await;

        let merged = server
            .mock("GET", MERGED_PATH)
            .with_status(502)
            .create_async()
            .await;
        let tiny = server
            .mock("GET", TINY_PATH)
            .expect(0)
            .create_async()
            .await;

        let fetcher = MavenArtifactFetcher::new(&server.url());
        let result = fetcher.fetch(&descriptor()).await;

        merged.assert_async().await;
        tiny.assert_async().await;
        assert!(matches!(
            result,
            Err(FetchError::UnexpectedStatus { status: 502, .. })
        ));
    }

    #[tokio::test]
    async fn fetch_fails_when_older_format_is_also_missing() {
        let mut server = Server::new_async().await;

        let merged = server
            .mock("GET", MERGED_PATH)
            .with_status(404)
            .create_async()
            .await;
        let tiny = server
            .mock("GET", TINY_PATH)
            .with_status(404)
            .create_async()
            .await;

        let fetcher = MavenArtifactFetcher::new(&server.url());
        let result = fetcher.fetch(&descriptor()).await;

        merged.assert_async().await;
        tiny.assert_async().await;
        assert!(matches!(
            result,
            Err(FetchError::UnexpectedStatus { status: 404, .. })
        ));
    }
}
