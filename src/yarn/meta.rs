//! Remote version resolution against the Fabric metadata service

#[cfg(test)]
use mockall::automock;

use tracing::{debug, warn};

use crate::config::{DEFAULT_META_URL, USER_AGENT};
use crate::yarn::descriptor::VersionDescriptor;
use crate::yarn::error::FetchError;

/// Trait for resolving the newest mapping build of a product version
#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait MetaService: Send + Sync {
    /// Fetches the newest published mapping build
    ///
    /// # Returns
    /// * `Ok(Some(descriptor))` - The newest build
    /// * `Ok(None)` - No mapping builds exist for this product version
    /// * `Err(FetchError)` - If the request fails
    async fn latest_build(
        &self,
        product_version: &str,
    ) -> Result<Option<VersionDescriptor>, FetchError>;
}

/// Metadata service client for `meta.fabricmc.net`
pub struct FabricMeta {
    client: reqwest::Client,
    base_url: String,
}

impl FabricMeta {
    /// Creates a new FabricMeta with a custom base URL
    pub fn new(base_url: &str) -> Self {
        Self {
            client: reqwest::Client::builder()
                .user_agent(USER_AGENT)
                .build()
                .expect("Failed to create HTTP client"),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Percent-encodes a product version as a single URL path segment
    /// (e.g. `1.14 Pre-Release 1` -> `1.14%20Pre-Release%201`)
    fn encode_path_segment(segment: &str) -> String {
        let mut encoded = String::with_capacity(segment.len());
        for byte in segment.bytes() {
            match byte {
                b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.' | b'_' | b'~' | b'+' => {
                    encoded.push(byte as char)
                }
                _ => encoded.push_str(&format!("%{:02X}", byte)),
            }
        }
        encoded
    }
}

impl Default for FabricMeta {
    fn default() -> Self {
        Self::new(DEFAULT_META_URL)
    }
}

#[async_trait::async_trait]
impl MetaService for FabricMeta {
    async fn latest_build(
        &self,
        product_version: &str,
    ) -> Result<Option<VersionDescriptor>, FetchError> {
        let url = format!(
            "{}/versions/mappings/{}/",
            self.base_url,
            Self::encode_path_segment(product_version)
        );
        debug!("Resolving latest mapping build: {}", url);

        let response = self.client.get(&url).send().await?;
        let status = response.status();

        if !status.is_success() {
            warn!("Metadata service returned status {}: {}", status, url);
            return Err(FetchError::UnexpectedStatus {
                status: status.as_u16(),
                url,
            });
        }

        // Newest build first
        let builds: Vec<VersionDescriptor> = response.json().await.map_err(|e| {
            warn!("Failed to parse metadata response: {}", e);
            FetchError::InvalidResponse(e.to_string())
        })?;

        Ok(builds.into_iter().next())
    }
}
