//! Mock metadata service and maven repository

use mockito::{Mock, Server, ServerGuard};
use tempfile::TempDir;

use yarn_mappings::config::{EndpointsConfig, MappingsConfig};
use yarn_mappings::yarn::handler::MappingHandler;

/// A mockito server playing both the metadata service and the maven repository
pub struct MappingServer {
    pub server: ServerGuard,
}

impl MappingServer {
    pub async fn new() -> Self {
        Self {
            server: Server::new_async().await,
        }
    }

    pub fn meta_url(&self) -> String {
        format!("{}/v1", self.server.url())
    }

    pub fn maven_url(&self) -> String {
        format!("{}/maven", self.server.url())
    }

    /// Metadata response listing the given builds, newest first
    pub async fn mock_builds(&mut self, version: &str, builds: &[u32], hits: usize) -> Mock {
        let body: Vec<String> = builds
            .iter()
            .map(|build| {
                format!(
                    r#"{{"gameVersion":"{v}","separator":"+build.","build":{b},"maven":"net.fabricmc:yarn:{v}+build.{b}","version":"{v}+build.{b}","stable":true}}"#,
                    v = version,
                    b = build
                )
            })
            .collect();

        self.server
            .mock("GET", format!("/v1/versions/mappings/{}/", version).as_str())
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(format!("[{}]", body.join(",")))
            .expect(hits)
            .create_async()
            .await
    }

    /// Artifact response for a build; `classifier` is `mergedv2` or `tiny`
    pub async fn mock_artifact(
        &mut self,
        version: &str,
        build: u32,
        classifier: &str,
        status: usize,
        body: Vec<u8>,
        hits: usize,
    ) -> Mock {
        let extension = if classifier == "mergedv2" { "jar" } else { "gz" };
        let path = format!(
            "/maven/net/fabricmc/yarn/{v}+build.{b}/yarn-{v}+build.{b}-{c}.{e}",
            v = version,
            b = build,
            c = classifier,
            e = extension
        );

        self.server
            .mock("GET", path.as_str())
            .with_status(status)
            .with_body(body)
            .expect(hits)
            .create_async()
            .await
    }

    pub fn config(&self, data_dir: &TempDir) -> MappingsConfig {
        MappingsConfig {
            endpoints: EndpointsConfig {
                meta_url: self.meta_url(),
                maven_url: self.maven_url(),
            },
            data_dir: Some(data_dir.path().to_path_buf()),
            ..Default::default()
        }
    }
}

/// Create a handler backed by the mock server and a temporary data directory
pub fn create_test_handler(server: &MappingServer, data_dir: &TempDir) -> MappingHandler {
    MappingHandler::from_config(&server.config(data_dir))
}
