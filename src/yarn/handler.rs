//! Public lookup surface: refresh if needed, then query the cached mappings

use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use crate::config::MappingsConfig;
use crate::mapping::types::{EntryKind, MappingEntry, NamingScheme};
use crate::yarn::cache::MappingCache;
use crate::yarn::error::MappingError;
use crate::yarn::fetcher::MavenArtifactFetcher;
use crate::yarn::meta::FabricMeta;
use crate::yarn::query::{MatchMode, query};
use crate::yarn::refresh::RefreshCoordinator;
use crate::yarn::store::VersionStore;

/// Answers mapping lookups for any product version
pub struct MappingHandler {
    coordinator: RefreshCoordinator,
}

impl MappingHandler {
    pub fn new(coordinator: RefreshCoordinator) -> Self {
        Self { coordinator }
    }

    /// Build a handler talking to the configured metadata service and repository
    pub fn from_config(config: &MappingsConfig) -> Self {
        let coordinator = RefreshCoordinator::new(
            Arc::new(FabricMeta::new(&config.endpoints.meta_url)),
            Arc::new(MavenArtifactFetcher::new(&config.endpoints.maven_url)),
            VersionStore::new(config.mappings_dir()),
            MappingCache::new(Duration::from_millis(config.cache.ttl)),
            Duration::from_millis(config.cache.check_interval),
        );
        Self::new(coordinator)
    }

    pub fn coordinator(&self) -> &RefreshCoordinator {
        &self.coordinator
    }

    /// Entries whose name ends with `text` (case-sensitive)
    pub async fn lookup_suffix(
        &self,
        scheme: Option<NamingScheme>,
        kind: EntryKind,
        product_version: &str,
        text: &str,
    ) -> Result<Vec<MappingEntry>, MappingError> {
        self.lookup(scheme, kind, product_version, text, MatchMode::Suffix)
            .await
    }

    /// Entries whose name equals `text` (case-insensitive)
    pub async fn lookup_exact(
        &self,
        scheme: Option<NamingScheme>,
        kind: EntryKind,
        product_version: &str,
        text: &str,
    ) -> Result<Vec<MappingEntry>, MappingError> {
        self.lookup(scheme, kind, product_version, text, MatchMode::Exact)
            .await
    }

    async fn lookup(
        &self,
        scheme: Option<NamingScheme>,
        kind: EntryKind,
        product_version: &str,
        text: &str,
        mode: MatchMode,
    ) -> Result<Vec<MappingEntry>, MappingError> {
        let entries = self.coordinator.ensure_fresh(product_version).await?;

        let hits: Vec<MappingEntry> = query(&entries, scheme, kind, text, mode)
            .into_iter()
            .cloned()
            .collect();
        debug!(
            "{:?} lookup of {} {:?} in {}: {} hits",
            mode,
            kind,
            text,
            product_version,
            hits.len()
        );
        Ok(hits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapping::format::{ArtifactFormat, artifact_file_name};
    use crate::yarn::descriptor::VersionDescriptor;
    use crate::yarn::error::FetchError;
    use crate::yarn::fetcher::{ArtifactFetcher, DownloadedArtifact};
    use crate::yarn::meta::MockMetaService;
    use std::io::{Cursor, Write};
    use std::sync::atomic::{AtomicU32, Ordering};
    use tempfile::TempDir;
    use tokio::sync::Notify;
    use zip::write::SimpleFileOptions;

    const VERSION: &str = "1.20.1";
    const HOURS_4: Duration = Duration::from_secs(4 * 60 * 60);

    fn descriptor(build: u32) -> VersionDescriptor {
        VersionDescriptor::new(build, &format!("net.fabricmc:yarn:1.20.1+build.{}", build))
    }

    /// One named class per build number
    fn merged_v2_artifact(descriptor: &VersionDescriptor) -> DownloadedArtifact {
        let mut text = String::from("tiny\t2\t0\tofficial\tintermediary\tnamed\n");
        for i in 0..descriptor.build {
            text.push_str(&format!(
                "c\tc{i}\tnet/minecraft/class_{i}\tnet/minecraft/Named{i}\n"
            ));
        }

        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        writer
            .start_file("mappings/mappings.tiny", SimpleFileOptions::default())
            .unwrap();
        writer.write_all(text.as_bytes()).unwrap();

        let coordinate = descriptor.coordinate().unwrap();
        DownloadedArtifact {
            format: ArtifactFormat::MergedV2,
            file_name: artifact_file_name(
                coordinate.artifact,
                coordinate.version,
                ArtifactFormat::MergedV2,
            ),
            bytes: writer.finish().unwrap().into_inner(),
        }
    }

    /// Serves artifacts, holding downloads of `gated_build` until released
    struct GatedFetcher {
        gated_build: u32,
        parked: Arc<Notify>,
        release: Arc<Notify>,
    }

    #[async_trait::async_trait]
    impl ArtifactFetcher for GatedFetcher {
        async fn fetch(
            &self,
            descriptor: &VersionDescriptor,
        ) -> Result<DownloadedArtifact, FetchError> {
            if descriptor.build == self.gated_build {
                self.parked.notify_one();
                self.release.notified().await;
            }
            Ok(merged_v2_artifact(descriptor))
        }
    }

    /// Remote reports build 7 on the first check and build 8 afterwards
    fn meta_moving_from_7_to_8() -> MockMetaService {
        let calls = AtomicU32::new(0);
        let mut meta = MockMetaService::new();
        meta.expect_latest_build().returning(move |_| {
            let build = if calls.fetch_add(1, Ordering::SeqCst) == 0 {
                7
            } else {
                8
            };
            Ok(Some(descriptor(build)))
        });
        meta
    }

    fn handler(
        root: &TempDir,
        fetcher: GatedFetcher,
        ttl: Duration,
        check_interval: Duration,
    ) -> MappingHandler {
        MappingHandler::new(RefreshCoordinator::new(
            Arc::new(meta_moving_from_7_to_8()),
            Arc::new(fetcher),
            VersionStore::new(root.path()),
            MappingCache::new(ttl),
            check_interval,
        ))
    }

    async fn named_classes(handler: &MappingHandler) -> Result<Vec<MappingEntry>, MappingError> {
        handler
            .lookup_suffix(Some(NamingScheme::Named), EntryKind::Class, VERSION, "")
            .await
    }

    #[tokio::test]
    async fn lookup_during_build_change_sees_a_complete_snapshot() {
        let root = TempDir::new().unwrap();
        let parked = Arc::new(Notify::new());
        let release = Arc::new(Notify::new());
        let fetcher = GatedFetcher {
            gated_build: 8,
            parked: Arc::clone(&parked),
            release: Arc::clone(&release),
        };
        let handler = handler(&root, fetcher, HOURS_4, Duration::ZERO);

        assert_eq!(named_classes(&handler).await.unwrap().len(), 7);

        let refresh = handler.coordinator().ensure_fresh(VERSION);
        let lookup_mid_refresh = async {
            parked.notified().await;
            // Build 8 is still downloading; the build 7 snapshot stays in place
            assert_eq!(handler.coordinator().cache().get(VERSION).unwrap().len(), 7);

            let release_download = async {
                tokio::task::yield_now().await;
                release.notify_one();
            };
            let (hits, ()) = tokio::join!(named_classes(&handler), release_download);
            hits
        };
        let (refreshed, hits) = tokio::join!(refresh, lookup_mid_refresh);

        assert_eq!(refreshed.unwrap().len(), 8);
        assert_eq!(hits.unwrap().len(), 8);
        assert_eq!(handler.coordinator().store().get(VERSION), Some(descriptor(8)));
    }

    #[tokio::test]
    async fn lookup_succeeds_when_cache_expires_right_after_refresh() {
        let root = TempDir::new().unwrap();
        let fetcher = GatedFetcher {
            gated_build: u32::MAX,
            parked: Arc::new(Notify::new()),
            release: Arc::new(Notify::new()),
        };
        let handler = handler(&root, fetcher, Duration::ZERO, HOURS_4);

        let first = named_classes(&handler).await.unwrap();
        let second = named_classes(&handler).await.unwrap();

        assert_eq!(first.len(), 7);
        assert_eq!(first, second);
    }
}
