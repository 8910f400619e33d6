//! Download-if-needed logic keeping the mapping cache fresh
//!
//! Each product version moves through the same decision on every call:
//!
//! ```text
//! checked recently? ──yes──▶ cache warm? ──yes──▶ done
//!        │no                     │no
//!        ▼                       ▼
//! remote latest build ◀── reuse artifact on disk if present
//!        │
//!        ├─ same build, cache warm ─────────▶ done
//!        ├─ same build, cache cold ─────────▶ parse artifact on disk
//!        └─ new build / no record ──────────▶ download, recreate dir, parse, persist
//! ```

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use tracing::{debug, info};

use crate::mapping::format::{ArtifactFormat, detect_format};
use crate::mapping::traits::ParseError;
use crate::mapping::types::MappingEntry;
use crate::yarn::cache::{MappingCache, MappingSet};
use crate::yarn::descriptor::VersionDescriptor;
use crate::yarn::error::MappingError;
use crate::yarn::fetcher::ArtifactFetcher;
use crate::yarn::meta::MetaService;
use crate::yarn::store::VersionStore;

/// Product versions are used as directory names, so path-like keys are refused
pub fn is_valid_product_version(product_version: &str) -> bool {
    !product_version.is_empty()
        && product_version != "."
        && product_version != ".."
        && !product_version.contains(['/', '\\'])
}

/// Keeps [`MappingCache`] in sync with the newest remote mapping build
///
/// Refreshes of the same product version are serialized; different
/// product versions refresh independently.
pub struct RefreshCoordinator {
    meta: Arc<dyn MetaService>,
    fetcher: Arc<dyn ArtifactFetcher>,
    store: VersionStore,
    cache: MappingCache,
    check_interval: Duration,
    last_checked: Mutex<HashMap<String, Instant>>,
    locks: Mutex<HashMap<String, Arc<tokio::sync::Mutex<()>>>>,
}

impl RefreshCoordinator {
    pub fn new(
        meta: Arc<dyn MetaService>,
        fetcher: Arc<dyn ArtifactFetcher>,
        store: VersionStore,
        cache: MappingCache,
        check_interval: Duration,
    ) -> Self {
        Self {
            meta,
            fetcher,
            store,
            cache,
            check_interval,
            last_checked: Mutex::new(HashMap::new()),
            locks: Mutex::new(HashMap::new()),
        }
    }

    pub fn cache(&self) -> &MappingCache {
        &self.cache
    }

    pub fn store(&self) -> &VersionStore {
        &self.store
    }

    fn version_lock(&self, product_version: &str) -> Arc<tokio::sync::Mutex<()>> {
        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(locks.entry(product_version.to_string()).or_default())
    }

    fn lock_last_checked(&self) -> MutexGuard<'_, HashMap<String, Instant>> {
        self.last_checked
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn recently_checked(&self, product_version: &str) -> bool {
        self.lock_last_checked()
            .get(product_version)
            .is_some_and(|checked| checked.elapsed() < self.check_interval)
    }

    fn mark_checked(&self, product_version: &str) {
        self.lock_last_checked()
            .insert(product_version.to_string(), Instant::now());
    }

    fn release_version_lock(&self, product_version: &str, lock: Arc<tokio::sync::Mutex<()>>) {
        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        drop(lock);
        // Only the table itself still holds the lock: nobody is refreshing or waiting
        if locks
            .get(product_version)
            .is_some_and(|lock| Arc::strong_count(lock) == 1)
        {
            locks.remove(product_version);
        }
    }

    /// Make sure the cache holds the newest mapping build for a product version
    ///
    /// Returns the snapshot that was found fresh or just loaded.
    ///
    /// Remote checks are skipped for `check_interval` after a successful
    /// check. Errors leave the previous cache entry untouched unless the
    /// failure happened after the artifact directory was recreated.
    pub async fn ensure_fresh(&self, product_version: &str) -> Result<MappingSet, MappingError> {
        if !is_valid_product_version(product_version) {
            return Err(MappingError::NoSuchVersion(product_version.to_string()));
        }

        let lock = self.version_lock(product_version);
        let result = {
            let _guard = lock.lock().await;
            self.refresh_locked(product_version).await
        };
        self.release_version_lock(product_version, lock);
        result
    }

    async fn refresh_locked(&self, product_version: &str) -> Result<MappingSet, MappingError> {
        if self.recently_checked(product_version) {
            if let Some(entries) = self.cache.get(product_version) {
                debug!("Skipping remote check for {}: checked recently", product_version);
                return Ok(entries);
            }
            if let Some(record) = self.store.get(product_version)
                && let Some(entries) = self.reuse_local(product_version, &record).await?
            {
                return Ok(entries);
            }
        }

        let current = self.store.load_persisted(product_version).await?;
        let latest = self
            .meta
            .latest_build(product_version)
            .await?
            .ok_or_else(|| MappingError::NoSuchVersion(product_version.to_string()))?;

        let reused = match &current {
            Some(current) if current.same_build(&latest) => {
                match self.cache.get(product_version) {
                    Some(entries) => {
                        debug!(
                            "Mappings for {} already at build {}",
                            product_version, latest.build
                        );
                        Some(entries)
                    }
                    None => self.reuse_local(product_version, current).await?,
                }
            }
            _ => None,
        };

        let entries = match reused {
            Some(entries) => entries,
            None => self.redownload(product_version, &latest).await?,
        };

        self.mark_checked(product_version);
        Ok(entries)
    }

    /// Parse the artifact already on disk into the cache
    ///
    /// Returns `None` when no artifact for the record is present.
    async fn reuse_local(
        &self,
        product_version: &str,
        record: &VersionDescriptor,
    ) -> Result<Option<MappingSet>, MappingError> {
        let coordinate = record.coordinate()?;
        let dir = self.store.version_dir(product_version);

        let Some((format, path)) = detect_format(&dir, coordinate.artifact, coordinate.version)
        else {
            info!(
                "No artifact on disk for {} build {}",
                product_version, record.build
            );
            return Ok(None);
        };

        info!("Loading {:?} mappings from {:?}", format, path);
        let entries = parse_file(format, path).await?;
        Ok(Some(self.cache.insert(product_version, entries)))
    }

    async fn redownload(
        &self,
        product_version: &str,
        latest: &VersionDescriptor,
    ) -> Result<MappingSet, MappingError> {
        info!(
            "Downloading mappings for {} build {}",
            product_version, latest.build
        );
        let artifact = self.fetcher.fetch(latest).await?;

        self.store.recreate_dir(product_version).await?;
        self.store
            .write_artifact(product_version, &artifact.file_name, &artifact.bytes)
            .await?;

        self.cache.invalidate(product_version);
        let entries = parse_bytes(artifact.format, artifact.bytes).await?;
        self.store.persist(product_version, latest).await?;
        let entries = self.cache.insert(product_version, entries);

        info!(
            "Cached {} mapping entries for {} build {}",
            entries.len(),
            product_version,
            latest.build
        );
        Ok(entries)
    }
}

async fn parse_file(
    format: ArtifactFormat,
    path: PathBuf,
) -> Result<Vec<MappingEntry>, MappingError> {
    let parser = format.parser();
    run_parser(move || parser.parse_file(&path)).await
}

async fn parse_bytes(
    format: ArtifactFormat,
    bytes: Vec<u8>,
) -> Result<Vec<MappingEntry>, MappingError> {
    let parser = format.parser();
    run_parser(move || parser.parse(&bytes)).await
}

async fn run_parser<F>(parse: F) -> Result<Vec<MappingEntry>, MappingError>
where
    F: FnOnce() -> Result<Vec<MappingEntry>, ParseError> + Send + 'static,
{
    let entries = tokio::task::spawn_blocking(parse)
        .await
        .map_err(|e| MappingError::Task(e.to_string()))??;
    Ok(entries)
}
