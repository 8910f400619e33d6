//! Per product version on-disk state: the `.dataversion` record and artifact directory

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::{debug, info};

use crate::yarn::descriptor::VersionDescriptor;
use crate::yarn::error::StoreError;

/// Name of the persisted version record inside a version directory
pub const DATA_VERSION_FILE: &str = ".dataversion";

/// Tracks which mapping build is on disk for each product version
///
/// The in-memory records mirror `<root>/<version>/.dataversion` and must only
/// describe artifacts that actually exist on disk.
pub struct VersionStore {
    root: PathBuf,
    records: Mutex<HashMap<String, VersionDescriptor>>,
}

impl VersionStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            records: Mutex::new(HashMap::new()),
        }
    }

    fn lock_records(&self) -> MutexGuard<'_, HashMap<String, VersionDescriptor>> {
        self.records.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Directory holding the artifact and record for a product version
    pub fn version_dir(&self, product_version: &str) -> PathBuf {
        self.root.join(product_version)
    }

    fn record_path(&self, product_version: &str) -> PathBuf {
        self.version_dir(product_version).join(DATA_VERSION_FILE)
    }

    /// In-memory record for a product version
    pub fn get(&self, product_version: &str) -> Option<VersionDescriptor> {
        self.lock_records().get(product_version).cloned()
    }

    /// Drop the in-memory record (the persisted file is left alone)
    pub fn forget(&self, product_version: &str) {
        self.lock_records().remove(product_version);
    }

    /// Load the persisted record into memory if none is held yet
    ///
    /// Returns the record now held in memory, if any.
    pub async fn load_persisted(
        &self,
        product_version: &str,
    ) -> Result<Option<VersionDescriptor>, StoreError> {
        if let Some(record) = self.get(product_version) {
            return Ok(Some(record));
        }

        let path = self.record_path(product_version);
        let contents = match tokio::fs::read_to_string(&path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(StoreError::io(&path)(e)),
        };

        let record: VersionDescriptor = serde_json::from_str(&contents)?;
        debug!(
            "Loaded persisted build {} for {}",
            record.build, product_version
        );
        self.lock_records()
            .insert(product_version.to_string(), record.clone());
        Ok(Some(record))
    }

    /// Replace the persisted record and the in-memory record
    pub async fn persist(
        &self,
        product_version: &str,
        record: &VersionDescriptor,
    ) -> Result<(), StoreError> {
        let path = self.record_path(product_version);
        let contents = serde_json::to_string_pretty(record)?;

        match tokio::fs::remove_file(&path).await {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(StoreError::io(&path)(e)),
        }
        tokio::fs::write(&path, contents)
            .await
            .map_err(StoreError::io(&path))?;

        self.lock_records()
            .insert(product_version.to_string(), record.clone());
        debug!("Persisted build {} for {}", record.build, product_version);
        Ok(())
    }

    /// Delete and recreate the version directory
    ///
    /// Also drops the in-memory record, since the artifact it described is gone.
    pub async fn recreate_dir(&self, product_version: &str) -> Result<PathBuf, StoreError> {
        let dir = self.version_dir(product_version);
        self.forget(product_version);

        match tokio::fs::remove_dir_all(&dir).await {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(StoreError::io(&dir)(e)),
        }
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(StoreError::io(&dir))?;

        info!("Recreated mapping directory {:?}", dir);
        Ok(dir)
    }

    /// Write artifact bytes into the version directory
    pub async fn write_artifact(
        &self,
        product_version: &str,
        file_name: &str,
        bytes: &[u8],
    ) -> Result<PathBuf, StoreError> {
        let path = self.version_dir(product_version).join(file_name);
        tokio::fs::write(&path, bytes)
            .await
            .map_err(StoreError::io(&path))?;
        Ok(path)
    }
}
