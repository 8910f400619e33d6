use serde::Deserialize;
use std::path::{Path, PathBuf};

// =============================================================================
// Time-related constants
// =============================================================================

/// Default lifetime of a parsed mapping set in milliseconds (4 hours)
pub const DEFAULT_CACHE_TTL_MS: u64 = 4 * 60 * 60 * 1000;

/// Default minimum time between remote build checks in milliseconds (4 hours)
pub const DEFAULT_CHECK_INTERVAL_MS: u64 = 4 * 60 * 60 * 1000;

// =============================================================================
// Endpoints
// =============================================================================

pub const DEFAULT_META_URL: &str = "https://meta.fabricmc.net/v1";

pub const DEFAULT_MAVEN_URL: &str = "https://maven.fabricmc.net";

pub const USER_AGENT: &str = "yarn-mappings";

/// Top-level configuration structure
#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct MappingsConfig {
    pub cache: CacheConfig,
    pub endpoints: EndpointsConfig,
    /// Overrides the data directory returned by [`data_dir`]
    pub data_dir: Option<PathBuf>,
}

/// Cache-related configuration
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct CacheConfig {
    /// Lifetime of a parsed mapping set in milliseconds
    pub ttl: u64,
    /// Minimum time between remote build checks in milliseconds
    pub check_interval: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: DEFAULT_CACHE_TTL_MS,
            check_interval: DEFAULT_CHECK_INTERVAL_MS,
        }
    }
}

/// Remote service locations
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct EndpointsConfig {
    pub meta_url: String,
    pub maven_url: String,
}

impl Default for EndpointsConfig {
    fn default() -> Self {
        Self {
            meta_url: DEFAULT_META_URL.to_string(),
            maven_url: DEFAULT_MAVEN_URL.to_string(),
        }
    }
}

impl MappingsConfig {
    /// Load configuration from a JSON file
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }

    /// Data directory honoring the `dataDir` override
    pub fn data_dir(&self) -> PathBuf {
        self.data_dir.clone().unwrap_or_else(data_dir)
    }

    /// Root directory of the per-version mapping folders
    pub fn mappings_dir(&self) -> PathBuf {
        self.data_dir().join("yarn")
    }
}

/// Returns the path to the data directory for yarn-mappings.
/// Uses $XDG_DATA_HOME/yarn-mappings if XDG_DATA_HOME is set,
/// otherwise falls back to ~/.local/share/yarn-mappings,
/// or ./yarn-mappings if neither is available.
pub fn data_dir() -> PathBuf {
    data_dir_with_env(std::env::var("XDG_DATA_HOME").ok(), dirs::home_dir())
}

/// Returns the path to the log file.
pub fn log_path(data_dir: &Path) -> PathBuf {
    data_dir.join("yarn-mappings.log")
}

fn data_dir_with_env(xdg_data_home: Option<String>, home_dir: Option<PathBuf>) -> PathBuf {
    let data_dir = xdg_data_home
        .map(PathBuf::from)
        .or_else(|| home_dir.map(|home| home.join(".local/share")))
        .unwrap_or_else(|| PathBuf::from("."));

    data_dir.join("yarn-mappings")
}
