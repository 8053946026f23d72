use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Locations of everything the application keeps on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DataPaths {
    pub data_dir: PathBuf,
    pub logs_dir: PathBuf,
}

impl DataPaths {
    /// All files under one root, logs in `<root>/logs`.
    pub fn under(root: &Path) -> Self {
        Self {
            data_dir: root.to_path_buf(),
            logs_dir: root.join("logs"),
        }
    }

    pub fn config_path(&self) -> PathBuf {
        self.data_dir.join("config.toml")
    }

    /// Path of the key-value storage file named in the config.
    pub fn storage_path(&self, storage: &StorageConfig) -> PathBuf {
        self.data_dir.join(&storage.file_name)
    }
}

/// Default GraphQL endpoint serving the product catalog.
pub const DEFAULT_CATALOG_ENDPOINT: &str = "https://pangaea-interviews.now.sh/api/graphql";

/// Cart persistence configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Key of the slot holding the serialized cart.
    pub cart_key: String,
    /// File (inside the data directory) backing the key-value store.
    pub file_name: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            cart_key: "pangae-lumia-user-cart".to_string(),
            file_name: "storage.json".to_string(),
        }
    }
}

/// Product catalog configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// GraphQL endpoint URL.
    pub endpoint: String,
    /// Currency used for prices until the user picks another one.
    pub default_currency: String,
    /// When true, all network requests are blocked.
    pub offline: bool,
    /// Hosts the HTTP gateway may contact.
    pub allowed_domains: Vec<String>,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_CATALOG_ENDPOINT.to_string(),
            default_currency: "USD".to_string(),
            offline: false,
            allowed_domains: Self::default_allowed_domains(),
            timeout_secs: 30,
        }
    }
}

impl CatalogConfig {
    /// The default endpoint's host is the only domain allowed out of the box.
    pub fn default_allowed_domains() -> Vec<String> {
        vec!["pangaea-interviews.now.sh".to_string()]
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: "trace", "debug", "info", "warn", "error".
    pub level: String,
    /// Enable file logging with rotation.
    pub file_logging: bool,
    /// Maximum number of log files to keep.
    pub max_files: u32,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file_logging: true,
            max_files: 7,
        }
    }
}

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub storage: StorageConfig,
    pub catalog: CatalogConfig,
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Create a new AppConfig with default values.
    pub fn new() -> Self {
        Self::default()
    }
}
