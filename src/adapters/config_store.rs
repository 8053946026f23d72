use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::domain::{AppConfig, DataPaths, DomainError};
use crate::ports::ConfigStore;

const APP_DIR_NAME: &str = "Storefront";

/// TOML-based configuration store with OS-specific paths.
pub struct TomlConfigStore {
    paths: DataPaths,
}

impl TomlConfigStore {
    /// Create a store rooted in the OS application data directory.
    pub fn new() -> Result<Self, DomainError> {
        let data_dir = Self::get_data_dir()?;
        let logs_dir = Self::get_logs_dir(&data_dir);
        Self::with_paths(DataPaths { data_dir, logs_dir })
    }

    /// Create a store with every file under `root`.
    pub fn at(root: &Path) -> Result<Self, DomainError> {
        Self::with_paths(DataPaths::under(root))
    }

    fn with_paths(paths: DataPaths) -> Result<Self, DomainError> {
        fs::create_dir_all(&paths.data_dir)?;

        info!(data_dir = ?paths.data_dir, "ConfigStore initialized");

        Ok(Self { paths })
    }

    /// Get the OS-specific application data directory.
    /// - macOS: ~/Library/Application Support/Storefront/
    /// - Windows: %APPDATA%\Storefront\
    /// - Linux: ~/.config/Storefront/
    fn get_data_dir() -> Result<PathBuf, DomainError> {
        #[cfg(target_os = "macos")]
        let base = dirs::data_dir();

        #[cfg(not(target_os = "macos"))]
        let base = dirs::config_dir();

        base.map(|p| p.join(APP_DIR_NAME)).ok_or_else(|| {
            DomainError::Config("Could not find application data directory".to_string())
        })
    }

    /// Get the OS-specific log directory.
    /// - macOS: ~/Library/Application Support/Storefront/logs/
    /// - Windows: %LOCALAPPDATA%\Storefront\logs\
    /// - Linux: ~/.local/share/Storefront/logs/
    fn get_logs_dir(data_dir: &Path) -> PathBuf {
        #[cfg(target_os = "windows")]
        let base = dirs::data_local_dir();

        #[cfg(target_os = "linux")]
        let base = dirs::data_dir();

        #[cfg(not(any(target_os = "windows", target_os = "linux")))]
        let base: Option<PathBuf> = None;

        base.map(|p| p.join(APP_DIR_NAME).join("logs"))
            .unwrap_or_else(|| data_dir.join("logs"))
    }
}

impl ConfigStore for TomlConfigStore {
    fn load(&self) -> Result<AppConfig, DomainError> {
        let config_path = self.paths.config_path();

        if config_path.exists() {
            debug!(path = ?config_path, "Loading configuration");
            let content = fs::read_to_string(&config_path)?;
            let config: AppConfig = toml::from_str(&content)?;
            info!(path = ?config_path, "Configuration loaded");
            Ok(config)
        } else {
            info!(path = ?config_path, "Configuration file not found, creating default");
            let config = AppConfig::new();
            self.save(&config)?;
            Ok(config)
        }
    }

    fn save(&self, config: &AppConfig) -> Result<(), DomainError> {
        let config_path = self.paths.config_path();

        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(config)?;
        fs::write(&config_path, content)?;

        info!(path = ?config_path, "Configuration saved");
        Ok(())
    }

    fn paths(&self) -> &DataPaths {
        &self.paths
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_store_paths() {
        let dir = tempfile::tempdir().unwrap();
        let store = TomlConfigStore::at(dir.path()).unwrap();

        assert!(store.paths().config_path().ends_with("config.toml"));
        assert_eq!(store.paths().logs_dir, dir.path().join("logs"));
    }

    #[test]
    fn test_load_creates_default_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = TomlConfigStore::at(dir.path()).unwrap();

        let config = store.load().unwrap();
        assert_eq!(config.catalog.default_currency, "USD");
        assert!(store.paths().config_path().exists());
    }

    #[test]
    fn test_config_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let store = TomlConfigStore::at(dir.path()).unwrap();

        let mut config = AppConfig::new();
        config.catalog.offline = true;
        config.catalog.default_currency = "GBP".to_string();
        config.storage.cart_key = "my-cart".to_string();
        config.logging.level = "debug".to_string();

        store.save(&config).unwrap();

        let loaded = store.load().unwrap();
        assert!(loaded.catalog.offline);
        assert_eq!(loaded.catalog.default_currency, "GBP");
        assert_eq!(loaded.storage.cart_key, "my-cart");
        assert_eq!(loaded.logging.level, "debug");
    }

    #[test]
    fn test_malformed_config_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = TomlConfigStore::at(dir.path()).unwrap();
        fs::write(store.paths().config_path(), "catalog = [").unwrap();

        assert!(matches!(store.load(), Err(DomainError::Config(_))));
    }
}
