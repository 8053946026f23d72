use std::sync::Arc;

use crate::domain::{AppConfig, DataPaths, DomainError};

/// Port for a durable, synchronous key-value store holding serialized state.
///
/// Both calls block until the underlying medium has been read or written.
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`, or `None` if the slot is empty.
    fn read(&self, key: &str) -> Result<Option<String>, DomainError>;

    /// Store `value` under `key`, replacing any previous value.
    fn write(&self, key: &str, value: &str) -> Result<(), DomainError>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for Arc<T> {
    fn read(&self, key: &str) -> Result<Option<String>, DomainError> {
        (**self).read(key)
    }

    fn write(&self, key: &str, value: &str) -> Result<(), DomainError> {
        (**self).write(key, value)
    }
}

/// Port for loading and saving the application configuration.
pub trait ConfigStore: Send + Sync {
    /// Load the configuration, writing defaults first if none exists.
    fn load(&self) -> Result<AppConfig, DomainError>;

    /// Persist the configuration.
    fn save(&self, config: &AppConfig) -> Result<(), DomainError>;

    /// Where configuration, storage and logs live.
    fn paths(&self) -> &DataPaths;
}
