//! Engine configuration.
//!
//! Values are layered: built-in defaults, then an optional TOML file, then
//! environment variables prefixed with `WORKFLOW_ENGINE` using `__` as the
//! section separator (for example `WORKFLOW_ENGINE__STORAGE__DATA_DIR=/var/lib/flows`).

use crate::store::{InMemoryStore, JsonFileStore, StoreError, WorkflowStore};
use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub const ENV_PREFIX: &str = "WORKFLOW_ENGINE";

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct EngineConfig {
    pub storage: StorageConfig,
    pub logging: LoggingConfig,
}

/// Which store backs the services
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Memory,
    #[default]
    File,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    /// Directory holding the JSON collections (file backend only)
    pub data_dir: PathBuf,
    pub definitions_file: String,
    pub instances_file: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::File,
            data_dir: PathBuf::from("data"),
            definitions_file: "definitions.json".to_string(),
            instances_file: "instances.json".to_string(),
        }
    }
}

impl StorageConfig {
    /// Build the configured store.
    pub async fn open_store(&self) -> Result<Arc<dyn WorkflowStore>, StoreError> {
        let store: Arc<dyn WorkflowStore> = match self.backend {
            StorageBackend::Memory => Arc::new(InMemoryStore::new()),
            StorageBackend::File => Arc::new(JsonFileStore::open(self).await?),
        };
        Ok(store)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter directive; `RUST_LOG` takes precedence when set
    pub level: String,
    /// Emit JSON lines instead of human readable output
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

impl EngineConfig {
    /// Load configuration from defaults, `path` (if given) and the environment.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();

        if let Some(path) = path {
            builder = builder.add_source(File::from(path));
        }

        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );

        builder.build()?.try_deserialize()
    }
}
