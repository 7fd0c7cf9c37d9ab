use super::{InstanceLease, InstanceLocks, StoreError, WorkflowStore};
use crate::config::StorageConfig;
use crate::core::{WorkflowDefinition, WorkflowInstance};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashSet;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::sync::Mutex;
use tracing::debug;

/// Entities stored as JSON arrays, keyed by id.
trait Keyed: Serialize + DeserializeOwned + Clone + Send + Sync {
    fn key(&self) -> &str;
}

impl Keyed for WorkflowDefinition {
    fn key(&self) -> &str {
        &self.id
    }
}

impl Keyed for WorkflowInstance {
    fn key(&self) -> &str {
        &self.id
    }
}

/// Store keeping each collection in one pretty-printed JSON file.
///
/// Layout under the data directory:
///
/// ```text
/// data/
///   definitions.json   [ WorkflowDefinition, ... ]
///   instances.json     [ WorkflowInstance, ... ]
/// ```
///
/// A missing file reads as an empty collection. Every save rewrites the
/// whole file through a temporary file and a rename, serialized by an
/// internal lock so concurrent upserts never drop each other's writes.
#[derive(Debug)]
pub struct JsonFileStore {
    definitions_path: PathBuf,
    instances_path: PathBuf,
    write_lock: Mutex<()>,
    locks: InstanceLocks,
}

impl JsonFileStore {
    /// Open the store described by `config`, creating its data directory.
    pub async fn open(config: &StorageConfig) -> Result<Self, StoreError> {
        fs::create_dir_all(&config.data_dir).await?;
        debug!(data_dir = %config.data_dir.display(), "opened json file store");

        Ok(Self {
            definitions_path: config.data_dir.join(&config.definitions_file),
            instances_path: config.data_dir.join(&config.instances_file),
            write_lock: Mutex::new(()),
            locks: InstanceLocks::new(),
        })
    }

    /// Open a store in `dir` with the default file names.
    pub async fn open_dir(dir: impl AsRef<Path>) -> Result<Self, StoreError> {
        let config = StorageConfig {
            data_dir: dir.as_ref().to_path_buf(),
            ..StorageConfig::default()
        };
        Self::open(&config).await
    }

    pub fn definitions_path(&self) -> &Path {
        &self.definitions_path
    }

    pub fn instances_path(&self) -> &Path {
        &self.instances_path
    }

    async fn read_all<T: Keyed>(path: &Path) -> Result<Vec<T>, StoreError> {
        let json = match fs::read_to_string(path).await {
            Ok(json) => json,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(err.into()),
        };

        if json.trim().is_empty() {
            return Ok(Vec::new());
        }

        let items: Vec<T> = serde_json::from_str(&json)?;
        Self::check_keys(path, &items)?;
        debug!(path = %path.display(), count = items.len(), "loaded collection");
        Ok(items)
    }

    /// Every stored entry needs a non-empty id, unique within its file.
    fn check_keys<T: Keyed>(path: &Path, items: &[T]) -> Result<(), StoreError> {
        let mut seen = HashSet::with_capacity(items.len());
        for (index, item) in items.iter().enumerate() {
            if item.key().is_empty() {
                return Err(StoreError::Corrupted {
                    reason: format!("entry {index} in {} has an empty id", path.display()),
                });
            }
            if !seen.insert(item.key()) {
                return Err(StoreError::Corrupted {
                    reason: format!("id '{}' appears twice in {}", item.key(), path.display()),
                });
            }
        }
        Ok(())
    }

    async fn find<T: Keyed>(path: &Path, id: &str) -> Result<Option<T>, StoreError> {
        let items: Vec<T> = Self::read_all(path).await?;
        Ok(items.into_iter().find(|item| item.key() == id))
    }

    async fn upsert<T: Keyed>(&self, path: &Path, item: &T) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().await;

        let mut items: Vec<T> = Self::read_all(path).await?;
        items.retain(|existing| existing.key() != item.key());
        items.push(item.clone());

        let json = serde_json::to_string_pretty(&items)?;
        let staging = path.with_extension("json.tmp");
        fs::write(&staging, json).await?;
        fs::rename(&staging, path).await?;

        debug!(path = %path.display(), id = item.key(), count = items.len(), "saved collection");
        Ok(())
    }
}

#[async_trait]
impl WorkflowStore for JsonFileStore {
    async fn save_definition(&self, definition: &WorkflowDefinition) -> Result<(), StoreError> {
        self.upsert(&self.definitions_path, definition).await
    }

    async fn get_definition(&self, id: &str) -> Result<Option<WorkflowDefinition>, StoreError> {
        Self::find(&self.definitions_path, id).await
    }

    async fn get_all_definitions(&self) -> Result<Vec<WorkflowDefinition>, StoreError> {
        Self::read_all(&self.definitions_path).await
    }

    async fn save_instance(&self, instance: &WorkflowInstance) -> Result<(), StoreError> {
        self.upsert(&self.instances_path, instance).await
    }

    async fn get_instance(&self, id: &str) -> Result<Option<WorkflowInstance>, StoreError> {
        Self::find(&self.instances_path, id).await
    }

    async fn get_all_instances(&self) -> Result<Vec<WorkflowInstance>, StoreError> {
        Self::read_all(&self.instances_path).await
    }

    async fn lock_instance(&self, id: &str) -> InstanceLease {
        self.locks.acquire(id).await
    }
}
