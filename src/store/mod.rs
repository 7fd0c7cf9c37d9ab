//! Persistence collaborator for definitions and instances.
//!
//! The engine only talks to storage through [`WorkflowStore`]. Fetching a
//! missing id yields `Ok(None)`, never an error; saving is an upsert keyed
//! by the entity id.
//!
//! Concurrent action executions against one instance are a
//! read-modify-write race. Stores serialize them per instance id through
//! [`WorkflowStore::lock_instance`]; the returned [`InstanceLease`] must be
//! held from the load until the save.

mod file;
mod memory;

pub use file::JsonFileStore;
pub use memory::InMemoryStore;

use crate::core::{WorkflowDefinition, WorkflowInstance};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use thiserror::Error;
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

/// Errors that can occur during persistence operations
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Stored data is corrupted: {reason}")]
    Corrupted { reason: String },
}

/// Storage for workflow definitions and instances.
#[async_trait]
pub trait WorkflowStore: Send + Sync {
    /// Insert the definition, replacing any stored one with the same id.
    async fn save_definition(&self, definition: &WorkflowDefinition) -> Result<(), StoreError>;

    async fn get_definition(&self, id: &str) -> Result<Option<WorkflowDefinition>, StoreError>;

    /// Every stored definition. Order carries no meaning.
    async fn get_all_definitions(&self) -> Result<Vec<WorkflowDefinition>, StoreError>;

    /// Insert the instance, replacing any stored one with the same id.
    async fn save_instance(&self, instance: &WorkflowInstance) -> Result<(), StoreError>;

    async fn get_instance(&self, id: &str) -> Result<Option<WorkflowInstance>, StoreError>;

    /// Every stored instance. Order carries no meaning.
    async fn get_all_instances(&self) -> Result<Vec<WorkflowInstance>, StoreError>;

    /// Acquire exclusive write access to one instance id.
    ///
    /// Waits until no other lease for the same id is alive.
    async fn lock_instance(&self, id: &str) -> InstanceLease;
}

/// Exclusive access to one instance id, released on drop.
#[derive(Debug)]
pub struct InstanceLease {
    _guard: OwnedMutexGuard<()>,
}

/// Per-instance-id async locks shared by the bundled stores.
#[derive(Debug, Default)]
pub struct InstanceLocks {
    locks: Mutex<HashMap<String, Arc<AsyncMutex<()>>>>,
}

impl InstanceLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for and take the lock of `id`.
    pub async fn acquire(&self, id: &str) -> InstanceLease {
        let lock = {
            let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
            // Drop locks nobody holds or waits on.
            locks.retain(|_, lock| Arc::strong_count(lock) > 1);
            Arc::clone(locks.entry(id.to_string()).or_default())
        };

        InstanceLease {
            _guard: lock.lock_owned().await,
        }
    }

    /// Number of ids currently tracked.
    pub fn tracked(&self) -> usize {
        self.locks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn lease_blocks_same_id() {
        let locks = Arc::new(InstanceLocks::new());
        let lease = locks.acquire("i-1").await;

        let contender = {
            let locks = Arc::clone(&locks);
            tokio::spawn(async move {
                let _lease = locks.acquire("i-1").await;
            })
        };

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!contender.is_finished());

        drop(lease);
        tokio::time::timeout(Duration::from_secs(1), contender)
            .await
            .expect("contender should get the lease")
            .unwrap();
    }

    #[tokio::test]
    async fn different_ids_do_not_contend() {
        let locks = InstanceLocks::new();
        let _a = locks.acquire("i-1").await;

        let b = tokio::time::timeout(Duration::from_secs(1), locks.acquire("i-2")).await;
        assert!(b.is_ok());
    }

    #[tokio::test]
    async fn released_locks_are_pruned() {
        let locks = InstanceLocks::new();
        drop(locks.acquire("i-1").await);
        drop(locks.acquire("i-2").await);

        // The second acquire pruned i-1; after it is released only i-2 remains.
        assert_eq!(locks.tracked(), 1);

        let _held = locks.acquire("i-3").await;
        assert_eq!(locks.tracked(), 1);
    }
}
