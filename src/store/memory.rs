use super::{InstanceLease, InstanceLocks, StoreError, WorkflowStore};
use crate::core::{WorkflowDefinition, WorkflowInstance};
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::debug;

/// Process-local store backed by hash maps.
///
/// Nothing survives the process; intended for tests and embedding.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    definitions: RwLock<HashMap<String, WorkflowDefinition>>,
    instances: RwLock<HashMap<String, WorkflowInstance>>,
    locks: InstanceLocks,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl WorkflowStore for InMemoryStore {
    async fn save_definition(&self, definition: &WorkflowDefinition) -> Result<(), StoreError> {
        self.definitions
            .write()
            .await
            .insert(definition.id.clone(), definition.clone());
        debug!(definition_id = %definition.id, "saved definition");
        Ok(())
    }

    async fn get_definition(&self, id: &str) -> Result<Option<WorkflowDefinition>, StoreError> {
        Ok(self.definitions.read().await.get(id).cloned())
    }

    async fn get_all_definitions(&self) -> Result<Vec<WorkflowDefinition>, StoreError> {
        Ok(self.definitions.read().await.values().cloned().collect())
    }

    async fn save_instance(&self, instance: &WorkflowInstance) -> Result<(), StoreError> {
        self.instances
            .write()
            .await
            .insert(instance.id.clone(), instance.clone());
        debug!(instance_id = %instance.id, "saved instance");
        Ok(())
    }

    async fn get_instance(&self, id: &str) -> Result<Option<WorkflowInstance>, StoreError> {
        Ok(self.instances.read().await.get(id).cloned())
    }

    async fn get_all_instances(&self) -> Result<Vec<WorkflowInstance>, StoreError> {
        Ok(self.instances.read().await.values().cloned().collect())
    }

    async fn lock_instance(&self, id: &str) -> InstanceLease {
        self.locks.acquire(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::State;
    use chrono::Utc;

    fn definition(id: &str, name: &str) -> WorkflowDefinition {
        WorkflowDefinition {
            id: id.to_string(),
            name: name.to_string(),
            states: vec![State::new("A", "A").initial()],
            actions: vec![],
            created_at: Utc::now(),
            description: None,
        }
    }

    #[tokio::test]
    async fn missing_ids_are_none() {
        let store = InMemoryStore::new();

        assert!(store.get_definition("nope").await.unwrap().is_none());
        assert!(store.get_instance("nope").await.unwrap().is_none());
        assert!(store.get_all_definitions().await.unwrap().is_empty());
        assert!(store.get_all_instances().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn save_is_an_upsert() {
        let store = InMemoryStore::new();
        store.save_definition(&definition("d-1", "First")).await.unwrap();
        store.save_definition(&definition("d-1", "Renamed")).await.unwrap();
        store.save_definition(&definition("d-2", "Second")).await.unwrap();

        assert_eq!(store.get_all_definitions().await.unwrap().len(), 2);
        assert_eq!(
            store.get_definition("d-1").await.unwrap().unwrap().name,
            "Renamed"
        );
    }

    #[tokio::test]
    async fn instances_round_trip() {
        let store = InMemoryStore::new();
        let instance = WorkflowInstance::start("d-1", "A");
        store.save_instance(&instance).await.unwrap();

        assert_eq!(
            store.get_instance(&instance.id).await.unwrap(),
            Some(instance)
        );
    }
}
