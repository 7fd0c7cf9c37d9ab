//! Creation and lookup of workflow definitions.

use crate::core::WorkflowDefinition;
use crate::error::EngineError;
use crate::service::request::CreateDefinitionRequest;
use crate::store::WorkflowStore;
use crate::validation::validate_definition;
use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Creates and reads workflow definitions.
///
/// Holds nothing but the store; clones share it.
pub struct DefinitionService<S: WorkflowStore + ?Sized> {
    store: Arc<S>,
}

impl<S: WorkflowStore + ?Sized> Clone for DefinitionService<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S: WorkflowStore + ?Sized> DefinitionService<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Validate and persist a new definition.
    ///
    /// The definition gets a fresh id and creation time. Nothing is stored
    /// unless every definition rule holds.
    pub async fn create_definition(
        &self,
        request: CreateDefinitionRequest,
    ) -> Result<WorkflowDefinition, EngineError> {
        let definition = WorkflowDefinition {
            id: Uuid::new_v4().to_string(),
            name: request.name,
            states: request.states,
            actions: request.actions,
            created_at: Utc::now(),
            description: request.description,
        };

        if let Err(err) = validate_definition(&definition) {
            warn!(name = %definition.name, reason = %err, "rejected workflow definition");
            return Err(err.into());
        }

        self.store.save_definition(&definition).await?;
        info!(
            definition_id = %definition.id,
            name = %definition.name,
            states = definition.states.len(),
            actions = definition.actions.len(),
            "created workflow definition"
        );
        Ok(definition)
    }

    /// Fetch one definition; `None` when the id is unknown.
    pub async fn get_definition(&self, id: &str) -> Result<Option<WorkflowDefinition>, EngineError> {
        let definition = self.store.get_definition(id).await?;
        debug!(definition_id = id, found = definition.is_some(), "fetched workflow definition");
        Ok(definition)
    }

    pub async fn get_all_definitions(&self) -> Result<Vec<WorkflowDefinition>, EngineError> {
        let definitions = self.store.get_all_definitions().await?;
        debug!(count = definitions.len(), "listed workflow definitions");
        Ok(definitions)
    }
}
