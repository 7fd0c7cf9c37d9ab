//! Workflow instances and action execution.

use crate::core::{Action, ActionHistory, WorkflowDefinition, WorkflowInstance};
use crate::error::{EngineError, ValidationError};
use crate::store::WorkflowStore;
use crate::validation::{can_execute, validate_action_execution, DefinitionError};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Starts workflow instances and drives them through their definition.
///
/// States of the definition are the machine's states, its enabled actions
/// the alphabet, and each `(from, action)` pair maps to the action's single
/// target. Final states are absorbing.
pub struct InstanceService<S: WorkflowStore + ?Sized> {
    store: Arc<S>,
}

impl<S: WorkflowStore + ?Sized> Clone for InstanceService<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S: WorkflowStore + ?Sized> InstanceService<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Start a new instance at the definition's initial state.
    pub async fn start_instance(&self, definition_id: &str) -> Result<WorkflowInstance, EngineError> {
        let definition = self.require_definition(definition_id).await?;

        // Persisted definitions were validated, so this only trips on a
        // store edited behind the engine's back.
        let initial = definition
            .initial_state()
            .ok_or(DefinitionError::InitialStateCount { found: 0 })?;

        let instance = WorkflowInstance::start(&definition.id, &initial.id);
        self.store.save_instance(&instance).await?;

        info!(
            instance_id = %instance.id,
            definition_id = %definition.id,
            state = %instance.current_state_id,
            "started workflow instance"
        );
        Ok(instance)
    }

    /// Fire `action_id` on the instance and persist the result.
    ///
    /// Rejections leave the stored instance untouched. The instance id is
    /// leased from the store for the whole load, mutate and save sequence.
    pub async fn execute_action(
        &self,
        instance_id: &str,
        action_id: &str,
    ) -> Result<WorkflowInstance, EngineError> {
        let _lease = self.store.lock_instance(instance_id).await;

        let mut instance = self.require_instance(instance_id).await?;
        let definition = self.require_definition(&instance.definition_id).await?;
        let action = definition
            .action(action_id)
            .ok_or_else(|| ValidationError::ActionNotFound {
                action: action_id.to_string(),
                definition: definition.id.clone(),
            })?;

        if let Err(err) = validate_action_execution(&instance, action, &definition) {
            warn!(
                instance_id,
                action_id,
                state = %instance.current_state_id,
                reason = %err,
                "rejected action"
            );
            return Err(err.into());
        }

        let from = instance.current_state_id.clone();
        let completed = fire(&mut instance, action, &definition, Utc::now());
        self.store.save_instance(&instance).await?;

        info!(
            instance_id,
            action_id,
            from = %from,
            to = %instance.current_state_id,
            "executed action"
        );
        if completed {
            info!(instance_id, state = %instance.current_state_id, "workflow instance completed");
        }
        Ok(instance)
    }

    /// Actions that would currently be accepted for the instance, in
    /// definition order. Empty once the instance has completed.
    pub async fn available_actions(&self, instance_id: &str) -> Result<Vec<Action>, EngineError> {
        let instance = self.require_instance(instance_id).await?;
        let definition = self.require_definition(&instance.definition_id).await?;

        Ok(definition
            .actions_from(&instance.current_state_id)
            .filter(|action| can_execute(&instance, action, &definition))
            .cloned()
            .collect())
    }

    /// Fetch one instance; `None` when the id is unknown.
    pub async fn get_instance(&self, id: &str) -> Result<Option<WorkflowInstance>, EngineError> {
        let instance = self.store.get_instance(id).await?;
        debug!(instance_id = id, found = instance.is_some(), "fetched workflow instance");
        Ok(instance)
    }

    pub async fn get_all_instances(&self) -> Result<Vec<WorkflowInstance>, EngineError> {
        let instances = self.store.get_all_instances().await?;
        debug!(count = instances.len(), "listed workflow instances");
        Ok(instances)
    }

    async fn require_instance(&self, id: &str) -> Result<WorkflowInstance, EngineError> {
        self.store
            .get_instance(id)
            .await?
            .ok_or_else(|| ValidationError::InstanceNotFound(id.to_string()).into())
    }

    async fn require_definition(&self, id: &str) -> Result<WorkflowDefinition, EngineError> {
        self.store
            .get_definition(id)
            .await?
            .ok_or_else(|| ValidationError::DefinitionNotFound(id.to_string()).into())
    }
}

/// Apply an authorized action to `instance`.
///
/// Moves the instance to the action's target, appends one history record
/// and stamps `completed_at` the first time a final state is reached.
/// Returns whether this call completed the instance.
fn fire(
    instance: &mut WorkflowInstance,
    action: &Action,
    definition: &WorkflowDefinition,
    now: DateTime<Utc>,
) -> bool {
    let previous = std::mem::replace(&mut instance.current_state_id, action.to_state.clone());
    instance.history.record(ActionHistory {
        action_id: action.id.clone(),
        from_state_id: previous,
        to_state_id: action.to_state.clone(),
        executed_at: now,
    });

    let reached_final = definition
        .state(&instance.current_state_id)
        .is_some_and(|state| state.is_final);

    if reached_final && instance.completed_at.is_none() {
        instance.completed_at = Some(now);
        return true;
    }
    false
}
