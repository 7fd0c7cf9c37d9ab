//! Action execution rules.

use crate::core::{Action, WorkflowDefinition, WorkflowInstance};
use crate::validation::error::ExecutionError;

/// Authorize firing `action` on `instance`.
///
/// Checks, in order:
///
/// 1. the action is enabled
/// 2. the instance's current state is one of the action's source states
/// 3. the current state exists in `definition` and is not final
///
/// Final states are absorbing: rule 3 rejects them even when an action
/// lists them as a source. Nothing is mutated; this only authorizes.
pub fn validate_action_execution(
    instance: &WorkflowInstance,
    action: &Action,
    definition: &WorkflowDefinition,
) -> Result<(), ExecutionError> {
    if !action.enabled {
        return Err(ExecutionError::ActionDisabled {
            action: action.id.clone(),
        });
    }

    if !action.fires_from(&instance.current_state_id) {
        return Err(ExecutionError::InvalidSourceState {
            action: action.id.clone(),
            state: instance.current_state_id.clone(),
        });
    }

    let current = definition
        .state(&instance.current_state_id)
        .ok_or_else(|| ExecutionError::UnknownCurrentState {
            state: instance.current_state_id.clone(),
            definition: definition.id.clone(),
        })?;

    if current.is_final {
        return Err(ExecutionError::FinalState {
            state: current.id.clone(),
        });
    }

    Ok(())
}

/// Check if `action` may fire on `instance` right now (pure).
pub fn can_execute(
    instance: &WorkflowInstance,
    action: &Action,
    definition: &WorkflowDefinition,
) -> bool {
    validate_action_execution(instance, action, definition).is_ok()
}
