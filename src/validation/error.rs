//! Rule violations reported by the validator.

use thiserror::Error;

/// A definition is not a well-formed state machine.
///
/// One variant per rule, in the order the rules are checked.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DefinitionError {
    #[error("Definition name is required")]
    MissingName,

    #[error("Definition must have at least one state")]
    NoStates,

    #[error("Duplicate state IDs found: '{id}'")]
    DuplicateStateId { id: String },

    #[error("Duplicate action IDs found: '{id}'")]
    DuplicateActionId { id: String },

    #[error("Definition must have exactly one initial state (found {found})")]
    InitialStateCount { found: usize },

    #[error("Action '{action}' references unknown target state '{state}'")]
    UnknownTargetState { action: String, state: String },

    #[error("Action '{action}' references unknown source state '{state}'")]
    UnknownSourceState { action: String, state: String },
}

/// An action may not fire from the instance's current position.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ExecutionError {
    #[error("Action '{action}' is disabled")]
    ActionDisabled { action: String },

    #[error("Action '{action}' cannot be executed from current state '{state}'")]
    InvalidSourceState { action: String, state: String },

    #[error("Current state '{state}' does not exist in workflow definition '{definition}'")]
    UnknownCurrentState { state: String, definition: String },

    #[error("Cannot execute actions on final state '{state}'")]
    FinalState { state: String },
}
