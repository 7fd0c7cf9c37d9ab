//! Errors returned by the engine's services.

use crate::store::StoreError;
use crate::validation::{DefinitionError, ExecutionError};
use thiserror::Error;

/// A rejected request.
///
/// Caller-recoverable: it never leaves a mutated or partially persisted
/// entity behind. `Display` is the human-readable reason.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error(transparent)]
    Definition(#[from] DefinitionError),

    #[error(transparent)]
    Execution(#[from] ExecutionError),

    #[error("Workflow definition '{0}' not found")]
    DefinitionNotFound(String),

    #[error("Workflow instance '{0}' not found")]
    InstanceNotFound(String),

    #[error("Action '{action}' not found in workflow definition")]
    ActionNotFound { action: String, definition: String },
}

/// Errors that can occur while running a service operation.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The request was rejected; nothing was persisted.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The persistence collaborator failed. Opaque to the engine.
    #[error("Store failure: {0}")]
    Store(#[from] StoreError),
}

impl EngineError {
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Whether the request referenced an entity that does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::Validation(
                ValidationError::DefinitionNotFound(_)
                    | ValidationError::InstanceNotFound(_)
                    | ValidationError::ActionNotFound { .. }
            )
        )
    }

    pub fn as_validation(&self) -> Option<&ValidationError> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Store(_) => None,
        }
    }
}

impl From<DefinitionError> for EngineError {
    fn from(err: DefinitionError) -> Self {
        Self::Validation(err.into())
    }
}

impl From<ExecutionError> for EngineError {
    fn from(err: ExecutionError) -> Self {
        Self::Validation(err.into())
    }
}
