//! Workflow instances: one running execution of a definition.

use super::history::History;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single execution of a workflow definition.
///
/// The instance refers to its definition by id only. It is mutated
/// exclusively by action execution, which moves `current_state_id`, appends
/// to `history` and, on reaching a final state, sets `completed_at` once.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowInstance {
    pub id: String,
    pub definition_id: String,
    pub current_state_id: String,
    #[serde(default)]
    pub history: History,
    pub started_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

impl WorkflowInstance {
    /// Create an instance positioned at `initial_state_id`, with an empty
    /// history and a fresh id.
    pub fn start(definition_id: impl Into<String>, initial_state_id: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            definition_id: definition_id.into(),
            current_state_id: initial_state_id.into(),
            history: History::new(),
            started_at: Utc::now(),
            completed_at: None,
        }
    }

    /// Whether the instance has reached a final state.
    pub fn is_completed(&self) -> bool {
        self.completed_at.is_some()
    }
}
