//! Workflow definitions: the template instances are started from.

use super::state::{Action, State};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A named set of states and the actions that move between them.
///
/// A definition owns its states and actions. It is validated once, when it
/// is created, and read-only afterwards.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowDefinition {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub states: Vec<State>,
    #[serde(default)]
    pub actions: Vec<Action>,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl WorkflowDefinition {
    /// Look up a state by id.
    pub fn state(&self, id: &str) -> Option<&State> {
        self.states.iter().find(|s| s.id == id)
    }

    /// Look up an action by id.
    pub fn action(&self, id: &str) -> Option<&Action> {
        self.actions.iter().find(|a| a.id == id)
    }

    /// The first state flagged as initial.
    ///
    /// For a validated definition this is the unique entry point.
    pub fn initial_state(&self) -> Option<&State> {
        self.states.iter().find(|s| s.is_initial)
    }

    pub fn final_states(&self) -> impl Iterator<Item = &State> {
        self.states.iter().filter(|s| s.is_final)
    }

    /// Enabled actions listing `state_id` as a source, in definition order.
    ///
    /// Does not consider whether `state_id` itself is final.
    pub fn actions_from<'a>(&'a self, state_id: &'a str) -> impl Iterator<Item = &'a Action> {
        self.actions
            .iter()
            .filter(move |a| a.enabled && a.fires_from(state_id))
    }
}
