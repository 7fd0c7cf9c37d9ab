//! States and actions: the vocabulary of a workflow definition.
//!
//! Both are plain values identified by string ids that are unique within
//! their owning definition. Actions refer to states by id, never by pointer,
//! so definitions stay independently serializable.

use serde::{Deserialize, Serialize};

fn enabled_by_default() -> bool {
    true
}

/// A named position in a workflow.
///
/// # Example
///
/// ```rust
/// use waymark::core::State;
///
/// let draft = State::new("draft", "Draft").initial();
/// let published = State::new("published", "Published").final_state();
///
/// assert!(draft.is_initial);
/// assert!(!draft.is_final);
/// assert!(published.is_final);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct State {
    /// Identifier, unique within the owning definition
    pub id: String,
    /// Human readable name
    pub name: String,
    /// Entry point for new instances (exactly one per definition)
    #[serde(default)]
    pub is_initial: bool,
    /// Absorbing state: no action may fire from here
    #[serde(default)]
    pub is_final: bool,
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl State {
    /// Create an enabled, non-initial, non-final state.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            is_initial: false,
            is_final: false,
            enabled: true,
            description: None,
        }
    }

    /// Mark this state as the definition's entry point.
    pub fn initial(mut self) -> Self {
        self.is_initial = true;
        self
    }

    /// Mark this state as terminal.
    pub fn final_state(mut self) -> Self {
        self.is_final = true;
        self
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// A named transition rule: fires from any of `from_states` and always
/// lands on `to_state`.
///
/// # Example
///
/// ```rust
/// use waymark::core::Action;
///
/// let reopen = Action::new("reopen", "Reopen", ["closed", "rejected"], "open");
///
/// assert!(reopen.fires_from("closed"));
/// assert!(!reopen.fires_from("open"));
/// assert_eq!(reopen.to_state, "open");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Action {
    /// Identifier, unique within the owning definition
    pub id: String,
    pub name: String,
    /// Disabled actions can never fire
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
    /// State ids this action may fire from
    #[serde(default)]
    pub from_states: Vec<String>,
    /// Target state id
    pub to_state: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Action {
    /// Create an enabled action.
    pub fn new<I, F>(
        id: impl Into<String>,
        name: impl Into<String>,
        from_states: I,
        to_state: impl Into<String>,
    ) -> Self
    where
        I: IntoIterator<Item = F>,
        F: Into<String>,
    {
        Self {
            id: id.into(),
            name: name.into(),
            enabled: true,
            from_states: from_states.into_iter().map(Into::into).collect(),
            to_state: to_state.into(),
            description: None,
        }
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Check whether `state_id` is one of this action's source states (pure).
    pub fn fires_from(&self, state_id: &str) -> bool {
        self.from_states.iter().any(|s| s == state_id)
    }
}
