//! Builder for definition creation requests.

use crate::core::{Action, State};
use crate::service::CreateDefinitionRequest;

/// Fluent construction of a [`CreateDefinitionRequest`].
///
/// States and actions keep the order they are added in. The builder does
/// not validate; the definition service does that on creation.
#[derive(Clone, Debug, Default)]
pub struct DefinitionBuilder {
    name: String,
    description: Option<String>,
    states: Vec<State>,
    actions: Vec<Action>,
}

impl DefinitionBuilder {
    /// Create a new builder for a definition called `name`.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Add an ordinary state.
    pub fn state(self, id: impl Into<String>, name: impl Into<String>) -> Self {
        self.with_state(State::new(id, name))
    }

    /// Add the entry state.
    pub fn initial_state(self, id: impl Into<String>, name: impl Into<String>) -> Self {
        self.with_state(State::new(id, name).initial())
    }

    /// Add a terminal state.
    pub fn final_state(self, id: impl Into<String>, name: impl Into<String>) -> Self {
        self.with_state(State::new(id, name).final_state())
    }

    /// Add a pre-built state.
    pub fn with_state(mut self, state: State) -> Self {
        self.states.push(state);
        self
    }

    /// Add an enabled action.
    pub fn action<I, F>(
        self,
        id: impl Into<String>,
        name: impl Into<String>,
        from_states: I,
        to_state: impl Into<String>,
    ) -> Self
    where
        I: IntoIterator<Item = F>,
        F: Into<String>,
    {
        self.with_action(Action::new(id, name, from_states, to_state))
    }

    /// Add a pre-built action.
    pub fn with_action(mut self, action: Action) -> Self {
        self.actions.push(action);
        self
    }

    pub fn build(self) -> CreateDefinitionRequest {
        CreateDefinitionRequest {
            name: self.name,
            states: self.states,
            actions: self.actions,
            description: self.description,
        }
    }
}
