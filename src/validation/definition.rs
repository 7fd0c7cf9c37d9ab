//! Definition well-formedness rules.

use crate::core::WorkflowDefinition;
use crate::validation::error::DefinitionError;
use std::collections::HashSet;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;

type Rule = fn(&WorkflowDefinition) -> Vec<DefinitionError>;

/// Rules in checking order. Each returns every violation it finds, in
/// definition order; an empty vector means the rule holds.
const RULES: [Rule; 6] = [
    name_is_present,
    has_states,
    state_ids_are_unique,
    action_ids_are_unique,
    single_initial_state,
    references_resolve,
];

/// Check that a definition is a well-formed state machine.
///
/// Rules are checked in order and the first violation wins:
///
/// 1. the name is not blank
/// 2. there is at least one state
/// 3. state ids are pairwise distinct
/// 4. action ids are pairwise distinct
/// 5. exactly one state is initial
/// 6. every action's target and source states exist
///
/// # Example
///
/// ```rust
/// use waymark::core::{Action, State, WorkflowDefinition};
/// use waymark::validation::{validate_definition, DefinitionError};
/// use chrono::Utc;
///
/// let mut definition = WorkflowDefinition {
///     id: "def-1".to_string(),
///     name: "Toggle".to_string(),
///     states: vec![State::new("off", "Off").initial(), State::new("on", "On")],
///     actions: vec![Action::new("flip", "Flip", ["off"], "on")],
///     created_at: Utc::now(),
///     description: None,
/// };
/// assert!(validate_definition(&definition).is_ok());
///
/// definition.actions.push(Action::new("break", "Break", ["on"], "broken"));
/// assert_eq!(
///     validate_definition(&definition),
///     Err(DefinitionError::UnknownTargetState {
///         action: "break".to_string(),
///         state: "broken".to_string(),
///     })
/// );
/// ```
pub fn validate_definition(definition: &WorkflowDefinition) -> Result<(), DefinitionError> {
    for rule in RULES {
        if let Some(violation) = rule(definition).into_iter().next() {
            return Err(violation);
        }
    }
    Ok(())
}

/// Check every rule and accumulate ALL violations.
///
/// Diagnostic counterpart of [`validate_definition`]: the violations come
/// back in checking order, so when validation fails its error is the first
/// one reported here.
pub fn audit_definition(
    definition: &WorkflowDefinition,
) -> Validation<(), NonEmptyVec<DefinitionError>> {
    let checks: Vec<Validation<(), NonEmptyVec<DefinitionError>>> = RULES
        .iter()
        .flat_map(|rule| rule(definition))
        .map(Validation::fail)
        .collect();

    Validation::all_vec(checks).map(|_| ())
}

fn name_is_present(definition: &WorkflowDefinition) -> Vec<DefinitionError> {
    if definition.name.trim().is_empty() {
        vec![DefinitionError::MissingName]
    } else {
        Vec::new()
    }
}

fn has_states(definition: &WorkflowDefinition) -> Vec<DefinitionError> {
    if definition.states.is_empty() {
        vec![DefinitionError::NoStates]
    } else {
        Vec::new()
    }
}

fn state_ids_are_unique(definition: &WorkflowDefinition) -> Vec<DefinitionError> {
    repeated_ids(definition.states.iter().map(|s| s.id.as_str()))
        .into_iter()
        .map(|id| DefinitionError::DuplicateStateId { id: id.to_string() })
        .collect()
}

fn action_ids_are_unique(definition: &WorkflowDefinition) -> Vec<DefinitionError> {
    repeated_ids(definition.actions.iter().map(|a| a.id.as_str()))
        .into_iter()
        .map(|id| DefinitionError::DuplicateActionId { id: id.to_string() })
        .collect()
}

fn single_initial_state(definition: &WorkflowDefinition) -> Vec<DefinitionError> {
    let found = definition.states.iter().filter(|s| s.is_initial).count();
    if found == 1 {
        Vec::new()
    } else {
        vec![DefinitionError::InitialStateCount { found }]
    }
}

fn references_resolve(definition: &WorkflowDefinition) -> Vec<DefinitionError> {
    let known: HashSet<&str> = definition.states.iter().map(|s| s.id.as_str()).collect();
    let mut violations = Vec::new();

    for action in &definition.actions {
        if !known.contains(action.to_state.as_str()) {
            violations.push(DefinitionError::UnknownTargetState {
                action: action.id.clone(),
                state: action.to_state.clone(),
            });
        }
        for from in &action.from_states {
            if !known.contains(from.as_str()) {
                violations.push(DefinitionError::UnknownSourceState {
                    action: action.id.clone(),
                    state: from.clone(),
                });
            }
        }
    }

    violations
}

/// Ids that occur more than once, each reported once at its first repeat.
fn repeated_ids<'a>(ids: impl Iterator<Item = &'a str>) -> Vec<&'a str> {
    let mut seen = HashSet::new();
    let mut reported = HashSet::new();
    ids.filter(|id| !seen.insert(*id) && reported.insert(*id))
        .collect()
}
