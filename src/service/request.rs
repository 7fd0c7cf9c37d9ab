//! Payloads a transport hands to the services.

use crate::core::{Action, State};
use serde::{Deserialize, Serialize};

/// Payload for creating a workflow definition.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDefinitionRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub states: Vec<State>,
    #[serde(default)]
    pub actions: Vec<Action>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Payload for starting an instance of a definition.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartInstanceRequest {
    #[serde(default)]
    pub definition_id: String,
}

/// Payload for executing an action on a path-identified instance.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecuteActionRequest {
    #[serde(default)]
    pub action_id: String,
}
