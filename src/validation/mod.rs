//! Pure validation of definitions and action executions.
//!
//! Both validators are decision functions: they inspect their inputs, never
//! mutate them, and return a `Result` naming the first violated rule.
//!
//! # Example
//!
//! ```rust
//! use waymark::core::{Action, State, WorkflowDefinition, WorkflowInstance};
//! use waymark::validation::{validate_action_execution, validate_definition, ExecutionError};
//! use chrono::Utc;
//!
//! let definition = WorkflowDefinition {
//!     id: "def-1".to_string(),
//!     name: "Door".to_string(),
//!     states: vec![
//!         State::new("closed", "Closed").initial(),
//!         State::new("open", "Open"),
//!         State::new("removed", "Removed").final_state(),
//!     ],
//!     actions: vec![
//!         Action::new("open", "Open", ["closed"], "open"),
//!         Action::new("remove", "Remove", ["closed", "open"], "removed"),
//!     ],
//!     created_at: Utc::now(),
//!     description: None,
//! };
//! validate_definition(&definition).unwrap();
//!
//! let instance = WorkflowInstance::start(&definition.id, "open");
//! let open = definition.action("open").unwrap();
//! assert_eq!(
//!     validate_action_execution(&instance, open, &definition),
//!     Err(ExecutionError::InvalidSourceState {
//!         action: "open".to_string(),
//!         state: "open".to_string(),
//!     })
//! );
//! ```

mod definition;
mod error;
mod execution;

pub use definition::{audit_definition, validate_definition};
pub use error::{DefinitionError, ExecutionError};
pub use execution::{can_execute, validate_action_execution};
