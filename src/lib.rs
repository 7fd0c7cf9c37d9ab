//! Waymark: a finite-state workflow engine
//!
//! Clients define workflows as named states joined by guarded actions, then
//! run independent instances of them. Each instance tracks its current
//! state and an append-only history of every action it executed.
//!
//! # Core Concepts
//!
//! - **Definition**: states and actions, validated once on creation
//! - **Instance**: one running execution with its own position and history
//! - **Action**: a named transition from one or more states to a single target
//! - **Final state**: absorbing; once reached the instance is completed
//!
//! Validation is pure ([`validation`]); the services ([`service`]) run it
//! against a pluggable [`store::WorkflowStore`].
//!
//! # Example
//!
//! ```rust
//! use waymark::core::{Action, State, WorkflowDefinition, WorkflowInstance};
//! use waymark::validation::{validate_action_execution, validate_definition};
//! use chrono::Utc;
//!
//! let definition = WorkflowDefinition {
//!     id: "def-1".to_string(),
//!     name: "Article".to_string(),
//!     states: vec![
//!         State::new("draft", "Draft").initial(),
//!         State::new("published", "Published").final_state(),
//!     ],
//!     actions: vec![Action::new("publish", "Publish", ["draft"], "published")],
//!     created_at: Utc::now(),
//!     description: None,
//! };
//! assert!(validate_definition(&definition).is_ok());
//!
//! let instance = WorkflowInstance::start(&definition.id, "draft");
//! let publish = definition.action("publish").unwrap();
//! assert!(validate_action_execution(&instance, publish, &definition).is_ok());
//! ```

pub mod builder;
pub mod config;
pub mod core;
pub mod error;
pub mod service;
pub mod store;
pub mod telemetry;
pub mod validation;

// Re-export commonly used types
pub use crate::core::{Action, ActionHistory, State, WorkflowDefinition, WorkflowInstance};
pub use error::{EngineError, ValidationError};
pub use service::{DefinitionService, InstanceService};
pub use store::{InMemoryStore, JsonFileStore, StoreError, WorkflowStore};
