//! Core workflow types.
//!
//! This module contains the domain model of the engine:
//! - States and actions, the vocabulary of a definition
//! - Workflow definitions, the validated templates
//! - Workflow instances and their append-only action history
//!
//! Everything here is plain data with pure lookup helpers. References
//! between entities are ids, never pointers.

mod definition;
mod history;
mod instance;
mod state;

pub use definition::WorkflowDefinition;
pub use history::{ActionHistory, History};
pub use instance::WorkflowInstance;
pub use state::{Action, State};
