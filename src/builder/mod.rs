//! Builder API for ergonomic definition construction.
//!
//! This module provides a fluent builder for definition creation requests,
//! so workflows can be declared in code with minimal boilerplate.

mod definition;

pub use definition::DefinitionBuilder;
