//! Services over an injected [`WorkflowStore`](crate::store::WorkflowStore).
//!
//! [`DefinitionService`] validates definitions before persisting them;
//! [`InstanceService`] starts instances and executes actions. Both are
//! stateless apart from the shared store handle, so tests substitute an
//! in-memory store.
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use waymark::builder::DefinitionBuilder;
//! use waymark::service::{DefinitionService, InstanceService};
//! use waymark::store::InMemoryStore;
//!
//! # let rt = tokio::runtime::Builder::new_current_thread().build().unwrap();
//! # rt.block_on(async {
//! let store = Arc::new(InMemoryStore::new());
//! let definitions = DefinitionService::new(Arc::clone(&store));
//! let instances = InstanceService::new(store);
//!
//! let request = DefinitionBuilder::new("Light")
//!     .initial_state("off", "Off")
//!     .state("on", "On")
//!     .final_state("broken", "Broken")
//!     .action("switch_on", "Switch on", ["off"], "on")
//!     .action("switch_off", "Switch off", ["on"], "off")
//!     .action("smash", "Smash", ["off", "on"], "broken")
//!     .build();
//!
//! let definition = definitions.create_definition(request).await.unwrap();
//! let light = instances.start_instance(&definition.id).await.unwrap();
//! let light = instances.execute_action(&light.id, "switch_on").await.unwrap();
//! assert_eq!(light.current_state_id, "on");
//!
//! let light = instances.execute_action(&light.id, "smash").await.unwrap();
//! assert!(light.is_completed());
//! assert!(instances.execute_action(&light.id, "switch_off").await.is_err());
//! # });
//! ```

mod definition;
mod instance;
pub mod request;

pub use definition::DefinitionService;
pub use instance::InstanceService;
pub use request::{CreateDefinitionRequest, ExecuteActionRequest, StartInstanceRequest};
