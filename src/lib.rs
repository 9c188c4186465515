//! Statecraft: a hierarchical statechart interpreter
//!
//! A statechart is a tree of named states. Events are dispatched to the
//! active leaf; the closest state that handles the event picks the target,
//! exit actions run from the innermost state outwards, entry actions run
//! from the outermost state inwards, and listeners are told about the new
//! state value.
//!
//! # Core Concepts
//!
//! - **StateNode / StateTree**: the validated hierarchy of states
//! - **StateValue**: the active path from the root to a leaf
//! - **ActionRegistry**: named entry and exit actions bound to the tree
//! - **Interpreter**: owns the active state and the context lent to actions
//! - **MachineConfig**: a serializable definition with an optional start path
//!
//! # Transition targets
//!
//! A target in `on` is a bare id naming a sibling of the handling state, or
//! a dotted path from the root. A leading `#` also marks a path from the
//! root: `#inactive` is the top-level `inactive` state, wherever the handler
//! sits. Ids are not looked up across the tree, so `#substateA2` does not
//! find a nested `substateA2`; write `#substateA.substateA2` instead.
//!
//! ```rust
//! use statecraft::{ActionRegistry, Interpreter, MachineConfig, MachineError};
//!
//! let definition = r##"{
//!     "initial": "outer",
//!     "states": {
//!         "outer": {
//!             "initial": "inner",
//!             "states": { "inner": { "on": { "LEAVE": "#idle" } } }
//!         },
//!         "idle": { "on": { "BACK": "#outer.inner" } }
//!     }
//! }"##;
//! let config = MachineConfig::from_json(definition).unwrap();
//! let mut machine = Interpreter::from_config(&config, (), &ActionRegistry::new()).unwrap();
//! machine.start().unwrap();
//! assert_eq!(machine.send("LEAVE").unwrap().as_dotted(), "idle");
//! assert_eq!(machine.send("BACK").unwrap().as_dotted(), "outer.inner");
//!
//! let by_id = definition.replace("#outer.inner", "#inner");
//! assert_eq!(
//!     MachineConfig::from_json(&by_id).unwrap().resolve().unwrap_err(),
//!     MachineError::UnknownState { path: "inner".to_string() }
//! );
//! ```
//!
//! # Example
//!
//! ```rust
//! use statecraft::{ActionRegistry, Interpreter, MachineConfig, MemoryStore, Store};
//!
//! let config = MachineConfig::from_json(r#"{
//!     "initial": "inactive",
//!     "states": {
//!         "inactive": { "on": { "TOGGLE": "active" }, "entry": "count" },
//!         "active": { "on": { "TOGGLE": "inactive" }, "entry": "count" }
//!     }
//! }"#).unwrap();
//!
//! let actions = ActionRegistry::<MemoryStore>::new().register("count", |scope| {
//!     let store = scope.context();
//!     let entered: u32 = store.get("entered", 0);
//!     store.set("entered", entered + 1);
//! });
//!
//! let mut machine = Interpreter::from_config(&config, MemoryStore::new(), &actions).unwrap();
//! machine.start().unwrap();
//! assert_eq!(machine.send("TOGGLE").unwrap().as_dotted(), "active");
//! assert_eq!(machine.context().get("entered", 0u32), 2);
//! ```

pub mod builder;
pub mod config;
pub mod core;
pub mod error;
pub mod interpreter;
pub mod store;

// Re-export commonly used types
pub use builder::{InterpreterBuilder, StateNodeBuilder};
pub use config::MachineConfig;
pub use core::{HistoryRecord, StateNode, StatePath, StateTree, StateValue, TargetRef};
pub use error::MachineError;
pub use interpreter::{ActionMeta, ActionRegistry, ActionScope, Interpreter, Status};
pub use store::{MemoryStore, Store};
