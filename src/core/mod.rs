//! Core statechart types and algorithms.
//!
//! This module contains the pure part of the interpreter:
//! - Paths, state values and the single-slot history record
//! - The validated state tree and `initial` rewriting for start paths
//! - Transition resolution into ordered exit and entry sets
//!
//! Nothing in this module runs actions; see [`crate::interpreter`] for the
//! side-effecting shell.

mod history;
mod initial;
mod node;
mod path;
mod resolver;
mod tree;

pub use history::HistoryRecord;
pub use initial::apply_start_path;
pub use node::{ActionName, EventName, StateNode, TargetRef};
pub use path::{StatePath, StateValue, ROOT_ID, SEPARATOR};
pub use resolver::{Resolution, TransitionResolver};
pub use tree::StateTree;
