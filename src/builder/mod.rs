//! Builder API for ergonomic statechart construction.
//!
//! This module provides fluent builders for state nodes and interpreters.
//! Node builders check what they can see locally; the whole tree is
//! validated again when an interpreter is built.

pub mod machine;
pub mod node;

pub use machine::InterpreterBuilder;
pub use node::StateNodeBuilder;
