//! Builder for constructing interpreters.

use crate::core::{ActionName, StateNode};
use crate::error::MachineError;
use crate::interpreter::{ActionRegistry, ActionScope, Interpreter};

/// Builder for interpreters with a fluent API.
///
/// Equivalent to [`Interpreter::new`]: the root, the context, the actions
/// and an optional start path go in, a validated interpreter comes out.
pub struct InterpreterBuilder<C> {
    root: StateNode,
    context: C,
    actions: ActionRegistry<C>,
    start_path: Option<String>,
}

impl<C> InterpreterBuilder<C> {
    /// Create a new builder.
    pub fn new(root: StateNode, context: C) -> Self {
        Self {
            root,
            context,
            actions: ActionRegistry::new(),
            start_path: None,
        }
    }

    /// Register an action under `name`.
    pub fn action<F>(mut self, name: impl Into<ActionName>, action: F) -> Self
    where
        F: Fn(&mut ActionScope<'_, C>) + Send + Sync + 'static,
    {
        self.actions.insert(name, action);
        self
    }

    /// Register every action of `registry`.
    pub fn actions(mut self, registry: ActionRegistry<C>) -> Self {
        self.actions.merge(registry);
        self
    }

    /// Start at a dotted path instead of the tree's default leaf.
    pub fn start_path(mut self, path: impl Into<String>) -> Self {
        self.start_path = Some(path.into());
        self
    }

    /// Build the interpreter.
    /// Returns an error if the tree, the start path or an action is invalid.
    pub fn build(self) -> Result<Interpreter<C>, MachineError> {
        Interpreter::new(
            self.root,
            self.context,
            self.actions,
            self.start_path.as_deref(),
        )
    }
}
