//! Builder for constructing state nodes.

use crate::core::{ActionName, EventName, StateNode, TargetRef, SEPARATOR};
use crate::error::{self, MachineError};
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;

/// Builder for state nodes with a fluent API.
pub struct StateNodeBuilder {
    node: StateNode,
    duplicates: Vec<String>,
}

impl StateNode {
    /// Start building a node with the given id.
    pub fn builder(id: impl Into<String>) -> StateNodeBuilder {
        StateNodeBuilder::new(id)
    }
}

impl StateNodeBuilder {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            node: StateNode::new(id),
            duplicates: Vec::new(),
        }
    }

    /// Set the default child (required once a child is added).
    pub fn initial(mut self, id: impl Into<String>) -> Self {
        self.node.initial = Some(id.into());
        self
    }

    /// Add a child state, keyed by its id.
    pub fn state(mut self, child: StateNode) -> Self {
        if self.node.children.contains_key(&child.id) {
            self.duplicates.push(child.id.clone());
        }
        self.node.children.insert(child.id.clone(), child);
        self
    }

    /// Add several child states.
    pub fn states(self, children: impl IntoIterator<Item = StateNode>) -> Self {
        children.into_iter().fold(self, Self::state)
    }

    /// Handle `event` by moving to `target`.
    pub fn on(mut self, event: impl Into<EventName>, target: impl Into<TargetRef>) -> Self {
        self.node.transitions.insert(event.into(), target.into());
        self
    }

    pub fn entry(mut self, action: impl Into<ActionName>) -> Self {
        self.node.entry_action = Some(action.into());
        self
    }

    pub fn exit(mut self, action: impl Into<ActionName>) -> Self {
        self.node.exit_action = Some(action.into());
        self
    }

    /// Build the node.
    ///
    /// Checks what is local to this node: a usable id, no duplicate
    /// children, and an `initial` naming one of the children. Transition
    /// targets are checked once the whole tree exists.
    pub fn build(self) -> Result<StateNode, MachineError> {
        let node = self.node;
        let mut checks: Vec<Validation<(), NonEmptyVec<MachineError>>> = Vec::new();

        if node.id.is_empty() || node.id.contains(SEPARATOR) {
            checks.push(Validation::fail(MachineError::InvalidStateId {
                id: node.id.clone(),
            }));
        }
        for id in self.duplicates {
            checks.push(Validation::fail(MachineError::DuplicateState { id }));
        }
        if !node.is_leaf() {
            checks.push(match node.initial.as_deref() {
                None => Validation::fail(MachineError::MissingInitial {
                    state: node.id.clone(),
                }),
                Some(id) if node.child(id).is_none() => {
                    Validation::fail(MachineError::UnknownState {
                        path: format!("{}.{id}", node.id),
                    })
                }
                Some(_) => Validation::success(()),
            });
        }

        error::into_result(Validation::all_vec(checks).map(|_| ()))?;
        Ok(node)
    }
}
