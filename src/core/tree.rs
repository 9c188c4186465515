//! The validated, immutable state tree.

use super::initial;
use super::node::StateNode;
use super::path::{StatePath, SEPARATOR};
use crate::error::{self, MachineError};
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;

type Check = Validation<(), NonEmptyVec<MachineError>>;

/// A hierarchy of states that has passed validation.
///
/// Every compound node names an existing `initial` child, every child id
/// is empty or matches its key, and every transition target exists. Keys
/// of `children` are authoritative; paths never read `StateNode::id`.
///
/// A `StateTree` is never mutated; [`StateTree::with_start_path`] builds a
/// new one.
///
/// # Example
///
/// ```rust
/// use statecraft::core::{StateNode, StatePath, StateTree};
///
/// let root = StateNode::builder("machine")
///     .initial("idle")
///     .state(StateNode::builder("idle").on("GO", "busy").build().unwrap())
///     .state(StateNode::builder("busy").on("DONE", "idle").build().unwrap())
///     .build()
///     .unwrap();
///
/// let tree = StateTree::new(root).unwrap();
/// assert_eq!(tree.leaf_of(&StatePath::root()).unwrap(), StatePath::parse("idle"));
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct StateTree {
    root: StateNode,
}

impl StateTree {
    /// Validate `root` and wrap it. All problems are collected before
    /// failing.
    pub fn new(root: StateNode) -> Result<Self, MachineError> {
        error::into_result(validate(&root))?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &StateNode {
        &self.root
    }

    pub fn into_root(self) -> StateNode {
        self.root
    }

    /// Look up a node without failing.
    pub fn get(&self, path: &StatePath) -> Option<&StateNode> {
        lookup(&self.root, path)
    }

    /// Descend one segment at a time from the root.
    pub fn resolve(&self, path: &StatePath) -> Result<&StateNode, MachineError> {
        let mut node = &self.root;
        for (depth, id) in path.segments().iter().enumerate() {
            node = node.child(id).ok_or_else(|| MachineError::UnknownState {
                path: path.truncated(depth + 1).to_string(),
            })?;
        }
        Ok(node)
    }

    /// Follow `initial` children from the node at `path` down to a leaf and
    /// return the leaf's path.
    pub fn leaf_of(&self, path: &StatePath) -> Result<StatePath, MachineError> {
        let mut node = self.resolve(path)?;
        let mut current = path.clone();
        while !node.is_leaf() {
            let missing = || MachineError::MissingInitial {
                state: current.label(),
            };
            let initial = node.initial.as_deref().ok_or_else(missing)?;
            node = node.child(initial).ok_or_else(missing)?;
            current = current.child(initial);
        }
        Ok(current)
    }

    /// A new tree whose `initial` fields lead to `start`.
    pub fn with_start_path(&self, start: &StatePath) -> Result<StateTree, MachineError> {
        initial::apply_start_path(self, start)
    }

    /// Every node with its path, parents before children.
    pub fn walk(&self) -> Vec<(StatePath, &StateNode)> {
        let mut visited = Vec::new();
        let mut stack = vec![(StatePath::root(), &self.root)];
        while let Some((path, node)) = stack.pop() {
            for (id, child) in node.children.iter().rev() {
                stack.push((path.child(id), child));
            }
            visited.push((path, node));
        }
        visited
    }
}

fn lookup<'a>(root: &'a StateNode, path: &StatePath) -> Option<&'a StateNode> {
    path.segments()
        .iter()
        .try_fold(root, |node, id| node.child(id))
}

fn validate(root: &StateNode) -> Check {
    let mut checks: Vec<Check> = Vec::new();
    let mut stack = vec![(StatePath::root(), root)];

    while let Some((path, node)) = stack.pop() {
        for (key, child) in &node.children {
            checks.push(check_id(key, child));
            stack.push((path.child(key), child));
        }

        if !node.is_leaf() {
            checks.push(match node.initial.as_deref() {
                None => Validation::fail(MachineError::MissingInitial {
                    state: path.label(),
                }),
                Some(id) if node.child(id).is_none() => Validation::fail(MachineError::UnknownState {
                    path: path.child(id).to_string(),
                }),
                Some(_) => Validation::success(()),
            });
        }

        for target in node.transitions.values() {
            let resolved = target.resolve_from(&path);
            let check = if resolved.is_root() {
                Validation::fail(MachineError::UnknownState {
                    path: target.to_string(),
                })
            } else if lookup(root, &resolved).is_none() {
                Validation::fail(MachineError::UnknownState {
                    path: resolved.to_string(),
                })
            } else {
                Validation::success(())
            };
            checks.push(check);
        }
    }

    Validation::all_vec(checks).map(|_| ())
}

fn check_id(key: &str, child: &StateNode) -> Check {
    if key.is_empty() || key.contains(SEPARATOR) {
        Validation::fail(MachineError::InvalidStateId { id: key.to_string() })
    } else if !child.id.is_empty() && child.id != key {
        Validation::fail(MachineError::InvalidStateId {
            id: child.id.clone(),
        })
    } else {
        Validation::success(())
    }
}
