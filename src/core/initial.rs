//! Rewriting `initial` children so a machine starts deep inside a substate.

use super::node::StateNode;
use super::path::StatePath;
use super::tree::StateTree;
use crate::error::MachineError;

/// Build a new tree in which every node along `start` declares the next
/// segment as its `initial` child.
///
/// The root's `initial` becomes the first segment, that child's `initial`
/// becomes the second, and so on. The node named by the final segment keeps
/// its own defaults, so a compound terminal still descends through the
/// tree's original `initial` chain. The input tree is left untouched.
///
/// # Example
///
/// ```rust
/// use statecraft::core::{StateNode, StatePath, StateTree};
///
/// let sub = StateNode::builder("sub")
///     .initial("one")
///     .state(StateNode::builder("one").build().unwrap())
///     .state(StateNode::builder("two").build().unwrap())
///     .build()
///     .unwrap();
/// let root = StateNode::builder("machine")
///     .initial("idle")
///     .state(StateNode::builder("idle").build().unwrap())
///     .state(sub)
///     .build()
///     .unwrap();
/// let base = StateTree::new(root).unwrap();
///
/// let started = base.with_start_path(&StatePath::parse("sub.two")).unwrap();
/// assert_eq!(started.leaf_of(&StatePath::root()).unwrap(), StatePath::parse("sub.two"));
/// assert_eq!(base.leaf_of(&StatePath::root()).unwrap(), StatePath::parse("idle"));
/// ```
pub fn apply_start_path(base: &StateTree, start: &StatePath) -> Result<StateTree, MachineError> {
    let root = with_initial_chain(base.root(), start.segments(), &StatePath::root())?;
    StateTree::new(root)
}

fn with_initial_chain(
    node: &StateNode,
    segments: &[String],
    path: &StatePath,
) -> Result<StateNode, MachineError> {
    let Some((first, rest)) = segments.split_first() else {
        return Ok(node.clone());
    };
    let child_path = path.child(first);
    let child = node.child(first).ok_or_else(|| MachineError::UnknownState {
        path: child_path.to_string(),
    })?;

    let mut rebuilt = node.clone();
    rebuilt.initial = Some(first.clone());
    if !rest.is_empty() {
        let rebuilt_child = with_initial_chain(child, rest, &child_path)?;
        rebuilt.children.insert(first.clone(), rebuilt_child);
    }
    Ok(rebuilt)
}
