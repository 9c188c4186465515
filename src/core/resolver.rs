//! Resolving an event against the active configuration.
//!
//! Resolution is pure: it reads the tree and the current leaf path and
//! returns everything the interpreter needs to apply the transition. No
//! action runs until a resolution has fully succeeded, so a failure never
//! leaves the machine half-transitioned.

use super::path::StatePath;
use super::tree::StateTree;
use crate::error::MachineError;

/// Outcome of resolving one event.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Resolution {
    /// The event that was resolved
    pub event: String,
    /// The node whose handler fired
    pub source: StatePath,
    /// The node the handler names, before following `initial` children
    pub target: StatePath,
    /// The leaf that becomes active
    pub leaf: StatePath,
    /// Deepest node that is neither exited nor entered
    pub domain: StatePath,
    /// Nodes to exit, innermost first
    pub exit_set: Vec<StatePath>,
    /// Nodes to enter, outermost first
    pub enter_set: Vec<StatePath>,
}

impl Resolution {
    pub fn is_self_transition(&self) -> bool {
        self.exit_set.first() == Some(&self.leaf) && self.exit_set.len() == self.enter_set.len()
    }
}

/// Computes exit and entry sets for events.
pub struct TransitionResolver<'a> {
    tree: &'a StateTree,
}

impl<'a> TransitionResolver<'a> {
    pub fn new(tree: &'a StateTree) -> Self {
        Self { tree }
    }

    /// Find the node closest to `current` that handles `event`.
    ///
    /// Walks from the leaf toward the root; the first handler wins.
    pub fn handler(&self, current: &StatePath, event: &str) -> Option<StatePath> {
        current.ancestors().find(|path| {
            self.tree
                .get(path)
                .is_some_and(|node| node.transition(event).is_some())
        })
    }

    /// Resolve `event` while `current` is the active leaf.
    ///
    /// # Example
    ///
    /// ```rust
    /// use statecraft::core::{StateNode, StatePath, StateTree, TransitionResolver};
    ///
    /// let a = StateNode::builder("a")
    ///     .initial("b")
    ///     .state(
    ///         StateNode::builder("b")
    ///             .initial("c")
    ///             .state(StateNode::builder("c").on("GO", "a.d").build().unwrap())
    ///             .build()
    ///             .unwrap(),
    ///     )
    ///     .state(StateNode::builder("d").build().unwrap())
    ///     .build()
    ///     .unwrap();
    /// let root = StateNode::builder("machine").initial("a").state(a).build().unwrap();
    /// let tree = StateTree::new(root).unwrap();
    ///
    /// let resolution = TransitionResolver::new(&tree)
    ///     .resolve(&StatePath::parse("a.b.c"), "GO")
    ///     .unwrap();
    /// assert_eq!(resolution.exit_set, vec![StatePath::parse("a.b.c"), StatePath::parse("a.b")]);
    /// assert_eq!(resolution.enter_set, vec![StatePath::parse("a.d")]);
    /// ```
    pub fn resolve(&self, current: &StatePath, event: &str) -> Result<Resolution, MachineError> {
        self.tree.resolve(current)?;

        let source = self
            .handler(current, event)
            .ok_or_else(|| MachineError::NoMatchingTransition {
                event: event.to_string(),
                state: current.label(),
            })?;
        let target_ref = self
            .tree
            .resolve(&source)?
            .transition(event)
            .ok_or_else(|| MachineError::NoMatchingTransition {
                event: event.to_string(),
                state: current.label(),
            })?;

        let target = target_ref.resolve_from(&source);
        if target.is_root() {
            return Err(MachineError::UnknownState {
                path: target_ref.to_string(),
            });
        }
        let leaf = self.tree.leaf_of(&target)?;

        // The target node itself is always exited and re-entered when it is
        // already active, so the domain must sit strictly above it.
        let shared = current.common_prefix(&leaf);
        let domain = shared.truncated(shared.len().min(target.len() - 1));

        let exit_set = current
            .ancestors()
            .take_while(|path| path.len() > domain.len())
            .collect();
        let enter_set = (domain.len() + 1..=leaf.len())
            .map(|len| leaf.truncated(len))
            .collect();

        Ok(Resolution {
            event: event.to_string(),
            source,
            target,
            leaf,
            domain,
            exit_set,
            enter_set,
        })
    }

    /// Events handled by `current` or any of its ancestors, sorted.
    pub fn next_events(&self, current: &StatePath) -> Vec<String> {
        let mut events: Vec<String> = current
            .ancestors()
            .filter_map(|path| self.tree.get(&path))
            .flat_map(|node| node.transitions.keys().cloned())
            .collect();
        events.sort();
        events.dedup();
        events
    }
}
