//! State nodes and transition targets.

use super::path::{StatePath, SEPARATOR};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Name of an event, e.g. `"TOGGLE"`.
pub type EventName = String;

/// Symbolic name of an action resolved through the action registry.
pub type ActionName = String;

/// Where a transition goes.
///
/// A bare id names a sibling of the state that handles the event. A dotted
/// path, or any reference prefixed with `#`, is absolute from the root.
/// `#id` is not an id lookup: `#substateA2` names a top-level state.
///
/// # Example
///
/// ```rust
/// use statecraft::core::{StatePath, TargetRef};
///
/// assert_eq!(TargetRef::parse("active"), TargetRef::Sibling("active".to_string()));
/// assert_eq!(
///     TargetRef::parse("substateA.substateA2"),
///     TargetRef::Absolute(StatePath::parse("substateA.substateA2"))
/// );
/// assert_eq!(
///     TargetRef::parse("#inactive"),
///     TargetRef::Absolute(StatePath::parse("inactive"))
/// );
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TargetRef {
    Sibling(String),
    Absolute(StatePath),
}

impl TargetRef {
    pub fn parse(target: &str) -> Self {
        if let Some(absolute) = target.strip_prefix('#') {
            TargetRef::Absolute(StatePath::parse(absolute))
        } else if target.contains(SEPARATOR) {
            TargetRef::Absolute(StatePath::parse(target))
        } else {
            TargetRef::Sibling(target.to_string())
        }
    }

    /// Absolute path of the target when the event is handled by `source`.
    ///
    /// Siblings of the root resolve among the root's own children.
    pub fn resolve_from(&self, source: &StatePath) -> StatePath {
        match self {
            TargetRef::Sibling(id) => source.parent().unwrap_or_default().child(id),
            TargetRef::Absolute(path) => path.clone(),
        }
    }
}

impl fmt::Display for TargetRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TargetRef::Sibling(id) => f.write_str(id),
            TargetRef::Absolute(path) if path.len() > 1 => write!(f, "{path}"),
            TargetRef::Absolute(path) => write!(f, "#{path}"),
        }
    }
}

impl From<String> for TargetRef {
    fn from(target: String) -> Self {
        TargetRef::parse(&target)
    }
}

impl From<&str> for TargetRef {
    fn from(target: &str) -> Self {
        TargetRef::parse(target)
    }
}

impl From<TargetRef> for String {
    fn from(target: TargetRef) -> Self {
        target.to_string()
    }
}

/// A node in the state tree.
///
/// Serializes to `{ id?, initial?, states?, on?, entry?, exit? }`. Child ids
/// may be left out; the keys of `states` name the children.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct StateNode {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initial: Option<String>,

    #[serde(rename = "states", default, skip_serializing_if = "BTreeMap::is_empty")]
    pub children: BTreeMap<String, StateNode>,

    #[serde(rename = "on", default, skip_serializing_if = "BTreeMap::is_empty")]
    pub transitions: BTreeMap<EventName, TargetRef>,

    #[serde(rename = "entry", default, skip_serializing_if = "Option::is_none")]
    pub entry_action: Option<ActionName>,

    #[serde(rename = "exit", default, skip_serializing_if = "Option::is_none")]
    pub exit_action: Option<ActionName>,
}

impl StateNode {
    /// An empty leaf with the given id.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    pub fn child(&self, id: &str) -> Option<&StateNode> {
        self.children.get(id)
    }

    /// Handler for `event` declared on this node only.
    pub fn transition(&self, event: &str) -> Option<&TargetRef> {
        self.transitions.get(event)
    }

    /// The child named by `initial`, if both exist.
    pub fn initial_child(&self) -> Option<&StateNode> {
        self.initial.as_deref().and_then(|id| self.children.get(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn sibling_resolves_against_parent_of_source() {
        let target = TargetRef::parse("substateA2");
        let source = StatePath::parse("substateA.substateA1");
        assert_eq!(
            target.resolve_from(&source),
            StatePath::parse("substateA.substateA2")
        );
    }

    #[test]
    fn sibling_of_root_resolves_among_root_children() {
        let target = TargetRef::parse("inactive");
        assert_eq!(
            target.resolve_from(&StatePath::root()),
            StatePath::parse("inactive")
        );
    }

    #[test]
    fn absolute_ignores_source() {
        let target = TargetRef::parse("#inactive");
        let source = StatePath::parse("substateA.substateA1");
        assert_eq!(target.resolve_from(&source), StatePath::parse("inactive"));
    }

    #[test]
    fn target_display_reparses_to_same_target() {
        for raw in ["active", "#active", "a.b.c"] {
            let target = TargetRef::parse(raw);
            assert_eq!(TargetRef::parse(&target.to_string()), target);
        }
    }

    #[test]
    fn node_json_shape_uses_states_and_on() {
        let node: StateNode = serde_json::from_value(json!({
            "initial": "a",
            "states": {
                "a": { "on": { "GO": "b" }, "entry": "entry" },
                "b": { "exit": "exit" }
            }
        }))
        .unwrap();

        assert_eq!(node.initial.as_deref(), Some("a"));
        assert_eq!(node.children.len(), 2);
        let a = node.child("a").unwrap();
        assert_eq!(a.transition("GO"), Some(&TargetRef::Sibling("b".to_string())));
        assert_eq!(a.entry_action.as_deref(), Some("entry"));
        assert_eq!(node.initial_child(), Some(a));
    }

    #[test]
    fn empty_fields_are_not_serialized() {
        let json = serde_json::to_value(StateNode::new("leaf")).unwrap();
        assert_eq!(json, json!({"id": "leaf"}));
    }
}
