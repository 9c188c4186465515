//! Dotted state paths and the active state value.
//!
//! A `StatePath` names a node by the chain of ids leading to it from the
//! root, root excluded: `substateA.substateA2` addresses the `substateA2`
//! child of the top-level `substateA` state. The empty path is the root.

use crate::error::MachineError;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use std::fmt;

/// Id of the root node of every machine.
pub const ROOT_ID: &str = "machine";

/// Separator between path segments.
pub const SEPARATOR: char = '.';

/// Path from the root to a node, as a list of child ids.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct StatePath {
    segments: Vec<String>,
}

impl StatePath {
    /// The root path (no segments).
    pub fn root() -> Self {
        Self::default()
    }

    /// Parse a dotted path. Empty segments are dropped, so `""` is the root
    /// and `"a..b"` is `a.b`.
    ///
    /// # Example
    ///
    /// ```rust
    /// use statecraft::core::StatePath;
    ///
    /// let path = StatePath::parse("substateA.substateA2");
    /// assert_eq!(path.len(), 2);
    /// assert_eq!(path.leaf(), Some("substateA2"));
    /// assert_eq!(path.to_string(), "substateA.substateA2");
    /// ```
    pub fn parse(dotted: &str) -> Self {
        Self {
            segments: dotted
                .split(SEPARATOR)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
        }
    }

    /// Parse a dotted path that must name a state below the root: every
    /// segment has to be non-empty.
    pub fn try_parse(dotted: &str) -> Result<Self, MachineError> {
        if dotted.split(SEPARATOR).any(str::is_empty) {
            return Err(MachineError::UnknownState {
                path: dotted.to_string(),
            });
        }
        Ok(Self::parse(dotted))
    }

    pub fn from_segments<I, T>(segments: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        Self {
            segments: segments.into_iter().map(Into::into).collect(),
        }
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Last segment, `None` for the root.
    pub fn leaf(&self) -> Option<&str> {
        self.segments.last().map(String::as_str)
    }

    /// Path of the parent node, `None` for the root.
    pub fn parent(&self) -> Option<StatePath> {
        if self.is_root() {
            None
        } else {
            Some(self.truncated(self.len() - 1))
        }
    }

    /// Path of the named child of this node.
    pub fn child(&self, id: &str) -> StatePath {
        let mut segments = self.segments.clone();
        segments.push(id.to_string());
        Self { segments }
    }

    /// The first `len` segments of this path.
    pub fn truncated(&self, len: usize) -> StatePath {
        Self {
            segments: self.segments[..len.min(self.len())].to_vec(),
        }
    }

    /// This path and every ancestor, innermost first, ending with the root.
    pub fn ancestors(&self) -> impl Iterator<Item = StatePath> + '_ {
        (0..=self.len()).rev().map(move |len| self.truncated(len))
    }

    /// Every non-root prefix of this path, outermost first, ending with
    /// this path.
    pub fn lineage(&self) -> impl Iterator<Item = StatePath> + '_ {
        (1..=self.len()).map(move |len| self.truncated(len))
    }

    /// Name of the node for messages: the dotted path, or `machine` for
    /// the root.
    pub fn label(&self) -> String {
        if self.is_root() {
            ROOT_ID.to_string()
        } else {
            self.to_string()
        }
    }

    pub fn starts_with(&self, prefix: &StatePath) -> bool {
        self.segments.starts_with(&prefix.segments)
    }

    /// Longest path that prefixes both `self` and `other`.
    pub fn common_prefix(&self, other: &StatePath) -> StatePath {
        let shared = self
            .segments
            .iter()
            .zip(&other.segments)
            .take_while(|(a, b)| a == b)
            .count();
        self.truncated(shared)
    }
}

impl fmt::Display for StatePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.segments.join("."))
    }
}

impl From<String> for StatePath {
    fn from(dotted: String) -> Self {
        Self::parse(&dotted)
    }
}

impl From<&str> for StatePath {
    fn from(dotted: &str) -> Self {
        Self::parse(dotted)
    }
}

impl From<StatePath> for String {
    fn from(path: StatePath) -> Self {
        path.to_string()
    }
}

/// The active configuration: the path from the root to the single active
/// leaf.
///
/// Displays as a dotted string and serializes as the nested mapping form,
/// e.g. `{"substateA": "substateA2"}`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct StateValue {
    path: StatePath,
}

impl StateValue {
    pub fn new(path: StatePath) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &StatePath {
        &self.path
    }

    /// Id of the active leaf.
    pub fn leaf(&self) -> Option<&str> {
        self.path.leaf()
    }

    pub fn as_dotted(&self) -> String {
        self.path.to_string()
    }

    /// True when the active path begins with the given dotted prefix.
    ///
    /// # Example
    ///
    /// ```rust
    /// use statecraft::core::{StatePath, StateValue};
    ///
    /// let value = StateValue::new(StatePath::parse("substateA.substateA2"));
    /// assert!(value.matches("substateA"));
    /// assert!(value.matches("substateA.substateA2"));
    /// assert!(!value.matches("substateA.substateA1"));
    /// ```
    pub fn matches(&self, prefix: &str) -> bool {
        self.path.starts_with(&StatePath::parse(prefix))
    }

    /// Nested mapping form: a leaf is a string, every ancestor wraps its
    /// child in a single-entry object.
    pub fn to_nested(&self) -> Value {
        let mut segments = self.path.segments().iter().rev();
        let Some(leaf) = segments.next() else {
            return Value::Object(Map::new());
        };
        segments.fold(Value::String(leaf.clone()), |inner, id| {
            let mut map = Map::new();
            map.insert(id.clone(), inner);
            Value::Object(map)
        })
    }

    /// Inverse of [`StateValue::to_nested`]. Returns `None` unless every
    /// level is a string or a single-entry object.
    pub fn from_nested(value: &Value) -> Option<StateValue> {
        let mut segments = Vec::new();
        let mut current = value;
        loop {
            match current {
                Value::String(leaf) => {
                    segments.push(leaf.clone());
                    break;
                }
                Value::Object(map) if map.is_empty() && segments.is_empty() => break,
                Value::Object(map) if map.len() == 1 => {
                    let (id, inner) = map.iter().next()?;
                    segments.push(id.clone());
                    current = inner;
                }
                _ => return None,
            }
        }
        Some(StateValue::new(StatePath::from_segments(segments)))
    }
}

impl fmt::Display for StateValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.path.fmt(f)
    }
}

impl Serialize for StateValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_nested().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for StateValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        StateValue::from_nested(&value)
            .ok_or_else(|| D::Error::custom("state value must be a string or nested single-key map"))
    }
}
