//! Declarative machine definitions.
//!
//! A [`MachineConfig`] is the serializable input to an interpreter: the root
//! node plus an optional start path. In JSON the root's fields sit at the
//! top level next to `startPath`:
//!
//! ```json
//! {
//!   "id": "machine",
//!   "initial": "inactive",
//!   "startPath": "substateA.substateA2",
//!   "states": {
//!     "inactive": { "on": { "NEXT": "substateA" }, "entry": "entry" }
//!   }
//! }
//! ```

use crate::core::{StateNode, StatePath, StateTree};
use crate::error::MachineError;
use serde::{Deserialize, Serialize};

/// Root node and optional start path.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MachineConfig {
    #[serde(flatten)]
    pub root: StateNode,

    #[serde(rename = "startPath", default, skip_serializing_if = "Option::is_none")]
    pub start_path: Option<String>,
}

impl MachineConfig {
    pub fn new(root: StateNode) -> Self {
        Self {
            root,
            start_path: None,
        }
    }

    pub fn with_start_path(mut self, path: &str) -> Self {
        self.start_path = Some(path.to_string());
        self
    }

    pub fn from_json(json: &str) -> Result<Self, MachineError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, MachineError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Validate the tree and apply the start path, if any. A start path
    /// with an empty segment names no state and is rejected.
    pub fn resolve(&self) -> Result<StateTree, MachineError> {
        let tree = StateTree::new(self.root.clone())?;
        match self.start_path.as_deref() {
            Some(path) => tree.with_start_path(&StatePath::try_parse(path)?),
            None => Ok(tree),
        }
    }
}
