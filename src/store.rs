//! Key-value storage shared by actions.
//!
//! The interpreter treats its context as opaque; [`Store`] is the interface
//! actions are expected to use on it, and [`MemoryStore`] is a ready-made
//! in-process implementation.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use tracing::warn;

/// Mutable key-value store with last-write-wins semantics.
pub trait Store {
    /// Value stored under `key`, or `default` if absent or of another type.
    fn get<V: DeserializeOwned>(&self, key: &str, default: V) -> V;

    /// Store `value` under `key`, replacing any previous value.
    fn set<V: Serialize>(&mut self, key: &str, value: V);
}

/// In-memory [`Store`] holding JSON values.
///
/// # Example
///
/// ```rust
/// use statecraft::store::{MemoryStore, Store};
///
/// let mut store = MemoryStore::new();
/// assert_eq!(store.get("my_key", 0u32), 0);
///
/// store.set("my_key", 41u32 + 1);
/// assert_eq!(store.get("my_key", 0u32), 42);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MemoryStore {
    values: HashMap<String, Value>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.values.remove(key)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Raw JSON value under `key`.
    pub fn raw(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }
}

impl Store for MemoryStore {
    fn get<V: DeserializeOwned>(&self, key: &str, default: V) -> V {
        self.values
            .get(key)
            .and_then(|value| serde_json::from_value(value.clone()).ok())
            .unwrap_or(default)
    }

    fn set<V: Serialize>(&mut self, key: &str, value: V) {
        match serde_json::to_value(value) {
            Ok(value) => {
                self.values.insert(key.to_string(), value);
            }
            Err(err) => warn!(key, error = %err, "value is not representable as JSON, not stored"),
        }
    }
}
