//! The single-slot history record.
//!
//! A machine keeps exactly one record, overwritten at the start of every
//! transition, holding the configuration that was active before the exits
//! ran.

use super::path::StateValue;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Snapshot of the state value taken just before a transition's exits.
///
/// # Example
///
/// ```rust
/// use statecraft::core::{HistoryRecord, StatePath, StateValue};
///
/// let previous = StateValue::new(StatePath::parse("substateA.substateA1"));
/// let record = HistoryRecord::capture(previous.clone(), "TOGGLE");
///
/// assert_eq!(record.value, previous);
/// assert_eq!(record.event, "TOGGLE");
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HistoryRecord {
    /// The state value being left
    pub value: StateValue,
    /// The event that caused the transition
    pub event: String,
    /// When the transition began
    pub recorded_at: DateTime<Utc>,
}

impl HistoryRecord {
    /// Record `value` as the state being left because of `event`.
    pub fn capture(value: StateValue, event: impl Into<String>) -> Self {
        Self {
            value,
            event: event.into(),
            recorded_at: Utc::now(),
        }
    }
}
