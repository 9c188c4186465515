//! The imperative shell around the pure core.
//!
//! The interpreter owns the context and the active state value, runs entry
//! and exit actions in resolved order and notifies transition listeners.
//! Everything is synchronous: `start` and `send` return only after every
//! action and listener has run.

mod action;
mod machine;
mod subscription;

pub use action::{ActionFn, ActionKind, ActionMeta, ActionRegistry, ActionScope};
pub use machine::{Interpreter, Status, INIT_EVENT};
pub use subscription::{Listener, SubscriptionHandle};
