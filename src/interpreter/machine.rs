//! The interpreter that drives a statechart and runs its actions.

use super::action::{ActionKind, ActionMeta, ActionRegistry, ActionScope, BoundAction, BoundActions};
use super::subscription::{Subscribers, SubscriptionHandle};
use crate::builder::InterpreterBuilder;
use crate::config::MachineConfig;
use crate::core::{HistoryRecord, StateNode, StatePath, StateTree, StateValue, TransitionResolver};
use crate::error::MachineError;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, trace};
use uuid::Uuid;

/// Event name passed to actions and listeners when the machine starts.
pub const INIT_EVENT: &str = "init";

/// Lifecycle of an interpreter.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Status {
    Stopped,
    Running,
}

/// Runs a statechart: keeps the active state value and the history slot,
/// executes exit and entry actions in order and notifies listeners.
///
/// Every dispatch runs to completion before `start` or `send` returns.
/// The context `C` is owned by the interpreter and lent to each action.
///
/// # Example
///
/// ```rust
/// use statecraft::core::StateNode;
/// use statecraft::interpreter::Interpreter;
///
/// let root = StateNode::builder("machine")
///     .initial("off")
///     .state(StateNode::builder("off").on("FLIP", "on").entry("count").build().unwrap())
///     .state(StateNode::builder("on").on("FLIP", "off").entry("count").build().unwrap())
///     .build()
///     .unwrap();
///
/// let mut machine = Interpreter::builder(root, 0u32)
///     .action("count", |scope| *scope.context() += 1)
///     .build()
///     .unwrap();
///
/// machine.start().unwrap();
/// let value = machine.send("FLIP").unwrap();
/// assert_eq!(value.as_dotted(), "on");
/// assert_eq!(*machine.context(), 2);
/// ```
pub struct Interpreter<C> {
    id: Uuid,
    tree: StateTree,
    context: C,
    actions: BoundActions<C>,
    status: Status,
    value: Option<StateValue>,
    history: Option<HistoryRecord>,
    subscribers: Subscribers,
    // Bumped whenever a dispatch begins applying actions.
    generation: u64,
}

impl<C> Interpreter<C> {
    /// Build an interpreter from a root node.
    ///
    /// When `start_path` is given the tree is first rewritten so the machine
    /// starts at that dotted path. Unknown states and unregistered actions
    /// fail here, never later.
    pub fn new(
        root: StateNode,
        context: C,
        actions: ActionRegistry<C>,
        start_path: Option<&str>,
    ) -> Result<Self, MachineError> {
        let tree = StateTree::new(root)?;
        let tree = match start_path {
            Some(path) => tree.with_start_path(&StatePath::try_parse(path)?)?,
            None => tree,
        };
        Self::from_tree(tree, context, &actions)
    }

    /// Build an interpreter from an already validated tree.
    pub fn from_tree(
        tree: StateTree,
        context: C,
        actions: &ActionRegistry<C>,
    ) -> Result<Self, MachineError> {
        let actions = actions.bind(&tree)?;
        let id = Uuid::new_v4();
        debug!(machine = %id, bound_actions = actions.len(), "interpreter created");
        Ok(Self {
            id,
            tree,
            context,
            actions,
            status: Status::Stopped,
            value: None,
            history: None,
            subscribers: Subscribers::default(),
            generation: 0,
        })
    }

    /// Build an interpreter from a declarative config.
    pub fn from_config(
        config: &MachineConfig,
        context: C,
        actions: &ActionRegistry<C>,
    ) -> Result<Self, MachineError> {
        Self::from_tree(config.resolve()?, context, actions)
    }

    /// Start a fluent builder.
    pub fn builder(root: StateNode, context: C) -> InterpreterBuilder<C> {
        InterpreterBuilder::new(root, context)
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn tree(&self) -> &StateTree {
        &self.tree
    }

    /// The active state value; `None` before the first `start`.
    pub fn state(&self) -> Option<&StateValue> {
        self.value.as_ref()
    }

    /// The value captured before the most recent transition's exits.
    pub fn history(&self) -> Option<&HistoryRecord> {
        self.history.as_ref()
    }

    pub fn context(&self) -> &C {
        &self.context
    }

    pub fn context_mut(&mut self) -> &mut C {
        &mut self.context
    }

    pub fn into_context(self) -> C {
        self.context
    }

    /// True when the active path begins with the dotted `prefix`.
    pub fn matches(&self, prefix: &str) -> bool {
        self.value.as_ref().is_some_and(|v| v.matches(prefix))
    }

    /// Events the active configuration handles, sorted.
    pub fn next_events(&self) -> Vec<String> {
        match &self.value {
            Some(value) => TransitionResolver::new(&self.tree).next_events(value.path()),
            None => Vec::new(),
        }
    }

    /// Whether `send(event)` would find a handler.
    pub fn can(&self, event: &str) -> bool {
        self.status == Status::Running
            && self.value.as_ref().is_some_and(|value| {
                TransitionResolver::new(&self.tree)
                    .handler(value.path(), event)
                    .is_some()
            })
    }

    /// Enter the initial configuration.
    ///
    /// Runs the root's entry action and then each entry action from the
    /// outermost state down to the initial leaf, then notifies listeners
    /// with [`INIT_EVENT`]. If an entry action sends an event, the nested
    /// transition takes over and the remaining entries are skipped.
    pub fn start(&mut self) -> Result<StateValue, MachineError> {
        if self.status == Status::Running {
            return Err(MachineError::AlreadyRunning);
        }
        let leaf = self.tree.leaf_of(&StatePath::root())?;
        let value = StateValue::new(leaf.clone());

        self.status = Status::Running;
        self.history = None;
        info!(machine = %self.id, state = %value, "interpreter started");

        let generation = self.begin_dispatch();
        let meta = ActionMeta {
            event: INIT_EVENT.to_string(),
            state: value.clone(),
            history: None,
        };
        for path in std::iter::once(StatePath::root()).chain(leaf.lineage()) {
            self.value = Some(StateValue::new(path.clone()));
            self.run_action(ActionKind::Entry, &path, &meta);
            if self.generation != generation {
                return self.superseded(INIT_EVENT);
            }
        }

        self.value = Some(value.clone());
        self.notify(&value, INIT_EVENT);
        Ok(value)
    }

    /// Dispatch `event`.
    ///
    /// The closest state to the active leaf that handles the event wins.
    /// Exit actions run innermost first, the state value is updated, entry
    /// actions run outermost first, and listeners are notified. If no state
    /// handles the event, `NoMatchingTransition` is returned and nothing
    /// runs.
    ///
    /// While an action runs, the active path is the configuration at that
    /// point: a state being exited is already inactive, a state being
    /// entered is already active. An event sent from an action resolves
    /// against that path and runs to completion; the outer dispatch then
    /// stops without running its remaining actions or notifying, and
    /// returns the state the nested transition left.
    pub fn send(&mut self, event: &str) -> Result<StateValue, MachineError> {
        let current = match (&self.status, &self.value) {
            (Status::Running, Some(value)) => value.clone(),
            _ => return Err(MachineError::NotRunning),
        };

        let resolution = match TransitionResolver::new(&self.tree).resolve(current.path(), event) {
            Ok(resolution) => resolution,
            Err(err) => {
                debug!(machine = %self.id, event, state = %current, error = %err, "event not handled");
                return Err(err);
            }
        };
        let target = StateValue::new(resolution.leaf.clone());
        debug!(
            machine = %self.id,
            event,
            from = %current,
            to = %target,
            source = %resolution.source.label(),
            exits = resolution.exit_set.len(),
            entries = resolution.enter_set.len(),
            "transition resolved"
        );

        let history = HistoryRecord::capture(current, event);
        self.history = Some(history.clone());
        let generation = self.begin_dispatch();
        let meta = ActionMeta {
            event: event.to_string(),
            state: target.clone(),
            history: Some(history),
        };

        for path in &resolution.exit_set {
            self.value = Some(StateValue::new(path.parent().unwrap_or_default()));
            self.run_action(ActionKind::Exit, path, &meta);
            if self.generation != generation {
                return self.superseded(event);
            }
        }
        for path in &resolution.enter_set {
            self.value = Some(StateValue::new(path.clone()));
            self.run_action(ActionKind::Entry, path, &meta);
            if self.generation != generation {
                return self.superseded(event);
            }
        }

        self.value = Some(target.clone());
        self.notify(&target, event);
        Ok(target)
    }

    /// Halt without running exit actions. The last state value stays
    /// readable; a later `start` re-enters from the initial configuration.
    pub fn stop(&mut self) {
        if self.status == Status::Running {
            info!(machine = %self.id, state = ?self.value, "interpreter stopped");
            self.status = Status::Stopped;
        }
    }

    /// Register a listener called with `(new value, event)` after every
    /// successful `start` and `send`, in subscription order.
    pub fn on_transition<F>(&mut self, listener: F) -> SubscriptionHandle
    where
        F: Fn(&StateValue, &str) + Send + Sync + 'static,
    {
        self.subscribers.subscribe(Arc::new(listener))
    }

    /// Remove a listener. Returns `false` if it was already gone.
    pub fn unsubscribe(&mut self, handle: SubscriptionHandle) -> bool {
        self.subscribers.unsubscribe(handle)
    }

    fn begin_dispatch(&mut self) -> u64 {
        self.generation += 1;
        self.generation
    }

    /// A nested send replaced this dispatch; report where it left the
    /// machine.
    fn superseded(&self, event: &str) -> Result<StateValue, MachineError> {
        debug!(machine = %self.id, event, state = ?self.value, "dispatch superseded by nested send");
        self.value.clone().ok_or(MachineError::NotRunning)
    }

    fn run_action(&mut self, kind: ActionKind, node: &StatePath, meta: &ActionMeta) {
        let Some(BoundAction { name, run }) = self.actions.get(node, kind) else {
            return;
        };
        trace!(machine = %self.id, %kind, state = %node.label(), action = %name, "running action");
        let mut scope = ActionScope {
            interpreter: self,
            meta,
            node,
            kind,
        };
        run(&mut scope);
    }

    fn notify(&self, value: &StateValue, event: &str) {
        for listener in self.subscribers.snapshot() {
            listener(value, event);
        }
    }
}

impl<C> fmt::Debug for Interpreter<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Interpreter")
            .field("id", &self.id)
            .field("status", &self.status)
            .field("state", &self.value)
            .field("history", &self.history)
            .field("subscribers", &self.subscribers.len())
            .finish_non_exhaustive()
    }
}
