//! Named actions and their binding to state nodes.

use super::machine::Interpreter;
use crate::core::{ActionName, HistoryRecord, StatePath, StateTree, StateValue};
use crate::error::{self, MachineError};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;

/// Callback run when a state is entered or exited.
pub type ActionFn<C> = Arc<dyn Fn(&mut ActionScope<'_, C>) + Send + Sync>;

/// Whether an action runs on entry or on exit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ActionKind {
    Entry,
    Exit,
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Entry => f.write_str("entry"),
            Self::Exit => f.write_str("exit"),
        }
    }
}

/// What an action is told about the dispatch that triggered it.
#[derive(Clone, Debug, PartialEq)]
pub struct ActionMeta {
    /// The triggering event (`"init"` on start)
    pub event: String,
    /// The state value the dispatch leads to
    pub state: StateValue,
    /// The state value being left; `None` on start
    pub history: Option<HistoryRecord>,
}

/// Everything an action can see and do while it runs.
///
/// The scope borrows the interpreter, so an action may call
/// [`ActionScope::send`]; the nested transition completes before the
/// outer one resumes.
pub struct ActionScope<'a, C> {
    pub(crate) interpreter: &'a mut Interpreter<C>,
    pub(crate) meta: &'a ActionMeta,
    pub(crate) node: &'a StatePath,
    pub(crate) kind: ActionKind,
}

impl<'a, C> ActionScope<'a, C> {
    /// The machine's context.
    pub fn context(&mut self) -> &mut C {
        self.interpreter.context_mut()
    }

    pub fn meta(&self) -> &ActionMeta {
        self.meta
    }

    pub fn event(&self) -> &str {
        &self.meta.event
    }

    pub fn state(&self) -> &StateValue {
        &self.meta.state
    }

    pub fn history(&self) -> Option<&HistoryRecord> {
        self.meta.history.as_ref()
    }

    /// The state being entered or exited.
    pub fn node(&self) -> &StatePath {
        self.node
    }

    pub fn kind(&self) -> ActionKind {
        self.kind
    }

    /// Send an event to the running machine from inside an action.
    pub fn send(&mut self, event: &str) -> Result<StateValue, MachineError> {
        self.interpreter.send(event)
    }
}

/// Flat map from action name to callback.
///
/// # Example
///
/// ```rust
/// use statecraft::interpreter::ActionRegistry;
/// use statecraft::store::{MemoryStore, Store};
///
/// let actions = ActionRegistry::<MemoryStore>::new().register("entry", |scope| {
///     let count = scope.context().get("my_key", 0u32);
///     scope.context().set("my_key", count + 1);
/// });
/// assert!(actions.contains("entry"));
/// ```
pub struct ActionRegistry<C> {
    actions: HashMap<ActionName, ActionFn<C>>,
}

impl<C> ActionRegistry<C> {
    pub fn new() -> Self {
        Self {
            actions: HashMap::new(),
        }
    }

    /// Add an action, replacing any previous one with the same name.
    pub fn register<F>(mut self, name: impl Into<ActionName>, action: F) -> Self
    where
        F: Fn(&mut ActionScope<'_, C>) + Send + Sync + 'static,
    {
        self.insert(name, action);
        self
    }

    pub fn insert<F>(&mut self, name: impl Into<ActionName>, action: F)
    where
        F: Fn(&mut ActionScope<'_, C>) + Send + Sync + 'static,
    {
        self.actions.insert(name.into(), Arc::new(action));
    }

    /// Add every action of `other`, replacing same-named ones.
    pub fn merge(&mut self, other: ActionRegistry<C>) {
        self.actions.extend(other.actions);
    }

    pub fn get(&self, name: &str) -> Option<&ActionFn<C>> {
        self.actions.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.actions.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Resolve every action named in `tree`, reporting all missing names.
    pub(crate) fn bind(&self, tree: &StateTree) -> Result<BoundActions<C>, MachineError> {
        let mut bound = BoundActions::default();
        let mut checks: Vec<Validation<(), NonEmptyVec<MachineError>>> = Vec::new();

        for (path, node) in tree.walk() {
            let declared = [
                (ActionKind::Entry, node.entry_action.as_ref()),
                (ActionKind::Exit, node.exit_action.as_ref()),
            ];
            for (kind, name) in declared {
                let Some(name) = name else { continue };
                match self.actions.get(name) {
                    Some(run) => {
                        bound.insert(
                            path.clone(),
                            kind,
                            BoundAction {
                                name: name.clone(),
                                run: Arc::clone(run),
                            },
                        );
                        checks.push(Validation::success(()));
                    }
                    None => checks.push(Validation::fail(MachineError::UnknownAction {
                        action: name.clone(),
                        state: path.label(),
                    })),
                }
            }
        }

        error::into_result(Validation::all_vec(checks).map(|_| ()))?;
        Ok(bound)
    }
}

impl<C> Default for ActionRegistry<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> Clone for ActionRegistry<C> {
    fn clone(&self) -> Self {
        Self {
            actions: self.actions.clone(),
        }
    }
}

impl<C> fmt::Debug for ActionRegistry<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&ActionName> = self.actions.keys().collect();
        names.sort();
        f.debug_struct("ActionRegistry")
            .field("actions", &names)
            .finish()
    }
}

/// An action resolved for a particular node.
pub(crate) struct BoundAction<C> {
    pub(crate) name: ActionName,
    pub(crate) run: ActionFn<C>,
}

impl<C> Clone for BoundAction<C> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            run: Arc::clone(&self.run),
        }
    }
}

/// Entry and exit actions per node, resolved once at construction.
pub(crate) struct BoundActions<C> {
    by_node: HashMap<(StatePath, ActionKind), BoundAction<C>>,
}

impl<C> BoundActions<C> {
    fn insert(&mut self, path: StatePath, kind: ActionKind, action: BoundAction<C>) {
        self.by_node.insert((path, kind), action);
    }

    pub(crate) fn get(&self, path: &StatePath, kind: ActionKind) -> Option<BoundAction<C>> {
        self.by_node.get(&(path.clone(), kind)).cloned()
    }

    pub(crate) fn len(&self) -> usize {
        self.by_node.len()
    }
}

impl<C> fmt::Debug for BoundActions<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut bound: Vec<String> = self
            .by_node
            .iter()
            .map(|((path, kind), action)| format!("{}:{kind}={}", path.label(), action.name))
            .collect();
        bound.sort();
        f.debug_struct("BoundActions").field("bound", &bound).finish()
    }
}

impl<C> Default for BoundActions<C> {
    fn default() -> Self {
        Self {
            by_node: HashMap::new(),
        }
    }
}
