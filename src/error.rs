//! Errors raised while building and running statecharts.

use stillwater::validation::Validation;
use stillwater::NonEmptyVec;
use thiserror::Error;

/// Errors that can occur when building or driving a statechart.
///
/// Configuration errors (`UnknownState`, `MissingInitial`, `UnknownAction`,
/// `InvalidStateId`, `DuplicateState`, `Definition`, `InvalidConfig`) abort
/// construction.
/// `NoMatchingTransition` is returned by `send` and leaves the machine
/// untouched; callers decide whether it matters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MachineError {
    #[error("Unknown state '{path}'")]
    UnknownState { path: String },

    #[error("State '{state}' has children but no usable initial child")]
    MissingInitial { state: String },

    #[error("No transition for event '{event}' from state '{state}'")]
    NoMatchingTransition { event: String, state: String },

    #[error("Action '{action}' used by state '{state}' is not registered")]
    UnknownAction { action: String, state: String },

    #[error("Invalid state id '{id}': ids must be non-empty and must not contain '.'")]
    InvalidStateId { id: String },

    #[error("State '{id}' is declared more than once under the same parent")]
    DuplicateState { id: String },

    #[error("Machine definition could not be parsed: {0}")]
    Definition(String),

    #[error("Machine configuration has {} errors: {}", .0.len(), join_errors(.0))]
    InvalidConfig(Vec<MachineError>),

    #[error("Interpreter is not running. Call .start() first")]
    NotRunning,

    #[error("Interpreter is already running")]
    AlreadyRunning,
}

impl MachineError {
    /// Whether the machine is still usable after this error.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::NoMatchingTransition { .. })
    }

    /// Flatten into individual errors. `InvalidConfig` yields its members,
    /// every other kind yields itself.
    pub fn errors(&self) -> Vec<&MachineError> {
        match self {
            Self::InvalidConfig(errors) => errors.iter().flat_map(|e| e.errors()).collect(),
            other => vec![other],
        }
    }

    /// Collapse accumulated configuration errors: one error is reported
    /// as-is, several are wrapped in `InvalidConfig`.
    pub(crate) fn collapse(mut errors: Vec<MachineError>) -> MachineError {
        if errors.len() == 1 {
            errors.remove(0)
        } else {
            MachineError::InvalidConfig(errors)
        }
    }
}

/// Turn an accumulated validation into a `Result`, collapsing failures.
pub(crate) fn into_result<T>(
    validation: Validation<T, NonEmptyVec<MachineError>>,
) -> Result<T, MachineError> {
    match validation {
        Validation::Success(value) => Ok(value),
        Validation::Failure(errors) => Err(MachineError::collapse(errors.iter().cloned().collect())),
    }
}

fn join_errors(errors: &[MachineError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl From<serde_json::Error> for MachineError {
    fn from(err: serde_json::Error) -> Self {
        MachineError::Definition(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_unmatched_events_are_recoverable() {
        let unmatched = MachineError::NoMatchingTransition {
            event: "NEXT".to_string(),
            state: "inactive".to_string(),
        };
        assert!(unmatched.is_recoverable());
        assert!(!MachineError::NotRunning.is_recoverable());
        assert!(!MachineError::UnknownState {
            path: "a.b".to_string()
        }
        .is_recoverable());
    }

    #[test]
    fn collapse_keeps_single_error_bare() {
        let err = MachineError::collapse(vec![MachineError::AlreadyRunning]);
        assert_eq!(err, MachineError::AlreadyRunning);
    }

    #[test]
    fn collapse_wraps_several_errors() {
        let err = MachineError::collapse(vec![
            MachineError::AlreadyRunning,
            MachineError::NotRunning,
        ]);
        assert!(matches!(err, MachineError::InvalidConfig(ref errors) if errors.len() == 2));
        assert_eq!(err.errors().len(), 2);
        assert!(err.to_string().starts_with("Machine configuration has 2 errors"));
    }
}
