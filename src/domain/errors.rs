//! Domain errors
//!
//! Expected user-input mismatches (wrong answers, stale button presses) are not
//! errors; they are ordinary [`crate::types::Outcome`] values. The enums here
//! cover malformed documents, unknown scenarios and collaborator failures.

use crate::domain::value_objects::{ScenarioId, UserId};
use thiserror::Error;

fn location(step: &Option<usize>) -> String {
    match step {
        Some(position) => format!("step {position}"),
        None => "scenario".to_string(),
    }
}

/// A scenario document was rejected by the validator
///
/// Step positions are 1-based.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("invalid JSON at {line}:{column}: {message}")]
    Syntax {
        line: usize,
        column: usize,
        message: String,
    },

    #[error("{}: missing field '{field}'", location(.step))]
    MissingField { step: Option<usize>, field: String },

    #[error("{}: invalid field '{field}': {reason}", location(.step))]
    InvalidField {
        step: Option<usize>,
        field: String,
        reason: String,
    },

    #[error("step {step}: unknown step type '{kind}'")]
    UnknownStepType { step: usize, kind: String },
}

impl ValidationError {
    pub fn missing(step: Option<usize>, field: impl Into<String>) -> Self {
        Self::MissingField {
            step,
            field: field.into(),
        }
    }

    pub fn invalid(step: Option<usize>, field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidField {
            step,
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// 1-based position of the offending step, if the error is step-local
    pub fn step(&self) -> Option<usize> {
        match self {
            Self::Syntax { .. } => None,
            Self::MissingField { step, .. } | Self::InvalidField { step, .. } => *step,
            Self::UnknownStepType { step, .. } => Some(*step),
        }
    }

    /// Name or path of the offending field
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::MissingField { field, .. } | Self::InvalidField { field, .. } => Some(field),
            Self::UnknownStepType { .. } => Some("type"),
            Self::Syntax { .. } => None,
        }
    }
}

/// Resolving a scenario id to a document failed
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("scenario not found: {id}")]
    NotFound { id: ScenarioId },

    #[error("scenario '{id}' is malformed: {source}")]
    Malformed {
        id: ScenarioId,
        #[source]
        source: ValidationError,
    },

    #[error("I/O error: {message}")]
    Io {
        message: String,
        #[source]
        source: Option<std::io::Error>,
    },
}

impl LoadError {
    pub fn not_found(id: impl Into<ScenarioId>) -> Self {
        Self::NotFound { id: id.into() }
    }

    pub fn io(message: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source: Some(source),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    pub fn is_malformed(&self) -> bool {
        matches!(self, Self::Malformed { .. })
    }
}

/// The dialogue state store failed
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("state I/O error: {message}")]
    Io { message: String },

    #[error("state serialization error: {message}")]
    Serialization { message: String },
}

/// Errors returned by [`crate::application::engine::DialogueEngine`]
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("access denied for user {user}")]
    AccessDenied { user: UserId },

    #[error("saved position {step} no longer exists in scenario {scenario}")]
    StaleState { scenario: ScenarioId, step: usize },

    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl EngineError {
    /// The requested scenario does not exist
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Load(error) if error.is_not_found())
    }

    /// The scenario exists but cannot be used
    pub fn is_unavailable(&self) -> bool {
        matches!(self, Self::Load(error) if error.is_malformed())
    }

    /// The user's saved progress was dropped because its scenario changed
    pub fn is_stale_state(&self) -> bool {
        matches!(self, Self::StaleState { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_messages_cite_position_and_field() {
        let error = ValidationError::missing(Some(3), "correct_answer");
        assert_eq!(error.to_string(), "step 3: missing field 'correct_answer'");
        assert_eq!(error.step(), Some(3));
        assert_eq!(error.field(), Some("correct_answer"));

        let error = ValidationError::missing(None, "steps");
        assert_eq!(error.to_string(), "scenario: missing field 'steps'");
    }

    #[test]
    fn engine_error_classification() {
        let not_found = EngineError::from(LoadError::not_found("nope"));
        assert!(not_found.is_not_found());
        assert!(!not_found.is_unavailable());

        let malformed = EngineError::from(LoadError::Malformed {
            id: ScenarioId::from("bad"),
            source: ValidationError::missing(None, "name"),
        });
        assert!(malformed.is_unavailable());
        assert!(!malformed.is_not_found());
    }
}
