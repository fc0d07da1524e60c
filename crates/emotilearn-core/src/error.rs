//! Core error types for emotilearn-core.
//!
//! The controller performs no I/O of its own, so the hierarchy is narrow:
//! rejected user commands, invalid values, and configuration failures.
//! Every variant is recoverable and leaves prior state intact.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for emotilearn-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Meditation duration outside the allowed set.
    #[error("Invalid meditation duration: {secs}s (allowed: 120, 300, 600)")]
    InvalidDuration { secs: u64 },

    /// Answer submitted with no quiz question open for answering.
    #[error("No active quiz: {0}")]
    NoActiveQuiz(NoActiveQuizReason),

    /// Tried to advance past a question that has not been answered.
    #[error("Current question has not been answered yet")]
    QuestionNotAnswered,

    /// Meditation control used outside Meditation mode.
    #[error("Not in meditation mode")]
    NotInMeditation,

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Why an answer submission was rejected.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoActiveQuizReason {
    #[error("not in quiz mode")]
    NotInQuiz,
    #[error("current question already answered")]
    AlreadyAnswered,
    #[error("quiz already finished")]
    QuizFinished,
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Unknown dot-path key
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Data directory could not be resolved or created
    #[error("Data directory unavailable: {0}")]
    DataDir(String),
}

/// Validation errors.
#[derive(Error, Debug, PartialEq)]
pub enum ValidationError {
    /// Out of bounds
    #[error("Index {index} out of bounds for {collection} (length: {len})")]
    OutOfBounds {
        collection: String,
        index: usize,
        len: usize,
    },

    /// Invalid value
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_messages_are_readable() {
        let err = CoreError::InvalidDuration { secs: 45 };
        assert!(err.to_string().contains("45s"));

        let err = CoreError::NoActiveQuiz(NoActiveQuizReason::AlreadyAnswered);
        assert_eq!(err.to_string(), "No active quiz: current question already answered");
        assert_eq!(NoActiveQuizReason::NotInQuiz.to_string(), "not in quiz mode");
    }

    #[test]
    fn validation_error_converts_into_core_error() {
        let err: CoreError = ValidationError::OutOfBounds {
            collection: "options".into(),
            index: 7,
            len: 4,
        }
        .into();
        assert!(matches!(err, CoreError::Validation(_)));
    }
}
