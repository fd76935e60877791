//! Error types for the quizloop session crate.
//!
//! This module defines the error hierarchy for configuration loading,
//! question bank loading and quiz state transitions.

use std::path::PathBuf;

/// A specialized `Result` type for quizloop session operations.
pub type Result<T> = std::result::Result<T, QuizError>;

/// Errors that can occur while configuring or running a quiz.
///
/// Variants that the user can act on carry a suggestion in their message.
#[derive(Debug, thiserror::Error)]
pub enum QuizError {
    // ========================================================================
    // Configuration Errors
    // ========================================================================
    /// Invalid JSON syntax in configuration file.
    #[error("Invalid JSON in config file '{path}': {message}\n\nSuggestion: Validate your quizloop.json with a JSON linter")]
    ConfigParseError {
        /// Path to the configuration file.
        path: PathBuf,
        /// Description of the parse error.
        message: String,
    },

    /// Configuration validation failed.
    #[error("Invalid configuration: {message}\n\nSuggestion: {suggestion}")]
    ConfigValidationError {
        /// Description of the validation failure.
        message: String,
        /// Actionable suggestion for the user.
        suggestion: String,
    },

    // ========================================================================
    // Question Bank Errors
    // ========================================================================
    /// Question bank file was not found at the specified path.
    #[error("Question bank not found: '{path}'\n\nSuggestion: Check the 'server.questionBank' field in quizloop.json or pass --bank")]
    QuestionBankNotFound {
        /// Path where the bank was expected.
        path: PathBuf,
    },

    /// Question bank file exceeds the size limit.
    #[error("Question bank exceeds size limit (256KB): '{path}' is {size_kb}KB\n\nSuggestion: Split the bank into smaller files")]
    QuestionBankTooLarge {
        /// Path to the oversized bank.
        path: PathBuf,
        /// Actual size in kilobytes.
        size_kb: u64,
    },

    /// Question bank file contains non-UTF-8 content.
    #[error("Question bank has invalid encoding: '{path}'\n\nSuggestion: Convert the file to UTF-8 encoding")]
    QuestionBankEncoding {
        /// Path to the bank with encoding issues.
        path: PathBuf,
    },

    /// Question bank file is not a valid list of questions.
    #[error("Invalid question bank '{path}': {message}\n\nSuggestion: Each entry needs question, options A-D, correct_answer and explanation")]
    QuestionBankInvalid {
        /// Path to the invalid bank.
        path: PathBuf,
        /// Description of the decode failure.
        message: String,
    },

    /// Question bank holds no questions.
    #[error("Question bank '{path}' contains no questions\n\nSuggestion: Add at least one question to the bank")]
    EmptyQuestionBank {
        /// Path to the empty bank.
        path: PathBuf,
    },

    // ========================================================================
    // State Machine Errors
    // ========================================================================
    /// Invalid state transition attempted.
    #[error("Invalid state transition: cannot handle {event} while {from}")]
    InvalidStateTransition {
        /// The current state.
        from: String,
        /// The event that was rejected.
        event: String,
    },

    /// An answer named a display slot that does not exist.
    #[error("Unknown option slot {slot}: expected 1 to 4")]
    UnknownSlot {
        /// The slot number that was selected.
        slot: u8,
    },

    // ========================================================================
    // General I/O Errors
    // ========================================================================
    /// General I/O error during file operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl QuizError {
    /// Creates a new `ConfigParseError` with the given path and message.
    #[must_use]
    pub fn config_parse(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::ConfigParseError {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Creates a new `ConfigValidationError` with the given message and suggestion.
    #[must_use]
    pub fn config_validation(message: impl Into<String>, suggestion: impl Into<String>) -> Self {
        Self::ConfigValidationError {
            message: message.into(),
            suggestion: suggestion.into(),
        }
    }

    /// Creates a new `QuestionBankNotFound` error.
    #[must_use]
    pub fn bank_not_found(path: impl Into<PathBuf>) -> Self {
        Self::QuestionBankNotFound { path: path.into() }
    }

    /// Creates a new `QuestionBankTooLarge` error.
    #[must_use]
    pub fn bank_too_large(path: impl Into<PathBuf>, size_kb: u64) -> Self {
        Self::QuestionBankTooLarge {
            path: path.into(),
            size_kb,
        }
    }

    /// Creates a new `QuestionBankEncoding` error.
    #[must_use]
    pub fn bank_encoding(path: impl Into<PathBuf>) -> Self {
        Self::QuestionBankEncoding { path: path.into() }
    }

    /// Creates a new `QuestionBankInvalid` error.
    #[must_use]
    pub fn bank_invalid(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::QuestionBankInvalid {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Creates a new `EmptyQuestionBank` error.
    #[must_use]
    pub fn empty_bank(path: impl Into<PathBuf>) -> Self {
        Self::EmptyQuestionBank { path: path.into() }
    }

    /// Creates a new `InvalidStateTransition` error.
    #[must_use]
    pub fn invalid_transition(from: impl std::fmt::Display, event: impl std::fmt::Display) -> Self {
        Self::InvalidStateTransition {
            from: from.to_string(),
            event: event.to_string(),
        }
    }

    /// Returns `true` if this error is fatal for the command being run.
    ///
    /// Rejected transitions are not fatal: the session is left untouched and
    /// the caller can keep feeding events.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        !matches!(
            self,
            Self::InvalidStateTransition { .. } | Self::UnknownSlot { .. }
        )
    }
}
