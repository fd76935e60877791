//! Quizloop Session
//!
//! Quiz session state machine, option shuffling, the elapsed-time counter,
//! configuration, the JSON wire types and, with the `server` feature, the
//! in-memory practice server.

#[cfg(feature = "server")]
pub mod api;
pub mod bank;
pub mod config;
pub mod error;
pub mod grading;
pub mod question;
pub mod session;
pub mod shuffle;
pub mod timer;
pub mod wire;

#[cfg(feature = "server")]
pub use api::{create_router, AppState, Scoreboard};
pub use bank::{QuestionBank, MAX_BANK_SIZE};
pub use config::{Config, ServerConfig};
pub use error::{QuizError, Result};
pub use grading::{percentage, ResultBand};
pub use question::{OptionLabel, Question, QuestionOptions};
pub use session::{
    Effect, Event, Feedback, QuizResult, QuizSession, QuizState, Screen, Step, SubmissionOutcome,
    LOAD_FAILED_ALERT, SUBMIT_FAILED_ALERT,
};
pub use shuffle::{fisher_yates, present_options, DisplayedOption, SLOT_COUNT};
pub use timer::{format_clock, ElapsedTimer};
pub use wire::{ErrorResponse, ScoreboardEntry, SubmitScoreRequest, SubmitScoreResponse};
