//! Quizloop Report Generation
//!
//! Turns a finished quiz attempt (and optionally the scoreboard) into a report
//! that can be written as JSON or rendered as Markdown.
//!
//! # Types
//!
//! - [`Report`] - One quiz attempt plus scoreboard context
//! - [`ResultSummary`] - Final figures of the attempt
//! - [`ScoreRow`] - One ranked scoreboard entry
//!
//! # Generators
//!
//! - [`json::JsonGenerator`] - Compact or pretty JSON
//! - [`MarkdownGenerator`] - Human-readable Markdown, including a scoreboard table
//!
//! # Example
//!
//! ```rust
//! use quizloop_report::{json::JsonGenerator, MarkdownGenerator, Report, ResultSummary};
//!
//! let report = Report::new(
//!     "recycling",
//!     ResultSummary {
//!         score: 2,
//!         total: 4,
//!         percentage: 50.0,
//!         band: "learning".to_string(),
//!         message: "You're learning! Keep exploring recycling.".to_string(),
//!         time_taken: 4,
//!         final_time: "00:04".to_string(),
//!         is_new_high_score: false,
//!     },
//! );
//!
//! let json = JsonGenerator::new(&report).generate_pretty().unwrap();
//! assert!(json.contains("\"score\": 2"));
//!
//! let markdown = MarkdownGenerator::new(&report).generate();
//! assert!(markdown.contains("# Quiz Result: recycling"));
//! ```

pub mod json;
mod markdown;

pub use markdown::{scoreboard_table, MarkdownGenerator};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ============================================================================
// Error Types
// ============================================================================

/// Errors that can occur during report generation.
#[derive(Debug, Error)]
pub enum ReportError {
    /// Failed to serialize the report to JSON.
    #[error("failed to serialize report: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Failed to write the report file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for report operations.
pub type Result<T> = std::result::Result<T, ReportError>;

// ============================================================================
// Report Types
// ============================================================================

/// Final figures of a quiz attempt.
///
/// A plain copy of the session's result so this crate does not depend on the
/// session crate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultSummary {
    /// Number of correct answers.
    pub score: u32,
    /// Number of questions.
    pub total: u32,
    /// `score / total * 100`.
    pub percentage: f64,
    /// Result tier name, e.g. `learning`.
    pub band: String,
    /// Result message shown to the player.
    pub message: String,
    /// Elapsed whole seconds.
    pub time_taken: u64,
    /// Elapsed time as `MM:SS`.
    pub final_time: String,
    /// Whether the attempt beat the previous best.
    pub is_new_high_score: bool,
}

/// One ranked scoreboard entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreRow {
    /// 1-based rank.
    pub rank: usize,
    /// Number of correct answers.
    pub score: u32,
    /// Elapsed whole seconds.
    pub time_taken: u64,
    /// When the attempt was recorded.
    pub date_completed: DateTime<Utc>,
}

/// Report of one finished quiz attempt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    /// Quiz topic.
    pub topic: String,
    /// When the report was generated.
    pub generated_at: DateTime<Utc>,
    /// Final figures.
    pub summary: ResultSummary,
    /// Scoreboard at the time of the report; may be empty.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub scoreboard: Vec<ScoreRow>,
}

impl Report {
    /// Creates a report stamped with the current time and no scoreboard.
    #[must_use]
    pub fn new(topic: impl Into<String>, summary: ResultSummary) -> Self {
        Self {
            topic: topic.into(),
            generated_at: Utc::now(),
            summary,
            scoreboard: Vec::new(),
        }
    }

    /// Attaches scoreboard rows.
    #[must_use]
    pub fn with_scoreboard(mut self, rows: Vec<ScoreRow>) -> Self {
        self.scoreboard = rows;
        self
    }

    /// Returns `true` if every question was answered correctly.
    #[must_use]
    pub const fn is_perfect(&self) -> bool {
        self.summary.total > 0 && self.summary.score == self.summary.total
    }
}
