//! JSON bodies exchanged between the quiz client and a quiz server.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Body of `POST /api/submit-score`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitScoreRequest {
    /// Number of correct answers.
    pub score: u32,
    /// Elapsed whole seconds.
    pub time_taken: u64,
}

/// Response of `POST /api/submit-score`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitScoreResponse {
    /// Human-readable acknowledgement.
    #[serde(default)]
    pub message: String,
    /// Whether the attempt beat the previous best.
    #[serde(rename = "isNewHighScore")]
    pub is_new_high_score: bool,
}

/// One row of `GET /api/scoreboard`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreboardEntry {
    /// 1-based rank; equal score and time share a rank.
    pub rank: usize,
    /// Number of correct answers.
    pub score: u32,
    /// Elapsed whole seconds.
    pub time_taken: u64,
    /// When the attempt was recorded.
    pub date_completed: DateTime<Utc>,
}

/// Error response body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error message.
    pub error: String,
}
