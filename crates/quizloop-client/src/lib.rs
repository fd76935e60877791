//! Quizloop Client
//!
//! Talks to a quiz backend over HTTP and feeds the responses back into a
//! [`QuizSession`](quizloop_session::QuizSession).
//!
//! The session itself never does I/O. It emits `FetchQuestions` and
//! `SubmitScore` effects, and [`QuizDriver`] turns those into calls on a
//! [`QuizBackend`], dispatching the outcome as the follow-up event.

use std::future::Future;

use quizloop_session::{Question, SubmissionOutcome};
use thiserror::Error;

pub mod driver;
pub mod http;

pub use driver::QuizDriver;
pub use http::HttpBackend;

/// Errors that can occur while talking to the quiz backend.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The request could not be sent or the body could not be decoded.
    #[error("request to quiz backend failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend answered with a non-success status.
    #[error("{endpoint} returned HTTP {status}")]
    Status {
        /// Endpoint URL that was called.
        endpoint: String,
        /// HTTP status code.
        status: u16,
    },

    /// The configured backend URL is not usable.
    #[error("invalid backend URL '{url}': {message}")]
    InvalidUrl {
        /// The offending URL.
        url: String,
        /// Parser message.
        message: String,
    },
}

impl ClientError {
    /// Returns `true` if repeating the same request could succeed.
    ///
    /// Timeouts, connection failures and 5xx answers are transient. Nothing
    /// retries automatically; this only decides how the failure is reported.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Http(e) => e.is_timeout() || e.is_connect(),
            Self::Status { status, .. } => *status >= 500,
            Self::InvalidUrl { .. } => false,
        }
    }
}

/// The two collaborators a quiz needs: a question provider and a score
/// submitter.
pub trait QuizBackend {
    /// Fetches the question list for a new attempt.
    fn fetch_questions(&self) -> impl Future<Output = Result<Vec<Question>, ClientError>> + Send;

    /// Submits a finished attempt.
    fn submit_score(
        &self,
        score: u32,
        time_taken: u64,
    ) -> impl Future<Output = Result<SubmissionOutcome, ClientError>> + Send;
}
