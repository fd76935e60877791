//! In-memory practice server for quizloop.
//!
//! Serves the two endpoints the quiz client talks to, plus a scoreboard, from
//! a [`QuestionBank`] held in memory. Nothing is written to disk.
//!
//! # Endpoints
//!
//! - `GET /api/questions` - Random sample of questions
//! - `POST /api/submit-score` - Record a finished attempt
//! - `GET /api/scoreboard` - Ranked personal bests
//!
//! # Example
//!
//! ```no_run
//! use quizloop_session::{create_router, AppState, QuestionBank};
//!
//! # async fn example() {
//! let bank = QuestionBank::load("questions.json").unwrap();
//! let router = create_router(AppState::new(bank, 10));
//! let listener = tokio::net::TcpListener::bind("127.0.0.1:5000").await.unwrap();
//! axum::serve(listener, router).await.unwrap();
//! # }
//! ```

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use tokio::sync::Mutex;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{info, warn};

use crate::bank::QuestionBank;
use crate::question::Question;
use crate::wire::{ErrorResponse, ScoreboardEntry, SubmitScoreRequest, SubmitScoreResponse};

// ============================================================================
// Scoreboard
// ============================================================================

/// A recorded attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Attempt {
    score: u32,
    time_taken: u64,
    date_completed: DateTime<Utc>,
}

/// Personal best of the local player.
///
/// Only the best attempt is stored, so the scoreboard holds at most one row.
#[derive(Debug, Clone, Default)]
pub struct Scoreboard {
    best: Option<Attempt>,
}

impl Scoreboard {
    /// Records an attempt and reports whether it is a new high score.
    ///
    /// The attempt is a new high score when there is no previous best or the
    /// score is strictly greater. The stored best is replaced when the score
    /// is greater, or equal with a shorter time.
    pub fn record(&mut self, score: u32, time_taken: u64) -> bool {
        let attempt = Attempt {
            score,
            time_taken,
            date_completed: Utc::now(),
        };

        match self.best {
            None => {
                self.best = Some(attempt);
                true
            }
            Some(best) => {
                if score > best.score || (score == best.score && time_taken < best.time_taken) {
                    self.best = Some(attempt);
                }
                score > best.score
            }
        }
    }

    /// Best `(score, time_taken)` so far.
    #[must_use]
    pub fn best(&self) -> Option<(u32, u64)> {
        self.best.map(|a| (a.score, a.time_taken))
    }

    /// Stored bests ordered by score (desc) then time (asc), with ranks.
    #[must_use]
    pub fn ranked(&self) -> Vec<ScoreboardEntry> {
        rank_rows(self.best.into_iter().collect())
    }
}

/// Sorts rows and assigns competition ranks; equal score and time share a rank.
fn rank_rows(mut rows: Vec<Attempt>) -> Vec<ScoreboardEntry> {
    rows.sort_by(|a, b| {
        b.score
            .cmp(&a.score)
            .then(a.time_taken.cmp(&b.time_taken))
    });

    let mut entries: Vec<ScoreboardEntry> = Vec::with_capacity(rows.len());
    for (position, row) in rows.iter().enumerate() {
        let rank = match entries.last() {
            Some(prev) if prev.score == row.score && prev.time_taken == row.time_taken => {
                prev.rank
            }
            _ => position + 1,
        };
        entries.push(ScoreboardEntry {
            rank,
            score: row.score,
            time_taken: row.time_taken,
            date_completed: row.date_completed,
        });
    }
    entries
}

// ============================================================================
// Application State
// ============================================================================

/// Shared state for the practice server.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Questions to draw from.
    pub bank: Arc<QuestionBank>,
    /// Questions served per quiz.
    pub sample_size: usize,
    /// Personal best.
    pub scoreboard: Arc<Mutex<Scoreboard>>,
}

impl AppState {
    /// Creates a new `AppState` with an empty scoreboard.
    #[must_use]
    pub fn new(bank: QuestionBank, sample_size: usize) -> Self {
        Self {
            bank: Arc::new(bank),
            sample_size,
            scoreboard: Arc::new(Mutex::new(Scoreboard::default())),
        }
    }
}

// ============================================================================
// API Error Type
// ============================================================================

/// Internal error type for API handlers.
#[derive(Debug)]
enum ApiError {
    /// The bank holds no questions.
    NoQuestions,
    /// The request body could not be read as JSON of the expected shape.
    InvalidBody(JsonRejection),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::NoQuestions => (StatusCode::NOT_FOUND, "No questions found".to_string()),
            Self::InvalidBody(rejection) => (rejection.status(), rejection.body_text()),
        };

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}

// ============================================================================
// Router Setup
// ============================================================================

/// Creates the HTTP router with all practice endpoints.
///
/// The router carries CORS middleware (any origin, so a browser front end can
/// talk to it during development) and request tracing.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        .route("/questions", get(handle_questions))
        .route("/submit-score", post(handle_submit_score))
        .route("/scoreboard", get(handle_scoreboard));

    Router::new()
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(Arc::new(state))
}

// ============================================================================
// Handlers
// ============================================================================

/// Handler for `GET /api/questions`.
async fn handle_questions(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Question>>, ApiError> {
    if state.bank.is_empty() {
        warn!("Question request with an empty bank");
        return Err(ApiError::NoQuestions);
    }

    let questions = state
        .bank
        .sample(state.sample_size, &mut rand::thread_rng());
    info!(count = questions.len(), "Serving questions");
    Ok(Json(questions))
}

/// Handler for `POST /api/submit-score`.
async fn handle_submit_score(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<SubmitScoreRequest>, JsonRejection>,
) -> Result<Json<SubmitScoreResponse>, ApiError> {
    let Json(request) = payload.map_err(|rejection| {
        warn!(status = %rejection.status(), "Rejected score submission body");
        ApiError::InvalidBody(rejection)
    })?;

    let is_new_high_score = state
        .scoreboard
        .lock()
        .await
        .record(request.score, request.time_taken);

    info!(
        score = request.score,
        time_taken = request.time_taken,
        is_new_high_score,
        "Score submitted"
    );

    Ok(Json(SubmitScoreResponse {
        message: "Score submitted successfully".to_string(),
        is_new_high_score,
    }))
}

/// Handler for `GET /api/scoreboard`.
async fn handle_scoreboard(State(state): State<Arc<AppState>>) -> Json<Vec<ScoreboardEntry>> {
    Json(state.scoreboard.lock().await.ranked())
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::{
        body::Body,
        http::{header, Method, Request, StatusCode},
    };
    use tower::util::ServiceExt;

    use super::*;
    use crate::question::{OptionLabel, QuestionOptions};

    fn question(n: i64) -> Question {
        Question {
            id: Some(n),
            question: format!("Question {n}?"),
            options: QuestionOptions {
                a: "a".to_string(),
                b: "b".to_string(),
                c: "c".to_string(),
                d: "d".to_string(),
            },
            correct_answer: OptionLabel::A,
            explanation: "a it is".to_string(),
        }
    }

    fn test_state(count: i64, sample_size: usize) -> AppState {
        AppState::new(
            QuestionBank::from_questions((1..=count).map(question).collect()),
            sample_size,
        )
    }

    async fn body_json<T: serde::de::DeserializeOwned>(response: Response) -> T {
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    fn submit(score: u32, time_taken: u64) -> Request<Body> {
        Request::builder()
            .method(Method::POST)
            .uri("/api/submit-score")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(
                serde_json::to_vec(&SubmitScoreRequest { score, time_taken }).unwrap(),
            ))
            .unwrap()
    }

    // ------------------------------------------------------------------------
    // Scoreboard tests
    // ------------------------------------------------------------------------

    #[test]
    fn test_first_attempt_is_high_score() {
        let mut board = Scoreboard::default();
        assert!(board.record(3, 60));
        assert_eq!(board.best(), Some((3, 60)));
    }

    #[test]
    fn test_high_score_requires_strictly_greater_score() {
        let mut board = Scoreboard::default();
        board.record(5, 100);

        // Same score, faster: best is replaced but it is not a new high score.
        assert!(!board.record(5, 80));
        assert_eq!(board.best(), Some((5, 80)));

        // Lower score never replaces the best.
        assert!(!board.record(4, 10));
        assert_eq!(board.best(), Some((5, 80)));

        assert!(board.record(6, 200));
        assert_eq!(board.best(), Some((6, 200)));
    }

    #[test]
    fn test_ranked_lists_only_the_best() {
        let mut board = Scoreboard::default();
        board.record(3, 90);
        board.record(2, 30);
        board.record(1, 10);

        let rows: Vec<(usize, u32, u64)> = board
            .ranked()
            .iter()
            .map(|e| (e.rank, e.score, e.time_taken))
            .collect();
        assert_eq!(rows, vec![(1, 3, 90)]);

        // An equal score in less time replaces the listed row.
        board.record(3, 60);
        let rows: Vec<(u32, u64)> = board
            .ranked()
            .iter()
            .map(|e| (e.score, e.time_taken))
            .collect();
        assert_eq!(rows, vec![(3, 60)]);
    }

    #[test]
    fn test_empty_scoreboard_has_no_rows() {
        assert!(Scoreboard::default().ranked().is_empty());
    }

    #[test]
    fn test_rank_shares_rank_on_ties() {
        let row = |score, time_taken| Attempt {
            score,
            time_taken,
            date_completed: Utc::now(),
        };
        let ranks: Vec<(usize, u32, u64)> = rank_rows(vec![
            row(5, 90),
            row(7, 120),
            row(5, 90),
            row(5, 90),
            row(2, 30),
        ])
        .iter()
        .map(|e| (e.rank, e.score, e.time_taken))
        .collect();
        assert_eq!(
            ranks,
            vec![(1, 7, 120), (2, 5, 90), (2, 5, 90), (2, 5, 90), (5, 2, 30)]
        );
    }

    // ------------------------------------------------------------------------
    // Endpoint tests
    // ------------------------------------------------------------------------

    #[tokio::test]
    async fn test_get_questions_samples_bank() {
        let router = create_router(test_state(15, 10));

        let response = router
            .oneshot(
                Request::builder()
                    .uri("/api/questions")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let questions: Vec<Question> = body_json(response).await;
        assert_eq!(questions.len(), 10);
    }

    #[tokio::test]
    async fn test_get_questions_with_empty_bank_is_not_found() {
        let router = create_router(test_state(0, 10));

        let response = router
            .oneshot(
                Request::builder()
                    .uri("/api/questions")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let error: ErrorResponse = body_json(response).await;
        assert_eq!(error.error, "No questions found");
    }

    #[tokio::test]
    async fn test_submit_score_reports_high_score() {
        let state = test_state(4, 4);
        let router = create_router(state.clone());

        let response = tokio_test::assert_ok!(router.clone().oneshot(submit(2, 45)).await);
        assert_eq!(response.status(), StatusCode::OK);
        let first: SubmitScoreResponse = body_json(response).await;
        assert!(first.is_new_high_score);

        let response = router.oneshot(submit(2, 30)).await.unwrap();
        let second: SubmitScoreResponse = body_json(response).await;
        assert!(!second.is_new_high_score);

        assert_eq!(state.scoreboard.lock().await.best(), Some((2, 30)));
    }

    #[tokio::test]
    async fn test_submit_score_wire_format() {
        let router = create_router(test_state(4, 4));
        let response = router.oneshot(submit(4, 12)).await.unwrap();

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["isNewHighScore"], serde_json::Value::Bool(true));
        assert_eq!(json["message"], "Score submitted successfully");
    }

    #[tokio::test]
    async fn test_submit_score_rejects_bad_body() {
        let router = create_router(test_state(4, 4));
        let response = router
            .oneshot(
                Request::builder()
                    .method(Method::POST)
                    .uri("/api/submit-score")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(r#"{"score": "lots"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert!(response.status().is_client_error());
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "application/json"
        );
        let error: ErrorResponse = body_json(response).await;
        assert!(!error.error.is_empty());
    }

    #[tokio::test]
    async fn test_submit_score_without_json_content_type_is_json_error() {
        let router = create_router(test_state(4, 4));
        let response = router
            .oneshot(
                Request::builder()
                    .method(Method::POST)
                    .uri("/api/submit-score")
                    .body(Body::from(r#"{"score": 1, "time_taken": 2}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
        let error: ErrorResponse = body_json(response).await;
        assert!(!error.error.is_empty());
    }

    #[tokio::test]
    async fn test_scoreboard_lists_best_attempt() {
        let router = create_router(test_state(4, 4));
        router.clone().oneshot(submit(1, 50)).await.unwrap();
        router.clone().oneshot(submit(3, 70)).await.unwrap();
        router.clone().oneshot(submit(2, 20)).await.unwrap();

        let response = router
            .oneshot(
                Request::builder()
                    .uri("/api/scoreboard")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        let entries: Vec<ScoreboardEntry> = body_json(response).await;
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].rank, 1);
        assert_eq!(entries[0].score, 3);
        assert_eq!(entries[0].time_taken, 70);
    }
}
