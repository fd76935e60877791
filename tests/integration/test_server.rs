//! Practice server behaviour seen through the HTTP backend.

mod common;

use quizloop_client::{ClientError, QuizBackend};
use quizloop_report::{scoreboard_table, ScoreRow};
use quizloop_session::{create_router, AppState, QuestionBank, ScoreboardEntry};

use common::{backend_for, bank_path, sample_bank, spawn};

#[test]
fn test_fixture_bank_loads() {
    let bank = QuestionBank::load(bank_path()).expect("Failed to load bank");
    assert_eq!(bank.len(), 4);
    assert!(bank.questions.iter().all(|q| !q.explanation.is_empty()));
}

#[tokio::test]
async fn test_questions_are_sampled() {
    let addr = spawn(create_router(AppState::new(sample_bank(), 3))).await;
    let backend = backend_for(addr);

    let questions = backend.fetch_questions().await.expect("fetch failed");
    assert_eq!(questions.len(), 3);

    let mut ids: Vec<_> = questions.iter().map(|q| q.id).collect();
    ids.sort_unstable();
    ids.dedup();
    assert_eq!(ids.len(), 3);
}

#[tokio::test]
async fn test_sample_size_larger_than_bank() {
    let addr = spawn(create_router(AppState::new(sample_bank(), 50))).await;
    let questions = backend_for(addr)
        .fetch_questions()
        .await
        .expect("fetch failed");
    assert_eq!(questions.len(), 4);
}

#[tokio::test]
async fn test_empty_bank_answers_not_found() {
    let addr = spawn(create_router(AppState::new(QuestionBank::default(), 10))).await;
    let err = backend_for(addr).fetch_questions().await.unwrap_err();

    assert!(matches!(err, ClientError::Status { status: 404, .. }));
    assert!(!err.is_transient());
}

#[tokio::test]
async fn test_high_score_and_scoreboard_ranking() {
    let addr = spawn(create_router(AppState::new(sample_bank(), 4))).await;
    let backend = backend_for(addr);

    let ranks = |entries: &[ScoreboardEntry]| -> Vec<(usize, u32, u64)> {
        entries
            .iter()
            .map(|e| (e.rank, e.score, e.time_taken))
            .collect()
    };

    assert!(backend.submit_score(2, 40).await.unwrap().is_new_high_score);
    let entries = backend.fetch_scoreboard().await.expect("scoreboard failed");
    assert_eq!(ranks(&entries), vec![(1, 2, 40)]);

    // Same score in less time replaces the best without being a high score.
    assert!(!backend.submit_score(2, 30).await.unwrap().is_new_high_score);
    let entries = backend.fetch_scoreboard().await.expect("scoreboard failed");
    assert_eq!(ranks(&entries), vec![(1, 2, 30)]);

    // Same score but slower, then a lower score: the best stands.
    assert!(!backend.submit_score(2, 35).await.unwrap().is_new_high_score);
    assert!(!backend.submit_score(1, 5).await.unwrap().is_new_high_score);
    let entries = backend.fetch_scoreboard().await.expect("scoreboard failed");
    assert_eq!(ranks(&entries), vec![(1, 2, 30)]);

    assert!(backend.submit_score(3, 90).await.unwrap().is_new_high_score);
    let entries = backend.fetch_scoreboard().await.expect("scoreboard failed");
    assert_eq!(ranks(&entries), vec![(1, 3, 90)]);

    let rows: Vec<ScoreRow> = entries
        .iter()
        .map(|e| ScoreRow {
            rank: e.rank,
            score: e.score,
            time_taken: e.time_taken,
            date_completed: e.date_completed,
        })
        .collect();
    let table = scoreboard_table(&rows);
    assert!(table.contains("| 1 | 3 | 1m 30s |"));
    assert_eq!(table.lines().count(), 3);
}
