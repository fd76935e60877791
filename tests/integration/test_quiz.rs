//! End-to-end quiz runs against the practice server.
//!
//! Each test starts a real server on an ephemeral port and drives a session
//! through the HTTP backend.

mod common;

use axum::{http::StatusCode, routing::get, routing::post, Json, Router};
use quizloop_client::{HttpBackend, QuizDriver};
use quizloop_session::{
    create_router, AppState, Effect, QuizResult, QuizSession, QuizState, Screen,
    LOAD_FAILED_ALERT, SUBMIT_FAILED_ALERT,
};

use common::{backend_for, sample_bank, spawn};

fn new_driver(backend: HttpBackend) -> QuizDriver<HttpBackend> {
    QuizDriver::new(QuizSession::with_seed("e-waste", 2024), backend)
}

/// Slot showing the correct option of the question on screen.
fn correct_slot(driver: &QuizDriver<HttpBackend>) -> u8 {
    let session = driver.session();
    let correct = session
        .current_question()
        .expect("no question on screen")
        .correct_answer;
    session
        .displayed_options()
        .iter()
        .find(|o| o.label == correct)
        .expect("correct label not displayed")
        .slot
}

/// Any slot not showing the correct option.
fn wrong_slot(driver: &QuizDriver<HttpBackend>) -> u8 {
    let right = correct_slot(driver);
    (1..=4).find(|s| *s != right).expect("four slots")
}

fn result_of(effects: &[Effect]) -> QuizResult {
    effects
        .iter()
        .find_map(|e| match e {
            Effect::ShowResult(result) => Some(result.clone()),
            _ => None,
        })
        .expect("no result shown")
}

/// Plays every question, answering correctly where `pattern` says so, with one
/// tick per question. Returns the effects of the final `Next`.
async fn play_through(driver: &mut QuizDriver<HttpBackend>, pattern: &[bool]) -> Vec<Effect> {
    let mut last = Vec::new();
    for correct in pattern {
        assert_eq!(driver.session().state(), QuizState::InProgress);
        driver.tick();
        let slot = if *correct {
            correct_slot(driver)
        } else {
            wrong_slot(driver)
        };
        driver.select(slot).await.expect("answer rejected");
        last = driver.next().await.expect("next rejected");
    }
    last
}

#[tokio::test]
async fn test_full_quiz_against_practice_server() {
    let state = AppState::new(sample_bank(), 4);
    let addr = spawn(create_router(state.clone())).await;
    let mut driver = new_driver(backend_for(addr));

    let effects = driver.start().await.expect("start rejected");
    assert!(effects.contains(&Effect::ShowScreen(Screen::Quiz)));
    assert_eq!(driver.session().total(), 4);

    let effects = play_through(&mut driver, &[true, false, true, false]).await;

    assert_eq!(driver.session().state(), QuizState::Completed);
    let result = result_of(&effects);
    assert_eq!(result.score, 2);
    assert_eq!(result.total, 4);
    assert!((result.percentage - 50.0).abs() < f64::EPSILON);
    assert_eq!(result.band.to_string(), "learning");
    assert_eq!(result.final_time, "00:04");
    assert!(result.is_new_high_score);

    // The server saw exactly one submission with the same figures.
    let entries = driver
        .backend()
        .fetch_scoreboard()
        .await
        .expect("scoreboard unavailable");
    assert_eq!(entries.len(), 1);
    assert_eq!((entries[0].score, entries[0].time_taken), (2, 4));
    assert_eq!(state.scoreboard.lock().await.best(), Some((2, 4)));
}

#[tokio::test]
async fn test_restart_and_second_attempt() {
    let addr = spawn(create_router(AppState::new(sample_bank(), 4))).await;
    let mut driver = new_driver(backend_for(addr));

    driver.start().await.expect("start rejected");
    play_through(&mut driver, &[true, true, true, false]).await;
    assert_eq!(driver.session().state(), QuizState::Completed);

    let effects = driver.restart().await.expect("restart rejected");
    assert_eq!(
        effects,
        vec![Effect::ResetDisplay, Effect::ShowScreen(Screen::Start)]
    );
    let session = driver.session();
    assert_eq!(session.state(), QuizState::Idle);
    assert_eq!(session.index(), 0);
    assert_eq!(session.score(), 0);
    assert_eq!(session.timer().clock(), "00:00");

    // A lower score is not a new high score.
    driver.start().await.expect("second start rejected");
    let effects = play_through(&mut driver, &[true, false, false, false]).await;
    let result = result_of(&effects);
    assert_eq!(result.score, 1);
    assert!(!result.is_new_high_score);
}

#[tokio::test]
async fn test_question_fetch_failure_leaves_session_idle() {
    let router = Router::new().route(
        "/api/questions",
        get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
    );
    let addr = spawn(router).await;
    let mut driver = new_driver(backend_for(addr));

    let effects = driver.start().await.expect("start rejected");

    assert_eq!(effects, vec![Effect::Alert(LOAD_FAILED_ALERT.to_string())]);
    assert_eq!(driver.session().state(), QuizState::Idle);
    assert!(!driver.session().timer().is_running());
    assert_eq!(driver.session().timer().clock(), "00:00");
}

#[tokio::test]
async fn test_empty_bank_is_a_load_failure() {
    let addr = spawn(create_router(AppState::new(
        quizloop_session::QuestionBank::default(),
        4,
    )))
    .await;
    let mut driver = new_driver(backend_for(addr));

    let effects = driver.start().await.expect("start rejected");
    assert_eq!(effects, vec![Effect::Alert(LOAD_FAILED_ALERT.to_string())]);
    assert_eq!(driver.session().state(), QuizState::Idle);
}

#[tokio::test]
async fn test_score_submission_failure_stays_at_end() {
    let questions = serde_json::to_value(&sample_bank().questions).expect("serialize");
    let router = Router::new()
        .route(
            "/api/questions",
            get(move || {
                let questions = questions.clone();
                async move { Json(questions) }
            }),
        )
        .route(
            "/api/submit-score",
            post(|| async { StatusCode::SERVICE_UNAVAILABLE }),
        );
    let addr = spawn(router).await;
    let mut driver = new_driver(backend_for(addr));

    driver.start().await.expect("start rejected");
    let effects = play_through(&mut driver, &[true, true, true, true]).await;

    assert!(effects.contains(&Effect::Alert(SUBMIT_FAILED_ALERT.to_string())));
    assert_eq!(driver.session().state(), QuizState::AwaitingNext);
    assert_eq!(driver.session().index(), 4);
    assert_eq!(driver.session().score(), 4);
    assert!(driver.session().result().is_none());

    // Retrying against the same outage fails again without moving backwards.
    let effects = driver.next().await.expect("retry rejected");
    assert!(effects.contains(&Effect::Alert(SUBMIT_FAILED_ALERT.to_string())));
    assert_eq!(driver.session().state(), QuizState::AwaitingNext);
    assert_eq!(driver.session().index(), 4);
}
