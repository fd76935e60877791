//! Runs a quiz session's network effects against a backend.

use std::collections::VecDeque;

use quizloop_session::{Effect, Event, QuizSession, Result};
use tracing::debug;

use crate::QuizBackend;

/// A [`QuizSession`] wired to a [`QuizBackend`].
///
/// Each call dispatches one player event, then keeps dispatching the outcomes
/// of any `FetchQuestions`/`SubmitScore` effects until the session settles.
/// Everything else comes back to the caller to render, in order.
#[derive(Debug)]
pub struct QuizDriver<B> {
    session: QuizSession,
    backend: B,
}

impl<B: QuizBackend> QuizDriver<B> {
    /// Wraps `session` so its network effects go to `backend`.
    pub const fn new(session: QuizSession, backend: B) -> Self {
        Self { session, backend }
    }

    /// The driven session.
    pub const fn session(&self) -> &QuizSession {
        &self.session
    }

    /// The backend in use.
    pub const fn backend(&self) -> &B {
        &self.backend
    }

    /// Starts a quiz: fetches questions and renders the first one.
    ///
    /// # Errors
    ///
    /// Returns an error if the session is not idle.
    pub async fn start(&mut self) -> Result<Vec<Effect>> {
        self.handle(Event::Start).await
    }

    /// Answers the current question with display slot `slot`.
    ///
    /// # Errors
    ///
    /// Returns an error if no question is awaiting an answer or the slot is
    /// not `1..=4`.
    pub async fn select(&mut self, slot: u8) -> Result<Vec<Effect>> {
        self.handle(Event::SelectOption(slot)).await
    }

    /// Moves to the next question, submitting the score after the last one.
    ///
    /// # Errors
    ///
    /// Returns an error if the current question has not been answered.
    pub async fn next(&mut self) -> Result<Vec<Effect>> {
        self.handle(Event::Next).await
    }

    /// Returns to the start screen after a completed quiz.
    ///
    /// # Errors
    ///
    /// Returns an error if the quiz is not completed.
    pub async fn restart(&mut self) -> Result<Vec<Effect>> {
        self.handle(Event::Restart).await
    }

    /// Advances the timer by one tick.
    pub fn tick(&mut self) -> Vec<Effect> {
        self.session.tick().effects
    }

    /// Dispatches `event` and every follow-up event its effects produce.
    ///
    /// # Errors
    ///
    /// Returns the error of the first dispatch if `event` is not valid in the
    /// current state; the session is unchanged in that case.
    pub async fn handle(&mut self, event: Event) -> Result<Vec<Effect>> {
        let mut pending = VecDeque::from([event]);
        let mut rendered = Vec::new();
        let mut first = true;

        while let Some(event) = pending.pop_front() {
            let step = match self.session.dispatch(event) {
                Ok(step) => step,
                Err(e) if first => return Err(e),
                Err(e) => {
                    debug!(error = %e, "Dropped follow-up event");
                    continue;
                }
            };
            first = false;

            for effect in step.effects {
                match effect {
                    Effect::FetchQuestions => {
                        let event = match self.backend.fetch_questions().await {
                            Ok(questions) => Event::QuestionsLoaded(questions),
                            Err(e) => Event::QuestionsFailed(e.to_string()),
                        };
                        pending.push_back(event);
                    }
                    Effect::SubmitScore { score, time_taken } => {
                        let event = match self.backend.submit_score(score, time_taken).await {
                            Ok(outcome) => Event::ScoreSubmitted(outcome),
                            Err(e) => Event::SubmissionFailed(e.to_string()),
                        };
                        pending.push_back(event);
                    }
                    other => rendered.push(other),
                }
            }
        }

        Ok(rendered)
    }
}
