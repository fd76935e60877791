//! Quiz session state machine.
//!
//! [`QuizSession`] owns everything one quiz attempt needs: the fetched
//! questions, the current position, the score, the elapsed-time counter and
//! the shuffled options of the question on screen. It never performs I/O.
//! Every input arrives as an [`Event`] through [`QuizSession::dispatch`], which
//! returns the new state together with the [`Effect`]s the caller must carry
//! out (render something, fetch questions, submit the score).
//!
//! The status transitions through these states:
//! - `Idle` -> `Loading` (start requested)
//! - `Loading` -> `InProgress` (questions arrived) or back to `Idle` (fetch failed)
//! - `InProgress` -> `AwaitingNext` (answer recorded)
//! - `AwaitingNext` -> `InProgress` (more questions) or `Submitting` (last one)
//! - `Submitting` -> `Completed` (score accepted) or back to `AwaitingNext`
//! - `Completed` -> `Idle` (restart)

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use crate::error::{QuizError, Result};
use crate::grading::{self, ResultBand};
use crate::question::{OptionLabel, Question};
use crate::shuffle::{self, DisplayedOption, SLOT_COUNT};
use crate::timer::ElapsedTimer;

/// Alert shown when the question list cannot be fetched.
pub const LOAD_FAILED_ALERT: &str = "Failed to load quiz questions. Please try again.";

/// Alert shown when the score cannot be submitted.
pub const SUBMIT_FAILED_ALERT: &str = "Failed to submit score. Please try again.";

// ============================================================================
// QuizState
// ============================================================================

/// Current state of a quiz session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuizState {
    /// Start screen, no quiz running.
    #[default]
    Idle,
    /// Waiting for the question list.
    Loading,
    /// A question is on screen and unanswered.
    InProgress,
    /// The current question has been answered; feedback is on screen.
    AwaitingNext,
    /// The last question was passed and the score submission is in flight.
    Submitting,
    /// The score was accepted and the result screen is showing.
    Completed,
}

impl QuizState {
    /// Returns `true` while a quiz attempt is underway.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        matches!(
            self,
            Self::InProgress | Self::AwaitingNext | Self::Submitting
        )
    }
}

impl std::fmt::Display for QuizState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Loading => write!(f, "loading"),
            Self::InProgress => write!(f, "in_progress"),
            Self::AwaitingNext => write!(f, "awaiting_next"),
            Self::Submitting => write!(f, "submitting"),
            Self::Completed => write!(f, "completed"),
        }
    }
}

// ============================================================================
// Events and Effects
// ============================================================================

/// Outcome reported by the score-submission collaborator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionOutcome {
    /// Whether this attempt beat the previous personal best.
    pub is_new_high_score: bool,
}

/// An input to the state machine.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// The player asked to start a quiz.
    Start,
    /// The question list arrived.
    QuestionsLoaded(Vec<Question>),
    /// The question list could not be fetched.
    QuestionsFailed(String),
    /// The player clicked the option in the given display slot (`1..=4`).
    SelectOption(u8),
    /// The player asked for the next question.
    Next,
    /// The score submission succeeded.
    ScoreSubmitted(SubmissionOutcome),
    /// The score submission failed.
    SubmissionFailed(String),
    /// The player asked to go back to the start screen.
    Restart,
    /// One second of wall-clock time passed.
    Tick,
}

impl Event {
    /// Short name used in logs and transition errors.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::QuestionsLoaded(_) => "questions_loaded",
            Self::QuestionsFailed(_) => "questions_failed",
            Self::SelectOption(_) => "select_option",
            Self::Next => "next",
            Self::ScoreSubmitted(_) => "score_submitted",
            Self::SubmissionFailed(_) => "submission_failed",
            Self::Restart => "restart",
            Self::Tick => "tick",
        }
    }
}

/// Which top-level screen is visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Screen {
    /// Start screen.
    Start,
    /// Question screen.
    Quiz,
    /// Result screen.
    Result,
}

/// Visual outcome of an answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Feedback {
    /// The chosen slot holds the correct label.
    Matched {
        /// The chosen slot.
        slot: u8,
    },
    /// The chosen slot is wrong; the slot holding the correct label is revealed.
    MismatchedWithReveal {
        /// The chosen slot.
        chosen: u8,
        /// The slot holding the correct label.
        correct: u8,
    },
}

impl Feedback {
    /// Returns `true` for [`Feedback::Matched`].
    #[must_use]
    pub const fn is_correct(&self) -> bool {
        matches!(self, Self::Matched { .. })
    }
}

/// Final figures of a completed quiz.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizResult {
    /// Number of correct answers.
    pub score: u32,
    /// Number of questions.
    pub total: u32,
    /// `score / total * 100`.
    pub percentage: f64,
    /// Tier the percentage falls into.
    pub band: ResultBand,
    /// Band message for the configured topic.
    pub message: String,
    /// Elapsed seconds submitted with the score.
    pub time_taken: u64,
    /// Elapsed time as `MM:SS`.
    pub final_time: String,
    /// Whether the attempt beat the previous best.
    pub is_new_high_score: bool,
}

/// A side effect or render instruction produced by a transition.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Switch to the given screen.
    ShowScreen(Screen),
    /// Ask the question provider for the question list.
    FetchQuestions,
    /// Draw a question with its shuffled options, all enabled and unmarked.
    RenderQuestion {
        /// 1-based question number.
        number: usize,
        /// Number of questions.
        total: usize,
        /// Prompt text.
        prompt: String,
        /// Options in display order.
        options: Vec<DisplayedOption>,
    },
    /// Move the progress indicator.
    UpdateProgress {
        /// Share of questions already passed, `0.0..100.0`.
        percent: f64,
        /// 1-based number of the current question.
        current: usize,
    },
    /// Disable the options and show the answer feedback.
    ShowFeedback {
        /// Which slots to mark.
        feedback: Feedback,
        /// Explanation text of the question.
        explanation: String,
    },
    /// Hide the answer feedback.
    HideFeedback,
    /// Redraw the timer display.
    UpdateTimer(String),
    /// Send the score to the score-submission collaborator.
    SubmitScore {
        /// Number of correct answers.
        score: u32,
        /// Elapsed whole seconds.
        time_taken: u64,
    },
    /// Fill in the result screen.
    ShowResult(QuizResult),
    /// Reset timer display to `00:00`, progress to 0% and hide the high-score notice.
    ResetDisplay,
    /// Show a blocking notice to the player.
    Alert(String),
}

/// Result of one dispatched event.
#[derive(Debug, Clone, PartialEq)]
pub struct Step {
    /// State after the event.
    pub state: QuizState,
    /// Effects to carry out, in order.
    pub effects: Vec<Effect>,
}

// ============================================================================
// QuizSession
// ============================================================================

/// State of one quiz attempt.
#[derive(Debug, Clone)]
pub struct QuizSession {
    state: QuizState,
    questions: Vec<Question>,
    index: usize,
    score: u32,
    timer: ElapsedTimer,
    displayed: Vec<DisplayedOption>,
    feedback: Option<Feedback>,
    result: Option<QuizResult>,
    topic: String,
    rng: StdRng,
}

impl QuizSession {
    /// Creates an idle session whose result messages talk about `topic`.
    #[must_use]
    pub fn new(topic: impl Into<String>) -> Self {
        Self::with_rng(topic, StdRng::from_entropy())
    }

    /// Creates an idle session with a seeded shuffle, for reproducible runs.
    #[must_use]
    pub fn with_seed(topic: impl Into<String>, seed: u64) -> Self {
        Self::with_rng(topic, StdRng::seed_from_u64(seed))
    }

    fn with_rng(topic: impl Into<String>, rng: StdRng) -> Self {
        Self {
            state: QuizState::Idle,
            questions: Vec::new(),
            index: 0,
            score: 0,
            timer: ElapsedTimer::new(),
            displayed: Vec::new(),
            feedback: None,
            result: None,
            topic: topic.into(),
            rng,
        }
    }

    /// Drops all attempt data and returns to `Idle`.
    ///
    /// The topic and the random source are kept.
    pub fn reset(&mut self) {
        self.state = QuizState::Idle;
        self.questions.clear();
        self.index = 0;
        self.score = 0;
        self.timer.reset();
        self.displayed.clear();
        self.feedback = None;
        self.result = None;
    }

    // ------------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------------

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> QuizState {
        self.state
    }

    /// Number of correct answers so far.
    #[must_use]
    pub const fn score(&self) -> u32 {
        self.score
    }

    /// 0-based index of the current question. Equals [`Self::total`] once
    /// every question has been answered.
    #[must_use]
    pub const fn index(&self) -> usize {
        self.index
    }

    /// Number of questions in this attempt.
    #[must_use]
    pub fn total(&self) -> usize {
        self.questions.len()
    }

    /// The question at the current index, if any.
    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        self.questions.get(self.index)
    }

    /// Options of the question on screen, in display order.
    #[must_use]
    pub fn displayed_options(&self) -> &[DisplayedOption] {
        &self.displayed
    }

    /// Feedback currently recorded for the question on screen.
    #[must_use]
    pub const fn feedback(&self) -> Option<Feedback> {
        self.feedback
    }

    /// The elapsed-time counter.
    #[must_use]
    pub const fn timer(&self) -> &ElapsedTimer {
        &self.timer
    }

    /// Elapsed whole seconds.
    #[must_use]
    pub const fn elapsed_seconds(&self) -> u64 {
        self.timer.elapsed_seconds()
    }

    /// Final result, once completed.
    #[must_use]
    pub const fn result(&self) -> Option<&QuizResult> {
        self.result.as_ref()
    }

    /// Topic used in result messages.
    #[must_use]
    pub fn topic(&self) -> &str {
        &self.topic
    }

    // ------------------------------------------------------------------------
    // Operations
    // ------------------------------------------------------------------------

    /// Requests the question list. Valid in `Idle`.
    pub fn start(&mut self) -> Result<Step> {
        self.dispatch(Event::Start)
    }

    /// Records an answer for the display slot `slot`. Valid once per question
    /// in `InProgress`.
    pub fn submit_answer(&mut self, slot: u8) -> Result<Step> {
        self.dispatch(Event::SelectOption(slot))
    }

    /// Moves past the answered question. Valid in `AwaitingNext`.
    pub fn advance(&mut self) -> Result<Step> {
        self.dispatch(Event::Next)
    }

    /// Returns to the start screen. Valid in `Completed`.
    pub fn restart(&mut self) -> Result<Step> {
        self.dispatch(Event::Restart)
    }

    /// Counts one second if the timer is running and not paused.
    pub fn tick(&mut self) -> Step {
        let effects = match self.timer.tick() {
            Some(_) => vec![Effect::UpdateTimer(self.timer.clock())],
            None => Vec::new(),
        };
        self.step(effects)
    }

    /// Applies `event` and returns the new state with the effects to run.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::InvalidStateTransition` if the event is not valid
    /// in the current state, and `QuizError::UnknownSlot` for a slot outside
    /// `1..=4`. In both cases the session is unchanged.
    pub fn dispatch(&mut self, event: Event) -> Result<Step> {
        let from = self.state;
        let name = event.name();

        let step = match (from, event) {
            (_, Event::Tick) => return Ok(self.tick()),
            (QuizState::Idle, Event::Start) => {
                self.state = QuizState::Loading;
                self.step(vec![Effect::FetchQuestions])
            }
            (QuizState::Loading, Event::QuestionsLoaded(questions)) if questions.is_empty() => {
                self.load_failed("question list is empty")
            }
            (QuizState::Loading, Event::QuestionsLoaded(questions)) => self.begin(questions),
            (QuizState::Loading, Event::QuestionsFailed(reason)) => self.load_failed(&reason),
            (QuizState::InProgress, Event::SelectOption(slot)) => self.answer(slot)?,
            (QuizState::AwaitingNext, Event::Next) => self.next_question(),
            (QuizState::Submitting, Event::ScoreSubmitted(outcome)) => self.complete(outcome),
            (QuizState::Submitting, Event::SubmissionFailed(reason)) => {
                self.submission_failed(&reason)
            }
            (QuizState::Completed, Event::Restart) => {
                self.reset();
                self.step(vec![Effect::ResetDisplay, Effect::ShowScreen(Screen::Start)])
            }
            (state, _) => return Err(QuizError::invalid_transition(state, name)),
        };

        debug!(event = name, from = %from, to = %step.state, "Quiz transition");
        Ok(step)
    }

    // ------------------------------------------------------------------------
    // Transitions
    // ------------------------------------------------------------------------

    fn step(&self, effects: Vec<Effect>) -> Step {
        Step {
            state: self.state,
            effects,
        }
    }

    fn load_failed(&mut self, reason: &str) -> Step {
        error!(reason, "Error fetching questions");
        self.state = QuizState::Idle;
        self.step(vec![Effect::Alert(LOAD_FAILED_ALERT.to_string())])
    }

    fn begin(&mut self, questions: Vec<Question>) -> Step {
        info!(questions = questions.len(), "Quiz started");
        self.questions = questions;
        self.index = 0;
        self.score = 0;
        self.result = None;
        self.timer.start();
        self.state = QuizState::InProgress;

        let mut effects = vec![
            Effect::ShowScreen(Screen::Quiz),
            Effect::UpdateTimer(self.timer.clock()),
        ];
        effects.extend(self.present_question(0));
        self.step(effects)
    }

    /// Shuffles the options of the question at `index` onto the display slots.
    fn present_question(&mut self, index: usize) -> Vec<Effect> {
        let Some(question) = self.questions.get(index) else {
            return Vec::new();
        };
        let options = shuffle::present_options(question, &mut self.rng);
        let prompt = question.question.clone();
        let total = self.questions.len();

        self.displayed = options.to_vec();
        self.feedback = None;

        // Lossless for any realistic quiz length.
        #[allow(clippy::cast_precision_loss)]
        let percent = index as f64 / total as f64 * 100.0;

        vec![
            Effect::RenderQuestion {
                number: index + 1,
                total,
                prompt,
                options: options.to_vec(),
            },
            Effect::HideFeedback,
            Effect::UpdateProgress {
                percent,
                current: index + 1,
            },
        ]
    }

    fn slot_of(&self, label: OptionLabel) -> Option<u8> {
        self.displayed
            .iter()
            .find(|option| option.label == label)
            .map(|option| option.slot)
    }

    fn answer(&mut self, slot: u8) -> Result<Step> {
        if slot == 0 || usize::from(slot) > SLOT_COUNT {
            return Err(QuizError::UnknownSlot { slot });
        }
        let (Some(question), Some(chosen)) = (
            self.questions.get(self.index),
            self.displayed.iter().find(|option| option.slot == slot),
        ) else {
            return Err(QuizError::UnknownSlot { slot });
        };

        let correct_label = question.correct_answer;
        let explanation = question.explanation.clone();
        let chosen_label = chosen.label;

        self.timer.pause();

        let feedback = if chosen_label == correct_label {
            self.score += 1;
            Feedback::Matched { slot }
        } else {
            let correct = self
                .slot_of(correct_label)
                .ok_or(QuizError::UnknownSlot { slot })?;
            Feedback::MismatchedWithReveal {
                chosen: slot,
                correct,
            }
        };

        debug!(
            question = self.index + 1,
            chosen = %chosen_label,
            correct = %correct_label,
            score = self.score,
            "Answer recorded"
        );

        self.feedback = Some(feedback);
        self.state = QuizState::AwaitingNext;
        Ok(self.step(vec![Effect::ShowFeedback {
            feedback,
            explanation,
        }]))
    }

    fn next_question(&mut self) -> Step {
        if self.index >= self.questions.len() {
            return self.submit();
        }
        self.timer.resume();
        self.index += 1;

        if self.index < self.questions.len() {
            self.state = QuizState::InProgress;
            let mut effects = vec![Effect::HideFeedback];
            effects.extend(self.present_question(self.index));
            self.step(effects)
        } else {
            self.timer.stop();
            self.submit()
        }
    }

    /// Moves to `Submitting` with the index parked at the end of the quiz.
    fn submit(&mut self) -> Step {
        self.state = QuizState::Submitting;
        self.step(vec![
            Effect::HideFeedback,
            Effect::SubmitScore {
                score: self.score,
                time_taken: self.timer.elapsed_seconds(),
            },
        ])
    }

    fn submission_failed(&mut self, reason: &str) -> Step {
        error!(reason, "Error submitting score");
        // Index stays at the end; another `Next` re-issues the submission.
        self.state = QuizState::AwaitingNext;

        let mut effects = vec![Effect::Alert(SUBMIT_FAILED_ALERT.to_string())];
        if let (Some(feedback), Some(question)) = (self.feedback, self.questions.last()) {
            effects.push(Effect::ShowFeedback {
                feedback,
                explanation: question.explanation.clone(),
            });
        }
        self.step(effects)
    }

    fn complete(&mut self, outcome: SubmissionOutcome) -> Step {
        let total = u32::try_from(self.questions.len()).unwrap_or(u32::MAX);
        let percentage = grading::percentage(self.score, total);
        let band = ResultBand::from_percentage(percentage);
        let result = QuizResult {
            score: self.score,
            total,
            percentage,
            band,
            message: band.message(&self.topic),
            time_taken: self.timer.elapsed_seconds(),
            final_time: self.timer.clock(),
            is_new_high_score: outcome.is_new_high_score,
        };

        info!(
            score = result.score,
            total = result.total,
            time_taken = result.time_taken,
            new_high_score = result.is_new_high_score,
            "Quiz completed"
        );

        self.result = Some(result.clone());
        self.state = QuizState::Completed;
        self.step(vec![
            Effect::ShowScreen(Screen::Result),
            Effect::ShowResult(result),
        ])
    }
}

// ============================================================================
// Tests
// ============================================================================
