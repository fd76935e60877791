//! Terminal rendering of session effects.

use quizloop_session::{DisplayedOption, Effect, Feedback, QuizResult, Screen};

/// Width of the progress bar in characters.
const PROGRESS_WIDTH: usize = 20;

/// Turns effects into lines of terminal output.
///
/// Keeps what a browser page would keep on screen: the clock, the options of
/// the current question and whether the high-score notice is showing.
#[derive(Debug)]
pub struct TerminalRenderer {
    topic: String,
    clock: String,
    options: Vec<DisplayedOption>,
    high_score_shown: bool,
}

impl TerminalRenderer {
    pub fn new(topic: impl Into<String>) -> Self {
        Self {
            topic: topic.into(),
            clock: "00:00".to_string(),
            options: Vec::new(),
            high_score_shown: false,
        }
    }

    /// Clock text as last drawn.
    pub fn clock(&self) -> &str {
        &self.clock
    }

    /// Whether the new-high-score notice is visible.
    pub const fn high_score_shown(&self) -> bool {
        self.high_score_shown
    }

    /// Renders a batch of effects in order.
    pub fn render_all(&mut self, effects: &[Effect]) -> Vec<String> {
        effects.iter().flat_map(|e| self.render(e)).collect()
    }

    /// Renders one effect.
    pub fn render(&mut self, effect: &Effect) -> Vec<String> {
        match effect {
            Effect::ShowScreen(Screen::Start) => vec![
                format!("=== {} quiz ===", self.topic),
                "Press Enter to start, q to quit.".to_string(),
            ],
            Effect::ShowScreen(Screen::Quiz) => Vec::new(),
            Effect::ShowScreen(Screen::Result) => vec![String::new(), "=== Results ===".to_string()],
            Effect::RenderQuestion {
                number,
                total,
                prompt,
                options,
            } => {
                self.options.clone_from(options);
                let mut lines = vec![
                    String::new(),
                    format!("Question {number} of {total}  [{}]", self.clock),
                    prompt.clone(),
                ];
                lines.extend(options.iter().map(|o| format!("  {}", o.caption())));
                lines
            }
            Effect::UpdateProgress { percent, .. } => vec![progress_bar(*percent)],
            Effect::ShowFeedback {
                feedback,
                explanation,
            } => {
                let verdict = match feedback {
                    Feedback::Matched { .. } => "Correct!".to_string(),
                    Feedback::MismatchedWithReveal { correct, .. } => {
                        format!("Wrong answer. The correct answer was {}", self.caption(*correct))
                    }
                };
                vec![
                    format!("{verdict}  [{}]", self.clock),
                    format!("Explanation: {explanation}"),
                    "Press Enter for the next question.".to_string(),
                ]
            }
            Effect::UpdateTimer(clock) => {
                self.clock.clone_from(clock);
                Vec::new()
            }
            Effect::ShowResult(result) => self.render_result(result),
            Effect::ResetDisplay => {
                self.clock = "00:00".to_string();
                self.options.clear();
                self.high_score_shown = false;
                Vec::new()
            }
            Effect::Alert(message) => vec![format!("! {message}")],
            // Network effects are carried out by the driver.
            Effect::HideFeedback | Effect::FetchQuestions | Effect::SubmitScore { .. } => {
                Vec::new()
            }
        }
    }

    fn render_result(&mut self, result: &QuizResult) -> Vec<String> {
        let mut lines = vec![
            format!(
                "Score: {}/{} ({:.0}%)",
                result.score, result.total, result.percentage
            ),
            format!("Time: {}", result.final_time),
            result.message.clone(),
        ];
        self.high_score_shown = result.is_new_high_score;
        if result.is_new_high_score {
            lines.push("New high score!".to_string());
        }
        lines.push("Press Enter to play again, q to quit.".to_string());
        lines
    }

    fn caption(&self, slot: u8) -> String {
        self.options
            .iter()
            .find(|o| o.slot == slot)
            .map_or_else(|| format!("option {slot}"), DisplayedOption::caption)
    }
}

/// Text progress bar, e.g. `[#####---------------] 25%`.
fn progress_bar(percent: f64) -> String {
    let clamped = percent.clamp(0.0, 100.0);
    // Bounded to 0..=PROGRESS_WIDTH by the clamp.
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    let filled = (clamped / 100.0 * PROGRESS_WIDTH as f64).round() as usize;
    format!(
        "[{}{}] {clamped:.0}%",
        "#".repeat(filled),
        "-".repeat(PROGRESS_WIDTH - filled)
    )
}
