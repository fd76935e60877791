//! Maps typed lines to quiz commands.

use quizloop_session::QuizState;

/// What the player asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Start a quiz.
    Start,
    /// Pick the option in a display slot.
    Answer(u8),
    /// Go to the next question.
    Next,
    /// Back to the start screen.
    Restart,
    /// Leave the program.
    Quit,
    /// Nothing valid for the current state.
    Unknown,
}

/// Parses one input line in the context of `state`.
///
/// Enter alone is the natural action of the screen: start, next or restart.
pub fn parse(line: &str, state: QuizState) -> Command {
    let line = line.trim().to_ascii_lowercase();
    if matches!(line.as_str(), "q" | "quit" | "exit") {
        return Command::Quit;
    }

    match (state, line.as_str()) {
        (QuizState::Idle, "" | "s" | "start") => Command::Start,
        (QuizState::InProgress, answer) => answer.parse().map_or(Command::Unknown, Command::Answer),
        (QuizState::AwaitingNext, "" | "n" | "next") => Command::Next,
        (QuizState::Completed, "" | "r" | "restart") => Command::Restart,
        _ => Command::Unknown,
    }
}

/// One-line prompt for `state`.
pub const fn hint(state: QuizState) -> &'static str {
    match state {
        QuizState::Idle => "Press Enter to start, q to quit.",
        QuizState::Loading => "Loading questions...",
        QuizState::InProgress => "Type 1-4 and press Enter to answer.",
        QuizState::AwaitingNext => "Press Enter for the next question.",
        QuizState::Submitting => "Submitting score...",
        QuizState::Completed => "Press Enter to play again, q to quit.",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enter_means_the_natural_action() {
        assert_eq!(parse("", QuizState::Idle), Command::Start);
        assert_eq!(parse("\n", QuizState::AwaitingNext), Command::Next);
        assert_eq!(parse("  ", QuizState::Completed), Command::Restart);
        assert_eq!(parse("", QuizState::InProgress), Command::Unknown);
    }

    #[test]
    fn test_numbers_answer_only_while_in_progress() {
        assert_eq!(parse("3", QuizState::InProgress), Command::Answer(3));
        assert_eq!(parse(" 1 ", QuizState::InProgress), Command::Answer(1));
        assert_eq!(parse("3", QuizState::AwaitingNext), Command::Unknown);
        assert_eq!(parse("x", QuizState::InProgress), Command::Unknown);
    }

    #[test]
    fn test_out_of_range_slot_is_passed_through() {
        assert_eq!(parse("9", QuizState::InProgress), Command::Answer(9));
    }

    #[test]
    fn test_quit_works_everywhere() {
        assert_eq!(parse("Q", QuizState::Loading), Command::Quit);
        assert_eq!(parse("quit", QuizState::InProgress), Command::Quit);
    }

    #[test]
    fn test_busy_states_ignore_input() {
        assert_eq!(parse("", QuizState::Loading), Command::Unknown);
        assert_eq!(parse("n", QuizState::Submitting), Command::Unknown);
    }
}
