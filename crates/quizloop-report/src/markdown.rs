//! Markdown report generation.
//!
//! [`MarkdownGenerator`] renders a [`Report`] as a short Markdown document:
//! a title, the result message, a summary table, the high-score notice and
//! the scoreboard when one is attached. [`scoreboard_table`] renders the
//! scoreboard on its own.

use chrono::{DateTime, Utc};
use std::fmt::Write;

use crate::{Report, ScoreRow};

/// Generates Markdown reports from quiz results.
pub struct MarkdownGenerator<'a> {
    report: &'a Report,
}

impl<'a> MarkdownGenerator<'a> {
    /// Creates a new Markdown generator for the given report.
    #[must_use]
    pub const fn new(report: &'a Report) -> Self {
        Self { report }
    }

    /// Generates the complete Markdown report.
    #[must_use]
    pub fn generate(&self) -> String {
        let mut output = String::new();

        self.write_title(&mut output);
        self.write_summary(&mut output);
        self.write_scoreboard(&mut output);
        self.write_footer(&mut output);

        output
    }

    fn write_title(&self, output: &mut String) {
        let _ = writeln!(output, "# Quiz Result: {}", self.report.topic);
        let _ = writeln!(output);
        let _ = writeln!(output, "{}", self.report.summary.message);
        let _ = writeln!(output);
    }

    fn write_summary(&self, output: &mut String) {
        let summary = &self.report.summary;

        let _ = writeln!(output, "| Metric | Value |");
        let _ = writeln!(output, "|--------|-------|");
        let _ = writeln!(output, "| Score | {} / {} |", summary.score, summary.total);
        let _ = writeln!(output, "| Percentage | {:.0}% |", summary.percentage);
        let _ = writeln!(output, "| Time | {} |", summary.final_time);
        let _ = writeln!(output, "| Tier | {} |", summary.band);
        let _ = writeln!(output);

        if summary.is_new_high_score {
            let _ = writeln!(output, "**New high score!**");
            let _ = writeln!(output);
        }
    }

    fn write_scoreboard(&self, output: &mut String) {
        if self.report.scoreboard.is_empty() {
            return;
        }

        let _ = writeln!(output, "## Scoreboard");
        let _ = writeln!(output);
        output.push_str(&scoreboard_table(&self.report.scoreboard));
        let _ = writeln!(output);
    }

    fn write_footer(&self, output: &mut String) {
        let _ = writeln!(output, "---");
        let timestamp = format_timestamp(&self.report.generated_at);
        let _ = writeln!(output, "*Generated by quizloop at {timestamp}*");
    }
}

/// Renders scoreboard rows as a Markdown table.
///
/// An empty scoreboard renders as a one-line notice instead of an empty table.
#[must_use]
pub fn scoreboard_table(rows: &[ScoreRow]) -> String {
    let mut output = String::new();

    if rows.is_empty() {
        let _ = writeln!(output, "_No scores recorded yet._");
        return output;
    }

    let _ = writeln!(output, "| Rank | Score | Time | Completed |");
    let _ = writeln!(output, "|------|-------|------|-----------|");
    for row in rows {
        let _ = writeln!(
            output,
            "| {} | {} | {} | {} |",
            row.rank,
            row.score,
            format_duration(row.time_taken),
            format_timestamp(&row.date_completed)
        );
    }

    output
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Formats a duration in seconds to a human-readable string.
///
/// Examples:
/// - 65 seconds -> "1m 5s"
/// - 45 seconds -> "45s"
fn format_duration(seconds: u64) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;

    let mut parts = Vec::new();

    if hours > 0 {
        parts.push(format!("{hours}h"));
    }
    if minutes > 0 {
        parts.push(format!("{minutes}m"));
    }
    if secs > 0 || parts.is_empty() {
        parts.push(format!("{secs}s"));
    }

    parts.join(" ")
}

/// Format: "YYYY-MM-DD HH:MM UTC"
fn format_timestamp(dt: &DateTime<Utc>) -> String {
    dt.format("%Y-%m-%d %H:%M UTC").to_string()
}
