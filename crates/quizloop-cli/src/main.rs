//! Quizloop CLI
//!
//! Plays a quiz in the terminal against a quiz backend, serves the in-memory
//! practice backend, and prints the scoreboard.

mod input;
mod render;

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;

use clap::{Parser, Subcommand};
use quizloop_client::{HttpBackend, QuizDriver};
use quizloop_report::{
    json::JsonGenerator, scoreboard_table, MarkdownGenerator, Report, ReportError, ResultSummary,
    ScoreRow,
};
use quizloop_session::{
    create_router, AppState, Config, Effect, QuestionBank, QuizResult, QuizSession, Screen,
    ScoreboardEntry,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::net::TcpListener;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing_subscriber::EnvFilter;

use crate::input::Command;
use crate::render::TerminalRenderer;

/// Quizloop - multiple-choice quiz runner
///
/// Fetches a set of questions, asks them one at a time with shuffled options
/// and a running clock, and submits the final score.
#[derive(Parser, Debug)]
#[command(name = "quizloop")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to configuration file (default: quizloop.json in current directory)
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<String>,

    /// Enable verbose output (sets log level to debug)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: CliCommand,
}

#[derive(Subcommand, Debug)]
enum CliCommand {
    /// Play a quiz in the terminal
    Play {
        /// Quiz backend base URL
        #[arg(long, value_name = "URL")]
        base_url: Option<String>,

        /// Write a report of each finished quiz to this file (Markdown for .md, JSON otherwise)
        #[arg(long, value_name = "FILE")]
        report: Option<PathBuf>,
    },

    /// Run the in-memory practice backend
    Serve {
        /// Question bank JSON file
        #[arg(long, value_name = "FILE")]
        bank: Option<String>,

        /// Address to listen on
        #[arg(long, value_name = "ADDR")]
        bind: Option<String>,

        /// Questions served per quiz
        #[arg(long, value_name = "N")]
        sample_size: Option<usize>,
    },

    /// Print the scoreboard of a quiz backend
    Scoreboard {
        /// Quiz backend base URL
        #[arg(long, value_name = "URL")]
        base_url: Option<String>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if args.verbose {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!(config = ?args.config, "Config file");

    let result = match load_config(args.config.as_deref()) {
        Ok(config) => run(args.command, config).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::from(1)
        }
    }
}

async fn run(command: CliCommand, mut config: Config) -> anyhow::Result<()> {
    match command {
        CliCommand::Play { base_url, report } => {
            if let Some(url) = base_url {
                config.base_url = url;
            }
            config.validate()?;
            play(&config, report.as_deref()).await
        }
        CliCommand::Serve {
            bank,
            bind,
            sample_size,
        } => {
            if let Some(bank) = bank {
                config.server.question_bank = bank;
            }
            if let Some(bind) = bind {
                config.server.bind = bind;
            }
            if let Some(n) = sample_size {
                config.server.sample_size = n;
            }
            config.validate()?;
            serve(&config).await
        }
        CliCommand::Scoreboard { base_url } => {
            if let Some(url) = base_url {
                config.base_url = url;
            }
            config.validate()?;
            print_scoreboard(&config).await
        }
    }
}

/// Loads configuration from the specified path or default location.
fn load_config(config_path: Option<&str>) -> anyhow::Result<Config> {
    match config_path {
        Some(path_str) => {
            let path = Path::new(path_str);
            if !path.exists() {
                anyhow::bail!(
                    "Config file not found: '{}'\n\nSuggestion: Check the path or remove the --config flag to use defaults",
                    path.display()
                );
            }
            Config::load_from_file(path).map_err(|e| anyhow::anyhow!("{e}"))
        }
        None => Config::load().map_err(|e| anyhow::anyhow!("{e}")),
    }
}

// ============================================================================
// play
// ============================================================================

/// Runs the interactive quiz until the player quits, stdin closes or Ctrl+C.
async fn play(config: &Config, report_path: Option<&Path>) -> anyhow::Result<()> {
    let backend = HttpBackend::from_config(config)?;
    tracing::info!(backend = %config.base_url, "Quiz backend");

    let mut driver = QuizDriver::new(QuizSession::new(&config.topic), backend);
    let mut renderer = TerminalRenderer::new(&config.topic);

    print_lines(&renderer.render(&Effect::ShowScreen(Screen::Start)));

    let period = Duration::from_millis(config.tick_millis);
    let mut ticker = interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            Ok(()) = tokio::signal::ctrl_c() => {
                tracing::info!("Received Ctrl+C, shutting down");
                break;
            }
            _ = ticker.tick() => {
                let effects = driver.tick();
                print_lines(&renderer.render_all(&effects));
            }
            line = lines.next_line() => {
                let Some(line) = line? else {
                    tracing::debug!("stdin closed");
                    break;
                };

                let state = driver.session().state();
                let outcome = match input::parse(&line, state) {
                    Command::Quit => break,
                    Command::Unknown => {
                        println!("{}", input::hint(state));
                        continue;
                    }
                    Command::Start => driver.start().await,
                    Command::Answer(slot) => driver.select(slot).await,
                    Command::Next => driver.next().await,
                    Command::Restart => driver.restart().await,
                };

                match outcome {
                    Ok(effects) => {
                        print_lines(&renderer.render_all(&effects));
                        if let Some(path) = report_path {
                            if let Some(result) = finished_result(&effects) {
                                write_report(config, &driver, result, path).await;
                            }
                        }
                    }
                    Err(e) if !e.is_fatal() => {
                        tracing::debug!(error = %e, "Ignored input");
                        println!("{}", input::hint(driver.session().state()));
                    }
                    Err(e) => return Err(e.into()),
                }
            }
        }
    }

    if driver.session().state().is_active() {
        println!("Quiz abandoned after {}.", driver.session().timer().clock());
    }
    Ok(())
}

fn print_lines(lines: &[String]) {
    for line in lines {
        println!("{line}");
    }
}

fn finished_result(effects: &[Effect]) -> Option<&QuizResult> {
    effects.iter().find_map(|e| match e {
        Effect::ShowResult(result) => Some(result),
        _ => None,
    })
}

/// Writes the JSON report; failures are reported but do not end the game.
async fn write_report(
    config: &Config,
    driver: &QuizDriver<HttpBackend>,
    result: &QuizResult,
    path: &Path,
) {
    let scoreboard = match driver.backend().fetch_scoreboard().await {
        Ok(entries) => score_rows(&entries),
        Err(e) => {
            tracing::warn!(error = %e, "Scoreboard unavailable, report written without it");
            Vec::new()
        }
    };

    let report = Report::new(&config.topic, result_summary(result)).with_scoreboard(scoreboard);
    let written = if is_markdown(path) {
        std::fs::write(path, MarkdownGenerator::new(&report).generate()).map_err(ReportError::from)
    } else {
        JsonGenerator::new(&report).write_to_file(path, true)
    };
    match written {
        Ok(()) => println!("Report written to {}", path.display()),
        Err(e) => tracing::error!(error = %e, path = %path.display(), "Failed to write report"),
    }
}

fn is_markdown(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("md"))
}

fn result_summary(result: &QuizResult) -> ResultSummary {
    ResultSummary {
        score: result.score,
        total: result.total,
        percentage: result.percentage,
        band: result.band.to_string(),
        message: result.message.clone(),
        time_taken: result.time_taken,
        final_time: result.final_time.clone(),
        is_new_high_score: result.is_new_high_score,
    }
}

fn score_rows(entries: &[ScoreboardEntry]) -> Vec<ScoreRow> {
    entries
        .iter()
        .map(|e| ScoreRow {
            rank: e.rank,
            score: e.score,
            time_taken: e.time_taken,
            date_completed: e.date_completed,
        })
        .collect()
}

// ============================================================================
// serve
// ============================================================================

/// Serves the practice backend until Ctrl+C.
async fn serve(config: &Config) -> anyhow::Result<()> {
    let bank = QuestionBank::load(&config.server.question_bank)?;
    println!(
        "Loaded {} questions from {}",
        bank.len(),
        config.server.question_bank
    );

    let router = create_router(AppState::new(bank, config.server.sample_size));

    let listener = TcpListener::bind(&config.server.bind).await.map_err(|e| {
        anyhow::anyhow!(
            "Failed to bind to {}: {e}\n\nSuggestion: Try a different address with --bind",
            config.server.bind
        )
    })?;

    let addr = listener.local_addr()?;
    println!("Practice server running on http://{addr}");
    println!("Press Ctrl+C to stop");
    tracing::info!(%addr, sample_size = config.server.sample_size, "Practice server started");

    axum::serve(listener, router)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("Received Ctrl+C, shutting down");
        })
        .await?;

    Ok(())
}

// ============================================================================
// scoreboard
// ============================================================================

async fn print_scoreboard(config: &Config) -> anyhow::Result<()> {
    let backend = HttpBackend::from_config(config)?;
    let entries = backend.fetch_scoreboard().await?;
    print!("{}", scoreboard_table(&score_rows(&entries)));
    Ok(())
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use quizloop_session::ResultBand;

    use super::*;

    #[test]
    fn test_args_parse_play_with_globals() {
        let args = Args::parse_from([
            "quizloop",
            "play",
            "--base-url",
            "http://quiz.test",
            "-v",
            "--report",
            "out.json",
        ]);
        assert!(args.verbose);
        match args.command {
            CliCommand::Play { base_url, report } => {
                assert_eq!(base_url.as_deref(), Some("http://quiz.test"));
                assert_eq!(report, Some(PathBuf::from("out.json")));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_args_parse_serve() {
        let args = Args::parse_from(["quizloop", "-c", "q.json", "serve", "--sample-size", "4"]);
        assert_eq!(args.config.as_deref(), Some("q.json"));
        assert!(matches!(
            args.command,
            CliCommand::Serve {
                sample_size: Some(4),
                ..
            }
        ));
    }

    #[test]
    fn test_result_summary_copies_figures() {
        let result = QuizResult {
            score: 3,
            total: 5,
            percentage: 60.0,
            band: ResultBand::Good,
            message: ResultBand::Good.message("recycling"),
            time_taken: 70,
            final_time: "01:10".to_string(),
            is_new_high_score: false,
        };
        let summary = result_summary(&result);
        assert_eq!(summary.band, "good");
        assert_eq!(summary.final_time, "01:10");
        assert_eq!(summary.score, 3);
    }

    #[test]
    fn test_report_format_follows_extension() {
        assert!(is_markdown(Path::new("result.md")));
        assert!(is_markdown(Path::new("out/RESULT.MD")));
        assert!(!is_markdown(Path::new("result.json")));
        assert!(!is_markdown(Path::new("result")));
    }

    #[test]
    fn test_finished_result_finds_show_result() {
        assert!(finished_result(&[Effect::HideFeedback]).is_none());
    }
}
