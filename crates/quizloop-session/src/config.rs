//! Configuration types for quizloop.
//!
//! Settings come from `quizloop.json` in the working directory (or a file
//! named on the command line). Every field has a default, so a missing file
//! is not an error.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{QuizError, Result};

/// The default config file name.
const CONFIG_FILE_NAME: &str = "quizloop.json";

/// Default backend base URL.
fn default_base_url() -> String {
    "http://127.0.0.1:5000".to_string()
}

/// Default question list endpoint path.
fn default_questions_path() -> String {
    "/api/questions".to_string()
}

/// Default score submission endpoint path.
fn default_submit_score_path() -> String {
    "/api/submit-score".to_string()
}

/// Default scoreboard endpoint path.
fn default_scoreboard_path() -> String {
    "/api/scoreboard".to_string()
}

/// Default HTTP request timeout in seconds.
const fn default_request_timeout() -> u64 {
    10
}

/// Default timer tick period in milliseconds.
const fn default_tick_millis() -> u64 {
    1000
}

/// Default quiz topic used in result messages.
fn default_topic() -> String {
    "general knowledge".to_string()
}

/// Default practice server bind address.
fn default_bind() -> String {
    "127.0.0.1:5000".to_string()
}

/// Default question bank file for the practice server.
fn default_question_bank() -> String {
    "questions.json".to_string()
}

/// Default number of questions served per quiz.
const fn default_sample_size() -> usize {
    10
}

/// Main configuration for quizloop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Base URL of the quiz backend.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Path of the question list endpoint.
    #[serde(default = "default_questions_path")]
    pub questions_path: String,

    /// Path of the score submission endpoint.
    #[serde(default = "default_submit_score_path")]
    pub submit_score_path: String,

    /// Path of the scoreboard endpoint.
    #[serde(default = "default_scoreboard_path")]
    pub scoreboard_path: String,

    /// Timeout for each HTTP request in seconds.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Period of the quiz timer in milliseconds.
    #[serde(default = "default_tick_millis")]
    pub tick_millis: u64,

    /// Topic named in result messages.
    #[serde(default = "default_topic")]
    pub topic: String,

    /// Practice server settings.
    #[serde(default)]
    pub server: ServerConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            questions_path: default_questions_path(),
            submit_score_path: default_submit_score_path(),
            scoreboard_path: default_scoreboard_path(),
            request_timeout_secs: default_request_timeout(),
            tick_millis: default_tick_millis(),
            topic: default_topic(),
            server: ServerConfig::default(),
        }
    }
}

impl Config {
    /// Loads configuration from the current working directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but is invalid.
    pub fn load() -> Result<Self> {
        let current_dir = std::env::current_dir().map_err(|e| {
            QuizError::config_parse(
                "<current directory>",
                format!("cannot determine current directory: {e}"),
            )
        })?;
        Self::load_from_dir(&current_dir)
    }

    /// Loads `quizloop.json` from a specific directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but is invalid.
    pub fn load_from_dir(dir: &Path) -> Result<Self> {
        Self::load_from_file(&dir.join(CONFIG_FILE_NAME))
    }

    /// Loads configuration from a specific file path.
    ///
    /// If the file does not exist, returns default configuration.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::ConfigParseError` if the file exists but cannot be
    /// read or contains invalid JSON.
    ///
    /// Returns `QuizError::ConfigValidationError` if the values are invalid.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let config = Self::default();
                config.validate()?;
                return Ok(config);
            }
            Err(e) => {
                return Err(QuizError::config_parse(
                    path,
                    format!("failed to read file: {e}"),
                ));
            }
        };

        let config: Self = serde_json::from_str(&contents)
            .map_err(|e| QuizError::config_parse(path, e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration values.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::ConfigValidationError` naming the first bad field.
    pub fn validate(&self) -> Result<()> {
        if self.base_url.trim().is_empty() {
            return Err(QuizError::config_validation(
                "baseUrl must not be empty",
                "Set baseUrl to the quiz backend, e.g. http://127.0.0.1:5000",
            ));
        }

        if let Err(e) = url::Url::parse(&self.base_url) {
            return Err(QuizError::config_validation(
                format!("baseUrl '{}' is not a valid URL: {e}", self.base_url),
                "Include the scheme, e.g. http://127.0.0.1:5000",
            ));
        }

        for (field, value) in [
            ("questionsPath", &self.questions_path),
            ("submitScorePath", &self.submit_score_path),
            ("scoreboardPath", &self.scoreboard_path),
        ] {
            if !value.starts_with('/') {
                return Err(QuizError::config_validation(
                    format!("{field} must start with '/'"),
                    format!("Set {field} to an absolute path such as /api/..."),
                ));
            }
        }

        if self.request_timeout_secs == 0 {
            return Err(QuizError::config_validation(
                "requestTimeoutSecs must be greater than 0",
                "Set requestTimeoutSecs to at least 1 second in your quizloop.json",
            ));
        }

        if self.tick_millis == 0 {
            return Err(QuizError::config_validation(
                "tickMillis must be greater than 0",
                "Set tickMillis to 1000 for a one-second timer",
            ));
        }

        if self.topic.trim().is_empty() {
            return Err(QuizError::config_validation(
                "topic must not be empty",
                "Name the quiz topic in your quizloop.json",
            ));
        }

        self.server.validate()
    }

    /// Full URL of the question list endpoint.
    #[must_use]
    pub fn questions_url(&self) -> String {
        self.endpoint(&self.questions_path)
    }

    /// Full URL of the score submission endpoint.
    #[must_use]
    pub fn submit_score_url(&self) -> String {
        self.endpoint(&self.submit_score_path)
    }

    /// Full URL of the scoreboard endpoint.
    #[must_use]
    pub fn scoreboard_url(&self) -> String {
        self.endpoint(&self.scoreboard_path)
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.base_url.trim_end_matches('/'))
    }
}

/// Practice server configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerConfig {
    /// Address to bind to.
    #[serde(default = "default_bind")]
    pub bind: String,

    /// Question bank file.
    #[serde(default = "default_question_bank")]
    pub question_bank: String,

    /// Number of questions served per quiz.
    #[serde(default = "default_sample_size")]
    pub sample_size: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            question_bank: default_question_bank(),
            sample_size: default_sample_size(),
        }
    }
}

impl ServerConfig {
    /// Validates the server settings.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::ConfigValidationError` naming the first bad field.
    pub fn validate(&self) -> Result<()> {
        if self.bind.trim().is_empty() {
            return Err(QuizError::config_validation(
                "server.bind must not be empty",
                "Set server.bind to an address such as 127.0.0.1:5000",
            ));
        }

        if self.question_bank.trim().is_empty() {
            return Err(QuizError::config_validation(
                "server.questionBank must not be empty",
                "Point server.questionBank at a JSON question file",
            ));
        }

        if self.sample_size == 0 {
            return Err(QuizError::config_validation(
                "server.sampleSize must be greater than 0",
                "Set server.sampleSize to at least 1 in your quizloop.json",
            ));
        }

        Ok(())
    }
}
