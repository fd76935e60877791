//! HTTP implementation of [`QuizBackend`].

use std::future::Future;
use std::time::Duration;

use quizloop_session::{
    Config, Question, ScoreboardEntry, SubmissionOutcome, SubmitScoreRequest, SubmitScoreResponse,
};
use reqwest::{Client, Response};
use tracing::{error, info, instrument};

use crate::{ClientError, QuizBackend};

/// Quiz backend reached over HTTP.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: Client,
    questions_url: String,
    submit_score_url: String,
    scoreboard_url: String,
}

impl HttpBackend {
    /// Builds a backend from the endpoint settings in `config`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidUrl`] if an endpoint URL does not parse,
    /// and [`ClientError::Http`] if the HTTP client cannot be built.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use quizloop_client::HttpBackend;
    /// use quizloop_session::Config;
    ///
    /// # fn example() -> Result<(), quizloop_client::ClientError> {
    /// let backend = HttpBackend::from_config(&Config::default())?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn from_config(config: &Config) -> Result<Self, ClientError> {
        let questions_url = checked_url(config.questions_url())?;
        let submit_score_url = checked_url(config.submit_score_url())?;
        let scoreboard_url = checked_url(config.scoreboard_url())?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self {
            client,
            questions_url,
            submit_score_url,
            scoreboard_url,
        })
    }

    /// URL of the question list endpoint.
    #[must_use]
    pub fn questions_url(&self) -> &str {
        &self.questions_url
    }

    /// Fetches the ranked scoreboard.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, a non-success status, or a body
    /// that does not decode.
    #[instrument(skip(self))]
    pub async fn fetch_scoreboard(&self) -> Result<Vec<ScoreboardEntry>, ClientError> {
        let response = self.client.get(&self.scoreboard_url).send().await;
        let entries: Vec<ScoreboardEntry> = decode(&self.scoreboard_url, response).await?;
        info!(entries = entries.len(), "Scoreboard fetched");
        Ok(entries)
    }

    async fn get_questions(&self) -> Result<Vec<Question>, ClientError> {
        let response = self.client.get(&self.questions_url).send().await;
        let questions: Vec<Question> = decode(&self.questions_url, response).await?;
        info!(count = questions.len(), "Questions fetched");
        Ok(questions)
    }

    async fn post_score(&self, score: u32, time_taken: u64) -> Result<SubmissionOutcome, ClientError> {
        let response = self
            .client
            .post(&self.submit_score_url)
            .json(&SubmitScoreRequest { score, time_taken })
            .send()
            .await;
        let body: SubmitScoreResponse = decode(&self.submit_score_url, response).await?;
        info!(
            score,
            time_taken,
            is_new_high_score = body.is_new_high_score,
            "Score submitted"
        );
        Ok(SubmissionOutcome {
            is_new_high_score: body.is_new_high_score,
        })
    }
}

impl QuizBackend for HttpBackend {
    fn fetch_questions(&self) -> impl Future<Output = Result<Vec<Question>, ClientError>> + Send {
        self.get_questions()
    }

    fn submit_score(
        &self,
        score: u32,
        time_taken: u64,
    ) -> impl Future<Output = Result<SubmissionOutcome, ClientError>> + Send {
        self.post_score(score, time_taken)
    }
}

fn checked_url(raw: String) -> Result<String, ClientError> {
    match url::Url::parse(&raw) {
        Ok(_) => Ok(raw),
        Err(e) => Err(ClientError::InvalidUrl {
            url: raw,
            message: e.to_string(),
        }),
    }
}

/// Checks the status and decodes a JSON body, logging any failure.
async fn decode<T: serde::de::DeserializeOwned>(
    endpoint: &str,
    response: reqwest::Result<Response>,
) -> Result<T, ClientError> {
    let result = match response {
        Ok(response) if !response.status().is_success() => Err(ClientError::Status {
            endpoint: endpoint.to_string(),
            status: response.status().as_u16(),
        }),
        Ok(response) => response.json::<T>().await.map_err(ClientError::from),
        Err(e) => Err(ClientError::from(e)),
    };

    if let Err(e) = &result {
        error!(endpoint, error = %e, transient = e.is_transient(), "Quiz backend request failed");
    }
    result
}
