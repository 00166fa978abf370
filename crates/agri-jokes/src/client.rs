//! Random joke client with simulated latency.

use std::time::Duration;

use agri_core::config::{DEFAULT_JOKE_BASE_URL, DEFAULT_JOKE_DELAY_MS};
use agri_core::JokeConfig;
use reqwest::Client;
use tokio_util::sync::CancellationToken;
use tracing::instrument;

use crate::error::JokeError;
use crate::types::ChuckNorrisJoke;

pub const RANDOM_JOKE_PATH: &str = "/jokes/random";

/// Wait applied before every request unless configured otherwise.
pub const DEFAULT_JOKE_DELAY: Duration = Duration::from_millis(DEFAULT_JOKE_DELAY_MS);

#[derive(Debug, Clone)]
pub struct JokeClientConfig {
    pub base_url: String,

    /// Artificial latency before the request is sent
    pub delay: Duration,
}

impl Default for JokeClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_JOKE_BASE_URL.to_string(),
            delay: DEFAULT_JOKE_DELAY,
        }
    }
}

impl From<&JokeConfig> for JokeClientConfig {
    fn from(config: &JokeConfig) -> Self {
        Self {
            base_url: config.base_url.clone(),
            delay: config.delay(),
        }
    }
}

pub struct JokeClient {
    client: Client,
    base_url: String,
    delay: Duration,
}

impl JokeClient {
    pub fn new(config: JokeClientConfig) -> Self {
        Self {
            client: Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            delay: config.delay,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Wait for the configured delay, then fetch one random joke.
    ///
    /// Failures are returned, never raised: cancelling `cancel` during the
    /// delay or the request yields [`JokeError::Cancelled`] and, if it fires
    /// during the delay, no request is sent.
    #[instrument(skip(self, cancel), level = "info")]
    pub async fn get_random_joke(
        &self,
        cancel: &CancellationToken,
    ) -> Result<ChuckNorrisJoke, JokeError> {
        if cancel.is_cancelled() {
            return Err(JokeError::Cancelled);
        }

        let result = tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(JokeError::Cancelled),
            result = self.delayed_fetch() => result,
        };

        match &result {
            Ok(joke) => tracing::debug!("Fetched joke {}", joke.id),
            Err(e) => tracing::warn!("{}", e),
        }
        result
    }

    async fn delayed_fetch(&self) -> Result<ChuckNorrisJoke, JokeError> {
        tokio::time::sleep(self.delay).await;
        self.fetch().await
    }

    async fn fetch(&self) -> Result<ChuckNorrisJoke, JokeError> {
        let url = format!("{}{}", self.base_url, RANDOM_JOKE_PATH);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(JokeError::from_reqwest)?
            .error_for_status()
            .map_err(JokeError::from_reqwest)?;

        let body = response.bytes().await.map_err(JokeError::from_reqwest)?;

        serde_json::from_slice(&body).map_err(|e| JokeError::Unexpected(e.to_string()))
    }
}
