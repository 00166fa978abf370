//! Forecast API client used by front-end processes.

use std::time::Duration;

use agri_core::{ConfigError, ForecastApiConfig, NetworkError, ReqwestErrorExt};
use reqwest::Client;
use tracing::instrument;
use url::Url;

use crate::error::{ForecastError, ForecastResult};
use crate::model::WeatherForecast;

/// Path of the forecast collection, relative to the API root.
pub const FORECASTS_PATH: &str = "weatherforecasts";

/// Forecast API client configuration
#[derive(Debug, Clone, Default)]
pub struct ForecastApiClientConfig {
    /// API root, e.g. `http://localhost:8080/api`
    pub base_url: Option<String>,

    /// Skip TLS certificate validation (DEVELOPMENT ONLY, debug builds only)
    pub insecure_skip_tls_verify: bool,

    pub timeout: Option<Duration>,
}

impl From<&ForecastApiConfig> for ForecastApiClientConfig {
    fn from(config: &ForecastApiConfig) -> Self {
        Self {
            base_url: config.base_url.clone(),
            insecure_skip_tls_verify: config.insecure_skip_tls_verify,
            timeout: config.timeout_secs.map(Duration::from_secs),
        }
    }
}

/// HTTP client for `GET {base_url}/weatherforecasts`.
#[derive(Debug, Clone)]
pub struct ForecastApiClient {
    client: Client,
    forecasts_url: Url,
}

impl ForecastApiClient {
    /// Create a client with default transport settings.
    ///
    /// # Errors
    /// Fails if `base_url` is blank or not an http(s) URL.
    pub fn new(base_url: &str) -> ForecastResult<Self> {
        Self::new_with_config(ForecastApiClientConfig {
            base_url: Some(base_url.to_string()),
            ..ForecastApiClientConfig::default()
        })
    }

    /// Create a client from explicit configuration.
    ///
    /// A missing base URL fails here rather than on the first request.
    pub fn new_with_config(config: ForecastApiClientConfig) -> ForecastResult<Self> {
        let base_url = config
            .base_url
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| ConfigError::MissingSetting("forecast_api.base_url".to_string()))?;

        let forecasts_url = forecasts_url(base_url)?;

        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        if config.insecure_skip_tls_verify {
            if cfg!(debug_assertions) {
                tracing::warn!(
                    "TLS certificate validation is DISABLED for the forecast API client"
                );
                builder = builder.danger_accept_invalid_certs(true);
            } else {
                tracing::error!(
                    "insecure_skip_tls_verify is ignored in release builds; certificates will be validated"
                );
            }
        }

        let client = builder
            .build()
            .map_err(|e| NetworkError::ConnectionFailed(e.to_string()))?;

        Ok(Self {
            client,
            forecasts_url,
        })
    }

    pub fn forecasts_url(&self) -> &Url {
        &self.forecasts_url
    }

    /// Fetch all forecasts, in the order the API returns them.
    #[instrument(skip(self), level = "info")]
    pub async fn get_forecasts(&self) -> ForecastResult<Vec<WeatherForecast>> {
        let response = self
            .client
            .get(self.forecasts_url.clone())
            .send()
            .await
            .map_err(ReqwestErrorExt::into_network_error)?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ForecastError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let forecasts: Vec<WeatherForecast> = response
            .json()
            .await
            .map_err(|e| ForecastError::InvalidResponse(e.to_string()))?;

        tracing::debug!("Fetched {} forecasts", forecasts.len());
        Ok(forecasts)
    }
}

fn forecasts_url(base_url: &str) -> ForecastResult<Url> {
    let raw = format!("{}/{}", base_url.trim_end_matches('/'), FORECASTS_PATH);
    let url = Url::parse(&raw)
        .map_err(|e| ConfigError::Invalid(format!("forecast_api.base_url: {}", e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::Invalid(format!(
            "forecast_api.base_url must use http or https, got: {}",
            url.scheme()
        ))
        .into());
    }

    Ok(url)
}
