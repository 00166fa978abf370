use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{ForecastError, ForecastResult};

/// Maximum summary length, in characters.
pub const MAX_SUMMARY_LEN: usize = 200;

/// A stored weather forecast.
///
/// Serialized as `{"id", "date", "temperatureC", "summary"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct WeatherForecast {
    pub id: i32,
    pub date: NaiveDate,
    pub temperature_c: i32,
    pub summary: Option<String>,
}

impl WeatherForecast {
    /// Temperature in Fahrenheit, truncated to a whole degree.
    ///
    /// Saturates at the `i32` bounds for out-of-range Celsius values.
    pub fn temperature_f(&self) -> i32 {
        let fahrenheit = 32.0 + (f64::from(self.temperature_c) / 0.5556).trunc();
        fahrenheit as i32
    }
}

/// A forecast that has not been stored yet (no id).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewWeatherForecast {
    pub date: NaiveDate,
    pub temperature_c: i32,
    #[serde(default)]
    pub summary: Option<String>,
}

impl NewWeatherForecast {
    /// # Errors
    /// Returns `ForecastError::Validation` if the summary is longer than
    /// [`MAX_SUMMARY_LEN`] characters.
    pub fn validate(&self) -> ForecastResult<()> {
        if let Some(summary) = &self.summary {
            let len = summary.chars().count();
            if len > MAX_SUMMARY_LEN {
                return Err(ForecastError::Validation(format!(
                    "summary is {} characters, maximum is {}",
                    len, MAX_SUMMARY_LEN
                )));
            }
        }
        Ok(())
    }
}
