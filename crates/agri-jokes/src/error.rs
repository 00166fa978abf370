//! Joke client error types.
//!
//! Display strings are shown to users verbatim.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum JokeError {
    #[error("The operation was canceled.")]
    Cancelled,

    /// Transport failure or non-success status.
    #[error("Request error: {0}")]
    Request(String),

    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

impl JokeError {
    /// Classify a reqwest failure.
    ///
    /// Builder errors (e.g. an unusable URL) never reach the network and are
    /// reported as unexpected.
    pub fn from_reqwest(err: reqwest::Error) -> Self {
        if err.is_builder() {
            Self::Unexpected(err.to_string())
        } else {
            Self::Request(err.to_string())
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}
