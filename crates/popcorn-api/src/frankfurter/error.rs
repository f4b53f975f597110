use thiserror::Error;

use crate::traits::{Classify, FetchFailure};

/// Errors from the Frankfurter exchange-rate client.
#[derive(Debug, Error)]
pub enum FrankfurterError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("parse error: {0}")]
    Parse(String),

    #[error("request cancelled")]
    Cancelled,
}

impl Classify for FrankfurterError {
    fn classify(&self) -> FetchFailure {
        match self {
            Self::Cancelled => FetchFailure::Cancelled,
            Self::Http(e) if e.is_connect() || e.is_timeout() => FetchFailure::Offline,
            Self::Http(e) => FetchFailure::Other(e.to_string()),
            Self::Api { status, .. } => FetchFailure::Status(*status),
            Self::Parse(message) => FetchFailure::Other(message.clone()),
        }
    }
}
