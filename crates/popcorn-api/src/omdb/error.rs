use thiserror::Error;

use crate::traits::{Classify, FetchFailure};

/// Errors from the OMDb API client.
#[derive(Debug, Error)]
pub enum OmdbError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    /// `Response: "False"` on an otherwise successful reply.
    #[error("{0}")]
    NotFound(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("request cancelled")]
    Cancelled,
}

impl Classify for OmdbError {
    fn classify(&self) -> FetchFailure {
        match self {
            Self::Cancelled => FetchFailure::Cancelled,
            Self::Http(e) if e.is_connect() || e.is_timeout() => FetchFailure::Offline,
            Self::Http(e) => FetchFailure::Other(e.to_string()),
            Self::Api { status, .. } => FetchFailure::Status(*status),
            Self::NotFound(message) => FetchFailure::Provider(message.clone()),
            Self::Parse(message) => FetchFailure::Other(message.clone()),
        }
    }
}
