//! Error types for the search client and report writers

use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error(
        "Missing credentials: set X_CONSUMER_KEY and X_CONSUMER_SECRET (or X_BEARER_TOKEN) in .env or the environment"
    )]
    MissingCredentials,
    #[error("Authentication failed: {0}")]
    Auth(String),
    #[error("Rate limited by search API")]
    RateLimited { retry_after: Option<Duration> },
    #[error("Network error: {0}")]
    Network(String),
    #[error("Unexpected HTTP status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("Malformed API response: {0}")]
    Malformed(String),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Rate limits, network failures and 5xx responses are worth retrying
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::RateLimited { .. } | Error::Network(_) => true,
            Error::Status { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// Authentication problems abort the whole run
    pub fn is_fatal(&self) -> bool {
        matches!(self, Error::MissingCredentials | Error::Auth(_))
    }
}

impl From<reqwest::Error> for Error {
    fn from(error: reqwest::Error) -> Self {
        if error.is_decode() {
            Error::Malformed(error.to_string())
        } else {
            Error::Network(error.to_string())
        }
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
