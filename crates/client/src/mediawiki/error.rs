//! MediaWiki client error types.

use std::sync::Arc;

use wikicache_core::Error;

/// Errors from the MediaWiki client.
#[derive(Debug, Clone, thiserror::Error)]
pub enum MediaWikiError {
    /// Base URL or title could not form a request URL.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// Request timeout.
    #[error("request timeout")]
    Timeout,

    /// Network error.
    #[error("network error: {0}")]
    Network(Arc<reqwest::Error>),

    /// HTTP error response.
    #[error("HTTP error: {status}")]
    HttpError { status: u16 },

    /// Response body is not the expected JSON.
    #[error("parse error: {0}")]
    Parse(String),

    /// Response JSON lacks a required field.
    #[error("missing field in response: {0}")]
    MissingField(&'static str),

    /// The Action API reported an error in its response body.
    #[error("API error {code}: {info}")]
    Api { code: String, info: String },
}

impl MediaWikiError {
    /// Whether the request may succeed if repeated.
    pub fn is_retryable(&self) -> bool {
        match self {
            MediaWikiError::Timeout | MediaWikiError::Network(_) => true,
            MediaWikiError::HttpError { status } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}

impl From<reqwest::Error> for MediaWikiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() { MediaWikiError::Timeout } else { MediaWikiError::Network(Arc::new(err)) }
    }
}

impl From<MediaWikiError> for Error {
    fn from(err: MediaWikiError) -> Self {
        match err {
            MediaWikiError::InvalidUrl(msg) => Error::InvalidInput(msg),
            e @ (MediaWikiError::Timeout | MediaWikiError::Network(_) | MediaWikiError::HttpError { .. }) => {
                Error::RemoteUnavailable(e.to_string())
            }
            e @ (MediaWikiError::Parse(_) | MediaWikiError::MissingField(_) | MediaWikiError::Api { .. }) => {
                Error::MalformedResponse(e.to_string())
            }
        }
    }
}
