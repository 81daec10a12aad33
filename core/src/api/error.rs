//! Error types for analytics API calls

use thiserror::Error;

/// Errors raised by the analytics API client.
///
/// `Status` and `Embedded` display exactly the server-supplied message.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid API base URL '{url}'")]
    InvalidBaseUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("failed to build HTTP client")]
    ClientBuild(#[source] reqwest::Error),

    #[error("request to {path} failed")]
    Transport {
        path: &'static str,
        #[source]
        source: reqwest::Error,
    },

    /// Non-success HTTP status
    #[error("{message}")]
    Status { status: u16, message: String },

    /// Success status, but the body carries an error code and message
    #[error("{message}")]
    Embedded { code: String, message: String },

    #[error("invalid JSON in response from {path}")]
    Decode {
        path: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

impl ApiError {
    /// Human-readable message suitable for a toast or status line
    pub fn message(&self) -> String {
        self.to_string()
    }

    /// HTTP status of the failed response, when there was one
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            ApiError::Transport { source, .. } => source.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}
