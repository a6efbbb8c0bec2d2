//! Error taxonomy for calls against the exchange rate API.

use crate::providers::api_error::ApiError;
use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// The request URL could not be composed. Never reaches the network.
    #[error("Invalid request URL: {0}")]
    Url(#[from] url::ParseError),

    /// The request path holds control characters or a broken `%` escape.
    #[error("Invalid request path: {0:?}")]
    InvalidPath(String),

    /// Network failure, timeout or TLS error reported by the HTTP client.
    #[error("Request error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The server answered outside of the 2xx range.
    #[error("HTTP error: {status}{}", .api.as_ref().map(|e| format!(" ({e})")).unwrap_or_default())]
    Status {
        status: StatusCode,
        api: Option<ApiError>,
    },

    /// The response body was not valid JSON for the expected payload.
    #[error("Failed to parse JSON response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error(transparent)]
    Api(#[from] ApiError),

    /// A caller supplied deadline expired before the response arrived.
    #[error("Request cancelled: deadline elapsed")]
    Cancelled,
}

impl Error {
    /// The API level error carried by this error, if the service reported one.
    pub fn api_error(&self) -> Option<&ApiError> {
        match self {
            Error::Api(e) => Some(e),
            Error::Status { api, .. } => api.as_ref(),
            _ => None,
        }
    }

    pub fn is_timeout(&self) -> bool {
        match self {
            Error::Transport(e) => e.is_timeout(),
            Error::Cancelled => true,
            _ => false,
        }
    }
}
