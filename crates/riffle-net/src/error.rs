#![forbid(unsafe_code)]

use thiserror::Error;

/// Centralized error type for riffle-net.
#[derive(Debug, Error, Clone)]
#[non_exhaustive]
pub enum NetError {
    #[error("HTTP request failed: {0}")]
    Http(String),

    #[error("HTTP {status} for URL: {url}")]
    HttpStatus { status: u16, url: String },

    #[error("request timed out")]
    Timeout,

    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    #[error("malformed payload: {0}")]
    Payload(String),
}

impl NetError {
    /// Creates an HTTP status error.
    pub fn http_status(status: u16, url: impl Into<String>) -> Self {
        Self::HttpStatus {
            status,
            url: url.into(),
        }
    }

    /// Creates an HTTP error from a generic string.
    pub fn http<S: Into<String>>(msg: S) -> Self {
        Self::Http(msg.into())
    }

    /// Creates an invalid-URL error.
    pub fn invalid_url<S: Into<String>>(msg: S) -> Self {
        Self::InvalidUrl(msg.into())
    }

    /// Creates a malformed-payload error.
    pub fn payload<S: Into<String>>(msg: S) -> Self {
        Self::Payload(msg.into())
    }

    /// Gets the HTTP status code if this is an HTTP status error.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            NetError::HttpStatus { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for NetError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::Timeout
        } else {
            Self::Http(error.to_string())
        }
    }
}

pub type NetResult<T> = Result<T, NetError>;
