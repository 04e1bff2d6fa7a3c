use thiserror::Error;

use trainer_core::model::RecordError;

/// Fallback message when the backend gives no usable error body.
pub const GENERIC_FAILURE: &str = "API request failed";

/// Errors surfaced by backend adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum BackendError {
    #[error("Request timeout")]
    Timeout,

    #[error("{message}")]
    Status {
        status: reqwest::StatusCode,
        message: String,
    },

    #[error("not found")]
    NotFound,

    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error("could not decode backend response: {0}")]
    Decode(String),

    #[error(transparent)]
    Record(#[from] RecordError),

    #[error("backend state unavailable: {0}")]
    Unavailable(String),
}

impl BackendError {
    /// True for failures a caller could reasonably retry.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Timeout | Self::Unavailable(_) => true,
            Self::Status { status, .. } => status.is_server_error(),
            Self::Http(err) => err.is_connect() || err.is_timeout(),
            Self::NotFound | Self::Decode(_) | Self::Record(_) => false,
        }
    }
}
