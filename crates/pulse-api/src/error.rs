//! Failure classification for network calls.

use thiserror::Error;

/// Typed failure for a single network call.
///
/// Exactly two kinds exist: HTTP 429 is `RateLimited`; every other
/// non-success status and every transport-level failure is `Unavailable`.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ApiError {
    #[error("Rate limited: {message}")]
    RateLimited { status: u16, message: String },

    #[error("Service unavailable: {message}")]
    Unavailable {
        status: Option<u16>,
        message: String,
    },
}

impl ApiError {
    /// The human-readable message carried by the failure.
    pub fn message(&self) -> &str {
        match self {
            ApiError::RateLimited { message, .. } => message,
            ApiError::Unavailable { message, .. } => message,
        }
    }

    /// The HTTP status, when the failure came from a response.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::RateLimited { status, .. } => Some(*status),
            ApiError::Unavailable { status, .. } => *status,
        }
    }

    pub fn is_rate_limited(&self) -> bool {
        matches!(self, ApiError::RateLimited { .. })
    }

    /// User-friendly message for UI display.
    pub fn user_message(&self) -> &'static str {
        match self {
            ApiError::RateLimited { .. } => "Too many requests. Please wait and try again.",
            ApiError::Unavailable { status: Some(s), .. } if *s >= 500 => {
                "The service is experiencing issues. Please try again later."
            }
            ApiError::Unavailable { status: Some(_), .. } => {
                "The request failed. Please try again."
            }
            ApiError::Unavailable { status: None, .. } => {
                "Network error. Check your connection."
            }
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        let message = if err.is_timeout() {
            "Request timed out".to_string()
        } else if err.is_connect() {
            "Connection failed".to_string()
        } else {
            "Request failed".to_string()
        };
        ApiError::Unavailable {
            status: err.status().map(|s| s.as_u16()),
            message,
        }
    }
}
