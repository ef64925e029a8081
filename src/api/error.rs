use reqwest::StatusCode;
use thiserror::Error;

use crate::retry::RetryClassify;

/// Errors from the data backend and the generative backend
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Not logged in")]
    NotAuthenticated,

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Not authorized: {0}")]
    Unauthorized(String),

    #[error("Rate limited (429): {0}")]
    RateLimited(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Response failed validation: {0}")]
    ValidationFailure(String),

    #[error("Server error: {0}")]
    ServerError(String),

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl ApiError {
    pub fn from_status(status: StatusCode, message: String) -> Self {
        let msg = if message.is_empty() {
            status.canonical_reason().unwrap_or("Unknown error").to_string()
        } else {
            message
        };

        match status {
            StatusCode::UNAUTHORIZED => ApiError::Unauthorized(msg),
            StatusCode::FORBIDDEN => ApiError::Unauthorized(msg),
            StatusCode::TOO_MANY_REQUESTS => ApiError::RateLimited(msg),
            StatusCode::NOT_FOUND => ApiError::NotFound(msg),
            StatusCode::BAD_REQUEST => ApiError::BadRequest(msg),
            status if status.is_server_error() => ApiError::ServerError(msg),
            status if status.is_client_error() => ApiError::BadRequest(msg),
            _ => ApiError::Unknown(msg),
        }
    }

    /// Whether the held session token should be dropped
    pub fn is_auth_failure(&self) -> bool {
        matches!(self, ApiError::Unauthorized(_) | ApiError::NotAuthenticated)
    }

    /// Message suitable for showing to the user, with a retry hint where one helps
    pub fn user_message(&self) -> String {
        match self {
            ApiError::RateLimited(_) => {
                "The AI service is busy right now. Please try again later.".to_string()
            }
            ApiError::Unauthorized(_) | ApiError::NotAuthenticated => {
                "Your session has expired. Please log in again.".to_string()
            }
            ApiError::ValidationFailure(_) => "Generation failed, please retry.".to_string(),
            ApiError::NetworkError(_) => {
                "Could not reach the server. Check your connection and retry.".to_string()
            }
            other => other.to_string(),
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        match err.status() {
            Some(status) => ApiError::from_status(status, err.to_string()),
            None if err.is_decode() => ApiError::ValidationFailure(err.to_string()),
            None => ApiError::NetworkError(err.to_string()),
        }
    }
}

impl RetryClassify for ApiError {
    fn is_rate_limited(&self) -> bool {
        match self {
            ApiError::RateLimited(_) => true,
            other => other.to_string().contains("429"),
        }
    }
}
