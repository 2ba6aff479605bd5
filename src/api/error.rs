use super::types::ArticleId;
use thiserror::Error;

/// Errors returned by backend calls.
///
/// All variants collapse into a single failure message for display, but
/// [`ApiError::kind`] keeps them distinguishable for logging and tests.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("Server error: HTTP status {status}")]
    Server { status: u16 },
    #[error("Malformed response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("Malformed response: duplicate article id {0}")]
    DuplicateId(ArticleId),
    #[error("Response too large (exceeds {0} bytes)")]
    ResponseTooLarge(usize),
    #[error("Invalid API base URL: {0}")]
    InvalidBaseUrl(String),
}

/// Coarse failure taxonomy: transport, HTTP status, or response body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Network,
    Server,
    Decode,
}

impl ApiError {
    pub fn kind(&self) -> FailureKind {
        match self {
            ApiError::Network(_) | ApiError::InvalidBaseUrl(_) => FailureKind::Network,
            ApiError::Server { .. } => FailureKind::Server,
            ApiError::Decode(_) | ApiError::DuplicateId(_) | ApiError::ResponseTooLarge(_) => {
                FailureKind::Decode
            }
        }
    }
}
