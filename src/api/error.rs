//! Errors returned by the posts API client

use thiserror::Error;

/// Failure talking to the posts API
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request timed out")]
    Timeout,

    #[error("connection failed: {0}")]
    Connection(String),

    #[error("API responded with status {0}")]
    Status(u16),

    #[error("post not found")]
    NotFound,

    #[error("unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ApiError {
    /// The record does not exist
    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::NotFound)
    }

    /// Timeouts, connection errors, non-2xx statuses and unreadable bodies
    pub fn is_network_failure(&self) -> bool {
        !self.is_not_found()
    }
}
