//! Typed failures for exchanges with the summarization service.

use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TransferError {
    /// No usable response: connect failures, request-build problems, or the
    /// configured timeout elapsing.
    #[error("summarizer request failed: {0}")]
    Request(#[from] reqwest::Error),
    /// The service answered with a non-2xx status.
    #[error("summarizer returned status {status}")]
    Rejected {
        status: StatusCode,
        /// Condensed response body, kept for logs and diagnostics.
        body: String,
    },
    /// A 2xx response whose body did not match the documented shape.
    #[error("unexpected summarizer payload: {0}")]
    Payload(String),
}

impl TransferError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Request(err) if err.is_timeout())
    }
}
