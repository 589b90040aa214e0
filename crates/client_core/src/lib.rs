//! HTTP client for the remote PDF summarization service.
//!
//! One operation matters here: post a document as a single multipart part
//! named `file` and hand back the `message` field of the JSON response,
//! verbatim. Anything else the service says is an error.

use std::time::Duration;

use reqwest::{multipart, Client};
use shared::protocol::SummaryResponse;
use tracing::{debug, warn};

pub mod error;

pub use error::TransferError;
pub use reqwest::StatusCode;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

const UPLOAD_FIELD_NAME: &str = "file";
const REJECTED_BODY_MAX_CHARS: usize = 200;

/// Connection settings for [`SummarizeClient`].
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub request_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

/// Thin wrapper over a pooled HTTP client; cheap to share across tasks.
pub struct SummarizeClient {
    http: Client,
    base_url: String,
}

impl SummarizeClient {
    /// Builds a client with the configured timeout baked into the pool.
    /// The timeout covers the whole exchange, body included.
    pub fn new(config: &ClientConfig) -> Result<Self, TransferError> {
        let http = Client::builder().timeout(config.request_timeout).build()?;
        Ok(Self {
            http,
            base_url: normalize_base_url(&config.base_url),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Submits one document and returns the service's summary text.
    ///
    /// Exactly one POST per call; retries are the caller's decision and the
    /// desktop app never makes them.
    pub async fn submit_document(
        &self,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> Result<String, TransferError> {
        let mime_type = mime_guess::from_path(file_name).first_or_octet_stream();
        let size_bytes = bytes.len();
        let part = multipart::Part::bytes(bytes)
            .file_name(file_name.to_string())
            .mime_str(mime_type.essence_str())?;
        let form = multipart::Form::new().part(UPLOAD_FIELD_NAME, part);

        debug!(
            file = file_name,
            size_bytes,
            mime = %mime_type,
            "posting document to summarizer"
        );
        let response = self
            .http
            .post(format!("{}/upload", self.base_url))
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = condense_body(&response.text().await.unwrap_or_default());
            warn!(%status, body = %body, "summarizer rejected the document");
            return Err(TransferError::Rejected { status, body });
        }

        let raw = response.bytes().await?;
        let parsed: SummaryResponse =
            serde_json::from_slice(&raw).map_err(|err| TransferError::Payload(err.to_string()))?;
        Ok(parsed.message)
    }
}

fn normalize_base_url(base_url: &str) -> String {
    base_url.trim().trim_end_matches('/').to_string()
}

/// Bounds a rejection body so it stays loggable. Truncation is by character,
/// never mid-codepoint.
fn condense_body(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.chars().count() <= REJECTED_BODY_MAX_CHARS {
        return trimmed.to_string();
    }
    let head: String = trimmed.chars().take(REJECTED_BODY_MAX_CHARS).collect();
    format!("{head}...")
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
