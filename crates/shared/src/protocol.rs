use serde::{Deserialize, Serialize};

/// Success payload for `POST /upload` on the summarization service.
///
/// The service is free to attach extra fields; only `message` is required,
/// and it reaches the user verbatim.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryResponse {
    pub message: String,
}
