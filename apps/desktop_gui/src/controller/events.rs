//! UI/backend events and error modeling for the desktop controller.

use client_core::TransferError;
use shared::domain::TransferId;

pub enum UiEvent {
    Info(String),
    SummaryReady {
        transfer: TransferId,
        summary: String,
    },
    SummaryFailed {
        transfer: TransferId,
        error: UiError,
    },
    Error(UiError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorCategory {
    Transport,
    Service,
    Payload,
    File,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorContext {
    BackendStartup,
    Submit,
}

pub fn err_label(category: UiErrorCategory) -> &'static str {
    match category {
        UiErrorCategory::Transport => "Transport",
        UiErrorCategory::Service => "Service",
        UiErrorCategory::Payload => "Response",
        UiErrorCategory::File => "File",
        UiErrorCategory::Unknown => "Unexpected",
    }
}

#[derive(Debug, Clone)]
pub struct UiError {
    category: UiErrorCategory,
    context: UiErrorContext,
    message: String,
}

impl UiError {
    /// Classifies a free-form failure message by its wording. Used for
    /// failures that never went through [`TransferError`], like local reads.
    pub fn from_message(context: UiErrorContext, message: impl Into<String>) -> Self {
        let message = message.into();
        let message_lower = message.to_ascii_lowercase();
        let category = if message_lower.contains("could not read")
            || message_lower.contains("no such file")
            || message_lower.contains("permission denied")
        {
            UiErrorCategory::File
        } else if message_lower.contains("timed out")
            || message_lower.contains("timeout")
            || message_lower.contains("connect")
            || message_lower.contains("network")
            || message_lower.contains("dns")
            || message_lower.contains("unreachable")
        {
            UiErrorCategory::Transport
        } else if message_lower.contains("status") || message_lower.contains("rejected") {
            UiErrorCategory::Service
        } else if message_lower.contains("payload")
            || message_lower.contains("missing")
            || message_lower.contains("malformed")
            || message_lower.contains("unexpected")
        {
            UiErrorCategory::Payload
        } else {
            UiErrorCategory::Unknown
        };

        Self {
            category,
            context,
            message,
        }
    }

    /// Maps a typed transfer failure onto its category; no string sniffing.
    pub fn from_transfer(context: UiErrorContext, err: &TransferError) -> Self {
        let category = match err {
            TransferError::Request(_) => UiErrorCategory::Transport,
            TransferError::Rejected { .. } => UiErrorCategory::Service,
            TransferError::Payload(_) => UiErrorCategory::Payload,
        };
        Self {
            category,
            context,
            message: err.to_string(),
        }
    }

    pub fn category(&self) -> UiErrorCategory {
        self.category
    }

    pub fn context(&self) -> UiErrorContext {
        self.context
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use client_core::StatusCode;

    #[test]
    fn typed_rejection_maps_to_service_category() {
        let err = TransferError::Rejected {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            body: "boom".to_string(),
        };
        let ui_err = UiError::from_transfer(UiErrorContext::Submit, &err);
        assert_eq!(ui_err.category(), UiErrorCategory::Service);
        assert_eq!(ui_err.context(), UiErrorContext::Submit);
        assert!(ui_err.message().contains("500"));
    }

    #[test]
    fn typed_payload_failure_maps_to_payload_category() {
        let err = TransferError::Payload("missing field `message`".to_string());
        let ui_err = UiError::from_transfer(UiErrorContext::Submit, &err);
        assert_eq!(ui_err.category(), UiErrorCategory::Payload);
    }

    #[test]
    fn classifies_local_read_failures_as_file_errors() {
        let ui_err = UiError::from_message(
            UiErrorContext::Submit,
            "could not read 'report.pdf': No such file or directory (os error 2)",
        );
        assert_eq!(ui_err.category(), UiErrorCategory::File);
    }

    #[test]
    fn classifies_connection_wording_as_transport() {
        let ui_err = UiError::from_message(
            UiErrorContext::Submit,
            "tcp connect error: Connection refused",
        );
        assert_eq!(ui_err.category(), UiErrorCategory::Transport);
    }

    #[test]
    fn unmatched_wording_falls_back_to_unknown() {
        let ui_err = UiError::from_message(UiErrorContext::BackendStartup, "something odd");
        assert_eq!(ui_err.category(), UiErrorCategory::Unknown);
        assert_eq!(err_label(ui_err.category()), "Unexpected");
    }
}
