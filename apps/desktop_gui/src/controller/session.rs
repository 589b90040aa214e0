//! Workflow state for the upload/summarize session.

use shared::domain::TransferId;

/// Which of the three mutually exclusive result panes to show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SummaryView {
    Placeholder,
    Progress,
    Rendered,
}

/// The single mutable record behind the whole workflow.
///
/// Invariant: `is_processing` and a non-empty `result_text` are never both
/// set; starting a transfer clears the previous result first.
#[derive(Debug, Default)]
pub struct UploadSession {
    selected_file_name: String,
    is_processing: bool,
    result_text: String,
    active_transfer: Option<TransferId>,
    transfers_started: i64,
}

impl UploadSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected_file_name(&self) -> &str {
        &self.selected_file_name
    }

    pub fn is_processing(&self) -> bool {
        self.is_processing
    }

    pub fn result_text(&self) -> &str {
        &self.result_text
    }

    /// Records a selection and marks the session as processing.
    ///
    /// Returns the id of the freshly started transfer. Ids keep increasing
    /// for the lifetime of the session, including across [`UploadSession::clear`],
    /// so a completion from before a clear can never match a later transfer.
    pub fn begin_transfer(&mut self, file_name: impl Into<String>) -> TransferId {
        self.transfers_started += 1;
        let transfer = TransferId(self.transfers_started);
        self.selected_file_name = file_name.into();
        self.result_text.clear();
        self.is_processing = true;
        self.active_transfer = Some(transfer);
        transfer
    }

    /// Applies a successful completion. Returns false and changes nothing
    /// when the transfer is no longer the active one.
    pub fn apply_success(&mut self, transfer: TransferId, summary: String) -> bool {
        if self.active_transfer != Some(transfer) {
            return false;
        }
        self.active_transfer = None;
        self.is_processing = false;
        self.result_text = summary;
        true
    }

    /// Applies a failed completion; the result stays empty so the session
    /// lands back on the placeholder. Returns false for stale transfers.
    pub fn apply_failure(&mut self, transfer: TransferId) -> bool {
        if self.active_transfer != Some(transfer) {
            return false;
        }
        self.active_transfer = None;
        self.is_processing = false;
        true
    }

    /// Resets the visible state. An in-flight transfer is not cancelled; its
    /// completion arrives stale and gets dropped.
    pub fn clear(&mut self) {
        self.selected_file_name.clear();
        self.result_text.clear();
        self.is_processing = false;
        self.active_transfer = None;
    }

    /// Copying is offered only when a document is loaded and a result exists.
    pub fn can_copy(&self) -> bool {
        !self.selected_file_name.is_empty() && !self.result_text.is_empty()
    }

    pub fn view(&self) -> SummaryView {
        if self.is_processing {
            SummaryView::Progress
        } else if self.result_text.is_empty() {
            SummaryView::Placeholder
        } else {
            SummaryView::Rendered
        }
    }
}
