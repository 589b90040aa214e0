//! Backend commands queued from UI to backend worker.

use shared::domain::TransferId;
use std::path::PathBuf;

pub enum BackendCommand {
    SubmitDocument {
        transfer: TransferId,
        path: PathBuf,
    },
}
