//! Runtime bridge between the UI command queue and the summarizer worker.

use std::{path::Path, sync::Arc, thread};

use client_core::{ClientConfig, SummarizeClient};
use crossbeam_channel::{Receiver, Sender};
use shared::domain::TransferId;

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{UiError, UiErrorContext, UiEvent};

/// Spawns the backend worker thread that owns the tokio runtime.
///
/// Each submission runs as its own task, so overlapping transfers proceed
/// concurrently; the session applies only the completion matching its
/// active transfer id.
pub fn launch(config: ClientConfig, cmd_rx: Receiver<BackendCommand>, ui_tx: Sender<UiEvent>) {
    thread::spawn(move || {
        let _ = ui_tx.try_send(UiEvent::Info("Backend worker starting...".to_string()));
        let runtime = match tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(err) => {
                tracing::error!("failed to build backend runtime: {err}");
                let _ = ui_tx.try_send(UiEvent::Error(UiError::from_message(
                    UiErrorContext::BackendStartup,
                    format!("failed to build backend runtime: {err}"),
                )));
                return;
            }
        };

        runtime.block_on(async move {
            let client = match SummarizeClient::new(&config) {
                Ok(client) => Arc::new(client),
                Err(err) => {
                    tracing::error!("failed to build summarizer client: {err}");
                    let _ = ui_tx.try_send(UiEvent::Error(UiError::from_message(
                        UiErrorContext::BackendStartup,
                        format!("failed to build summarizer client: {err}"),
                    )));
                    return;
                }
            };
            tracing::info!(base_url = client.base_url(), "backend worker ready");
            let _ = ui_tx.try_send(UiEvent::Info("Backend worker ready".to_string()));

            while let Ok(cmd) = cmd_rx.recv() {
                match cmd {
                    BackendCommand::SubmitDocument { transfer, path } => {
                        let client = Arc::clone(&client);
                        let ui_tx = ui_tx.clone();
                        tokio::spawn(async move {
                            let event = run_submission(&client, transfer, &path).await;
                            let _ = ui_tx.try_send(event);
                        });
                    }
                }
            }
            tracing::info!("ui command queue closed; backend worker exiting");
        });
    });
}

async fn run_submission(client: &SummarizeClient, transfer: TransferId, path: &Path) -> UiEvent {
    let file_name = display_file_name(path);
    tracing::info!(transfer = transfer.0, file = %path.display(), "submitting document");

    let bytes = match tokio::fs::read(path).await {
        Ok(bytes) => bytes,
        Err(err) => {
            tracing::error!(transfer = transfer.0, "failed to read selected document: {err}");
            return UiEvent::SummaryFailed {
                transfer,
                error: UiError::from_message(
                    UiErrorContext::Submit,
                    format!("could not read '{file_name}': {err}"),
                ),
            };
        }
    };

    match client.submit_document(&file_name, bytes).await {
        Ok(summary) => {
            tracing::info!(
                transfer = transfer.0,
                summary_bytes = summary.len(),
                "summary received"
            );
            UiEvent::SummaryReady { transfer, summary }
        }
        Err(err) => {
            tracing::error!(transfer = transfer.0, "summarization failed: {err}");
            UiEvent::SummaryFailed {
                transfer,
                error: UiError::from_transfer(UiErrorContext::Submit, &err),
            }
        }
    }
}

/// Name shown to the user and sent to the service as the upload filename.
pub fn display_file_name(path: &Path) -> String {
    path.file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("document.pdf")
        .to_string()
}
