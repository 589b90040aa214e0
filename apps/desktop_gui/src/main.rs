use std::time::Duration;

mod backend_bridge;
mod controller;
mod ui;

use client_core::{ClientConfig, DEFAULT_BASE_URL, DEFAULT_REQUEST_TIMEOUT};
use crossbeam_channel::bounded;
use eframe::egui;

use backend_bridge::{commands::BackendCommand, runtime};
use controller::events::UiEvent;
use ui::{theme, DesktopGuiApp};

const SERVER_URL_ENV_VAR: &str = "SUMMARIZER_SERVER_URL";
const TIMEOUT_ENV_VAR: &str = "SUMMARIZER_TIMEOUT_SECS";

fn read_non_empty_env_var(name: &str) -> Option<String> {
    match std::env::var(name) {
        Ok(value) if value.trim().is_empty() => None,
        Ok(value) => Some(value),
        Err(_) => None,
    }
}

fn parse_timeout_secs(raw: &str) -> Option<Duration> {
    match raw.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => Some(Duration::from_secs(secs)),
        _ => None,
    }
}

/// Environment overrides win; anything unset or invalid falls back to the
/// defaults and the app still starts.
fn resolve_client_config() -> ClientConfig {
    let base_url =
        read_non_empty_env_var(SERVER_URL_ENV_VAR).unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
    let request_timeout = match read_non_empty_env_var(TIMEOUT_ENV_VAR) {
        Some(raw) => match parse_timeout_secs(&raw) {
            Some(timeout) => timeout,
            None => {
                tracing::warn!(
                    value = %raw,
                    "ignoring invalid {TIMEOUT_ENV_VAR}; falling back to default"
                );
                DEFAULT_REQUEST_TIMEOUT
            }
        },
        None => DEFAULT_REQUEST_TIMEOUT,
    };
    ClientConfig {
        base_url,
        request_timeout,
    }
}

fn main() -> eframe::Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();

    let config = resolve_client_config();
    tracing::info!(
        base_url = %config.base_url,
        timeout_secs = config.request_timeout.as_secs(),
        "starting desktop summarizer"
    );

    let (cmd_tx, cmd_rx) = bounded::<BackendCommand>(64);
    let (ui_tx, ui_rx) = bounded::<UiEvent>(256);
    runtime::launch(config.clone(), cmd_rx, ui_tx);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("PDF Summarizer")
            .with_inner_size([860.0, 680.0])
            .with_min_inner_size([600.0, 460.0]),
        ..Default::default()
    };
    eframe::run_native(
        "PDF Summarizer",
        options,
        Box::new(move |cc| {
            theme::apply(&cc.egui_ctx, &theme::dark_palette());
            Ok(Box::new(DesktopGuiApp::new(config.base_url, cmd_tx, ui_rx)))
        }),
    )
}
