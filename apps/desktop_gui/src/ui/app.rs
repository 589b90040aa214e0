//! Application shell: owns the session, the channels, and panel rendering.

use std::path::{Path, PathBuf};

use arboard::Clipboard;
use crossbeam_channel::{Receiver, Sender};
use eframe::egui;

use crate::backend_bridge::commands::BackendCommand;
use crate::backend_bridge::runtime::display_file_name;
use crate::controller::events::{err_label, UiError, UiErrorContext, UiEvent};
use crate::controller::orchestration::dispatch_backend_command;
use crate::controller::session::{SummaryView, UploadSession};
use crate::ui::markdown::{parse_markdown, render_markdown, MarkdownBlock};
use crate::ui::theme::{dark_palette, Palette};

const NO_FILE_SELECTED_NOTICE: &str = "Please select a PDF file to upload.";
const IDLE_STATUS: &str = "Waiting for a document";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StatusBannerSeverity {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone)]
struct StatusBanner {
    severity: StatusBannerSeverity,
    message: String,
}

pub struct DesktopGuiApp {
    cmd_tx: Sender<BackendCommand>,
    ui_rx: Receiver<UiEvent>,
    server_url: String,
    session: UploadSession,
    document_size: Option<String>,
    rendered_summary: Vec<MarkdownBlock>,
    status: String,
    status_banner: Option<StatusBanner>,
    palette: Palette,
}

impl DesktopGuiApp {
    pub fn new(
        server_url: String,
        cmd_tx: Sender<BackendCommand>,
        ui_rx: Receiver<UiEvent>,
    ) -> Self {
        Self {
            cmd_tx,
            ui_rx,
            server_url,
            session: UploadSession::new(),
            document_size: None,
            rendered_summary: Vec::new(),
            status: IDLE_STATUS.to_string(),
            status_banner: None,
            palette: dark_palette(),
        }
    }

    /// Drains the whole backend event queue; called once per frame.
    fn process_ui_events(&mut self) {
        while let Ok(event) = self.ui_rx.try_recv() {
            match event {
                UiEvent::Info(message) => {
                    self.status = message;
                }
                UiEvent::SummaryReady { transfer, summary } => {
                    if self.session.apply_success(transfer, summary) {
                        self.rendered_summary = parse_markdown(self.session.result_text());
                        self.status =
                            format!("Summary ready for {}", self.session.selected_file_name());
                        self.status_banner = None;
                    } else {
                        tracing::debug!(
                            transfer = transfer.0,
                            "dropping summary for superseded transfer"
                        );
                    }
                }
                UiEvent::SummaryFailed { transfer, error } => {
                    if self.session.apply_failure(transfer) {
                        self.show_error(&error);
                    } else {
                        tracing::debug!(
                            transfer = transfer.0,
                            "dropping failure for superseded transfer"
                        );
                    }
                }
                UiEvent::Error(error) => {
                    self.show_error(&error);
                }
            }
        }
    }

    fn show_error(&mut self, error: &UiError) {
        self.status = match error.context() {
            UiErrorContext::BackendStartup => format!("Startup error: {}", error.message()),
            UiErrorContext::Submit => {
                format!("{} error: {}", err_label(error.category()), error.message())
            }
        };
        self.status_banner = Some(StatusBanner {
            severity: StatusBannerSeverity::Error,
            message: self.status.clone(),
        });
    }

    fn on_select_file_clicked(&mut self) {
        let mut dialog = rfd::FileDialog::new().add_filter("PDF documents", &["pdf"]);
        if let Some(dir) = default_document_dir() {
            dialog = dialog.set_directory(dir);
        }
        self.on_file_picked(dialog.pick_file());
    }

    /// Entry point for a picker result; `None` means the user cancelled.
    fn on_file_picked(&mut self, picked: Option<PathBuf>) {
        let Some(path) = picked else {
            self.status = NO_FILE_SELECTED_NOTICE.to_string();
            self.status_banner = Some(StatusBanner {
                severity: StatusBannerSeverity::Warning,
                message: NO_FILE_SELECTED_NOTICE.to_string(),
            });
            return;
        };

        let file_name = display_file_name(&path);
        self.document_size = document_size_text(&path);
        self.rendered_summary.clear();
        self.status_banner = None;
        let transfer = self.session.begin_transfer(file_name.clone());
        self.status = format!("Uploading {file_name}...");

        let queued = dispatch_backend_command(
            &self.cmd_tx,
            BackendCommand::SubmitDocument { transfer, path },
            &mut self.status,
        );
        if !queued {
            // The transfer never left the UI thread; undo the progress state.
            self.session.apply_failure(transfer);
            self.status_banner = Some(StatusBanner {
                severity: StatusBannerSeverity::Error,
                message: self.status.clone(),
            });
        }
    }

    fn clear_session(&mut self) {
        self.session.clear();
        self.document_size = None;
        self.rendered_summary.clear();
        self.status = IDLE_STATUS.to_string();
        self.status_banner = None;
    }

    fn copy_result(&mut self) {
        if !self.session.can_copy() {
            return;
        }
        let text = self.session.result_text().to_string();
        match Clipboard::new().and_then(|mut clipboard| clipboard.set_text(text)) {
            Ok(()) => {
                self.status = "Summary copied to clipboard".to_string();
                self.status_banner = Some(StatusBanner {
                    severity: StatusBannerSeverity::Info,
                    message: "Summary copied to clipboard.".to_string(),
                });
            }
            Err(err) => {
                self.status = format!("Clipboard copy failed: {err}");
                self.status_banner = Some(StatusBanner {
                    severity: StatusBannerSeverity::Error,
                    message: self.status.clone(),
                });
            }
        }
    }

    fn show_header(&mut self, ctx: &egui::Context) {
        let palette = self.palette.clone();
        egui::TopBottomPanel::top("app_header")
            .resizable(false)
            .exact_height(64.0)
            .frame(
                egui::Frame::new()
                    .fill(palette.header_background)
                    .inner_margin(egui::Margin::symmetric(16, 10)),
            )
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.label(egui::RichText::new("📄").size(26.0));
                    ui.add_space(4.0);
                    ui.vertical(|ui| {
                        ui.label(
                            egui::RichText::new("PDF Summarizer")
                                .color(palette.title_text)
                                .size(19.0)
                                .strong(),
                        );
                        ui.label(
                            egui::RichText::new("Upload a PDF and get a short summary back.")
                                .color(palette.hint_text)
                                .size(12.5),
                        );
                    });
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        ui.label(
                            egui::RichText::new(format!(
                                "{} · {}",
                                server_environment_label(&self.server_url),
                                self.server_url
                            ))
                            .color(palette.hint_text)
                            .size(12.0),
                        );
                    });
                });
            });
    }

    fn show_status_bar(&mut self, ctx: &egui::Context) {
        let palette = self.palette.clone();
        egui::TopBottomPanel::bottom("status_bar")
            .resizable(false)
            .exact_height(28.0)
            .frame(
                egui::Frame::new()
                    .fill(palette.header_background)
                    .inner_margin(egui::Margin::symmetric(12, 6)),
            )
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    if self.session.is_processing() {
                        ui.add(egui::Spinner::new().size(12.0));
                    }
                    ui.label(
                        egui::RichText::new(&self.status)
                            .color(palette.hint_text)
                            .size(12.5),
                    );
                });
            });
    }

    fn show_status_banner(&mut self, ui: &mut egui::Ui) {
        let Some(banner) = self.status_banner.clone() else {
            return;
        };
        let (fill, stroke) = match banner.severity {
            StatusBannerSeverity::Info => (
                egui::Color32::from_rgb(46, 88, 62),
                egui::Stroke::new(1.0, egui::Color32::from_rgb(97, 153, 113)),
            ),
            StatusBannerSeverity::Warning => (
                egui::Color32::from_rgb(122, 97, 46),
                egui::Stroke::new(1.0, egui::Color32::from_rgb(178, 146, 84)),
            ),
            StatusBannerSeverity::Error => (
                egui::Color32::from_rgb(111, 53, 53),
                egui::Stroke::new(1.0, egui::Color32::from_rgb(175, 96, 96)),
            ),
        };

        egui::Frame::new()
            .fill(fill)
            .stroke(stroke)
            .corner_radius(egui::CornerRadius::same(8))
            .inner_margin(egui::Margin::symmetric(10, 8))
            .show(ui, |ui| {
                ui.horizontal_wrapped(|ui| {
                    ui.label(egui::RichText::new(&banner.message).color(egui::Color32::WHITE));
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.button("Dismiss").clicked() {
                            self.status_banner = None;
                        }
                    });
                });
            });
        ui.add_space(8.0);
    }

    fn show_document_row(&mut self, ui: &mut egui::Ui) {
        let palette = self.palette.clone();
        ui.horizontal(|ui| {
            if ui.button("📂 Select PDF").clicked() {
                self.on_select_file_clicked();
            }
            let copy_enabled = self.session.can_copy();
            if ui
                .add_enabled(copy_enabled, egui::Button::new("📋 Copy summary"))
                .clicked()
            {
                self.copy_result();
            }
            if ui.button("✕ Clear").clicked() {
                self.clear_session();
            }
        });
        if !self.session.selected_file_name().is_empty() {
            ui.add_space(6.0);
            let label = match &self.document_size {
                Some(size) => format!("Selected: {} ({size})", self.session.selected_file_name()),
                None => format!("Selected: {}", self.session.selected_file_name()),
            };
            ui.label(
                egui::RichText::new(label)
                    .color(palette.hint_text)
                    .size(13.0),
            );
        }
    }

    fn show_placeholder(&self, ui: &mut egui::Ui) {
        let palette = &self.palette;
        ui.vertical_centered(|ui| {
            ui.add_space(ui.available_height() * 0.25);
            ui.label(egui::RichText::new("🗂").size(42.0));
            ui.add_space(6.0);
            ui.label(
                egui::RichText::new(IDLE_STATUS)
                    .color(palette.title_text)
                    .size(16.0)
                    .strong(),
            );
            ui.label(
                egui::RichText::new("Pick a PDF above; its summary will appear here.")
                    .color(palette.hint_text)
                    .size(13.0),
            );
        });
    }

    fn show_progress(&self, ui: &mut egui::Ui) {
        let palette = &self.palette;
        ui.vertical_centered(|ui| {
            ui.add_space(ui.available_height() * 0.25);
            ui.add(egui::Spinner::new().size(36.0));
            ui.add_space(8.0);
            ui.label(
                egui::RichText::new(format!(
                    "Summarizing {}...",
                    self.session.selected_file_name()
                ))
                .color(palette.hint_text)
                .size(14.0),
            );
        });
    }

    fn show_summary(&self, ui: &mut egui::Ui) {
        egui::ScrollArea::vertical()
            .id_salt("summary_scroll")
            .auto_shrink([false, false])
            .show(ui, |ui| {
                render_markdown(ui, &self.palette, &self.rendered_summary);
            });
    }

    fn show_workspace(&mut self, ctx: &egui::Context) {
        let palette = self.palette.clone();
        egui::CentralPanel::default()
            .frame(
                egui::Frame::new()
                    .fill(palette.app_background)
                    .inner_margin(egui::Margin::symmetric(16, 12)),
            )
            .show(ctx, |ui| {
                self.show_status_banner(ui);
                self.show_document_row(ui);
                ui.add_space(10.0);
                ui.separator();
                ui.add_space(10.0);
                match self.session.view() {
                    SummaryView::Placeholder => self.show_placeholder(ui),
                    SummaryView::Progress => self.show_progress(ui),
                    SummaryView::Rendered => self.show_summary(ui),
                }
            });
    }
}

impl eframe::App for DesktopGuiApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.process_ui_events();
        self.show_header(ctx);
        self.show_status_bar(ctx);
        self.show_workspace(ctx);
        // Keep polling the event queue even while the user is idle.
        ctx.request_repaint_after(std::time::Duration::from_millis(100));
    }
}

fn document_size_text(path: &Path) -> Option<String> {
    std::fs::metadata(path)
        .ok()
        .map(|meta| human_readable_bytes(meta.len()))
}

fn default_document_dir() -> Option<PathBuf> {
    dirs::document_dir()
        .or_else(dirs::download_dir)
        .or_else(dirs::home_dir)
}

fn human_readable_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format_scaled_unit(bytes, GB, "GB")
    } else if bytes >= MB {
        format_scaled_unit(bytes, MB, "MB")
    } else if bytes >= KB {
        format_scaled_unit(bytes, KB, "KB")
    } else {
        format!("{bytes} B")
    }
}

fn format_scaled_unit(bytes: u64, unit: u64, suffix: &str) -> String {
    let scaled = bytes as f64 / unit as f64;
    if (scaled - scaled.trunc()).abs() < f64::EPSILON {
        format!("{} {suffix}", scaled as u64)
    } else {
        format!("{scaled:.1} {suffix}")
    }
}

fn server_environment_label(server_url: &str) -> &'static str {
    let server = server_url.to_ascii_lowercase();
    if server.contains("127.0.0.1") || server.contains("localhost") {
        "Local"
    } else if server.contains("staging") {
        "Staging"
    } else if server.contains("dev") {
        "Development"
    } else {
        "Production"
    }
}
