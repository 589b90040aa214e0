//! Color palette shared by the desktop panels.

use eframe::egui;

#[derive(Debug, Clone)]
pub struct Palette {
    pub app_background: egui::Color32,
    pub header_background: egui::Color32,
    pub title_text: egui::Color32,
    pub body_text: egui::Color32,
    pub hint_text: egui::Color32,
    pub accent: egui::Color32,
    pub code_background: egui::Color32,
}

pub fn dark_palette() -> Palette {
    Palette {
        app_background: egui::Color32::from_rgb(30, 31, 34),
        header_background: egui::Color32::from_rgb(43, 45, 49),
        title_text: egui::Color32::from_rgb(232, 234, 237),
        body_text: egui::Color32::from_rgb(201, 205, 211),
        hint_text: egui::Color32::from_rgb(148, 155, 164),
        accent: egui::Color32::from_rgb(96, 134, 233),
        code_background: egui::Color32::from_rgb(24, 25, 28),
    }
}

/// Applies the palette to the global egui style once at startup. Explicitly
/// colored text keeps its color; everything else picks up `body_text`.
pub fn apply(ctx: &egui::Context, palette: &Palette) {
    let mut visuals = egui::Visuals::dark();
    visuals.panel_fill = palette.app_background;
    visuals.window_fill = palette.app_background;
    visuals.override_text_color = Some(palette.body_text);
    visuals.hyperlink_color = palette.accent;
    ctx.set_visuals(visuals);
}
