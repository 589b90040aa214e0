//! UI layer for the desktop app: app shell, markdown rendering, and theme.

pub mod app;
pub mod markdown;
pub mod theme;

pub use app::DesktopGuiApp;
