//! Debug UI: ImGui integration and the render settings panel.

pub mod manager;
pub mod panel;

pub use manager::UiManager;
pub use panel::{render_settings_panel, RenderSettings};
