//! The render settings panel.
//!
//! One window exposing the post-processing mode, the convolution kernel
//! spread, and the skybox preset, plus a frame-time readout.

use crate::gfx::rendering::PostMode;

/// UI-owned render settings, read by the app every frame.
pub struct RenderSettings {
    pub post_mode: PostMode,
    /// Kernel sample spread divisor for the convolution effects.
    pub conv_offset: f32,
    pub skybox_index: usize,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            post_mode: PostMode::Regular,
            conv_offset: 500.0,
            skybox_index: 0,
        }
    }
}

/// Builds the settings window.
///
/// Returns true when the skybox selection changed this frame so the app
/// can swap the cubemap.
pub fn render_settings_panel(
    ui: &imgui::Ui,
    settings: &mut RenderSettings,
    skybox_presets: &[String],
    flashlight_enabled: bool,
) -> bool {
    let mut skybox_changed = false;

    ui.window("Render Settings")
        .size([340.0, 260.0], imgui::Condition::FirstUseEver)
        .position([20.0, 20.0], imgui::Condition::FirstUseEver)
        .build(|| {
            ui.text(format!(
                "{:.1} fps ({:.2} ms)",
                ui.io().framerate,
                1000.0 / ui.io().framerate.max(1.0)
            ));
            ui.separator();

            let mut mode_index = PostMode::ALL
                .iter()
                .position(|m| *m == settings.post_mode)
                .unwrap_or(0);
            let labels: Vec<&str> = PostMode::ALL.iter().map(|m| m.label()).collect();
            if ui.combo_simple_string("Effect", &mut mode_index, &labels) {
                settings.post_mode = PostMode::ALL[mode_index];
            }

            ui.slider("Kernel offset", 1.0, 5000.0, &mut settings.conv_offset);

            if !skybox_presets.is_empty() {
                let mut index = settings.skybox_index.min(skybox_presets.len() - 1);
                let preset_labels: Vec<&str> =
                    skybox_presets.iter().map(String::as_str).collect();
                if ui.combo_simple_string("Skybox", &mut index, &preset_labels) {
                    skybox_changed = index != settings.skybox_index;
                    settings.skybox_index = index;
                }
            }

            ui.separator();
            ui.text(format!(
                "Flashlight: {}  (F toggles)",
                if flashlight_enabled { "on" } else { "off" }
            ));
            ui.text_disabled("WASD move, mouse look, scroll zoom");
        });

    skybox_changed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_settings_start_neutral() {
        let settings = RenderSettings::default();
        assert_eq!(settings.post_mode, PostMode::Regular);
        assert_eq!(settings.conv_offset, 500.0);
        assert_eq!(settings.skybox_index, 0);
    }
}
