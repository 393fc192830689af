//! Theme and styling for the console UI.

use egui::{Color32, Rounding, Visuals};

/// Application theme configuration
#[derive(Clone, Debug)]
pub struct Theme {
    /// Primary accent color (farm teal)
    pub primary: Color32,
    /// Success color (green)
    pub success: Color32,
    /// Warning color (orange)
    pub warning: Color32,
    /// Error color (red)
    pub error: Color32,

    /// Background colors
    pub bg_primary: Color32,
    pub bg_secondary: Color32,
    pub bg_sidebar: Color32,

    /// Text colors
    pub text_primary: Color32,
    pub text_secondary: Color32,
    pub text_muted: Color32,

    /// Chat bubble fills
    pub user_bubble: Color32,
    pub assistant_bubble: Color32,

    /// Voice activity indicator color
    pub voice_active: Color32,

    /// Border radius for buttons
    pub button_rounding: Rounding,
    /// Border radius for cards/panels
    pub card_rounding: Rounding,

    /// Standard spacing
    pub spacing: f32,
    /// Large spacing
    pub spacing_lg: f32,
    /// Small spacing
    pub spacing_sm: f32,
}

impl Default for Theme {
    fn default() -> Self {
        Self::light()
    }
}

impl Theme {
    /// The console's light theme, teal-accented like the farm branding.
    pub fn light() -> Self {
        Self {
            primary: Color32::from_rgb(25, 212, 174),
            success: Color32::from_rgb(16, 185, 129),
            warning: Color32::from_rgb(249, 115, 22),
            error: Color32::from_rgb(239, 68, 68),

            bg_primary: Color32::from_rgb(249, 250, 251),
            bg_secondary: Color32::from_rgb(255, 255, 255),
            bg_sidebar: Color32::from_rgb(25, 212, 174),

            text_primary: Color32::from_rgb(31, 41, 55),
            text_secondary: Color32::from_rgb(75, 85, 99),
            text_muted: Color32::from_rgb(156, 163, 175),

            user_bubble: Color32::from_rgb(235, 253, 245),
            assistant_bubble: Color32::from_rgb(255, 255, 255),

            voice_active: Color32::from_rgb(239, 68, 68),

            button_rounding: Rounding::same(8.0),
            card_rounding: Rounding::same(12.0),

            spacing: 16.0,
            spacing_lg: 24.0,
            spacing_sm: 8.0,
        }
    }

    /// Apply the theme's base visuals to the egui context.
    pub fn apply(&self, ctx: &egui::Context) {
        let mut visuals = Visuals::light();
        visuals.panel_fill = self.bg_primary;
        visuals.window_fill = self.bg_secondary;
        visuals.selection.bg_fill = self.primary;
        ctx.set_visuals(visuals);
    }

    /// Badge color for a device/task status dot.
    pub fn status_color(&self, active: bool) -> Color32 {
        if active {
            self.success
        } else {
            self.text_muted
        }
    }
}
