//! Input bar component
//!
//! Text input with busy-guarded send, plus the voice session toggle.

use crate::relay::VoicePhase;
use crate::ui::state::AppState;
use crate::ui::theme::Theme;
use egui::{self, Key, RichText, Vec2};

pub struct InputBar<'a> {
    state: &'a mut AppState,
    theme: &'a Theme,
}

impl<'a> InputBar<'a> {
    pub fn new(state: &'a mut AppState, theme: &'a Theme) -> Self {
        Self { state, theme }
    }

    pub fn show(mut self, ui: &mut egui::Ui) {
        egui::Frame::none()
            .fill(self.theme.bg_secondary)
            .rounding(self.theme.card_rounding)
            .inner_margin(self.theme.spacing_sm)
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    self.show_voice_button(ui);
                    ui.add_space(self.theme.spacing_sm);

                    let text_edit = egui::TextEdit::singleline(&mut self.state.input_text)
                        .hint_text("Ask the assistant...")
                        .desired_width(ui.available_width() - 70.0);
                    let response = ui.add(text_edit);

                    let submitted =
                        response.lost_focus() && ui.input(|i| i.key_pressed(Key::Enter));

                    ui.add_space(self.theme.spacing_sm);

                    let can_send =
                        !self.state.is_streaming && !self.state.input_text.trim().is_empty();
                    let send = egui::Button::new(RichText::new("Send").strong())
                        .fill(self.theme.primary)
                        .rounding(self.theme.button_rounding)
                        .min_size(Vec2::new(56.0, 28.0));

                    if ui.add_enabled(can_send, send).clicked() || submitted {
                        self.state.send_message();
                        response.request_focus();
                    }
                });
            });
    }

    fn show_voice_button(&mut self, ui: &mut egui::Ui) {
        let (icon, tooltip, color) = match self.state.voice_phase {
            VoicePhase::Idle => ("🎤", "Start voice session", self.theme.text_secondary),
            VoicePhase::Connecting => ("⏳", "Connecting...", self.theme.warning),
            VoicePhase::Listening => ("🎤", "Listening (click to stop)", self.theme.voice_active),
            VoicePhase::Speaking => ("🔊", "Speaking (click to stop)", self.theme.primary),
        };

        let button = egui::Button::new(RichText::new(icon).size(18.0).color(color))
            .min_size(Vec2::splat(36.0))
            .rounding(self.theme.button_rounding);

        if ui.add(button).on_hover_text(tooltip).clicked() {
            self.state.toggle_voice();
        }
    }
}
