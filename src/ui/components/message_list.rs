//! Message list component
//!
//! Displays the conversation history, including the currently streaming
//! assistant reply and coalesced voice transcripts.

use crate::messages::{ChatMessage, Role, Source};
use crate::ui::state::AppState;
use crate::ui::theme::Theme;
use egui::{self, Align, Layout, RichText};

pub struct MessageList<'a> {
    state: &'a AppState,
    theme: &'a Theme,
}

impl<'a> MessageList<'a> {
    pub fn new(state: &'a AppState, theme: &'a Theme) -> Self {
        Self { state, theme }
    }

    pub fn show(self, ui: &mut egui::Ui) {
        let messages = self.state.messages.get_all();

        egui::ScrollArea::vertical()
            .auto_shrink([false, false])
            .stick_to_bottom(true)
            .show(ui, |ui| {
                ui.add_space(self.theme.spacing);

                if messages.is_empty() {
                    self.show_empty_state(ui);
                } else {
                    for message in &messages {
                        self.show_message(ui, message);
                        ui.add_space(self.theme.spacing_sm);
                    }
                }

                ui.add_space(self.theme.spacing);
            });
    }

    fn show_empty_state(&self, ui: &mut egui::Ui) {
        ui.vertical_centered(|ui| {
            ui.add_space(100.0);
            ui.label(
                RichText::new("Start a conversation")
                    .size(20.0)
                    .color(self.theme.text_muted),
            );
            ui.add_space(self.theme.spacing_sm);
            ui.label(
                RichText::new("Ask about water quality, feeding plans, or device status.")
                    .size(13.0)
                    .color(self.theme.text_muted),
            );
        });
    }

    fn show_message(&self, ui: &mut egui::Ui, message: &ChatMessage) {
        let is_user = message.role == Role::User;
        let bubble_color = if is_user {
            self.theme.user_bubble
        } else {
            self.theme.assistant_bubble
        };
        let text_color = if message.is_error {
            self.theme.error
        } else {
            self.theme.text_primary
        };
        let layout = if is_user {
            Layout::right_to_left(Align::TOP)
        } else {
            Layout::left_to_right(Align::TOP)
        };

        ui.with_layout(layout, |ui| {
            ui.set_max_width(ui.available_width());
            egui::Frame::none()
                .fill(bubble_color)
                .rounding(self.theme.card_rounding)
                .inner_margin(self.theme.spacing_sm * 1.5)
                .show(ui, |ui| {
                    ui.set_max_width(ui.available_width() * 0.85);
                    ui.vertical(|ui| {
                        if message.source == Source::Voice {
                            ui.label(
                                RichText::new("voice")
                                    .size(10.0)
                                    .color(self.theme.text_muted),
                            );
                        }
                        if message.content.is_empty() {
                            // Stream opened but nothing arrived yet
                            ui.add(egui::Spinner::new().color(self.theme.primary));
                        } else {
                            ui.label(
                                RichText::new(&message.content)
                                    .size(14.0)
                                    .color(text_color),
                            );
                        }
                        ui.label(
                            RichText::new(message.timestamp.format("%H:%M").to_string())
                                .size(10.0)
                                .color(self.theme.text_muted),
                        );
                    });
                });
        });
    }
}
