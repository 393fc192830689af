//! Main application struct and eframe integration

use crate::ui::components::{DataPanel, DeviceTable, InputBar, MessageList, TaskTable};
use crate::ui::state::{AppState, View};
use crate::ui::theme::Theme;
use egui::{self, CentralPanel, RichText, SidePanel, TopBottomPanel};

/// Main console application
pub struct AquadeskApp {
    state: AppState,
    theme: Theme,
}

impl AquadeskApp {
    /// Create the application with an already-wired state (relay channels
    /// attached by the caller).
    pub fn new(cc: &eframe::CreationContext<'_>, state: AppState) -> Self {
        let theme = Theme::light();
        theme.apply(&cc.egui_ctx);

        Self { state, theme }
    }

    fn show_header(&mut self, ctx: &egui::Context) {
        TopBottomPanel::top("header")
            .frame(
                egui::Frame::none()
                    .fill(self.theme.bg_secondary)
                    .inner_margin(10.0),
            )
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.label(
                        RichText::new("Aquaculture Admin")
                            .size(18.0)
                            .strong()
                            .color(self.theme.primary),
                    );

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        ui.label(RichText::new("henry").color(self.theme.text_secondary));
                        if let Some(error) = &self.state.last_error {
                            ui.label(RichText::new(error).size(11.0).color(self.theme.error));
                        }
                    });
                });
            });
    }

    fn show_sidebar(&mut self, ctx: &egui::Context) {
        SidePanel::left("sidebar")
            .resizable(false)
            .exact_width(170.0)
            .frame(
                egui::Frame::none()
                    .fill(self.theme.bg_sidebar)
                    .inner_margin(self.theme.spacing_sm),
            )
            .show(ctx, |ui| {
                ui.add_space(self.theme.spacing);
                for (view, label) in [
                    (View::Chat, "AI Assistant"),
                    (View::Devices, "Devices"),
                    (View::Tasks, "Tasks"),
                ] {
                    let selected = self.state.view == view;
                    let text = RichText::new(label)
                        .size(14.0)
                        .color(egui::Color32::WHITE)
                        .strong();
                    let button = egui::Button::new(text)
                        .fill(if selected {
                            self.theme.primary.gamma_multiply(0.7)
                        } else {
                            egui::Color32::TRANSPARENT
                        })
                        .min_size(egui::Vec2::new(ui.available_width(), 36.0))
                        .rounding(self.theme.button_rounding);
                    if ui.add(button).clicked() {
                        self.state.view = view;
                    }
                    ui.add_space(self.theme.spacing_sm / 2.0);
                }
            });
    }

    fn show_content(&mut self, ctx: &egui::Context) {
        match self.state.view {
            View::Chat => {
                SidePanel::right("data_panel")
                    .resizable(false)
                    .exact_width(240.0)
                    .frame(
                        egui::Frame::none()
                            .fill(self.theme.bg_secondary)
                            .inner_margin(self.theme.spacing_sm),
                    )
                    .show(ctx, |ui| {
                        DataPanel::new(&mut self.state, &self.theme).show(ui);
                    });

                TopBottomPanel::bottom("input_area")
                    .frame(
                        egui::Frame::none()
                            .fill(self.theme.bg_primary)
                            .inner_margin(self.theme.spacing_sm),
                    )
                    .show(ctx, |ui| {
                        InputBar::new(&mut self.state, &self.theme).show(ui);
                    });

                CentralPanel::default()
                    .frame(egui::Frame::none().fill(self.theme.bg_primary))
                    .show(ctx, |ui| {
                        MessageList::new(&self.state, &self.theme).show(ui);
                    });
            }
            View::Devices => {
                CentralPanel::default()
                    .frame(
                        egui::Frame::none()
                            .fill(self.theme.bg_primary)
                            .inner_margin(self.theme.spacing),
                    )
                    .show(ctx, |ui| {
                        DeviceTable::new(&mut self.state, &self.theme).show(ui);
                    });
            }
            View::Tasks => {
                CentralPanel::default()
                    .frame(
                        egui::Frame::none()
                            .fill(self.theme.bg_primary)
                            .inner_margin(self.theme.spacing),
                    )
                    .show(ctx, |ui| {
                        TaskTable::new(&mut self.state, &self.theme).show(ui);
                    });
            }
        }
    }
}

impl eframe::App for AquadeskApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Drain worker events before rendering
        self.state.poll_events();

        self.show_header(ctx);
        self.show_sidebar(ctx);
        self.show_content(ctx);

        // Keep repainting while streams or simulated delays are running
        if self.state.is_busy() {
            ctx.request_repaint();
        }
    }
}
