//! Environmental data side panel
//!
//! Read-only farm overview and weather readings for the selected pond.

use crate::inventory::environment::{FarmSnapshot, PANEL_PONDS};
use crate::ui::state::AppState;
use crate::ui::theme::Theme;
use egui::{self, RichText};

pub struct DataPanel<'a> {
    state: &'a mut AppState,
    theme: &'a Theme,
}

impl<'a> DataPanel<'a> {
    pub fn new(state: &'a mut AppState, theme: &'a Theme) -> Self {
        Self { state, theme }
    }

    pub fn show(mut self, ui: &mut egui::Ui) {
        ui.add_space(self.theme.spacing_sm);
        ui.label(
            RichText::new("Farm data")
                .size(16.0)
                .strong()
                .color(self.theme.text_primary),
        );
        ui.add_space(self.theme.spacing_sm);

        egui::ComboBox::from_id_salt("data_panel_pond")
            .selected_text(self.state.selected_pond.clone())
            .width(ui.available_width())
            .show_ui(ui, |ui| {
                for pond in PANEL_PONDS {
                    ui.selectable_value(&mut self.state.selected_pond, pond.to_string(), pond);
                }
            });

        let snapshot = FarmSnapshot::seed(&self.state.selected_pond);

        ui.add_space(self.theme.spacing);
        self.section(ui, "Overview");
        self.row(ui, "Area (ha)", &format!("{:.0}", snapshot.summary.area_hectares));
        self.row(ui, "Species", snapshot.summary.species);
        self.row(ui, "Stock count", &snapshot.summary.stock_count.to_string());

        ui.add_space(self.theme.spacing);
        self.section(ui, "Environment");
        self.row(ui, "Air temp (°C)", &format!("{:.1}", snapshot.environment.air_temp_c));
        self.row(ui, "Weather", snapshot.environment.weather);
        self.row(ui, "Time", snapshot.environment.observed_at);
        self.row(ui, "Location", snapshot.environment.location);
    }

    fn section(&self, ui: &mut egui::Ui, title: &str) {
        ui.label(
            RichText::new(title.to_uppercase())
                .size(11.0)
                .strong()
                .color(self.theme.text_muted),
        );
        ui.add_space(self.theme.spacing_sm / 2.0);
    }

    fn row(&self, ui: &mut egui::Ui, label: &str, value: &str) {
        ui.horizontal(|ui| {
            ui.label(RichText::new(label).color(self.theme.text_secondary));
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.label(
                    RichText::new(value)
                        .strong()
                        .color(self.theme.text_primary),
                );
            });
        });
    }
}
