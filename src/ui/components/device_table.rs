//! Device management view
//!
//! Filterable inventory table with add/edit/detail/delete dialogs, the
//! streamed AI analysis of a draft, and the simulated link test.

use crate::inventory::{Device, DeviceKind, DeviceStatus, ExecutionPermission};
use crate::ui::state::{AppState, LinkTestPhase};
use crate::ui::theme::Theme;
use egui::{self, RichText};

enum RowAction {
    Detail(String),
    Edit(String),
    Delete(String),
}

pub struct DeviceTable<'a> {
    state: &'a mut AppState,
    theme: &'a Theme,
}

impl<'a> DeviceTable<'a> {
    pub fn new(state: &'a mut AppState, theme: &'a Theme) -> Self {
        Self { state, theme }
    }

    pub fn show(mut self, ui: &mut egui::Ui) {
        ui.add_space(self.theme.spacing);
        ui.horizontal(|ui| {
            ui.heading(RichText::new("Device Management").color(self.theme.text_primary));
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                let add = egui::Button::new(RichText::new("＋ Add device").strong())
                    .fill(self.theme.primary)
                    .rounding(self.theme.button_rounding);
                if ui.add(add).clicked() {
                    self.state.open_device_add();
                }
            });
        });
        ui.label(
            RichText::new("Live status of every connected farm device")
                .size(12.0)
                .color(self.theme.text_muted),
        );
        ui.add_space(self.theme.spacing_sm);

        self.show_filters(ui);
        ui.add_space(self.theme.spacing_sm);
        self.show_table(ui);

        let ctx = ui.ctx().clone();
        self.show_form_window(&ctx);
        self.show_delete_window(&ctx);
        self.show_detail_window(&ctx);
    }

    fn show_filters(&mut self, ui: &mut egui::Ui) {
        let ponds = self.state.devices.ponds();
        let filter = &mut self.state.device_filter;

        ui.horizontal(|ui| {
            ui.add(
                egui::TextEdit::singleline(&mut filter.query)
                    .hint_text("Search name or id...")
                    .desired_width(200.0),
            );

            egui::ComboBox::from_id_salt("device_status_filter")
                .selected_text(filter.status.map_or("All statuses", |s| s.label()))
                .show_ui(ui, |ui| {
                    ui.selectable_value(&mut filter.status, None, "All statuses");
                    ui.selectable_value(&mut filter.status, Some(DeviceStatus::Online), "Online");
                    ui.selectable_value(&mut filter.status, Some(DeviceStatus::Offline), "Offline");
                });

            egui::ComboBox::from_id_salt("device_pond_filter")
                .selected_text(filter.pond.clone().unwrap_or_else(|| "All ponds".into()))
                .show_ui(ui, |ui| {
                    ui.selectable_value(&mut filter.pond, None, "All ponds");
                    for pond in &ponds {
                        ui.selectable_value(&mut filter.pond, Some(pond.clone()), pond);
                    }
                });

            egui::ComboBox::from_id_salt("device_permission_filter")
                .selected_text(filter.permission.map_or("All permissions", |p| p.label()))
                .show_ui(ui, |ui| {
                    ui.selectable_value(&mut filter.permission, None, "All permissions");
                    for permission in ExecutionPermission::ALL {
                        ui.selectable_value(
                            &mut filter.permission,
                            Some(permission),
                            permission.label(),
                        );
                    }
                });
        });
    }

    fn show_table(&mut self, ui: &mut egui::Ui) {
        let visible: Vec<Device> = self
            .state
            .device_filter
            .apply(self.state.devices.all())
            .into_iter()
            .cloned()
            .collect();
        let mut action = None;

        egui::ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                egui::Grid::new("device_table")
                    .num_columns(6)
                    .striped(true)
                    .spacing([self.theme.spacing, self.theme.spacing_sm])
                    .show(ui, |ui| {
                        for header in ["Device", "Kind", "Status", "Pond", "Permission", ""] {
                            ui.label(
                                RichText::new(header)
                                    .size(11.0)
                                    .strong()
                                    .color(self.theme.text_muted),
                            );
                        }
                        ui.end_row();

                        for device in &visible {
                            ui.vertical(|ui| {
                                ui.label(
                                    RichText::new(&device.name)
                                        .strong()
                                        .color(self.theme.text_primary),
                                );
                                ui.label(
                                    RichText::new(&device.id)
                                        .size(11.0)
                                        .monospace()
                                        .color(self.theme.text_muted),
                                );
                            });
                            ui.label(device.kind.label());
                            ui.label(
                                RichText::new(device.status.label()).color(
                                    self.theme
                                        .status_color(device.status == DeviceStatus::Online),
                                ),
                            );
                            ui.label(&device.pond);
                            ui.label(device.permission.label());
                            ui.horizontal(|ui| {
                                if ui.small_button("Detail").clicked() {
                                    action = Some(RowAction::Detail(device.id.clone()));
                                }
                                if ui.small_button("Edit").clicked() {
                                    action = Some(RowAction::Edit(device.id.clone()));
                                }
                                if ui.small_button("Delete").clicked() {
                                    action = Some(RowAction::Delete(device.id.clone()));
                                }
                            });
                            ui.end_row();
                        }
                    });

                if visible.is_empty() {
                    ui.add_space(self.theme.spacing);
                    ui.vertical_centered(|ui| {
                        ui.label(
                            RichText::new("No devices match the current filters")
                                .color(self.theme.text_muted),
                        );
                    });
                }
            });

        match action {
            Some(RowAction::Detail(id)) => self.state.detail_device = Some(id),
            Some(RowAction::Edit(id)) => self.state.open_device_edit(&id),
            Some(RowAction::Delete(id)) => self.state.confirm_delete_device = Some(id),
            None => {}
        }
    }

    fn show_form_window(&mut self, ctx: &egui::Context) {
        if self.state.device_form.is_none() {
            return;
        }

        let mut save_clicked = false;
        let mut cancel_clicked = false;
        let mut analyze_clicked = false;
        let mut test_clicked = false;

        if let Some(form) = self.state.device_form.as_mut() {
            let title = if form.editing.is_some() {
                "Edit device"
            } else {
                "Register device"
            };

            egui::Window::new(title)
                .collapsible(false)
                .resizable(false)
                .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
                .show(ctx, |ui| {
                    egui::Grid::new("device_form")
                        .num_columns(2)
                        .spacing([self.theme.spacing, self.theme.spacing_sm])
                        .show(ui, |ui| {
                            ui.label("Name");
                            ui.text_edit_singleline(&mut form.draft.name);
                            ui.end_row();

                            ui.label("Kind");
                            egui::ComboBox::from_id_salt("device_form_kind")
                                .selected_text(form.draft.kind.label())
                                .show_ui(ui, |ui| {
                                    for kind in DeviceKind::ALL {
                                        ui.selectable_value(
                                            &mut form.draft.kind,
                                            kind,
                                            kind.label(),
                                        );
                                    }
                                });
                            ui.end_row();

                            ui.label("Pond");
                            ui.text_edit_singleline(&mut form.draft.pond);
                            ui.end_row();

                            ui.label("Permission");
                            egui::ComboBox::from_id_salt("device_form_permission")
                                .selected_text(form.draft.permission.label())
                                .show_ui(ui, |ui| {
                                    for permission in ExecutionPermission::ALL {
                                        ui.selectable_value(
                                            &mut form.draft.permission,
                                            permission,
                                            permission.label(),
                                        );
                                    }
                                });
                            ui.end_row();

                            ui.label("Description");
                            ui.text_edit_multiline(&mut form.draft.description);
                            ui.end_row();
                        });

                    if let Some(error) = &form.error {
                        ui.colored_label(self.theme.error, error);
                    }

                    if !form.analysis.is_empty() || form.analysis_request.is_some() {
                        ui.separator();
                        ui.label(
                            RichText::new("AI analysis")
                                .size(11.0)
                                .strong()
                                .color(self.theme.primary),
                        );
                        egui::ScrollArea::vertical()
                            .id_salt("device_analysis")
                            .max_height(120.0)
                            .show(ui, |ui| {
                                if form.analysis.is_empty() {
                                    ui.add(egui::Spinner::new().color(self.theme.primary));
                                } else {
                                    ui.label(&form.analysis);
                                }
                            });
                    }

                    if !form.link_log.is_empty() {
                        ui.separator();
                        for line in &form.link_log {
                            ui.label(
                                RichText::new(format!("> {line}"))
                                    .size(11.0)
                                    .monospace()
                                    .color(self.theme.text_secondary),
                            );
                        }
                        if form.link_test == LinkTestPhase::Ready {
                            ui.colored_label(self.theme.success, "Link ready");
                        }
                    }

                    ui.add_space(self.theme.spacing_sm);
                    ui.horizontal(|ui| {
                        cancel_clicked = ui.button("Cancel").clicked();
                        analyze_clicked = ui.button("AI analyze").clicked();
                        test_clicked = ui
                            .add_enabled(
                                form.link_test != LinkTestPhase::Testing,
                                egui::Button::new(if form.link_test == LinkTestPhase::Testing {
                                    "Testing..."
                                } else {
                                    "Link test"
                                }),
                            )
                            .clicked();
                        let save = egui::Button::new(RichText::new("Save").strong())
                            .fill(self.theme.primary);
                        save_clicked = ui.add(save).clicked();
                    });
                });
        }

        if analyze_clicked {
            self.state.analyze_device_draft();
        }
        if test_clicked {
            self.state.run_link_test();
        }
        if save_clicked && self.state.save_device_form() {
            self.state.device_form = None;
        } else if cancel_clicked {
            self.state.device_form = None;
        }
    }

    fn show_delete_window(&mut self, ctx: &egui::Context) {
        let Some(id) = self.state.confirm_delete_device.clone() else {
            return;
        };
        let name = self
            .state
            .devices
            .get(&id)
            .map(|d| d.name.clone())
            .unwrap_or_else(|| id.clone());

        let mut confirmed = false;
        let mut cancelled = false;
        egui::Window::new("Delete device?")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.label(format!(
                    "This permanently removes \"{name}\" and cannot be undone."
                ));
                ui.add_space(self.theme.spacing_sm);
                ui.horizontal(|ui| {
                    cancelled = ui.button("Cancel").clicked();
                    let delete =
                        egui::Button::new(RichText::new("Delete").strong()).fill(self.theme.error);
                    confirmed = ui.add(delete).clicked();
                });
            });

        if confirmed {
            self.state.confirm_device_delete();
        } else if cancelled {
            self.state.confirm_delete_device = None;
        }
    }

    fn show_detail_window(&mut self, ctx: &egui::Context) {
        let Some(id) = self.state.detail_device.clone() else {
            return;
        };
        let Some(device) = self.state.devices.get(&id).cloned() else {
            self.state.detail_device = None;
            return;
        };

        let mut close = false;
        egui::Window::new(device.name.clone())
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                egui::Grid::new("device_detail")
                    .num_columns(2)
                    .spacing([self.theme.spacing, self.theme.spacing_sm])
                    .show(ui, |ui| {
                        ui.label(RichText::new("Asset id").color(self.theme.text_muted));
                        ui.label(RichText::new(&device.id).monospace());
                        ui.end_row();

                        ui.label(RichText::new("Status").color(self.theme.text_muted));
                        ui.label(device.status.label());
                        ui.end_row();

                        ui.label(RichText::new("Pond").color(self.theme.text_muted));
                        ui.label(&device.pond);
                        ui.end_row();

                        ui.label(RichText::new("Permission").color(self.theme.text_muted));
                        ui.label(device.permission.label());
                        ui.end_row();

                        ui.label(RichText::new("Last active").color(self.theme.text_muted));
                        ui.label(device.last_active.format("%Y-%m-%d %H:%M").to_string());
                        ui.end_row();

                        ui.label(RichText::new("Firmware").color(self.theme.text_muted));
                        ui.label(&device.metadata.firmware);
                        ui.end_row();

                        if let Some(signal) = device.metadata.signal {
                            ui.label(RichText::new("Signal").color(self.theme.text_muted));
                            ui.label(signal.label());
                            ui.end_row();
                        }

                        if let Some(battery) = device.metadata.battery {
                            ui.label(RichText::new("Battery").color(self.theme.text_muted));
                            ui.label(format!("{battery}%"));
                            ui.end_row();
                        }
                    });

                ui.add_space(self.theme.spacing_sm);
                close = ui.button("Close").clicked();
            });

        if close {
            self.state.detail_device = None;
        }
    }
}
