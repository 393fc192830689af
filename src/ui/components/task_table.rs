//! Task management view
//!
//! Filterable backlog table with add/edit/detail/delete dialogs, streamed AI
//! analysis of a draft, and the manual-execute action (simulated: the status
//! is forced to completed after a fixed delay, nothing is verified).

use crate::inventory::{Task, TaskPriority, TaskStatus};
use crate::ui::state::{AppState, ExecutionPhase};
use crate::ui::theme::Theme;
use egui::{self, RichText};

enum RowAction {
    Detail(String),
    Edit(String),
    Delete(String),
}

pub struct TaskTable<'a> {
    state: &'a mut AppState,
    theme: &'a Theme,
}

impl<'a> TaskTable<'a> {
    pub fn new(state: &'a mut AppState, theme: &'a Theme) -> Self {
        Self { state, theme }
    }

    pub fn show(mut self, ui: &mut egui::Ui) {
        ui.add_space(self.theme.spacing);
        ui.horizontal(|ui| {
            ui.heading(RichText::new("Task Management").color(self.theme.text_primary));
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                let add = egui::Button::new(RichText::new("＋ Publish task").strong())
                    .fill(self.theme.primary)
                    .rounding(self.theme.button_rounding);
                if ui.add(add).clicked() {
                    self.state.open_task_add();
                }
            });
        });
        ui.label(
            RichText::new("Create and track routine and ad-hoc farm work")
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
        let filter = &mut self.state.task_filter;
        ui.horizontal(|ui| {
            ui.add(
                egui::TextEdit::singleline(&mut filter.query)
                    .hint_text("Search name or id...")
                    .desired_width(180.0),
            );
            ui.add(
                egui::TextEdit::singleline(&mut filter.assignee)
                    .hint_text("Assignee...")
                    .desired_width(120.0),
            );

            egui::ComboBox::from_id_salt("task_status_filter")
                .selected_text(filter.status.map_or("All statuses", |s| s.label()))
                .show_ui(ui, |ui| {
                    ui.selectable_value(&mut filter.status, None, "All statuses");
                    for status in TaskStatus::ALL {
                        ui.selectable_value(&mut filter.status, Some(status), status.label());
                    }
                });

            egui::ComboBox::from_id_salt("task_priority_filter")
                .selected_text(filter.priority.map_or("All priorities", |p| p.label()))
                .show_ui(ui, |ui| {
                    ui.selectable_value(&mut filter.priority, None, "All priorities");
                    for priority in TaskPriority::ALL {
                        ui.selectable_value(&mut filter.priority, Some(priority), priority.label());
                    }
                });
        });
    }

    fn priority_color(&self, priority: TaskPriority) -> egui::Color32 {
        match priority {
            TaskPriority::High => self.theme.error,
            TaskPriority::Medium => self.theme.warning,
            TaskPriority::Low => self.theme.text_muted,
        }
    }

    fn show_table(&mut self, ui: &mut egui::Ui) {
        let visible: Vec<Task> = self
            .state
            .task_filter
            .apply(self.state.tasks.all())
            .into_iter()
            .cloned()
            .collect();
        let mut action = None;

        egui::ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                egui::Grid::new("task_table")
                    .num_columns(7)
                    .striped(true)
                    .spacing([self.theme.spacing, self.theme.spacing_sm])
                    .show(ui, |ui| {
                        for header in
                            ["Task", "Status", "Priority", "Assignee", "Due", "Pond", ""]
                        {
                            ui.label(
                                RichText::new(header)
                                    .size(11.0)
                                    .strong()
                                    .color(self.theme.text_muted),
                            );
                        }
                        ui.end_row();

                        for task in &visible {
                            ui.vertical(|ui| {
                                ui.label(
                                    RichText::new(&task.name)
                                        .strong()
                                        .color(self.theme.text_primary),
                                );
                                ui.label(
                                    RichText::new(&task.id)
                                        .size(11.0)
                                        .monospace()
                                        .color(self.theme.text_muted),
                                );
                            });
                            ui.label(
                                RichText::new(task.status.label()).color(
                                    self.theme
                                        .status_color(task.status == TaskStatus::Completed),
                                ),
                            );
                            ui.label(
                                RichText::new(task.priority.label())
                                    .color(self.priority_color(task.priority)),
                            );
                            ui.label(&task.assignee);
                            ui.label(&task.due);
                            ui.label(&task.pond);
                            ui.horizontal(|ui| {
                                if ui.small_button("Detail").clicked() {
                                    action = Some(RowAction::Detail(task.id.clone()));
                                }
                                if ui.small_button("Edit").clicked() {
                                    action = Some(RowAction::Edit(task.id.clone()));
                                }
                                if ui.small_button("Delete").clicked() {
                                    action = Some(RowAction::Delete(task.id.clone()));
                                }
                            });
                            ui.end_row();
                        }
                    });

                if visible.is_empty() {
                    ui.add_space(self.theme.spacing);
                    ui.vertical_centered(|ui| {
                        ui.label(
                            RichText::new("No tasks match the current filters")
                                .color(self.theme.text_muted),
                        );
                    });
                }
            });

        match action {
            Some(RowAction::Detail(id)) => self.state.detail_task = Some(id),
            Some(RowAction::Edit(id)) => self.state.open_task_edit(&id),
            Some(RowAction::Delete(id)) => self.state.confirm_delete_task = Some(id),
            None => {}
        }
    }

    fn show_form_window(&mut self, ctx: &egui::Context) {
        if self.state.task_form.is_none() {
            return;
        }

        let mut save_clicked = false;
        let mut cancel_clicked = false;
        let mut analyze_clicked = false;
        let mut execute_clicked = false;

        if let Some(form) = self.state.task_form.as_mut() {
            let title = if form.editing.is_some() {
                "Edit task"
            } else {
                "Publish task"
            };

            egui::Window::new(title)
                .collapsible(false)
                .resizable(false)
                .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
                .show(ctx, |ui| {
                    egui::Grid::new("task_form")
                        .num_columns(2)
                        .spacing([self.theme.spacing, self.theme.spacing_sm])
                        .show(ui, |ui| {
                            ui.label("Name");
                            ui.text_edit_singleline(&mut form.draft.name);
                            ui.end_row();

                            ui.label("Description");
                            ui.text_edit_multiline(&mut form.draft.description);
                            ui.end_row();

                            ui.label("Status");
                            egui::ComboBox::from_id_salt("task_form_status")
                                .selected_text(form.draft.status.label())
                                .show_ui(ui, |ui| {
                                    for status in TaskStatus::ALL {
                                        ui.selectable_value(
                                            &mut form.draft.status,
                                            status,
                                            status.label(),
                                        );
                                    }
                                });
                            ui.end_row();

                            ui.label("Priority");
                            egui::ComboBox::from_id_salt("task_form_priority")
                                .selected_text(form.draft.priority.label())
                                .show_ui(ui, |ui| {
                                    for priority in TaskPriority::ALL {
                                        ui.selectable_value(
                                            &mut form.draft.priority,
                                            priority,
                                            priority.label(),
                                        );
                                    }
                                });
                            ui.end_row();

                            ui.label("Assignee");
                            ui.text_edit_singleline(&mut form.draft.assignee);
                            ui.end_row();

                            ui.label("Due");
                            ui.text_edit_singleline(&mut form.draft.due);
                            ui.end_row();

                            ui.label("Pond");
                            ui.text_edit_singleline(&mut form.draft.pond);
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
                            .id_salt("task_analysis")
                            .max_height(120.0)
                            .show(ui, |ui| {
                                if form.analysis.is_empty() {
                                    ui.add(egui::Spinner::new().color(self.theme.primary));
                                } else {
                                    ui.label(&form.analysis);
                                }
                            });
                    }

                    match form.execution {
                        ExecutionPhase::Idle => {}
                        ExecutionPhase::Processing => {
                            ui.horizontal(|ui| {
                                ui.add(egui::Spinner::new().color(self.theme.primary));
                                ui.label("Executing (simulated)...");
                            });
                        }
                        ExecutionPhase::Done => {
                            ui.colored_label(self.theme.success, "Marked completed");
                        }
                    }

                    ui.add_space(self.theme.spacing_sm);
                    ui.horizontal(|ui| {
                        cancel_clicked = ui.button("Cancel").clicked();
                        analyze_clicked = ui.button("AI analyze").clicked();
                        execute_clicked = ui
                            .add_enabled(
                                form.execution != ExecutionPhase::Processing,
                                egui::Button::new("Execute now"),
                            )
                            .on_hover_text("Simulated: marks the task completed after a delay")
                            .clicked();
                        let save = egui::Button::new(RichText::new("Save").strong())
                            .fill(self.theme.primary);
                        save_clicked = ui.add(save).clicked();
                    });
                });
        }

        if analyze_clicked {
            self.state.analyze_task_draft();
        }
        if execute_clicked {
            self.state.execute_task();
        }
        if save_clicked && self.state.save_task_form() {
            self.state.task_form = None;
        } else if cancel_clicked {
            self.state.task_form = None;
        }
    }

    fn show_delete_window(&mut self, ctx: &egui::Context) {
        let Some(id) = self.state.confirm_delete_task.clone() else {
            return;
        };
        let name = self
            .state
            .tasks
            .get(&id)
            .map(|t| t.name.clone())
            .unwrap_or_else(|| id.clone());

        let mut confirmed = false;
        let mut cancelled = false;
        egui::Window::new("Delete task?")
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
            self.state.confirm_task_delete();
        } else if cancelled {
            self.state.confirm_delete_task = None;
        }
    }

    fn show_detail_window(&mut self, ctx: &egui::Context) {
        let Some(id) = self.state.detail_task.clone() else {
            return;
        };
        let Some(task) = self.state.tasks.get(&id).cloned() else {
            self.state.detail_task = None;
            return;
        };

        let mut close = false;
        egui::Window::new(task.name.clone())
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.label(&task.description);
                ui.add_space(self.theme.spacing_sm);
                egui::Grid::new("task_detail")
                    .num_columns(2)
                    .spacing([self.theme.spacing, self.theme.spacing_sm])
                    .show(ui, |ui| {
                        ui.label(RichText::new("Id").color(self.theme.text_muted));
                        ui.label(RichText::new(&task.id).monospace());
                        ui.end_row();

                        ui.label(RichText::new("Status").color(self.theme.text_muted));
                        ui.label(task.status.label());
                        ui.end_row();

                        ui.label(RichText::new("Priority").color(self.theme.text_muted));
                        ui.label(task.priority.label());
                        ui.end_row();

                        ui.label(RichText::new("Assignee").color(self.theme.text_muted));
                        ui.label(&task.assignee);
                        ui.end_row();

                        ui.label(RichText::new("Due").color(self.theme.text_muted));
                        ui.label(&task.due);
                        ui.end_row();

                        ui.label(RichText::new("Pond").color(self.theme.text_muted));
                        ui.label(&task.pond);
                        ui.end_row();
                    });

                ui.add_space(self.theme.spacing_sm);
                close = ui.button("Close").clicked();
            });

        if close {
            self.state.detail_task = None;
        }
    }
}
