//! The dashboard window: banner, employee form and employee table.

use std::time::{Duration, Instant};

use client_core::{Command, FetchError, FormField, FormMode, Intent, StatusKind, ViewState};
use crossbeam_channel::{Receiver, Sender};
use eframe::egui;
use shared::domain::Employee;

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::{
    events::{UiError, UiErrorContext, UiEvent},
    orchestration::dispatch_backend_command,
};

/// Upper bound between repaints so backend events are picked up promptly.
const EVENT_POLL_INTERVAL: Duration = Duration::from_millis(100);
const FORM_FIELDS: [FormField; 3] = [FormField::Name, FormField::Email, FormField::Departments];

pub struct DashboardApp {
    cmd_tx: Sender<BackendCommand>,
    ui_rx: Receiver<UiEvent>,
    state: ViewState,
    api_base_input: String,
    connected_api_base: Option<String>,
    backend_status: String,
    backend_error: Option<UiError>,
}

impl DashboardApp {
    pub fn new(cmd_tx: Sender<BackendCommand>, ui_rx: Receiver<UiEvent>, api_base: &str) -> Self {
        Self {
            cmd_tx,
            ui_rx,
            state: ViewState::new(),
            api_base_input: api_base.to_string(),
            connected_api_base: None,
            backend_status: String::new(),
            backend_error: None,
        }
    }

    fn process_ui_events(&mut self) {
        while let Ok(event) = self.ui_rx.try_recv() {
            self.apply_ui_event(event, Instant::now());
        }
    }

    fn apply_ui_event(&mut self, event: UiEvent, now: Instant) {
        match event {
            UiEvent::Info(message) => self.backend_status = message,
            UiEvent::Connected { api_base } => {
                self.backend_status = format!("Connected to {api_base}");
                self.backend_error = None;
                self.api_base_input = api_base.clone();
                self.connected_api_base = Some(api_base);
                self.intent(Intent::Refresh, now);
            }
            UiEvent::Outcome(outcome) => {
                let follow_up = self.state.apply(outcome, now);
                self.run(follow_up, now);
            }
            UiEvent::Error(err) => {
                tracing::warn!(context = ?err.context(), "backend error: {}", err.message());
                // The startup list never ran; stop showing the loading line.
                if err.context() == UiErrorContext::BackendStartup && self.state.is_loading() {
                    let failed = FetchError::Transport(err.message().to_string());
                    self.state.apply(Command::List.into_failure(failed), now);
                }
                self.backend_error = Some(err);
            }
        }
    }

    fn intent(&mut self, intent: Intent, now: Instant) {
        let command = self.state.dispatch(intent, now);
        self.run(command, now);
    }

    /// Queues `next` for the backend. A command the backend never receives
    /// is folded back as a failed request so flags do not stay raised.
    fn run(&mut self, mut next: Option<Command>, now: Instant) {
        while let Some(command) = next.take() {
            let Err(rejected) =
                dispatch_backend_command(&self.cmd_tx, BackendCommand::Gateway(command))
            else {
                continue;
            };
            self.backend_error =
                Some(UiError::from_message(UiErrorContext::CommandQueue, rejected.reason));
            if let BackendCommand::Gateway(command) = rejected.command {
                let outcome = command.into_failure(FetchError::Transport(rejected.reason.into()));
                next = self.state.apply(outcome, now);
            }
        }
    }

    fn reconnect(&mut self) {
        let cmd = BackendCommand::Reconfigure {
            api_base: self.api_base_input.trim().to_string(),
        };
        match dispatch_backend_command(&self.cmd_tx, cmd) {
            Ok(()) => self.backend_status = "Connecting...".to_string(),
            Err(rejected) => {
                self.backend_error =
                    Some(UiError::from_message(UiErrorContext::CommandQueue, rejected.reason));
            }
        }
    }

    fn show_connection_bar(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.label("API");
            let response = ui.add(
                egui::TextEdit::singleline(&mut self.api_base_input)
                    .id_salt("api_base_input")
                    .hint_text("http://localhost:8080")
                    .desired_width(260.0),
            );
            let submitted = response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
            let changed = self.connected_api_base.as_deref() != Some(self.api_base_input.trim());
            let button = egui::Button::new("Connect");
            let connect = ui.add_enabled(changed, button).clicked();
            if changed && (connect || submitted) {
                self.reconnect();
            }
        });
    }

    fn show_status_banner(&mut self, ui: &mut egui::Ui, now: Instant) {
        let Some(status) = self.state.status(now).cloned() else {
            return;
        };
        let (fill, stroke, text_color) = match status.kind {
            StatusKind::Error => (
                egui::Color32::from_rgb(254, 242, 242),
                egui::Color32::from_rgb(248, 113, 113),
                egui::Color32::from_rgb(153, 27, 27),
            ),
            StatusKind::Info => (
                egui::Color32::from_rgb(236, 253, 245),
                egui::Color32::from_rgb(52, 211, 153),
                egui::Color32::from_rgb(6, 95, 70),
            ),
        };

        let mut dismissed = false;
        egui::Frame::NONE
            .fill(fill)
            .stroke(egui::Stroke::new(1.0, stroke))
            .corner_radius(8.0)
            .inner_margin(egui::Margin::symmetric(10, 8))
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    let text = egui::RichText::new(&status.text).color(text_color);
                    ui.label(text.strong());
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        dismissed = ui.small_button("Dismiss").clicked();
                    });
                });
            });
        if dismissed {
            self.intent(Intent::DismissStatus, now);
        }
    }

    fn show_form(&mut self, ui: &mut egui::Ui, now: Instant) {
        let mut intents = Vec::new();
        let editing = matches!(self.state.mode(), FormMode::Edit(_));
        let saving = self.state.is_saving();

        egui::Frame::group(ui.style()).show(ui, |ui| {
            ui.set_width(ui.available_width());
            ui.horizontal(|ui| {
                let title = if editing {
                    "Edit Employee"
                } else {
                    "Add Employee"
                };
                ui.heading(title);
                if editing && ui.link("Cancel edit").clicked() {
                    intents.push(Intent::CancelEdit);
                }
            });
            ui.add_space(4.0);

            let mut submitted = false;
            egui::Grid::new("employee_form")
                .num_columns(2)
                .spacing([12.0, 8.0])
                .show(ui, |ui| {
                    for field in FORM_FIELDS {
                        let label = match field {
                            FormField::Departments => field.label().to_string(),
                            _ => format!("{} *", field.label()),
                        };
                        ui.label(label);
                        let mut value = field.value(self.state.form()).to_string();
                        let response = ui.add(
                            egui::TextEdit::singleline(&mut value)
                                .id_salt(("employee_form", field.label()))
                                .hint_text(field.hint())
                                .desired_width(320.0),
                        );
                        if response.changed() {
                            intents.push(Intent::EditField(field, value));
                        }
                        if response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                            submitted = true;
                        }
                        ui.end_row();
                    }
                });

            ui.add_space(6.0);
            let label = if saving {
                "Saving..."
            } else if editing {
                "Update Employee"
            } else {
                "Create Employee"
            };
            if ui.add_enabled(!saving, egui::Button::new(label)).clicked() || submitted {
                intents.push(Intent::Submit);
            }
        });

        for intent in intents {
            self.intent(intent, now);
        }
    }

    fn show_employee_table(&mut self, ui: &mut egui::Ui, now: Instant) {
        let mut intents = Vec::new();

        egui::Frame::group(ui.style()).show(ui, |ui| {
            ui.set_width(ui.available_width());
            ui.horizontal(|ui| {
                ui.heading("Employees");
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.button("Refresh").clicked() {
                        intents.push(Intent::Refresh);
                    }
                });
            });
            ui.separator();

            if self.state.is_loading() {
                ui.horizontal(|ui| {
                    ui.spinner();
                    ui.label("Loading employees...");
                });
            } else if self.state.employees().is_empty() {
                ui.weak("No employees found.");
            } else {
                egui::ScrollArea::vertical()
                    .id_salt("employee_table")
                    .auto_shrink([false, true])
                    .show(ui, |ui| {
                        egui::Grid::new("employee_rows")
                            .num_columns(4)
                            .striped(true)
                            .spacing([16.0, 6.0])
                            .show(ui, |ui| {
                                ui.strong("Name");
                                ui.strong("Email");
                                ui.strong("Departments");
                                ui.strong("Actions");
                                ui.end_row();

                                let editing = self.state.editing();
                                for employee in self.state.employees() {
                                    employee_row(
                                        ui,
                                        employee,
                                        editing == Some(&employee.id),
                                        &mut intents,
                                    );
                                }
                            });
                    });
            }
        });

        for intent in intents {
            self.intent(intent, now);
        }
    }

    fn show_footer(&self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| match &self.backend_error {
            Some(err) => {
                ui.colored_label(ui.visuals().error_fg_color, err.summary());
            }
            None => {
                ui.weak(&self.backend_status);
            }
        });
    }
}

fn employee_row(
    ui: &mut egui::Ui,
    employee: &Employee,
    is_editing: bool,
    intents: &mut Vec<Intent>,
) {
    let name = egui::RichText::new(&employee.name);
    ui.label(if is_editing { name.strong() } else { name });
    ui.label(&employee.email);
    if employee.departments.is_empty() {
        ui.weak("-");
    } else {
        ui.label(&employee.departments);
    }
    ui.horizontal(|ui| {
        if ui.small_button("Edit").clicked() {
            intents.push(Intent::BeginEdit(employee.clone()));
        }
        if ui.small_button("Delete").clicked() {
            intents.push(Intent::Delete(employee.id.clone()));
        }
    });
    ui.end_row();
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.process_ui_events();
        let now = Instant::now();
        self.state.expire_status(now);

        egui::TopBottomPanel::top("dashboard_header").show(ctx, |ui| {
            ui.add_space(6.0);
            ui.heading("Employee Dashboard");
            ui.add_space(4.0);
            self.show_connection_bar(ui);
            ui.add_space(6.0);
        });

        egui::TopBottomPanel::bottom("dashboard_footer").show(ctx, |ui| {
            self.show_footer(ui);
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            self.show_status_banner(ui, now);
            ui.add_space(8.0);
            self.show_form(ui, now);
            ui.add_space(12.0);
            self.show_employee_table(ui, now);
        });

        let wait = self
            .state
            .status_deadline()
            .map(|deadline| deadline.saturating_duration_since(now))
            .map_or(EVENT_POLL_INTERVAL, |left| left.min(EVENT_POLL_INTERVAL));
        ctx.request_repaint_after(wait);
    }
}

#[cfg(test)]
#[path = "tests/app_tests.rs"]
mod tests;
