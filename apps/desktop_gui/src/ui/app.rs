use client_core::{QueryMode, ViewSnapshot};
use crossbeam_channel::{Receiver, Sender};
use eframe::egui;
use shared::domain::Employee;

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{UiError, UiErrorContext, UiEvent};
use crate::controller::orchestration::dispatch_backend_command;
use crate::ui::panels::transactions::show_transactions;
use crate::ui::widgets::{EmployeePresenter, InputSelect, ViewportListeners};

pub const APP_TITLE: &str = "Employee Transactions";

pub struct TransactionsApp {
    cmd_tx: Sender<BackendCommand>,
    ui_rx: Receiver<UiEvent>,
    snapshot: ViewSnapshot,
    employee_select: InputSelect<Employee, EmployeePresenter>,
    status: String,
    startup_error: Option<UiError>,
    bootstrap_requested: bool,
}

impl TransactionsApp {
    pub fn new(cmd_tx: Sender<BackendCommand>, ui_rx: Receiver<UiEvent>) -> Self {
        Self {
            cmd_tx,
            ui_rx,
            snapshot: ViewSnapshot::default(),
            employee_select: InputSelect::new(
                "employee_filter",
                "Filter by employee",
                "Loading employees",
                Some(Employee::all_employees()),
                EmployeePresenter,
                ViewportListeners::default(),
            ),
            status: String::new(),
            startup_error: None,
            bootstrap_requested: false,
        }
    }

    fn process_ui_events(&mut self) {
        while let Ok(event) = self.ui_rx.try_recv() {
            match event {
                UiEvent::Info(message) => self.status = message,
                UiEvent::Snapshot(snapshot) => self.snapshot = snapshot,
                UiEvent::Error(err) => {
                    tracing::error!(context = ?err.context(), "{}", err.message());
                    self.startup_error = Some(err);
                }
            }
        }
    }

    /// Kicks off the first load once: no employees yet and none in flight.
    fn maybe_bootstrap(&mut self) {
        if needs_bootstrap(&self.snapshot, self.bootstrap_requested) {
            self.bootstrap_requested = true;
            self.dispatch(BackendCommand::Bootstrap);
        }
    }

    fn dispatch(&mut self, cmd: BackendCommand) {
        dispatch_backend_command(&self.cmd_tx, cmd, &mut self.status);
    }

    fn banner(&self) -> Option<UiError> {
        self.startup_error.clone().or_else(|| {
            self.snapshot
                .error
                .as_ref()
                .map(|message| UiError::from_message(UiErrorContext::LoadTransactions, message.clone()))
        })
    }

    /// Clears the banner. Dismissing a failed first load arms another bootstrap,
    /// since without employees there is nothing left to select.
    fn dismiss_banner(&mut self, context: UiErrorContext) {
        if context == UiErrorContext::BackendStartup {
            self.startup_error = None;
            return;
        }
        self.snapshot.error = None;
        self.dispatch(BackendCommand::DismissError);
        if self.snapshot.employees.is_none() {
            self.bootstrap_requested = false;
        }
    }

    fn show_status_banner(&mut self, ui: &mut egui::Ui) {
        let Some(banner) = self.banner() else {
            return;
        };

        egui::Frame::NONE
            .fill(egui::Color32::from_rgb(111, 53, 53))
            .stroke(egui::Stroke::new(1.0, egui::Color32::from_rgb(175, 96, 96)))
            .corner_radius(8.0)
            .inner_margin(egui::Margin::symmetric(10, 8))
            .show(ui, |ui| {
                ui.horizontal_wrapped(|ui| {
                    ui.label(egui::RichText::new(banner.banner_text()).color(egui::Color32::WHITE));
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.button("Dismiss").clicked() {
                            self.dismiss_banner(banner.context());
                        }
                    });
                });
            });
        ui.add_space(8.0);
    }

    fn show_main(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal_wrapped(|ui| {
                ui.small("Status:");
                ui.small(egui::RichText::new(&self.status).weak());
            });
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading(APP_TITLE);
            ui.separator();
            self.show_status_banner(ui);

            let items = select_items(&self.snapshot);
            if let Some(employee) =
                self.employee_select
                    .show(ui, &items, self.snapshot.employees_loading)
            {
                self.dispatch(BackendCommand::SelectEmployee(employee));
            }
            ui.add_space(12.0);

            if let QueryMode::ByEmployee(employee_id) = &self.snapshot.mode {
                ui.small(format!("Showing transactions for employee {employee_id}"));
            }

            egui::ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui| {
                    if let Some((transaction_id, value)) = show_transactions(
                        ui,
                        &self.snapshot.transactions,
                        self.snapshot.transactions_loading(),
                    ) {
                        self.dispatch(BackendCommand::SetApproval {
                            transaction_id,
                            value,
                        });
                    }

                    if let Some(expected_page) = view_more_page(&self.snapshot) {
                        ui.add_space(8.0);
                        let button = egui::Button::new("View More");
                        if ui
                            .add_enabled(!self.snapshot.paginated_loading, button)
                            .clicked()
                        {
                            self.dispatch(BackendCommand::LoadMore { expected_page });
                        }
                    }
                });
        });
    }
}

/// Dropdown items: the "all employees" entry followed by every employee, or
/// nothing until the employee list has arrived.
pub fn select_items(snapshot: &ViewSnapshot) -> Vec<Employee> {
    match &snapshot.employees {
        None => Vec::new(),
        Some(employees) => std::iter::once(Employee::all_employees())
            .chain(employees.iter().cloned())
            .collect(),
    }
}

pub fn needs_bootstrap(snapshot: &ViewSnapshot, already_requested: bool) -> bool {
    !already_requested && snapshot.employees.is_none() && !snapshot.employees_loading
}

/// Page the "View More" button should request, when the button is visible.
pub fn view_more_page(snapshot: &ViewSnapshot) -> Option<u32> {
    if snapshot.has_more_pages {
        snapshot.next_page
    } else {
        None
    }
}

impl eframe::App for TransactionsApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.process_ui_events();
        self.maybe_bootstrap();
        self.show_main(ctx);

        let busy = self.snapshot.employees_loading || self.snapshot.transactions_loading();
        let interval = if busy { 16 } else { 100 };
        ctx.request_repaint_after(std::time::Duration::from_millis(interval));
    }
}

#[cfg(test)]
#[path = "tests/app_tests.rs"]
mod tests;
