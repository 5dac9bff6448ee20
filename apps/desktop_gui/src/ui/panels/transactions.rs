//! Read-only transaction list with an approval checkbox per row.

use eframe::egui;
use shared::domain::{Transaction, TransactionId};

pub fn format_amount(amount: f64) -> String {
    format!("${amount:.2}")
}

/// Renders the merged list. Returns the approval toggle the user clicked, if any.
pub fn show_transactions(
    ui: &mut egui::Ui,
    transactions: &[Transaction],
    loading: bool,
) -> Option<(TransactionId, bool)> {
    if transactions.is_empty() {
        let text = if loading { "Loading..." } else { "No transactions" };
        ui.label(egui::RichText::new(text).weak());
        return None;
    }

    let mut toggled = None;
    for tx in transactions {
        egui::Frame::group(ui.style()).show(ui, |ui| {
            ui.set_width(ui.available_width());
            ui.horizontal(|ui| {
                let mut approved = tx.approved;
                if ui.checkbox(&mut approved, "").changed() {
                    toggled = Some((tx.id.clone(), approved));
                }
                ui.vertical(|ui| {
                    ui.label(egui::RichText::new(&tx.merchant).strong());
                    ui.small(format!(
                        "{} - {}",
                        tx.employee.display_name(),
                        tx.date.format("%b %d, %Y")
                    ));
                });
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.label(format_amount(tx.amount));
                });
            });
        });
    }
    toggled
}
