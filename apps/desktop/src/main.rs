use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use client_core::{ClientSettings, HttpTransactionsApi, ViewCoordinator};
use shared::domain::{Employee, EmployeeId, Transaction};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(about = "List transactions from the mock transactions server")]
struct Args {
    #[arg(long)]
    server_url: Option<String>,
    /// Number of "all transactions" pages to load.
    #[arg(long, default_value_t = 1)]
    pages: u32,
    /// Show every transaction of one employee instead of paging.
    #[arg(long)]
    employee: Option<String>,
    /// Print rows as JSON lines.
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .init();
    let args = Args::parse();

    let mut settings = ClientSettings::load();
    if let Some(server_url) = args.server_url.as_deref() {
        settings.set_server_url(server_url);
    }
    let api = HttpTransactionsApi::new(&settings).context("invalid client settings")?;
    let mut coordinator = ViewCoordinator::new(Arc::new(api));

    coordinator
        .bootstrap()
        .await
        .with_context(|| format!("failed to load first page from {}", settings.server_url))?;

    match args.employee {
        Some(employee_id) => {
            let employee_id = EmployeeId::new(employee_id);
            let known = coordinator
                .employees()
                .is_some_and(|employees| employees.iter().any(|e| e.id == employee_id));
            if !known {
                tracing::warn!(employee_id = %employee_id, "employee not in employee list");
            }
            coordinator
                .load_transactions_by_employee(&employee_id)
                .await
                .with_context(|| format!("failed to load transactions for {employee_id}"))?;
        }
        None => {
            for _ in 1..args.pages {
                let Some(next_page) = coordinator.snapshot().next_page else {
                    break;
                };
                if !coordinator.has_more_pages() {
                    break;
                }
                coordinator
                    .load_more(next_page)
                    .await
                    .with_context(|| format!("failed to load page {next_page}"))?;
            }
        }
    }

    if let Some(employees) = coordinator.employees() {
        if !args.json {
            print_employees(employees);
        }
    }
    for tx in coordinator.transactions() {
        if args.json {
            println!("{}", serde_json::to_string(tx)?);
        } else {
            println!("{}", format_row(tx));
        }
    }
    if !args.json && coordinator.has_more_pages() {
        println!("... more pages available (use --pages)");
    }

    Ok(())
}

fn print_employees(employees: &[Employee]) {
    let names: Vec<String> = employees
        .iter()
        .map(|e| format!("{} ({})", e.display_name(), e.id))
        .collect();
    println!("Employees: {}", names.join(", "));
}

fn format_row(tx: &Transaction) -> String {
    let mark = if tx.approved { "x" } else { " " };
    format!(
        "[{mark}] {id:<12} {date} {merchant:<24} {amount:>10.2}  {employee}",
        id = tx.id,
        date = tx.date,
        merchant = tx.merchant,
        amount = tx.amount,
        employee = tx.employee.display_name(),
    )
}
