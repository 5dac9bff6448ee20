//! Backend worker: owns the coordinator and applies UI commands in arrival order.

use std::{sync::Arc, thread};

use client_core::{ClientError, ClientSettings, HttpTransactionsApi, ViewCoordinator, ViewSnapshot};
use crossbeam_channel::{Receiver, Sender};
use tokio::sync::watch;

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{UiError, UiErrorContext, UiEvent};

pub fn launch(
    settings: ClientSettings,
    cmd_rx: Receiver<BackendCommand>,
    ui_tx: Sender<UiEvent>,
) -> thread::JoinHandle<()> {
    thread::spawn(move || run_worker(settings, cmd_rx, ui_tx))
}

fn run_worker(settings: ClientSettings, cmd_rx: Receiver<BackendCommand>, ui_tx: Sender<UiEvent>) {
    let _ = ui_tx.try_send(UiEvent::Info("Backend worker starting...".to_string()));
    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .worker_threads(1)
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(err) => {
            let _ = ui_tx.try_send(UiEvent::Error(UiError::from_message(
                UiErrorContext::BackendStartup,
                format!("backend worker startup failure: failed to build runtime: {err}"),
            )));
            tracing::error!("failed to build backend runtime: {err}");
            return;
        }
    };

    runtime.block_on(async move {
        let api = match HttpTransactionsApi::new(&settings) {
            Ok(api) => api,
            Err(err) => {
                tracing::error!(server_url = %settings.server_url, "invalid client settings: {err}");
                let _ = ui_tx.try_send(UiEvent::Error(UiError::from_message(
                    UiErrorContext::BackendStartup,
                    err.to_string(),
                )));
                return;
            }
        };
        tracing::info!(server_url = %api.base_url(), "backend worker ready");

        let mut coordinator = ViewCoordinator::new(Arc::new(api));
        let forwarder = tokio::spawn(forward_snapshots(coordinator.subscribe(), ui_tx.clone()));
        let _ = ui_tx.try_send(UiEvent::Info("Backend worker ready".to_string()));

        while let Ok(cmd) = cmd_rx.recv() {
            if let Err(err) = handle_command(&mut coordinator, cmd).await {
                // The coordinator already recorded the failure in its snapshot.
                tracing::warn!(route = ?err.route(), "backend command failed: {err}");
            }
        }

        tracing::info!("ui command channel closed; stopping backend worker");
        forwarder.abort();
    });
}

async fn forward_snapshots(mut rx: watch::Receiver<ViewSnapshot>, ui_tx: Sender<UiEvent>) {
    while rx.changed().await.is_ok() {
        let snapshot = rx.borrow_and_update().clone();
        if ui_tx.try_send(UiEvent::Snapshot(snapshot)).is_err() {
            tracing::warn!("ui event queue unavailable; dropping snapshot");
        }
    }
}

async fn handle_command(
    coordinator: &mut ViewCoordinator,
    cmd: BackendCommand,
) -> Result<(), ClientError> {
    tracing::debug!(command = cmd.name(), "backend: handling command");
    match cmd {
        BackendCommand::Bootstrap => {
            coordinator.bootstrap().await?;
        }
        BackendCommand::SelectEmployee(employee) => {
            coordinator.on_employee_selected(&employee).await?;
        }
        BackendCommand::LoadMore { expected_page } => {
            if !coordinator.load_more(expected_page).await? {
                tracing::debug!(expected_page, "backend: load_more superseded");
            }
        }
        BackendCommand::SetApproval {
            transaction_id,
            value,
        } => {
            coordinator
                .set_transaction_approval(&transaction_id, value)
                .await?;
        }
        BackendCommand::DismissError => coordinator.dismiss_error(),
    }
    Ok(())
}
