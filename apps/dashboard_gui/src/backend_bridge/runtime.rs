//! Runtime bridge between UI command queue and the employee gateway.

use std::{sync::Arc, thread};

use client_core::{execute, ClientSettings, FetchError, HttpEmployeeGateway};
use crossbeam_channel::{Receiver, Sender};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{UiError, UiErrorContext, UiEvent};

const NOT_CONNECTED: &str = "employee api is not configured";

/// Spawns the backend worker thread. It exits once every command sender is
/// dropped.
pub fn launch(
    settings: ClientSettings,
    cmd_rx: Receiver<BackendCommand>,
    ui_tx: Sender<UiEvent>,
) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        let _ = ui_tx.try_send(UiEvent::Info("Backend worker starting...".to_string()));
        let runtime = match tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(err) => {
                let _ = ui_tx.try_send(UiEvent::Error(UiError::from_message(
                    UiErrorContext::BackendStartup,
                    format!("failed to build runtime: {err}"),
                )));
                tracing::error!("failed to build backend runtime: {err}");
                return;
            }
        };

        runtime.block_on(async move {
            let mut gateway = connect(&settings, &ui_tx);

            while let Ok(cmd) = cmd_rx.recv() {
                match cmd {
                    BackendCommand::Gateway(command) => {
                        let Some(gateway) = gateway.clone() else {
                            let outcome =
                                command.into_failure(FetchError::Transport(NOT_CONNECTED.into()));
                            deliver(&ui_tx, UiEvent::Outcome(outcome));
                            continue;
                        };
                        let ui_tx = ui_tx.clone();
                        tokio::spawn(async move {
                            let outcome = execute(gateway.as_ref(), command).await;
                            deliver(&ui_tx, UiEvent::Outcome(outcome));
                        });
                    }
                    BackendCommand::Reconfigure { api_base } => {
                        match ClientSettings::default().with_api_base(&api_base) {
                            Ok(settings) => {
                                if let Some(next) = connect(&settings, &ui_tx) {
                                    gateway = Some(next);
                                }
                            }
                            Err(err) => {
                                tracing::warn!(api_base = %api_base, "rejected api base: {err}");
                                deliver(
                                    &ui_tx,
                                    UiEvent::Error(UiError::from_message(
                                        UiErrorContext::Configuration,
                                        err.to_string(),
                                    )),
                                );
                            }
                        }
                    }
                }
            }
            tracing::info!("backend command queue closed; worker exiting");
        });
    })
}

fn connect(settings: &ClientSettings, ui_tx: &Sender<UiEvent>) -> Option<Arc<HttpEmployeeGateway>> {
    match HttpEmployeeGateway::new(settings) {
        Ok(gateway) => {
            tracing::info!(api_base = %gateway.api_base(), "employee gateway ready");
            deliver(
                ui_tx,
                UiEvent::Connected {
                    api_base: settings.api_base().to_string(),
                },
            );
            Some(Arc::new(gateway))
        }
        Err(err) => {
            tracing::error!("failed to build employee gateway: {err}");
            deliver(
                ui_tx,
                UiEvent::Error(UiError::from_message(
                    UiErrorContext::Configuration,
                    err.to_string(),
                )),
            );
            None
        }
    }
}

fn deliver(ui_tx: &Sender<UiEvent>, event: UiEvent) {
    if ui_tx.try_send(event).is_err() {
        tracing::warn!("ui event queue unavailable; dropping backend event");
    }
}
