//! Command orchestration helpers from UI actions to backend command queue.

use crossbeam_channel::{Sender, TrySendError};

use crate::backend_bridge::commands::BackendCommand;

pub const QUEUE_FULL: &str = "UI command queue is full; please retry";
pub const WORKER_DISCONNECTED: &str =
    "Backend command processor disconnected (possible startup/runtime failure)";

/// A command the backend never received, handed back to the caller.
pub struct RejectedCommand {
    pub command: BackendCommand,
    pub reason: &'static str,
}

pub fn dispatch_backend_command(
    cmd_tx: &Sender<BackendCommand>,
    cmd: BackendCommand,
) -> Result<(), RejectedCommand> {
    let cmd_name = cmd.name();
    match cmd_tx.try_send(cmd) {
        Ok(()) => {
            tracing::debug!(command = cmd_name, "queued ui->backend command");
            Ok(())
        }
        Err(TrySendError::Full(command)) => {
            tracing::warn!(command = cmd_name, "ui->backend command queue is full");
            Err(RejectedCommand {
                command,
                reason: QUEUE_FULL,
            })
        }
        Err(TrySendError::Disconnected(command)) => {
            tracing::error!(command = cmd_name, "backend command processor disconnected");
            Err(RejectedCommand {
                command,
                reason: WORKER_DISCONNECTED,
            })
        }
    }
}
