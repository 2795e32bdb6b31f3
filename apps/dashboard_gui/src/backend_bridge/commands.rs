//! Backend commands queued from UI to backend worker.

use client_core::Command;

pub enum BackendCommand {
    /// Run one gateway call and report its outcome.
    Gateway(Command),
    /// Point the gateway at a different api base address.
    Reconfigure { api_base: String },
}

impl BackendCommand {
    pub fn name(&self) -> &'static str {
        match self {
            BackendCommand::Gateway(command) => command.name(),
            BackendCommand::Reconfigure { .. } => "reconfigure",
        }
    }
}
