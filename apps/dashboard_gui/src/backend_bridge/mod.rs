//! Backend worker: owns the tokio runtime and the HTTP gateway.

pub mod commands;
pub mod runtime;
