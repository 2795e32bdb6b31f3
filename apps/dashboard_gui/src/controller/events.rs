//! Backend-to-UI events and error modeling for the dashboard controller.

use client_core::Outcome;

pub enum UiEvent {
    Info(String),
    /// The gateway now targets `api_base`; the list should be reloaded.
    Connected {
        api_base: String,
    },
    Outcome(Outcome),
    Error(UiError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorContext {
    BackendStartup,
    Configuration,
    CommandQueue,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UiError {
    context: UiErrorContext,
    message: String,
}

impl UiError {
    pub fn from_message(context: UiErrorContext, message: impl Into<String>) -> Self {
        Self {
            context,
            message: message.into(),
        }
    }

    pub fn context(&self) -> UiErrorContext {
        self.context
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn summary(&self) -> String {
        match self.context {
            UiErrorContext::BackendStartup => {
                format!("Backend worker startup failure: {}", self.message)
            }
            UiErrorContext::Configuration => format!("API address rejected: {}", self.message),
            UiErrorContext::CommandQueue => self.message.clone(),
        }
    }
}
