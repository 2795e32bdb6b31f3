//! Client side of the employee dashboard: HTTP gateway, view state, and the
//! intent → command → outcome pipeline that connects them.

pub mod config;
pub mod dashboard;
pub mod gateway;
pub mod store;

pub use config::{ClientSettings, SettingsError, DEFAULT_API_BASE};
pub use dashboard::{execute, Command, Dashboard, Intent, Outcome};
pub use gateway::{EmployeeGateway, FetchError, HttpEmployeeGateway};
pub use store::{FormField, FormMode, StatusKind, StatusMessage, ViewState, STATUS_VISIBILITY};
