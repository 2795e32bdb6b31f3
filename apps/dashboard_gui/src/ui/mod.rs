//! UI layer: the dashboard window.

pub mod app;
