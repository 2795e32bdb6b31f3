mod backend_bridge;
mod controller;
mod ui;

use clap::Parser;
use client_core::ClientSettings;
use crossbeam_channel::bounded;
use eframe::egui;
use tracing_subscriber::EnvFilter;

use crate::ui::app::DashboardApp;

#[derive(Debug, Parser)]
#[command(
    name = "dashboard_gui",
    about = "Desktop dashboard for the employee API"
)]
struct Args {
    /// Base address of the employee API, e.g. http://localhost:8080
    #[arg(long)]
    api_base: Option<String>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let mut settings = ClientSettings::load()?;
    if let Some(api_base) = args.api_base.as_deref() {
        settings = settings.with_api_base(api_base)?;
    }
    tracing::info!(
        api_base = settings.api_base(),
        "starting employee dashboard"
    );

    let (cmd_tx, cmd_rx) = bounded(256);
    let (ui_tx, ui_rx) = bounded(2048);
    backend_bridge::runtime::launch(settings.clone(), cmd_rx, ui_tx);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Employee Dashboard")
            .with_inner_size([960.0, 720.0]),
        ..Default::default()
    };

    let app = DashboardApp::new(cmd_tx, ui_rx, settings.api_base());
    eframe::run_native(
        "Employee Dashboard",
        options,
        Box::new(move |_cc| Ok(Box::new(app))),
    )
    .map_err(|err| anyhow::anyhow!("dashboard window failed: {err}"))
}
