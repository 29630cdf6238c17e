//! Binary crate for the desktop weather app.

use eframe::egui;
use tracing_subscriber::EnvFilter;
use weather_core::{Config, Flow};

mod app;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::load()?;
    let flow = Flow::from_config(&config)?;

    tracing::info!("starting weather app");

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([500.0, 450.0])
            .with_title("Weather"),
        ..Default::default()
    };

    eframe::run_native(
        "Weather",
        options,
        Box::new(|_cc| Ok(Box::new(app::WeatherApp::new(flow)))),
    )
    .map_err(|e| anyhow::anyhow!("failed to start UI: {e}"))
}
