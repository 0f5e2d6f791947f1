//! Entry point for the GINI data playground window.
#![cfg_attr(
    all(not(debug_assertions), target_os = "windows"),
    windows_subsystem = "windows"
)]
use eframe::egui;
use ginilab::api::{CachedBackend, HttpBackend};
use ginilab::config::{self, AppConfig};
use ginilab::egui_app::controller::PlaygroundController;
use ginilab::egui_app::ui::{EguiApp, MIN_VIEWPORT_SIZE};
use ginilab::logging;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = config::load_or_default();
    let settings = config
        .as_ref()
        .map(|cfg| cfg.logging.clone())
        .unwrap_or_default();
    if let Err(err) = logging::init(&settings) {
        eprintln!("Logging disabled: {err}");
    }

    let viewport = egui::ViewportBuilder::default()
        .with_min_inner_size(MIN_VIEWPORT_SIZE)
        .with_inner_size(egui::vec2(1280.0, 860.0));
    let native_options = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };

    eframe::run_native(
        "GINI Data Playground",
        native_options,
        Box::new(move |_cc| match config {
            Ok(config) => Ok(Box::new(build_app(config))),
            Err(err) => {
                tracing::error!(error = %err, "Configuration unusable");
                Ok(Box::new(LaunchError {
                    message: format!("Failed to load config: {err}"),
                }))
            }
        }),
    )?;
    Ok(())
}

fn build_app(config: AppConfig) -> EguiApp {
    tracing::info!(base_url = %config.api.base_url, "Starting playground");
    let backend = CachedBackend::new(HttpBackend::from_settings(&config.api), &config.cache);
    let mut controller = PlaygroundController::new(Box::new(backend));
    if let Some(identity) = config.session {
        controller.sign_in(identity);
    }
    EguiApp::new(controller)
}

/// Minimal fallback app to display initialization errors.
struct LaunchError {
    message: String,
}

impl eframe::App for LaunchError {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.heading("Failed to start UI");
                ui.label(&self.message);
            });
        });
    }
}
