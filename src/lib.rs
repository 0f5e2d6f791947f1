//! GINI data playground: explore how socioeconomic indicators move the
//! predicted Gini coefficient served by the playground backend.

/// Backend API client, wire types and response caching.
pub mod api;
/// Application directory resolution.
pub mod app_dirs;
/// Application configuration loading.
pub mod config;
/// Starting values for the playground form.
pub mod defaults;
/// egui controller, state and renderer.
pub mod egui_app;
/// Aggregated orchestration errors.
pub mod error;
/// Feature catalogue and model input snapshots.
pub mod features;
/// Saving and loading named graphs.
pub mod graphs;
pub(crate) mod http_client;
/// Tracing subscriber setup and log file rotation.
pub mod logging;
/// Preset country scenarios.
pub mod presets;
/// Per-user session state.
pub mod session;
/// Sweep validation and prediction requests.
pub mod sweep;
