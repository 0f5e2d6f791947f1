//! Event handlers bridging the session, the backend and the egui UI.

use crate::api::{PlaygroundBackend, PredictionSeries, SavedGraph};
use crate::defaults;
use crate::egui_app::state::*;
use crate::error::PlaygroundError;
use crate::features::{self, FeatureSnapshot, Region, ScalarFeature};
use crate::graphs;
use crate::presets::{self, PresetEntry};
use crate::session::{AppliedPreset, Session, UserIdentity};
use crate::sweep;

pub const FEATURE_FALLBACK_WARNING: &str = "Backend unavailable - using default features";
pub const NO_PRESETS_MESSAGE: &str = "No presets available";
pub const NO_SAVED_GRAPHS_MESSAGE: &str = "No saved graphs found";
/// Appended to errors that may clear up when the action is repeated.
pub const RETRY_HINT: &str = "Please try again.";

/// Maintains app state and runs every user action to completion.
///
/// Handlers block on the backend and always leave the UI consistent: on
/// failure the previous session values stay in place and a status is set.
pub struct PlaygroundController {
    pub ui: UiState,
    backend: Box<dyn PlaygroundBackend>,
    session: Session,
    presets: Vec<PresetEntry>,
    saved_graphs: Vec<SavedGraph>,
}

impl PlaygroundController {
    pub fn new(backend: Box<dyn PlaygroundBackend>) -> Self {
        Self {
            ui: UiState::default(),
            backend,
            session: Session::default(),
            presets: Vec::new(),
            saved_graphs: Vec::new(),
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_authenticated()
    }

    pub fn graph_data(&self) -> Option<&PredictionSeries> {
        self.session.graph_data()
    }

    pub fn presets(&self) -> &[PresetEntry] {
        &self.presets
    }

    pub fn saved_graphs(&self) -> &[SavedGraph] {
        &self.saved_graphs
    }

    /// Sign in with the values typed into the gate form.
    pub fn sign_in_from_form(&mut self) {
        let Some(user_id) = self
            .ui
            .sign_in
            .user_id
            .trim()
            .parse::<u64>()
            .ok()
            .filter(|id| *id > 0)
        else {
            self.ui.sign_in.error = Some("User ID must be a positive whole number".into());
            return;
        };
        let form = &self.ui.sign_in;
        let identity = UserIdentity {
            user_id: Some(user_id),
            name: form.name.trim().to_string(),
            roles: form
                .roles
                .split(',')
                .map(str::trim)
                .filter(|role| !role.is_empty())
                .map(str::to_string)
                .collect(),
        };
        self.sign_in(identity);
    }

    /// Start a session for `identity` and load everything the page needs.
    pub fn sign_in(&mut self, identity: UserIdentity) {
        self.ui = UiState::default();
        self.session.sign_in(identity);
        if let Err(err) = self.session.require_user() {
            self.halt(err);
            return;
        }
        self.bootstrap();
    }

    /// Populate features, presets, saved graphs and the form.
    pub fn bootstrap(&mut self) {
        self.refresh_features();
        self.refresh_feature_stds();
        self.refresh_presets();
        self.refresh_saved_graphs();
        self.reset_form();
        if self.ui.status.tone == StatusTone::Idle {
            let name = self.session.identity().display_name().to_string();
            self.set_status(format!("Welcome, {name}"), StatusTone::Info);
        }
    }

    /// Fill the x-axis options from the session cache or the backend.
    pub fn refresh_features(&mut self) {
        let names = match self.session.available_features() {
            Some(names) => names.to_vec(),
            None => match self.backend.list_features() {
                Ok(backend_names) => {
                    let names: Vec<String> = backend_names
                        .iter()
                        .map(|name| features::to_display_name(name).into_owned())
                        .collect();
                    self.session.set_available_features(names.clone());
                    self.ui.features.using_fallback = false;
                    names
                }
                Err(err) => {
                    tracing::warn!(error = %err, "Feature list unavailable; using built-in list");
                    self.ui.features.using_fallback = true;
                    self.set_status(FEATURE_FALLBACK_WARNING, StatusTone::Warning);
                    features::fallback_display_names()
                }
            },
        };
        self.ui.features.options = features::sweepable_features(&names);
    }

    pub fn refresh_feature_stds(&mut self) {
        if self.session.feature_stds().is_some() {
            return;
        }
        match self.backend.fetch_feature_stds() {
            Ok(stds) => self.session.set_feature_stds(stds),
            Err(err) => {
                tracing::warn!(error = %err, "Standard deviations unavailable");
                self.set_status(
                    format!("Could not load feature statistics: {err}"),
                    StatusTone::Warning,
                );
            }
        }
    }

    pub fn refresh_presets(&mut self) {
        match self.backend.fetch_presets() {
            Ok(entries) => {
                self.ui
                    .presets
                    .set_labels(entries.iter().map(PresetEntry::label).collect());
                if entries.is_empty() {
                    self.ui.presets.error = Some(NO_PRESETS_MESSAGE.into());
                }
                self.presets = entries;
            }
            Err(err) => {
                self.presets.clear();
                self.ui.presets.set_error(NO_PRESETS_MESSAGE);
                self.set_status(format!("Failed to load presets: {err}"), StatusTone::Error);
            }
        }
    }

    pub fn refresh_saved_graphs(&mut self) {
        match graphs::list_saved_graphs(self.backend.as_ref(), &self.session) {
            Ok(graphs) => {
                self.ui
                    .saved_graphs
                    .set_labels(graphs.iter().map(SavedGraph::label).collect());
                if graphs.is_empty() {
                    self.ui.saved_graphs.error = Some(NO_SAVED_GRAPHS_MESSAGE.into());
                }
                self.saved_graphs = graphs;
            }
            Err(err) => {
                self.saved_graphs.clear();
                self.ui.saved_graphs.set_error(NO_SAVED_GRAPHS_MESSAGE);
                self.report(err);
            }
        }
    }

    /// Apply the preset at `index` and reset the form to its values.
    pub fn apply_preset(&mut self, index: usize) {
        let Some(entry) = self.presets.get(index) else {
            self.set_status(NO_PRESETS_MESSAGE, StatusTone::Warning);
            return;
        };
        let label = entry.label();
        let snapshot = presets::apply_preset(entry);
        self.session.set_selected_preset(AppliedPreset {
            label: label.clone(),
            snapshot,
        });
        self.ui.presets.selected = Some(index);
        self.reset_form();
        self.set_status(format!("Applied preset {label}"), StatusTone::Info);
    }

    /// Load the saved graph at `index` and reset the form to its values.
    pub fn load_saved_graph(&mut self, index: usize) {
        let Some(id) = self.saved_graphs.get(index).map(|graph| graph.id) else {
            self.set_status(NO_SAVED_GRAPHS_MESSAGE, StatusTone::Warning);
            return;
        };
        match graphs::load_graph(self.backend.as_ref(), &mut self.session, id) {
            Ok(graph) => {
                let message = format!("Loaded graph '{}'", graph.name);
                self.ui.saved_graphs.selected = Some(index);
                self.reset_form();
                self.set_status(message, StatusTone::Info);
            }
            Err(err) => self.report(err),
        }
    }

    /// Change the swept feature and recompute the default range for it.
    pub fn select_compare_feature(&mut self, feature: ScalarFeature) {
        if self.ui.form.x_axis == Some(feature) {
            return;
        }
        self.ui.form.x_axis = Some(feature);
        self.reset_range();
    }

    /// Update one scalar input, clamped to its bounds.
    pub fn set_feature_value(&mut self, feature: ScalarFeature, value: f64) {
        self.ui.form.snapshot.set(feature, feature.coerce(value));
    }

    pub fn set_region(&mut self, region: Region) {
        self.ui.form.snapshot.set_region(region);
    }

    pub fn generate_graph(&mut self) {
        let Some(x_axis) = self.ui.form.x_axis else {
            self.set_status("No features available to sweep", StatusTone::Warning);
            return;
        };
        let form = &self.ui.form;
        let outcome = sweep::generate_sweep(
            self.backend.as_ref(),
            &mut self.session,
            form.snapshot.clone(),
            x_axis,
            form.x_min,
            form.x_max,
            form.steps,
        )
        .map(PredictionSeries::len);
        match outcome {
            Ok(points) => self.set_status(
                format!("Generated {points} points for {}", x_axis.display_name()),
                StatusTone::Info,
            ),
            Err(err) => self.report(err),
        }
    }

    pub fn save_graph(&mut self) {
        let Some(x_axis) = self.ui.form.x_axis else {
            self.set_status("No features available to sweep", StatusTone::Warning);
            return;
        };
        let form = &self.ui.form;
        let saved = graphs::save_graph(
            self.backend.as_ref(),
            &self.session,
            &form.graph_name,
            form.snapshot.clone(),
            x_axis,
            form.range(),
        );
        match saved {
            Ok(_) => {
                let name = self.ui.form.graph_name.trim().to_string();
                self.ui.form.graph_name.clear();
                self.refresh_saved_graphs();
                self.set_status(format!("Graph '{name}' saved successfully!"), StatusTone::Info);
            }
            Err(err) => self.report(err),
        }
    }

    /// Drop the plotted series and any loaded graph.
    pub fn clear_graph(&mut self) {
        self.session.clear_graph();
        self.ui.saved_graphs.selected = None;
        self.reset_form();
        self.set_status("Graph cleared", StatusTone::Info);
    }

    pub fn logout(&mut self) {
        self.backend.clear_cache();
        self.session.logout();
        self.presets.clear();
        self.saved_graphs.clear();
        self.ui = UiState::default();
        self.set_status("Logged out", StatusTone::Idle);
    }

    /// Reset every input to the resolved defaults.
    pub fn reset_form(&mut self) {
        let snapshot = self.resolved_snapshot();
        let options = &self.ui.features.options;
        let x_axis = defaults::resolve_compare_feature(self.session.loaded_graph(), options);
        self.ui.form.snapshot = snapshot;
        self.ui.form.x_axis = x_axis;
        self.reset_range();
    }

    fn resolved_snapshot(&self) -> FeatureSnapshot {
        defaults::resolve_snapshot(
            self.session.loaded_graph(),
            self.session.selected_preset().map(|preset| &preset.snapshot),
        )
    }

    fn reset_range(&mut self) {
        let Some(x_axis) = self.ui.form.x_axis else {
            return;
        };
        let loaded = self
            .session
            .loaded_graph()
            .filter(|graph| graph.x_axis_feature() == Some(x_axis));
        let current = self.ui.form.snapshot.get(x_axis);
        let std = defaults::std_for(self.session.feature_stds(), x_axis);
        let range = defaults::resolve_sweep_range(loaded, current, std);
        self.ui.form.set_range(range);
    }

    /// Title above the chart for the active series.
    pub fn chart_title(&self) -> String {
        match self.session.graph_data() {
            Some(series) => format!("GINI Coefficient vs {}", series.feature_name()),
            None => "GINI vs Population (example)".to_string(),
        }
    }

    fn report(&mut self, err: PlaygroundError) {
        if err.is_fatal() {
            self.halt(err);
            return;
        }
        let (text, tone) = match &err {
            PlaygroundError::Api(api) if api.is_retryable() => {
                (format!("{err}. {RETRY_HINT}"), StatusTone::Error)
            }
            PlaygroundError::Validation(_) => (err.to_string(), StatusTone::Warning),
            _ => (err.to_string(), StatusTone::Error),
        };
        self.set_status(text, tone);
    }

    fn halt(&mut self, err: impl std::fmt::Display) {
        tracing::warn!(error = %err, "Session unusable; showing sign-in");
        self.ui.fatal = Some(err.to_string());
        self.set_status(err.to_string(), StatusTone::Error);
    }

    fn set_status(&mut self, text: impl Into<String>, tone: StatusTone) {
        self.ui.status.set(text, tone);
    }
}
