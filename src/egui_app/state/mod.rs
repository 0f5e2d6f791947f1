//! Shared state types for the egui UI.

mod form;
mod status;

pub use form::*;
pub use status::*;

use crate::features::ScalarFeature;

/// Top-level UI model consumed by the egui renderer.
#[derive(Clone, Debug)]
pub struct UiState {
    pub status: StatusBarState,
    pub sign_in: SignInState,
    pub features: FeatureListState,
    pub form: FormState,
    pub presets: PickerState,
    pub saved_graphs: PickerState,
    /// Message shown in place of the page when the session is unusable.
    pub fatal: Option<String>,
    /// Whether the "What is the Gini index?" window is open.
    pub show_gini_help: bool,
    pub show_status_log: bool,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            status: StatusBarState::idle(),
            sign_in: SignInState::default(),
            features: FeatureListState::default(),
            form: FormState::default(),
            presets: PickerState::default(),
            saved_graphs: PickerState::default(),
            fatal: None,
            show_gini_help: false,
            show_status_log: false,
        }
    }
}

/// Inputs of the sign-in gate.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SignInState {
    pub user_id: String,
    pub name: String,
    pub roles: String,
    pub error: Option<String>,
}

/// Features offered by the x-axis selector.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FeatureListState {
    pub options: Vec<ScalarFeature>,
    /// True when the backend list was unavailable and the built-in names are used.
    pub using_fallback: bool,
}

/// Labels and selection of a dropdown backed by a backend list.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PickerState {
    pub labels: Vec<String>,
    pub selected: Option<usize>,
    pub error: Option<String>,
}

impl PickerState {
    pub fn set_labels(&mut self, labels: Vec<String>) {
        self.selected = match self.selected {
            Some(index) if index < labels.len() => Some(index),
            _ if labels.is_empty() => None,
            _ => Some(0),
        };
        self.labels = labels;
        self.error = None;
    }

    pub fn set_error(&mut self, error: impl Into<String>) {
        self.labels.clear();
        self.selected = None;
        self.error = Some(error.into());
    }

    pub fn selected_label(&self) -> Option<&str> {
        self.selected
            .and_then(|index| self.labels.get(index))
            .map(String::as_str)
    }
}
