//! Per-user interaction state shared by every handler on the page.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::api::{FeatureStds, PredictionSeries, SavedGraph, UserId};
use crate::features::FeatureSnapshot;

/// Who is signed in, as supplied by the outer authentication layer.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserIdentity {
    #[serde(default)]
    pub user_id: Option<UserId>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub roles: Vec<String>,
}

impl UserIdentity {
    pub fn display_name(&self) -> &str {
        if self.name.trim().is_empty() {
            "Guest"
        } else {
            self.name.trim()
        }
    }

    pub fn roles_label(&self) -> String {
        if self.roles.is_empty() {
            "No roles".to_string()
        } else {
            self.roles.join(", ")
        }
    }
}

/// Missing authentication halts the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("Please log in first!")]
    NotAuthenticated,
    #[error("User ID not found in session. Please log in again.")]
    MissingUserId,
}

/// Preset currently applied to the form.
#[derive(Clone, Debug, PartialEq)]
pub struct AppliedPreset {
    pub label: String,
    pub snapshot: FeatureSnapshot,
}

/// Explicit session store. Loading a graph and applying a preset are mutually
/// exclusive: setting one clears the other.
#[derive(Debug, Default)]
pub struct Session {
    authenticated: bool,
    identity: UserIdentity,
    available_features: Option<Vec<String>>,
    loaded_graph: Option<SavedGraph>,
    selected_preset: Option<AppliedPreset>,
    graph_data: Option<PredictionSeries>,
    feature_stds: Option<FeatureStds>,
}

impl Session {
    pub fn sign_in(&mut self, identity: UserIdentity) {
        tracing::info!(user_id = ?identity.user_id, name = %identity.name, "Signed in");
        *self = Self {
            authenticated: true,
            identity,
            ..Self::default()
        };
    }

    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    pub fn identity(&self) -> &UserIdentity {
        &self.identity
    }

    /// Signed-in user's id, or the reason the page cannot render.
    pub fn require_user(&self) -> Result<UserId, SessionError> {
        if !self.authenticated {
            return Err(SessionError::NotAuthenticated);
        }
        self.identity.user_id.ok_or(SessionError::MissingUserId)
    }

    pub fn available_features(&self) -> Option<&[String]> {
        self.available_features.as_deref()
    }

    pub fn set_available_features(&mut self, features: Vec<String>) {
        self.available_features = Some(features);
    }

    pub fn loaded_graph(&self) -> Option<&SavedGraph> {
        self.loaded_graph.as_ref()
    }

    pub fn set_loaded_graph(&mut self, graph: SavedGraph) -> &SavedGraph {
        self.selected_preset = None;
        self.loaded_graph.insert(graph)
    }

    pub fn selected_preset(&self) -> Option<&AppliedPreset> {
        self.selected_preset.as_ref()
    }

    pub fn set_selected_preset(&mut self, preset: AppliedPreset) {
        self.loaded_graph = None;
        self.selected_preset = Some(preset);
    }

    pub fn graph_data(&self) -> Option<&PredictionSeries> {
        self.graph_data.as_ref()
    }

    pub fn set_graph_data(&mut self, series: PredictionSeries) -> &PredictionSeries {
        self.graph_data.insert(series)
    }

    /// Drop the plotted series and any loaded graph.
    pub fn clear_graph(&mut self) {
        self.graph_data = None;
        self.loaded_graph = None;
    }

    pub fn feature_stds(&self) -> Option<&FeatureStds> {
        self.feature_stds.as_ref()
    }

    pub fn set_feature_stds(&mut self, stds: FeatureStds) {
        self.feature_stds = Some(stds);
    }

    pub fn logout(&mut self) {
        tracing::info!(user_id = ?self.identity.user_id, "Logged out");
        *self = Self::default();
    }
}
