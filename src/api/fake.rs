//! Scripted in-memory backend for unit tests.

use std::cell::RefCell;
use std::rc::Rc;

use serde_json::json;

use super::{
    ApiError, FeatureStds, GraphId, PlaygroundBackend, PredictionSeries, SaveGraphRequest,
    SaveGraphResponse, SavedGraph, UserId,
};
use crate::features::{FeatureKey, ScalarFeature};
use crate::presets::PresetEntry;
use crate::sweep::SweepRequest;

/// Number of times each operation reached the backend.
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct CallLog {
    pub list_features: usize,
    pub fetch_presets: usize,
    pub fetch_saved_graphs: usize,
    pub load_graph: usize,
    pub save_graph: usize,
    pub predict_sweep: usize,
    pub fetch_feature_stds: usize,
    pub saved_requests: Vec<SaveGraphRequest>,
}

impl CallLog {
    pub(crate) fn total(&self) -> usize {
        self.list_features
            + self.fetch_presets
            + self.fetch_saved_graphs
            + self.load_graph
            + self.save_graph
            + self.predict_sweep
            + self.fetch_feature_stds
    }
}

#[derive(Default)]
struct Failures {
    list_features: Option<ApiError>,
    fetch_presets: Option<ApiError>,
    load_graph: Option<ApiError>,
    save_graph: Option<ApiError>,
    predict_sweep: Option<ApiError>,
}

pub(crate) struct FakeBackend {
    calls: Rc<RefCell<CallLog>>,
    failures: RefCell<Failures>,
    pub features: Vec<String>,
    pub presets: Vec<PresetEntry>,
    pub saved_graphs: Vec<SavedGraph>,
    pub stds: FeatureStds,
}

impl Default for FakeBackend {
    fn default() -> Self {
        Self {
            calls: Rc::default(),
            failures: RefCell::default(),
            features: FeatureKey::all()
                .map(|key| key.backend_name().to_string())
                .collect(),
            presets: Vec::new(),
            saved_graphs: Vec::new(),
            stds: ScalarFeature::ALL
                .into_iter()
                .map(|feature| (feature, 1.0))
                .collect(),
        }
    }
}

impl FakeBackend {
    pub(crate) fn calls(&self) -> Rc<RefCell<CallLog>> {
        Rc::clone(&self.calls)
    }

    pub(crate) fn fail_next_list_features(&self, error: ApiError) {
        self.failures.borrow_mut().list_features = Some(error);
    }

    pub(crate) fn fail_next_presets(&self, error: ApiError) {
        self.failures.borrow_mut().fetch_presets = Some(error);
    }

    pub(crate) fn fail_next_load(&self, error: ApiError) {
        self.failures.borrow_mut().load_graph = Some(error);
    }

    pub(crate) fn fail_next_save(&self, error: ApiError) {
        self.failures.borrow_mut().save_graph = Some(error);
    }

    pub(crate) fn fail_next_predict(&self, error: ApiError) {
        self.failures.borrow_mut().predict_sweep = Some(error);
    }
}

/// Saved graph fixture sweeping `x_axis` with the given feature overrides.
pub(crate) fn saved_graph(id: GraphId, name: &str, features: serde_json::Value) -> SavedGraph {
    serde_json::from_value(json!({
        "graph_id": id,
        "user_id": 1,
        "name": name,
        "x_axis": "GDP_per_capita",
        "x_min": 1000.0,
        "x_max": 90000.0,
        "x_steps": 30,
        "features": features,
        "date_saved": "2024-05-01T09:00:00",
    }))
    .unwrap()
}

impl PlaygroundBackend for FakeBackend {
    fn list_features(&self) -> Result<Vec<String>, ApiError> {
        self.calls.borrow_mut().list_features += 1;
        if let Some(error) = self.failures.borrow_mut().list_features.take() {
            return Err(error);
        }
        Ok(self.features.clone())
    }

    fn fetch_presets(&self) -> Result<Vec<PresetEntry>, ApiError> {
        self.calls.borrow_mut().fetch_presets += 1;
        if let Some(error) = self.failures.borrow_mut().fetch_presets.take() {
            return Err(error);
        }
        Ok(self.presets.clone())
    }

    fn fetch_saved_graphs(&self, user_id: UserId) -> Result<Vec<SavedGraph>, ApiError> {
        self.calls.borrow_mut().fetch_saved_graphs += 1;
        Ok(self
            .saved_graphs
            .iter()
            .filter(|graph| graph.owner_user_id.is_none_or(|owner| owner == user_id))
            .cloned()
            .collect())
    }

    fn load_graph(&self, id: GraphId) -> Result<SavedGraph, ApiError> {
        self.calls.borrow_mut().load_graph += 1;
        if let Some(error) = self.failures.borrow_mut().load_graph.take() {
            return Err(error);
        }
        self.saved_graphs
            .iter()
            .find(|graph| graph.id == id)
            .cloned()
            .ok_or(ApiError::Backend {
                status: 404,
                message: "Graph not found".into(),
            })
    }

    fn save_graph(&self, request: &SaveGraphRequest) -> Result<SaveGraphResponse, ApiError> {
        let mut calls = self.calls.borrow_mut();
        calls.save_graph += 1;
        calls.saved_requests.push(request.clone());
        if let Some(error) = self.failures.borrow_mut().save_graph.take() {
            return Err(error);
        }
        Ok(SaveGraphResponse {
            graph_id: Some(json!(calls.save_graph)),
            message: Some("saved".into()),
        })
    }

    fn predict_sweep(&self, request: &SweepRequest) -> Result<PredictionSeries, ApiError> {
        self.calls.borrow_mut().predict_sweep += 1;
        if let Some(error) = self.failures.borrow_mut().predict_sweep.take() {
            return Err(error);
        }
        let steps = request.steps() as usize;
        let span = request.x_max() - request.x_min();
        let x_values: Vec<f64> = (0..steps)
            .map(|i| request.x_min() + span * i as f64 / (steps - 1) as f64)
            .collect();
        let y_values = (0..steps).map(|i| 0.3 + 0.001 * i as f64).collect();
        Ok(PredictionSeries {
            x_values,
            y_values,
            feature: request.x_axis(),
        })
    }

    fn fetch_feature_stds(&self) -> Result<FeatureStds, ApiError> {
        self.calls.borrow_mut().fetch_feature_stds += 1;
        Ok(self.stds.clone())
    }
}
