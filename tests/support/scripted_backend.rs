use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use ginilab::api::{
    ApiError, FeatureStds, GraphId, PlaygroundBackend, PredictionSeries, SaveGraphRequest,
    SaveGraphResponse, SavedGraph, UserId,
};
use ginilab::features::{FeatureKey, ScalarFeature};
use ginilab::presets::PresetEntry;
use ginilab::sweep::SweepRequest;
use serde_json::json;

/// Backend state shared between a test and the controller that owns the backend.
pub struct Script {
    pub features: Vec<String>,
    pub presets: Vec<PresetEntry>,
    pub saved_graphs: Vec<SavedGraph>,
    /// Errors returned by upcoming calls, in order, before normal service resumes.
    pub failures: VecDeque<ApiError>,
    pub calls: Vec<&'static str>,
    pub saved_requests: Vec<SaveGraphRequest>,
    pub sweep_requests: Vec<SweepRequest>,
}

impl Default for Script {
    fn default() -> Self {
        Self {
            features: FeatureKey::all()
                .map(|key| key.backend_name().to_string())
                .collect(),
            presets: Vec::new(),
            saved_graphs: Vec::new(),
            failures: VecDeque::new(),
            calls: Vec::new(),
            saved_requests: Vec::new(),
            sweep_requests: Vec::new(),
        }
    }
}

impl Script {
    pub fn count(&self, call: &str) -> usize {
        self.calls.iter().filter(|name| **name == call).count()
    }

    fn enter(&mut self, call: &'static str) -> Result<(), ApiError> {
        self.calls.push(call);
        match self.failures.pop_front() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

pub struct ScriptedBackend {
    script: Rc<RefCell<Script>>,
}

impl ScriptedBackend {
    pub fn new(script: Script) -> (Self, Rc<RefCell<Script>>) {
        let script = Rc::new(RefCell::new(script));
        (
            Self {
                script: Rc::clone(&script),
            },
            script,
        )
    }
}

impl PlaygroundBackend for ScriptedBackend {
    fn list_features(&self) -> Result<Vec<String>, ApiError> {
        let mut script = self.script.borrow_mut();
        script.enter("list_features")?;
        Ok(script.features.clone())
    }

    fn fetch_presets(&self) -> Result<Vec<PresetEntry>, ApiError> {
        let mut script = self.script.borrow_mut();
        script.enter("fetch_presets")?;
        Ok(script.presets.clone())
    }

    fn fetch_saved_graphs(&self, user_id: UserId) -> Result<Vec<SavedGraph>, ApiError> {
        let mut script = self.script.borrow_mut();
        script.enter("fetch_saved_graphs")?;
        Ok(script
            .saved_graphs
            .iter()
            .filter(|graph| graph.owner_user_id == Some(user_id))
            .cloned()
            .collect())
    }

    fn load_graph(&self, id: GraphId) -> Result<SavedGraph, ApiError> {
        let mut script = self.script.borrow_mut();
        script.enter("load_graph")?;
        script
            .saved_graphs
            .iter()
            .find(|graph| graph.id == id)
            .cloned()
            .ok_or(ApiError::Backend {
                status: 404,
                message: "Graph not found".into(),
            })
    }

    fn save_graph(&self, request: &SaveGraphRequest) -> Result<SaveGraphResponse, ApiError> {
        let mut script = self.script.borrow_mut();
        script.enter("save_graph")?;
        script.saved_requests.push(request.clone());
        let id = 100 + script.saved_graphs.len() as u64;
        let mut body = serde_json::to_value(request).map_err(|err| ApiError::InvalidResponse(err.to_string()))?;
        let features = body.clone();
        body["graph_id"] = json!(id);
        body["features"] = features;
        body["date_saved"] = json!("2025-01-02T03:04:05");
        let graph: SavedGraph =
            serde_json::from_value(body).map_err(|err| ApiError::InvalidResponse(err.to_string()))?;
        script.saved_graphs.push(graph);
        Ok(SaveGraphResponse {
            graph_id: Some(json!(id)),
            message: Some("Graph saved".into()),
        })
    }

    fn predict_sweep(&self, request: &SweepRequest) -> Result<PredictionSeries, ApiError> {
        let mut script = self.script.borrow_mut();
        script.enter("predict_sweep")?;
        script.sweep_requests.push(request.clone());
        let steps = request.steps() as usize;
        let width = (request.x_max() - request.x_min()) / (steps - 1) as f64;
        let x_values: Vec<f64> = (0..steps)
            .map(|i| request.x_min() + width * i as f64)
            .collect();
        let y_values = x_values
            .iter()
            .map(|x| 0.25 + x / (request.x_max() * 10.0))
            .collect();
        Ok(PredictionSeries {
            x_values,
            y_values,
            feature: request.x_axis(),
        })
    }

    fn fetch_feature_stds(&self) -> Result<FeatureStds, ApiError> {
        self.script.borrow_mut().enter("fetch_feature_stds")?;
        Ok(ScalarFeature::ALL
            .into_iter()
            .map(|feature| (feature, feature.default_value() / 4.0))
            .collect())
    }
}

/// Saved graph owned by `user_id`, sweeping GDP per capita.
pub fn saved_graph(id: GraphId, user_id: UserId, name: &str) -> SavedGraph {
    serde_json::from_value(json!({
        "graph_id": id,
        "user_id": user_id,
        "name": name,
        "x_axis": "GDP_per_capita",
        "x_min": 5000,
        "x_max": "60000",
        "x_steps": 12,
        "features": {
            "Population": 5_500_000,
            "GDP_per_capita": 52000.0,
            "Trade_union_density": 65.0,
            "Region_Europe_and_Central_Asia": 1
        },
        "date_saved": "2024-11-20T08:30:00"
    }))
    .unwrap()
}
