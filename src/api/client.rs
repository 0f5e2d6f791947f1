//! Blocking HTTP implementation of [`PlaygroundBackend`].

use std::time::Duration;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use super::{
    ApiError, FeatureStds, GraphId, PlaygroundBackend, PredictionSeries, SaveGraphRequest,
    SaveGraphResponse, SavedGraph, UserId,
};
use crate::config::ApiSettings;
use crate::http_client;
use crate::presets::PresetEntry;
use crate::sweep::SweepRequest;

const MAX_RESPONSE_BYTES: usize = 4 * 1024 * 1024;
const MAX_ERROR_BODY_BYTES: usize = 16 * 1024;

/// Talks to the playground REST API.
#[derive(Clone)]
pub struct HttpBackend {
    base_url: String,
    agent: ureq::Agent,
}

#[derive(serde::Deserialize)]
struct FeaturesWire {
    #[serde(default)]
    features: Vec<String>,
}

#[derive(serde::Deserialize)]
struct SavedGraphsWire {
    #[serde(default)]
    saved_graphs: Vec<SavedGraph>,
}

#[derive(serde::Deserialize)]
struct PresetsWire {
    data: Vec<PresetEntry>,
}

#[derive(serde::Deserialize)]
struct PredictWire {
    #[serde(default)]
    x_values: Vec<f64>,
    #[serde(default)]
    predictions: Vec<f64>,
}

impl HttpBackend {
    /// Client on the shared agent with the default timeout.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: trim_base(base_url.into()),
            agent: http_client::agent().clone(),
        }
    }

    /// Client with its own agent and request deadline.
    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            base_url: trim_base(base_url.into()),
            agent: http_client::build_agent(timeout),
        }
    }

    pub fn from_settings(settings: &ApiSettings) -> Self {
        Self::with_timeout(settings.base_url.clone(), settings.timeout())
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let url = self.url(path);
        tracing::debug!(%url, "GET");
        let response = dispatch(&url, self.agent.get(&url).call())?;
        decode(response)
    }

    fn post_json<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
        expected_status: Option<u16>,
    ) -> Result<T, ApiError> {
        let url = self.url(path);
        tracing::debug!(%url, "POST");
        let response = dispatch(
            &url,
            self.agent
                .post(&url)
                .set("Accept", "application/json")
                .send_json(body),
        )?;
        if let Some(expected) = expected_status {
            let status = response.status();
            if status != expected {
                let message = error_message(response);
                tracing::warn!(%url, status, %message, "Unexpected success status");
                return Err(ApiError::Backend { status, message });
            }
        }
        decode(response)
    }
}

impl PlaygroundBackend for HttpBackend {
    fn list_features(&self) -> Result<Vec<String>, ApiError> {
        self.get_json::<FeaturesWire>("/playground/features")
            .map(|wire| wire.features)
    }

    fn fetch_presets(&self) -> Result<Vec<PresetEntry>, ApiError> {
        self.get_json::<PresetsWire>("/playground/presets")
            .map(|wire| wire.data)
    }

    fn fetch_saved_graphs(&self, user_id: UserId) -> Result<Vec<SavedGraph>, ApiError> {
        self.get_json::<SavedGraphsWire>(&format!("/playground/saved/{user_id}"))
            .map(|wire| wire.saved_graphs)
    }

    fn load_graph(&self, id: GraphId) -> Result<SavedGraph, ApiError> {
        self.get_json(&format!("/playground/graph/{id}"))
    }

    fn save_graph(&self, request: &SaveGraphRequest) -> Result<SaveGraphResponse, ApiError> {
        let response: Value = self.post_json("/playground/save", request, Some(201))?;
        Ok(serde_json::from_value(response).unwrap_or_default())
    }

    fn predict_sweep(&self, request: &SweepRequest) -> Result<PredictionSeries, ApiError> {
        let wire: PredictWire = self.post_json("/models/playground/predict", request, None)?;
        let expected = request.steps() as usize;
        if wire.x_values.len() != wire.predictions.len() || wire.x_values.len() != expected {
            return Err(ApiError::InvalidResponse(format!(
                "expected {expected} points, got {} x values and {} predictions",
                wire.x_values.len(),
                wire.predictions.len()
            )));
        }
        Ok(PredictionSeries {
            x_values: wire.x_values,
            y_values: wire.predictions,
            feature: request.x_axis(),
        })
    }

    fn fetch_feature_stds(&self) -> Result<FeatureStds, ApiError> {
        let rows: Vec<Map<String, Value>> = self.get_json("/models/playground/stds")?;
        rows.first()
            .map(FeatureStds::from_row)
            .ok_or_else(|| ApiError::InvalidResponse("empty standard deviation list".into()))
    }
}

fn trim_base(url: String) -> String {
    url.trim_end_matches('/').to_string()
}

fn dispatch(
    url: &str,
    result: Result<ureq::Response, ureq::Error>,
) -> Result<ureq::Response, ApiError> {
    match result {
        Ok(response) => Ok(response),
        Err(ureq::Error::Status(status, response)) => {
            let message = error_message(response);
            tracing::warn!(%url, status, %message, "Backend request failed");
            Err(ApiError::Backend { status, message })
        }
        Err(ureq::Error::Transport(err)) => {
            tracing::warn!(%url, error = %err, "Backend unreachable");
            Err(ApiError::Network(err.to_string()))
        }
    }
}

fn decode<T: DeserializeOwned>(response: ureq::Response) -> Result<T, ApiError> {
    let bytes = http_client::read_response_bytes(response, MAX_RESPONSE_BYTES)
        .map_err(|err| ApiError::InvalidResponse(err.to_string()))?;
    serde_json::from_slice(&bytes).map_err(|err| ApiError::InvalidResponse(err.to_string()))
}

/// Best-effort human message from an error body.
fn error_message(response: ureq::Response) -> String {
    let Ok(bytes) = http_client::read_response_bytes(response, MAX_ERROR_BODY_BYTES) else {
        return "Unknown error".to_string();
    };
    let text = String::from_utf8_lossy(&bytes);
    let trimmed = text.trim();
    if let Ok(Value::Object(object)) = serde_json::from_str::<Value>(trimmed) {
        for key in ["error", "message", "detail"] {
            if let Some(message) = object.get(key).and_then(Value::as_str) {
                return message.to_string();
            }
        }
    }
    if trimmed.is_empty() {
        "Unknown error".to_string()
    } else {
        trimmed.chars().take(200).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::{FeatureSnapshot, ScalarFeature};
    use crate::http_client::test_server::{json_response, serve_once};

    fn sweep(steps: u32) -> SweepRequest {
        SweepRequest::new(
            FeatureSnapshot::default(),
            ScalarFeature::Inflation,
            0.0,
            10.0,
            steps,
        )
        .unwrap()
    }

    #[test]
    fn lists_features() {
        let (url, requests) = serve_once(json_response(
            200,
            "OK",
            r#"{"features": ["Population", "GDP_per_capita"]}"#,
        ));
        let features = HttpBackend::new(url).list_features().unwrap();
        assert_eq!(features, vec!["Population", "GDP_per_capita"]);
        let request = requests.recv().unwrap();
        assert!(request.starts_with("GET /playground/features "));
    }

    #[test]
    fn partial_saved_graph_does_not_drop_the_list() {
        let (url, requests) = serve_once(json_response(
            200,
            "OK",
            r#"{"saved_graphs": [
                {"graph_id": 1, "user_id": 5, "name": "Full", "x_axis": "IRLT", "x_min": 1, "x_max": 9, "x_steps": 8},
                {"graph_id": 2, "user_id": 5, "name": "Partial", "x_axis": "IRLT"}
            ]}"#,
        ));
        let graphs = HttpBackend::new(url).fetch_saved_graphs(5).unwrap();
        assert!(requests.recv().unwrap().starts_with("GET /playground/saved/5 "));
        assert_eq!(graphs.len(), 2);
        assert_eq!(graphs[0].x_max, Some(9.0));
        assert_eq!(graphs[1].x_min, 0.0);
        assert_eq!(graphs[1].x_max, None);
        assert_eq!(graphs[1].x_steps, crate::sweep::DEFAULT_STEPS);
    }

    #[test]
    fn predict_posts_sweep_body_and_builds_series() {
        let (url, requests) = serve_once(json_response(
            200,
            "OK",
            r#"{"x_values": [0, 2.5, 5, 7.5, 10], "predictions": [0.3, 0.31, 0.32, 0.33, 0.34]}"#,
        ));
        let series = HttpBackend::new(url).predict_sweep(&sweep(5)).unwrap();
        assert_eq!(series.len(), 5);
        assert_eq!(series.y_values[4], 0.34);
        assert_eq!(series.feature_name(), "Inflation");

        let request = requests.recv().unwrap();
        assert!(request.starts_with("POST /models/playground/predict "));
        let body = request.split("\r\n\r\n").nth(1).unwrap();
        let body: Value = serde_json::from_str(body).unwrap();
        assert_eq!(body["XAxis"], "Inflation");
        assert_eq!(body["XStep"], 5);
        assert_eq!(body["Region_East_Asia_and_Pacific"], 1);
    }

    #[test]
    fn predict_rejects_length_mismatch() {
        let (url, _) = serve_once(json_response(
            200,
            "OK",
            r#"{"x_values": [0, 1, 2], "predictions": [0.3, 0.31]}"#,
        ));
        let err = HttpBackend::new(url).predict_sweep(&sweep(5)).unwrap_err();
        assert!(matches!(err, ApiError::InvalidResponse(_)));
    }

    #[test]
    fn error_status_carries_backend_message() {
        let (url, _) = serve_once(json_response(
            500,
            "Internal Server Error",
            r#"{"error": "model not loaded"}"#,
        ));
        let err = HttpBackend::new(url).list_features().unwrap_err();
        assert_eq!(
            err,
            ApiError::Backend {
                status: 500,
                message: "model not loaded".into()
            }
        );
    }

    #[test]
    fn save_requires_created_status() {
        let (url, _) = serve_once(json_response(200, "OK", r#"{"message": "ok"}"#));
        let request = SaveGraphRequest {
            user_id: 1,
            name: "Mine".into(),
            x_axis: "IRLT".into(),
            x_min: 0.0,
            x_max: 1.0,
            x_steps: 5,
            features: FeatureSnapshot::default(),
        };
        let err = HttpBackend::new(url).save_graph(&request).unwrap_err();
        assert!(matches!(err, ApiError::Backend { status: 200, .. }));
    }

    #[test]
    fn save_accepts_created() {
        let (url, requests) = serve_once(json_response(
            201,
            "Created",
            r#"{"message": "saved", "graph_id": 44}"#,
        ));
        let request = SaveGraphRequest {
            user_id: 1,
            name: "Mine".into(),
            x_axis: "IRLT".into(),
            x_min: 0.0,
            x_max: 1.0,
            x_steps: 5,
            features: FeatureSnapshot::default(),
        };
        let response = HttpBackend::new(url).save_graph(&request).unwrap();
        assert_eq!(response.message.as_deref(), Some("saved"));
        assert!(requests.recv().unwrap().starts_with("POST /playground/save "));
    }

    #[test]
    fn stds_use_first_row() {
        let (url, _) = serve_once(json_response(
            200,
            "OK",
            r#"[{"Inflation": 1.5, "Population": "1000"}, {"Inflation": 99}]"#,
        ));
        let stds = HttpBackend::new(url).fetch_feature_stds().unwrap();
        assert_eq!(stds.get(ScalarFeature::Inflation), Some(1.5));
        assert_eq!(stds.get(ScalarFeature::Population), Some(1000.0));
    }

    #[test]
    fn empty_stds_is_invalid() {
        let (url, _) = serve_once(json_response(200, "OK", "[]"));
        let err = HttpBackend::new(url).fetch_feature_stds().unwrap_err();
        assert!(matches!(err, ApiError::InvalidResponse(_)));
    }

    #[test]
    fn presets_without_data_are_invalid() {
        let (url, _) = serve_once(json_response(200, "OK", r#"{"rows": []}"#));
        let err = HttpBackend::new(url).fetch_presets().unwrap_err();
        assert!(matches!(err, ApiError::InvalidResponse(_)));
    }

    #[test]
    fn unreachable_backend_is_network_error() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        let backend = HttpBackend::with_timeout(format!("http://{addr}/"), Duration::from_secs(2));
        let err = backend.list_features().unwrap_err();
        assert!(matches!(err, ApiError::Network(_)));
        assert!(err.is_retryable());
    }
}
