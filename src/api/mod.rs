//! Backend API surface: wire types, the [`PlaygroundBackend`] trait and its
//! HTTP and caching implementations.

mod cache;
mod client;
#[cfg(test)]
pub(crate) mod fake;

pub use cache::CachedBackend;
pub use client::HttpBackend;

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::features::{FeatureSnapshot, Region, ScalarFeature};
use crate::presets::PresetEntry;
use crate::sweep::{DEFAULT_STEPS, SweepRequest};

pub type UserId = u64;
pub type GraphId = u64;

/// Failure of a single backend call.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApiError {
    /// Connection refused, DNS failure or timeout.
    #[error("Error connecting to backend: {0}")]
    Network(String),
    /// The backend answered with a status other than the expected one.
    #[error("Backend returned HTTP {status}: {message}")]
    Backend { status: u16, message: String },
    /// The body could not be decoded or broke a response invariant.
    #[error("Unexpected backend response: {0}")]
    InvalidResponse(String),
}

impl ApiError {
    /// Whether re-triggering the same action might succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Network(_) => true,
            Self::Backend { status, .. } => *status >= 500,
            Self::InvalidResponse(_) => false,
        }
    }
}

/// Operations the playground needs from the backend.
///
/// Calls block until the backend answers or the request times out.
pub trait PlaygroundBackend {
    /// Backend names of the features the model accepts.
    fn list_features(&self) -> Result<Vec<String>, ApiError>;
    fn fetch_presets(&self) -> Result<Vec<PresetEntry>, ApiError>;
    fn fetch_saved_graphs(&self, user_id: UserId) -> Result<Vec<SavedGraph>, ApiError>;
    fn load_graph(&self, id: GraphId) -> Result<SavedGraph, ApiError>;
    fn save_graph(&self, request: &SaveGraphRequest) -> Result<SaveGraphResponse, ApiError>;
    fn predict_sweep(&self, request: &SweepRequest) -> Result<PredictionSeries, ApiError>;
    fn fetch_feature_stds(&self) -> Result<FeatureStds, ApiError>;

    /// Drop any cached saved-graph list for `user_id`.
    fn invalidate_saved_graphs(&self, _user_id: UserId) {}

    /// Drop every cached response.
    fn clear_cache(&self) {}
}

impl<B: PlaygroundBackend + ?Sized> PlaygroundBackend for Box<B> {
    fn list_features(&self) -> Result<Vec<String>, ApiError> {
        (**self).list_features()
    }

    fn fetch_presets(&self) -> Result<Vec<PresetEntry>, ApiError> {
        (**self).fetch_presets()
    }

    fn fetch_saved_graphs(&self, user_id: UserId) -> Result<Vec<SavedGraph>, ApiError> {
        (**self).fetch_saved_graphs(user_id)
    }

    fn load_graph(&self, id: GraphId) -> Result<SavedGraph, ApiError> {
        (**self).load_graph(id)
    }

    fn save_graph(&self, request: &SaveGraphRequest) -> Result<SaveGraphResponse, ApiError> {
        (**self).save_graph(request)
    }

    fn predict_sweep(&self, request: &SweepRequest) -> Result<PredictionSeries, ApiError> {
        (**self).predict_sweep(request)
    }

    fn fetch_feature_stds(&self) -> Result<FeatureStds, ApiError> {
        (**self).fetch_feature_stds()
    }

    fn invalidate_saved_graphs(&self, user_id: UserId) {
        (**self).invalidate_saved_graphs(user_id)
    }

    fn clear_cache(&self) {
        (**self).clear_cache()
    }
}

/// Read a JSON value as a number, accepting numeric strings and booleans.
pub fn json_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse::<f64>().ok(),
        Value::Bool(flag) => Some(if *flag { 1.0 } else { 0.0 }),
        _ => None,
    }
    .filter(|number| number.is_finite())
}

fn number_from<E: serde::de::Error>(value: &Value) -> Result<f64, E> {
    json_number(value).ok_or_else(|| E::custom(format!("expected a number, got {value}")))
}

fn id_from<E: serde::de::Error>(value: &Value) -> Result<u64, E> {
    let number = number_from::<E>(value)?;
    if number < 0.0 || number.fract() != 0.0 {
        return Err(E::custom(format!("{number} is not an id")));
    }
    Ok(number as u64)
}

fn lenient_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
    id_from(&Value::deserialize(deserializer)?)
}

fn lenient_opt_f64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(None),
        value => number_from(&value).map(Some),
    }
}

fn lenient_f64_or_zero<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    Ok(lenient_opt_f64(deserializer)?.unwrap_or_default())
}

fn lenient_steps<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(DEFAULT_STEPS),
        value => {
            let number = number_from::<D::Error>(&value)?;
            if number < 0.0 || number > f64::from(u32::MAX) {
                return Err(serde::de::Error::custom(format!("{number} is out of range")));
            }
            Ok(number as u32)
        }
    }
}

fn default_steps() -> u32 {
    DEFAULT_STEPS
}

fn lenient_opt_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u64>, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(None),
        value => id_from(&value).map(Some),
    }
}

/// Persisted sweep configuration owned by the backend.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct SavedGraph {
    #[serde(alias = "graph_id", deserialize_with = "lenient_id")]
    pub id: GraphId,
    #[serde(default, alias = "user_id", deserialize_with = "lenient_opt_id")]
    pub owner_user_id: Option<UserId>,
    pub name: String,
    /// Backend name of the swept feature.
    #[serde(default)]
    pub x_axis: String,
    #[serde(default, deserialize_with = "lenient_f64_or_zero")]
    pub x_min: f64,
    /// Upper sweep bound; records without one carry no saved range.
    #[serde(default, deserialize_with = "lenient_opt_f64")]
    pub x_max: Option<f64>,
    #[serde(default = "default_steps", deserialize_with = "lenient_steps")]
    pub x_steps: u32,
    /// Feature values keyed by backend name.
    #[serde(default)]
    pub features: Map<String, Value>,
    #[serde(default, alias = "date_saved")]
    pub saved_at: Option<String>,
}

impl SavedGraph {
    /// Label for the saved-graph picker, e.g. `Nordics (2024-05-01)`.
    pub fn label(&self) -> String {
        let date = self
            .saved_at
            .as_deref()
            .filter(|stamp| !stamp.trim().is_empty())
            .map(|stamp| stamp.chars().take(10).collect::<String>())
            .unwrap_or_else(|| "Unknown".to_string());
        format!("{} ({date})", self.name)
    }

    pub fn feature_value(&self, feature: ScalarFeature) -> Option<f64> {
        self.features.get(feature.backend_name()).and_then(json_number)
    }

    /// First region flag set to 1, scanning in the fixed region order.
    pub fn region(&self) -> Option<Region> {
        Region::ALL.into_iter().find(|region| {
            self.features
                .get(region.backend_name())
                .and_then(json_number)
                .is_some_and(|flag| flag == 1.0)
        })
    }

    pub fn x_axis_feature(&self) -> Option<ScalarFeature> {
        ScalarFeature::ALL
            .into_iter()
            .find(|feature| feature.backend_name() == self.x_axis)
    }
}

/// Body of `POST /playground/save`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SaveGraphRequest {
    pub user_id: UserId,
    pub name: String,
    pub x_axis: String,
    pub x_min: f64,
    pub x_max: f64,
    pub x_steps: u32,
    #[serde(flatten)]
    pub features: FeatureSnapshot,
}

/// What the backend reports after creating a saved graph.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct SaveGraphResponse {
    #[serde(default, alias = "id")]
    pub graph_id: Option<Value>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Predicted metric across a sweep of one feature.
#[derive(Clone, Debug, PartialEq)]
pub struct PredictionSeries {
    pub x_values: Vec<f64>,
    pub y_values: Vec<f64>,
    pub feature: ScalarFeature,
}

impl PredictionSeries {
    pub fn feature_name(&self) -> &'static str {
        self.feature.display_name()
    }

    pub fn len(&self) -> usize {
        self.x_values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x_values.is_empty()
    }

    pub fn points(&self) -> Vec<[f64; 2]> {
        self.x_values
            .iter()
            .zip(&self.y_values)
            .map(|(&x, &y)| [x, y])
            .collect()
    }
}

/// Standard deviation of each feature in the training data.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FeatureStds(BTreeMap<String, f64>);

impl FeatureStds {
    pub fn from_row(row: &Map<String, Value>) -> Self {
        Self(
            row.iter()
                .filter_map(|(name, value)| json_number(value).map(|std| (name.clone(), std)))
                .collect(),
        )
    }

    pub fn get(&self, feature: ScalarFeature) -> Option<f64> {
        self.0.get(feature.backend_name()).copied()
    }

}

impl FromIterator<(ScalarFeature, f64)> for FeatureStds {
    fn from_iter<I: IntoIterator<Item = (ScalarFeature, f64)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(feature, std)| (feature.backend_name().to_string(), std))
                .collect(),
        )
    }
}
