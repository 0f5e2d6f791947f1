//! Validated sweep requests and the generate-graph flow.

use serde::Serialize;
use serde::ser::Serializer;
use thiserror::Error;

use crate::api::{PlaygroundBackend, PredictionSeries};
use crate::error::PlaygroundError;
use crate::features::{FeatureSnapshot, ScalarFeature};
use crate::session::Session;

pub const MIN_STEPS: u32 = 5;
pub const MAX_STEPS: u32 = 100;
pub const DEFAULT_STEPS: u32 = 20;

/// User input that breaks a precondition of a backend action.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("Min value must be less than Max value!")]
    RangeOrder { x_min: f64, x_max: f64 },
    #[error("Range bounds must be finite numbers")]
    NonFiniteBound,
    #[error("Steps must be between {MIN_STEPS} and {MAX_STEPS} (got {0})")]
    StepsOutOfRange(u32),
    #[error("Please enter a graph name")]
    MissingGraphName,
    #[error("Generate a graph before saving")]
    NothingToSave,
}

/// Check the sweep bounds and step count.
pub fn validate_range(x_min: f64, x_max: f64, steps: u32) -> Result<(), ValidationError> {
    if !x_min.is_finite() || !x_max.is_finite() {
        return Err(ValidationError::NonFiniteBound);
    }
    if x_min >= x_max {
        return Err(ValidationError::RangeOrder { x_min, x_max });
    }
    if !(MIN_STEPS..=MAX_STEPS).contains(&steps) {
        return Err(ValidationError::StepsOutOfRange(steps));
    }
    Ok(())
}

/// A sweep of one feature that already passed validation.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SweepRequest {
    #[serde(flatten)]
    features: FeatureSnapshot,
    #[serde(rename = "XAxis", serialize_with = "backend_name")]
    x_axis: ScalarFeature,
    #[serde(rename = "XMin")]
    x_min: f64,
    #[serde(rename = "XMax")]
    x_max: f64,
    #[serde(rename = "XStep")]
    steps: u32,
}

fn backend_name<S: Serializer>(feature: &ScalarFeature, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(feature.backend_name())
}

impl SweepRequest {
    pub fn new(
        features: FeatureSnapshot,
        x_axis: ScalarFeature,
        x_min: f64,
        x_max: f64,
        steps: u32,
    ) -> Result<Self, ValidationError> {
        validate_range(x_min, x_max, steps)?;
        Ok(Self {
            features,
            x_axis,
            x_min,
            x_max,
            steps,
        })
    }

    pub fn x_axis(&self) -> ScalarFeature {
        self.x_axis
    }

    pub fn x_min(&self) -> f64 {
        self.x_min
    }

    pub fn x_max(&self) -> f64 {
        self.x_max
    }

    pub fn steps(&self) -> u32 {
        self.steps
    }
}

/// Validate, predict and store the resulting series in the session.
///
/// Validation failures never reach the backend. On any error the session's
/// previous series is left untouched.
pub fn generate_sweep<'s>(
    backend: &dyn PlaygroundBackend,
    session: &'s mut Session,
    snapshot: FeatureSnapshot,
    x_axis: ScalarFeature,
    x_min: f64,
    x_max: f64,
    steps: u32,
) -> Result<&'s PredictionSeries, PlaygroundError> {
    let request = SweepRequest::new(snapshot, x_axis, x_min, x_max, steps)?;
    tracing::info!(
        feature = x_axis.backend_name(),
        x_min,
        x_max,
        steps,
        "Requesting sweep prediction"
    );
    let series = backend.predict_sweep(&request)?;
    Ok(session.set_graph_data(series))
}
