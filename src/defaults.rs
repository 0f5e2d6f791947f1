//! Pure resolution of the values the form starts from.
//!
//! Priority is always: loaded saved graph, then applied preset, then the
//! catalogue default. A loaded graph shadows the preset entirely, even for
//! keys it does not carry.

use crate::api::{FeatureStds, SavedGraph};
use crate::features::{FeatureSnapshot, Region, ScalarFeature};
use crate::sweep::DEFAULT_STEPS;

/// Starting value for one scalar input.
pub fn resolve_default(
    feature: ScalarFeature,
    loaded_graph: Option<&SavedGraph>,
    preset: Option<&FeatureSnapshot>,
) -> f64 {
    let value = match (loaded_graph, preset) {
        (Some(graph), _) => graph
            .feature_value(feature)
            .unwrap_or_else(|| feature.default_value()),
        (None, Some(preset)) => preset.get(feature),
        (None, None) => feature.default_value(),
    };
    if feature.is_integer() {
        value.trunc()
    } else {
        value
    }
}

/// Starting region; the first of the four flags that is set, else the first region.
pub fn resolve_region(loaded_graph: Option<&SavedGraph>, preset: Option<&FeatureSnapshot>) -> Region {
    match (loaded_graph, preset) {
        (Some(graph), _) => graph.region().unwrap_or_default(),
        (None, Some(preset)) => preset.region(),
        (None, None) => Region::default(),
    }
}

/// Full snapshot built from [`resolve_default`] and [`resolve_region`].
pub fn resolve_snapshot(
    loaded_graph: Option<&SavedGraph>,
    preset: Option<&FeatureSnapshot>,
) -> FeatureSnapshot {
    let mut snapshot = FeatureSnapshot::default();
    for feature in ScalarFeature::ALL {
        snapshot.set(feature, resolve_default(feature, loaded_graph, preset));
    }
    snapshot.set_region(resolve_region(loaded_graph, preset));
    snapshot
}

/// Sweep bounds and step count the range inputs start from.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SweepRange {
    pub x_min: f64,
    pub x_max: f64,
    pub steps: u32,
}

/// Saved range when a graph with an upper bound is loaded, else
/// `0 ..= current + 3σ` over 20 steps.
pub fn resolve_sweep_range(
    loaded_graph: Option<&SavedGraph>,
    current_value: f64,
    std: f64,
) -> SweepRange {
    match loaded_graph.and_then(|graph| graph.x_max.map(|x_max| (graph, x_max))) {
        Some((graph, x_max)) => SweepRange {
            x_min: graph.x_min,
            x_max,
            steps: graph.x_steps,
        },
        None => SweepRange {
            x_min: 0.0,
            x_max: current_value + 3.0 * std,
            steps: DEFAULT_STEPS,
        },
    }
}

/// Standard deviation for `feature`, zero when the backend did not report one.
pub fn std_for(stds: Option<&FeatureStds>, feature: ScalarFeature) -> f64 {
    stds.and_then(|stds| stds.get(feature)).unwrap_or(0.0)
}

/// Feature the x-axis selector starts on.
pub fn resolve_compare_feature(
    loaded_graph: Option<&SavedGraph>,
    options: &[ScalarFeature],
) -> Option<ScalarFeature> {
    loaded_graph
        .and_then(SavedGraph::x_axis_feature)
        .filter(|feature| options.contains(feature))
        .or_else(|| options.first().copied())
}
