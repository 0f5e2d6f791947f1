use crate::defaults::SweepRange;
use crate::features::{FeatureSnapshot, ScalarFeature};
use crate::sweep::DEFAULT_STEPS;

/// Editable values of the playground form.
#[derive(Clone, Debug, PartialEq)]
pub struct FormState {
    pub snapshot: FeatureSnapshot,
    /// Feature swept along the x-axis; `None` until features are known.
    pub x_axis: Option<ScalarFeature>,
    pub x_min: f64,
    pub x_max: f64,
    pub steps: u32,
    /// Show every scalar input instead of the compact summary.
    pub advanced: bool,
    pub graph_name: String,
}

impl Default for FormState {
    fn default() -> Self {
        Self {
            snapshot: FeatureSnapshot::default(),
            x_axis: None,
            x_min: 0.0,
            x_max: 1.0,
            steps: DEFAULT_STEPS,
            advanced: false,
            graph_name: String::new(),
        }
    }
}

impl FormState {
    pub fn range(&self) -> SweepRange {
        SweepRange {
            x_min: self.x_min,
            x_max: self.x_max,
            steps: self.steps,
        }
    }

    pub fn set_range(&mut self, range: SweepRange) {
        self.x_min = range.x_min;
        self.x_max = range.x_max;
        self.steps = range.steps;
    }
}
