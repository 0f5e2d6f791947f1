//! Backend-supplied country scenarios and their conversion into snapshots.

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::api::json_number;
use crate::features::{FeatureSnapshot, Region, ScalarFeature};

/// Region assumed when a preset names none or an unknown one.
pub const FALLBACK_REGION: Region = Region::EuropeCentralAsia;

/// One preset row as the backend sends it.
///
/// Feature values may arrive as numbers or numeric strings, so they are kept
/// as raw JSON until [`apply_preset`] coerces them.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct PresetEntry {
    #[serde(rename = "Reference_area", default)]
    pub reference_area: String,
    #[serde(rename = "Time_period", default)]
    pub time_period: Value,
    #[serde(rename = "Region", default)]
    pub region: Option<String>,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl PresetEntry {
    /// Selector label such as `Norway (2019)`.
    pub fn label(&self) -> String {
        let period = match &self.time_period {
            Value::Null => "n/a".to_string(),
            Value::String(text) => text.clone(),
            other => other.to_string(),
        };
        format!("{} ({period})", self.reference_area)
    }

    fn value(&self, feature: ScalarFeature) -> Option<f64> {
        let raw = self.fields.get(feature.backend_name())?;
        let parsed = json_number(raw);
        if parsed.is_none() && !raw.is_null() {
            tracing::warn!(
                preset = %self.label(),
                feature = feature.backend_name(),
                value = %raw,
                "Preset value is not numeric; using default"
            );
        }
        parsed
    }
}

/// Convert a preset row into a complete feature snapshot.
///
/// Missing values fall back to the catalogue defaults and population is
/// truncated to an integer. Unknown regions map to [`FALLBACK_REGION`].
pub fn apply_preset(entry: &PresetEntry) -> FeatureSnapshot {
    let mut snapshot = FeatureSnapshot::default();
    for feature in ScalarFeature::ALL {
        let value = entry
            .value(feature)
            .unwrap_or_else(|| feature.default_value());
        snapshot.set(feature, value);
    }
    snapshot.set_region(preset_region(entry.region.as_deref()));
    snapshot
}

fn preset_region(name: Option<&str>) -> Region {
    let Some(name) = name else {
        return FALLBACK_REGION;
    };
    Region::from_display_name(name).unwrap_or_else(|| {
        tracing::warn!(region = name, "Unknown preset region; using fallback");
        FALLBACK_REGION
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn entry(value: Value) -> PresetEntry {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn middle_east_preset_sets_one_hot_and_integer_population() {
        let preset = entry(json!({
            "Reference_area": "Jordan",
            "Time_period": 2018,
            "Region": "Middle East and North Africa",
            "Population": "5000000",
            "GDP_per_capita": "4300.5",
            "Inflation": 4.5
        }));
        let snapshot = apply_preset(&preset);
        assert_eq!(snapshot.region(), Region::MiddleEastNorthAfrica);
        let wire = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(wire["Region_Middle_East_and_North_Africa"], json!(1));
        assert_eq!(wire["Region_East_Asia_and_Pacific"], json!(0));
        assert_eq!(wire["Region_Europe_and_Central_Asia"], json!(0));
        assert_eq!(wire["Region_Latin_America_and_Caribbean"], json!(0));
        assert_eq!(snapshot.population(), 5_000_000);
        assert_eq!(wire["Population"], json!(5_000_000u64));
        assert_eq!(snapshot.get(ScalarFeature::GdpPerCapita), 4300.5);
        assert_eq!(snapshot.get(ScalarFeature::Inflation), 4.5);
    }

    #[test]
    fn missing_fields_use_catalogue_defaults() {
        let snapshot = apply_preset(&entry(json!({
            "Reference_area": "Nowhere",
            "Time_period": "2020",
            "Housing": null,
            "IRLT": "high"
        })));
        for feature in ScalarFeature::ALL {
            assert_eq!(snapshot.get(feature), feature.default_value(), "{feature}");
        }
        assert_eq!(snapshot.region(), FALLBACK_REGION);
    }

    #[test]
    fn unknown_region_falls_back_to_europe() {
        let snapshot = apply_preset(&entry(json!({"Region": "Antarctica"})));
        assert_eq!(snapshot.region(), Region::EuropeCentralAsia);
    }

    #[test]
    fn fractional_population_is_truncated() {
        let snapshot = apply_preset(&entry(json!({"Population": 1234.9})));
        assert_eq!(snapshot.population(), 1234);
    }

    #[test]
    fn label_combines_area_and_period() {
        let numeric = entry(json!({"Reference_area": "Norway", "Time_period": 2019}));
        assert_eq!(numeric.label(), "Norway (2019)");
        let text = entry(json!({"Reference_area": "Chile", "Time_period": "2015-Q1"}));
        assert_eq!(text.label(), "Chile (2015-Q1)");
    }
}
