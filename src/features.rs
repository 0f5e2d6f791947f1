//! Catalogue of the model's input features and the snapshot sent to the backend.
//!
//! The backend knows exactly fifteen keys: eleven scalar indicators and a
//! one-hot region encoded as four flags. [`FeatureKey`] names them, and the
//! helpers translate between user-facing display names and backend field names.

use std::borrow::Cow;
use std::fmt;

use serde::ser::{Serialize, SerializeMap, Serializer};

/// Scalar indicators the model consumes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ScalarFeature {
    Population,
    GdpPerCapita,
    TradeUnionDensity,
    UnemploymentRate,
    Health,
    Education,
    Housing,
    CommunityDevelopment,
    CorporateTaxRate,
    Inflation,
    Irlt,
}

/// How a scalar input is presented and bounded in the form.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct InputSpec {
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub step: f64,
    pub decimals: usize,
    pub help: &'static str,
}

impl ScalarFeature {
    pub const COUNT: usize = 11;

    pub const ALL: [ScalarFeature; Self::COUNT] = [
        Self::Population,
        Self::GdpPerCapita,
        Self::TradeUnionDensity,
        Self::UnemploymentRate,
        Self::Health,
        Self::Education,
        Self::Housing,
        Self::CommunityDevelopment,
        Self::CorporateTaxRate,
        Self::Inflation,
        Self::Irlt,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn backend_name(self) -> &'static str {
        match self {
            Self::Population => "Population",
            Self::GdpPerCapita => "GDP_per_capita",
            Self::TradeUnionDensity => "Trade_union_density",
            Self::UnemploymentRate => "Unemployment_rate",
            Self::Health => "Health",
            Self::Education => "Education",
            Self::Housing => "Housing",
            Self::CommunityDevelopment => "Community_development",
            Self::CorporateTaxRate => "Corporate_tax_rate",
            Self::Inflation => "Inflation",
            Self::Irlt => "IRLT",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Self::Population => "Population",
            Self::GdpPerCapita => "GDP per capita",
            Self::TradeUnionDensity => "Trade union density",
            Self::UnemploymentRate => "Unemployment rate",
            Self::Health => "Health",
            Self::Education => "Education",
            Self::Housing => "Housing",
            Self::CommunityDevelopment => "Community development",
            Self::CorporateTaxRate => "Corporate tax rate",
            Self::Inflation => "Inflation",
            Self::Irlt => "IRLT",
        }
    }

    /// Domain default shown when neither a saved graph nor a preset supplies a value.
    pub fn default_value(self) -> f64 {
        match self {
            Self::Population => 22_000_000.0,
            Self::GdpPerCapita => 41_000.0,
            Self::TradeUnionDensity => 33.0,
            Self::UnemploymentRate => 8.0,
            Self::Health => 0.064,
            Self::Education => 0.052,
            Self::Housing => 0.0032,
            Self::CommunityDevelopment => 0.0019,
            Self::CorporateTaxRate => 21.0,
            Self::Inflation => 2.1,
            Self::Irlt => 7.9,
        }
    }

    pub fn is_integer(self) -> bool {
        matches!(self, Self::Population)
    }

    pub fn input_spec(self) -> InputSpec {
        const PERCENT: (Option<f64>, Option<f64>) = (Some(0.0), Some(100.0));
        const SHARE: (Option<f64>, Option<f64>) = (Some(0.0), Some(1.0));
        let spec = |(min, max): (Option<f64>, Option<f64>), step, decimals, help| InputSpec {
            min,
            max,
            step,
            decimals,
            help,
        };
        match self {
            Self::Population => spec(
                (Some(0.0), None),
                1_000_000.0,
                0,
                "Population of a country.\nMin: 0  Avg: 22,000,000",
            ),
            Self::GdpPerCapita => spec(
                (Some(0.0), None),
                1_000.0,
                1,
                "GDP divided by population.\nMin: 0  Avg: 41,000",
            ),
            Self::TradeUnionDensity => spec(
                PERCENT,
                1.0,
                1,
                "Percent of workers in a trade union.\nMin: 0  Max: 100  Avg: 33",
            ),
            Self::UnemploymentRate => spec(
                PERCENT,
                1.0,
                1,
                "Percent of labor force unemployed.\nMin: 0  Max: 100  Avg: 8",
            ),
            Self::Health => spec(
                SHARE,
                0.01,
                4,
                "Share of GDP spent by government on health.\nMin: 0  Max: 1  Avg: .064",
            ),
            Self::Education => spec(
                SHARE,
                0.01,
                4,
                "Share of GDP spent by government on education.\nMin: 0  Max: 1  Avg: .052",
            ),
            Self::Housing => spec(
                SHARE,
                0.001,
                4,
                "Share of GDP spent by government on housing.\nMin: 0  Max: 1  Avg: .0032",
            ),
            Self::CommunityDevelopment => spec(
                SHARE,
                0.001,
                4,
                "Share of GDP spent by government on community development.\nMin: 0  Max: 1  Avg: .0019",
            ),
            Self::CorporateTaxRate => spec(
                PERCENT,
                1.0,
                1,
                "Percent of profits that corporations pay in taxes.\nMin: 0  Max: 100  Avg: 25",
            ),
            Self::Inflation => spec(
                (None, None),
                1.0,
                1,
                "Percent increase in general prices in a given year.\nNo bounds.  Avg: 2.1",
            ),
            Self::Irlt => spec(
                (None, None),
                1.0,
                1,
                "Percent interest paid on long-term bonds and loans.\nMin: 0  Max: 100  Avg: 3.5",
            ),
        }
    }

    /// Clamp to the input bounds, rounding integer features.
    pub fn coerce(self, value: f64) -> f64 {
        let spec = self.input_spec();
        let mut value = if value.is_finite() {
            value
        } else {
            self.default_value()
        };
        if let Some(min) = spec.min {
            value = value.max(min);
        }
        if let Some(max) = spec.max {
            value = value.min(max);
        }
        if self.is_integer() {
            value = value.trunc();
        }
        value
    }
}

impl fmt::Display for ScalarFeature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// World region, encoded for the model as four one-hot flags.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Region {
    #[default]
    EastAsiaPacific,
    EuropeCentralAsia,
    LatinAmericaCaribbean,
    MiddleEastNorthAfrica,
}

impl Region {
    /// Fixed scan order used wherever the one-hot flags are decoded.
    pub const ALL: [Region; 4] = [
        Self::EastAsiaPacific,
        Self::EuropeCentralAsia,
        Self::LatinAmericaCaribbean,
        Self::MiddleEastNorthAfrica,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Self::EastAsiaPacific => "East Asia and Pacific",
            Self::EuropeCentralAsia => "Europe and Central Asia",
            Self::LatinAmericaCaribbean => "Latin America and Caribbean",
            Self::MiddleEastNorthAfrica => "Middle East and North Africa",
        }
    }

    pub fn backend_name(self) -> &'static str {
        match self {
            Self::EastAsiaPacific => "Region_East_Asia_and_Pacific",
            Self::EuropeCentralAsia => "Region_Europe_and_Central_Asia",
            Self::LatinAmericaCaribbean => "Region_Latin_America_and_Caribbean",
            Self::MiddleEastNorthAfrica => "Region_Middle_East_and_North_Africa",
        }
    }

    /// Look up a region by its display name as used in preset records.
    pub fn from_display_name(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL
            .into_iter()
            .find(|region| region.display_name().eq_ignore_ascii_case(name))
    }

    /// The four flags in scan order; exactly one is 1.
    pub fn one_hot(self) -> [u8; 4] {
        let mut flags = [0; 4];
        flags[self.index()] = 1;
        flags
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Any of the fifteen keys the backend understands.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FeatureKey {
    Scalar(ScalarFeature),
    Region(Region),
}

impl FeatureKey {
    pub const COUNT: usize = ScalarFeature::COUNT + 4;

    pub fn all() -> impl Iterator<Item = FeatureKey> {
        ScalarFeature::ALL
            .into_iter()
            .map(FeatureKey::Scalar)
            .chain(Region::ALL.into_iter().map(FeatureKey::Region))
    }

    pub fn backend_name(self) -> &'static str {
        match self {
            Self::Scalar(feature) => feature.backend_name(),
            Self::Region(region) => region.backend_name(),
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Self::Scalar(feature) => feature.display_name(),
            Self::Region(region) => region.display_name(),
        }
    }

    pub fn from_backend_name(name: &str) -> Option<Self> {
        Self::all().find(|key| key.backend_name() == name)
    }

    pub fn from_display_name(name: &str) -> Option<Self> {
        Self::all().find(|key| key.display_name() == name)
    }
}

/// Map a display name to its backend field name; unknown names pass through.
pub fn to_backend_name(display: &str) -> Cow<'_, str> {
    match FeatureKey::from_display_name(display) {
        Some(key) => Cow::Borrowed(key.backend_name()),
        None => Cow::Borrowed(display),
    }
}

/// Map a backend field name to its display name; unknown names pass through.
pub fn to_display_name(backend: &str) -> Cow<'_, str> {
    match FeatureKey::from_backend_name(backend) {
        Some(key) => Cow::Borrowed(key.display_name()),
        None => Cow::Borrowed(backend),
    }
}

/// Display names used when the backend feature list is unavailable.
pub fn fallback_display_names() -> Vec<String> {
    FeatureKey::all()
        .map(|key| key.display_name().to_string())
        .collect()
}

/// Pick the features that can be swept from a display-name list.
///
/// Region flags are excluded by name. Names outside the catalogue are logged
/// and skipped, since their current value cannot be read from the form.
pub fn sweepable_features(display_names: &[String]) -> Vec<ScalarFeature> {
    let mut picked = Vec::new();
    for name in display_names {
        match FeatureKey::from_display_name(name).or_else(|| FeatureKey::from_backend_name(name)) {
            Some(FeatureKey::Scalar(feature)) if !picked.contains(&feature) => {
                picked.push(feature)
            }
            Some(_) => {}
            None => tracing::warn!(feature = %name, "Ignoring unknown feature from backend"),
        }
    }
    picked
}

/// Complete model input: eleven scalars plus a region.
#[derive(Clone, Debug, PartialEq)]
pub struct FeatureSnapshot {
    values: [f64; ScalarFeature::COUNT],
    region: Region,
}

impl Default for FeatureSnapshot {
    fn default() -> Self {
        Self {
            values: ScalarFeature::ALL.map(ScalarFeature::default_value),
            region: Region::default(),
        }
    }
}

impl FeatureSnapshot {
    pub fn get(&self, feature: ScalarFeature) -> f64 {
        self.values[feature.index()]
    }

    /// Store a value, truncating integer features.
    pub fn set(&mut self, feature: ScalarFeature, value: f64) {
        self.values[feature.index()] = if feature.is_integer() {
            value.trunc()
        } else {
            value
        };
    }

    pub fn with(mut self, feature: ScalarFeature, value: f64) -> Self {
        self.set(feature, value);
        self
    }

    pub fn population(&self) -> u64 {
        self.get(ScalarFeature::Population).max(0.0) as u64
    }

    pub fn region(&self) -> Region {
        self.region
    }

    pub fn set_region(&mut self, region: Region) {
        self.region = region;
    }

    pub fn with_region(mut self, region: Region) -> Self {
        self.region = region;
        self
    }
}

impl Serialize for FeatureSnapshot {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(FeatureKey::COUNT))?;
        for feature in ScalarFeature::ALL {
            if feature.is_integer() {
                map.serialize_entry(feature.backend_name(), &(self.get(feature).max(0.0) as u64))?;
            } else {
                map.serialize_entry(feature.backend_name(), &self.get(feature))?;
            }
        }
        let flags = self.region.one_hot();
        for region in Region::ALL {
            map.serialize_entry(region.backend_name(), &flags[region.index()])?;
        }
        map.end()
    }
}
