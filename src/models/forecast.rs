//! Raw forecast payload as returned by the PirateWeather forecast endpoint

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::lenient;

/// Forecast document for a single location
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RawForecast {
    #[serde(deserialize_with = "lenient::number")]
    pub latitude: Option<f64>,
    #[serde(deserialize_with = "lenient::number")]
    pub longitude: Option<f64>,
    /// IANA timezone name of the location
    #[serde(deserialize_with = "lenient::text")]
    pub timezone: Option<String>,
    #[serde(deserialize_with = "lenient::section")]
    pub currently: CurrentConditions,
    #[serde(deserialize_with = "lenient::section")]
    pub hourly: DataBlock<HourlyPoint>,
    #[serde(deserialize_with = "lenient::section")]
    pub daily: DataBlock<DailyPoint>,
}

/// Snapshot of the conditions at request time
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CurrentConditions {
    #[serde(deserialize_with = "lenient::epoch")]
    pub time: Option<i64>,
    #[serde(deserialize_with = "lenient::text")]
    pub summary: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub icon: Option<String>,
    #[serde(deserialize_with = "lenient::number")]
    pub temperature: Option<f64>,
    #[serde(deserialize_with = "lenient::number")]
    pub apparent_temperature: Option<f64>,
    /// Fraction in [0, 1]
    #[serde(deserialize_with = "lenient::number")]
    pub humidity: Option<f64>,
    #[serde(deserialize_with = "lenient::number")]
    pub wind_speed: Option<f64>,
    #[serde(deserialize_with = "lenient::number")]
    pub wind_gust: Option<f64>,
    /// Fraction in [0, 1]
    #[serde(deserialize_with = "lenient::number")]
    pub precip_probability: Option<f64>,
    /// Fraction in [0, 1]
    #[serde(deserialize_with = "lenient::number")]
    pub cloud_cover: Option<f64>,
    #[serde(deserialize_with = "lenient::number")]
    pub uv_index: Option<f64>,
    #[serde(deserialize_with = "lenient::number")]
    pub visibility: Option<f64>,
    #[serde(deserialize_with = "lenient::number")]
    pub pressure: Option<f64>,
}

/// A `{summary, icon, data: [...]}` block (hourly or daily)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, bound(deserialize = "T: DeserializeOwned"))]
pub struct DataBlock<T> {
    #[serde(deserialize_with = "lenient::text")]
    pub summary: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub icon: Option<String>,
    #[serde(deserialize_with = "lenient::points")]
    pub data: Vec<T>,
}

impl<T> Default for DataBlock<T> {
    fn default() -> Self {
        Self {
            summary: None,
            icon: None,
            data: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HourlyPoint {
    #[serde(deserialize_with = "lenient::epoch")]
    pub time: Option<i64>,
    #[serde(deserialize_with = "lenient::text")]
    pub summary: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub icon: Option<String>,
    #[serde(deserialize_with = "lenient::number")]
    pub temperature: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DailyPoint {
    #[serde(deserialize_with = "lenient::epoch")]
    pub time: Option<i64>,
    #[serde(deserialize_with = "lenient::text")]
    pub summary: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub icon: Option<String>,
    #[serde(deserialize_with = "lenient::number")]
    pub temperature_high: Option<f64>,
    #[serde(deserialize_with = "lenient::epoch")]
    pub temperature_high_time: Option<i64>,
    #[serde(deserialize_with = "lenient::number")]
    pub temperature_low: Option<f64>,
    #[serde(deserialize_with = "lenient::epoch")]
    pub temperature_low_time: Option<i64>,
    /// Fraction in [0, 1]
    #[serde(deserialize_with = "lenient::number")]
    pub precip_probability: Option<f64>,
}

impl RawForecast {
    /// Best-effort conversion of an API response; never fails.
    #[must_use]
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::Object(_) => serde_json::from_value(value.clone()).unwrap_or_default(),
            _ => Self::default(),
        }
    }

    /// Today's entry, the first element of the daily block
    #[must_use]
    pub fn today(&self) -> Option<&DailyPoint> {
        self.daily.data.first()
    }

    /// Sections the payload did not carry, for degraded-report warnings
    #[must_use]
    pub fn missing_sections(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.currently == CurrentConditions::default() {
            missing.push("currently");
        }
        if self.hourly.data.is_empty() {
            missing.push("hourly");
        }
        if self.daily.data.is_empty() {
            missing.push("daily");
        }
        missing
    }
}
