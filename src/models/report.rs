//! Formatted per-location reports and the combined digest

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Rendered weather for one location
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormattedReport {
    /// Location name
    pub location: String,
    /// `"lat, lon"`
    pub coordinates: String,
    /// Plain-text rendering
    pub weather_info: String,
    /// Complete HTML document
    pub html_body: String,
    /// Current temperature in the requested units
    pub temperature: Option<f64>,
    /// Current icon code, e.g. `clear-day`
    pub conditions: Option<String>,
    /// When the report was generated (not the forecast time)
    pub timestamp: DateTime<Utc>,
    /// Unmodified API response
    pub raw_data: Value,
}

/// All location reports merged into one email payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "CombinedReportFields")]
pub struct CombinedReport {
    pub weather_info: String,
    pub html_body: String,
    pub subject: String,
    location_count: usize,
    locations: Vec<String>,
    pub timestamp: DateTime<Utc>,
}

/// Wire shape; a serialized `locationCount` is recomputed on load.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CombinedReportFields {
    weather_info: String,
    html_body: String,
    subject: String,
    #[serde(default)]
    locations: Vec<String>,
    timestamp: DateTime<Utc>,
}

impl From<CombinedReportFields> for CombinedReport {
    fn from(fields: CombinedReportFields) -> Self {
        Self::new(
            fields.weather_info,
            fields.html_body,
            fields.subject,
            fields.locations,
            fields.timestamp,
        )
    }
}

impl CombinedReport {
    /// Build a report; the count is always derived from `locations`.
    #[must_use]
    pub fn new(
        weather_info: String,
        html_body: String,
        subject: String,
        locations: Vec<String>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            weather_info,
            html_body,
            subject,
            location_count: locations.len(),
            locations,
            timestamp,
        }
    }

    #[must_use]
    pub fn location_count(&self) -> usize {
        self.location_count
    }

    /// Location names in report order
    #[must_use]
    pub fn locations(&self) -> &[String] {
        &self.locations
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_location_count_follows_locations() {
        let report = CombinedReport::new(
            String::new(),
            String::new(),
            "Weather Report".to_string(),
            vec!["NYC".to_string(), "Boston".to_string()],
            Utc::now(),
        );
        assert_eq!(report.location_count(), report.locations().len());
    }

    #[test]
    fn test_combined_report_serializes_camel_case() {
        let report = CombinedReport::new(
            "text".to_string(),
            "<html></html>".to_string(),
            "subject".to_string(),
            vec!["NYC".to_string()],
            Utc::now(),
        );
        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["locationCount"], 1);
        assert_eq!(value["locations"][0], "NYC");
        assert!(value.get("weatherInfo").is_some());
        assert!(value.get("htmlBody").is_some());
    }

    #[test]
    fn test_deserialize_recomputes_location_count() {
        let report: CombinedReport = serde_json::from_value(serde_json::json!({
            "weatherInfo": "",
            "htmlBody": "",
            "subject": "Weather Report: A & B",
            "locationCount": 7,
            "locations": ["A", "B"],
            "timestamp": "2026-01-01T07:00:00Z"
        }))
        .unwrap();
        assert_eq!(report.location_count(), 2);
    }
}
