//! Structural checks for formatted and combined reports
//!
//! Used by the pipeline to warn about degraded output before sending, and by
//! the tests as assertions on the formatter and combiner.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

use crate::combiner::SUBJECT_PREFIX;
use crate::models::{CombinedReport, FormattedReport};

static MORE_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\+\d+ more").expect("valid regex"));
static TEMPERATURE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(-?\d+)°[FC]").expect("valid regex"));

/// Outcome of a structural check
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationOutcome {
    pub errors: Vec<String>,
}

impl ValidationOutcome {
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    fn check(&mut self, ok: bool, message: impl Into<String>) {
        if !ok {
            self.errors.push(message.into());
        }
    }
}

const REQUIRED_HTML_TAGS: [&str; 6] = ["<html>", "</html>", "<head>", "</head>", "<body>", "</body>"];

/// Every required document tag is present.
#[must_use]
pub fn is_valid_html(html: &str) -> bool {
    REQUIRED_HTML_TAGS.iter().all(|tag| html.contains(tag))
}

/// Check a per-location report.
#[must_use]
pub fn validate_formatted_report(report: &FormattedReport) -> ValidationOutcome {
    let mut outcome = ValidationOutcome::default();
    outcome.check(!report.location.is_empty(), "location should not be empty");
    outcome.check(!report.coordinates.is_empty(), "coordinates should not be empty");
    outcome.check(!report.weather_info.is_empty(), "weatherInfo should not be empty");
    outcome.check(
        is_valid_html(&report.html_body),
        "htmlBody should contain valid HTML structure",
    );
    outcome.check(
        report.temperature.is_some(),
        "temperature is missing from the forecast",
    );
    outcome.check(
        report.conditions.is_some(),
        "conditions are missing from the forecast",
    );
    outcome
}

/// Check the serialized shape of a per-location report, as delivered to
/// downstream consumers.
#[must_use]
pub fn validate_formatted_report_json(value: &Value) -> ValidationOutcome {
    let mut outcome = ValidationOutcome::default();
    for field in [
        "location",
        "coordinates",
        "weatherInfo",
        "htmlBody",
        "temperature",
        "conditions",
        "timestamp",
    ] {
        outcome.check(value.get(field).is_some(), format!("Missing required field: {field}"));
    }
    outcome.check(
        value.get("temperature").is_some_and(Value::is_number),
        "temperature should be a number",
    );
    outcome.check(
        value.get("weatherInfo").is_some_and(Value::is_string),
        "weatherInfo should be a string",
    );
    match value.get("htmlBody").and_then(Value::as_str) {
        Some(html) => outcome.check(is_valid_html(html), "htmlBody should contain valid HTML structure"),
        None => outcome.check(false, "htmlBody should be a string"),
    }
    outcome
}

/// Check a combined report, including its subject line.
#[must_use]
pub fn validate_combined_report(report: &CombinedReport) -> ValidationOutcome {
    let mut outcome = validate_subject_format(&report.subject, report.location_count());
    outcome.check(
        report.location_count() == report.locations().len(),
        "locationCount does not match locations array length",
    );
    outcome.check(
        is_valid_html(&report.html_body),
        "htmlBody should contain valid HTML structure",
    );
    outcome.check(!report.weather_info.is_empty(), "weatherInfo should not be empty");
    outcome
}

/// Subject carries the prefix, and a `+N more` suffix from four locations on.
#[must_use]
pub fn validate_subject_format(subject: &str, location_count: usize) -> ValidationOutcome {
    let mut outcome = ValidationOutcome::default();
    outcome.check(
        subject.contains(SUBJECT_PREFIX),
        format!("subject should contain \"{SUBJECT_PREFIX}\""),
    );
    if location_count >= 4 {
        outcome.check(
            MORE_SUFFIX.is_match(subject),
            "subject for 4+ locations should include \"+N more\" format",
        );
    } else {
        outcome.check(
            !MORE_SUFFIX.is_match(subject),
            "subject for fewer than 4 locations should name every location",
        );
    }
    outcome
}

/// Check raw coordinate strings; returns the parsed pair when valid.
pub fn validate_coordinates(lat: &str, lon: &str) -> Result<(f64, f64), ValidationOutcome> {
    let mut outcome = ValidationOutcome::default();
    let latitude = lat.trim().parse::<f64>().ok();
    let longitude = lon.trim().parse::<f64>().ok();

    match latitude {
        None => outcome.check(false, "Invalid latitude format"),
        Some(v) => outcome.check((-90.0..=90.0).contains(&v), "Latitude must be between -90 and 90"),
    }
    match longitude {
        None => outcome.check(false, "Invalid longitude format"),
        Some(v) => outcome.check(
            (-180.0..=180.0).contains(&v),
            "Longitude must be between -180 and 180",
        ),
    }

    match (latitude, longitude) {
        (Some(lat), Some(lon)) if outcome.is_valid() => Ok((lat, lon)),
        _ => Err(outcome),
    }
}

/// All rendered temperatures (`72°F`, `-3°C`) in a text body, in order.
#[must_use]
pub fn extract_temperatures(text: &str) -> Vec<i64> {
    TEMPERATURE
        .captures_iter(text)
        .filter_map(|c| c[1].parse().ok())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combiner::combine_reports;
    use crate::formatting::{FormatOptions, format_location};
    use crate::models::{Location, UnitSystem};
    use chrono::Utc;
    use serde_json::json;

    fn report(name: &str) -> FormattedReport {
        format_location(
            &Location::new(name, 40.7128, -74.006),
            UnitSystem::Us,
            json!({ "currently": { "temperature": 72, "icon": "clear-day" } }),
            &FormatOptions::default(),
        )
    }

    #[test]
    fn test_formatted_report_is_valid() {
        let outcome = validate_formatted_report(&report("NYC"));
        assert!(outcome.is_valid(), "{:?}", outcome.errors);

        let value = serde_json::to_value(report("NYC")).unwrap();
        let outcome = validate_formatted_report_json(&value);
        assert!(outcome.is_valid(), "{:?}", outcome.errors);
    }

    #[test]
    fn test_degraded_report_flags_missing_fields() {
        let degraded = format_location(
            &Location::new("NYC", 40.7128, -74.006),
            UnitSystem::Us,
            json!({}),
            &FormatOptions::default(),
        );
        let outcome = validate_formatted_report(&degraded);
        assert_eq!(outcome.errors.len(), 2);

        let outcome = validate_formatted_report_json(&serde_json::to_value(&degraded).unwrap());
        assert_eq!(outcome.errors, vec!["temperature should be a number".to_string()]);
    }

    #[test]
    fn test_json_shape_missing_fields() {
        let outcome = validate_formatted_report_json(&json!({ "location": "NYC" }));
        assert!(outcome.errors.contains(&"Missing required field: htmlBody".to_string()));
        assert!(outcome.errors.contains(&"htmlBody should be a string".to_string()));
    }

    #[test]
    fn test_combined_report_is_valid() {
        for count in 1..=5 {
            let reports: Vec<_> = (0..count).map(|i| report(&format!("City {i}"))).collect();
            let combined = combine_reports(&reports, Utc::now(), chrono_tz::Tz::UTC).unwrap();
            let outcome = validate_combined_report(&combined);
            assert!(outcome.is_valid(), "{count} locations: {:?}", outcome.errors);
        }
    }

    #[test]
    fn test_subject_format() {
        assert!(validate_subject_format("🌤️ Weather Report: A, B, C +2 more", 5).is_valid());
        assert!(!validate_subject_format("🌤️ Weather Report: A, B, C, D, E", 5).is_valid());
        assert!(!validate_subject_format("Forecast: A", 1).is_valid());
    }

    #[test]
    fn test_is_valid_html() {
        assert!(is_valid_html("<html><head></head><body></body></html>"));
        assert!(!is_valid_html("<html><body></body></html>"));
    }

    #[test]
    fn test_validate_coordinates() {
        assert_eq!(validate_coordinates("40.7128", "-74.0060").unwrap(), (40.7128, -74.006));

        let outcome = validate_coordinates("91", "abc").unwrap_err();
        assert_eq!(
            outcome.errors,
            vec![
                "Latitude must be between -90 and 90".to_string(),
                "Invalid longitude format".to_string()
            ]
        );
    }

    #[test]
    fn test_extract_temperatures() {
        let text = "Temperature: 72°F\nFeels Like: -3°C\nHigh: N/A";
        assert_eq!(extract_temperatures(text), vec![72, -3]);
    }
}
