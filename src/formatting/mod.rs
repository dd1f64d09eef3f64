//! Per-location weather formatting
//!
//! Turns one raw forecast payload into the plain-text summary, the styled HTML
//! document and the scalar fields of a [`FormattedReport`]. Formatting never
//! fails: absent or malformed values render as `N/A` (or `0%` for the
//! probability fields) so a partial API response still produces a report.

mod clock;
pub mod html;
mod text;

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use serde_json::Value;
use std::borrow::Cow;
use tracing::debug;

pub use clock::Clock;

use crate::models::{FormattedReport, Location, RawForecast, UnitSystem};

/// Placeholder for values the API did not provide
pub const NOT_AVAILABLE: &str = "N/A";

/// Number of hourly entries rendered in the short-term block
pub const HOURLY_ENTRIES: usize = 6;
/// Number of daily entries rendered in the week block
pub const DAILY_ENTRIES: usize = 7;

/// Settings shared by every location of one run
#[derive(Debug, Clone)]
pub struct FormatOptions {
    /// Used when the payload carries no usable `timezone`
    pub fallback_timezone: Tz,
    /// Stamped into every report of the run
    pub generated_at: DateTime<Utc>,
}

impl FormatOptions {
    #[must_use]
    pub fn new(fallback_timezone: Tz) -> Self {
        Self {
            fallback_timezone,
            generated_at: Utc::now(),
        }
    }

    #[must_use]
    pub fn at(mut self, generated_at: DateTime<Utc>) -> Self {
        self.generated_at = generated_at;
        self
    }
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self::new(Tz::UTC)
    }
}

/// Everything the text and HTML renderers need for one location
pub(crate) struct ForecastView<'a> {
    pub name: &'a str,
    pub coordinates: (String, String),
    pub units: UnitSystem,
    pub clock: Clock,
    pub forecast: &'a RawForecast,
    pub generated_at: DateTime<Utc>,
}

impl ForecastView<'_> {
    pub fn temperature(&self, value: Option<f64>) -> String {
        format_temperature(value, self.units)
    }

    pub fn wind_speed(&self, value: Option<f64>) -> String {
        format_wind_speed(value, self.units)
    }

    pub fn visibility(&self) -> String {
        match self.forecast.currently.visibility {
            Some(v) => format!("{} {}", format_number(v), self.units.visibility_unit()),
            None => NOT_AVAILABLE.to_string(),
        }
    }

    /// Summary line of today's block
    pub fn summary(&self) -> &str {
        self.forecast
            .today()
            .and_then(|day| day.summary.as_deref())
            .or(self.forecast.currently.summary.as_deref())
            .unwrap_or("No summary available")
    }
}

/// Build the report for one location.
#[must_use]
pub fn format_location(
    location: &Location,
    units: UnitSystem,
    raw: Value,
    options: &FormatOptions,
) -> FormattedReport {
    let forecast = RawForecast::from_value(&raw);
    format_forecast(location, units, &forecast, raw, options)
}

/// [`format_location`] for a payload the caller has already parsed; `raw` is
/// kept as the report's `raw_data`.
#[must_use]
pub fn format_forecast(
    location: &Location,
    units: UnitSystem,
    forecast: &RawForecast,
    raw: Value,
    options: &FormatOptions,
) -> FormattedReport {
    let lat = forecast.latitude.unwrap_or(location.lat);
    let lon = forecast.longitude.unwrap_or(location.lon);

    let view = ForecastView {
        name: &location.name,
        coordinates: (lat.to_string(), lon.to_string()),
        units,
        clock: Clock::for_forecast(forecast.timezone.as_deref(), options.fallback_timezone),
        forecast,
        generated_at: options.generated_at,
    };

    debug!(
        location = %location.name,
        timezone = %view.clock.timezone(),
        hours = forecast.hourly.data.len(),
        days = forecast.daily.data.len(),
        "Formatting forecast"
    );

    let weather_info = text::render(&view);
    let html_body = html::render(&view);

    FormattedReport {
        location: location.name.clone(),
        coordinates: format!("{lat}, {lon}"),
        weather_info,
        html_body,
        temperature: forecast.currently.temperature,
        conditions: forecast.currently.icon.clone(),
        timestamp: options.generated_at,
        raw_data: raw,
    }
}

/// Round half toward positive infinity, the way the report has always rounded
/// (`-2.5` becomes `-2`, not `-3`).
#[must_use]
pub fn round_half_up(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}

/// `72.4` → `"72°F"`; missing → `"N/A"`. A real zero renders as `"0°F"`.
#[must_use]
pub fn format_temperature(value: Option<f64>, units: UnitSystem) -> String {
    match value {
        Some(v) => format!("{}{}", round_half_up(v), units.temperature_unit()),
        None => NOT_AVAILABLE.to_string(),
    }
}

/// `8.5` → `"9 mph"` (or `m/s`, `km/h`); missing → `"N/A"`.
#[must_use]
pub fn format_wind_speed(value: Option<f64>, units: UnitSystem) -> String {
    match value {
        Some(v) => format!("{} {}", round_half_up(v), units.wind_speed_unit()),
        None => NOT_AVAILABLE.to_string(),
    }
}

/// Fraction in `[0, 1]` as a whole percentage: `0.65` → `"65%"`.
#[must_use]
pub fn format_percent(fraction: Option<f64>) -> String {
    match fraction {
        Some(f) => format!("{}%", round_half_up(f * 100.0)),
        None => NOT_AVAILABLE.to_string(),
    }
}

/// Pressure rounded to whole millibars.
#[must_use]
pub fn format_pressure(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{} mb", round_half_up(v)),
        None => NOT_AVAILABLE.to_string(),
    }
}

/// UV index and similar values shown as the API sent them.
#[must_use]
pub fn format_optional(value: Option<f64>) -> String {
    value.map_or_else(|| NOT_AVAILABLE.to_string(), format_number)
}

fn format_number(value: f64) -> String {
    value.to_string()
}

/// Label for a known icon code
fn icon_label(code: &str) -> Option<&'static str> {
    let label = match code {
        "clear-day" => "☀️ Clear",
        "clear-night" => "🌙 Clear",
        "rain" => "🌧️ Rain",
        "snow" => "❄️ Snow",
        "sleet" => "🌨️ Sleet",
        "wind" => "💨 Windy",
        "fog" => "🌫️ Foggy",
        "cloudy" => "☁️ Cloudy",
        "partly-cloudy-day" => "⛅ Partly Cloudy",
        "partly-cloudy-night" => "☁️ Partly Cloudy",
        _ => return None,
    };
    Some(label)
}

/// Emoji-prefixed description of an icon code; unknown codes keep the raw
/// code after a generic emoji.
#[must_use]
pub fn describe_icon(code: Option<&str>) -> Cow<'static, str> {
    match code {
        Some(code) => match icon_label(code) {
            Some(label) => Cow::Borrowed(label),
            None => Cow::Owned(format!("🌤️ {code}")),
        },
        None => Cow::Borrowed("🌤️ Unknown"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case(None, UnitSystem::Us, "N/A")]
    #[case(None, UnitSystem::Si, "N/A")]
    #[case(Some(72.0), UnitSystem::Us, "72°F")]
    #[case(Some(22.0), UnitSystem::Si, "22°C")]
    #[case(Some(-3.2), UnitSystem::Ca, "-3°C")]
    #[case(Some(14.6), UnitSystem::Uk, "15°F")]
    #[case(Some(0.0), UnitSystem::Us, "0°F")]
    #[case(Some(-2.5), UnitSystem::Us, "-2°F")]
    #[case(Some(71.5), UnitSystem::Us, "72°F")]
    fn test_format_temperature(
        #[case] value: Option<f64>,
        #[case] units: UnitSystem,
        #[case] expected: &str,
    ) {
        assert_eq!(format_temperature(value, units), expected);
    }

    #[rstest]
    #[case(Some(8.5), UnitSystem::Us, "9 mph")]
    #[case(Some(4.2), UnitSystem::Si, "4 m/s")]
    #[case(Some(15.0), UnitSystem::Ca, "15 km/h")]
    #[case(Some(12.0), UnitSystem::Uk, "12 mph")]
    #[case(None, UnitSystem::Si, "N/A")]
    fn test_format_wind_speed(
        #[case] value: Option<f64>,
        #[case] units: UnitSystem,
        #[case] expected: &str,
    ) {
        assert_eq!(format_wind_speed(value, units), expected);
    }

    #[test]
    fn test_format_percent_and_pressure() {
        assert_eq!(format_percent(Some(0.65)), "65%");
        assert_eq!(format_percent(Some(0.0)), "0%");
        assert_eq!(format_percent(None), "N/A");
        assert_eq!(format_pressure(Some(1013.4)), "1013 mb");
        assert_eq!(format_pressure(None), "N/A");
        assert_eq!(format_optional(Some(3.0)), "3");
        assert_eq!(format_optional(Some(9.5)), "9.5");
    }

    #[rstest]
    #[case("clear-day", "☀️ Clear")]
    #[case("clear-night", "🌙 Clear")]
    #[case("rain", "🌧️ Rain")]
    #[case("snow", "❄️ Snow")]
    #[case("sleet", "🌨️ Sleet")]
    #[case("wind", "💨 Windy")]
    #[case("fog", "🌫️ Foggy")]
    #[case("cloudy", "☁️ Cloudy")]
    #[case("partly-cloudy-day", "⛅ Partly Cloudy")]
    #[case("partly-cloudy-night", "☁️ Partly Cloudy")]
    fn test_known_icons(#[case] code: &str, #[case] expected: &str) {
        assert_eq!(describe_icon(Some(code)), expected);
        assert_eq!(describe_icon(Some(code)), describe_icon(Some(code)));
    }

    #[test]
    fn test_unknown_icon_keeps_code() {
        let description = describe_icon(Some("foo"));
        assert!(description.contains("foo"));
        assert!(description.starts_with("🌤️"));
        assert_eq!(describe_icon(None), "🌤️ Unknown");
    }

    #[test]
    fn test_format_location_end_to_end() {
        let location = Location::new("NYC", 40.7128, -74.006);
        let raw = json!({
            "currently": { "temperature": 72, "icon": "clear-day" }
        });
        let generated_at = Utc.with_ymd_and_hms(2026, 10, 19, 11, 0, 0).unwrap();
        let options = FormatOptions::default().at(generated_at);

        let report = format_location(&location, UnitSystem::Us, raw.clone(), &options);

        assert!(report.weather_info.contains("Temperature: 72°F"));
        assert!(report.weather_info.contains("Current Conditions: ☀️ Clear"));
        assert_eq!(report.location, "NYC");
        assert_eq!(report.coordinates, "40.7128, -74.006");
        assert_eq!(report.temperature, Some(72.0));
        assert_eq!(report.conditions.as_deref(), Some("clear-day"));
        assert_eq!(report.timestamp, generated_at);
        assert_eq!(report.raw_data, raw);
    }

    #[test]
    fn test_uk_units_label_fahrenheit_with_mph() {
        let location = Location::new("London", 51.5074, -0.1278);
        let raw = json!({ "currently": { "temperature": 14.6, "windSpeed": 12 } });
        let report = format_location(&location, UnitSystem::Uk, raw, &FormatOptions::default());
        assert!(report.weather_info.contains("Temperature: 15°F"));
        assert!(report.weather_info.contains("Wind Speed: 12 mph"));
    }

    #[test]
    fn test_format_location_prefers_api_coordinates() {
        let location = Location::new("Paris", 48.8566, 2.3522);
        let raw = json!({ "latitude": 48.85, "longitude": 2.35 });
        let report = format_location(&location, UnitSystem::Si, raw, &FormatOptions::default());
        assert_eq!(report.coordinates, "48.85, 2.35");
    }

    #[test]
    fn test_format_location_malformed_payload_degrades() {
        let location = Location::new("Nowhere", 0.0, 0.0);
        let report = format_location(
            &location,
            UnitSystem::Us,
            json!("upstream exploded"),
            &FormatOptions::default(),
        );

        assert!(report.weather_info.contains("Temperature: N/A"));
        assert!(report.weather_info.contains("Humidity: N/A"));
        assert!(report.weather_info.contains("Precipitation Probability: 0%"));
        assert!(report.weather_info.contains("Summary: No summary available"));
        assert_eq!(report.temperature, None);
        assert_eq!(report.conditions, None);
    }
}
