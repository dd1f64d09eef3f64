//! Plain-text rendering of one location's forecast

use super::{
    DAILY_ENTRIES, ForecastView, HOURLY_ENTRIES, NOT_AVAILABLE, describe_icon, format_optional,
    format_percent, format_pressure,
};

pub(crate) fn render(view: &ForecastView<'_>) -> String {
    let current = &view.forecast.currently;
    let today = view.forecast.today();

    let mut lines = vec![
        format!("Current Conditions: {}", describe_icon(current.icon.as_deref())),
        format!("Temperature: {}", view.temperature(current.temperature)),
        format!("Feels Like: {}", view.temperature(current.apparent_temperature)),
        format!("Humidity: {}", format_percent(current.humidity)),
        format!("Wind Speed: {}", view.wind_speed(current.wind_speed)),
        format!("Wind Gust: {}", view.wind_speed(current.wind_gust)),
        format!(
            "Precipitation Probability: {}",
            format_percent(Some(current.precip_probability.unwrap_or(0.0)))
        ),
        format!(
            "Cloud Cover: {}",
            format_percent(Some(current.cloud_cover.unwrap_or(0.0)))
        ),
        format!("UV Index: {}", format_optional(current.uv_index)),
        format!("Visibility: {}", view.visibility()),
        format!("Pressure: {}", format_pressure(current.pressure)),
        String::new(),
        "Today's Forecast:".to_string(),
        extreme_line(
            view,
            "High",
            today.and_then(|d| d.temperature_high),
            today.and_then(|d| d.temperature_high_time),
        ),
        extreme_line(
            view,
            "Low",
            today.and_then(|d| d.temperature_low),
            today.and_then(|d| d.temperature_low_time),
        ),
        format!("Summary: {}", view.summary()),
    ];

    lines.push(String::new());
    lines.push(format!("{HOURLY_ENTRIES}-Hour Forecast:"));
    for hour in view.forecast.hourly.data.iter().take(HOURLY_ENTRIES) {
        lines.push(format!(
            "{}: {}, {}",
            view.clock.hour_minute(hour.time),
            view.temperature(hour.temperature),
            describe_icon(hour.icon.as_deref())
        ));
    }

    lines.push(String::new());
    lines.push(format!("{DAILY_ENTRIES}-Day Forecast:"));
    for day in view.forecast.daily.data.iter().take(DAILY_ENTRIES) {
        lines.push(format!(
            "{}: High {}, Low {}, {}, {} precip",
            view.clock.weekday(day.time),
            view.temperature(day.temperature_high),
            view.temperature(day.temperature_low),
            describe_icon(day.icon.as_deref()),
            format_percent(Some(day.precip_probability.unwrap_or(0.0)))
        ));
    }

    lines.join("\n")
}

/// `High: 78°F at 1:00:00 PM`; the clock part is dropped when either side is
/// missing.
fn extreme_line(
    view: &ForecastView<'_>,
    label: &str,
    temperature: Option<f64>,
    time: Option<i64>,
) -> String {
    let rendered = view.temperature(temperature);
    match view.clock.time_of_day(time) {
        Some(clock) if rendered != NOT_AVAILABLE => format!("{label}: {rendered} at {clock}"),
        _ => format!("{label}: {rendered}"),
    }
}

#[cfg(test)]
mod tests {
    use crate::formatting::{FormatOptions, format_location};
    use crate::models::{Location, UnitSystem};
    use chrono::{TimeZone, Utc};
    use serde_json::{Value, json};

    // 2026-10-19T11:00:00Z
    const START: i64 = 1_792_407_600;

    fn payload(hours: usize, days: usize) -> Value {
        let hourly: Vec<Value> = (0..hours)
            .map(|i| json!({ "time": START + 3600 * i as i64, "temperature": 60 + i, "icon": "cloudy" }))
            .collect();
        let daily: Vec<Value> = (0..days)
            .map(|i| {
                json!({
                    "time": START + 86_400 * i as i64,
                    "temperatureHigh": 78,
                    "temperatureHighTime": START + 6 * 3600,
                    "temperatureLow": 62,
                    "temperatureLowTime": START + 18 * 3600,
                    "icon": "rain",
                    "precipProbability": 0.42,
                    "summary": "Rain in the evening."
                })
            })
            .collect();
        json!({
            "timezone": "America/New_York",
            "currently": {
                "time": START,
                "temperature": 72,
                "apparentTemperature": 70,
                "humidity": 0.65,
                "windSpeed": 8.5,
                "windGust": 12.3,
                "precipProbability": 0.15,
                "cloudCover": 0.24,
                "uvIndex": 3,
                "visibility": 10,
                "pressure": 1013.2,
                "icon": "clear-day",
                "summary": "Clear"
            },
            "hourly": { "data": hourly },
            "daily": { "data": daily }
        })
    }

    fn render(raw: Value, units: UnitSystem) -> String {
        let options =
            FormatOptions::default().at(Utc.with_ymd_and_hms(2026, 10, 19, 11, 0, 0).unwrap());
        format_location(&Location::new("NYC", 40.7128, -74.006), units, raw, &options).weather_info
    }

    #[test]
    fn test_current_block_lines() {
        let text = render(payload(6, 7), UnitSystem::Us);
        let expected = [
            "Current Conditions: ☀️ Clear",
            "Temperature: 72°F",
            "Feels Like: 70°F",
            "Humidity: 65%",
            "Wind Speed: 9 mph",
            "Wind Gust: 12 mph",
            "Precipitation Probability: 15%",
            "Cloud Cover: 24%",
            "UV Index: 3",
            "Visibility: 10 miles",
            "Pressure: 1013 mb",
        ];
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(&lines[..expected.len()], &expected);
    }

    #[test]
    fn test_today_block_uses_local_clock() {
        let text = render(payload(6, 7), UnitSystem::Us);
        assert!(text.contains("High: 78°F at 1:00:00 PM"));
        assert!(text.contains("Low: 62°F at 1:00:00 AM"));
        assert!(text.contains("Summary: Rain in the evening."));
    }

    #[test]
    fn test_hourly_block_is_capped_at_six_in_order() {
        let text = render(payload(10, 7), UnitSystem::Us);
        assert!(text.contains("6-Hour Forecast:\n07:00 AM: 60°F, ☁️ Cloudy\n08:00 AM: 61°F"));
        assert!(text.contains("12:00 PM: 65°F"));
        assert!(!text.contains("01:00 PM: 66°F"));
    }

    #[test]
    fn test_daily_block_is_capped_at_seven() {
        let text = render(payload(6, 9), UnitSystem::Si);
        let day_lines = text.lines().filter(|l| l.contains("precip")).count();
        assert_eq!(day_lines, 7);
        assert!(text.contains("Monday: High 78°C, Low 62°C, 🌧️ Rain, 42% precip"));
        assert!(text.contains("Tuesday: High 78°C"));
    }

    #[test]
    fn test_short_sequences_render_available_entries() {
        let text = render(payload(2, 3), UnitSystem::Us);
        let after_hourly = text.split("6-Hour Forecast:\n").nth(1).unwrap();
        let hourly_lines = after_hourly.lines().take_while(|l| !l.is_empty()).count();
        assert_eq!(hourly_lines, 2);
        assert_eq!(text.lines().filter(|l| l.contains("precip")).count(), 3);
    }

    #[test]
    fn test_summary_fallbacks() {
        let mut raw = payload(0, 0);
        let text = render(raw.clone(), UnitSystem::Us);
        assert!(text.contains("Summary: Clear"));
        assert!(text.contains("High: N/A\nLow: N/A"));

        raw["currently"]["summary"] = Value::Null;
        let text = render(raw, UnitSystem::Us);
        assert!(text.contains("Summary: No summary available"));
    }

    #[test]
    fn test_metric_visibility_unit() {
        let text = render(payload(1, 1), UnitSystem::Ca);
        assert!(text.contains("Visibility: 10 km"));
        assert!(text.contains("Wind Speed: 9 km/h"));
    }
}
