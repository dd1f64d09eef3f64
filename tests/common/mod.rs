//! Shared fixtures and helpers for integration tests
#![allow(dead_code)]

use std::future::Future;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use serde_json::{Value, json};
use weatherdigest::models::LocationRequest;
use weatherdigest::{CombinedReport, Location, ReportSender, Result, UnitSystem};

/// 2026-10-19T11:00:00Z, a Monday; 07:00 in New York
pub const START: i64 = 1_792_407_600;

pub const API_KEY: &str = "test-api-key-12345";

/// A complete forecast response for New York, in `us` units
pub fn mock_forecast() -> Value {
    json!({
        "latitude": 40.7128,
        "longitude": -74.006,
        "timezone": "America/New_York",
        "currently": {
            "time": START,
            "summary": "Clear",
            "icon": "clear-day",
            "temperature": 72,
            "apparentTemperature": 70,
            "humidity": 0.65,
            "windSpeed": 8.5,
            "windGust": 12.3,
            "precipProbability": 0.15,
            "cloudCover": 0.24,
            "uvIndex": 3,
            "visibility": 10,
            "pressure": 1013
        },
        "hourly": {
            "data": [
                { "time": START, "icon": "clear-day", "temperature": 72, "summary": "Clear" },
                { "time": START + 3600, "icon": "partly-cloudy-day", "temperature": 73, "summary": "Partly Cloudy" },
                { "time": START + 7200, "icon": "partly-cloudy-day", "temperature": 74, "summary": "Partly Cloudy" },
                { "time": START + 10800, "icon": "cloudy", "temperature": 73, "summary": "Cloudy" },
                { "time": START + 14400, "icon": "rain", "temperature": 71, "summary": "Light Rain" },
                { "time": START + 18000, "icon": "rain", "temperature": 68, "summary": "Rain" }
            ]
        },
        "daily": {
            "data": [{
                "time": START,
                "summary": "Partly cloudy throughout the day.",
                "icon": "partly-cloudy-day",
                "temperatureHigh": 78,
                "temperatureHighTime": START + 21600,
                "temperatureLow": 62,
                "temperatureLowTime": START + 64800,
                "precipProbability": 0.1
            }]
        }
    })
}

/// `mock_forecast` with the current temperature replaced
pub fn mock_forecast_with_temperature(temperature: f64) -> Value {
    let mut forecast = mock_forecast();
    forecast["currently"]["temperature"] = json!(temperature);
    forecast
}

pub fn request(name: &str, lat: f64, lon: f64) -> LocationRequest {
    LocationRequest {
        api_key: API_KEY.to_string(),
        units: UnitSystem::Us,
        location: Location::new(name, lat, lon),
    }
}

/// Collects every report handed to it
#[derive(Default)]
pub struct RecordingSender {
    pub sent: Mutex<Vec<CombinedReport>>,
}

impl RecordingSender {
    pub fn sent(&self) -> Vec<CombinedReport> {
        self.sent.lock().unwrap().clone()
    }
}

impl ReportSender for RecordingSender {
    async fn send(&self, report: &CombinedReport) -> Result<()> {
        self.sent.lock().unwrap().push(report.clone());
        Ok(())
    }
}

/// Retry `operation` up to `max_attempts` times, doubling the delay after
/// each failure; returns the last error when every attempt fails.
pub async fn retry_with_backoff<T, E, F, Fut>(
    mut operation: F,
    max_attempts: u32,
    initial_delay: Duration,
) -> std::result::Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = std::result::Result<T, E>>,
{
    let mut delay = initial_delay;
    let mut attempt = 1;
    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(e) if attempt >= max_attempts => return Err(e),
            Err(_) => {
                tokio::time::sleep(delay).await;
                delay *= 2;
                attempt += 1;
            }
        }
    }
}

/// Poll `condition` every `interval` until it holds; panics after `timeout`.
pub async fn wait_for_condition<F>(mut condition: F, timeout: Duration, interval: Duration)
where
    F: FnMut() -> bool,
{
    let start = Instant::now();
    while start.elapsed() < timeout {
        if condition() {
            return;
        }
        tokio::time::sleep(interval).await;
    }
    panic!("Timeout waiting for condition after {timeout:?}");
}
