//! PirateWeather forecast client
//!
//! Fetches the raw forecast document for one location. Transient failures
//! (timeouts, 5xx, 429) are retried with exponential backoff by the
//! middleware stack; everything else is surfaced as [`DigestError::Api`].

use std::time::{Duration, Instant};

use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{RetryTransientMiddleware, policies::ExponentialBackoff};
use serde_json::Value;
use tracing::{debug, info, instrument, warn};

use crate::config::WeatherConfig;
use crate::models::LocationRequest;
use crate::{DigestError, Result};

const OPERATION: &str = "fetch_forecast";

/// Anything that can produce a raw forecast document for a location
pub trait ForecastSource {
    async fn fetch_forecast(&self, request: &LocationRequest) -> Result<Value>;
}

/// HTTP client for the PirateWeather forecast endpoint
#[derive(Debug, Clone)]
pub struct PirateWeatherClient {
    client: ClientWithMiddleware,
    base_url: String,
}

impl PirateWeatherClient {
    /// Build a client with the configured timeout and retry budget
    pub fn from_config(config: &WeatherConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(u64::from(config.timeout_seconds)))
            .user_agent(concat!("weatherdigest/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| DigestError::config(format!("Failed to create HTTP client: {e}")))?;

        let retry_policy = ExponentialBackoff::builder()
            .retry_bounds(Duration::from_millis(500), Duration::from_secs(30))
            .build_with_max_retries(config.max_retries);
        let client = ClientBuilder::new(http)
            .with(RetryTransientMiddleware::new_with_policy(retry_policy))
            .build();

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// `{base}/forecast/{key}/{lat},{lon}?units={units}`
    #[must_use]
    pub fn forecast_url(&self, request: &LocationRequest) -> String {
        format!(
            "{}/forecast/{}/{},{}?units={}",
            self.base_url,
            urlencoding::encode(&request.api_key),
            request.location.lat,
            request.location.lon,
            request.units
        )
    }
}

impl ForecastSource for PirateWeatherClient {
    #[instrument(skip(self, request), fields(location = %request.location.name, units = %request.units))]
    async fn fetch_forecast(&self, request: &LocationRequest) -> Result<Value> {
        let start_time = Instant::now();
        debug!(
            "Requesting forecast for {:.4}, {:.4}",
            request.location.lat, request.location.lon
        );

        let response = self
            .client
            .get(self.forecast_url(request))
            .send()
            .await
            .map_err(|e| DigestError::api(OPERATION, redact(e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("Forecast request failed with HTTP {}", status.as_u16());
            return Err(DigestError::api_status(
                OPERATION,
                status.as_u16(),
                error_message(&body, status.canonical_reason()),
            ));
        }

        let forecast: Value = response
            .json()
            .await
            .map_err(|e| DigestError::api(OPERATION, format!("Invalid forecast body: {}", e.without_url())))?;

        let elapsed = start_time.elapsed();
        info!("Retrieved forecast in {:.3}s", elapsed.as_secs_f64());
        if elapsed.as_secs() > 5 {
            warn!("Slow API response detected: {:.3}s", elapsed.as_secs_f64());
        }

        Ok(forecast)
    }
}

/// The request URL carries the API key; never let it reach an error message.
fn redact(error: reqwest_middleware::Error) -> String {
    match error {
        reqwest_middleware::Error::Reqwest(e) => e.without_url().to_string(),
        reqwest_middleware::Error::Middleware(e) => e.to_string(),
    }
}

/// PirateWeather answers errors with `{"message": "..."}`; fall back to the
/// raw body, then to the status reason.
fn error_message(body: &str, reason: Option<&str>) -> String {
    let from_json = serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v.get("message").and_then(Value::as_str).map(str::to_string));
    match from_json {
        Some(message) => message,
        None if !body.trim().is_empty() => body.trim().to_string(),
        None => reason.unwrap_or("request failed").to_string(),
    }
}
