//! One digest run: fetch every location, format, combine, deliver

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use futures::{StreamExt, TryStreamExt, stream};
use std::time::Instant;
use tracing::{info, instrument, warn};

use crate::combiner::combine_reports;
use crate::config::DigestConfig;
use crate::email::ReportSender;
use crate::formatting::{FormatOptions, format_forecast};
use crate::models::{CombinedReport, FormattedReport, LocationRequest, RawForecast};
use crate::validation::{validate_combined_report, validate_formatted_report};
use crate::weather::ForecastSource;
use crate::{DigestError, Result};

/// Per-run settings
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Forecast requests in flight at once
    pub concurrency: usize,
    pub fallback_timezone: Tz,
    /// Calendar date of the subject line and digest header
    pub report_timezone: Tz,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            concurrency: 1,
            fallback_timezone: Tz::UTC,
            report_timezone: Tz::UTC,
        }
    }
}

impl RunOptions {
    pub fn from_config(config: &DigestConfig) -> Result<Self> {
        Ok(Self {
            concurrency: config.weather.concurrency.max(1),
            fallback_timezone: config.fallback_timezone()?,
            report_timezone: config.report_timezone()?,
        })
    }
}

/// Fetch and format every location, keeping request order.
///
/// The first fetch failure aborts the run.
pub async fn fetch_reports<S: ForecastSource>(
    source: &S,
    requests: &[LocationRequest],
    options: &RunOptions,
    generated_at: DateTime<Utc>,
) -> Result<Vec<FormattedReport>> {
    let format_options = &FormatOptions::new(options.fallback_timezone).at(generated_at);

    stream::iter(requests)
        .map(|request| async move {
            let raw = source.fetch_forecast(request).await?;
            let forecast = RawForecast::from_value(&raw);
            warn_on_missing_sections(request, &forecast);
            Ok::<_, DigestError>(format_forecast(
                &request.location,
                request.units,
                &forecast,
                raw,
                format_options,
            ))
        })
        .buffered(options.concurrency.max(1))
        .try_collect()
        .await
}

/// Build the combined digest; `None` when there is nothing to report on.
pub async fn build_digest<S: ForecastSource>(
    source: &S,
    requests: &[LocationRequest],
    options: &RunOptions,
) -> Result<Option<CombinedReport>> {
    if requests.is_empty() {
        warn!("No locations configured; skipping weather digest");
        return Ok(None);
    }

    let generated_at = Utc::now();
    let reports = fetch_reports(source, requests, options, generated_at).await?;
    for report in &reports {
        let outcome = validate_formatted_report(report);
        if !outcome.is_valid() {
            warn!(location = %report.location, errors = ?outcome.errors, "Degraded weather report");
        }
    }

    let combined = combine_reports(&reports, generated_at, options.report_timezone)?;
    let outcome = validate_combined_report(&combined);
    if !outcome.is_valid() {
        warn!(errors = ?outcome.errors, "Combined report failed validation");
    }
    Ok(Some(combined))
}

/// Full run: build the digest and deliver it.
///
/// Returns the delivered report, or `None` when no locations are configured.
#[instrument(skip_all, fields(locations = requests.len()))]
pub async fn run<S: ForecastSource, M: ReportSender>(
    source: &S,
    sender: &M,
    requests: &[LocationRequest],
    options: &RunOptions,
) -> Result<Option<CombinedReport>> {
    let start_time = Instant::now();
    let Some(report) = build_digest(source, requests, options).await? else {
        return Ok(None);
    };

    sender.send(&report).await?;
    info!(
        "Weather digest for {} location(s) delivered in {:.3}s",
        report.location_count(),
        start_time.elapsed().as_secs_f64()
    );
    Ok(Some(report))
}

fn warn_on_missing_sections(request: &LocationRequest, forecast: &RawForecast) {
    let missing = forecast.missing_sections();
    if !missing.is_empty() {
        warn!(
            location = %request.location.name,
            "Forecast is missing {}",
            missing.join(", ")
        );
    }
}
