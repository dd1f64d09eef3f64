//! Merges per-location reports into the single email payload

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use std::fmt::Write;

use crate::formatting::html;
use crate::models::{CombinedReport, FormattedReport};
use crate::{DigestError, Result};

/// Subject prefix every digest carries
pub const SUBJECT_PREFIX: &str = "🌤️ Weather Report";

/// Location names spelled out before the subject switches to `+K more`
const SUBJECT_NAMED_LOCATIONS: usize = 3;

/// Combine the formatted reports, in order, into one digest dated in
/// `timezone`.
///
/// An empty slice is rejected: a digest without locations has nothing to
/// send.
pub fn combine_reports(
    reports: &[FormattedReport],
    generated_at: DateTime<Utc>,
    timezone: Tz,
) -> Result<CombinedReport> {
    if reports.is_empty() {
        return Err(DigestError::validation(
            "Cannot build a weather report without any locations",
        ));
    }

    let locations: Vec<String> = reports.iter().map(|r| r.location.clone()).collect();
    let local = generated_at.with_timezone(&timezone);
    let subject = build_subject(&locations, &local);

    let weather_info = reports
        .iter()
        .map(text_block)
        .collect::<Vec<_>>()
        .join("\n\n");

    let mut body = String::new();
    // Writing into a String cannot fail
    let _ = writeln!(
        body,
        "  <div class=\"weather-report\">\n    <div class=\"header\">\n      <h1>{SUBJECT_PREFIX}</h1>\n      <div class=\"location\">{}</div>\n    </div>\n  </div>",
        html::escape(&location_summary(locations.len(), &local))
    );
    for report in reports {
        body.push_str(html::body_inner(&report.html_body));
        body.push('\n');
    }

    Ok(CombinedReport::new(
        weather_info,
        html::document(&subject, &body),
        subject,
        locations,
        generated_at,
    ))
}

/// Subject line whose wording depends on how many locations are present:
/// `A`, `A & B`, `A, B & C`, then `A, B, C +K more`. The date is taken from
/// `local` as given, so pass it already converted to the report timezone.
#[must_use]
pub fn build_subject(locations: &[String], local: &DateTime<Tz>) -> String {
    let names = match locations {
        [] => "No locations".to_string(),
        [only] => only.clone(),
        [first, second] => format!("{first} & {second}"),
        [first, second, third] => format!("{first}, {second} & {third}"),
        _ => format!(
            "{} +{} more",
            locations[..SUBJECT_NAMED_LOCATIONS].join(", "),
            locations.len() - SUBJECT_NAMED_LOCATIONS
        ),
    };
    format!(
        "{SUBJECT_PREFIX}: {names} - {}",
        local.format("%b %-d, %Y")
    )
}

fn location_summary(count: usize, local: &DateTime<Tz>) -> String {
    let noun = if count == 1 { "location" } else { "locations" };
    format!("{count} {noun} · {}", local.format("%A, %B %-d, %Y"))
}

fn text_block(report: &FormattedReport) -> String {
    let header = format!("📍 {} ({})", report.location, report.coordinates);
    format!("{header}\n{}\n{}", "=".repeat(40), report.weather_info)
}
