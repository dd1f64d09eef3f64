//! HTML rendering of one location's forecast, plus the document helpers the
//! combiner reuses.

// `writeln!` into a String cannot fail, so its result is ignored throughout
use std::fmt::Write;

use super::{
    DAILY_ENTRIES, ForecastView, HOURLY_ENTRIES, describe_icon, format_optional, format_percent,
};

/// Inline stylesheet shared by per-location and combined documents
pub const STYLESHEET: &str = r#"
    body { font-family: Arial, sans-serif; line-height: 1.6; color: #333; background: #f5f5f5; margin: 0; padding: 20px; }
    .weather-report { max-width: 600px; margin: 0 auto 20px auto; background-color: #ffffff; border-radius: 10px; box-shadow: 0 2px 10px rgba(0,0,0,0.1); overflow: hidden; }
    .header { background: linear-gradient(135deg, #667eea 0%, #764ba2 100%); color: white; padding: 30px; text-align: center; }
    .header h1 { margin: 0; font-size: 28px; }
    .location { font-size: 18px; opacity: 0.9; margin-top: 5px; }
    .coordinates { font-size: 14px; margin-top: 10px; }
    .current-weather { background: #f8f9fa; padding: 25px; text-align: center; border-bottom: 2px solid #e9ecef; }
    .temperature { font-size: 48px; font-weight: bold; color: #667eea; margin: 10px 0; }
    .condition { font-size: 24px; color: #666; }
    .feels-like { color: #888; font-size: 16px; }
    .details { padding: 25px; }
    .detail-row { display: flex; justify-content: space-between; padding: 12px 0; border-bottom: 1px solid #e9ecef; }
    .detail-label { font-weight: 600; color: #555; }
    .detail-value { color: #777; }
    .forecasts { padding: 0 25px; }
    .forecast-section { background: #f8f9fa; padding: 20px 25px; margin: 20px 0; border-radius: 8px; }
    .forecast-title { font-size: 18px; font-weight: 600; color: #667eea; margin-bottom: 15px; }
    .today { color: #666; }
    .hourly-item { padding: 8px 0; border-bottom: 1px solid #dee2e6; }
    .forecast-day { padding: 12px 0; border-bottom: 1px solid #dee2e6; display: flex; justify-content: space-between; align-items: center; }
    .day-name { font-weight: 600; color: #555; min-width: 100px; }
    .day-temps { color: #667eea; font-weight: 500; }
    .day-condition { color: #777; flex: 1; text-align: right; }
    .footer { background: #343a40; color: #adb5bd; padding: 15px; text-align: center; font-size: 12px; }
    .footer .data-time { margin-top: 5px; font-size: 11px; }
"#;

/// Wrap `body` into a complete document with the shared stylesheet.
#[must_use]
pub fn document(title: &str, body: &str) -> String {
    format!(
        "<html>\n<head>\n  <meta charset=\"utf-8\">\n  <title>{}</title>\n  <style>{STYLESHEET}  </style>\n</head>\n<body>\n{body}\n</body>\n</html>\n",
        escape(title)
    )
}

/// Markup between `<body>` and `</body>`, or the whole input when the tags
/// are missing.
#[must_use]
pub fn body_inner(html: &str) -> &str {
    let start = html.find("<body>").map(|i| i + "<body>".len());
    let end = html.rfind("</body>");
    match (start, end) {
        (Some(start), Some(end)) if start <= end => html[start..end].trim(),
        _ => html.trim(),
    }
}

/// Escape text for use in element content and double-quoted attributes.
#[must_use]
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn detail_row(out: &mut String, label: &str, value: &str) {
    let _ = writeln!(
        out,
        "      <div class=\"detail-row\">\n        <span class=\"detail-label\">{label}</span>\n        <span class=\"detail-value\">{}</span>\n      </div>",
        escape(value)
    );
}

pub(crate) fn render(view: &ForecastView<'_>) -> String {
    let current = &view.forecast.currently;
    let today = view.forecast.today();
    let condition = describe_icon(current.icon.as_deref());

    let mut body = String::new();
    body.push_str("  <div class=\"weather-report\">\n");

    let _ = writeln!(
        body,
        "    <div class=\"header\">\n      <h1>🌤️ Weather Report</h1>\n      <div class=\"location\">{}</div>\n      <div class=\"location coordinates\">{}°, {}°</div>\n    </div>",
        escape(view.name),
        view.coordinates.0,
        view.coordinates.1
    );

    let _ = writeln!(
        body,
        "    <div class=\"current-weather\">\n      <div class=\"condition\">{}</div>\n      <div class=\"temperature\">{}</div>\n      <div class=\"feels-like\">Feels like {}</div>\n    </div>",
        escape(&condition),
        view.temperature(current.temperature),
        view.temperature(current.apparent_temperature)
    );

    body.push_str("    <div class=\"details\">\n");
    detail_row(&mut body, "💧 Humidity", &format_percent(current.humidity));
    detail_row(&mut body, "💨 Wind Speed", &view.wind_speed(current.wind_speed));
    detail_row(&mut body, "🌬️ Wind Gust", &view.wind_speed(current.wind_gust));
    detail_row(
        &mut body,
        "🌧️ Precipitation",
        &format_percent(Some(current.precip_probability.unwrap_or(0.0))),
    );
    detail_row(
        &mut body,
        "☁️ Cloud Cover",
        &format_percent(Some(current.cloud_cover.unwrap_or(0.0))),
    );
    detail_row(&mut body, "☀️ UV Index", &format_optional(current.uv_index));
    detail_row(&mut body, "👁️ Visibility", &view.visibility());
    body.push_str("    </div>\n");

    body.push_str("    <div class=\"forecasts\">\n");
    let _ = writeln!(
        body,
        "      <div class=\"forecast-section\">\n        <div class=\"forecast-title\">📅 Today's Forecast</div>\n        <div class=\"today\">\n          <strong>High:</strong> {} <br>\n          <strong>Low:</strong> {} <br>\n          <strong>Summary:</strong> {}\n        </div>\n      </div>",
        view.temperature(today.and_then(|d| d.temperature_high)),
        view.temperature(today.and_then(|d| d.temperature_low)),
        escape(view.summary())
    );

    let _ = writeln!(
        body,
        "      <div class=\"forecast-section\">\n        <div class=\"forecast-title\">⏰ {HOURLY_ENTRIES}-Hour Forecast</div>"
    );
    for hour in view.forecast.hourly.data.iter().take(HOURLY_ENTRIES) {
        let _ = writeln!(
            body,
            "        <div class=\"hourly-item\">{}: <strong>{}</strong> - {}</div>",
            view.clock.hour_minute(hour.time),
            view.temperature(hour.temperature),
            escape(&describe_icon(hour.icon.as_deref()))
        );
    }
    body.push_str("      </div>\n");

    let _ = writeln!(
        body,
        "      <div class=\"forecast-section\">\n        <div class=\"forecast-title\">📆 {DAILY_ENTRIES}-Day Forecast</div>"
    );
    for day in view.forecast.daily.data.iter().take(DAILY_ENTRIES) {
        let _ = writeln!(
            body,
            "        <div class=\"forecast-day\">\n          <span class=\"day-name\">{}</span>\n          <span class=\"day-temps\">High {} / Low {}</span>\n          <span class=\"day-condition\">{} {}</span>\n        </div>",
            view.clock.weekday(day.time),
            view.temperature(day.temperature_high),
            view.temperature(day.temperature_low),
            escape(&describe_icon(day.icon.as_deref())),
            format_percent(Some(day.precip_probability.unwrap_or(0.0)))
        );
    }
    body.push_str("      </div>\n    </div>\n");

    let data_time = view
        .clock
        .time_of_day(current.time)
        .unwrap_or_else(|| "unknown".to_string());
    let _ = writeln!(
        body,
        "    <div class=\"footer\">\n      <p>Powered by PirateWeather API | Generated {}</p>\n      <p class=\"data-time\">Data updated: {}</p>\n    </div>",
        view.clock.date_time(view.generated_at),
        data_time
    );
    body.push_str("  </div>");

    document(&format!("Weather Report - {}", view.name), &body)
}
