use chrono::{DateTime, Utc};
use chrono_tz::Tz;

/// Renders epoch timestamps in the forecast location's local time.
#[derive(Debug, Clone, Copy)]
pub struct Clock {
    tz: Tz,
}

impl Clock {
    #[must_use]
    pub fn new(tz: Tz) -> Self {
        Self { tz }
    }

    /// Use the payload's IANA timezone when it parses, else `fallback`.
    #[must_use]
    pub fn for_forecast(timezone: Option<&str>, fallback: Tz) -> Self {
        let tz = timezone
            .and_then(|name| name.parse::<Tz>().ok())
            .unwrap_or(fallback);
        Self { tz }
    }

    #[must_use]
    pub fn timezone(&self) -> Tz {
        self.tz
    }

    fn local(&self, epoch: i64) -> Option<DateTime<Tz>> {
        DateTime::from_timestamp(epoch, 0).map(|utc| utc.with_timezone(&self.tz))
    }

    /// `7:05:00 AM`
    #[must_use]
    pub fn time_of_day(&self, epoch: Option<i64>) -> Option<String> {
        self.local(epoch?)
            .map(|t| t.format("%-I:%M:%S %p").to_string())
    }

    /// `07:00 AM`
    #[must_use]
    pub fn hour_minute(&self, epoch: Option<i64>) -> String {
        epoch
            .and_then(|e| self.local(e))
            .map_or_else(|| "--:--".to_string(), |t| t.format("%I:%M %p").to_string())
    }

    /// `Monday`
    #[must_use]
    pub fn weekday(&self, epoch: Option<i64>) -> String {
        epoch
            .and_then(|e| self.local(e))
            .map_or_else(|| "Unknown".to_string(), |t| t.format("%A").to_string())
    }

    /// `10/19/2026, 7:00:00 AM`
    #[must_use]
    pub fn date_time(&self, at: DateTime<Utc>) -> String {
        at.with_timezone(&self.tz)
            .format("%-m/%-d/%Y, %-I:%M:%S %p")
            .to_string()
    }
}
