//! Cron-driven repeated runs

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use cron::Schedule;
use std::future::Future;
use std::str::FromStr;
use std::time::Duration;
use tracing::{error, info};

use crate::config::ScheduleConfig;
use crate::{DigestError, Result};

/// Fires a job at every occurrence of a cron expression
#[derive(Debug, Clone)]
pub struct Scheduler {
    schedule: Schedule,
    timezone: Tz,
}

impl Scheduler {
    /// `expression` is either standard 5-field cron (`0 7 * * *`) or the
    /// 6-field form with a leading seconds field (`0 0 7 * * *`).
    pub fn new(expression: &str, timezone: Tz) -> Result<Self> {
        let schedule = Schedule::from_str(&normalize_cron_expr(expression)).map_err(|e| {
            DigestError::config(format!("Invalid cron expression '{expression}': {e}"))
        })?;
        Ok(Self { schedule, timezone })
    }

    /// An empty timezone evaluates the expression in UTC.
    pub fn from_config(config: &ScheduleConfig) -> Result<Self> {
        let timezone = if config.timezone.is_empty() {
            Tz::UTC
        } else {
            config.timezone.parse::<Tz>().map_err(|_| {
                DigestError::config(format!("Unknown timezone '{}'", config.timezone))
            })?
        };
        Self::new(&config.cron, timezone)
    }

    /// First occurrence strictly after `after`
    #[must_use]
    pub fn next_after(&self, after: DateTime<Utc>) -> Option<DateTime<Tz>> {
        self.schedule
            .after(&after.with_timezone(&self.timezone))
            .next()
    }

    /// Run `job` on schedule until Ctrl-C.
    pub async fn run<F, Fut>(&self, job: F) -> Result<()>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<()>>,
    {
        self.run_until(job, async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!("Failed to listen for Ctrl-C: {}", e);
                std::future::pending::<()>().await;
            }
        })
        .await
    }

    /// Run `job` on schedule until `shutdown` completes. A failing job is
    /// logged and the schedule continues.
    pub async fn run_until<F, Fut, S>(&self, mut job: F, shutdown: S) -> Result<()>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<()>>,
        S: Future<Output = ()>,
    {
        tokio::pin!(shutdown);

        loop {
            let now = Utc::now();
            let Some(next) = self.next_after(now) else {
                info!("Schedule has no further occurrences; stopping");
                return Ok(());
            };
            let wait = (next.with_timezone(&Utc) - now)
                .to_std()
                .unwrap_or(Duration::ZERO);
            info!("Next weather digest at {}", next.format("%Y-%m-%d %H:%M:%S %Z"));

            tokio::select! {
                () = &mut shutdown => {
                    info!("Shutdown requested; stopping scheduler");
                    return Ok(());
                }
                () = tokio::time::sleep(wait) => {
                    if let Err(e) = job().await {
                        error!("Scheduled weather digest failed: {}", e);
                    }
                }
            }
        }
    }
}

/// The cron crate wants a seconds field; standard 5-field expressions get `0 `
/// prepended.
fn normalize_cron_expr(expression: &str) -> String {
    let expression = expression.trim();
    if expression.split_whitespace().count() == 5 {
        format!("0 {expression}")
    } else {
        expression.to_string()
    }
}
