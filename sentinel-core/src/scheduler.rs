//! Fixed daily schedule for the scheduled trigger

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Days, Local, NaiveDateTime, NaiveTime, TimeZone};

use crate::coordinator::TriggerCoordinator;
use crate::error::{ConfigError, ConfigResult};

/// Default local fire time
pub const DEFAULT_DAILY_AT: &str = "07:00";

/// Fires once a day at a local wall-clock time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DailySchedule {
    at: NaiveTime,
}

impl DailySchedule {
    /// Parses `HH:MM` (24-hour)
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] for anything else.
    pub fn parse(value: &str) -> ConfigResult<Self> {
        NaiveTime::parse_from_str(value.trim(), "%H:%M")
            .map(|at| Self { at })
            .map_err(|_| {
                ConfigError::Validation(format!(
                    "invalid schedule time '{value}', expected HH:MM"
                ))
            })
    }

    /// Local wall-clock fire time
    #[must_use]
    pub const fn time(&self) -> NaiveTime {
        self.at
    }

    /// First fire instant strictly after `now`
    #[must_use]
    pub fn next_after(&self, now: DateTime<Local>) -> DateTime<Local> {
        let mut day = now.date_naive();
        loop {
            if let Some(fire) = Self::resolve_local(day.and_time(self.at))
                && fire > now
            {
                return fire;
            }
            day = day
                .checked_add_days(Days::new(1))
                .unwrap_or(chrono::NaiveDate::MAX);
        }
    }

    /// Time left until the next fire
    #[must_use]
    pub fn until_next(&self, now: DateTime<Local>) -> Duration {
        (self.next_after(now) - now)
            .to_std()
            .unwrap_or(Duration::ZERO)
    }

    // A wall-clock time skipped by a DST jump fires an hour later
    fn resolve_local(naive: NaiveDateTime) -> Option<DateTime<Local>> {
        Local
            .from_local_datetime(&naive)
            .earliest()
            .or_else(|| {
                Local
                    .from_local_datetime(&(naive + chrono::Duration::hours(1)))
                    .earliest()
            })
    }
}

impl Default for DailySchedule {
    fn default() -> Self {
        Self {
            at: NaiveTime::from_hms_opt(7, 0, 0).unwrap_or(NaiveTime::MIN),
        }
    }
}

impl std::fmt::Display for DailySchedule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.at.format("%H:%M"))
    }
}

/// Runs the scheduled trigger forever
///
/// Each fire runs [`TriggerCoordinator::run_scheduled`] to completion before
/// the next fire time is computed.
pub async fn run_schedule(coordinator: Arc<TriggerCoordinator>, schedule: DailySchedule) {
    loop {
        let now = Local::now();
        let wait = schedule.until_next(now);
        tracing::info!(
            next = %schedule.next_after(now).format("%Y-%m-%d %H:%M:%S %Z"),
            "Waiting for scheduled health check"
        );
        tokio::time::sleep(wait).await;

        match coordinator.run_scheduled().await {
            Ok(outcome) => tracing::info!(
                run_id = %outcome.batch.run_id(),
                online = outcome.batch.online_count(),
                offline = outcome.batch.offline_count(),
                "Scheduled health check finished"
            ),
            Err(e) => tracing::error!(error = %e, "Scheduled health check failed"),
        }
    }
}
