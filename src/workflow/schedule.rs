//! Periodic invocation — drives the orchestrator from a cron schedule.
//!
//! Reminder evaluation is once-per-run, so the workflow must be invoked
//! periodically for reminders to fire inside their window. A run cadence
//! wider than the window can miss meetings; that tradeoff is the
//! orchestrator's, not this module's.

use std::str::FromStr;

use chrono::Utc;
use cron::Schedule;
use tracing::{error, info, warn};

use crate::error::ConfigError;
use crate::workflow::orchestrator::Orchestrator;

/// Parse a cron expression (seconds field included, per the `cron` crate).
pub fn parse_schedule(expr: &str) -> Result<Schedule, ConfigError> {
    Schedule::from_str(expr).map_err(|e| ConfigError::InvalidValue {
        key: "DAYBRIEF_SCHEDULE".to_string(),
        message: format!("invalid cron expression '{expr}': {e}"),
    })
}

/// Run the daily workflow at every schedule fire. Returns only when the
/// schedule has no upcoming fire times.
pub async fn run_on_schedule(orchestrator: &mut Orchestrator, schedule: &Schedule) {
    loop {
        let Some(next) = schedule.upcoming(Utc).next() else {
            warn!("schedule has no upcoming fire times, stopping");
            return;
        };

        let wait = (next - Utc::now()).to_std().unwrap_or_default();
        info!(next_run = %next, "waiting for next scheduled run");
        tokio::time::sleep(wait).await;

        if let Err(e) = orchestrator.run_daily_workflow().await {
            // State-machine rejection; the schedule keeps ticking.
            error!(error = %e, "scheduled run rejected");
        }
    }
}
