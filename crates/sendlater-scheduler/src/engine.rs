use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::watch;
use tracing::{error, info, warn};

use crate::db::JobStore;
use crate::error::Result;
use crate::mailer::Mailer;

/// Core scheduler: polls the store on a fixed cadence and delivers every
/// pending job whose scheduled time has arrived.
///
/// There is no catch-up pass on startup — jobs that came due while the
/// process was down are simply picked up by the first tick, at most one
/// interval (plus the downtime) late.
pub struct SchedulerEngine {
    store: JobStore,
    mailer: Arc<dyn Mailer>,
    tick_interval: Duration,
}

impl SchedulerEngine {
    pub fn new(store: JobStore, mailer: Arc<dyn Mailer>, tick_interval: Duration) -> Self {
        Self {
            store,
            mailer,
            tick_interval,
        }
    }

    /// Main event loop. Polls until `shutdown` broadcasts `true`.
    ///
    /// A tick that fails (e.g. the store is momentarily unreadable) is
    /// logged and abandoned; the next tick retries from scratch. One bad
    /// tick never stops future ticks.
    pub async fn run(self, mut shutdown: watch::Receiver<bool>) {
        info!(
            tick_secs = self.tick_interval.as_secs(),
            mailer = self.mailer.name(),
            "scheduler engine started"
        );

        let mut interval = tokio::time::interval(self.tick_interval);
        loop {
            tokio::select! {
                _ = interval.tick() => {
                    match self.tick().await {
                        Ok(n) if n > 0 => info!(count = n, "tick delivered due emails"),
                        Ok(_) => {}
                        Err(e) => error!("scheduler tick error: {e}"),
                    }
                }
                _ = shutdown.changed() => {
                    if *shutdown.borrow() {
                        info!("scheduler engine shutting down");
                        break;
                    }
                }
            }
        }
    }

    /// One due-check-and-deliver pass. Returns the number of jobs delivered.
    ///
    /// `now` is captured once at the top so every due comparison in this
    /// tick uses the same instant.
    pub async fn tick(&self) -> Result<usize> {
        let now = Utc::now();
        let due = self.store.due(now)?;
        if due.is_empty() {
            return Ok(0);
        }

        let mut delivered = 0;
        for job in due {
            if let Err(e) = self.mailer.send(&job).await {
                // Extension point for real transports: the job stays
                // pending and the next tick retries it.
                warn!(job_id = %job.id, error = %e, "delivery failed; will retry next tick");
                continue;
            }
            if self.store.mark_sent(&job.id, now)? {
                delivered += 1;
            }
        }
        Ok(delivered)
    }
}
