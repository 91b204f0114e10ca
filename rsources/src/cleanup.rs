//! Periodic purge of job runs past their retention window.

use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

use crate::memory::MemoryJobService;

/// Returns the instant before which runs are expired, or `None` if the
/// window reaches past the representable range.
#[must_use]
pub fn retention_cutoff(now: DateTime<Utc>, retention: Duration) -> Option<DateTime<Utc>> {
    let window = chrono::Duration::from_std(retention).ok()?;
    now.checked_sub_signed(window)
}

/// Purges expired runs every `interval` until `shutdown` turns `true` or
/// its sender is dropped.
pub async fn run_cleanup_loop(
    store: Arc<MemoryJobService>,
    retention: Duration,
    interval: Duration,
    mut shutdown: watch::Receiver<bool>,
) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    debug!(?retention, ?interval, "Retention sweep started");

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let Some(cutoff) = retention_cutoff(Utc::now(), retention) else {
                    continue;
                };
                let purged = store.purge_older_than(cutoff);
                if purged > 0 {
                    info!(purged, %cutoff, "Purged expired job runs");
                }
            }
            changed = shutdown.changed() => {
                if changed.is_err() || *shutdown.borrow() {
                    break;
                }
            }
        }
    }
    debug!("Retention sweep stopped");
}
