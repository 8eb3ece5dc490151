//! Retention sweep for the service log.
//!
//! Without it the log grows for the life of the process. The sweep drops
//! records older than the retention horizon on a fixed period and stops when
//! its handle is told to.

use std::sync::Arc;
use std::time::Duration;

use chrono::{TimeDelta, Utc};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

use crate::log::ServiceLog;

pub struct PrunerHandle {
    stop_tx: watch::Sender<bool>,
    join: JoinHandle<()>,
}

impl PrunerHandle {
    /// Suppress further sweeps and wait for the task to exit.
    pub async fn stop(self) {
        let _ = self.stop_tx.send(true);
        let _ = self.join.await;
    }
}

/// Run one sweep now. Returns how many records were dropped.
pub fn prune_once(log: &ServiceLog, retention_secs: u64) -> usize {
    let Some(cutoff) = i64::try_from(retention_secs)
        .ok()
        .and_then(TimeDelta::try_seconds)
        .and_then(|d| Utc::now().checked_sub_signed(d))
    else {
        return 0;
    };
    let dropped = log.prune_before(cutoff);
    if dropped > 0 {
        tracing::debug!(dropped, retention_secs, "pruned expired location requests");
    }
    dropped
}

/// Spawn the sweep. `retention_secs == 0` disables it and returns `None`.
pub fn spawn_pruner(log: Arc<ServiceLog>, retention_secs: u64, every: Duration) -> Option<PrunerHandle> {
    if retention_secs == 0 {
        return None;
    }
    let (stop_tx, mut stop_rx) = watch::channel(false);

    let join = tokio::spawn(async move {
        let mut tick = interval_at(Instant::now() + every, every);
        tick.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            tokio::select! {
                _ = tick.tick() => {
                    prune_once(&log, retention_secs);
                }
                changed = stop_rx.changed() => {
                    if changed.is_err() || *stop_rx.borrow() {
                        break;
                    }
                }
            }
        }
        tracing::debug!("retention sweep stopped");
    });

    Some(PrunerHandle { stop_tx, join })
}
