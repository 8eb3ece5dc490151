//! Periodic flush of accumulated counts to the monitor.
//!
//! Each tick walks the store's keys and, per key, snapshots-and-clears the
//! live record in one critical section (`CounterStore::take`), then spawns an
//! independent push of that snapshot. The clear never waits on or depends on
//! the push: a failed push is logged and its counts are gone. Increments that
//! land while a push is in flight start a fresh record and go out next tick.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

use reqloc_core::CounterStore;

use crate::transport::PushTransport;

/// What one tick dispatched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FlushSummary {
    pub records: usize,
    pub total_count: u64,
}

/// Drain every non-empty entry and dispatch its push. Must run inside a tokio
/// runtime; pushes are spawned and not awaited.
pub fn flush_once(store: &CounterStore, transport: &Arc<dyn PushTransport>) -> FlushSummary {
    let mut summary = FlushSummary::default();
    for key in store.keys() {
        let Some(record) = store.take(&key) else { continue };
        summary.records += 1;
        summary.total_count = summary.total_count.saturating_add(record.count);

        let transport = Arc::clone(transport);
        tokio::spawn(async move {
            match transport.push(&record).await {
                Ok(()) => {
                    tracing::debug!(service = %record.service, count = record.count, "sent location data");
                }
                Err(e) => {
                    tracing::warn!(
                        service = %record.service,
                        count = record.count,
                        error = %e,
                        "location data push failed, counts dropped"
                    );
                }
            }
        });
    }
    summary
}

pub struct Flusher {
    store: Arc<CounterStore>,
    transport: Arc<dyn PushTransport>,
    every: Duration,
}

impl Flusher {
    pub fn new(store: Arc<CounterStore>, transport: Arc<dyn PushTransport>, every: Duration) -> Self {
        Self {
            store,
            transport,
            every,
        }
    }

    /// Start ticking. The first tick fires one period after start.
    pub fn spawn(self) -> FlusherHandle {
        let (stop_tx, mut stop_rx) = watch::channel(false);

        let join = tokio::spawn(async move {
            let mut tick = interval_at(Instant::now() + self.every, self.every);
            tick.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    _ = tick.tick() => {
                        let started = Utc::now();
                        let summary = flush_once(&self.store, &self.transport);
                        if summary.records > 0 {
                            tracing::info!(
                                records = summary.records,
                                total = summary.total_count,
                                %started,
                                "dispatched location data"
                            );
                        }
                    }
                    changed = stop_rx.changed() => {
                        if changed.is_err() || *stop_rx.borrow() {
                            break;
                        }
                    }
                }
            }
            tracing::debug!("flusher stopped");
        });

        FlusherHandle { stop_tx, join }
    }
}

/// Lifecycle handle for a running flusher.
pub struct FlusherHandle {
    stop_tx: watch::Sender<bool>,
    join: JoinHandle<()>,
}

impl FlusherHandle {
    /// Suppress further ticks and wait for the tick loop to exit. Pushes
    /// already in flight are left to finish on their own.
    pub async fn stop(self) {
        let _ = self.stop_tx.send(true);
        let _ = self.join.await;
    }

    pub fn is_finished(&self) -> bool {
        self.join.is_finished()
    }
}
