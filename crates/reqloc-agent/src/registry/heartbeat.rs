//! Registry heartbeat with bounded retries.
//!
//! A failed heartbeat marks the instance `Down` and counts a retry. Once
//! `max_retries` consecutive failures have been counted the next failure
//! deregisters the instance and the task ends. Any successful heartbeat resets
//! the count.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

use super::{InstanceInfo, InstanceStatus, RegistryClient};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeartbeatOutcome {
    Healthy,
    /// Failed; carries the retry number just used.
    Retrying(u32),
    /// Retries exhausted; the instance was deregistered.
    Expired,
}

pub async fn beat_once(
    registry: &dyn RegistryClient,
    instance: &InstanceInfo,
    retries: &mut u32,
    max_retries: u32,
) -> HeartbeatOutcome {
    let err = match registry.heartbeat(instance).await {
        Ok(()) => {
            *retries = 0;
            tracing::debug!(instance = %instance.instance_id, "heartbeat sent");
            return HeartbeatOutcome::Healthy;
        }
        Err(e) => e,
    };
    tracing::warn!(instance = %instance.instance_id, error = %err, "heartbeat failed");

    if *retries < max_retries {
        *retries += 1;
        tracing::warn!(instance = %instance.instance_id, retry = *retries, "heartbeat not sent, retrying");
        if let Err(e) = registry.update_status(instance, InstanceStatus::Down).await {
            tracing::warn!(instance = %instance.instance_id, error = %e, "update instance status failed");
        }
        return HeartbeatOutcome::Retrying(*retries);
    }

    tracing::info!(instance = %instance.instance_id, "max heartbeat retries, deregistering instance");
    if let Err(e) = registry.deregister(instance).await {
        tracing::warn!(instance = %instance.instance_id, error = %e, "deregister instance failed");
    }
    HeartbeatOutcome::Expired
}

pub struct HeartbeatHandle {
    stop_tx: watch::Sender<bool>,
    join: JoinHandle<()>,
}

impl HeartbeatHandle {
    pub async fn stop(self) {
        let _ = self.stop_tx.send(true);
        let _ = self.join.await;
    }

    /// True once the task has ended, by stop or by expiry.
    pub fn is_finished(&self) -> bool {
        self.join.is_finished()
    }
}

pub fn spawn_heartbeat(
    registry: Arc<dyn RegistryClient>,
    instance: InstanceInfo,
    every: Duration,
    max_retries: u32,
) -> HeartbeatHandle {
    let (stop_tx, mut stop_rx) = watch::channel(false);

    let join = tokio::spawn(async move {
        let mut tick = interval_at(Instant::now() + every, every);
        tick.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut retries = 0;
        loop {
            tokio::select! {
                _ = tick.tick() => {
                    let outcome = beat_once(registry.as_ref(), &instance, &mut retries, max_retries).await;
                    if outcome == HeartbeatOutcome::Expired {
                        break;
                    }
                }
                changed = stop_rx.changed() => {
                    if changed.is_err() || *stop_rx.borrow() {
                        break;
                    }
                }
            }
        }
    });

    HeartbeatHandle { stop_tx, join }
}
