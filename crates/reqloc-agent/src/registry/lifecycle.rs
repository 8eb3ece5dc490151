//! Registration state of this instance.
//!
//! At most one heartbeat task runs per instance. Registering while a heartbeat
//! is alive is a no-op; once the heartbeat has expired (retries exhausted, the
//! registry already deregistered us) the instance may register again.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;

use reqloc_core::error::{Result, ReqlocError};

use super::{deregister_instance, register_instance, spawn_heartbeat, HeartbeatHandle, InstanceInfo, RegistryClient};
use crate::config::RegistrySection;

pub struct Registration {
    client: Arc<dyn RegistryClient>,
    instance: InstanceInfo,
    heartbeat_every: Duration,
    max_retries: u32,
    heartbeat: Mutex<Option<HeartbeatHandle>>,
}

impl Registration {
    pub fn new(client: Arc<dyn RegistryClient>, instance: InstanceInfo, cfg: &RegistrySection) -> Self {
        Self {
            client,
            instance,
            heartbeat_every: Duration::from_millis(cfg.heartbeat_interval_ms),
            max_retries: cfg.max_heartbeat_retries,
            heartbeat: Mutex::new(None),
        }
    }

    pub fn instance(&self) -> &InstanceInfo {
        &self.instance
    }

    pub async fn is_registered(&self) -> bool {
        alive(&*self.heartbeat.lock().await)
    }

    /// Register and start the heartbeat. Returns `false` when the instance was
    /// already registered. Concurrent callers are serialized, so only one of
    /// them ever reaches the registry.
    pub async fn register(&self) -> Result<bool> {
        let mut slot = self.heartbeat.lock().await;
        if alive(&slot) {
            tracing::debug!(instance = %self.instance.instance_id, "instance already registered");
            return Ok(false);
        }
        register_instance(self.client.as_ref(), &self.instance).await?;
        *slot = Some(spawn_heartbeat(
            Arc::clone(&self.client),
            self.instance.clone(),
            self.heartbeat_every,
            self.max_retries,
        ));
        Ok(true)
    }

    /// Stop the heartbeat, mark the instance down and deregister it.
    /// `NotFound` when the instance is not currently registered.
    pub async fn deregister(&self) -> Result<()> {
        let handle = self.heartbeat.lock().await.take();
        match handle {
            Some(h) if !h.is_finished() => {
                h.stop().await;
                deregister_instance(self.client.as_ref(), &self.instance).await;
                Ok(())
            }
            _ => Err(ReqlocError::NotFound(format!(
                "instance {} is not registered",
                self.instance.instance_id
            ))),
        }
    }
}

fn alive(slot: &Option<HeartbeatHandle>) -> bool {
    slot.as_ref().is_some_and(|h| !h.is_finished())
}
