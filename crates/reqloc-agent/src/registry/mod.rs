//! Service-registry boundary.
//!
//! The registry wire protocol lives outside this workspace; the agent only
//! needs an opaque client whose operations may fail. Failures are logged and
//! never stop the counting pipeline.

mod heartbeat;
mod lifecycle;

use async_trait::async_trait;
use serde::Serialize;

use reqloc_core::error::Result;

use crate::config::AgentSection;

pub use heartbeat::{beat_once, spawn_heartbeat, HeartbeatHandle, HeartbeatOutcome};
pub use lifecycle::Registration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum InstanceStatus {
    Up,
    Down,
}

/// What the registry knows about this instance.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InstanceInfo {
    pub instance_id: String,
    pub service: String,
    pub hostname: String,
    pub port: u16,
    pub latitude: f64,
    pub longitude: f64,
}

impl InstanceInfo {
    pub fn from_config(agent: &AgentSection) -> Self {
        Self {
            instance_id: format!("{}_{}_{}", agent.service, agent.hostname, agent.port),
            service: agent.service.clone(),
            hostname: agent.hostname.clone(),
            port: agent.port,
            latitude: agent.latitude,
            longitude: agent.longitude,
        }
    }
}

#[async_trait]
pub trait RegistryClient: Send + Sync {
    async fn register(&self, instance: &InstanceInfo) -> Result<()>;
    async fn heartbeat(&self, instance: &InstanceInfo) -> Result<()>;
    async fn update_status(&self, instance: &InstanceInfo, status: InstanceStatus) -> Result<()>;
    async fn deregister(&self, instance: &InstanceInfo) -> Result<()>;
}

/// Registry stand-in for deployments without one. Accepts everything.
#[derive(Debug, Default)]
pub struct NoopRegistry;

#[async_trait]
impl RegistryClient for NoopRegistry {
    async fn register(&self, instance: &InstanceInfo) -> Result<()> {
        tracing::debug!(instance = %instance.instance_id, "noop registry: register");
        Ok(())
    }

    async fn heartbeat(&self, instance: &InstanceInfo) -> Result<()> {
        tracing::trace!(instance = %instance.instance_id, "noop registry: heartbeat");
        Ok(())
    }

    async fn update_status(&self, instance: &InstanceInfo, status: InstanceStatus) -> Result<()> {
        tracing::debug!(instance = %instance.instance_id, ?status, "noop registry: status");
        Ok(())
    }

    async fn deregister(&self, instance: &InstanceInfo) -> Result<()> {
        tracing::debug!(instance = %instance.instance_id, "noop registry: deregister");
        Ok(())
    }
}

/// Register the instance, logging the outcome.
pub async fn register_instance(registry: &dyn RegistryClient, instance: &InstanceInfo) -> Result<()> {
    match registry.register(instance).await {
        Ok(()) => {
            tracing::info!(instance = %instance.instance_id, "instance registered");
            Ok(())
        }
        Err(e) => {
            tracing::warn!(instance = %instance.instance_id, error = %e, "instance registration failed");
            Err(e)
        }
    }
}

/// Mark the instance down, then remove it. Both steps are attempted; errors
/// are logged only.
pub async fn deregister_instance(registry: &dyn RegistryClient, instance: &InstanceInfo) {
    if let Err(e) = registry.update_status(instance, InstanceStatus::Down).await {
        tracing::warn!(instance = %instance.instance_id, error = %e, "update instance status failed");
    }
    match registry.deregister(instance).await {
        Ok(()) => tracing::info!(instance = %instance.instance_id, "instance deregistered"),
        Err(e) => tracing::warn!(instance = %instance.instance_id, error = %e, "deregister instance failed"),
    }
}
