//! Shared state for the agent process.

use std::sync::Arc;
use std::time::Duration;

use reqloc_core::CounterStore;

use crate::accumulator::Accumulator;
use crate::config::AgentConfig;
use crate::flusher::Flusher;
use crate::registry::{InstanceInfo, NoopRegistry, Registration, RegistryClient};
use crate::transport::PushTransport;

#[derive(Clone)]
pub struct AgentState {
    inner: Arc<AgentStateInner>,
    accumulator: Arc<Accumulator>,
    registration: Arc<Registration>,
}

struct AgentStateInner {
    cfg: AgentConfig,
}

impl AgentState {
    /// State without a service registry behind it.
    pub fn new(cfg: AgentConfig) -> Self {
        Self::with_registry(cfg, Arc::new(NoopRegistry))
    }

    pub fn with_registry(cfg: AgentConfig, registry: Arc<dyn RegistryClient>) -> Self {
        let store = Arc::new(CounterStore::new());
        let accumulator = Accumulator::new(store, cfg.agent.latitude, cfg.agent.longitude);
        let registration = Registration::new(registry, InstanceInfo::from_config(&cfg.agent), &cfg.registry);
        Self {
            inner: Arc::new(AgentStateInner { cfg }),
            accumulator: Arc::new(accumulator),
            registration: Arc::new(registration),
        }
    }

    pub fn cfg(&self) -> &AgentConfig {
        &self.inner.cfg
    }

    pub fn accumulator(&self) -> Arc<Accumulator> {
        Arc::clone(&self.accumulator)
    }

    pub fn registration(&self) -> &Arc<Registration> {
        &self.registration
    }

    pub fn store(&self) -> Arc<CounterStore> {
        Arc::clone(self.accumulator.store())
    }

    /// Flusher over this state's store with the configured period.
    pub fn flusher(&self, transport: Arc<dyn PushTransport>) -> Flusher {
        Flusher::new(
            self.store(),
            transport,
            Duration::from_millis(self.cfg().agent.flush_interval_ms),
        )
    }
}
