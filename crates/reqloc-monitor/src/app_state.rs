//! Shared application state for the monitor.
//!
//! Built once in `main` and handed to every handler through axum `State`.

use std::sync::Arc;
use std::time::Duration;

use crate::config::MonitorConfig;
use crate::log::ServiceLog;
use crate::monitoring::MonitoringService;
use crate::retention::{self, PrunerHandle};

#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
    monitoring: Arc<MonitoringService>,
}

struct AppStateInner {
    cfg: MonitorConfig,
}

impl AppState {
    pub fn new(cfg: MonitorConfig) -> Self {
        let log = Arc::new(ServiceLog::new());
        let monitoring = MonitoringService::new(log, cfg.monitor.default_window_secs);
        Self {
            inner: Arc::new(AppStateInner { cfg }),
            monitoring: Arc::new(monitoring),
        }
    }

    pub fn cfg(&self) -> &MonitorConfig {
        &self.inner.cfg
    }

    pub fn monitoring(&self) -> Arc<MonitoringService> {
        Arc::clone(&self.monitoring)
    }

    /// Start the retention sweep configured for this state, if enabled.
    pub fn spawn_pruner(&self) -> Option<PrunerHandle> {
        let m = &self.cfg().monitor;
        retention::spawn_pruner(
            Arc::clone(self.monitoring.log()),
            m.retention_secs,
            Duration::from_millis(m.prune_interval_ms),
        )
    }
}
