use serde::Deserialize;
use reqloc_core::error::{Result, ReqlocError};

const MAX_WINDOW_SECS: u64 = 86_400;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MonitorConfig {
    pub version: u32,

    #[serde(default)]
    pub monitor: MonitorSection,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            version: 1,
            monitor: MonitorSection::default(),
        }
    }
}

impl MonitorConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(ReqlocError::BadRequest(format!(
                "unsupported config version: {}",
                self.version
            )));
        }
        self.monitor.validate()
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MonitorSection {
    #[serde(default = "default_listen")]
    pub listen: String,

    /// Aggregation window used when a query carries no usable `interval`.
    #[serde(default = "default_window_secs")]
    pub default_window_secs: u64,

    /// Records older than this are pruned. 0 keeps everything.
    #[serde(default = "default_retention_secs")]
    pub retention_secs: u64,

    #[serde(default = "default_prune_interval_ms")]
    pub prune_interval_ms: u64,
}

impl Default for MonitorSection {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            default_window_secs: default_window_secs(),
            retention_secs: default_retention_secs(),
            prune_interval_ms: default_prune_interval_ms(),
        }
    }
}

impl MonitorSection {
    pub fn validate(&self) -> Result<()> {
        if self.default_window_secs > MAX_WINDOW_SECS {
            return Err(ReqlocError::BadRequest(format!(
                "monitor.default_window_secs must be at most {MAX_WINDOW_SECS}"
            )));
        }
        if self.retention_secs != 0 && self.retention_secs < self.default_window_secs {
            return Err(ReqlocError::BadRequest(
                "monitor.retention_secs must be 0 or at least default_window_secs".into(),
            ));
        }
        if !(1000..=3_600_000).contains(&self.prune_interval_ms) {
            return Err(ReqlocError::BadRequest(
                "monitor.prune_interval_ms must be between 1000 and 3600000".into(),
            ));
        }
        Ok(())
    }
}

fn default_listen() -> String {
    "0.0.0.0:1919".into()
}
fn default_window_secs() -> u64 {
    60
}
fn default_retention_secs() -> u64 {
    3600
}
fn default_prune_interval_ms() -> u64 {
    30_000
}
