use serde::Deserialize;
use reqloc_core::error::{Result, ReqlocError};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AgentConfig {
    pub version: u32,

    #[serde(default)]
    pub agent: AgentSection,

    #[serde(default)]
    pub registry: RegistrySection,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            version: 1,
            agent: AgentSection::default(),
            registry: RegistrySection::default(),
        }
    }
}

impl AgentConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(ReqlocError::BadRequest(format!(
                "unsupported config version: {}",
                self.version
            )));
        }
        self.agent.validate()?;
        self.registry.validate()?;
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AgentSection {
    #[serde(default = "default_listen")]
    pub listen: String,

    /// Name of the service this agent sits next to.
    #[serde(default = "default_service")]
    pub service: String,

    #[serde(default = "default_hostname")]
    pub hostname: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Coordinates stamped on `register_request` counts.
    #[serde(default)]
    pub latitude: f64,
    #[serde(default)]
    pub longitude: f64,

    #[serde(default = "default_monitor_url")]
    pub monitor_url: String,

    #[serde(default = "default_flush_interval_ms")]
    pub flush_interval_ms: u64,

    #[serde(default = "default_push_timeout_ms")]
    pub push_timeout_ms: u64,
}

impl Default for AgentSection {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            service: default_service(),
            hostname: default_hostname(),
            port: default_port(),
            latitude: 0.0,
            longitude: 0.0,
            monitor_url: default_monitor_url(),
            flush_interval_ms: default_flush_interval_ms(),
            push_timeout_ms: default_push_timeout_ms(),
        }
    }
}

impl AgentSection {
    pub fn validate(&self) -> Result<()> {
        if self.service.trim().is_empty() {
            return Err(ReqlocError::BadRequest("agent.service must not be empty".into()));
        }
        if !(-90.0..=90.0).contains(&self.latitude) {
            return Err(ReqlocError::BadRequest(
                "agent.latitude must be between -90 and 90".into(),
            ));
        }
        if !(-180.0..=180.0).contains(&self.longitude) {
            return Err(ReqlocError::BadRequest(
                "agent.longitude must be between -180 and 180".into(),
            ));
        }
        if !(self.monitor_url.starts_with("http://") || self.monitor_url.starts_with("https://")) {
            return Err(ReqlocError::BadRequest(
                "agent.monitor_url must be an http(s) URL".into(),
            ));
        }
        if !(100..=600_000).contains(&self.flush_interval_ms) {
            return Err(ReqlocError::BadRequest(
                "agent.flush_interval_ms must be between 100 and 600000".into(),
            ));
        }
        if !(100..=60_000).contains(&self.push_timeout_ms) {
            return Err(ReqlocError::BadRequest(
                "agent.push_timeout_ms must be between 100 and 60000".into(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegistrySection {
    /// Register on startup. When false the instance stays unregistered until
    /// `POST /api/register` is called on the local API.
    #[serde(default = "default_auto_register")]
    pub auto_register: bool,

    #[serde(default = "default_heartbeat_interval_ms")]
    pub heartbeat_interval_ms: u64,

    /// Consecutive failed heartbeats tolerated before deregistering.
    #[serde(default = "default_max_heartbeat_retries")]
    pub max_heartbeat_retries: u32,
}

impl Default for RegistrySection {
    fn default() -> Self {
        Self {
            auto_register: default_auto_register(),
            heartbeat_interval_ms: default_heartbeat_interval_ms(),
            max_heartbeat_retries: default_max_heartbeat_retries(),
        }
    }
}

impl RegistrySection {
    pub fn validate(&self) -> Result<()> {
        if !(1000..=600_000).contains(&self.heartbeat_interval_ms) {
            return Err(ReqlocError::BadRequest(
                "registry.heartbeat_interval_ms must be between 1000 and 600000".into(),
            ));
        }
        Ok(())
    }
}

fn default_listen() -> String {
    "0.0.0.0:1906".into()
}
fn default_service() -> String {
    "service".into()
}
fn default_hostname() -> String {
    "localhost".into()
}
fn default_port() -> u16 {
    80
}
fn default_monitor_url() -> String {
    "http://localhost:1919/api/monitoring".into()
}
fn default_flush_interval_ms() -> u64 {
    5000
}
fn default_push_timeout_ms() -> u64 {
    5000
}
fn default_auto_register() -> bool {
    true
}
fn default_heartbeat_interval_ms() -> u64 {
    30_000
}
fn default_max_heartbeat_retries() -> u32 {
    5
}
