//! Monitor config loader (strict parsing).

pub mod schema;

use std::fs;
use std::io::ErrorKind;

use reqloc_core::error::{Result, ReqlocError};

pub use schema::{MonitorConfig, MonitorSection};

pub const DEFAULT_PATH: &str = "reqloc-monitor.yaml";

pub fn load_from_file(path: &str) -> Result<MonitorConfig> {
    let s = fs::read_to_string(path)
        .map_err(|e| ReqlocError::Internal(format!("read config failed: {e}")))?;
    load_from_str(&s)
}

/// Like `load_from_file`, but a missing file yields the defaults.
pub fn load_or_default(path: &str) -> Result<MonitorConfig> {
    match fs::read_to_string(path) {
        Ok(s) => load_from_str(&s),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            tracing::info!(%path, "config file not found, using defaults");
            Ok(MonitorConfig::default())
        }
        Err(e) => Err(ReqlocError::Internal(format!("read config failed: {e}"))),
    }
}

pub fn load_from_str(s: &str) -> Result<MonitorConfig> {
    let cfg: MonitorConfig = serde_yaml::from_str(s)
        .map_err(|e| ReqlocError::BadRequest(format!("invalid yaml: {e}")))?;
    cfg.validate()?;
    Ok(cfg)
}
