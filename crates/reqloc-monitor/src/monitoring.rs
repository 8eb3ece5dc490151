//! Ingest and query operations over the service log.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use reqloc_core::error::{Result, ReqlocError};
use reqloc_core::{CountRecord, LocationCount};

use crate::aggregate::{Grouper, Window};
use crate::log::ServiceLog;

pub struct MonitoringService {
    log: Arc<ServiceLog>,
    default_window_secs: u64,
}

impl MonitoringService {
    pub fn new(log: Arc<ServiceLog>, default_window_secs: u64) -> Self {
        Self {
            log,
            default_window_secs,
        }
    }

    pub fn log(&self) -> &Arc<ServiceLog> {
        &self.log
    }

    pub fn default_window_secs(&self) -> u64 {
        self.default_window_secs
    }

    /// Stamp with the receive time and append. Any timestamp the client
    /// supplied has already been discarded by the `LocationCount` shape.
    pub fn add_monitoring(&self, count: LocationCount) -> Result<CountRecord> {
        count.validate()?;
        Ok(self.append(count))
    }

    /// All-or-nothing: every count is validated before any is appended, so a
    /// rejected batch leaves the log untouched.
    pub fn add_batch(&self, counts: Vec<LocationCount>) -> Result<Vec<CountRecord>> {
        for c in &counts {
            c.validate()?;
        }
        Ok(counts.into_iter().map(|c| self.append(c)).collect())
    }

    fn append(&self, count: LocationCount) -> CountRecord {
        let record = count.stamp(Utc::now());
        let service = record.service.clone();
        let n = record.count;
        if self.log.append(record.clone()) {
            tracing::info!(%service, count = n, "added location request to new service");
        } else {
            tracing::debug!(%service, count = n, "added location request");
        }
        record
    }

    pub fn list_all(&self) -> Vec<CountRecord> {
        self.log.snapshot()
    }

    /// Aggregate over `[now - interval, now]`, where the interval comes from
    /// `interval_override` when it parses and from the configured default
    /// otherwise. A negative override is rejected.
    pub fn list_aggregated(&self, interval_override: Option<&str>) -> Result<Vec<LocationCount>> {
        let interval = resolve_interval(interval_override, self.default_window_secs)?;
        Ok(self.list_aggregated_at(Utc::now(), interval))
    }

    pub fn list_aggregated_at(&self, now: DateTime<Utc>, interval_secs: u64) -> Vec<LocationCount> {
        let mut groups = Grouper::new(Window::ending_at(now, interval_secs));
        self.log.scan(|r| groups.add(r));
        groups.finish()
    }
}

/// Interval selection for aggregation queries.
///
/// - absent, empty or non-integer: `default_secs`
/// - negative integer: `BadRequest`
/// - otherwise the parsed value
pub fn resolve_interval(raw: Option<&str>, default_secs: u64) -> Result<u64> {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(default_secs);
    };
    match raw.parse::<i128>() {
        Ok(n) if n < 0 => Err(ReqlocError::BadRequest(format!(
            "interval must not be negative: {raw}"
        ))),
        Ok(n) => Ok(u64::try_from(n).unwrap_or(u64::MAX)),
        Err(_) => {
            tracing::debug!(interval = %raw, default_secs, "unparsable interval, using default");
            Ok(default_secs)
        }
    }
}
