//! Per-service record log.
//!
//! `service -> Vec<CountRecord>`, append-only apart from the retention sweep.
//! An append holds only its shard's write lock; scans hold shard read locks
//! for the duration of the scan and never mutate.

use chrono::{DateTime, Utc};
use dashmap::DashMap;

use reqloc_core::CountRecord;

#[derive(Debug, Default)]
pub struct ServiceLog {
    services: DashMap<String, Vec<CountRecord>>,
}

impl ServiceLog {
    pub fn new() -> Self {
        Self {
            services: DashMap::new(),
        }
    }

    /// Returns true when this was the first record for the service.
    pub fn append(&self, record: CountRecord) -> bool {
        let mut fresh = false;
        self.services
            .entry(record.service.clone())
            .or_insert_with(|| {
                fresh = true;
                Vec::new()
            })
            .push(record);
        fresh
    }

    /// Visit every stored record, service by service.
    pub fn scan<F>(&self, mut f: F)
    where
        F: FnMut(&CountRecord),
    {
        for entry in self.services.iter() {
            for r in entry.value() {
                f(r);
            }
        }
    }

    /// Every record of every service, flattened. Order unspecified.
    pub fn snapshot(&self) -> Vec<CountRecord> {
        let mut out = Vec::with_capacity(self.len());
        self.scan(|r| out.push(r.clone()));
        out
    }

    pub fn service_records(&self, service: &str) -> Vec<CountRecord> {
        self.services
            .get(service)
            .map(|v| v.value().clone())
            .unwrap_or_default()
    }

    pub fn services(&self) -> Vec<String> {
        self.services.iter().map(|e| e.key().clone()).collect()
    }

    /// Total number of stored records.
    pub fn len(&self) -> usize {
        self.services.iter().map(|e| e.value().len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop records stamped strictly before `cutoff`. Service entries stay,
    /// possibly empty. Returns how many records were dropped.
    pub fn prune_before(&self, cutoff: DateTime<Utc>) -> usize {
        let mut dropped = 0;
        for mut entry in self.services.iter_mut() {
            let records = entry.value_mut();
            let before = records.len();
            records.retain(|r| r.timestamp >= cutoff);
            dropped += before - records.len();
        }
        dropped
    }
}
