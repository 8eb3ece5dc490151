//! Windowed, location-grouped aggregation.

use std::collections::HashMap;

use chrono::{DateTime, TimeDelta, Utc};

use reqloc_core::{CountRecord, LocationCount, LocationKey};

/// Closed time range `[start, end]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl Window {
    /// `[end - interval_secs, end]`, saturating at the earliest representable
    /// instant for absurdly large intervals.
    pub fn ending_at(end: DateTime<Utc>, interval_secs: u64) -> Self {
        let start = i64::try_from(interval_secs)
            .ok()
            .and_then(TimeDelta::try_seconds)
            .and_then(|d| end.checked_sub_signed(d))
            .unwrap_or(DateTime::<Utc>::MIN_UTC);
        Self { start, end }
    }

    /// Boundary-inclusive on both ends.
    pub fn contains(&self, ts: DateTime<Utc>) -> bool {
        ts >= self.start && ts <= self.end
    }
}

/// Sums counts per `(service, location)` over the records inside `window`.
/// One row per group; row order is unspecified.
pub fn aggregate<'a, I>(records: I, window: &Window) -> Vec<LocationCount>
where
    I: IntoIterator<Item = &'a CountRecord>,
{
    let mut groups = Grouper::new(*window);
    for r in records {
        groups.add(r);
    }
    groups.finish()
}

/// Incremental form of [`aggregate`], for callers that visit records through
/// a callback rather than an iterator.
#[derive(Debug)]
pub struct Grouper {
    window: Window,
    sums: HashMap<LocationKey, u64>,
}

impl Grouper {
    pub fn new(window: Window) -> Self {
        Self {
            window,
            sums: HashMap::new(),
        }
    }

    pub fn add(&mut self, r: &CountRecord) {
        if !self.window.contains(r.timestamp) {
            return;
        }
        let sum = self.sums.entry(r.key()).or_insert(0);
        *sum = sum.saturating_add(r.count);
    }

    pub fn finish(self) -> Vec<LocationCount> {
        self.sums
            .into_iter()
            .map(|(key, count)| LocationCount {
                service: key.service,
                location: key.location,
                count,
            })
            .collect()
    }
}
