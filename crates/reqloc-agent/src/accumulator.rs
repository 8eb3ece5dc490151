//! Request accumulation into the local counter store.
//!
//! Every call is a read-increment-write of one key. The store runs that
//! sequence under the key's shard lock, so concurrent calls on the same key
//! never lose an increment, and calls on unrelated keys only contend when they
//! hash to the same shard.

use std::sync::Arc;

use chrono::Utc;

use reqloc_core::error::{Result, ReqlocError};
use reqloc_core::{CountRecord, CounterStore, Location};

/// Joins the parts of a located request's store key. Service names carrying it
/// are refused by [`validate_service`], so a located key can never equal a
/// bare service key.
pub const KEY_SEPARATOR: char = '\u{1f}';

pub struct Accumulator {
    store: Arc<CounterStore>,
    origin: Location,
}

impl Accumulator {
    /// `latitude`/`longitude` are this instance's own coordinates, stamped on
    /// counts recorded through [`Accumulator::register_request`].
    pub fn new(store: Arc<CounterStore>, latitude: f64, longitude: f64) -> Self {
        Self {
            store,
            origin: Location::coordinates(latitude, longitude),
        }
    }

    pub fn store(&self) -> &Arc<CounterStore> {
        &self.store
    }

    /// Count one request to `service`, attributed to this instance's location.
    pub fn register_request(&self, service: &str) -> CountRecord {
        self.bump(service, service, self.origin.clone())
    }

    /// Count one request to `service` that originated at `(latitude, longitude)`.
    pub fn add_request(&self, service: &str, latitude: f64, longitude: f64) -> CountRecord {
        let key = request_key(service, latitude, longitude);
        self.bump(&key, service, Location::coordinates(latitude, longitude))
    }

    fn bump(&self, key: &str, service: &str, location: Location) -> CountRecord {
        let now = Utc::now();
        self.store.update(key, |current| match current {
            Some(r) => r.incremented(location, now),
            None => CountRecord::first(service, location, now),
        })
    }
}

/// Store key for an explicitly located request.
pub fn request_key(service: &str, latitude: f64, longitude: f64) -> String {
    format!("{service}{KEY_SEPARATOR}{latitude}{KEY_SEPARATOR}{longitude}")
}

/// Service names accepted from the local API: non-blank, no control characters.
pub fn validate_service(service: &str) -> Result<()> {
    if service.trim().is_empty() {
        return Err(ReqlocError::BadRequest("service must not be empty".into()));
    }
    if service.chars().any(char::is_control) {
        return Err(ReqlocError::BadRequest(
            "service must not contain control characters".into(),
        ));
    }
    Ok(())
}
