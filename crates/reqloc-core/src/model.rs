//! Request-location records (JSON wire shape).
//!
//! A record is always `{service, <location fields>, count}` plus a timestamp
//! once it has been stamped. The location fields are flattened, so the same
//! type carries both deployment variants:
//! - coordinates: `{"latitude": .., "longitude": ..}`
//! - region: `{"continent": .., "region": .., "country": .., "city": ..}`

use std::hash::{Hash, Hasher};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Result, ReqlocError};

/// Where a batch of requests came from.
///
/// Equality is exact field match. Coordinates compare by their bit pattern
/// with `-0.0` folded into `0.0`, so `Eq`/`Hash` agree with numeric equality
/// for every value JSON can carry.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Location {
    Region {
        continent: String,
        region: String,
        country: String,
        city: String,
    },
    Coordinates {
        latitude: f64,
        longitude: f64,
    },
}

impl Location {
    pub fn coordinates(latitude: f64, longitude: f64) -> Self {
        Location::Coordinates { latitude, longitude }
    }
}

impl PartialEq for Location {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (
                Location::Coordinates { latitude: a, longitude: b },
                Location::Coordinates { latitude: c, longitude: d },
            ) => coordinate_bits(*a) == coordinate_bits(*c) && coordinate_bits(*b) == coordinate_bits(*d),
            (
                Location::Region { continent, region, country, city },
                Location::Region {
                    continent: o_continent,
                    region: o_region,
                    country: o_country,
                    city: o_city,
                },
            ) => continent == o_continent && region == o_region && country == o_country && city == o_city,
            _ => false,
        }
    }
}

impl Eq for Location {}

impl Hash for Location {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            Location::Coordinates { latitude, longitude } => {
                0u8.hash(state);
                coordinate_bits(*latitude).hash(state);
                coordinate_bits(*longitude).hash(state);
            }
            Location::Region { continent, region, country, city } => {
                1u8.hash(state);
                continent.hash(state);
                region.hash(state);
                country.hash(state);
                city.hash(state);
            }
        }
    }
}

fn coordinate_bits(x: f64) -> u64 {
    if x == 0.0 {
        0
    } else {
        x.to_bits()
    }
}

/// Grouping identity used by aggregation: `(service, location)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LocationKey {
    pub service: String,
    pub location: Location,
}

/// Unstamped count: the push body and the aggregated row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationCount {
    pub service: String,
    #[serde(flatten)]
    pub location: Location,
    pub count: u64,
}

impl LocationCount {
    /// Checks that hold for every pushed count before it is stored.
    pub fn validate(&self) -> Result<()> {
        if self.service.trim().is_empty() {
            return Err(ReqlocError::BadRequest("service must not be empty".into()));
        }
        Ok(())
    }

    /// Stamp with the given time, producing an immutable record.
    pub fn stamp(self, at: DateTime<Utc>) -> CountRecord {
        CountRecord {
            service: self.service,
            location: self.location,
            count: self.count,
            timestamp: at,
        }
    }
}

/// A count of requests from one location to one service, stamped once.
///
/// Records are never mutated in place; an increment builds a new record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountRecord {
    pub service: String,
    #[serde(flatten)]
    pub location: Location,
    pub count: u64,
    pub timestamp: DateTime<Utc>,
}

impl CountRecord {
    pub fn new(service: impl Into<String>, location: Location, count: u64, timestamp: DateTime<Utc>) -> Self {
        Self {
            service: service.into(),
            location,
            count,
            timestamp,
        }
    }

    /// First observation for a key.
    pub fn first(service: impl Into<String>, location: Location, at: DateTime<Utc>) -> Self {
        Self::new(service, location, 1, at)
    }

    /// Replacement record with `count + 1`, restamped at `at`.
    pub fn incremented(&self, location: Location, at: DateTime<Utc>) -> Self {
        Self {
            service: self.service.clone(),
            location,
            count: self.count.saturating_add(1),
            timestamp: at,
        }
    }

    pub fn key(&self) -> LocationKey {
        LocationKey {
            service: self.service.clone(),
            location: self.location.clone(),
        }
    }
}
