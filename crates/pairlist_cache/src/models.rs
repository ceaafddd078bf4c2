use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

/// A cached payload together with the moment it was fetched.
///
/// Entries are replaced wholesale on refresh; the timestamp of an existing
/// entry never moves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry<T> {
    pub data: T,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub timestamp: DateTime<Utc>,
}

impl<T> CacheEntry<T> {
    pub fn new(data: T) -> Self {
        Self::fetched_at(data, Utc::now())
    }

    pub fn fetched_at(data: T, timestamp: DateTime<Utc>) -> Self {
        Self { data, timestamp }
    }

    /// Time elapsed since the payload was fetched. Entries stamped in the
    /// future (clock skew in a loaded file) report zero.
    pub fn age(&self) -> Duration {
        (Utc::now() - self.timestamp).to_std().unwrap_or_default()
    }

    pub fn is_fresh(&self, ttl: Duration) -> bool {
        self.age() < ttl
    }
}

/// On-disk shape of the cache file.
#[derive(Debug, Serialize, Deserialize)]
#[serde(bound(serialize = "R: Serialize", deserialize = "R: Deserialize<'de>"))]
pub struct CacheFile<R> {
    #[serde(rename = "lunarcrushPairs", default)]
    pub lunarcrush_pairs: Option<CacheEntry<Vec<R>>>,
    #[serde(rename = "lunarCrushHistory", default)]
    pub lunarcrush_history: HashMap<String, CacheEntry<Vec<String>>>,
    #[serde(default)]
    pub exchanges: HashMap<String, CacheEntry<Vec<String>>>,
}

impl<R> Default for CacheFile<R> {
    fn default() -> Self {
        Self {
            lunarcrush_pairs: None,
            lunarcrush_history: HashMap::new(),
            exchanges: HashMap::new(),
        }
    }
}
