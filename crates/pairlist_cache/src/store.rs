use crate::models::{CacheEntry, CacheFile};
use dashmap::DashMap;
use std::collections::HashMap;
use std::fmt;
use std::time::Duration;

/// Keyed TTL cache. Freshness is checked lazily on lookup; nothing is ever
/// evicted.
#[derive(Debug)]
pub struct TtlCache<T> {
    entries: DashMap<String, CacheEntry<T>>,
}

impl<T: Clone> TtlCache<T> {
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }

    /// Returns the entry for `key` regardless of its age.
    pub fn get(&self, key: &str) -> Option<CacheEntry<T>> {
        self.entries.get(key).map(|entry| entry.value().clone())
    }

    /// Returns the payload for `key` only if it is younger than `ttl`.
    pub fn get_fresh(&self, key: &str, ttl: Duration) -> Option<T> {
        self.entries
            .get(key)
            .filter(|entry| entry.is_fresh(ttl))
            .map(|entry| entry.data.clone())
    }

    /// Stores `data` under `key`, stamped with the current time.
    pub fn put(&self, key: impl Into<String>, data: T) {
        self.insert(key, CacheEntry::new(data));
    }

    pub fn insert(&self, key: impl Into<String>, entry: CacheEntry<T>) {
        self.entries.insert(key.into(), entry);
    }

    pub fn is_fresh(entry: &CacheEntry<T>, ttl: Duration) -> bool {
        entry.is_fresh(ttl)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn snapshot(&self) -> HashMap<String, CacheEntry<T>> {
        self.entries
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().clone()))
            .collect()
    }
}

impl<T: Clone> Default for TtlCache<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> FromIterator<(String, CacheEntry<T>)> for TtlCache<T> {
    fn from_iter<I: IntoIterator<Item = (String, CacheEntry<T>)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

/// Cache key of one exchange pair list: `{exchange}_{marketType}_{quoteAsset}`.
pub fn exchange_key(exchange: &str, market_type: impl fmt::Display, quote_asset: &str) -> String {
    format!("{exchange}_{market_type}_{quote_asset}")
}

/// Process-wide cache shared by both fetchers.
///
/// `R` is the ranked-coin record type; it lives in a single global slot,
/// while exchange pair lists are keyed by `{exchange}_{marketType}_{quote}`.
#[derive(Debug)]
pub struct CacheStore<R> {
    ranked: TtlCache<Vec<R>>,
    exchanges: TtlCache<Vec<String>>,
    history: TtlCache<Vec<String>>,
}

impl<R: Clone> CacheStore<R> {
    const RANKED_SLOT: &'static str = "lunarcrushPairs";

    pub fn new() -> Self {
        Self {
            ranked: TtlCache::new(),
            exchanges: TtlCache::new(),
            history: TtlCache::new(),
        }
    }

    pub fn ranked(&self) -> Option<CacheEntry<Vec<R>>> {
        self.ranked.get(Self::RANKED_SLOT)
    }

    pub fn put_ranked(&self, coins: Vec<R>) {
        self.ranked.put(Self::RANKED_SLOT, coins);
    }

    pub fn insert_ranked(&self, entry: CacheEntry<Vec<R>>) {
        self.ranked.insert(Self::RANKED_SLOT, entry);
    }

    pub fn exchanges(&self) -> &TtlCache<Vec<String>> {
        &self.exchanges
    }

    pub fn to_file(&self) -> CacheFile<R> {
        CacheFile {
            lunarcrush_pairs: self.ranked(),
            lunarcrush_history: self.history.snapshot(),
            exchanges: self.exchanges.snapshot(),
        }
    }
}

impl<R: Clone> Default for CacheStore<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Clone> From<CacheFile<R>> for CacheStore<R> {
    fn from(file: CacheFile<R>) -> Self {
        let store = Self {
            ranked: TtlCache::new(),
            exchanges: file.exchanges.into_iter().collect(),
            history: file.lunarcrush_history.into_iter().collect(),
        };
        if let Some(entry) = file.lunarcrush_pairs {
            store.insert_ranked(entry);
        }
        store
    }
}
