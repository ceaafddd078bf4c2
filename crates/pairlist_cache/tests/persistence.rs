use chrono::{DateTime, Utc};
use pairlist_cache::{CacheEntry, CacheStore, load_cache, save_cache};
use serde::{Deserialize, Serialize};
use std::fs;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Coin {
    symbol: String,
    alt_rank: u32,
}

fn coin(symbol: &str, alt_rank: u32) -> Coin {
    Coin {
        symbol: symbol.to_string(),
        alt_rank,
    }
}

#[test]
fn missing_file_loads_empty_cache() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store: CacheStore<Coin> = load_cache(&dir.path().join("cache.json"));

    assert!(store.ranked().is_none());
    assert!(store.exchanges().is_empty());
}

#[test]
fn corrupt_file_loads_empty_cache() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("cache.json");
    fs::write(&path, "{ not json").expect("write");

    let store: CacheStore<Coin> = load_cache(&path);
    assert!(store.ranked().is_none());
    assert!(store.exchanges().is_empty());
}

#[test]
fn save_then_load_keeps_payloads_and_timestamps() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("nested").join("cache.json");
    let fetched_at = DateTime::from_timestamp_millis(1_735_689_600_250).expect("timestamp");

    let store: CacheStore<Coin> = CacheStore::new();
    store.insert_ranked(CacheEntry::fetched_at(vec![coin("BTC", 3), coin("ETH", 1)], fetched_at));
    store.exchanges().insert(
        "binance_futures_USDT",
        CacheEntry::fetched_at(vec!["BTC/USDT:USDT".to_string()], fetched_at),
    );

    save_cache(&path, &store);
    assert!(path.exists());

    let restored: CacheStore<Coin> = load_cache(&path);
    let ranked = restored.ranked().expect("ranked entry");
    assert_eq!(ranked.data, vec![coin("BTC", 3), coin("ETH", 1)]);
    assert_eq!(ranked.timestamp, fetched_at);

    let pairs = restored.exchanges().get("binance_futures_USDT").expect("exchange entry");
    assert_eq!(pairs.data, vec!["BTC/USDT:USDT".to_string()]);
    assert_eq!(pairs.timestamp, fetched_at);
}

#[test]
fn reads_files_written_by_the_previous_service() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("cache.json");
    fs::write(
        &path,
        r#"{
  "lunarcrushPairs": null,
  "lunarCrushHistory": {},
  "exchanges": {
    "bybit_spot_USDT": { "data": ["SOL/USDT", "DOGE/USDT"], "timestamp": 1735689600000 }
  }
}"#,
    )
    .expect("write");

    let store: CacheStore<Coin> = load_cache(&path);
    let entry = store.exchanges().get("bybit_spot_USDT").expect("entry");
    assert_eq!(entry.data, vec!["SOL/USDT".to_string(), "DOGE/USDT".to_string()]);
    assert_eq!(entry.timestamp.timestamp_millis(), 1_735_689_600_000);
    assert!(entry.timestamp < Utc::now());
}

#[test]
fn unwritable_target_is_swallowed() {
    let dir = tempfile::tempdir().expect("tempdir");
    let blocker = dir.path().join("blocker");
    fs::write(&blocker, "file, not a directory").expect("write");

    let store: CacheStore<Coin> = CacheStore::new();
    store.put_ranked(vec![coin("BTC", 1)]);
    save_cache(&blocker.join("cache.json"), &store);

    assert!(!blocker.join("cache.json").exists());
}
