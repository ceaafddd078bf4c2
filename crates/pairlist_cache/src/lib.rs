pub mod models;
pub mod operations;
pub mod store;

pub use models::{CacheEntry, CacheFile};
pub use operations::{load_cache, save_cache};
pub use store::{CacheStore, TtlCache, exchange_key};
