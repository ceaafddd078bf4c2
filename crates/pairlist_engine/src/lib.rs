pub mod error;
pub mod exchange_pairs;
pub mod ranked_coins;
pub mod ranking;

pub use error::PairlistError;
pub use exchange_pairs::ExchangePairFetcher;
pub use ranked_coins::RankedCoinFetcher;
pub use ranking::{RankOptions, rank};

/// The cache shape shared by both fetchers.
pub type SharedCache = std::sync::Arc<pairlist_cache::CacheStore<pairlist_lunarcrush::RankedCoin>>;
