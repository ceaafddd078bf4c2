use crate::SharedCache;
use crate::error::PairlistError;
use pairlist_lunarcrush::{CoinsListSource, LunarcrushError, RankedCoin, RateLimitTracker};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Fetches the ranked coin list, cached for as long as the tracked rate
/// limit allows.
///
/// When upstream answers 429 and anything is cached, the cached list is
/// served no matter how old it is.
pub struct RankedCoinFetcher {
    source: Arc<dyn CoinsListSource>,
    cache: SharedCache,
    tracker: Arc<RateLimitTracker>,
}

impl RankedCoinFetcher {
    pub fn new(source: Arc<dyn CoinsListSource>, cache: SharedCache, tracker: Arc<RateLimitTracker>) -> Self {
        Self { source, cache, tracker }
    }

    pub fn tracker(&self) -> &RateLimitTracker {
        &self.tracker
    }

    pub async fn fetch(&self) -> Result<Vec<RankedCoin>, PairlistError> {
        let ttl = self.tracker.current_ttl();
        if let Some(entry) = self.cache.ranked().filter(|entry| entry.is_fresh(ttl)) {
            debug!(ttl_secs = ttl.as_secs(), "returning cached LunarCrush data");
            return Ok(entry.data);
        }

        match self.refresh().await {
            Err(PairlistError::RateLimited) => match self.cache.ranked() {
                Some(stale) => {
                    warn!(
                        age_secs = stale.age().as_secs(),
                        "LunarCrush rate limited, serving stale cache"
                    );
                    Ok(stale.data)
                }
                None => {
                    error!("LunarCrush rate limited and nothing cached");
                    Err(PairlistError::RankedDataFetchFailed)
                }
            },
            other => other,
        }
    }

    async fn refresh(&self) -> Result<Vec<RankedCoin>, PairlistError> {
        let reply = match self.source.coins_list().await {
            Ok(reply) => reply,
            Err(e) => {
                if let Some(headers) = e.headers() {
                    self.tracker.observe(headers);
                }
                return Err(match e {
                    LunarcrushError::TooManyRequests { .. } => PairlistError::RateLimited,
                    other => {
                        error!(error = %other, "error fetching LunarCrush data");
                        PairlistError::RankedDataFetchFailed
                    }
                });
            }
        };

        self.tracker.observe(&reply.headers);

        let coins = reply.body.data;
        if coins.is_empty() {
            error!("LunarCrush returned an empty coin list");
            return Err(PairlistError::EmptyUpstreamDataset);
        }

        info!(
            coins = coins.len(),
            next_ttl_secs = self.tracker.current_ttl().as_secs(),
            rate_limit = ?self.tracker.snapshot(),
            "LunarCrush data refreshed"
        );
        self.cache.put_ranked(coins.clone());
        Ok(coins)
    }
}
