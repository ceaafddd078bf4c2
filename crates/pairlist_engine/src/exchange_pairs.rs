use crate::SharedCache;
use crate::error::PairlistError;
use pairlist_cache::exchange_key;
use pairlist_exchanges::ExchangeRegistry;
use pairlist_shared_models::{MarketRecord, MarketType};
use std::time::Duration;
use tracing::{debug, error, info};

pub const DEFAULT_EXCHANGE_TTL: Duration = Duration::from_secs(60 * 60);
pub const DEFAULT_QUOTE_ASSET: &str = "USDT";

/// Lists an exchange's tradable pairs for one market type and quote asset.
///
/// Results are cached for a fixed TTL. Unlike the ranked coin list, a failed
/// refresh is never papered over with stale pairs.
pub struct ExchangePairFetcher {
    registry: ExchangeRegistry,
    cache: SharedCache,
    ttl: Duration,
}

impl ExchangePairFetcher {
    pub fn new(registry: ExchangeRegistry, cache: SharedCache, ttl: Duration) -> Self {
        Self { registry, cache, ttl }
    }

    pub async fn fetch(
        &self,
        exchange: &str,
        quote_asset: &str,
        market_type: MarketType,
    ) -> Result<Vec<String>, PairlistError> {
        let source = self
            .registry
            .get(exchange)
            .ok_or_else(|| PairlistError::UnsupportedExchange(exchange.to_string()))?;

        let key = exchange_key(exchange, market_type, quote_asset);
        if let Some(pairs) = self.cache.exchanges().get_fresh(&key, self.ttl) {
            debug!(%key, "returning cached exchange pairs");
            return Ok(pairs);
        }

        let markets = source.load_markets(market_type).await.map_err(|e| {
            error!(exchange, error = %e, "failed to load exchange markets");
            PairlistError::ExchangeFetchFailed(exchange.to_string())
        })?;

        let pairs = select_pairs(&markets, quote_asset, market_type);
        info!(%key, markets = markets.len(), pairs = pairs.len(), "exchange pairs refreshed");

        self.cache.exchanges().put(key, pairs.clone());
        Ok(pairs)
    }
}

/// Active markets of the requested kind and quote, as pair strings, in the
/// order the exchange listed them.
pub fn select_pairs(markets: &[MarketRecord], quote_asset: &str, market_type: MarketType) -> Vec<String> {
    let kind = market_type.kind();

    markets
        .iter()
        .filter(|market| market.active && market.kind == kind && market.quote == quote_asset)
        .map(|market| market.pair(market_type))
        .collect()
}
