use thiserror::Error;

/// Every failure a pairlist request can end with. Messages are shown to
/// clients verbatim.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PairlistError {
    #[error("Exchange {0} is not supported.")]
    UnsupportedExchange(String),
    #[error("Invalid market_type: {0}")]
    InvalidMarketType(String),
    #[error("Failed to fetch {0} data")]
    ExchangeFetchFailed(String),
    #[error("LunarCrush API returned an empty dataset.")]
    EmptyUpstreamDataset,
    #[error("Failed to fetch LunarCrush data")]
    RankedDataFetchFailed,
    /// Upstream throttled us. Recovered from stale cache when possible.
    #[error("LunarCrush rate limit exceeded")]
    RateLimited,
    #[error("Invalid sort direction: {0}")]
    InvalidSortDirection(String),
}
