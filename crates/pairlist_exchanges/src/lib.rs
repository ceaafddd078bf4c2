pub mod binance;
pub mod bybit;
pub mod hyperliquid;

use async_trait::async_trait;
use pairlist_shared_models::{MarketRecord, MarketType};
use reqwest::{Client, ClientBuilder};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

pub use binance::BinanceClient;
pub use bybit::BybitClient;
pub use hyperliquid::HyperliquidClient;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Error)]
pub enum ExchangeError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("{exchange} API error: {message}")]
    Api {
        exchange: &'static str,
        message: String,
    },
}

/// The "load markets" capability of one exchange, normalized to
/// [`MarketRecord`]s.
///
/// Only the venue backing `market_type` is queried, so an outage of an
/// exchange's derivatives API does not take its spot listing down with it.
#[async_trait]
pub trait MarketSource: Send + Sync {
    async fn load_markets(&self, market_type: MarketType) -> Result<Vec<MarketRecord>, ExchangeError>;
}

/// Thin JSON-over-HTTP helper shared by the exchange clients.
#[derive(Clone)]
pub struct HttpClient {
    reqwest: Client,
}

impl HttpClient {
    pub fn new() -> Result<Self, ExchangeError> {
        let reqwest = ClientBuilder::new().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self { reqwest })
    }

    pub(crate) async fn get<R: DeserializeOwned>(&self, url: &str) -> Result<R, reqwest::Error> {
        let response = self.reqwest.get(url).send().await?;
        let response = response.error_for_status()?;

        response.json().await
    }

    pub(crate) async fn get_with_params<R, P>(&self, url: &str, params: &P) -> Result<R, reqwest::Error>
    where
        R: DeserializeOwned,
        P: Serialize + ?Sized,
    {
        let response = self.reqwest.get(url).query(params).send().await?;
        let response = response.error_for_status()?;

        response.json().await
    }

    pub(crate) async fn post_json<R, B>(&self, url: &str, body: &B) -> Result<R, reqwest::Error>
    where
        R: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let response = self.reqwest.post(url).json(body).send().await?;
        let response = response.error_for_status()?;

        response.json().await
    }
}

/// The fixed set of exchanges the service answers for, by lowercase name.
#[derive(Clone, Default)]
pub struct ExchangeRegistry {
    sources: BTreeMap<String, Arc<dyn MarketSource>>,
}

impl ExchangeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Binance, Bybit and Hyperliquid sharing one HTTP client.
    pub fn with_defaults(http: HttpClient) -> Self {
        Self::new()
            .register("binance", Arc::new(BinanceClient::new(http.clone())))
            .register("bybit", Arc::new(BybitClient::new(http.clone())))
            .register("hyperliquid", Arc::new(HyperliquidClient::new(http)))
    }

    pub fn register(mut self, name: impl Into<String>, source: Arc<dyn MarketSource>) -> Self {
        self.sources.insert(name.into(), source);
        self
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn MarketSource>> {
        self.sources.get(name).cloned()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.sources.keys().map(String::as_str)
    }
}
