use crate::{ExchangeError, HttpClient, MarketSource};
use async_trait::async_trait;
use pairlist_shared_models::{MarketKind, MarketRecord, MarketType};
use serde::{Deserialize, Serialize};
use tracing::debug;

pub const SPOT_EXCHANGE_INFO: &str = "https://api.binance.com/api/v3/exchangeInfo";
pub const FUTURES_EXCHANGE_INFO: &str = "https://fapi.binance.com/fapi/v1/exchangeInfo";

#[derive(Serialize, Deserialize, Debug)]
pub struct ExchangeInfo<S> {
    pub symbols: Vec<S>,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct SpotSymbol {
    pub symbol: String,
    pub status: String,
    #[serde(rename = "baseAsset")]
    pub base_asset: String,
    #[serde(rename = "quoteAsset")]
    pub quote_asset: String,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct FuturesSymbol {
    pub symbol: String,
    pub status: String,
    #[serde(rename = "contractType", default)]
    pub contract_type: String,
    #[serde(rename = "baseAsset")]
    pub base_asset: String,
    #[serde(rename = "quoteAsset")]
    pub quote_asset: String,
}

impl From<&SpotSymbol> for MarketRecord {
    fn from(s: &SpotSymbol) -> Self {
        MarketRecord::new(&s.base_asset, &s.quote_asset, MarketKind::Spot, s.status == "TRADING")
    }
}

impl From<&FuturesSymbol> for MarketRecord {
    fn from(s: &FuturesSymbol) -> Self {
        let kind = if s.contract_type == "PERPETUAL" {
            MarketKind::Swap
        } else {
            MarketKind::Future
        };
        MarketRecord::new(&s.base_asset, &s.quote_asset, kind, s.status == "TRADING")
    }
}

pub struct BinanceClient {
    http: HttpClient,
}

impl BinanceClient {
    pub fn new(http: HttpClient) -> Self {
        Self { http }
    }

    pub async fn spot_exchange_info(&self) -> Result<ExchangeInfo<SpotSymbol>, reqwest::Error> {
        self.http.get(SPOT_EXCHANGE_INFO).await
    }

    // USDⓈ-M futures only; coin-margined contracts live on another host.
    pub async fn futures_exchange_info(&self) -> Result<ExchangeInfo<FuturesSymbol>, reqwest::Error> {
        self.http.get(FUTURES_EXCHANGE_INFO).await
    }
}

#[async_trait]
impl MarketSource for BinanceClient {
    async fn load_markets(&self, market_type: MarketType) -> Result<Vec<MarketRecord>, ExchangeError> {
        let markets: Vec<MarketRecord> = match market_type {
            MarketType::Spot => self.spot_exchange_info().await?.symbols.iter().map(MarketRecord::from).collect(),
            MarketType::Futures => self.futures_exchange_info().await?.symbols.iter().map(MarketRecord::from).collect(),
        };

        debug!(%market_type, count = markets.len(), "binance markets loaded");
        Ok(markets)
    }
}
