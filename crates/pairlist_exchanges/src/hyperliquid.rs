use crate::{ExchangeError, HttpClient, MarketSource};
use async_trait::async_trait;
use pairlist_shared_models::{MarketKind, MarketRecord, MarketType};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::HashMap;
use tracing::{debug, warn};

pub const INFO_URL: &str = "https://api.hyperliquid.xyz/info";

/// Every Hyperliquid perpetual settles in USDC.
pub const PERP_QUOTE: &str = "USDC";

#[derive(Serialize, Deserialize, Debug)]
pub struct PerpMeta {
    pub universe: Vec<PerpAsset>,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct PerpAsset {
    pub name: String,
    #[serde(rename = "isDelisted", default)]
    pub is_delisted: bool,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct SpotMeta {
    pub universe: Vec<SpotPair>,
    pub tokens: Vec<SpotToken>,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct SpotPair {
    pub name: String,
    pub tokens: [u32; 2],
    pub index: u32,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct SpotToken {
    pub name: String,
    pub index: u32,
}

impl PerpMeta {
    pub fn records(&self) -> Vec<MarketRecord> {
        self.universe
            .iter()
            .map(|asset| MarketRecord::new(&asset.name, PERP_QUOTE, MarketKind::Swap, !asset.is_delisted))
            .collect()
    }
}

impl SpotMeta {
    /// Resolves each pair's token indices to names; pairs referencing an
    /// unknown token are skipped.
    pub fn records(&self) -> Vec<MarketRecord> {
        let names: HashMap<u32, &str> = self
            .tokens
            .iter()
            .map(|token| (token.index, token.name.as_str()))
            .collect();

        self.universe
            .iter()
            .filter_map(|pair| {
                let [base, quote] = pair.tokens;
                match (names.get(&base), names.get(&quote)) {
                    (Some(base), Some(quote)) => Some(MarketRecord::new(*base, *quote, MarketKind::Spot, true)),
                    _ => {
                        warn!(pair = %pair.name, "spot pair references unknown token");
                        None
                    }
                }
            })
            .collect()
    }
}

pub struct HyperliquidClient {
    http: HttpClient,
}

impl HyperliquidClient {
    pub fn new(http: HttpClient) -> Self {
        Self { http }
    }

    pub async fn perp_meta(&self) -> Result<PerpMeta, reqwest::Error> {
        self.http.post_json(INFO_URL, &json!({ "type": "meta" })).await
    }

    pub async fn spot_meta(&self) -> Result<SpotMeta, reqwest::Error> {
        self.http.post_json(INFO_URL, &json!({ "type": "spotMeta" })).await
    }
}

#[async_trait]
impl MarketSource for HyperliquidClient {
    async fn load_markets(&self, market_type: MarketType) -> Result<Vec<MarketRecord>, ExchangeError> {
        let markets = match market_type {
            MarketType::Spot => self.spot_meta().await?.records(),
            MarketType::Futures => self.perp_meta().await?.records(),
        };

        debug!(%market_type, count = markets.len(), "hyperliquid markets loaded");
        Ok(markets)
    }
}
