use crate::{ExchangeError, HttpClient, MarketSource};
use async_trait::async_trait;
use pairlist_shared_models::{MarketKind, MarketRecord, MarketType};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

pub const INSTRUMENTS_INFO: &str = "https://api.bybit.com/v5/market/instruments-info";

const PAGE_LIMIT: u32 = 1000;
const MAX_PAGES: usize = 20;

#[derive(Serialize, Deserialize, Debug)]
pub struct InstrumentsResponse {
    #[serde(rename = "retCode")]
    pub ret_code: i64,
    #[serde(rename = "retMsg")]
    pub ret_msg: String,
    pub result: Option<InstrumentsResult>,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct InstrumentsResult {
    pub category: String,
    pub list: Vec<Instrument>,
    #[serde(rename = "nextPageCursor", default)]
    pub next_page_cursor: String,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct Instrument {
    pub symbol: String,
    #[serde(rename = "baseCoin")]
    pub base_coin: String,
    #[serde(rename = "quoteCoin")]
    pub quote_coin: String,
    pub status: String,
    #[serde(rename = "contractType", default)]
    pub contract_type: String,
}

impl Instrument {
    pub fn to_record(&self, category: Category) -> MarketRecord {
        let kind = match category {
            Category::Spot => MarketKind::Spot,
            Category::Linear if self.contract_type == "LinearFutures" => MarketKind::Future,
            Category::Linear => MarketKind::Swap,
        };
        MarketRecord::new(&self.base_coin, &self.quote_coin, kind, self.status == "Trading")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Spot,
    Linear,
}

impl Category {
    /// Spot maps to `spot`, futures to USDT/USDC-margined `linear` contracts.
    pub fn for_market_type(market_type: MarketType) -> Self {
        match market_type {
            MarketType::Spot => Category::Spot,
            MarketType::Futures => Category::Linear,
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            Category::Spot => "spot",
            Category::Linear => "linear",
        }
    }
}

#[derive(Serialize)]
struct InstrumentsParams<'a> {
    category: &'static str,
    limit: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    cursor: Option<&'a str>,
}

pub struct BybitClient {
    http: HttpClient,
}

impl BybitClient {
    pub fn new(http: HttpClient) -> Self {
        Self { http }
    }

    pub async fn instruments_page(
        &self,
        category: Category,
        cursor: Option<&str>,
    ) -> Result<InstrumentsResult, ExchangeError> {
        let params = InstrumentsParams {
            category: category.as_str(),
            limit: PAGE_LIMIT,
            cursor,
        };
        let response: InstrumentsResponse = self.http.get_with_params(INSTRUMENTS_INFO, &params).await?;

        if response.ret_code != 0 {
            return Err(ExchangeError::Api {
                exchange: "bybit",
                message: format!("{} (retCode {})", response.ret_msg, response.ret_code),
            });
        }

        response.result.ok_or_else(|| ExchangeError::Api {
            exchange: "bybit",
            message: "instruments response without result".to_string(),
        })
    }

    /// Walks every page of a category.
    pub async fn instruments(&self, category: Category) -> Result<Vec<MarketRecord>, ExchangeError> {
        let mut records = Vec::new();
        let mut cursor: Option<String> = None;

        for _ in 0..MAX_PAGES {
            let page = self.instruments_page(category, cursor.as_deref()).await?;
            records.extend(page.list.iter().map(|instrument| instrument.to_record(category)));

            if page.next_page_cursor.is_empty() {
                return Ok(records);
            }
            cursor = Some(page.next_page_cursor);
        }

        warn!(category = category.as_str(), pages = MAX_PAGES, "bybit pagination truncated");
        Ok(records)
    }
}

#[async_trait]
impl MarketSource for BybitClient {
    async fn load_markets(&self, market_type: MarketType) -> Result<Vec<MarketRecord>, ExchangeError> {
        let category = Category::for_market_type(market_type);
        let markets = self.instruments(category).await?;

        debug!(category = category.as_str(), count = markets.len(), "bybit markets loaded");
        Ok(markets)
    }
}
