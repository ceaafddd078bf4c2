pub mod coins_list;
pub mod method;
pub mod rate_limit;

use async_trait::async_trait;
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue, InvalidHeaderValue};
use reqwest::{Client, ClientBuilder, StatusCode};
use std::time::Duration;
use thiserror::Error;

pub use coins_list::{CoinsList, CoinsListResponse, RankedCoin};
pub use rate_limit::{PlanTier, RateLimitInfo, RateLimitState, RateLimitTracker};

pub const BASE_URL: &str = "https://lunarcrush.com/api4";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Error)]
pub enum LunarcrushError {
    #[error("Invalid bearer token: {0}")]
    InvalidToken(#[from] InvalidHeaderValue),
    #[error("LunarCrush rate limit exceeded")]
    TooManyRequests { headers: HeaderMap },
    #[error("LunarCrush returned status {status}")]
    Status { status: StatusCode, headers: HeaderMap },
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

impl LunarcrushError {
    /// Response headers, when the failure came with a response.
    pub fn headers(&self) -> Option<&HeaderMap> {
        match self {
            LunarcrushError::TooManyRequests { headers } | LunarcrushError::Status { headers, .. } => {
                Some(headers)
            }
            _ => None,
        }
    }
}

/// Decoded response body together with the headers it came with.
#[derive(Debug)]
pub struct Reply<T> {
    pub body: T,
    pub headers: HeaderMap,
}

/// Anything that can produce the full ranked coin list.
#[async_trait]
pub trait CoinsListSource: Send + Sync {
    async fn coins_list(&self) -> Result<Reply<CoinsListResponse>, LunarcrushError>;
}

pub struct LunarcrushClient {
    base_url: String,
    reqwest: Client,
}

impl LunarcrushClient {
    pub fn new(bearer_token: &str) -> Result<Self, LunarcrushError> {
        Self::with_base_url(bearer_token, BASE_URL)
    }

    pub fn with_base_url(bearer_token: &str, base_url: impl Into<String>) -> Result<Self, LunarcrushError> {
        let mut auth = HeaderValue::from_str(&format!("Bearer {bearer_token}"))?;
        auth.set_sensitive(true);

        let mut default_headers = HeaderMap::new();
        default_headers.insert(AUTHORIZATION, auth);
        default_headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let reqwest = ClientBuilder::new()
            .default_headers(default_headers)
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            base_url: base_url.into(),
            reqwest,
        })
    }

    pub(crate) async fn get0<M: method::Method0>(&self) -> Result<Reply<M::Response>, LunarcrushError> {
        let url = format!("{}{}", self.base_url, M::PATH);
        let response = self.reqwest.get(url).send().await?;

        let status = response.status();
        let headers = response.headers().clone();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(LunarcrushError::TooManyRequests { headers });
        }
        if !status.is_success() {
            return Err(LunarcrushError::Status { status, headers });
        }

        let body = response.json::<M::Response>().await?;
        Ok(Reply { body, headers })
    }

    pub async fn call0<M: method::Method0>(&self) -> Result<Reply<M::Response>, LunarcrushError> {
        self.get0::<M>().await
    }
}

#[async_trait]
impl CoinsListSource for LunarcrushClient {
    async fn coins_list(&self) -> Result<Reply<CoinsListResponse>, LunarcrushError> {
        self.call0::<CoinsList>().await
    }
}
