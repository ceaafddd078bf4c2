use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use pairlist_engine::exchange_pairs::DEFAULT_QUOTE_ASSET;
use pairlist_engine::ranking::DEFAULT_LIMIT;
use pairlist_engine::{rank, ExchangePairFetcher, PairlistError, RankOptions, RankedCoinFetcher};
use pairlist_shared_models::{MarketType, SortDirection};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::{debug, warn};

/// Hyperliquid only quotes in USDC.
const HYPERLIQUID_QUOTE_ASSET: &str = "USDC";

pub struct AppState {
    pub exchange_pairs: ExchangePairFetcher,
    pub ranked_coins: RankedCoinFetcher,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct PairsResponse {
    pub pairs: Vec<String>,
    /// Seconds until the ranking data may be refreshed.
    pub refresh_period: u64,
}

/// Raw query string. Everything is kept as text so malformed numbers fall
/// back to defaults instead of rejecting the request.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LunarQuery {
    pub limit: Option<String>,
    pub min: Option<String>,
    pub max: Option<String>,
    pub sort: Option<String>,
    pub reverse: Option<String>,
    pub quote_asset: Option<String>,
}

impl LunarQuery {
    pub fn limit(&self) -> usize {
        self.limit
            .as_deref()
            .and_then(|limit| limit.trim().parse::<usize>().ok())
            .filter(|&limit| limit > 0)
            .unwrap_or(DEFAULT_LIMIT)
    }

    pub fn quote_asset(&self, exchange: &str) -> String {
        match self.quote_asset.as_deref().map(str::trim) {
            Some(quote) if !quote.is_empty() => quote.to_uppercase(),
            _ if exchange == "hyperliquid" => HYPERLIQUID_QUOTE_ASSET.to_string(),
            _ => DEFAULT_QUOTE_ASSET.to_string(),
        }
    }

    /// `sort` wins over `reverse` when both are given.
    pub fn direction(&self) -> Result<SortDirection, PairlistError> {
        if let Some(sort) = self.sort.as_deref() {
            return sort.parse().map_err(PairlistError::InvalidSortDirection);
        }

        match self.reverse.as_deref().map(str::trim) {
            None | Some("") | Some("false") | Some("0") => Ok(SortDirection::Ascending),
            Some("true") | Some("1") => Ok(SortDirection::Descending),
            Some(other) => Err(PairlistError::InvalidSortDirection(other.to_string())),
        }
    }

    pub fn rank_options(&self, metric: &str) -> Result<RankOptions, PairlistError> {
        Ok(RankOptions::builder()
            .metric(metric)
            .direction(self.direction()?)
            .maybe_min(bound(self.min.as_deref()))
            .maybe_max(bound(self.max.as_deref()))
            .limit(self.limit())
            .build())
    }
}

fn bound(raw: Option<&str>) -> Option<f64> {
    let raw = raw?.trim();
    match raw.parse::<f64>() {
        Ok(value) if value.is_finite() => Some(value),
        _ => {
            debug!(raw, "ignoring unparseable bound");
            None
        }
    }
}

/// Error body shared by every failing route: `{ "error": message }`.
pub struct ApiError(PairlistError);

impl From<PairlistError> for ApiError {
    fn from(err: PairlistError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        warn!(error = %self.0, "request failed");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": self.0.to_string() })),
        )
            .into_response()
    }
}

pub fn router(state: Arc<AppState>, api_prefix: &str) -> Router {
    let api = Router::new()
        .route("/pairlist/lunar/:exchange/:market_type/:lunar_mode", get(lunar_pairs))
        .route("/health", get(health))
        .with_state(state)
        .layer(CorsLayer::permissive());

    if api_prefix.is_empty() {
        api
    } else {
        Router::new().nest(api_prefix, api)
    }
}

async fn lunar_pairs(
    State(state): State<Arc<AppState>>,
    Path((exchange, market_type, lunar_mode)): Path<(String, String, String)>,
    Query(query): Query<LunarQuery>,
) -> Result<Json<PairsResponse>, ApiError> {
    let market_type: MarketType = market_type.parse().map_err(PairlistError::InvalidMarketType)?;
    let options = query.rank_options(&lunar_mode)?;
    let quote_asset = query.quote_asset(&exchange);

    // Both fetches run to completion so a failing exchange never cancels a
    // LunarCrush refresh that is already in flight.
    let (pairs, coins) = tokio::join!(
        state.exchange_pairs.fetch(&exchange, &quote_asset, market_type),
        state.ranked_coins.fetch(),
    );
    let (pairs, coins) = (pairs?, coins?);

    let ranked = rank(&pairs, &coins, &options);
    debug!(
        %exchange,
        %market_type,
        metric = %options.metric,
        returned = ranked.len(),
        "pairlist served"
    );

    Ok(Json(PairsResponse {
        pairs: ranked,
        refresh_period: state.ranked_coins.tracker().current_ttl().as_secs(),
    }))
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "OK" }))
}
