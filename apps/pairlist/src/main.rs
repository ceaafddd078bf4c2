use anyhow::Context;
use clap::Parser;
use config::Config;
use dotenv::dotenv;
use pairlist_cache::{load_cache, save_cache};
use pairlist_engine::{ExchangePairFetcher, RankedCoinFetcher, SharedCache};
use pairlist_exchanges::{ExchangeRegistry, HttpClient};
use pairlist_lunarcrush::{LunarcrushClient, RankedCoin, RateLimitTracker};
use routes::AppState;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;
mod config;
mod routes;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    let config = Config::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cache_file = config.cache_file();
    let cache: SharedCache = Arc::new(load_cache::<RankedCoin>(&cache_file));

    let tracker = Arc::new(RateLimitTracker::with_bounds(
        config.lunarcrush_plan,
        config.ttl_floor(),
        config.ttl_ceiling(),
    ));
    let lunarcrush = LunarcrushClient::new(&config.lunarcrush_token).context("Failed to build LunarCrush client")?;
    let http = HttpClient::new().context("Failed to build exchange HTTP client")?;
    let registry = ExchangeRegistry::with_defaults(http);

    info!(
        exchanges = ?registry.names().collect::<Vec<_>>(),
        plan = %config.lunarcrush_plan,
        initial_ttl_secs = tracker.current_ttl().as_secs(),
        "starting pairlist service"
    );

    let state = Arc::new(AppState {
        exchange_pairs: ExchangePairFetcher::new(registry, cache.clone(), config.exchange_ttl()),
        ranked_coins: RankedCoinFetcher::new(Arc::new(lunarcrush), cache.clone(), tracker),
    });
    let app = routes::router(state, &config.api_prefix());

    let address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {address}"))?;
    info!(%address, prefix = %config.api_prefix(), "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!(path = %cache_file.display(), "shutting down, saving cache");
    save_cache(&cache_file, &cache);
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
