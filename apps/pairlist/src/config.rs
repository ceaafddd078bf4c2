use clap::Parser;
use clap::builder::NonEmptyStringValueParser;
use pairlist_lunarcrush::PlanTier;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about = "Exchange pairs ranked by LunarCrush metrics", long_about = None)]
pub struct Config {
    /// Host to bind the HTTP server to
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port to bind the HTTP server to
    #[arg(long, env = "PORT", default_value_t = 8080)]
    pub port: u16,

    /// LunarCrush API bearer token
    #[arg(long, env = "LUNARCRUSH_TOKEN", hide_env_values = true, value_parser = NonEmptyStringValueParser::new())]
    pub lunarcrush_token: String,

    /// LunarCrush subscription (discover, individual, builder, enterprise)
    #[arg(long, env = "LUNARCRUSH_PLAN", default_value = "individual")]
    pub lunarcrush_plan: PlanTier,

    /// Directory holding cache.json
    #[arg(long, env = "CACHE_DIR", default_value = "cache")]
    pub cache_dir: PathBuf,

    /// Seconds an exchange pair list stays fresh
    #[arg(long, env = "CACHE_TTL_EXCHANGE", default_value_t = 3600)]
    pub cache_ttl_exchange: u64,

    /// Lower bound, in seconds, of the LunarCrush cache TTL
    #[arg(long, env = "CACHE_TTL_FLOOR", default_value_t = 10)]
    pub cache_ttl_floor: u64,

    /// Upper bound, in seconds, of the LunarCrush cache TTL
    #[arg(long, env = "CACHE_TTL_CEILING", default_value_t = 60)]
    pub cache_ttl_ceiling: u64,

    /// Path prefix for every route, e.g. /api
    #[arg(long, env = "API_PREFIX", default_value = "")]
    pub api_prefix: String,
}

impl Config {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn cache_file(&self) -> PathBuf {
        self.cache_dir.join("cache.json")
    }

    pub fn exchange_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_exchange)
    }

    pub fn ttl_floor(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_floor)
    }

    pub fn ttl_ceiling(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_ceiling)
    }

    /// `""` or `/prefix`, never with a trailing slash.
    pub fn api_prefix(&self) -> String {
        let trimmed = self.api_prefix.trim().trim_matches('/');
        if trimmed.is_empty() {
            String::new()
        } else {
            format!("/{trimmed}")
        }
    }
}
