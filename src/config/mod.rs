use config::{Config, ConfigError};
use serde::Deserialize;
use std::env;
use validator::Validate;

const DEFAULT_MAX_ATTEMPTS: u32 = 3;
const DEFAULT_BASE_DELAY_MS: u64 = 1000;
const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 30;

const DEFAULT_DEFILLAMA_POOLS_URL: &str = "https://yields.llama.fi/pools";
const DEFAULT_PENDLE_API_BASE_URL: &str = "https://api-v2.pendle.finance/core";
const DEFAULT_PENDLE_APP_URL: &str = "https://app.pendle.finance/trade/markets";

/// Pools at or below this TVL (USD) are ignored.
pub const DEFAULT_MIN_TVL_USD: f64 = 1_000_000.0;
/// Pools reporting an APY at or above this are treated as broken data.
pub const DEFAULT_MAX_APY: f64 = 200.0;
pub const DEFAULT_MAX_POOLS: usize = 30;
pub const DEFAULT_MAX_MARKETS_PER_CHAIN: usize = 5;

#[derive(Debug, Deserialize, Clone, Validate)]
pub struct ServerConfig {
    #[validate(length(min = 1))]
    pub host: String,
    #[validate(range(min = 1, max = 65535))]
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone, Validate)]
pub struct LogConfig {
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_format() -> String {
    "pretty".to_string()
}

#[derive(Debug, Deserialize, Clone, Validate)]
pub struct FetchConfig {
    #[validate(range(min = 1))]
    pub max_attempts: u32,
    pub base_delay_ms: u64,
    #[validate(range(min = 1))]
    pub timeout_secs: u64,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            base_delay_ms: DEFAULT_BASE_DELAY_MS,
            timeout_secs: DEFAULT_FETCH_TIMEOUT_SECS,
        }
    }
}

#[derive(Debug, Deserialize, Clone, Validate)]
pub struct DefiLlamaConfig {
    #[validate(length(min = 1))]
    pub pools_url: String,
    #[validate(range(min = 0.0))]
    pub min_tvl_usd: f64,
    #[validate(range(min = 0.0))]
    pub max_apy: f64,
    pub max_pools: usize,
}

impl Default for DefiLlamaConfig {
    fn default() -> Self {
        Self {
            pools_url: DEFAULT_DEFILLAMA_POOLS_URL.to_string(),
            min_tvl_usd: DEFAULT_MIN_TVL_USD,
            max_apy: DEFAULT_MAX_APY,
            max_pools: DEFAULT_MAX_POOLS,
        }
    }
}

#[derive(Debug, Deserialize, Clone, Validate)]
pub struct PendleConfig {
    #[validate(length(min = 1))]
    pub api_base_url: String,
    #[validate(length(min = 1))]
    pub app_url: String,
    #[validate(range(min = 0.0))]
    pub min_liquidity_usd: f64,
    pub max_markets_per_chain: usize,
}

impl Default for PendleConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_PENDLE_API_BASE_URL.to_string(),
            app_url: DEFAULT_PENDLE_APP_URL.to_string(),
            min_liquidity_usd: DEFAULT_MIN_TVL_USD,
            max_markets_per_chain: DEFAULT_MAX_MARKETS_PER_CHAIN,
        }
    }
}

#[derive(Debug, Deserialize, Clone, Validate)]
pub struct AppConfig {
    #[validate(nested)]
    pub server: ServerConfig,
    #[validate(nested)]
    pub log: LogConfig,
    #[validate(nested)]
    pub fetch: FetchConfig,
    #[validate(nested)]
    pub defillama: DefiLlamaConfig,
    #[validate(nested)]
    pub pendle: PendleConfig,
}

fn parse_port(value: &str) -> Result<i64, ConfigError> {
    value.parse::<i64>().map_err(|e| {
        ConfigError::Message(format!(
            "Invalid port value '{}': {}. Port must be a number between 1 and 65535.",
            value, e
        ))
    })
}

impl AppConfig {
    pub fn new() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let s = Config::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 4000)?
            .set_default("log.level", "info")?
            .set_default("log.format", "pretty")?
            .set_default("fetch.max_attempts", DEFAULT_MAX_ATTEMPTS as i64)?
            .set_default("fetch.base_delay_ms", DEFAULT_BASE_DELAY_MS)?
            .set_default("fetch.timeout_secs", DEFAULT_FETCH_TIMEOUT_SECS)?
            .set_default("defillama.pools_url", DEFAULT_DEFILLAMA_POOLS_URL)?
            .set_default("defillama.min_tvl_usd", DEFAULT_MIN_TVL_USD)?
            .set_default("defillama.max_apy", DEFAULT_MAX_APY)?
            .set_default("defillama.max_pools", DEFAULT_MAX_POOLS as i64)?
            .set_default("pendle.api_base_url", DEFAULT_PENDLE_API_BASE_URL)?
            .set_default("pendle.app_url", DEFAULT_PENDLE_APP_URL)?
            .set_default("pendle.min_liquidity_usd", DEFAULT_MIN_TVL_USD)?
            .set_default(
                "pendle.max_markets_per_chain",
                DEFAULT_MAX_MARKETS_PER_CHAIN as i64,
            )?
            .add_source(
                config::Environment::with_prefix("APP")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_override_option(
                "server.port",
                env::var("APP_SERVER__PORT")
                    .ok()
                    .map(|v| parse_port(&v))
                    .transpose()?,
            )?
            .build()?;

        let config: AppConfig = s.try_deserialize()?;

        if let Err(e) = config.validate() {
            return Err(ConfigError::Message(format!("Validation error: {}", e)));
        }

        Ok(config)
    }
}
