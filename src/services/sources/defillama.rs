use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::config::DefiLlamaConfig;
use crate::models::defillama::{Pool, PoolsResponse};
use crate::models::yields::{round2, Source, YieldRecord};
use crate::services::categorizer::categorize;
use crate::services::fetcher::RetryingFetcher;
use crate::services::sources::{SourceError, SourceResult, YieldSource};

const NAME: &str = "defillama";

/// Stablecoin pools from the DeFiLlama yields API.
pub struct DefiLlamaSource {
    fetcher: RetryingFetcher,
    config: DefiLlamaConfig,
}

impl DefiLlamaSource {
    pub fn new(fetcher: RetryingFetcher, config: DefiLlamaConfig) -> Self {
        Self { fetcher, config }
    }

    fn accepts(&self, pool: &Pool) -> bool {
        pool.stablecoin && pool.tvl_usd > self.config.min_tvl_usd && pool.apy < self.config.max_apy
    }

    /// Filters and normalizes pools, keeping upstream order.
    pub fn normalize(&self, pools: Vec<Pool>, now: DateTime<Utc>) -> Vec<YieldRecord> {
        pools
            .into_iter()
            .filter(|p| self.accepts(p))
            .take(self.config.max_pools)
            .map(|p| to_record(p, now))
            .collect()
    }
}

fn pool_url(symbol: &str, chain: &str) -> String {
    format!(
        "https://defillama.com/yields?token={}&chain={}",
        symbol, chain
    )
}

fn to_record(pool: Pool, now: DateTime<Utc>) -> YieldRecord {
    YieldRecord {
        category: categorize(&pool.project),
        url: pool_url(&pool.symbol, &pool.chain),
        protocol: pool.project,
        stablecoin: pool.symbol,
        chain: pool.chain,
        apy: round2(pool.apy),
        tvl: pool.tvl_usd,
        apy_base: Some(pool.apy_base.unwrap_or(0.0)),
        apy_reward: Some(pool.apy_reward.unwrap_or(0.0)),
        source: Source::DefiLlama,
        maturity: None,
        description: None,
        updated_at: now,
    }
}

#[async_trait]
impl YieldSource for DefiLlamaSource {
    fn name(&self) -> &'static str {
        NAME
    }

    async fn fetch(&self) -> SourceResult<Vec<YieldRecord>> {
        let body = self.fetcher.fetch_json(&self.config.pools_url).await?;
        let response: PoolsResponse =
            serde_json::from_value(body).map_err(|e| SourceError::shape(NAME, e))?;

        Ok(self.normalize(response.data, Utc::now()))
    }
}
