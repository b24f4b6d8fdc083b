use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::future::join_all;
use tracing::warn;

use crate::config::PendleConfig;
use crate::models::pendle::{Market, MarketsResponse};
use crate::models::yields::{round2, Source, YieldRecord};
use crate::services::fetcher::RetryingFetcher;
use crate::services::sources::{SourceError, SourceResult, YieldSource};

const NAME: &str = "pendle";
const FIXED_YIELD: &str = "Fixed Yield";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendleChain {
    pub id: u64,
    pub name: &'static str,
}

pub const CHAINS: &[PendleChain] = &[
    PendleChain {
        id: 1,
        name: "Ethereum",
    },
    PendleChain {
        id: 42161,
        name: "Arbitrum",
    },
];

/// USD-denominated fixed-yield markets listed on Pendle.
pub struct PendleSource {
    fetcher: RetryingFetcher,
    config: PendleConfig,
}

impl PendleSource {
    pub fn new(fetcher: RetryingFetcher, config: PendleConfig) -> Self {
        Self { fetcher, config }
    }

    fn markets_url(&self, chain: &PendleChain) -> String {
        format!(
            "{}/v1/{}/markets",
            self.config.api_base_url.trim_end_matches('/'),
            chain.id
        )
    }

    fn accepts(&self, market: &Market) -> bool {
        market.pt.is_some()
            && market
                .underlying_symbol()
                .is_some_and(|symbol| symbol.contains("USD"))
            && market.liquidity() > self.config.min_liquidity_usd
    }

    /// Filters and normalizes one chain's markets, keeping upstream order.
    pub fn normalize(
        &self,
        chain: &PendleChain,
        markets: Vec<Market>,
        now: DateTime<Utc>,
    ) -> Vec<YieldRecord> {
        markets
            .into_iter()
            .filter(|m| self.accepts(m))
            .take(self.config.max_markets_per_chain)
            .filter_map(|m| self.to_record(chain, m, now))
            .collect()
    }

    fn to_record(
        &self,
        chain: &PendleChain,
        market: Market,
        now: DateTime<Utc>,
    ) -> Option<YieldRecord> {
        let protocol = format!("Pendle {}", market.pt_symbol()?);
        let stablecoin = market.underlying_symbol()?.to_string();
        let tvl = market.liquidity();
        let apy = round2(market.implied_apy.unwrap_or(0.0) * 100.0);

        Some(YieldRecord {
            protocol,
            stablecoin,
            chain: chain.name.to_string(),
            apy,
            tvl,
            apy_base: None,
            apy_reward: None,
            category: FIXED_YIELD.to_string(),
            source: Source::Pendle,
            url: self.config.app_url.clone(),
            maturity: market.expiry,
            description: None,
            updated_at: now,
        })
    }

    async fn fetch_chain(&self, chain: &PendleChain) -> SourceResult<Vec<YieldRecord>> {
        let body = self.fetcher.fetch_json(&self.markets_url(chain)).await?;
        let response: MarketsResponse =
            serde_json::from_value(body).map_err(|e| SourceError::shape(NAME, e))?;

        Ok(self.normalize(chain, response.results, Utc::now()))
    }
}

#[async_trait]
impl YieldSource for PendleSource {
    fn name(&self) -> &'static str {
        NAME
    }

    async fn fetch(&self) -> SourceResult<Vec<YieldRecord>> {
        let per_chain = join_all(CHAINS.iter().map(|chain| self.fetch_chain(chain))).await;

        let mut records = Vec::new();
        for (chain, result) in CHAINS.iter().zip(per_chain) {
            match result {
                Ok(chain_records) => records.extend(chain_records),
                Err(e) => warn!("pendle: skipping {} (chain {}): {}", chain.name, chain.id, e),
            }
        }
        Ok(records)
    }
}
