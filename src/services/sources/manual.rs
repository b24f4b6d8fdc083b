use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::models::yields::{Source, YieldRecord};
use crate::services::sources::{SourceResult, YieldSource};

struct CuratedEntry {
    protocol: &'static str,
    stablecoin: &'static str,
    chain: &'static str,
    apy: f64,
    tvl: f64,
    category: &'static str,
    source: Source,
    url: &'static str,
    description: &'static str,
}

// Institutional / RWA products with no public yields API.
const CURATED: [CuratedEntry; 3] = [
    CuratedEntry {
        protocol: "Midas mTBILL",
        stablecoin: "mTBILL",
        chain: "Ethereum",
        apy: 4.85,
        tvl: 95_000_000.0,
        category: "RWA",
        source: Source::Midas,
        url: "https://midas.app/mtbill",
        description: "Tokenized short-term US Treasury bills",
    },
    CuratedEntry {
        protocol: "Gauntlet USDC Prime",
        stablecoin: "USDC",
        chain: "Ethereum",
        apy: 6.2,
        tvl: 180_000_000.0,
        category: "Risk-Managed",
        source: Source::Gauntlet,
        url: "https://app.morpho.org/ethereum/vault/gtUSDC",
        description: "Risk-curated USDC lending vault on Morpho",
    },
    CuratedEntry {
        protocol: "YieldFi yUSD",
        stablecoin: "yUSD",
        chain: "Ethereum",
        apy: 11.5,
        tvl: 40_000_000.0,
        category: "Multi-Strategy",
        source: Source::YieldFi,
        url: "https://yield.fi",
        description: "Delta-neutral multi-strategy stablecoin vault",
    },
];

/// Hand-curated records. No I/O.
#[derive(Debug, Default, Clone, Copy)]
pub struct ManualSource;

impl ManualSource {
    pub fn records(&self, now: DateTime<Utc>) -> Vec<YieldRecord> {
        CURATED
            .iter()
            .map(|e| YieldRecord {
                protocol: e.protocol.to_string(),
                stablecoin: e.stablecoin.to_string(),
                chain: e.chain.to_string(),
                apy: e.apy,
                tvl: e.tvl,
                apy_base: None,
                apy_reward: None,
                category: e.category.to_string(),
                source: e.source,
                url: e.url.to_string(),
                maturity: None,
                description: Some(e.description.to_string()),
                updated_at: now,
            })
            .collect()
    }
}

#[async_trait]
impl YieldSource for ManualSource {
    fn name(&self) -> &'static str {
        "manual"
    }

    async fn fetch(&self) -> SourceResult<Vec<YieldRecord>> {
        Ok(self.records(Utc::now()))
    }
}
