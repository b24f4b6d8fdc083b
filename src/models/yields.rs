use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeSet;

/// Which adapter produced a record.
#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    DefiLlama,
    Pendle,
    Midas,
    Gauntlet,
    YieldFi,
}

/// One normalized yield opportunity.
#[derive(Debug, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct YieldRecord {
    pub protocol: String,
    pub stablecoin: String,
    pub chain: String,
    pub apy: f64,
    pub tvl: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub apy_base: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub apy_reward: Option<f64>,
    #[serde(rename = "type")]
    pub category: String,
    pub source: Source,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maturity: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub updated_at: DateTime<Utc>,
}

/// Aggregate view over a set of records.
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct YieldStats {
    #[serde(rename = "totalOpportunities")]
    pub total_opportunities: usize,
    #[serde(rename = "totalTVL")]
    pub total_tvl: f64,
    #[serde(rename = "avgAPY")]
    pub avg_apy: f64,
    #[serde(rename = "maxAPY")]
    pub max_apy: f64,
    #[serde(rename = "minAPY")]
    pub min_apy: f64,
    pub sources: BTreeSet<Source>,
    pub chains: BTreeSet<String>,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

impl YieldStats {
    /// Computes statistics over `records`. APY figures are zero for an empty set.
    pub fn from_records(records: &[YieldRecord]) -> Self {
        let total_tvl = records.iter().map(|r| r.tvl).sum();

        let (avg_apy, max_apy, min_apy) = if records.is_empty() {
            (0.0, 0.0, 0.0)
        } else {
            let sum: f64 = records.iter().map(|r| r.apy).sum();
            let max = records.iter().map(|r| r.apy).fold(f64::MIN, f64::max);
            let min = records.iter().map(|r| r.apy).fold(f64::MAX, f64::min);
            // Summation error can push the mean a hair outside [min, max].
            let avg = (sum / records.len() as f64).clamp(min, max);
            (avg, max, min)
        };

        Self {
            total_opportunities: records.len(),
            total_tvl,
            avg_apy,
            max_apy,
            min_apy,
            sources: records.iter().map(|r| r.source).collect(),
            chains: records.iter().map(|r| r.chain.clone()).collect(),
            updated_at: Utc::now(),
        }
    }
}

/// Rounds to two decimal places.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
