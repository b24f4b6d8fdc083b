use futures::future::join_all;
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info};

use crate::config::AppConfig;
use crate::models::yields::{YieldRecord, YieldStats};
use crate::services::fetcher::{FetchError, RetryingFetcher};
use crate::services::sources::{DefiLlamaSource, ManualSource, PendleSource, YieldSource};

#[derive(Debug, Serialize, Clone)]
pub struct YieldReport {
    pub data: Vec<YieldRecord>,
    pub stats: YieldStats,
}

/// Runs every source concurrently and merges their records in registration order.
pub struct Aggregator {
    sources: Vec<Arc<dyn YieldSource>>,
}

impl Aggregator {
    pub fn new(sources: Vec<Arc<dyn YieldSource>>) -> Self {
        Self { sources }
    }

    /// DeFiLlama, Pendle and the curated list, sharing one fetcher.
    pub fn from_config(config: &AppConfig) -> Result<Self, FetchError> {
        let fetcher = RetryingFetcher::new(&config.fetch)?;

        Ok(Self::new(vec![
            Arc::new(DefiLlamaSource::new(
                fetcher.clone(),
                config.defillama.clone(),
            )),
            Arc::new(PendleSource::new(fetcher, config.pendle.clone())),
            Arc::new(ManualSource),
        ]))
    }

    pub fn source_names(&self) -> Vec<&'static str> {
        self.sources.iter().map(|s| s.name()).collect()
    }

    pub async fn aggregate(&self) -> YieldReport {
        let started = Instant::now();

        let handles = self.sources.iter().map(|source| {
            let source = Arc::clone(source);
            tokio::spawn(async move { source.collect().await })
        });
        let outcomes = join_all(handles).await;

        let mut data = Vec::new();
        for (source, outcome) in self.sources.iter().zip(outcomes) {
            match outcome {
                Ok(records) => data.extend(records),
                Err(e) => error!("{}: task failed, contributing no records: {}", source.name(), e),
            }
        }

        let stats = YieldStats::from_records(&data);
        info!(
            "Aggregated {} record(s) from {} source(s) in {:?}",
            stats.total_opportunities,
            stats.sources.len(),
            started.elapsed()
        );

        YieldReport { data, stats }
    }
}
