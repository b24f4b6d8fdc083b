use async_trait::async_trait;
use tracing::{info, warn};

use crate::models::yields::YieldRecord;
use crate::services::fetcher::FetchError;

pub mod defillama;
pub mod manual;
pub mod pendle;

pub use defillama::DefiLlamaSource;
pub use manual::ManualSource;
pub use pendle::PendleSource;

pub type SourceResult<T> = Result<T, SourceError>;

#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("Fetch failed: {0}")]
    Fetch(#[from] FetchError),
    #[error("Unexpected response shape from {source_name}: {detail}")]
    Shape {
        source_name: &'static str,
        detail: String,
    },
}

impl SourceError {
    pub fn shape(source_name: &'static str, err: serde_json::Error) -> Self {
        SourceError::Shape {
            source_name,
            detail: err.to_string(),
        }
    }
}

#[async_trait]
pub trait YieldSource: Send + Sync {
    /// Short identifier used in logs and health output
    fn name(&self) -> &'static str;

    /// Fetch and normalize this source's records
    async fn fetch(&self) -> SourceResult<Vec<YieldRecord>>;

    /// Like `fetch`, but a failure is logged and yields no records.
    async fn collect(&self) -> Vec<YieldRecord> {
        match self.fetch().await {
            Ok(records) => {
                info!("{}: {} record(s)", self.name(), records.len());
                records
            }
            Err(e) => {
                warn!("{}: source failed, contributing no records: {}", self.name(), e);
                Vec::new()
            }
        }
    }
}
