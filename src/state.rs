use crate::config::AppConfig;
use crate::services::aggregator::Aggregator;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub aggregator: Arc<Aggregator>,
}
