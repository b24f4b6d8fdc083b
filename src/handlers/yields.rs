use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use tokio::task::JoinError;
use tracing::{error, info};
use uuid::Uuid;

use crate::handlers::errors::ApiError;
use crate::models::yields::{YieldRecord, YieldStats};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct YieldsResponse {
    pub success: bool,
    pub data: Vec<YieldRecord>,
    pub stats: YieldStats,
}

pub async fn get_yields(State(state): State<AppState>) -> Result<Json<YieldsResponse>, ApiError> {
    let request_id = Uuid::new_v4();
    info!("Received yields request {}", request_id);

    // Sources already run on their own tasks; this catches a panic in the merge itself
    let aggregator = state.aggregator.clone();
    let report = tokio::spawn(async move { aggregator.aggregate().await })
        .await
        .map_err(|e| aggregation_failed(request_id, e))?;

    info!(
        "Yields request {} served {} record(s)",
        request_id, report.stats.total_opportunities
    );

    Ok(Json(YieldsResponse {
        success: true,
        data: report.data,
        stats: report.stats,
    }))
}

fn aggregation_failed(request_id: Uuid, err: JoinError) -> ApiError {
    error!("Yields request {} failed: {}", request_id, err);
    ApiError::internal("Failed to fetch yields", err)
}

/// CORS pre-flight. Headers come from the response-header middleware.
pub async fn preflight() -> StatusCode {
    StatusCode::OK
}

pub async fn method_not_allowed() -> ApiError {
    ApiError::method_not_allowed()
}
