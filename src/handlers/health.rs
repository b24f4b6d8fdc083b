use axum::{extract::State, response::IntoResponse, Json};
use serde_json::json;

use crate::state::AppState;

const CACHE_CONTROL_NO_CACHE: &str = "no-cache, no-store, must-revalidate";

pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    (
        [(
            axum::http::header::CACHE_CONTROL,
            axum::http::HeaderValue::from_static(CACHE_CONTROL_NO_CACHE),
        )],
        Json(json!({
            "status": "ok",
            "version": env!("CARGO_PKG_VERSION"),
            "timestamp": chrono::Utc::now().to_rfc3339(),
            "sources": state.aggregator.source_names(),
            "fetch": {
                "max_attempts": state.config.fetch.max_attempts,
                "base_delay_ms": state.config.fetch.base_delay_ms
            }
        })),
    )
}
