use axum::{middleware, routing::get, Router};

use crate::handlers::{health, yields};
use crate::middleware::response_headers::response_headers_middleware;
use crate::state::AppState;

pub fn create_app_router(state: AppState) -> Router {
    // axum answers HEAD with the GET handler unless HEAD has its own route
    let yields_route = get(yields::get_yields)
        .head(yields::method_not_allowed)
        .options(yields::preflight)
        .fallback(yields::method_not_allowed);

    Router::new()
        .route("/health", get(health::health_check))
        .route("/yields", yields_route)
        .layer(middleware::from_fn(response_headers_middleware))
        .layer(tower_http::compression::CompressionLayer::new())
        .layer(tower_http::trace::TraceLayer::new_for_http())
        .with_state(state)
}
