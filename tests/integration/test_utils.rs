// Test utilities: router wired to mock upstreams
use axum::{
    body::{to_bytes, Body},
    http::Request,
    Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::util::ServiceExt;
use wiremock::{
    matchers::{method, path},
    Mock, MockServer, ResponseTemplate,
};

use stablecoin_yields::config::{
    AppConfig, DefiLlamaConfig, FetchConfig, LogConfig, PendleConfig, ServerConfig,
};
use stablecoin_yields::router::create_app_router;
use stablecoin_yields::services::aggregator::Aggregator;
use stablecoin_yields::state::AppState;

/// Reasonable body size limit for tests (1MB)
pub const TEST_BODY_LIMIT: usize = 1024 * 1024;
pub const TEST_MAX_ATTEMPTS: u32 = 3;

pub struct TestServer {
    pub app: Router,
}

impl TestServer {
    /// Points every network source at `upstream`.
    pub fn with_upstream(upstream: &MockServer) -> Self {
        Self::with_urls(
            format!("{}/pools", upstream.uri()),
            upstream.uri(),
        )
    }

    pub fn with_urls(pools_url: String, pendle_base_url: String) -> Self {
        let config = AppConfig {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 0, // Let OS assign port
            },
            log: LogConfig {
                level: "error".to_string(), // Quiet during tests
                format: "pretty".to_string(),
            },
            fetch: FetchConfig {
                max_attempts: TEST_MAX_ATTEMPTS,
                base_delay_ms: 10,
                timeout_secs: 5,
            },
            defillama: DefiLlamaConfig {
                pools_url,
                ..DefiLlamaConfig::default()
            },
            pendle: PendleConfig {
                api_base_url: pendle_base_url,
                ..PendleConfig::default()
            },
        };

        let aggregator =
            Aggregator::from_config(&config).expect("Failed to create aggregator");

        let state = AppState {
            config: Arc::new(config),
            aggregator: Arc::new(aggregator),
        };

        Self {
            app: create_app_router(state),
        }
    }

    pub async fn call(&self, req: Request<Body>) -> axum::response::Response {
        self.app.clone().oneshot(req).await.unwrap()
    }

    pub fn make_request(method: &str, uri: &str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap()
    }
}

pub async fn body_bytes(response: axum::response::Response) -> Vec<u8> {
    to_bytes(response.into_body(), TEST_BODY_LIMIT)
        .await
        .expect("Failed to read response body")
        .to_vec()
}

pub async fn body_json(response: axum::response::Response) -> Value {
    let bytes = body_bytes(response).await;
    serde_json::from_slice(&bytes).expect("Response is not valid JSON")
}

pub fn pool(project: &str, symbol: &str, chain: &str, tvl: f64, apy: f64) -> Value {
    json!({
        "project": project,
        "symbol": symbol,
        "chain": chain,
        "stablecoin": true,
        "tvlUsd": tvl,
        "apy": apy,
        "apyBase": apy,
        "apyReward": 0.0
    })
}

pub fn market(pt: &str, underlying: &str, liquidity: f64, implied_apy: f64) -> Value {
    json!({
        "pt": {"symbol": pt},
        "underlyingAsset": {"symbol": underlying},
        "totalActiveLiquidity": liquidity,
        "impliedApy": implied_apy,
        "expiry": "2025-09-25T00:00:00.000Z"
    })
}

pub async fn mount_pools(server: &MockServer, pools: Vec<Value>) {
    Mock::given(method("GET"))
        .and(path("/pools"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": pools })))
        .mount(server)
        .await;
}

pub async fn mount_markets(server: &MockServer, chain_id: u64, markets: Vec<Value>) {
    Mock::given(method("GET"))
        .and(path(format!("/v1/{chain_id}/markets")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "results": markets })))
        .mount(server)
        .await;
}
