// @critical: GET /yields aggregation through the router
use super::test_utils::{
    body_json, market, mount_markets, mount_pools, pool, TestServer, TEST_MAX_ATTEMPTS,
};
use axum::http::StatusCode;
use serde_json::Value;
use wiremock::{
    matchers::{method, path},
    Mock, MockServer, ResponseTemplate,
};

fn sources_of(json: &Value) -> Vec<String> {
    json["data"]
        .as_array()
        .expect("data should be an array")
        .iter()
        .map(|r| r["source"].as_str().unwrap_or_default().to_string())
        .collect()
}

#[tokio::test]
async fn test_yields_merges_all_sources_in_order() {
    let upstream = MockServer::start().await;
    mount_pools(
        &upstream,
        vec![
            pool("aave-v3", "USDC", "Ethereum", 900_000_000.0, 4.5),
            pool("uniswap-v3", "USDC-USDT", "Arbitrum", 20_000_000.0, 9.123),
            pool("dust-pool", "DAI", "Base", 10_000.0, 30.0),
        ],
    )
    .await;
    mount_markets(
        &upstream,
        1,
        vec![market("PT-sUSDe-25SEP2025", "sUSDe", 80_000_000.0, 0.095)],
    )
    .await;
    mount_markets(
        &upstream,
        42161,
        vec![market("PT-USDe-25SEP2025", "USDe", 5_000_000.0, 0.11)],
    )
    .await;

    let server = TestServer::with_upstream(&upstream);
    let response = server.call(TestServer::make_request("GET", "/yields")).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["success"], true);
    assert_eq!(
        sources_of(&json),
        vec!["defillama", "defillama", "pendle", "pendle", "midas", "gauntlet", "yieldfi"]
    );

    let data = json["data"].as_array().unwrap();
    assert_eq!(data[0]["type"], "Lending");
    assert_eq!(data[1]["type"], "Dex");
    assert_eq!(data[1]["apy"], 9.12);
    assert_eq!(data[2]["protocol"], "Pendle PT-sUSDe-25SEP2025");
    assert_eq!(data[2]["chain"], "Ethereum");
    assert_eq!(data[2]["apy"], 9.5);
    assert_eq!(data[2]["type"], "Fixed Yield");
    assert_eq!(data[3]["chain"], "Arbitrum");
    assert!(data[4]["description"].is_string());

    let stats = &json["stats"];
    assert_eq!(stats["totalOpportunities"], 7);
    let total_tvl: f64 = data.iter().map(|r| r["tvl"].as_f64().unwrap()).sum();
    assert_eq!(stats["totalTVL"].as_f64().unwrap(), total_tvl);
    let min = stats["minAPY"].as_f64().unwrap();
    let avg = stats["avgAPY"].as_f64().unwrap();
    let max = stats["maxAPY"].as_f64().unwrap();
    assert!(min <= avg && avg <= max);
    assert_eq!(
        stats["sources"],
        serde_json::json!(["defillama", "pendle", "midas", "gauntlet", "yieldfi"])
    );
    assert_eq!(stats["chains"], serde_json::json!(["Arbitrum", "Ethereum"]));
}

#[tokio::test]
async fn test_defillama_outage_still_returns_other_sources() {
    let upstream = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/pools"))
        .respond_with(ResponseTemplate::new(500))
        .expect(u64::from(TEST_MAX_ATTEMPTS))
        .mount(&upstream)
        .await;
    mount_markets(
        &upstream,
        1,
        vec![market("PT-USDC-25SEP2025", "USDC", 3_000_000.0, 0.06)],
    )
    .await;
    mount_markets(&upstream, 42161, vec![]).await;

    let server = TestServer::with_upstream(&upstream);
    let response = server.call(TestServer::make_request("GET", "/yields")).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["success"], true);
    assert_eq!(
        sources_of(&json),
        vec!["pendle", "midas", "gauntlet", "yieldfi"]
    );
    assert_eq!(json["stats"]["totalOpportunities"], 4);
}

#[tokio::test]
async fn test_unreachable_upstreams_leave_curated_records() {
    let server = TestServer::with_urls(
        "http://127.0.0.1:1/pools".to_string(),
        "http://127.0.0.1:1".to_string(),
    );

    let response = server.call(TestServer::make_request("GET", "/yields")).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["success"], true);
    assert_eq!(sources_of(&json), vec!["midas", "gauntlet", "yieldfi"]);
    assert_eq!(json["stats"]["chains"], serde_json::json!(["Ethereum"]));
}

#[tokio::test]
async fn test_malformed_upstream_payloads_are_ignored() {
    let upstream = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/pools"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"data": "nope"})))
        .expect(1)
        .mount(&upstream)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/1/markets"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
        .mount(&upstream)
        .await;
    mount_markets(
        &upstream,
        42161,
        vec![market("PT-USDC-ARB", "USDC", 2_000_000.0, 0.05)],
    )
    .await;

    let server = TestServer::with_upstream(&upstream);
    let response = server.call(TestServer::make_request("GET", "/yields")).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(
        sources_of(&json),
        vec!["pendle", "midas", "gauntlet", "yieldfi"]
    );
}
