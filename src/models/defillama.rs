use serde::{Deserialize, Deserializer};

/// Response of the DeFiLlama `/pools` endpoint.
#[derive(Debug, Deserialize, Clone)]
pub struct PoolsResponse {
    pub data: Vec<Pool>,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Pool {
    #[serde(default, deserialize_with = "null_as_default")]
    pub project: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub symbol: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub chain: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub stablecoin: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tvl_usd: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub apy: f64,
    #[serde(default)]
    pub apy_base: Option<f64>,
    #[serde(default)]
    pub apy_reward: Option<f64>,
}

// DeFiLlama reports `null` rather than omitting fields for pools without data
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
