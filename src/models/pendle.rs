use serde::Deserialize;

/// Response of the Pendle `/v1/{chainId}/markets` endpoint.
#[derive(Debug, Deserialize, Clone)]
pub struct MarketsResponse {
    pub results: Vec<Market>,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Market {
    #[serde(default)]
    pub pt: Option<TokenRef>,
    #[serde(default)]
    pub underlying_asset: Option<TokenRef>,
    #[serde(default)]
    pub total_active_liquidity: Option<f64>,
    #[serde(default)]
    pub implied_apy: Option<f64>,
    #[serde(default)]
    pub expiry: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct TokenRef {
    pub symbol: String,
}

impl Market {
    pub fn underlying_symbol(&self) -> Option<&str> {
        self.underlying_asset.as_ref().map(|t| t.symbol.as_str())
    }

    pub fn pt_symbol(&self) -> Option<&str> {
        self.pt.as_ref().map(|t| t.symbol.as_str())
    }

    pub fn liquidity(&self) -> f64 {
        self.total_active_liquidity.unwrap_or(0.0)
    }
}
