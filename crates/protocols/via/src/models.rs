//! Via API request and response models
//!
//! Outbound parameter names reproduce the API exactly; inbound structures
//! are partial, with explicit presence checks downstream.

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer};

/// Query parameters for `GET /api/v1/routes`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViaRoutesRequest {
    pub from_chain_id: u64,
    pub from_token_address: String,
    pub from_amount: String,
    pub to_chain_id: u64,
    pub to_token_address: String,
    pub from_address: String,
    pub multi_tx: bool,
    pub limit: u32,
}

impl ViaRoutesRequest {
    /// Parameter names and casing as the API defines them
    pub fn to_query(&self, offset: u32) -> Vec<(&'static str, String)> {
        vec![
            ("fromChainId", self.from_chain_id.to_string()),
            ("fromTokenAddress", self.from_token_address.clone()),
            ("fromAmount", self.from_amount.clone()),
            ("toChainId", self.to_chain_id.to_string()),
            ("toTokenAddress", self.to_token_address.clone()),
            ("fromAddress", self.from_address.clone()),
            ("multiTx", self.multi_tx.to_string()),
            ("limit", self.limit.to_string()),
            ("offset", offset.to_string()),
        ]
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ViaRoutesResponse {
    #[serde(default)]
    pub routes: Vec<ViaRoute>,
}

/// One discovered route
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViaRoute {
    pub route_id: Option<String>,
    /// Output in destination minimal units
    #[serde(default, deserialize_with = "string_or_number")]
    pub to_token_amount: Option<String>,
    /// Route slippage in percent
    pub slippage: Option<Decimal>,
    #[serde(default)]
    pub actions: Vec<ViaAction>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViaAction {
    pub additional_provider_fee: Option<ViaProviderFee>,
    #[serde(default)]
    pub steps: Vec<ViaStep>,
}

/// Native-coin fee charged by a bridge inside the route
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViaProviderFee {
    #[serde(default, deserialize_with = "string_or_number")]
    pub amount: Option<String>,
    pub token: Option<ViaFeeToken>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViaFeeToken {
    pub symbol: Option<String>,
    pub decimals: Option<u8>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViaStep {
    pub tool: Option<ViaTool>,
}

/// Tool executing one step; `type` distinguishes swaps from bridge hops
#[derive(Debug, Clone, Deserialize)]
pub struct ViaTool {
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub tool_type: Option<String>,
}

/// Response of `GET /api/v2/routes/pages`
#[derive(Debug, Clone, Deserialize)]
pub struct ViaPagesResponse {
    #[serde(default = "one")]
    pub pages: u32,
}

fn one() -> u32 {
    1
}

/// Response of `GET /api/v2/send/tx`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViaBuildTxResponse {
    pub to: Option<String>,
    pub data: Option<String>,
    #[serde(default, deserialize_with = "string_or_number")]
    pub value: Option<String>,
}

/// The API flips between numeric and string amounts; normalize both.
fn string_or_number<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<String>, D::Error> {
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.map(|v| match v {
        serde_json::Value::String(s) => s,
        other => other.to_string(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_tolerates_sparse_response() {
        let route: ViaRoute = serde_json::from_str(
            r#"{"routeId": "abc", "toTokenAmount": 995000000, "actions": []}"#,
        )
        .unwrap();
        assert_eq!(route.route_id.as_deref(), Some("abc"));
        assert_eq!(route.to_token_amount.as_deref(), Some("995000000"));
        assert!(route.slippage.is_none());
    }

    #[test]
    fn test_query_reproduces_api_casing() {
        let request = ViaRoutesRequest {
            from_chain_id: 1,
            from_token_address: "0x0".to_string(),
            from_amount: "10".to_string(),
            to_chain_id: 56,
            to_token_address: "0x1".to_string(),
            from_address: "0x2".to_string(),
            multi_tx: false,
            limit: 1,
        };
        let names: Vec<&str> = request.to_query(3).iter().map(|(n, _)| *n).collect();
        assert_eq!(
            names,
            vec![
                "fromChainId",
                "fromTokenAddress",
                "fromAmount",
                "toChainId",
                "toTokenAddress",
                "fromAddress",
                "multiTx",
                "limit",
                "offset",
            ]
        );
    }
}
