//! XY API request and response models
//!
//! Outbound parameter names reproduce the API's casing exactly. Inbound
//! models treat every field the API does not guarantee as optional; a
//! missing optional field degrades fee precision instead of failing the
//! pipeline.

use serde::{Deserialize, Deserializer};

/// Query parameters for `GET /swap`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XySwapRequest {
    pub src_chain_id: u64,
    pub from_token_address: String,
    pub amount: String,
    /// Slippage in percent (the API unit), not a fraction
    pub slippage: String,
    pub dest_chain_id: u64,
    pub to_token_address: String,
    pub receive_address: String,
}

impl XySwapRequest {
    /// Parameter names and casing as the API defines them
    pub fn to_query(&self) -> Vec<(&'static str, String)> {
        vec![
            ("srcChainId", self.src_chain_id.to_string()),
            ("fromTokenAddress", self.from_token_address.clone()),
            ("amount", self.amount.clone()),
            ("slippage", self.slippage.clone()),
            ("destChainId", self.dest_chain_id.to_string()),
            ("toTokenAddress", self.to_token_address.clone()),
            ("receiveAddress", self.receive_address.clone()),
        ]
    }
}

/// Response of `GET /swap`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct XySwapResponse {
    /// Output amount in destination minimal units
    pub to_token_amount: Option<String>,
    #[serde(default, deserialize_with = "string_or_number")]
    pub status_code: Option<String>,
    pub msg: Option<String>,
    pub xy_fee: Option<XyFee>,
    pub tx: Option<XyTxData>,
    pub contract_address: Option<String>,
}

/// Relayer fee attached by XY, in display units of `symbol`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct XyFee {
    pub amount: Option<String>,
    pub symbol: Option<String>,
}

/// Prebuilt transaction returned with a quote
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct XyTxData {
    pub to: Option<String>,
    pub data: Option<String>,
    pub value: Option<String>,
}

/// The API flips between numeric and string status codes; normalize both.
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
    fn test_query_reproduces_api_casing() {
        let request = XySwapRequest {
            src_chain_id: 1,
            from_token_address: "0xdac17f958d2ee523a2206206994597c13d831ec7".to_string(),
            amount: "999000000".to_string(),
            slippage: "2".to_string(),
            dest_chain_id: 56,
            to_token_address: "0x55d398326f99059ff775485246999027b3197955".to_string(),
            receive_address: "0x0000000000000000000000000000000000000000".to_string(),
        };

        let query = request.to_query();
        let names: Vec<&str> = query.iter().map(|(name, _)| *name).collect();
        assert_eq!(
            names,
            vec![
                "srcChainId",
                "fromTokenAddress",
                "amount",
                "slippage",
                "destChainId",
                "toTokenAddress",
                "receiveAddress",
            ]
        );
    }

    #[test]
    fn test_response_tolerates_missing_fields() {
        let response: XySwapResponse = serde_json::from_str(r#"{"statusCode": 0}"#).unwrap();
        assert_eq!(response.status_code.as_deref(), Some("0"));
        assert!(response.to_token_amount.is_none());
        assert!(response.xy_fee.is_none());

        let response: XySwapResponse =
            serde_json::from_str(r#"{"statusCode": "6", "msg": "too small"}"#).unwrap();
        assert_eq!(response.status_code.as_deref(), Some("6"));
    }
}
