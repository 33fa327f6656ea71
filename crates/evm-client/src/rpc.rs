//! JSON-RPC implementation of `EvmPublic`
//!
//! One instance per network, pointed at that network's RPC endpoint.

use std::time::Duration;

use async_trait::async_trait;
use num_bigint::BigUint;
use num_traits::Num;
use serde_json::{json, Value};

use causeway_core::{Address, BlockchainName, ClientError};
use evm_tx::abi::{decode_words, WORD};

use crate::{ContractCall, EvmPublic};

/// Read client talking to a JSON-RPC node
pub struct JsonRpcPublic {
    blockchain: BlockchainName,
    rpc_url: String,
    client: reqwest::Client,
}

impl JsonRpcPublic {
    pub fn new(
        blockchain: BlockchainName,
        rpc_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, ClientError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ClientError::Http(e.to_string()))?;
        Ok(Self {
            blockchain,
            rpc_url: rpc_url.into(),
            client,
        })
    }

    async fn request(&self, method: &str, params: Value) -> Result<String, ClientError> {
        let body = json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": method,
            "params": params,
        });

        let response: Value = self
            .client
            .post(&self.rpc_url)
            .json(&body)
            .send()
            .await
            .map_err(|e| ClientError::Http(e.to_string()))?
            .json()
            .await
            .map_err(|e| ClientError::Decode(e.to_string()))?;

        if let Some(error) = response.get("error") {
            return Err(ClientError::Rpc {
                code: error["code"].as_i64().unwrap_or(0),
                message: error["message"].as_str().unwrap_or("unknown").to_string(),
            });
        }

        response["result"]
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| ClientError::UnexpectedResponse("missing result field".to_string()))
    }

    async fn request_quantity(&self, method: &str, params: Value) -> Result<BigUint, ClientError> {
        let result = self.request(method, params).await?;
        parse_quantity(&result)
    }
}

#[async_trait]
impl EvmPublic for JsonRpcPublic {
    fn blockchain(&self) -> BlockchainName {
        self.blockchain
    }

    async fn call(&self, call: &ContractCall) -> Result<Vec<[u8; WORD]>, ClientError> {
        let params = json!([
            {
                "to": call.to.to_lowercase_hex(),
                "data": format!("0x{}", hex::encode(&call.data)),
            },
            "latest",
        ]);
        let result = self.request("eth_call", params).await?;
        let bytes = hex::decode(result.trim_start_matches("0x"))
            .map_err(|e| ClientError::Decode(e.to_string()))?;
        decode_words(&bytes).map_err(|e| ClientError::Decode(e.to_string()))
    }

    async fn native_balance(&self, owner: &Address) -> Result<BigUint, ClientError> {
        self.request_quantity(
            "eth_getBalance",
            json!([owner.to_lowercase_hex(), "latest"]),
        )
        .await
    }

    async fn gas_price(&self) -> Result<BigUint, ClientError> {
        self.request_quantity("eth_gasPrice", json!([])).await
    }

    async fn estimate_gas(
        &self,
        from: &Address,
        tx: &evm_tx::TransactionRequest,
    ) -> Result<BigUint, ClientError> {
        let params = json!([{
            "from": from.to_lowercase_hex(),
            "to": tx.to.to_lowercase_hex(),
            "data": tx.data_hex(),
            "value": format!("0x{:x}", tx.value),
        }]);
        self.request_quantity("eth_estimateGas", params).await
    }
}

fn parse_quantity(hex_quantity: &str) -> Result<BigUint, ClientError> {
    let digits = hex_quantity.trim_start_matches("0x");
    if digits.is_empty() {
        return Ok(BigUint::from(0u8));
    }
    BigUint::from_str_radix(digits, 16)
        .map_err(|e| ClientError::Decode(format!("bad quantity {hex_quantity}: {e}")))
}
