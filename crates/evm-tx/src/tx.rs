//! Transaction request type
//!
//! The payload handed to a wallet for submission, or returned as-is from
//! `encode` for callers that batch legs themselves.

use num_bigint::BigUint;
use num_traits::Zero;
use serde::{Deserialize, Serialize};

use causeway_core::Address;

/// An unsubmitted EVM transaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionRequest {
    pub to: Address,
    /// ABI-encoded calldata
    #[serde(with = "hex_data")]
    pub data: Vec<u8>,
    /// Native value in minimal units
    #[serde(with = "wei_string")]
    pub value: BigUint,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gas: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gas_price: Option<u64>,
}

impl TransactionRequest {
    pub fn new(to: Address, data: Vec<u8>) -> Self {
        Self {
            to,
            data,
            value: BigUint::zero(),
            gas: None,
            gas_price: None,
        }
    }

    pub fn with_value(mut self, value: BigUint) -> Self {
        self.value = value;
        self
    }

    pub fn with_gas(mut self, gas: Option<u64>, gas_price: Option<u64>) -> Self {
        self.gas = gas;
        self.gas_price = gas_price;
        self
    }

    /// Calldata as `0x`-prefixed hex, the shape JSON-RPC expects
    pub fn data_hex(&self) -> String {
        format!("0x{}", hex::encode(&self.data))
    }
}

mod hex_data {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(data: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format!("0x{}", hex::encode(data)))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let s = String::deserialize(deserializer)?;
        hex::decode(s.trim_start_matches("0x")).map_err(serde::de::Error::custom)
    }
}

mod wei_string {
    use num_bigint::BigUint;
    use serde::{Deserialize, Deserializer, Serializer};
    use std::str::FromStr;

    pub fn serialize<S: Serializer>(value: &BigUint, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<BigUint, D::Error> {
        let s = String::deserialize(deserializer)?;
        BigUint::from_str(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_serde_roundtrip() {
        let tx = TransactionRequest::new(
            Address::from_str("0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed").unwrap(),
            vec![0xa9, 0x05, 0x9c, 0xbb],
        )
        .with_value(BigUint::from(123_456u64));

        let json = serde_json::to_string(&tx).unwrap();
        assert!(json.contains("\"0xa9059cbb\""));
        assert!(json.contains("\"123456\""));

        let parsed: TransactionRequest = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, tx);
    }

    #[test]
    fn test_data_hex() {
        let tx = TransactionRequest::new(Address::ZERO, vec![0xde, 0xad]);
        assert_eq!(tx.data_hex(), "0xdead");
    }
}
