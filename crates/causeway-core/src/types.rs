//! Core type definitions for Causeway

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tiny_keccak::{Hasher, Keccak};

use crate::errors::AddressParseError;

/// Supported EVM networks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BlockchainName {
    Ethereum,
    BinanceSmartChain,
    Polygon,
    Avalanche,
    Fantom,
    Arbitrum,
    Optimism,
    Base,
    Metis,
}

/// Native coin metadata for a network
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NativeCoin {
    pub symbol: &'static str,
    pub decimals: u8,
}

impl BlockchainName {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ethereum => "ethereum",
            Self::BinanceSmartChain => "binance-smart-chain",
            Self::Polygon => "polygon",
            Self::Avalanche => "avalanche",
            Self::Fantom => "fantom",
            Self::Arbitrum => "arbitrum",
            Self::Optimism => "optimism",
            Self::Base => "base",
            Self::Metis => "metis",
        }
    }

    /// EVM chain id
    pub fn chain_id(&self) -> u64 {
        match self {
            Self::Ethereum => 1,
            Self::BinanceSmartChain => 56,
            Self::Polygon => 137,
            Self::Avalanche => 43114,
            Self::Fantom => 250,
            Self::Arbitrum => 42161,
            Self::Optimism => 10,
            Self::Base => 8453,
            Self::Metis => 1088,
        }
    }

    /// Native coin of the network. All supported networks use 18 decimals.
    pub fn native_coin(&self) -> NativeCoin {
        let symbol = match self {
            Self::Ethereum | Self::Arbitrum | Self::Optimism | Self::Base => "ETH",
            Self::BinanceSmartChain => "BNB",
            Self::Polygon => "MATIC",
            Self::Avalanche => "AVAX",
            Self::Fantom => "FTM",
            Self::Metis => "METIS",
        };
        NativeCoin {
            symbol,
            decimals: 18,
        }
    }
}

impl fmt::Display for BlockchainName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// EVM account or contract address (20 bytes)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Address(pub [u8; 20]);

impl Address {
    /// Zero address, used as the native-asset sentinel and as an empty
    /// placeholder in contract call arguments.
    pub const ZERO: Address = Address([0u8; 20]);

    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 20]
    }

    /// Lowercase hex with `0x` prefix
    pub fn to_lowercase_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }

    /// EIP-55 mixed-case checksum representation
    pub fn to_checksum(&self) -> String {
        let lower = hex::encode(self.0);
        let mut hash = [0u8; 32];
        let mut keccak = Keccak::v256();
        keccak.update(lower.as_bytes());
        keccak.finalize(&mut hash);

        let mut out = String::with_capacity(42);
        out.push_str("0x");
        for (i, ch) in lower.chars().enumerate() {
            let nibble = if i % 2 == 0 {
                hash[i / 2] >> 4
            } else {
                hash[i / 2] & 0x0f
            };
            if ch.is_ascii_alphabetic() && nibble >= 8 {
                out.push(ch.to_ascii_uppercase());
            } else {
                out.push(ch);
            }
        }
        out
    }
}

impl FromStr for Address {
    type Err = AddressParseError;

    /// Parses a `0x`-prefixed 40-hex-digit address. All-lowercase and
    /// all-uppercase inputs are accepted as-is; mixed-case inputs must
    /// carry a valid EIP-55 checksum.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex_part = s
            .strip_prefix("0x")
            .or_else(|| s.strip_prefix("0X"))
            .ok_or_else(|| AddressParseError::MissingPrefix(s.to_string()))?;
        if hex_part.len() != 40 {
            return Err(AddressParseError::WrongLength(s.to_string()));
        }

        let mut bytes = [0u8; 20];
        hex::decode_to_slice(hex_part.to_ascii_lowercase(), &mut bytes)
            .map_err(|_| AddressParseError::InvalidHex(s.to_string()))?;
        let address = Address(bytes);

        let has_upper = hex_part.chars().any(|c| c.is_ascii_uppercase());
        let has_lower = hex_part.chars().any(|c| c.is_ascii_lowercase());
        if has_upper && has_lower && address.to_checksum()[2..] != *hex_part {
            return Err(AddressParseError::BadChecksum(s.to_string()));
        }

        Ok(address)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_checksum())
    }
}

impl Serialize for Address {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_checksum())
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Address::from_str(&s).map_err(serde::de::Error::custom)
    }
}

/// Transaction hash (32 bytes, hex-encoded)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TxHash(pub String);

impl TxHash {
    pub fn new(hash: impl Into<String>) -> Self {
        Self(hash.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TxHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
