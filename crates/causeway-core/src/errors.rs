//! Error types for Causeway
//!
//! `CalculationError` is the only error kind that crosses a provider's
//! public boundary: `calculate` implementations catch everything internal
//! and classify it here. Execution (approve/swap) raises `ExecutionError`
//! directly; execution is a single directly-awaited user action, not a
//! fan-out.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::BlockchainName;

/// Why a provider produced no trade for a token pair
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum CalculationError {
    /// No viable route, pool or pair. Expected and non-fatal.
    #[error("Tokens are not supported")]
    NotSupportedTokens,

    /// The upstream protocol reported a liquidity depth problem
    #[error("Insufficient liquidity")]
    InsufficientLiquidity,

    /// The upstream protocol requires a larger input
    #[error("Minimum amount is {min} {token_symbol}")]
    MinAmount { min: Decimal, token_symbol: String },

    /// Anything unclassified: network failure, decode failure, unexpected revert
    #[error("Unknown error: {0}")]
    Unknown(String),
}

/// Pre-flight and submission failures on the execution path
#[derive(Debug, Error)]
pub enum ExecutionError {
    #[error("Wallet is not connected")]
    WalletNotConnected,

    #[error("Invalid from address: {address}")]
    WrongFromAddress { address: String },

    #[error("Invalid receiver address: {address}")]
    WrongReceiverAddress { address: String },

    #[error("Wallet is on {actual}, trade requires {expected}")]
    WrongBlockchain {
        expected: BlockchainName,
        actual: BlockchainName,
    },

    #[error("Insufficient {token_symbol} balance: need {required}, have {available}")]
    InsufficientBalance {
        required: Decimal,
        available: Decimal,
        token_symbol: String,
    },

    #[error("Missing required option: {0}")]
    MissingParam(&'static str),

    #[error(transparent)]
    Client(#[from] ClientError),
}

/// Transport-level failures from HTTP and RPC collaborators
#[derive(Debug, Clone, Error)]
pub enum ClientError {
    #[error("HTTP request failed: {0}")]
    Http(String),

    #[error("RPC error {code}: {message}")]
    Rpc { code: i64, message: String },

    #[error("Failed to decode response: {0}")]
    Decode(String),

    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),

    #[error("No RPC client configured for {0}")]
    MissingNetwork(BlockchainName),
}

/// Malformed address input
#[derive(Debug, Clone, Error)]
pub enum AddressParseError {
    #[error("Address must start with 0x: {0}")]
    MissingPrefix(String),

    #[error("Address must be 20 bytes: {0}")]
    WrongLength(String),

    #[error("Address is not valid hex: {0}")]
    InvalidHex(String),

    #[error("Address checksum mismatch: {0}")]
    BadChecksum(String),
}

/// Classify a transport or contract failure into a calculation outcome.
///
/// Upstream revert reasons arrive as free-form strings; the match is on
/// normalized substrings so the rest of the pipeline never inspects raw
/// messages.
pub fn classify_error(err: &ClientError) -> CalculationError {
    let message = match err {
        ClientError::Rpc { message, .. } => message.to_lowercase(),
        other => other.to_string().to_lowercase(),
    };

    if message.contains("not supported") || message.contains("no route") {
        CalculationError::NotSupportedTokens
    } else if message.contains("insufficient liquidity") || message.contains("liquidity depth") {
        CalculationError::InsufficientLiquidity
    } else {
        CalculationError::Unknown(err.to_string())
    }
}

impl From<ClientError> for CalculationError {
    fn from(err: ClientError) -> Self {
        classify_error(&err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_revert_reasons() {
        let err = ClientError::Rpc {
            code: 3,
            message: "execution reverted: Tokens are NOT supported".to_string(),
        };
        assert_eq!(classify_error(&err), CalculationError::NotSupportedTokens);

        let err = ClientError::Rpc {
            code: 3,
            message: "execution reverted: insufficient liquidity minted".to_string(),
        };
        assert_eq!(classify_error(&err), CalculationError::InsufficientLiquidity);
    }

    #[test]
    fn test_unclassified_becomes_unknown() {
        let err = ClientError::Http("connection reset".to_string());
        match classify_error(&err) {
            CalculationError::Unknown(msg) => assert!(msg.contains("connection reset")),
            other => panic!("expected Unknown, got {other:?}"),
        }
    }

    #[test]
    fn test_min_amount_carries_details() {
        let err = CalculationError::MinAmount {
            min: Decimal::new(105, 1),
            token_symbol: "USDC".to_string(),
        };
        assert_eq!(err.to_string(), "Minimum amount is 10.5 USDC");
    }
}
