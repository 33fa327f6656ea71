//! Provider adapter contract

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use causeway_core::{BlockchainName, CalculationError, Token, TokenAmount};

use crate::options::CrossChainOptions;

/// Closed set of route providers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProviderKind {
    Stargate,
    Xy,
    Via,
    UniswapV2,
}

impl ProviderKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Stargate => "stargate",
            Self::Xy => "xy",
            Self::Via => "via",
            Self::UniswapV2 => "uniswap-v2",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A cross-chain route provider.
///
/// `calculate` is total at this boundary: every internal failure (transport,
/// decode, revert) is caught and classified into a `CalculationError`.
/// Callers may rely on it never panicking for well-formed inputs.
#[async_trait]
pub trait CrossChainProvider: Send + Sync {
    type Trade;

    fn kind(&self) -> ProviderKind;

    /// Static allow-list membership. Must be consulted before any network
    /// call is issued for a pair.
    fn is_supported_blockchain(&self, chain: BlockchainName) -> bool;

    fn are_supported_blockchains(&self, from: BlockchainName, to: BlockchainName) -> bool {
        self.is_supported_blockchain(from) && self.is_supported_blockchain(to)
    }

    async fn calculate(
        &self,
        from: &TokenAmount,
        to: &Token,
        options: &CrossChainOptions,
    ) -> Result<Self::Trade, CalculationError>;
}
