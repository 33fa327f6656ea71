//! Closed trade facade
//!
//! One variant per provider; accessors and execution delegate to the
//! underlying trade. Callers match on the variant only when they need
//! provider-specific payload.

use rust_decimal::Decimal;

use causeway_core::{ExecutionError, FeeInfo, TokenAmount, TxHash};
use cross_chain::{ApproveOptions, EncodeOptions, ProviderKind, SwapOptions};
use evm_tx::TransactionRequest;
use stargate::StargateTrade;
use via::ViaTrade;
use xy::XyTrade;

/// A quoted cross-chain trade from any enabled provider
#[derive(Clone)]
pub enum CrossChainTrade {
    Stargate(StargateTrade),
    Xy(XyTrade),
    Via(ViaTrade),
}

impl CrossChainTrade {
    pub fn provider(&self) -> ProviderKind {
        match self {
            Self::Stargate(_) => ProviderKind::Stargate,
            Self::Xy(_) => ProviderKind::Xy,
            Self::Via(_) => ProviderKind::Via,
        }
    }

    pub fn from(&self) -> &TokenAmount {
        match self {
            Self::Stargate(trade) => trade.from(),
            Self::Xy(trade) => trade.from(),
            Self::Via(trade) => trade.from(),
        }
    }

    pub fn to(&self) -> &TokenAmount {
        match self {
            Self::Stargate(trade) => trade.to(),
            Self::Xy(trade) => trade.to(),
            Self::Via(trade) => trade.to(),
        }
    }

    /// Slippage-adjusted floor on the output amount
    pub fn to_amount_min(&self) -> Decimal {
        match self {
            Self::Stargate(trade) => trade.to_amount_min(),
            Self::Xy(trade) => trade.to_amount_min(),
            Self::Via(trade) => trade.to_amount_min(),
        }
    }

    pub fn fee_info(&self) -> &FeeInfo {
        match self {
            Self::Stargate(trade) => trade.fee_info(),
            Self::Xy(trade) => trade.fee_info(),
            Self::Via(trade) => trade.fee_info(),
        }
    }

    /// Fixed + crypto fee in the source network's native coin
    pub fn network_fee(&self) -> Decimal {
        self.fee_info().network_fee()
    }

    pub fn price_impact(&self) -> Option<Decimal> {
        match self {
            Self::Stargate(trade) => trade.price_impact(),
            Self::Xy(trade) => trade.price_impact(),
            Self::Via(trade) => trade.price_impact(),
        }
    }

    /// True when the spender's live allowance does not cover the input
    pub async fn need_approve(&self) -> Result<bool, ExecutionError> {
        match self {
            Self::Stargate(trade) => trade.need_approve().await,
            Self::Xy(trade) => trade.need_approve().await,
            Self::Via(trade) => trade.need_approve().await,
        }
    }

    pub async fn approve(&self, options: &ApproveOptions) -> Result<TxHash, ExecutionError> {
        match self {
            Self::Stargate(trade) => trade.approve(options).await,
            Self::Xy(trade) => trade.approve(options).await,
            Self::Via(trade) => trade.approve(options).await,
        }
    }

    /// Build the raw transaction without submitting
    pub async fn encode(
        &self,
        options: &EncodeOptions,
    ) -> Result<TransactionRequest, ExecutionError> {
        match self {
            Self::Stargate(trade) => trade.encode(options),
            Self::Xy(trade) => trade.encode(options).await,
            Self::Via(trade) => trade.encode(options).await,
        }
    }

    /// Pre-flight, approve when needed, then submit through the wallet
    pub async fn swap(&self, options: &SwapOptions) -> Result<TxHash, ExecutionError> {
        match self {
            Self::Stargate(trade) => trade.swap(options).await,
            Self::Xy(trade) => trade.swap(options).await,
            Self::Via(trade) => trade.swap(options).await,
        }
    }

    /// Net USD value of the output when priced, raw amount otherwise.
    /// The ranking key used by the calculation manager.
    pub(crate) fn output_value(&self) -> Decimal {
        let to = self.to();
        to.usd_value().unwrap_or_else(|| to.amount())
    }
}
