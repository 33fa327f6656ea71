//! Calculation and execution options

use std::sync::Arc;
use std::time::Duration;

use rust_decimal::Decimal;

use causeway_core::{Address, TxHash};
use evm_tx::ApproveAmount;

/// Options for a cross-chain quote request
#[derive(Debug, Clone)]
pub struct CrossChainOptions {
    /// Maximum acceptable output deviation, fraction in `[0, 1)`
    pub slippage_tolerance: Decimal,
    /// Integrator address for platform fee lookups
    pub provider_address: Address,
    /// Sender override; defaults to the connected wallet at execution time
    pub from_address: Option<String>,
    /// Recipient override on the destination network
    pub receiver_address: Option<String>,
    /// Allow routing through a pre-bridge on-chain swap when no direct
    /// route exists
    pub use_proxy: bool,
    /// Advisory timeout handed to HTTP/RPC clients
    pub timeout: Duration,
}

impl Default for CrossChainOptions {
    fn default() -> Self {
        Self {
            // 2%
            slippage_tolerance: Decimal::new(2, 2),
            provider_address: Address::ZERO,
            from_address: None,
            receiver_address: None,
            use_proxy: true,
            timeout: Duration::from_secs(25),
        }
    }
}

/// Called with the transaction hash as soon as it is known
pub type TxCallback = Arc<dyn Fn(&TxHash) + Send + Sync>;

/// Options for `swap`
#[derive(Clone, Default)]
pub struct SwapOptions {
    /// Recipient override, validated against the destination network's
    /// address scheme before anything is built
    pub receiver_address: Option<String>,
    pub gas: Option<u64>,
    pub gas_price: Option<u64>,
    pub on_confirm: Option<TxCallback>,
    pub on_approve: Option<TxCallback>,
}

/// Options for `approve`
#[derive(Clone)]
pub struct ApproveOptions {
    pub amount: ApproveAmount,
    pub gas: Option<u64>,
    pub gas_price: Option<u64>,
}

impl Default for ApproveOptions {
    fn default() -> Self {
        Self {
            amount: ApproveAmount::Unlimited,
            gas: None,
            gas_price: None,
        }
    }
}

/// Options for `encode` (build without submitting)
#[derive(Debug, Clone)]
pub struct EncodeOptions {
    /// Sender the payload is built for
    pub from_address: String,
    pub receiver_address: Option<String>,
}
