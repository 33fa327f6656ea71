//! Fee model
//!
//! Three independent fee components attach to a trade:
//! - fixed fee: flat amount in the source network's native coin
//! - platform fee: percentage of the principal, taken before the upstream
//!   quote is requested
//! - crypto fee: native-coin cost of cross-chain message delivery
//!
//! Fixed and crypto fees share a denomination and sum to the network fee;
//! the platform percentage is applied to the principal separately and never
//! mixed into that sum.

use num_bigint::{BigInt, BigUint};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::amount::from_wei_signed;
use crate::token::TokenAmount;

/// Flat fee in the source network's native coin
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixedFee {
    pub amount: Decimal,
    pub token_symbol: String,
}

/// Percentage fee on the principal. `percent` is a fraction in `[0, 1)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformFee {
    pub percent: Decimal,
    pub token_symbol: String,
}

/// Native-coin cost of delivering and executing the destination-side call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CryptoFee {
    pub amount: Decimal,
    pub token_symbol: String,
}

/// Aggregate fee information for a trade
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fixed_fee: Option<FixedFee>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub platform_fee: Option<PlatformFee>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub crypto_fee: Option<CryptoFee>,
}

impl FeeInfo {
    /// Total native-coin fee: fixed + crypto. Exact decimal addition, both
    /// components are denominated in the source network's native coin.
    pub fn network_fee(&self) -> Decimal {
        let fixed = self
            .fixed_fee
            .as_ref()
            .map(|f| f.amount)
            .unwrap_or(Decimal::ZERO);
        let crypto = self
            .crypto_fee
            .as_ref()
            .map(|f| f.amount)
            .unwrap_or(Decimal::ZERO);
        fixed + crypto
    }

    pub fn platform_fee_percent(&self) -> Decimal {
        self.platform_fee
            .as_ref()
            .map(|f| f.percent)
            .unwrap_or(Decimal::ZERO)
    }
}

/// Principal net of the platform's percentage fee.
///
/// The displayed input stays the user's total debit; the amount routed
/// on-chain is this reduced principal.
pub fn from_without_fee(from: &TokenAmount, platform_fee_percent: Option<Decimal>) -> TokenAmount {
    match platform_fee_percent {
        Some(percent) if percent > Decimal::ZERO => {
            from.with_amount(from.amount() * (Decimal::ONE - percent))
        }
        _ => from.clone(),
    }
}

/// Pool fee in display units: `equilibrium_fee + protocol_fee − equilibrium_reward`.
///
/// All three inputs arrive in the pool's shared-decimal integer scale. The
/// result can be negative when the rebalancing reward exceeds the charged
/// fees; it is passed through unfloored so the amount-out computation
/// reflects the credit.
pub fn pool_fee(
    equilibrium_fee: &BigUint,
    protocol_fee: &BigUint,
    equilibrium_reward: &BigUint,
    shared_decimals: u8,
) -> Decimal {
    let total = BigInt::from(equilibrium_fee.clone()) + BigInt::from(protocol_fee.clone())
        - BigInt::from(equilibrium_reward.clone());
    from_wei_signed(&total, shared_decimals)
}
