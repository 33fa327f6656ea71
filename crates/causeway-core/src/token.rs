//! Token and token-amount value objects

use std::fmt;
use std::hash::{Hash, Hasher};

use num_bigint::BigUint;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::amount::{from_wei, to_wei};
use crate::types::{Address, BlockchainName};

/// A token on a specific network.
///
/// Equality and hashing use (blockchain, address) only: symbol, decimals and
/// price are metadata that may differ between sources for the same asset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Token {
    pub blockchain: BlockchainName,
    pub address: Address,
    pub symbol: String,
    pub decimals: u8,
    /// USD unit price, when a price source knew the token
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<Decimal>,
}

impl Token {
    pub fn new(
        blockchain: BlockchainName,
        address: Address,
        symbol: impl Into<String>,
        decimals: u8,
    ) -> Self {
        Self {
            blockchain,
            address,
            symbol: symbol.into(),
            decimals,
            price: None,
        }
    }

    /// The network's native coin, represented by the zero-address sentinel.
    pub fn native(blockchain: BlockchainName) -> Self {
        let coin = blockchain.native_coin();
        Self::new(blockchain, Address::ZERO, coin.symbol, coin.decimals)
    }

    pub fn with_price(mut self, price: Decimal) -> Self {
        self.price = Some(price);
        self
    }

    pub fn is_native(&self) -> bool {
        self.address.is_zero()
    }
}

impl PartialEq for Token {
    fn eq(&self, other: &Self) -> bool {
        self.blockchain == other.blockchain && self.address == other.address
    }
}

impl Eq for Token {}

impl Hash for Token {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.blockchain.hash(state);
        self.address.hash(state);
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} on {}", self.symbol, self.blockchain)
    }
}

/// A token with an amount, held simultaneously in human units and minimal
/// (integer) units. The two stay consistent by construction:
/// `amount × 10^decimals == wei`, truncated toward zero.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "TokenAmountRepr", into = "TokenAmountRepr")]
pub struct TokenAmount {
    token: Token,
    amount: Decimal,
    wei: BigUint,
}

#[derive(Serialize, Deserialize)]
struct TokenAmountRepr {
    token: Token,
    amount: Decimal,
}

impl From<TokenAmountRepr> for TokenAmount {
    fn from(repr: TokenAmountRepr) -> Self {
        TokenAmount::from_amount(repr.token, repr.amount)
    }
}

impl From<TokenAmount> for TokenAmountRepr {
    fn from(value: TokenAmount) -> Self {
        TokenAmountRepr {
            token: value.token,
            amount: value.amount,
        }
    }
}

impl TokenAmount {
    pub fn from_amount(token: Token, amount: Decimal) -> Self {
        let wei = to_wei(amount, token.decimals);
        // Re-derive the human amount so both representations agree after
        // truncation of sub-minimal precision.
        let amount = from_wei(&wei, token.decimals);
        Self { token, amount, wei }
    }

    pub fn from_wei(token: Token, wei: BigUint) -> Self {
        let amount = from_wei(&wei, token.decimals);
        Self { token, amount, wei }
    }

    pub fn token(&self) -> &Token {
        &self.token
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    pub fn wei(&self) -> &BigUint {
        &self.wei
    }

    pub fn blockchain(&self) -> BlockchainName {
        self.token.blockchain
    }

    /// Same token, different amount
    pub fn with_amount(&self, amount: Decimal) -> Self {
        Self::from_amount(self.token.clone(), amount)
    }

    /// Weighted USD value, when the token's price is known
    pub fn usd_value(&self) -> Option<Decimal> {
        self.token.price.map(|price| price * self.amount)
    }

    /// Amount reduced by a slippage fraction in `[0, 1)`
    pub fn amount_minus_slippage(&self, slippage: Decimal) -> Decimal {
        self.amount * (Decimal::ONE - slippage)
    }

    /// Minimal-unit amount reduced by a slippage fraction
    pub fn wei_minus_slippage(&self, slippage: Decimal) -> BigUint {
        to_wei(self.amount_minus_slippage(slippage), self.token.decimals)
    }

    /// Percentage lost between this amount and `to`, by USD value.
    /// Requires both unit prices; returns `None` otherwise.
    pub fn price_impact_percent(&self, to: &TokenAmount) -> Option<Decimal> {
        let from_usd = self.usd_value()?;
        let to_usd = to.usd_value()?;
        if from_usd <= Decimal::ZERO {
            return None;
        }
        Some((from_usd - to_usd) / from_usd * Decimal::ONE_HUNDRED)
    }
}

impl fmt::Display for TokenAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.amount, self.token.symbol)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn d(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn usdt(chain: BlockchainName) -> Token {
        Token::new(
            chain,
            Address::from_str("0xdAC17F958D2ee523a2206206994597C13D831ec7").unwrap(),
            "USDT",
            6,
        )
    }

    #[test]
    fn test_equality_ignores_metadata() {
        let a = usdt(BlockchainName::Ethereum);
        let mut b = usdt(BlockchainName::Ethereum);
        b.symbol = "TetherUSD".to_string();
        b.price = Some(d("1.0"));
        assert_eq!(a, b);

        let other_chain = usdt(BlockchainName::Polygon);
        assert_ne!(a, other_chain);
    }

    #[test]
    fn test_amount_wei_invariant() {
        let amount = TokenAmount::from_amount(usdt(BlockchainName::Ethereum), d("1234.567891"));
        assert_eq!(amount.wei(), &BigUint::from(1_234_567_891u64));
        assert_eq!(amount.amount(), d("1234.567891"));
    }

    #[test]
    fn test_sub_minimal_precision_truncated() {
        // 6-decimal token cannot represent the 7th digit
        let amount = TokenAmount::from_amount(usdt(BlockchainName::Ethereum), d("1.0000015"));
        assert_eq!(amount.wei(), &BigUint::from(1_000_001u64));
        assert_eq!(amount.amount(), d("1.000001"));
    }

    #[test]
    fn test_usd_value() {
        let token = usdt(BlockchainName::Ethereum).with_price(d("0.999"));
        let amount = TokenAmount::from_amount(token, d("1000"));
        assert_eq!(amount.usd_value(), Some(d("999")));
    }

    #[test]
    fn test_slippage_floor() {
        let amount = TokenAmount::from_amount(usdt(BlockchainName::Ethereum), d("100"));
        assert_eq!(amount.amount_minus_slippage(d("0.02")), d("98"));
        assert_eq!(amount.amount_minus_slippage(Decimal::ZERO), d("100"));
    }

    #[test]
    fn test_price_impact() {
        let from = TokenAmount::from_amount(
            usdt(BlockchainName::Ethereum).with_price(d("1")),
            d("1000"),
        );
        let to = TokenAmount::from_amount(
            usdt(BlockchainName::Polygon).with_price(d("1")),
            d("990"),
        );
        assert_eq!(from.price_impact_percent(&to), Some(d("1")));

        let unpriced = TokenAmount::from_amount(usdt(BlockchainName::Polygon), d("990"));
        assert_eq!(from.price_impact_percent(&unpriced), None);
    }

    #[test]
    fn test_native_token() {
        let native = Token::native(BlockchainName::BinanceSmartChain);
        assert!(native.is_native());
        assert_eq!(native.symbol, "BNB");
        assert_eq!(native.decimals, 18);
    }
}
