//! Stargate/LayerZero bridge adapter
//!
//! Quotes transfers through Stargate liquidity pools: pool path discovery,
//! equilibrium/protocol fee reads, LayerZero delivery fee quotes and router
//! transaction construction.

pub mod constants;
pub mod provider;
pub mod trade;

pub use provider::{PoolFeeQuote, StargateProvider};
pub use trade::StargateTrade;
