//! Uniswap-V2-style on-chain DEX adapter
//!
//! Quotes swaps against one V2-compatible venue per network from live pool
//! reserves and builds the router transaction for execution.

pub mod calculator;
pub mod constants;
pub mod provider;
pub mod trade;

pub use calculator::{calculate_output, route_price_impact_percent};
pub use constants::{dex_contracts, DexContracts};
pub use provider::{OnChainOptions, OnChainProvider};
pub use trade::OnChainTrade;
