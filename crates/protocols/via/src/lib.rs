//! Via multi-route REST adapter
//!
//! Discovers candidate routes across the paginated Via API, enforces the
//! on-chain router whitelist and ranks survivors by net output value.

pub mod api;
pub mod models;
pub mod provider;
pub mod trade;

pub use api::ViaApi;
pub use provider::{bridge_tool, via_contract_address, ViaProvider, SUPPORTED_BLOCKCHAINS};
pub use trade::ViaTrade;
