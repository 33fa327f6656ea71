//! cross-chain: shared provider contract and trade machinery
//!
//! Providers implement `CrossChainProvider` and embed a `TradeBase` in
//! their trade type; this crate owns everything common to them: the
//! explicit context, calculation/execution options, pre-flight validation,
//! approve/swap plumbing, proxy fee reads and best-route selection.

pub mod context;
pub mod fee_reader;
pub mod options;
pub mod provider;
pub mod route;
pub mod trade;

pub use context::SwapContext;
pub use options::{ApproveOptions, CrossChainOptions, EncodeOptions, SwapOptions, TxCallback};
pub use provider::{CrossChainProvider, ProviderKind};
pub use route::{best_route_index, RoutePricing};
pub use trade::{GasData, TradeBase};
