//! causeway: cross-chain swap SDK
//!
//! Quote a swap with every enabled provider, pick a route and execute it:
//!
//! ```no_run
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! use causeway::{CalculationManager, CrossChainOptions, SwapContext, SwapOptions};
//! use causeway_core::{BlockchainName, Token, TokenAmount};
//! use evm_client::{JsonRpcPublic, ReqwestHttpClient};
//!
//! # let wallet: Arc<dyn evm_client::EvmWallet> = unimplemented!();
//! let http = Arc::new(ReqwestHttpClient::new(Duration::from_secs(25))?);
//! let ctx = SwapContext::new(wallet, http).with_public(Arc::new(JsonRpcPublic::new(
//!     BlockchainName::Ethereum,
//!     "https://rpc.ankr.com/eth",
//!     Duration::from_secs(25),
//! )?));
//!
//! let manager = CalculationManager::new(ctx);
//! let from = TokenAmount::from_amount(
//!     Token::new(
//!         BlockchainName::Ethereum,
//!         "0xdac17f958d2ee523a2206206994597c13d831ec7".parse()?,
//!         "USDT",
//!         6,
//!     ),
//!     "1000".parse()?,
//! );
//! let to = Token::new(
//!     BlockchainName::BinanceSmartChain,
//!     "0x55d398326f99059ff775485246999027b3197955".parse()?,
//!     "USDT",
//!     18,
//! );
//!
//! if let Some(trade) = manager
//!     .calculate_best(&from, &to, &CrossChainOptions::default())
//!     .await
//! {
//!     let hash = trade.swap(&SwapOptions::default()).await?;
//!     println!("submitted {hash}");
//! }
//! # Ok(())
//! # }
//! ```

pub mod manager;
pub mod trade;

pub use manager::{CalculationManager, ManagerConfig, QuoteOutcome};
pub use trade::CrossChainTrade;

pub use causeway_core::{
    CalculationError, ExecutionError, FeeInfo, SdkConfig, Token, TokenAmount,
};
pub use cross_chain::{
    ApproveOptions, CrossChainOptions, EncodeOptions, ProviderKind, SwapContext, SwapOptions,
};
pub use uniswap_v2::{OnChainOptions, OnChainProvider, OnChainTrade};
