//! causeway-core: shared types, amounts, fee model and errors
//!
//! Everything in this crate is pure data and arithmetic. Network access,
//! wallets and contract calls live in `evm-client` and above.

pub mod amount;
pub mod config;
pub mod errors;
pub mod fee;
pub mod token;
pub mod types;

pub use amount::{from_wei, from_wei_signed, to_wei, wei_pow10};
pub use config::SdkConfig;
pub use errors::{classify_error, CalculationError, ClientError, ExecutionError};
pub use fee::{from_without_fee, pool_fee, CryptoFee, FeeInfo, FixedFee, PlatformFee};
pub use token::{Token, TokenAmount};
pub use types::{Address, BlockchainName, NativeCoin, TxHash};
