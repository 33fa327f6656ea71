//! evm-tx: EVM calldata encoding and transaction primitives
//!
//! Pure byte-level building blocks: ABI encoding for outbound calls,
//! word-wise decoding for return data, ERC-20 helpers and the
//! `TransactionRequest` payload handed to wallets.

pub mod abi;
pub mod erc20;
pub mod tx;

pub use abi::{
    decode_words, encode_arguments, encode_call, selector, word_to_address, word_to_bool,
    word_to_uint, AbiError, AbiValue,
};
pub use erc20::{allowance_calldata, approve_request, balance_of_calldata, ApproveAmount};
pub use tx::TransactionRequest;
