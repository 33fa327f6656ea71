//! evm-client: chain read/write collaborator interfaces
//!
//! Providers consume the chain through two narrow traits: `EvmPublic`
//! (reads: contract calls, batched calls, allowance/balance, gas price) and
//! `EvmWallet` (connected signer and transaction submission). The JSON-RPC
//! implementation lives here; tests substitute the `testkit` mocks.

pub mod http;
pub mod rpc;
#[cfg(any(test, feature = "test-util"))]
pub mod testkit;
pub mod wallet;

use async_trait::async_trait;
use futures::future::join_all;
use num_bigint::BigUint;

use causeway_core::{Address, BlockchainName, ClientError};
use evm_tx::abi::{self, AbiValue, WORD};

pub use http::{get_json, HttpClient, ReqwestHttpClient};
pub use rpc::JsonRpcPublic;
pub use wallet::EvmWallet;

/// A read-only contract call: target plus ABI-encoded calldata
#[derive(Debug, Clone)]
pub struct ContractCall {
    pub to: Address,
    pub data: Vec<u8>,
}

impl ContractCall {
    pub fn new(to: Address, signature: &str, args: &[AbiValue]) -> Result<Self, ClientError> {
        let data =
            abi::encode_call(signature, args).map_err(|e| ClientError::Decode(e.to_string()))?;
        Ok(Self { to, data })
    }
}

/// Outcome of one item in a batched read. A failed item never fails the
/// batch.
#[derive(Debug, Clone)]
pub struct CallOutcome {
    pub success: bool,
    pub words: Vec<[u8; WORD]>,
}

/// Read-only chain access for one network
#[async_trait]
pub trait EvmPublic: Send + Sync {
    fn blockchain(&self) -> BlockchainName;

    /// Execute a read call and return the result as 32-byte words
    async fn call(&self, call: &ContractCall) -> Result<Vec<[u8; WORD]>, ClientError>;

    /// Native balance of `owner` in minimal units
    async fn native_balance(&self, owner: &Address) -> Result<BigUint, ClientError>;

    /// Current gas price in minimal native units
    async fn gas_price(&self) -> Result<BigUint, ClientError>;

    /// Gas units a transaction would consume
    async fn estimate_gas(
        &self,
        from: &Address,
        tx: &evm_tx::TransactionRequest,
    ) -> Result<BigUint, ClientError>;

    /// Batched reads with per-item failure: one reverting call yields a
    /// failed outcome in its slot, the others still succeed.
    async fn multicall(&self, calls: &[ContractCall]) -> Vec<CallOutcome> {
        let results = join_all(calls.iter().map(|call| self.call(call))).await;
        results
            .into_iter()
            .map(|result| match result {
                Ok(words) => CallOutcome {
                    success: true,
                    words,
                },
                Err(err) => {
                    tracing::debug!("multicall item failed: {err}");
                    CallOutcome {
                        success: false,
                        words: Vec::new(),
                    }
                }
            })
            .collect()
    }

    /// ERC-20 allowance of `spender` over `owner`'s `token`
    async fn allowance(
        &self,
        token: &Address,
        owner: &Address,
        spender: &Address,
    ) -> Result<BigUint, ClientError> {
        let call = ContractCall {
            to: *token,
            data: evm_tx::allowance_calldata(*owner, *spender),
        };
        let words = self.call(&call).await?;
        first_uint(&words)
    }

    /// Balance of `owner`: ERC-20 when `token` is given, native otherwise
    async fn balance(&self, owner: &Address, token: Option<&Address>) -> Result<BigUint, ClientError> {
        match token {
            Some(token) => {
                let call = ContractCall {
                    to: *token,
                    data: evm_tx::balance_of_calldata(*owner),
                };
                let words = self.call(&call).await?;
                first_uint(&words)
            }
            None => self.native_balance(owner).await,
        }
    }
}

fn first_uint(words: &[[u8; WORD]]) -> Result<BigUint, ClientError> {
    words
        .first()
        .map(abi::word_to_uint)
        .ok_or_else(|| ClientError::UnexpectedResponse("empty return data".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testkit::{uint_word, MockPublic};
    use std::str::FromStr;

    #[tokio::test]
    async fn test_multicall_tolerates_item_failure() {
        let public = MockPublic::new(BlockchainName::Ethereum)
            .stub("balanceOf(address)", vec![uint_word(42u64)]);

        let token = Address::from_str("0xdAC17F958D2ee523a2206206994597C13D831ec7").unwrap();
        let ok_call = ContractCall {
            to: token,
            data: evm_tx::balance_of_calldata(Address::ZERO),
        };
        let failing_call = ContractCall {
            to: token,
            data: evm_tx::allowance_calldata(Address::ZERO, Address::ZERO),
        };

        let outcomes = public.multicall(&[ok_call, failing_call]).await;
        assert!(outcomes[0].success);
        assert_eq!(abi::word_to_uint(&outcomes[0].words[0]), 42u64.into());
        assert!(!outcomes[1].success);
    }

    #[tokio::test]
    async fn test_allowance_decodes_first_word() {
        let public = MockPublic::new(BlockchainName::Ethereum)
            .stub("allowance(address,address)", vec![uint_word(1_000u64)]);

        let token = Address::from_str("0xdAC17F958D2ee523a2206206994597C13D831ec7").unwrap();
        let allowance = public
            .allowance(&token, &Address::ZERO, &Address::ZERO)
            .await
            .unwrap();
        assert_eq!(allowance, 1_000u64.into());
    }
}
