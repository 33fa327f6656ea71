//! Connected wallet interface
//!
//! Owned exclusively by the execution path; quoting never touches it beyond
//! reading the signer address. Signing and nonce management are the
//! integrator's concern.

use async_trait::async_trait;

use causeway_core::{Address, BlockchainName, ClientError, TxHash};
use evm_tx::TransactionRequest;

/// Write access through the user's connected wallet
#[async_trait]
pub trait EvmWallet: Send + Sync {
    /// Signer address, `None` while no wallet is connected
    fn address(&self) -> Option<Address>;

    /// Network the wallet is currently on
    fn blockchain(&self) -> Option<BlockchainName>;

    /// Sign and submit a transaction on `chain`
    async fn send_transaction(
        &self,
        chain: BlockchainName,
        tx: &TransactionRequest,
    ) -> Result<TxHash, ClientError>;
}
