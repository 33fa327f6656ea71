//! Explicit SDK context
//!
//! One `SwapContext` per session, torn down on wallet disconnect. Every
//! provider and trade receives it at construction; there is no process-wide
//! singleton.

use std::collections::HashMap;
use std::sync::Arc;

use causeway_core::{BlockchainName, ClientError};
use evm_client::{EvmPublic, EvmWallet, HttpClient};

/// Shared collaborators for one SDK session
#[derive(Clone)]
pub struct SwapContext {
    publics: HashMap<BlockchainName, Arc<dyn EvmPublic>>,
    wallet: Arc<dyn EvmWallet>,
    http: Arc<dyn HttpClient>,
}

impl SwapContext {
    pub fn new(wallet: Arc<dyn EvmWallet>, http: Arc<dyn HttpClient>) -> Self {
        Self {
            publics: HashMap::new(),
            wallet,
            http,
        }
    }

    /// Register the read client for a network
    pub fn with_public(mut self, public: Arc<dyn EvmPublic>) -> Self {
        self.publics.insert(public.blockchain(), public);
        self
    }

    /// Read client for `chain`, failing when none was registered
    pub fn public(&self, chain: BlockchainName) -> Result<Arc<dyn EvmPublic>, ClientError> {
        self.publics
            .get(&chain)
            .cloned()
            .ok_or(ClientError::MissingNetwork(chain))
    }

    pub fn wallet(&self) -> &Arc<dyn EvmWallet> {
        &self.wallet
    }

    pub fn http(&self) -> &Arc<dyn HttpClient> {
        &self.http
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use evm_client::testkit::{MockHttp, MockPublic, MockWallet};

    #[test]
    fn test_missing_network_is_an_error() {
        let ctx = SwapContext::new(
            Arc::new(MockWallet::disconnected()),
            Arc::new(MockHttp::new()),
        )
        .with_public(Arc::new(MockPublic::new(BlockchainName::Ethereum)));

        assert!(ctx.public(BlockchainName::Ethereum).is_ok());
        assert!(matches!(
            ctx.public(BlockchainName::Polygon),
            Err(ClientError::MissingNetwork(BlockchainName::Polygon))
        ));
    }
}
