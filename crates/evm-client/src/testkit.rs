//! Mock collaborators for tests
//!
//! Enabled with the `test-util` feature. Downstream crates drive provider
//! `calculate` paths and trade execution against these without a network.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use async_trait::async_trait;
use num_bigint::BigUint;
use num_traits::Zero;
use serde_json::Value;

use causeway_core::{Address, BlockchainName, ClientError, TxHash};
use evm_tx::abi::{selector, WORD};
use evm_tx::TransactionRequest;

use crate::{ContractCall, EvmPublic, EvmWallet, HttpClient};

/// Build a 32-byte word holding an unsigned integer
pub fn uint_word(value: impl Into<BigUint>) -> [u8; WORD] {
    let bytes = value.into().to_bytes_be();
    let mut word = [0u8; WORD];
    word[WORD - bytes.len()..].copy_from_slice(&bytes);
    word
}

/// Build a 32-byte word holding an address
pub fn address_word(address: &Address) -> [u8; WORD] {
    let mut word = [0u8; WORD];
    word[12..].copy_from_slice(address.as_bytes());
    word
}

type CallResult = Result<Vec<[u8; WORD]>, ClientError>;

#[derive(Default)]
struct Stub {
    seq: VecDeque<CallResult>,
    fallback: Option<CallResult>,
}

/// Scripted `EvmPublic`: responses are registered per function signature.
pub struct MockPublic {
    blockchain: BlockchainName,
    stubs: Mutex<HashMap<String, Stub>>,
    log: Mutex<Vec<String>>,
    native_balances: Mutex<HashMap<Address, BigUint>>,
    gas_price: BigUint,
}

impl MockPublic {
    pub fn new(blockchain: BlockchainName) -> Self {
        Self {
            blockchain,
            stubs: Mutex::new(HashMap::new()),
            log: Mutex::new(Vec::new()),
            native_balances: Mutex::new(HashMap::new()),
            gas_price: BigUint::from(20_000_000_000u64),
        }
    }

    /// Persistent response for every call to `signature`
    pub fn stub(self, signature: &str, words: Vec<[u8; WORD]>) -> Self {
        self.stub_entry(signature, |stub| stub.fallback = Some(Ok(words.clone())));
        self
    }

    /// Persistent failure for every call to `signature`
    pub fn stub_error(self, signature: &str, error: ClientError) -> Self {
        self.stub_entry(signature, |stub| stub.fallback = Some(Err(error.clone())));
        self
    }

    /// FIFO responses consumed call-by-call, ahead of any persistent stub
    pub fn stub_seq(self, signature: &str, results: Vec<CallResult>) -> Self {
        self.stub_entry(signature, |stub| stub.seq.extend(results.iter().cloned()));
        self
    }

    pub fn with_native_balance(self, owner: Address, balance: BigUint) -> Self {
        self.native_balances.lock().unwrap().insert(owner, balance);
        self
    }

    pub fn with_gas_price(mut self, gas_price: BigUint) -> Self {
        self.gas_price = gas_price;
        self
    }

    /// Selectors of every call issued so far, in order
    pub fn calls(&self) -> Vec<String> {
        self.log.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.log.lock().unwrap().len()
    }

    fn stub_entry(&self, signature: &str, update: impl Fn(&mut Stub)) {
        let key = hex::encode(selector(signature));
        let mut stubs = self.stubs.lock().unwrap();
        update(stubs.entry(key).or_default());
    }
}

#[async_trait]
impl EvmPublic for MockPublic {
    fn blockchain(&self) -> BlockchainName {
        self.blockchain
    }

    async fn call(&self, call: &ContractCall) -> Result<Vec<[u8; WORD]>, ClientError> {
        let key = if call.data.len() >= 4 {
            hex::encode(&call.data[..4])
        } else {
            String::from("????")
        };
        self.log.lock().unwrap().push(key.clone());

        let mut stubs = self.stubs.lock().unwrap();
        let stub = stubs.get_mut(&key).ok_or_else(|| {
            ClientError::UnexpectedResponse(format!("no stub registered for selector {key}"))
        })?;
        if let Some(result) = stub.seq.pop_front() {
            return result;
        }
        stub.fallback.clone().ok_or_else(|| {
            ClientError::UnexpectedResponse(format!("stub for selector {key} exhausted"))
        })?
    }

    async fn native_balance(&self, owner: &Address) -> Result<BigUint, ClientError> {
        Ok(self
            .native_balances
            .lock()
            .unwrap()
            .get(owner)
            .cloned()
            .unwrap_or_else(BigUint::zero))
    }

    async fn gas_price(&self) -> Result<BigUint, ClientError> {
        Ok(self.gas_price.clone())
    }

    async fn estimate_gas(
        &self,
        _from: &Address,
        _tx: &TransactionRequest,
    ) -> Result<BigUint, ClientError> {
        Ok(BigUint::from(60_000u64))
    }
}

/// Scripted wallet: fixed address and network, submitted transactions are
/// recorded in order.
pub struct MockWallet {
    address: Option<Address>,
    blockchain: Option<BlockchainName>,
    sent: Mutex<Vec<(BlockchainName, TransactionRequest)>>,
}

impl MockWallet {
    pub fn connected(address: Address, blockchain: BlockchainName) -> Self {
        Self {
            address: Some(address),
            blockchain: Some(blockchain),
            sent: Mutex::new(Vec::new()),
        }
    }

    pub fn disconnected() -> Self {
        Self {
            address: None,
            blockchain: None,
            sent: Mutex::new(Vec::new()),
        }
    }

    /// Transactions submitted so far, in submission order
    pub fn sent(&self) -> Vec<(BlockchainName, TransactionRequest)> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl EvmWallet for MockWallet {
    fn address(&self) -> Option<Address> {
        self.address
    }

    fn blockchain(&self) -> Option<BlockchainName> {
        self.blockchain
    }

    async fn send_transaction(
        &self,
        chain: BlockchainName,
        tx: &TransactionRequest,
    ) -> Result<TxHash, ClientError> {
        let mut sent = self.sent.lock().unwrap();
        sent.push((chain, tx.clone()));
        Ok(TxHash::new(format!("0x{:064x}", sent.len())))
    }
}

/// Scripted HTTP client: the first route whose fragment appears in the URL
/// wins. Requests are logged for idempotence assertions.
pub struct MockHttp {
    routes: Vec<(String, Value)>,
    log: Mutex<Vec<(String, Vec<(String, String)>)>>,
}

impl MockHttp {
    pub fn new() -> Self {
        Self {
            routes: Vec::new(),
            log: Mutex::new(Vec::new()),
        }
    }

    pub fn route(mut self, url_fragment: &str, response: Value) -> Self {
        self.routes.push((url_fragment.to_string(), response));
        self
    }

    pub fn requests(&self) -> Vec<(String, Vec<(String, String)>)> {
        self.log.lock().unwrap().clone()
    }
}

impl Default for MockHttp {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HttpClient for MockHttp {
    async fn get(&self, url: &str, params: &[(&str, String)]) -> Result<Value, ClientError> {
        self.log.lock().unwrap().push((
            url.to_string(),
            params
                .iter()
                .map(|(k, v)| (k.to_string(), v.clone()))
                .collect(),
        ));

        self.routes
            .iter()
            .find(|(fragment, _)| url.contains(fragment.as_str()))
            .map(|(_, response)| response.clone())
            .ok_or_else(|| ClientError::Http(format!("no route for {url}")))
    }
}
