//! Stargate trade entity

use num_bigint::BigUint;
use num_traits::Zero;
use rust_decimal::Decimal;

use causeway_core::{Address, ExecutionError, FeeInfo, TokenAmount, TxHash};
use cross_chain::{ApproveOptions, EncodeOptions, SwapContext, SwapOptions, TradeBase};
use evm_tx::abi::{encode_call, AbiValue};
use evm_tx::TransactionRequest;
use uniswap_v2::OnChainTrade;

use crate::constants::PoolId;

const SWAP_SIG: &str =
    "swap(uint16,uint256,uint256,address,uint256,uint256,(uint256,uint256,bytes),bytes,bytes)";

/// A quoted Stargate bridge transfer, optionally wrapping source- and
/// destination-side on-chain swap legs.
#[derive(Clone)]
pub struct StargateTrade {
    ctx: SwapContext,
    pub base: TradeBase,
    /// Pre-bridge swap into the bridge token, when the input token has no
    /// pool of its own
    pub src_trade: Option<OnChainTrade>,
    /// Post-bridge swap out of the settled token
    pub dst_trade: Option<OnChainTrade>,
    src_pool_id: PoolId,
    dst_pool_id: PoolId,
    router: Address,
    lz_dst_chain_id: u16,
    /// Amount handed to the bridge, in source-pool local decimals
    amount_ld: BigUint,
    /// Guaranteed output floor, in source-pool local decimals
    min_amount_ld: BigUint,
    /// LayerZero delivery fee attached as transaction value
    messaging_fee_wei: BigUint,
}

impl std::fmt::Debug for StargateTrade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StargateTrade")
            .field("base", &self.base)
            .field("src_pool_id", &self.src_pool_id)
            .field("dst_pool_id", &self.dst_pool_id)
            .field("router", &self.router)
            .field("lz_dst_chain_id", &self.lz_dst_chain_id)
            .field("amount_ld", &self.amount_ld)
            .field("min_amount_ld", &self.min_amount_ld)
            .field("messaging_fee_wei", &self.messaging_fee_wei)
            .finish_non_exhaustive()
    }
}

impl StargateTrade {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        ctx: SwapContext,
        base: TradeBase,
        src_trade: Option<OnChainTrade>,
        dst_trade: Option<OnChainTrade>,
        src_pool_id: PoolId,
        dst_pool_id: PoolId,
        router: Address,
        lz_dst_chain_id: u16,
        amount_ld: BigUint,
        min_amount_ld: BigUint,
        messaging_fee_wei: BigUint,
    ) -> Self {
        Self {
            ctx,
            base,
            src_trade,
            dst_trade,
            src_pool_id,
            dst_pool_id,
            router,
            lz_dst_chain_id,
            amount_ld,
            min_amount_ld,
            messaging_fee_wei,
        }
    }

    pub fn from(&self) -> &TokenAmount {
        &self.base.from
    }

    pub fn to(&self) -> &TokenAmount {
        &self.base.to
    }

    pub fn to_amount_min(&self) -> Decimal {
        self.base.to_amount_min
    }

    pub fn fee_info(&self) -> &FeeInfo {
        &self.base.fee_info
    }

    pub fn network_fee(&self) -> Decimal {
        self.base.network_fee()
    }

    pub fn price_impact(&self) -> Option<Decimal> {
        self.base.price_impact
    }

    pub fn router(&self) -> Address {
        self.router
    }

    pub fn pool_ids(&self) -> (PoolId, PoolId) {
        (self.src_pool_id, self.dst_pool_id)
    }

    pub async fn need_approve(&self) -> Result<bool, ExecutionError> {
        self.base.need_approve(&self.ctx, &self.router).await
    }

    pub async fn approve(&self, options: &ApproveOptions) -> Result<TxHash, ExecutionError> {
        self.base.approve(&self.ctx, &self.router, options).await
    }

    /// Build the router swap transaction without submitting
    pub fn encode(&self, options: &EncodeOptions) -> Result<TransactionRequest, ExecutionError> {
        let sender = self.base.parse_from_address(&options.from_address)?;
        let receiver = match &options.receiver_address {
            Some(address) => self.base.parse_receiver_address(address)?,
            None => sender,
        };
        self.build_swap(sender, receiver)
    }

    /// Pre-flight, approve when needed, then submit through the wallet
    pub async fn swap(&self, options: &SwapOptions) -> Result<TxHash, ExecutionError> {
        let wallet = self.base.wallet_address(&self.ctx)?;
        let receiver = self
            .base
            .receiver_or_wallet(&self.ctx, options.receiver_address.as_deref())?;
        let tx = self.build_swap(wallet, receiver)?;
        self.base.execute(&self.ctx, &self.router, tx, options).await
    }

    fn build_swap(
        &self,
        refund: Address,
        receiver: Address,
    ) -> Result<TransactionRequest, ExecutionError> {
        let receiver_bytes = receiver.as_bytes().to_vec();
        let data = encode_call(
            SWAP_SIG,
            &[
                AbiValue::Uint(BigUint::from(self.lz_dst_chain_id)),
                AbiValue::Uint(BigUint::from(self.src_pool_id)),
                AbiValue::Uint(BigUint::from(self.dst_pool_id)),
                AbiValue::Address(refund),
                AbiValue::Uint(self.amount_ld.clone()),
                AbiValue::Uint(self.min_amount_ld.clone()),
                AbiValue::Tuple(vec![
                    AbiValue::Uint(BigUint::zero()),
                    AbiValue::Uint(BigUint::zero()),
                    AbiValue::Bytes(receiver_bytes.clone()),
                ]),
                AbiValue::Bytes(receiver_bytes),
                AbiValue::Bytes(Vec::new()),
            ],
        )
        .map_err(|e| causeway_core::ClientError::Decode(e.to_string()))?;

        // Native input rides along as value on top of the delivery fee
        let mut value = self.messaging_fee_wei.clone();
        if self.base.from.token().is_native() {
            value += &self.amount_ld;
        }

        Ok(TransactionRequest::new(self.router, data).with_value(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use causeway_core::{BlockchainName, Token};
    use cross_chain::ProviderKind;
    use evm_client::testkit::{MockHttp, MockPublic, MockWallet};
    use evm_tx::abi::selector;
    use std::str::FromStr;
    use std::sync::Arc;

    fn d(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn addr(s: &str) -> Address {
        Address::from_str(s).unwrap()
    }

    const SENDER: &str = "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed";

    fn trade(from: TokenAmount, to: TokenAmount) -> StargateTrade {
        let ctx = SwapContext::new(
            Arc::new(MockWallet::disconnected()),
            Arc::new(MockHttp::new()),
        )
        .with_public(Arc::new(MockPublic::new(BlockchainName::Ethereum)));
        let base = TradeBase::quoted(
            ProviderKind::Stargate,
            from.clone(),
            to,
            d("0.02"),
            FeeInfo::default(),
            None,
            Address::ZERO,
        );
        StargateTrade::new(
            ctx,
            base,
            None,
            None,
            2,
            2,
            crate::constants::router_address(BlockchainName::Ethereum),
            102,
            from.wei().clone(),
            from.wei().clone() * 98u8 / 100u8,
            BigUint::from(300_000_000_000_000_000u64),
        )
    }

    fn eth_usdt() -> Token {
        Token::new(
            BlockchainName::Ethereum,
            addr("0xdac17f958d2ee523a2206206994597c13d831ec7"),
            "USDT",
            6,
        )
    }

    fn bsc_usdt() -> Token {
        Token::new(
            BlockchainName::BinanceSmartChain,
            addr("0x55d398326f99059ff775485246999027b3197955"),
            "USDT",
            18,
        )
    }

    #[test]
    fn test_encode_builds_router_swap() {
        let t = trade(
            TokenAmount::from_amount(eth_usdt(), d("1000")),
            TokenAmount::from_amount(bsc_usdt(), d("993")),
        );
        let tx = t
            .encode(&EncodeOptions {
                from_address: SENDER.to_string(),
                receiver_address: None,
            })
            .unwrap();

        assert_eq!(&tx.data[..4], &selector(SWAP_SIG));
        assert_eq!(tx.to, t.router());
        // ERC-20 input: value is the messaging fee only
        assert_eq!(tx.value, BigUint::from(300_000_000_000_000_000u64));
    }

    #[test]
    fn test_native_input_adds_amount_to_value() {
        let native = TokenAmount::from_amount(Token::native(BlockchainName::Ethereum), d("1"));
        let t = trade(
            native.clone(),
            TokenAmount::from_amount(bsc_usdt(), d("1990")),
        );
        let tx = t
            .encode(&EncodeOptions {
                from_address: SENDER.to_string(),
                receiver_address: None,
            })
            .unwrap();

        let expected = BigUint::from(300_000_000_000_000_000u64) + native.wei();
        assert_eq!(tx.value, expected);
    }

    #[test]
    fn test_encode_validates_receiver() {
        let t = trade(
            TokenAmount::from_amount(eth_usdt(), d("1000")),
            TokenAmount::from_amount(bsc_usdt(), d("993")),
        );
        let result = t.encode(&EncodeOptions {
            from_address: SENDER.to_string(),
            receiver_address: Some("bogus".to_string()),
        });
        assert!(matches!(
            result,
            Err(ExecutionError::WrongReceiverAddress { .. })
        ));
    }
}
