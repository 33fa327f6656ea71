//! On-chain trade entity
//!
//! A quoted single-network swap through the V2 router. Used standalone and
//! as the pre- or post-bridge leg of a cross-chain trade.

use std::time::{SystemTime, UNIX_EPOCH};

use num_bigint::BigUint;
use rust_decimal::Decimal;

use causeway_core::{to_wei, Address, ExecutionError, TokenAmount, TxHash};
use cross_chain::{ApproveOptions, EncodeOptions, SwapContext, SwapOptions, TradeBase};
use evm_tx::abi::{encode_call, AbiValue};
use evm_tx::TransactionRequest;

#[derive(Clone)]
pub struct OnChainTrade {
    ctx: SwapContext,
    pub base: TradeBase,
    /// Hop addresses with the wrapped native token substituted for native legs
    path: Vec<Address>,
    router: Address,
    deadline_minutes: u64,
}

impl OnChainTrade {
    pub(crate) fn new(
        ctx: SwapContext,
        base: TradeBase,
        path: Vec<Address>,
        router: Address,
        deadline_minutes: u64,
    ) -> Self {
        Self {
            ctx,
            base,
            path,
            router,
            deadline_minutes,
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

    pub fn path(&self) -> &[Address] {
        &self.path
    }

    pub fn router(&self) -> Address {
        self.router
    }

    /// Output floor in the destination token's minimal units
    pub fn to_amount_min_wei(&self) -> BigUint {
        to_wei(self.base.to_amount_min, self.base.to.token().decimals)
    }

    pub async fn need_approve(&self) -> Result<bool, ExecutionError> {
        self.base.need_approve(&self.ctx, &self.router).await
    }

    pub async fn approve(&self, options: &ApproveOptions) -> Result<TxHash, ExecutionError> {
        self.base.approve(&self.ctx, &self.router, options).await
    }

    /// Build the router calldata without submitting
    pub fn encode(&self, options: &EncodeOptions) -> Result<TransactionRequest, ExecutionError> {
        let sender = self.base.parse_from_address(&options.from_address)?;
        let receiver = match &options.receiver_address {
            Some(address) => self.base.parse_receiver_address(address)?,
            None => sender,
        };
        self.build_swap(receiver)
    }

    /// Pre-flight, approve when needed, then submit through the wallet
    pub async fn swap(&self, options: &SwapOptions) -> Result<TxHash, ExecutionError> {
        let receiver = self
            .base
            .receiver_or_wallet(&self.ctx, options.receiver_address.as_deref())?;
        let tx = self.build_swap(receiver)?;
        self.base.execute(&self.ctx, &self.router, tx, options).await
    }

    fn build_swap(&self, receiver: Address) -> Result<TransactionRequest, ExecutionError> {
        let amount_in = AbiValue::Uint(self.base.from.wei().clone());
        let amount_out_min = AbiValue::Uint(self.to_amount_min_wei());
        let path = AbiValue::Array(self.path.iter().copied().map(AbiValue::Address).collect());
        let to = AbiValue::Address(receiver);
        let deadline = AbiValue::Uint(BigUint::from(self.deadline()));

        let from_native = self.base.from.token().is_native();
        let to_native = self.base.to.token().is_native();

        let (signature, args, value) = if from_native {
            (
                "swapExactETHForTokens(uint256,address[],address,uint256)",
                vec![amount_out_min, path, to, deadline],
                self.base.from.wei().clone(),
            )
        } else if to_native {
            (
                "swapExactTokensForETH(uint256,uint256,address[],address,uint256)",
                vec![amount_in, amount_out_min, path, to, deadline],
                BigUint::from(0u8),
            )
        } else {
            (
                "swapExactTokensForTokens(uint256,uint256,address[],address,uint256)",
                vec![amount_in, amount_out_min, path, to, deadline],
                BigUint::from(0u8),
            )
        };

        let data = encode_call(signature, &args)
            .map_err(|e| causeway_core::ClientError::Decode(e.to_string()))?;
        Ok(TransactionRequest::new(self.router, data).with_value(value))
    }

    fn deadline(&self) -> u64 {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs();
        now + self.deadline_minutes * 60
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use causeway_core::{BlockchainName, FeeInfo, Token};
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

    fn trade(from: TokenAmount, to: TokenAmount, path: Vec<Address>) -> OnChainTrade {
        let ctx = SwapContext::new(
            Arc::new(MockWallet::disconnected()),
            Arc::new(MockHttp::new()),
        )
        .with_public(Arc::new(MockPublic::new(BlockchainName::Ethereum)));
        let base = TradeBase::quoted(
            ProviderKind::UniswapV2,
            from,
            to,
            d("0.01"),
            FeeInfo::default(),
            None,
            Address::ZERO,
        );
        OnChainTrade::new(
            ctx,
            base,
            path,
            addr("0x7a250d5630b4cf539739df2c5dacb4c659f2488d"),
            20,
        )
    }

    fn usdc() -> Token {
        Token::new(
            BlockchainName::Ethereum,
            addr("0xa0b86991c6218b36c1d19d4a2e9eb0ce3606eb48"),
            "USDC",
            6,
        )
    }

    fn dai() -> Token {
        Token::new(
            BlockchainName::Ethereum,
            addr("0x6b175474e89094c44da98b954eedeac495271d0f"),
            "DAI",
            18,
        )
    }

    fn weth() -> Address {
        addr("0xc02aaa39b223fe8d0a0e5c4f27ead9083c756cc2")
    }

    const SENDER: &str = "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed";

    #[test]
    fn test_encode_token_to_token() {
        let t = trade(
            TokenAmount::from_amount(usdc(), d("100")),
            TokenAmount::from_amount(dai(), d("99")),
            vec![usdc().address, dai().address],
        );
        let tx = t
            .encode(&EncodeOptions {
                from_address: SENDER.to_string(),
                receiver_address: None,
            })
            .unwrap();

        assert_eq!(
            &tx.data[..4],
            &selector("swapExactTokensForTokens(uint256,uint256,address[],address,uint256)")
        );
        assert_eq!(tx.to, t.router());
        assert_eq!(tx.value, BigUint::from(0u8));
    }

    #[test]
    fn test_encode_native_input_carries_value() {
        let native = TokenAmount::from_amount(Token::native(BlockchainName::Ethereum), d("2"));
        let t = trade(
            native.clone(),
            TokenAmount::from_amount(dai(), d("4000")),
            vec![weth(), dai().address],
        );
        let tx = t
            .encode(&EncodeOptions {
                from_address: SENDER.to_string(),
                receiver_address: None,
            })
            .unwrap();

        assert_eq!(
            &tx.data[..4],
            &selector("swapExactETHForTokens(uint256,address[],address,uint256)")
        );
        assert_eq!(&tx.value, native.wei());
    }

    #[test]
    fn test_encode_rejects_invalid_sender() {
        let t = trade(
            TokenAmount::from_amount(usdc(), d("100")),
            TokenAmount::from_amount(dai(), d("99")),
            vec![usdc().address, dai().address],
        );
        let result = t.encode(&EncodeOptions {
            from_address: "0xnot-valid".to_string(),
            receiver_address: None,
        });
        assert!(matches!(
            result,
            Err(ExecutionError::WrongFromAddress { .. })
        ));
    }

    #[test]
    fn test_min_wei_tracks_decimal_floor() {
        let t = trade(
            TokenAmount::from_amount(usdc(), d("100")),
            TokenAmount::from_amount(dai(), d("100")),
            vec![usdc().address, dai().address],
        );
        // 1% slippage on 100 DAI = 99 DAI in 18-decimal units
        assert_eq!(
            t.to_amount_min_wei(),
            BigUint::from(99u8) * BigUint::from(10u8).pow(18)
        );
    }
}
