//! Shared trade machinery
//!
//! `TradeBase` is the composition core every provider trade embeds: the
//! immutable quote data plus pre-flight validation and the
//! approve/submit plumbing. Providers keep only their payload and calldata
//! encoding; ordering guarantees (approve always precedes swap) live here
//! and cannot be bypassed by callers.

use std::str::FromStr;

use num_bigint::BigUint;
use rust_decimal::Decimal;

use causeway_core::{Address, ExecutionError, FeeInfo, TokenAmount, TxHash};
use evm_tx::{approve_request, ApproveAmount, TransactionRequest};

use crate::context::SwapContext;
use crate::options::{ApproveOptions, SwapOptions};
use crate::provider::ProviderKind;

/// Gas limit and price pair for a prospective transaction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GasData {
    pub gas_limit: BigUint,
    pub gas_price: BigUint,
}

/// Immutable-after-construction core of a quoted trade
#[derive(Debug, Clone)]
pub struct TradeBase {
    pub kind: ProviderKind,
    pub from: TokenAmount,
    pub to: TokenAmount,
    /// Slippage-adjusted floor on the output amount
    pub to_amount_min: Decimal,
    pub fee_info: FeeInfo,
    pub price_impact: Option<Decimal>,
    pub slippage_tolerance: Decimal,
    /// Integrator the platform fee was read for
    pub provider_address: Address,
}

impl TradeBase {
    /// Build a quote whose output floor is derived from the slippage
    /// tolerance. Holds `to_amount_min <= to.amount` for any tolerance in
    /// `[0, 1)`.
    pub fn quoted(
        kind: ProviderKind,
        from: TokenAmount,
        to: TokenAmount,
        slippage_tolerance: Decimal,
        fee_info: FeeInfo,
        price_impact: Option<Decimal>,
        provider_address: Address,
    ) -> Self {
        let to_amount_min = to.amount_minus_slippage(slippage_tolerance);
        Self {
            kind,
            from,
            to,
            to_amount_min,
            fee_info,
            price_impact,
            slippage_tolerance,
            provider_address,
        }
    }

    /// Override the output floor with a provider-supplied value. Clamped so
    /// the floor can never exceed the quoted amount.
    pub fn with_to_amount_min(mut self, to_amount_min: Decimal) -> Self {
        self.to_amount_min = to_amount_min.min(self.to.amount());
        self
    }

    /// Fixed + crypto fee, both in the source network's native coin
    pub fn network_fee(&self) -> Decimal {
        self.fee_info.network_fee()
    }

    // -----------------------------------------------------------------------
    // Pre-flight checks
    // -----------------------------------------------------------------------

    pub fn wallet_address(&self, ctx: &SwapContext) -> Result<Address, ExecutionError> {
        ctx.wallet()
            .address()
            .ok_or(ExecutionError::WalletNotConnected)
    }

    pub fn check_blockchain(&self, ctx: &SwapContext) -> Result<(), ExecutionError> {
        let actual = ctx
            .wallet()
            .blockchain()
            .ok_or(ExecutionError::WalletNotConnected)?;
        let expected = self.from.blockchain();
        if actual != expected {
            return Err(ExecutionError::WrongBlockchain { expected, actual });
        }
        Ok(())
    }

    pub async fn check_balance(
        &self,
        ctx: &SwapContext,
        owner: &Address,
    ) -> Result<(), ExecutionError> {
        let public = ctx.public(self.from.blockchain())?;
        let token = self.from.token();
        let token_address = (!token.is_native()).then_some(&token.address);
        let available_wei = public.balance(owner, token_address).await?;

        if &available_wei < self.from.wei() {
            return Err(ExecutionError::InsufficientBalance {
                required: self.from.amount(),
                available: causeway_core::from_wei(&available_wei, token.decimals),
                token_symbol: token.symbol.clone(),
            });
        }
        Ok(())
    }

    /// Validate a caller-supplied sender address before it reaches any
    /// contract interaction
    pub fn parse_from_address(&self, address: &str) -> Result<Address, ExecutionError> {
        Address::from_str(address).map_err(|_| ExecutionError::WrongFromAddress {
            address: address.to_string(),
        })
    }

    /// Validate a caller-supplied receiver address against the destination
    /// network's address scheme
    pub fn parse_receiver_address(&self, address: &str) -> Result<Address, ExecutionError> {
        Address::from_str(address).map_err(|_| ExecutionError::WrongReceiverAddress {
            address: address.to_string(),
        })
    }

    /// Receiver override when given and valid, else the connected wallet
    pub fn receiver_or_wallet(
        &self,
        ctx: &SwapContext,
        receiver: Option<&str>,
    ) -> Result<Address, ExecutionError> {
        match receiver {
            Some(address) => self.parse_receiver_address(address),
            None => self.wallet_address(ctx),
        }
    }

    /// All checks that must pass before any on-chain write: wallet
    /// connected, wallet on the source network, live balance covers the
    /// input. Returns the wallet address.
    pub async fn pre_flight(&self, ctx: &SwapContext) -> Result<Address, ExecutionError> {
        let wallet = self.wallet_address(ctx)?;
        self.check_blockchain(ctx)?;
        self.check_balance(ctx, &wallet).await?;
        Ok(wallet)
    }

    // -----------------------------------------------------------------------
    // Allowance and execution
    // -----------------------------------------------------------------------

    /// True when the spender's live allowance does not cover the input.
    /// Native assets never need approval.
    pub async fn need_approve(
        &self,
        ctx: &SwapContext,
        spender: &Address,
    ) -> Result<bool, ExecutionError> {
        let owner = self.wallet_address(ctx)?;
        if self.from.token().is_native() {
            return Ok(false);
        }

        let public = ctx.public(self.from.blockchain())?;
        let allowance = public
            .allowance(&self.from.token().address, &owner, spender)
            .await?;
        Ok(self.from.wei() > &allowance)
    }

    /// Submit an ERC-20 approve for `spender`
    pub async fn approve(
        &self,
        ctx: &SwapContext,
        spender: &Address,
        options: &ApproveOptions,
    ) -> Result<TxHash, ExecutionError> {
        self.wallet_address(ctx)?;
        let tx = approve_request(self.from.token().address, *spender, &options.amount)
            .with_gas(options.gas, options.gas_price);
        let hash = ctx
            .wallet()
            .send_transaction(self.from.blockchain(), &tx)
            .await?;
        Ok(hash)
    }

    /// Gas limit (with a 1.2 margin) and price for an unlimited approve.
    /// Estimation failures yield `None`, never an error.
    pub async fn approve_price(&self, ctx: &SwapContext, spender: &Address) -> Option<GasData> {
        let owner = ctx.wallet().address()?;
        let public = ctx.public(self.from.blockchain()).ok()?;
        let tx = approve_request(
            self.from.token().address,
            *spender,
            &ApproveAmount::Unlimited,
        );

        let (gas_limit, gas_price) =
            futures::join!(public.estimate_gas(&owner, &tx), public.gas_price());
        let gas_limit = gas_limit.ok()?;
        let gas_price = gas_price.ok()?;

        Some(GasData {
            gas_limit: gas_limit * 12u8 / 10u8,
            gas_price,
        })
    }

    /// Pre-flight, approve when the allowance falls short, then submit.
    /// The approve-before-swap ordering is internal and not reorderable.
    pub async fn execute(
        &self,
        ctx: &SwapContext,
        spender: &Address,
        tx: TransactionRequest,
        options: &SwapOptions,
    ) -> Result<TxHash, ExecutionError> {
        self.pre_flight(ctx).await?;

        if self.need_approve(ctx, spender).await? {
            tracing::debug!("allowance below input amount, approving {spender} first");
            let approve_hash = self.approve(ctx, spender, &ApproveOptions::default()).await?;
            if let Some(on_approve) = &options.on_approve {
                on_approve(&approve_hash);
            }
        }

        let tx = tx.with_gas(options.gas, options.gas_price);
        let hash = ctx
            .wallet()
            .send_transaction(self.from.blockchain(), &tx)
            .await?;
        if let Some(on_confirm) = &options.on_confirm {
            on_confirm(&hash);
        }
        Ok(hash)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use causeway_core::{BlockchainName, Token};
    use evm_client::testkit::{uint_word, MockHttp, MockPublic, MockWallet};
    use std::sync::Arc;

    fn d(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn addr(s: &str) -> Address {
        Address::from_str(s).unwrap()
    }

    fn usdt() -> Token {
        Token::new(
            BlockchainName::Ethereum,
            addr("0xdAC17F958D2ee523a2206206994597C13D831ec7"),
            "USDT",
            6,
        )
    }

    fn bsc_usdt() -> Token {
        Token::new(
            BlockchainName::BinanceSmartChain,
            addr("0x55d398326f99059fF775485246999027B3197955"),
            "USDT",
            18,
        )
    }

    fn base_trade() -> TradeBase {
        TradeBase::quoted(
            ProviderKind::Stargate,
            TokenAmount::from_amount(usdt(), d("100")),
            TokenAmount::from_amount(bsc_usdt(), d("99")),
            d("0.01"),
            FeeInfo::default(),
            None,
            Address::ZERO,
        )
    }

    fn wallet_addr() -> Address {
        addr("0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed")
    }

    fn router() -> Address {
        addr("0xfB6916095ca1df60bB79Ce92cE3Ea74c37c5d359")
    }

    fn ctx_with(public: MockPublic, wallet: MockWallet) -> SwapContext {
        SwapContext::new(Arc::new(wallet), Arc::new(MockHttp::new()))
            .with_public(Arc::new(public))
    }

    #[test]
    fn test_min_amount_invariant() {
        let trade = base_trade();
        assert_eq!(trade.to_amount_min, d("98.01"));
        assert!(trade.to_amount_min <= trade.to.amount());

        // Provider-supplied floor above the quote is clamped
        let clamped = base_trade().with_to_amount_min(d("250"));
        assert_eq!(clamped.to_amount_min, d("99"));
    }

    #[tokio::test]
    async fn test_preflight_requires_wallet() {
        let ctx = ctx_with(
            MockPublic::new(BlockchainName::Ethereum),
            MockWallet::disconnected(),
        );
        let result = base_trade().pre_flight(&ctx).await;
        assert!(matches!(result, Err(ExecutionError::WalletNotConnected)));
    }

    #[tokio::test]
    async fn test_preflight_requires_matching_chain() {
        let ctx = ctx_with(
            MockPublic::new(BlockchainName::Ethereum),
            MockWallet::connected(wallet_addr(), BlockchainName::Polygon),
        );
        let result = base_trade().pre_flight(&ctx).await;
        assert!(matches!(
            result,
            Err(ExecutionError::WrongBlockchain {
                expected: BlockchainName::Ethereum,
                actual: BlockchainName::Polygon,
            })
        ));
    }

    #[tokio::test]
    async fn test_preflight_requires_balance() {
        // balanceOf returns 99 USDT against a 100 USDT trade
        let public = MockPublic::new(BlockchainName::Ethereum)
            .stub("balanceOf(address)", vec![uint_word(99_000_000u64)]);
        let ctx = ctx_with(
            public,
            MockWallet::connected(wallet_addr(), BlockchainName::Ethereum),
        );

        match base_trade().pre_flight(&ctx).await {
            Err(ExecutionError::InsufficientBalance {
                required,
                available,
                ..
            }) => {
                assert_eq!(required, d("100"));
                assert_eq!(available, d("99"));
            }
            other => panic!("expected InsufficientBalance, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_native_asset_never_needs_approve() {
        let native = TokenAmount::from_amount(Token::native(BlockchainName::Ethereum), d("1"));
        let trade = TradeBase::quoted(
            ProviderKind::Stargate,
            native,
            TokenAmount::from_amount(bsc_usdt(), d("2000")),
            d("0.01"),
            FeeInfo::default(),
            None,
            Address::ZERO,
        );
        let public = Arc::new(MockPublic::new(BlockchainName::Ethereum));
        let wallet = Arc::new(MockWallet::connected(
            wallet_addr(),
            BlockchainName::Ethereum,
        ));
        let ctx = SwapContext::new(wallet, Arc::new(MockHttp::new()))
            .with_public(public.clone());

        assert!(!trade.need_approve(&ctx, &router()).await.unwrap());
        // No allowance read was issued
        assert_eq!(public.call_count(), 0);
    }

    #[tokio::test]
    async fn test_need_approve_compares_live_allowance() {
        let public = MockPublic::new(BlockchainName::Ethereum)
            .stub("allowance(address,address)", vec![uint_word(50_000_000u64)]);
        let ctx = ctx_with(
            public,
            MockWallet::connected(wallet_addr(), BlockchainName::Ethereum),
        );
        assert!(base_trade().need_approve(&ctx, &router()).await.unwrap());

        let public = MockPublic::new(BlockchainName::Ethereum).stub(
            "allowance(address,address)",
            vec![uint_word(100_000_000u64)],
        );
        let ctx = ctx_with(
            public,
            MockWallet::connected(wallet_addr(), BlockchainName::Ethereum),
        );
        assert!(!base_trade().need_approve(&ctx, &router()).await.unwrap());
    }

    #[tokio::test]
    async fn test_execute_approves_before_swapping() {
        let public = MockPublic::new(BlockchainName::Ethereum)
            .stub("allowance(address,address)", vec![uint_word(0u64)])
            .stub("balanceOf(address)", vec![uint_word(500_000_000u64)]);
        let wallet = Arc::new(MockWallet::connected(
            wallet_addr(),
            BlockchainName::Ethereum,
        ));
        let ctx = SwapContext::new(wallet.clone(), Arc::new(MockHttp::new()))
            .with_public(Arc::new(public));

        let approvals = Arc::new(std::sync::Mutex::new(Vec::new()));
        let confirms = Arc::new(std::sync::Mutex::new(Vec::new()));
        let options = SwapOptions {
            on_approve: Some({
                let approvals = approvals.clone();
                Arc::new(move |hash: &causeway_core::TxHash| {
                    approvals.lock().unwrap().push(hash.clone());
                })
            }),
            on_confirm: Some({
                let confirms = confirms.clone();
                Arc::new(move |hash: &causeway_core::TxHash| {
                    confirms.lock().unwrap().push(hash.clone());
                })
            }),
            ..SwapOptions::default()
        };

        let swap_tx = TransactionRequest::new(router(), vec![0x01, 0x02, 0x03, 0x04]);
        base_trade()
            .execute(&ctx, &router(), swap_tx.clone(), &options)
            .await
            .unwrap();

        let sent = wallet.sent();
        assert_eq!(sent.len(), 2);
        // First the approve against the token, then the swap itself
        assert_eq!(&sent[0].1.data[..4], &[0x09, 0x5e, 0xa7, 0xb3]);
        assert_eq!(sent[0].1.to, base_trade().from.token().address);
        assert_eq!(sent[1].1.data, swap_tx.data);
        // Each step reported its hash
        assert_eq!(approvals.lock().unwrap().len(), 1);
        assert_eq!(confirms.lock().unwrap().len(), 1);
        assert_ne!(approvals.lock().unwrap()[0], confirms.lock().unwrap()[0]);
    }

    #[tokio::test]
    async fn test_approve_price_applies_gas_margin() {
        let public = MockPublic::new(BlockchainName::Ethereum)
            .with_gas_price(BigUint::from(20_000_000_000u64));
        let ctx = ctx_with(
            public,
            MockWallet::connected(wallet_addr(), BlockchainName::Ethereum),
        );

        // Mock estimate is 60k units; 1.2 margin lands on 72k
        let gas = base_trade().approve_price(&ctx, &router()).await.unwrap();
        assert_eq!(gas.gas_limit, BigUint::from(72_000u64));
        assert_eq!(gas.gas_price, BigUint::from(20_000_000_000u64));

        // Without a wallet there is nothing to estimate for
        let ctx = ctx_with(
            MockPublic::new(BlockchainName::Ethereum),
            MockWallet::disconnected(),
        );
        assert!(base_trade().approve_price(&ctx, &router()).await.is_none());
    }

    #[tokio::test]
    async fn test_invalid_receiver_rejected_before_any_call() {
        let ctx = ctx_with(
            MockPublic::new(BlockchainName::Ethereum),
            MockWallet::connected(wallet_addr(), BlockchainName::Ethereum),
        );
        let result = base_trade().receiver_or_wallet(&ctx, Some("not-an-address"));
        assert!(matches!(
            result,
            Err(ExecutionError::WrongReceiverAddress { .. })
        ));
    }
}
