//! Stargate quote calculation
//!
//! The pipeline per request: allow-list check, facade fee read, platform
//! fee deduction, direct-route detection (pre-swap into the bridge token
//! when necessary), pool fee read in shared decimals, LayerZero messaging
//! fee quote, trade assembly. Everything after the allow-list check is
//! fallible and classified at this boundary.

use async_trait::async_trait;
use num_bigint::BigUint;
use rust_decimal::Decimal;

use causeway_core::{
    from_wei, pool_fee, to_wei, Address, BlockchainName, CalculationError, Token, TokenAmount,
};
use cross_chain::{
    fee_reader, CrossChainOptions, CrossChainProvider, ProviderKind, SwapContext, TradeBase,
};
use evm_client::{ContractCall, EvmPublic};
use evm_tx::abi::{word_to_address, word_to_uint, AbiValue};
use uniswap_v2::{OnChainOptions, OnChainProvider};

use crate::constants::{
    self, bridge_tokens, fee_facade_address, fee_library_address, layer_zero_chain_id, pool_id,
    pool_path, relayer_address, router_address, supported_pools, PoolId,
};
use crate::trade::StargateTrade;

const GET_FEES_SIG: &str = "getFees(uint256,uint256,uint16,address,uint256)";
const QUOTE_LZ_FEE_SIG: &str = "quoteLayerZeroFee(uint16,uint8,bytes,bytes,(uint256,uint256,bytes))";

/// Fee probe result for one candidate source pool. `None` means the probe
/// failed and the pool ranks as infinitely costly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolFeeQuote {
    pub pool: PoolId,
    pub amount: Option<BigUint>,
}

pub struct StargateProvider {
    ctx: SwapContext,
    on_chain: OnChainProvider,
}

impl StargateProvider {
    pub fn new(ctx: SwapContext) -> Self {
        Self {
            on_chain: OnChainProvider::new(ctx.clone()),
            ctx,
        }
    }
}

#[async_trait]
impl CrossChainProvider for StargateProvider {
    type Trade = StargateTrade;

    fn kind(&self) -> ProviderKind {
        ProviderKind::Stargate
    }

    fn is_supported_blockchain(&self, chain: BlockchainName) -> bool {
        constants::SUPPORTED_BLOCKCHAINS.contains(&chain)
    }

    async fn calculate(
        &self,
        from: &TokenAmount,
        to: &Token,
        options: &CrossChainOptions,
    ) -> Result<StargateTrade, CalculationError> {
        if !self.are_supported_blockchains(from.blockchain(), to.blockchain) {
            return Err(CalculationError::NotSupportedTokens);
        }

        let direct = has_direct_route(from.token(), to)?;
        if direct && from.token().is_native() && to.is_native() {
            return Err(CalculationError::Unknown(
                "Native bridge is not supported".to_string(),
            ));
        }

        self.quote(from, to, options, direct).await
    }
}

impl StargateProvider {
    async fn quote(
        &self,
        from: &TokenAmount,
        to: &Token,
        options: &CrossChainOptions,
        direct: bool,
    ) -> Result<StargateTrade, CalculationError> {
        let src_chain = from.blockchain();
        let dst_chain = to.blockchain;
        let public = self.ctx.public(src_chain)?;

        let fee_info = fee_reader::read_fee_info(
            &*public,
            src_chain,
            fee_facade_address(src_chain),
            options.provider_address,
            &from.token().symbol,
        )
        .await?;
        let from_without_fee = causeway_core::from_without_fee(
            from,
            fee_info.platform_fee.as_ref().map(|f| f.percent),
        );

        // Transit leg: the amount actually handed to the bridge, in the
        // bridge token. A pre-swap burns half the slippage budget.
        let (transit, src_trade) = if direct {
            (from_without_fee.clone(), None)
        } else {
            if !options.use_proxy {
                return Err(CalculationError::NotSupportedTokens);
            }
            let transit_token = self
                .resolve_transit_token(&*public, from.token(), to)
                .await?;
            tracing::debug!(
                "no direct route, pre-swapping into {} before the bridge",
                transit_token.symbol
            );
            let pre_swap = self
                .on_chain
                .calculate(
                    &from_without_fee,
                    &transit_token,
                    &OnChainOptions {
                        slippage_tolerance: options.slippage_tolerance / Decimal::TWO,
                        ..OnChainOptions::default()
                    },
                )
                .await
                .map_err(|_| CalculationError::NotSupportedTokens)?;
            let guaranteed = pre_swap.to().with_amount(pre_swap.to_amount_min());
            (guaranteed, Some(pre_swap))
        };

        let transit_symbol = transit.token().symbol.clone();
        let src_pool = pool_id(&transit_symbol).ok_or(CalculationError::NotSupportedTokens)?;
        let dst_pool = pool_id(&to.symbol).ok_or(CalculationError::NotSupportedTokens)?;

        let pool_fee_amount = self
            .fetch_pool_fee(
                &*public,
                src_chain,
                dst_chain,
                src_pool,
                dst_pool,
                &transit_symbol,
                transit.amount(),
            )
            .await?;
        let amount_out_min = transit.amount() - pool_fee_amount;
        let to_amount = TokenAmount::from_amount(to.clone(), amount_out_min);

        let messaging_fee_wei = self
            .quote_layer_zero_fee(&*public, src_chain, dst_chain, None)
            .await?;
        let native = src_chain.native_coin();
        let fee_info = fee_reader::with_crypto_fee(
            fee_info,
            from_wei(&messaging_fee_wei, native.decimals),
            native.symbol,
        );

        let price_impact = transit.price_impact_percent(&to_amount);
        let min_amount_ld = to_wei(
            to_amount.amount_minus_slippage(options.slippage_tolerance),
            transit.token().decimals,
        );
        let amount_ld = transit.wei().clone();

        let base = TradeBase::quoted(
            ProviderKind::Stargate,
            from.clone(),
            to_amount,
            options.slippage_tolerance,
            fee_info,
            price_impact,
            options.provider_address,
        );
        Ok(StargateTrade::new(
            self.ctx.clone(),
            base,
            src_trade,
            None,
            src_pool,
            dst_pool,
            router_address(src_chain),
            layer_zero_chain_id(dst_chain),
            amount_ld,
            min_amount_ld,
            messaging_fee_wei,
        ))
    }

    /// Pool fee in display units for a transit amount, read from the fee
    /// library and scaled by the authoritative shared-decimals table.
    #[allow(clippy::too_many_arguments)]
    async fn fetch_pool_fee(
        &self,
        public: &dyn EvmPublic,
        src_chain: BlockchainName,
        dst_chain: BlockchainName,
        src_pool: PoolId,
        dst_pool: PoolId,
        transit_symbol: &str,
        transit_amount: Decimal,
    ) -> Result<Decimal, CalculationError> {
        let shared_decimals = constants::pool_decimals(transit_symbol);
        let amount_sd = to_wei(transit_amount, shared_decimals);

        // Metis USDT settles through the m.USDT pool on whichever side
        // carries plain USDT.
        let (mut src_pool, mut dst_pool) = (src_pool, dst_pool);
        let musd = pool_id(bridge_tokens::METIS_USDT).unwrap_or(19);
        let usdt = pool_id(bridge_tokens::USDT).unwrap_or(2);
        if dst_pool == musd && src_pool == usdt {
            src_pool = musd;
        }
        if src_pool == musd && dst_pool == usdt {
            dst_pool = musd;
        }

        let call = ContractCall::new(
            fee_library_address(src_chain),
            GET_FEES_SIG,
            &[
                AbiValue::Uint(BigUint::from(src_pool)),
                AbiValue::Uint(BigUint::from(dst_pool)),
                AbiValue::Uint(BigUint::from(layer_zero_chain_id(dst_chain))),
                AbiValue::Address(Address::ZERO),
                AbiValue::Uint(amount_sd),
            ],
        )
        .map_err(|_| CalculationError::NotSupportedTokens)?;

        let words = public
            .call(&call)
            .await
            .map_err(|_| CalculationError::NotSupportedTokens)?;
        if words.len() < 5 {
            return Err(CalculationError::Unknown(
                "malformed getFees response".to_string(),
            ));
        }

        let eq_fee = word_to_uint(&words[1]);
        let eq_reward = word_to_uint(&words[2]);
        let protocol_fee = word_to_uint(&words[4]);
        Ok(pool_fee(&eq_fee, &protocol_fee, &eq_reward, shared_decimals))
    }

    /// Native-coin fee quoted by the router for delivering the LayerZero
    /// message, parameterized by whether a destination swap payload rides
    /// along.
    async fn quote_layer_zero_fee(
        &self,
        public: &dyn EvmPublic,
        src_chain: BlockchainName,
        dst_chain: BlockchainName,
        dst_swap_payload: Option<Vec<u8>>,
    ) -> Result<BigUint, CalculationError> {
        let wallet = self.ctx.wallet().address().unwrap_or(Address::ZERO);
        let lz_params = match &dst_swap_payload {
            // A payload needs destination gas and the relayer as receiver
            Some(_) => AbiValue::Tuple(vec![
                AbiValue::Uint(BigUint::from(750_000u32)),
                AbiValue::Uint(BigUint::from(0u8)),
                AbiValue::Bytes(relayer_address(dst_chain).as_bytes().to_vec()),
            ]),
            None => AbiValue::Tuple(vec![
                AbiValue::Uint(BigUint::from(0u8)),
                AbiValue::Uint(BigUint::from(0u8)),
                AbiValue::Bytes(wallet.as_bytes().to_vec()),
            ]),
        };

        let call = ContractCall::new(
            router_address(src_chain),
            QUOTE_LZ_FEE_SIG,
            &[
                AbiValue::Uint(BigUint::from(layer_zero_chain_id(dst_chain))),
                AbiValue::Uint(BigUint::from(1u8)),
                AbiValue::Bytes(wallet.as_bytes().to_vec()),
                AbiValue::Bytes(dst_swap_payload.unwrap_or_default()),
                lz_params,
            ],
        )
        .map_err(|e| CalculationError::Unknown(e.to_string()))?;

        let words = public.call(&call).await?;
        words
            .first()
            .map(word_to_uint)
            .ok_or_else(|| CalculationError::Unknown("empty quoteLayerZeroFee".to_string()))
    }

    /// The source-chain token backing the destination symbol's pool, used
    /// as the pre-swap target when no direct route exists.
    async fn resolve_transit_token(
        &self,
        public: &dyn EvmPublic,
        from_token: &Token,
        to: &Token,
    ) -> Result<Token, CalculationError> {
        // The destination direction must know a path back to the source
        pool_path(to.blockchain, &to.symbol, from_token.blockchain)
            .ok_or(CalculationError::NotSupportedTokens)?;
        let pool = pool_id(&to.symbol).ok_or(CalculationError::NotSupportedTokens)?;

        let router = router_address(from_token.blockchain);
        let factory = self
            .read_address(public, ContractCall::new(router, "factory()", &[])?)
            .await?;
        let pool_address = self
            .read_address(
                public,
                ContractCall::new(
                    factory,
                    "getPool(uint256)",
                    &[AbiValue::Uint(BigUint::from(pool))],
                )?,
            )
            .await?;
        let token_address = self
            .read_address(public, ContractCall::new(pool_address, "token()", &[])?)
            .await?;

        let decimals_call = ContractCall::new(token_address, "decimals()", &[])?;
        let words = public.call(&decimals_call).await?;
        let decimals = words
            .first()
            .map(word_to_uint)
            .and_then(|v| u8::try_from(v).ok())
            .ok_or_else(|| CalculationError::Unknown("bad decimals response".to_string()))?;

        Ok(Token::new(
            from_token.blockchain,
            token_address,
            to.symbol.clone(),
            decimals,
        ))
    }

    async fn read_address(
        &self,
        public: &dyn EvmPublic,
        call: ContractCall,
    ) -> Result<Address, CalculationError> {
        let words = public.call(&call).await?;
        words
            .first()
            .map(word_to_address)
            .ok_or_else(|| CalculationError::Unknown("empty address response".to_string()))
    }

    /// Pre-transfer pool health check: refuses the route when the pool
    /// needs rebalancing (the charged fee exceeds the protocol subsidy).
    pub async fn check_equilibrium_fee(
        &self,
        from: &TokenAmount,
        to: &Token,
    ) -> Result<(), CalculationError> {
        let src_pool =
            pool_id(&from.token().symbol).ok_or(CalculationError::NotSupportedTokens)?;
        let dst_pool = pool_id(&to.symbol).ok_or(CalculationError::NotSupportedTokens)?;
        let shared_decimals = constants::pool_decimals(&from.token().symbol);
        let amount_sd = to_wei(from.amount(), shared_decimals);

        let public = self.ctx.public(from.blockchain())?;
        let call = ContractCall::new(
            fee_library_address(from.blockchain()),
            "getEquilibriumFee(uint256,uint256,uint16,uint256,bool,bool)",
            &[
                AbiValue::Uint(BigUint::from(src_pool)),
                AbiValue::Uint(BigUint::from(dst_pool)),
                AbiValue::Uint(BigUint::from(layer_zero_chain_id(to.blockchain))),
                AbiValue::Uint(amount_sd),
                AbiValue::Bool(false),
                AbiValue::Bool(false),
            ],
        )
        .map_err(|_| CalculationError::NotSupportedTokens)?;

        let words = public
            .call(&call)
            .await
            .map_err(|_| CalculationError::NotSupportedTokens)?;
        if words.len() < 2 {
            return Err(CalculationError::NotSupportedTokens);
        }
        let fee = word_to_uint(&words[0]);
        let protocol_subsidy = word_to_uint(&words[1]);
        if protocol_subsidy < fee {
            return Err(CalculationError::Unknown(
                "Rebalancing need detected".to_string(),
            ));
        }
        Ok(())
    }

    /// Probe every source pool that can reach the destination pool, ranked
    /// by total fee ascending with pool id as the deterministic tie-break.
    /// Failed probes rank last instead of failing the batch.
    pub async fn fetch_multiple_pool_fees(
        &self,
        from: &TokenAmount,
        to: &Token,
    ) -> Result<Vec<PoolFeeQuote>, CalculationError> {
        let src_chain = from.blockchain();
        let src_pools = supported_pools(src_chain);
        let dst_pool = pool_id(&to.symbol).ok_or(CalculationError::NotSupportedTokens)?;
        let dst_chain_id = layer_zero_chain_id(to.blockchain);
        let wallet = self.ctx.wallet().address().unwrap_or(Address::ZERO);

        let shared_decimals = constants::pool_decimals(&from.token().symbol);
        let amount_sd = to_wei(from.amount(), shared_decimals);

        let calls = src_pools
            .iter()
            .map(|src_pool| {
                ContractCall::new(
                    fee_library_address(src_chain),
                    GET_FEES_SIG,
                    &[
                        AbiValue::Uint(BigUint::from(*src_pool)),
                        AbiValue::Uint(BigUint::from(dst_pool)),
                        AbiValue::Uint(BigUint::from(dst_chain_id)),
                        AbiValue::Address(wallet),
                        AbiValue::Uint(amount_sd.clone()),
                    ],
                )
            })
            .collect::<Result<Vec<_>, _>>()
            .map_err(|_| CalculationError::NotSupportedTokens)?;

        let public = self.ctx.public(src_chain)?;
        let outcomes = public.multicall(&calls).await;

        let mut quotes: Vec<PoolFeeQuote> = src_pools
            .iter()
            .zip(outcomes)
            .map(|(pool, outcome)| {
                let amount = (outcome.success && outcome.words.len() >= 5).then(|| {
                    word_to_uint(&outcome.words[1]) + word_to_uint(&outcome.words[4])
                });
                PoolFeeQuote {
                    pool: *pool,
                    amount,
                }
            })
            .collect();

        quotes.sort_by(|a, b| match (&a.amount, &b.amount) {
            (Some(x), Some(y)) => x.cmp(y).then(a.pool.cmp(&b.pool)),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => a.pool.cmp(&b.pool),
        });
        Ok(quotes)
    }
}

/// Whether the pool path table reaches `to` straight from `from`.
///
/// A destination token without a supported pool is unroutable outright; a
/// source token without one may still work through a pre-swap.
fn has_direct_route(from: &Token, to: &Token) -> Result<bool, CalculationError> {
    let dst_supported = pool_id(&to.symbol)
        .map(|id| supported_pools(to.blockchain).contains(&id))
        .unwrap_or(false);
    if !dst_supported {
        return Err(CalculationError::NotSupportedTokens);
    }

    let src_supported = pool_id(&from.symbol)
        .map(|id| supported_pools(from.blockchain).contains(&id))
        .unwrap_or(false);
    if !src_supported {
        return Ok(false);
    }

    Ok(
        pool_path(from.blockchain, &from.symbol, to.blockchain)
            .map(|targets| targets.iter().any(|target| *target == to.symbol))
            .unwrap_or(false),
    )
}
