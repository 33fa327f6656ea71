//! On-chain quote calculation
//!
//! Discovers a pair (direct, or one hop through the wrapped native token),
//! reads live reserves and prices the swap locally with constant-product
//! math.

use num_bigint::BigUint;
use num_traits::Zero;
use rust_decimal::Decimal;

use causeway_core::{
    Address, BlockchainName, CalculationError, ClientError, FeeInfo, Token, TokenAmount,
};
use cross_chain::{ProviderKind, SwapContext, TradeBase};
use evm_client::{ContractCall, EvmPublic};
use evm_tx::abi::{word_to_address, word_to_uint, AbiValue};

use crate::calculator::{calculate_output, route_price_impact_percent};
use crate::constants::{dex_contracts, fees, DexContracts};
use crate::trade::OnChainTrade;

/// Options for an on-chain quote
#[derive(Debug, Clone)]
pub struct OnChainOptions {
    /// Maximum acceptable output deviation, fraction in `[0, 1)`
    pub slippage_tolerance: Decimal,
    /// Swap deadline in minutes from submission
    pub deadline_minutes: u64,
    /// Only quote direct pairs
    pub disable_multihops: bool,
}

impl Default for OnChainOptions {
    fn default() -> Self {
        Self {
            // 2%
            slippage_tolerance: Decimal::new(2, 2),
            deadline_minutes: 20,
            disable_multihops: false,
        }
    }
}

/// V2-style DEX quote provider for one SDK session
#[derive(Clone)]
pub struct OnChainProvider {
    ctx: SwapContext,
}

impl OnChainProvider {
    pub fn new(ctx: SwapContext) -> Self {
        Self { ctx }
    }

    pub fn is_supported_blockchain(chain: BlockchainName) -> bool {
        dex_contracts(chain).is_some()
    }

    /// Quote `from -> to` on a single network.
    ///
    /// Total at this boundary: transport and contract failures come back
    /// classified, never raised.
    pub async fn calculate(
        &self,
        from: &TokenAmount,
        to: &Token,
        options: &OnChainOptions,
    ) -> Result<OnChainTrade, CalculationError> {
        let chain = from.blockchain();
        if chain != to.blockchain || !Self::is_supported_blockchain(chain) {
            return Err(CalculationError::NotSupportedTokens);
        }
        let contracts =
            dex_contracts(chain).ok_or(CalculationError::NotSupportedTokens)?;

        let from_leg = effective_address(from.token(), &contracts);
        let to_leg = effective_address(to, &contracts);
        if from_leg == to_leg {
            // Wrap/unwrap is not a swap
            return Err(CalculationError::NotSupportedTokens);
        }

        let public = self.ctx.public(chain)?;
        let (path, reserves) = self
            .find_route(&*public, &contracts, from_leg, to_leg, options)
            .await?;

        let mut amount_out = from.wei().clone();
        for (reserve_in, reserve_out) in &reserves {
            amount_out = calculate_output(
                reserve_in,
                reserve_out,
                &amount_out,
                fees::FEE_NUM,
                fees::FEE_DENOM,
            );
        }
        if amount_out.is_zero() {
            return Err(CalculationError::InsufficientLiquidity);
        }

        let price_impact = route_price_impact_percent(&reserves, from.wei(), &amount_out);
        let to_amount = TokenAmount::from_wei(to.clone(), amount_out);

        let base = TradeBase::quoted(
            ProviderKind::UniswapV2,
            from.clone(),
            to_amount,
            options.slippage_tolerance,
            FeeInfo::default(),
            Some(price_impact),
            Address::ZERO,
        );
        Ok(OnChainTrade::new(
            self.ctx.clone(),
            base,
            path,
            contracts.router,
            options.deadline_minutes,
        ))
    }

    async fn find_route(
        &self,
        public: &dyn EvmPublic,
        contracts: &DexContracts,
        from_leg: Address,
        to_leg: Address,
        options: &OnChainOptions,
    ) -> Result<(Vec<Address>, Vec<(BigUint, BigUint)>), CalculationError> {
        if let Some(direct) = pair_reserves(public, contracts.factory, from_leg, to_leg).await? {
            return Ok((vec![from_leg, to_leg], vec![direct]));
        }

        let wrapped = contracts.wrapped_native;
        if options.disable_multihops || from_leg == wrapped || to_leg == wrapped {
            return Err(CalculationError::NotSupportedTokens);
        }

        tracing::debug!("no direct pair, trying a hop through the wrapped native token");
        let first = pair_reserves(public, contracts.factory, from_leg, wrapped).await?;
        let second = pair_reserves(public, contracts.factory, wrapped, to_leg).await?;
        match (first, second) {
            (Some(first), Some(second)) => {
                Ok((vec![from_leg, wrapped, to_leg], vec![first, second]))
            }
            _ => Err(CalculationError::NotSupportedTokens),
        }
    }
}

fn effective_address(token: &Token, contracts: &DexContracts) -> Address {
    if token.is_native() {
        contracts.wrapped_native
    } else {
        token.address
    }
}

/// Reserves of the `(a, b)` pair oriented as `(reserve_a, reserve_b)`.
/// `None` when the factory knows no such pair.
async fn pair_reserves(
    public: &dyn EvmPublic,
    factory: Address,
    a: Address,
    b: Address,
) -> Result<Option<(BigUint, BigUint)>, ClientError> {
    let lookup = ContractCall::new(
        factory,
        "getPair(address,address)",
        &[AbiValue::Address(a), AbiValue::Address(b)],
    )?;
    let words = public.call(&lookup).await?;
    let pair = words
        .first()
        .map(word_to_address)
        .ok_or_else(|| ClientError::UnexpectedResponse("empty getPair response".to_string()))?;
    if pair.is_zero() {
        return Ok(None);
    }

    let reserves_call = ContractCall::new(pair, "getReserves()", &[])?;
    let words = public.call(&reserves_call).await?;
    if words.len() < 2 {
        return Err(ClientError::UnexpectedResponse(
            "getReserves returned fewer than 2 words".to_string(),
        ));
    }
    let (reserve0, reserve1) = (word_to_uint(&words[0]), word_to_uint(&words[1]));

    // token0 is the numerically smaller address
    if a.as_bytes() < b.as_bytes() {
        Ok(Some((reserve0, reserve1)))
    } else {
        Ok(Some((reserve1, reserve0)))
    }
}
