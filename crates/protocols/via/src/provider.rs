//! Via quote calculation
//!
//! Routes are discovered over every page of the paginated API, filtered
//! through the on-chain router whitelist and ranked by net output value.
//! The whitelist is a security boundary: a cheaper non-whitelisted target
//! must never cross it.

use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use futures::future::join_all;
use num_bigint::BigUint;
use rust_decimal::Decimal;

use causeway_core::{
    from_wei, Address, BlockchainName, CalculationError, CryptoFee, Token, TokenAmount,
};
use cross_chain::{
    best_route_index, fee_reader, CrossChainOptions, CrossChainProvider, ProviderKind,
    RoutePricing, SwapContext, TradeBase,
};
use evm_client::{ContractCall, EvmPublic};
use evm_tx::abi::{word_to_address, word_to_uint, WORD};

use crate::api::ViaApi;
use crate::models::{ViaRoute, ViaRoutesRequest};
use crate::trade::ViaTrade;

/// Networks the Via router serves
pub const SUPPORTED_BLOCKCHAINS: &[BlockchainName] = &[
    BlockchainName::Ethereum,
    BlockchainName::BinanceSmartChain,
    BlockchainName::Polygon,
    BlockchainName::Avalanche,
    BlockchainName::Fantom,
    BlockchainName::Arbitrum,
    BlockchainName::Optimism,
];

fn addr(s: &'static str) -> Address {
    s.parse().expect("constant address table entry")
}

/// Via entry-point contract, also the source of the router whitelist.
/// One deployment address across all served networks.
pub fn via_contract_address(_chain: BlockchainName) -> Address {
    addr("0x2227733c454805df6a77f825f266e136fb4a3333")
}

pub struct ViaProvider {
    ctx: SwapContext,
    api: ViaApi,
}

impl ViaProvider {
    pub fn new(ctx: SwapContext) -> Self {
        let api = ViaApi::new(Arc::clone(ctx.http()));
        Self { ctx, api }
    }
}

#[async_trait]
impl CrossChainProvider for ViaProvider {
    type Trade = ViaTrade;

    fn kind(&self) -> ProviderKind {
        ProviderKind::Via
    }

    fn is_supported_blockchain(&self, chain: BlockchainName) -> bool {
        SUPPORTED_BLOCKCHAINS.contains(&chain)
    }

    async fn calculate(
        &self,
        from: &TokenAmount,
        to: &Token,
        options: &CrossChainOptions,
    ) -> Result<ViaTrade, CalculationError> {
        let src_chain = from.blockchain();
        let dst_chain = to.blockchain;
        if !self.are_supported_blockchains(src_chain, dst_chain) {
            return Err(CalculationError::NotSupportedTokens);
        }

        let public = self.ctx.public(src_chain)?;
        let via_contract = via_contract_address(src_chain);

        let fee_info = fee_reader::read_fee_info(
            &*public,
            src_chain,
            via_contract,
            options.provider_address,
            &from.token().symbol,
        )
        .await?;
        let from_without_fee = causeway_core::from_without_fee(
            from,
            fee_info.platform_fee.as_ref().map(|f| f.percent),
        );

        let request = ViaRoutesRequest {
            from_chain_id: src_chain.chain_id(),
            from_token_address: from.token().address.to_lowercase_hex(),
            from_amount: from_without_fee.wei().to_string(),
            to_chain_id: dst_chain.chain_id(),
            to_token_address: to.address.to_lowercase_hex(),
            from_address: via_contract.to_lowercase_hex(),
            multi_tx: false,
            limit: 1,
        };

        let routes = self.discover_routes(&request).await?;
        let routes = self
            .filter_whitelisted(&*public, via_contract, routes)
            .await?;
        if routes.is_empty() {
            return Err(CalculationError::NotSupportedTokens);
        }

        // Prices for ranking; local knowledge is the fallback
        let native = Token::native(src_chain);
        let queried = self
            .api
            .token_prices(
                src_chain.chain_id(),
                &[
                    from.token().address.to_lowercase_hex(),
                    native.address.to_lowercase_hex(),
                ],
            )
            .await
            .unwrap_or_else(|_| vec![from.token().price, None]);
        let native_price = queried.get(1).copied().flatten();
        let to_price = self
            .api
            .token_prices(dst_chain.chain_id(), &[to.address.to_lowercase_hex()])
            .await
            .ok()
            .and_then(|prices| prices.first().copied().flatten())
            .or(to.price);

        let pricing: Vec<RoutePricing> = routes
            .iter()
            .map(|route| RoutePricing {
                output_amount: route_output(route, to).unwrap_or(Decimal::ZERO),
                provider_fee: provider_fee_amount(route),
            })
            .collect();
        let best = best_route_index(&pricing, to_price, native_price)
            .ok_or(CalculationError::NotSupportedTokens)?;
        let route = routes
            .into_iter()
            .nth(best)
            .ok_or(CalculationError::NotSupportedTokens)?;

        let out_wei = route
            .to_token_amount
            .as_deref()
            .and_then(|amount| BigUint::from_str(amount).ok())
            .ok_or_else(|| {
                CalculationError::Unknown("route carried no toTokenAmount".to_string())
            })?;
        let to_amount = TokenAmount::from_wei(to.clone(), out_wei);

        // The route's own slippage defines the floor; percent, not fraction
        let route_slippage =
            route.slippage.unwrap_or(Decimal::ZERO) / Decimal::ONE_HUNDRED;
        let to_amount_min = to_amount.amount_minus_slippage(route_slippage);

        let mut fee_info = fee_info;
        if let Some(fee) = provider_fee_amount(&route) {
            fee_info.crypto_fee = Some(CryptoFee {
                amount: fee,
                token_symbol: crypto_fee_symbol(&route)
                    .unwrap_or_else(|| src_chain.native_coin().symbol.to_string()),
            });
        }

        let price_impact = from.price_impact_percent(&to_amount);
        let route_id = route
            .route_id
            .clone()
            .ok_or_else(|| CalculationError::Unknown("route carried no routeId".to_string()))?;

        let base = TradeBase::quoted(
            ProviderKind::Via,
            from.clone(),
            to_amount,
            options.slippage_tolerance,
            fee_info,
            price_impact,
            options.provider_address,
        )
        .with_to_amount_min(to_amount_min);

        let bridge = bridge_tool(&route);
        Ok(ViaTrade::new(
            self.ctx.clone(),
            base,
            self.api.clone(),
            route_id,
            via_contract,
            bridge,
        ))
    }
}

impl ViaProvider {
    /// Collect candidates across every discovery page, tolerating failed
    /// pages
    async fn discover_routes(
        &self,
        request: &ViaRoutesRequest,
    ) -> Result<Vec<ViaRoute>, CalculationError> {
        let pages = self.api.routes_pages().await?;
        let fetches = (1..=pages).map(|offset| self.api.get_routes(request, offset));
        let responses = join_all(fetches).await;

        let mut routes = Vec::new();
        for response in responses {
            match response {
                Ok(page) => routes.extend(page.routes),
                Err(err) => tracing::warn!("routes page failed, skipping: {err}"),
            }
        }
        Ok(routes)
    }

    /// Drop any candidate whose execution target is not whitelisted
    /// on-chain. Build failures drop the candidate too.
    async fn filter_whitelisted(
        &self,
        public: &dyn EvmPublic,
        via_contract: Address,
        routes: Vec<ViaRoute>,
    ) -> Result<Vec<ViaRoute>, CalculationError> {
        let call = ContractCall::new(via_contract, "getAvailableRouters()", &[])
            .map_err(|e| CalculationError::Unknown(e.to_string()))?;
        let words = public.call(&call).await?;
        let whitelist = decode_address_list(&words);

        let checks = routes.into_iter().map(|route| {
            let whitelist = &whitelist;
            let via_address = via_contract.to_lowercase_hex();
            async move {
                let route_id = route.route_id.as_deref()?;
                match self
                    .api
                    .build_tx(route_id, &via_address, &via_address, 0)
                    .await
                {
                    Ok(tx) => {
                        let target = Address::from_str(tx.to.as_deref()?).ok()?;
                        if whitelist.contains(&target) {
                            Some(route)
                        } else {
                            tracing::debug!("dropping route with non-whitelisted target {target}");
                            None
                        }
                    }
                    Err(err) => {
                        tracing::debug!("buildTx failed for candidate route: {err}");
                        None
                    }
                }
            }
        });

        Ok(join_all(checks).await.into_iter().flatten().collect())
    }
}

/// Name of the bridge executing the route's cross hop, normalized to its
/// leading word in lowercase ("Stargate V1" reports as "stargate")
pub fn bridge_tool(route: &ViaRoute) -> Option<String> {
    let name = route
        .actions
        .first()?
        .steps
        .iter()
        .find(|step| {
            step.tool
                .as_ref()
                .and_then(|tool| tool.tool_type.as_deref())
                == Some("cross")
        })?
        .tool
        .as_ref()?
        .name
        .as_deref()?;
    Some(name.split_whitespace().next()?.to_lowercase())
}

/// Output amount in destination display units
fn route_output(route: &ViaRoute, to: &Token) -> Option<Decimal> {
    let wei = BigUint::from_str(route.to_token_amount.as_deref()?).ok()?;
    Some(from_wei(&wei, to.decimals))
}

/// Bridge fee in native display units, from the first action
fn provider_fee_amount(route: &ViaRoute) -> Option<Decimal> {
    let fee = route.actions.first()?.additional_provider_fee.as_ref()?;
    let wei = BigUint::from_str(fee.amount.as_deref()?).ok()?;
    let decimals = fee.token.as_ref().and_then(|t| t.decimals).unwrap_or(18);
    Some(from_wei(&wei, decimals))
}

fn crypto_fee_symbol(route: &ViaRoute) -> Option<String> {
    route
        .actions
        .first()?
        .additional_provider_fee
        .as_ref()?
        .token
        .as_ref()?
        .symbol
        .clone()
}

/// Decode a returned `address[]`: offset word, length word, then elements
fn decode_address_list(words: &[[u8; WORD]]) -> Vec<Address> {
    if words.len() < 2 {
        return Vec::new();
    }
    let len = usize::try_from(word_to_uint(&words[1])).unwrap_or(0);
    words
        .iter()
        .skip(2)
        .take(len)
        .map(word_to_address)
        .collect()
}
