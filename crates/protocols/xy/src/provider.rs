//! XY quote calculation

use std::str::FromStr;

use async_trait::async_trait;
use num_bigint::BigUint;
use rust_decimal::Decimal;

use causeway_core::{
    Address, BlockchainName, CalculationError, ClientError, CryptoFee, Token, TokenAmount,
};
use cross_chain::{
    fee_reader, CrossChainOptions, CrossChainProvider, ProviderKind, SwapContext, TradeBase,
};
use evm_client::get_json;

use crate::models::{XySwapRequest, XySwapResponse};
use crate::status::analyze_status;
use crate::trade::XyTrade;

pub const API_ENDPOINT: &str = "https://open-api.xy.finance/v1";

/// Networks the XY aggregator serves
pub const SUPPORTED_BLOCKCHAINS: &[BlockchainName] = &[
    BlockchainName::Ethereum,
    BlockchainName::BinanceSmartChain,
    BlockchainName::Polygon,
    BlockchainName::Avalanche,
    BlockchainName::Fantom,
    BlockchainName::Arbitrum,
    BlockchainName::Optimism,
    BlockchainName::Base,
];

fn addr(s: &'static str) -> Address {
    s.parse().expect("constant address table entry")
}

/// Proxy facade holding integrator fee configuration for XY routes.
/// One deployment address across all served networks.
pub fn fee_facade_address(_chain: BlockchainName) -> Address {
    addr("0x1333333ac2009f7b0c1e77b522284848c376e333")
}

pub struct XyProvider {
    ctx: SwapContext,
    api_endpoint: String,
}

impl XyProvider {
    pub fn new(ctx: SwapContext) -> Self {
        Self {
            ctx,
            api_endpoint: API_ENDPOINT.to_string(),
        }
    }
}

#[async_trait]
impl CrossChainProvider for XyProvider {
    type Trade = XyTrade;

    fn kind(&self) -> ProviderKind {
        ProviderKind::Xy
    }

    fn is_supported_blockchain(&self, chain: BlockchainName) -> bool {
        SUPPORTED_BLOCKCHAINS.contains(&chain)
    }

    async fn calculate(
        &self,
        from: &TokenAmount,
        to: &Token,
        options: &CrossChainOptions,
    ) -> Result<XyTrade, CalculationError> {
        let src_chain = from.blockchain();
        let dst_chain = to.blockchain;
        if !self.are_supported_blockchains(src_chain, dst_chain) {
            return Err(CalculationError::NotSupportedTokens);
        }

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

        let receiver = options
            .receiver_address
            .clone()
            .or_else(|| {
                self.ctx
                    .wallet()
                    .address()
                    .map(|address| address.to_lowercase_hex())
            })
            .unwrap_or_else(|| Address::ZERO.to_lowercase_hex());

        let request = XySwapRequest {
            src_chain_id: src_chain.chain_id(),
            from_token_address: from.token().address.to_lowercase_hex(),
            amount: from_without_fee.wei().to_string(),
            // The API takes percent, the option carries a fraction
            slippage: (options.slippage_tolerance * Decimal::ONE_HUNDRED).to_string(),
            dest_chain_id: dst_chain.chain_id(),
            to_token_address: to.address.to_lowercase_hex(),
            receive_address: receiver,
        };

        let url = format!("{}/swap", self.api_endpoint);
        let response: XySwapResponse =
            get_json(&**self.ctx.http(), &url, &request.to_query()).await?;
        analyze_status(response.status_code.as_deref(), response.msg.as_deref())?;

        let to_wei_amount = response
            .to_token_amount
            .as_deref()
            .and_then(|amount| BigUint::from_str(amount).ok())
            .ok_or_else(|| {
                CalculationError::Unknown("quote carried no toTokenAmount".to_string())
            })?;
        let to_amount = TokenAmount::from_wei(to.clone(), to_wei_amount);

        // A missing fee field degrades precision, never the quote itself
        let mut fee_info = fee_info;
        if let Some(xy_fee) = &response.xy_fee {
            if let (Some(amount), Some(symbol)) = (
                xy_fee
                    .amount
                    .as_deref()
                    .and_then(|a| Decimal::from_str(a).ok()),
                xy_fee.symbol.as_deref(),
            ) {
                fee_info.crypto_fee = Some(CryptoFee {
                    amount,
                    token_symbol: symbol.to_string(),
                });
            } else {
                tracing::warn!("xy fee field present but incomplete, skipping crypto fee");
            }
        }

        let price_impact = from.price_impact_percent(&to_amount);
        let base = TradeBase::quoted(
            ProviderKind::Xy,
            from.clone(),
            to_amount,
            options.slippage_tolerance,
            fee_info,
            price_impact,
            options.provider_address,
        );

        Ok(XyTrade::new(
            self.ctx.clone(),
            base,
            request,
            response.tx.as_ref().and_then(crate::trade::parse_tx_data),
            self.api_endpoint.clone(),
        ))
    }
}

/// Decode a decimal or `0x`-prefixed quantity
pub(crate) fn parse_quantity(value: &str) -> Result<BigUint, ClientError> {
    if let Some(hex_digits) = value.strip_prefix("0x") {
        use num_traits::Num;
        BigUint::from_str_radix(hex_digits, 16)
            .map_err(|e| ClientError::Decode(format!("bad quantity {value}: {e}")))
    } else {
        BigUint::from_str(value)
            .map_err(|e| ClientError::Decode(format!("bad quantity {value}: {e}")))
    }
}
