//! Via trade entity
//!
//! Execution builds the transaction through the Via API at submission time
//! with the real sender and receiver.

use std::str::FromStr;

use num_bigint::BigUint;
use num_traits::Num;
use rust_decimal::Decimal;

use causeway_core::{Address, ClientError, ExecutionError, FeeInfo, TokenAmount, TxHash};
use cross_chain::{ApproveOptions, EncodeOptions, SwapContext, SwapOptions, TradeBase};
use evm_tx::TransactionRequest;

use crate::api::ViaApi;
use crate::models::ViaBuildTxResponse;

#[derive(Clone)]
pub struct ViaTrade {
    ctx: SwapContext,
    pub base: TradeBase,
    api: ViaApi,
    route_id: String,
    /// Approval target; the executing router itself is resolved per build
    via_contract: Address,
    /// Bridge carrying the cross hop, when the route named one
    bridge: Option<String>,
}

impl ViaTrade {
    pub(crate) fn new(
        ctx: SwapContext,
        base: TradeBase,
        api: ViaApi,
        route_id: String,
        via_contract: Address,
        bridge: Option<String>,
    ) -> Self {
        Self {
            ctx,
            base,
            api,
            route_id,
            via_contract,
            bridge,
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

    pub fn route_id(&self) -> &str {
        &self.route_id
    }

    /// Bridge carrying the cross hop, e.g. "stargate"
    pub fn bridge(&self) -> Option<&str> {
        self.bridge.as_deref()
    }

    pub async fn need_approve(&self) -> Result<bool, ExecutionError> {
        self.base.need_approve(&self.ctx, &self.via_contract).await
    }

    pub async fn approve(&self, options: &ApproveOptions) -> Result<TxHash, ExecutionError> {
        self.base
            .approve(&self.ctx, &self.via_contract, options)
            .await
    }

    /// Build the route's transaction without submitting
    pub async fn encode(
        &self,
        options: &EncodeOptions,
    ) -> Result<TransactionRequest, ExecutionError> {
        let sender = self.base.parse_from_address(&options.from_address)?;
        let receiver = match &options.receiver_address {
            Some(address) => self.base.parse_receiver_address(address)?,
            None => sender,
        };
        self.build_tx(&sender, &receiver).await
    }

    /// Pre-flight, approve when needed, then submit through the wallet
    pub async fn swap(&self, options: &SwapOptions) -> Result<TxHash, ExecutionError> {
        let sender = self.base.wallet_address(&self.ctx)?;
        let receiver = self
            .base
            .receiver_or_wallet(&self.ctx, options.receiver_address.as_deref())?;
        let tx = self.build_tx(&sender, &receiver).await?;
        self.base
            .execute(&self.ctx, &self.via_contract, tx, options)
            .await
    }

    async fn build_tx(
        &self,
        sender: &Address,
        receiver: &Address,
    ) -> Result<TransactionRequest, ExecutionError> {
        let response = self
            .api
            .build_tx(
                &self.route_id,
                &sender.to_lowercase_hex(),
                &receiver.to_lowercase_hex(),
                0,
            )
            .await
            .map_err(ExecutionError::Client)?;
        parse_build_response(&response)
            .ok_or(ExecutionError::MissingParam("transaction data"))
    }
}

fn parse_build_response(response: &ViaBuildTxResponse) -> Option<TransactionRequest> {
    let to = Address::from_str(response.to.as_deref()?).ok()?;
    let data = hex::decode(response.data.as_deref()?.trim_start_matches("0x")).ok()?;
    let value = match response.value.as_deref() {
        Some(value) => parse_quantity(value).ok()?,
        None => BigUint::from(0u8),
    };
    Some(TransactionRequest::new(to, data).with_value(value))
}

fn parse_quantity(value: &str) -> Result<BigUint, ClientError> {
    if let Some(hex_digits) = value.strip_prefix("0x") {
        BigUint::from_str_radix(hex_digits, 16)
            .map_err(|e| ClientError::Decode(format!("bad quantity {value}: {e}")))
    } else {
        BigUint::from_str(value)
            .map_err(|e| ClientError::Decode(format!("bad quantity {value}: {e}")))
    }
}
