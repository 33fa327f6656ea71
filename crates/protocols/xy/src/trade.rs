//! XY trade entity
//!
//! The API returns a prebuilt transaction with the quote; execution reuses
//! it when the receiver is unchanged and re-quotes otherwise.

use std::str::FromStr;

use num_bigint::BigUint;
use rust_decimal::Decimal;

use causeway_core::{Address, ExecutionError, FeeInfo, TokenAmount, TxHash};
use cross_chain::{ApproveOptions, EncodeOptions, SwapContext, SwapOptions, TradeBase};
use evm_client::get_json;
use evm_tx::TransactionRequest;

use crate::models::{XySwapResponse, XyTxData};
use crate::provider::parse_quantity;
use crate::status::analyze_status;

#[derive(Clone)]
pub struct XyTrade {
    ctx: SwapContext,
    pub base: TradeBase,
    /// The quote request, reproduced verbatim when execution re-quotes
    request: crate::models::XySwapRequest,
    /// Transaction returned alongside the quote
    tx: Option<TransactionRequest>,
    api_endpoint: String,
}

impl std::fmt::Debug for XyTrade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("XyTrade")
            .field("base", &self.base)
            .field("request", &self.request)
            .field("tx", &self.tx)
            .field("api_endpoint", &self.api_endpoint)
            .finish_non_exhaustive()
    }
}

impl XyTrade {
    pub(crate) fn new(
        ctx: SwapContext,
        base: TradeBase,
        request: crate::models::XySwapRequest,
        tx: Option<TransactionRequest>,
        api_endpoint: String,
    ) -> Self {
        Self {
            ctx,
            base,
            request,
            tx,
            api_endpoint,
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

    fn spender(&self) -> Result<Address, ExecutionError> {
        self.tx
            .as_ref()
            .map(|tx| tx.to)
            .ok_or(ExecutionError::MissingParam("transaction target"))
    }

    pub async fn need_approve(&self) -> Result<bool, ExecutionError> {
        let spender = self.spender()?;
        self.base.need_approve(&self.ctx, &spender).await
    }

    pub async fn approve(&self, options: &ApproveOptions) -> Result<TxHash, ExecutionError> {
        let spender = self.spender()?;
        self.base.approve(&self.ctx, &spender, options).await
    }

    /// Build (or re-quote) the transaction without submitting
    pub async fn encode(
        &self,
        options: &EncodeOptions,
    ) -> Result<TransactionRequest, ExecutionError> {
        self.base.parse_from_address(&options.from_address)?;
        match &options.receiver_address {
            Some(receiver) => {
                let receiver = self.base.parse_receiver_address(receiver)?;
                self.fetch_tx(&receiver.to_lowercase_hex()).await
            }
            None => self.current_tx().await,
        }
    }

    /// Pre-flight, approve when needed, then submit through the wallet
    pub async fn swap(&self, options: &SwapOptions) -> Result<TxHash, ExecutionError> {
        let tx = match &options.receiver_address {
            Some(receiver) => {
                let receiver = self.base.parse_receiver_address(receiver)?;
                self.fetch_tx(&receiver.to_lowercase_hex()).await?
            }
            None => self.current_tx().await?,
        };
        let spender = tx.to;
        self.base.execute(&self.ctx, &spender, tx, options).await
    }

    async fn current_tx(&self) -> Result<TransactionRequest, ExecutionError> {
        match &self.tx {
            Some(tx) => Ok(tx.clone()),
            None => self.fetch_tx(&self.request.receive_address.clone()).await,
        }
    }

    /// Re-quote with the original parameters and a (possibly new) receiver
    async fn fetch_tx(&self, receiver: &str) -> Result<TransactionRequest, ExecutionError> {
        let mut request = self.request.clone();
        request.receive_address = receiver.to_string();

        let url = format!("{}/swap", self.api_endpoint);
        let response: XySwapResponse =
            get_json(&**self.ctx.http(), &url, &request.to_query())
                .await
                .map_err(ExecutionError::Client)?;
        if let Err(err) = analyze_status(response.status_code.as_deref(), response.msg.as_deref()) {
            return Err(ExecutionError::Client(
                causeway_core::ClientError::UnexpectedResponse(err.to_string()),
            ));
        }

        response
            .tx
            .as_ref()
            .and_then(parse_tx_data)
            .ok_or(ExecutionError::MissingParam("transaction data"))
    }
}

/// Parse the API's transaction fields; `None` when anything essential is
/// missing or malformed.
pub(crate) fn parse_tx_data(tx: &XyTxData) -> Option<TransactionRequest> {
    let to = Address::from_str(tx.to.as_deref()?).ok()?;
    let data = hex::decode(tx.data.as_deref()?.trim_start_matches("0x")).ok()?;
    let value = match tx.value.as_deref() {
        Some(value) => parse_quantity(value).ok()?,
        None => BigUint::from(0u8),
    };
    Some(TransactionRequest::new(to, data).with_value(value))
}
