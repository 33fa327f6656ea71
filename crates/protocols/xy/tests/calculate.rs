//! Calculation pipeline tests against scripted HTTP and chain reads

use std::str::FromStr;
use std::sync::Arc;

use rust_decimal::Decimal;
use serde_json::json;

use causeway_core::{Address, BlockchainName, CalculationError, Token, TokenAmount};
use cross_chain::{CrossChainOptions, CrossChainProvider, SwapContext};
use evm_client::testkit::{uint_word, MockHttp, MockPublic, MockWallet};
use xy::XyProvider;

fn d(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn addr(s: &str) -> Address {
    Address::from_str(s).unwrap()
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

fn fee_stubs() -> MockPublic {
    MockPublic::new(BlockchainName::Ethereum)
        .stub("fixedNativeFee(address)", vec![uint_word(0u64)])
        .stub("platformFee(address)", vec![uint_word(0u64)])
}

fn provider_with(public: MockPublic, http: MockHttp) -> (XyProvider, Arc<MockPublic>, Arc<MockHttp>) {
    let public = Arc::new(public);
    let http = Arc::new(http);
    let ctx = SwapContext::new(Arc::new(MockWallet::disconnected()), http.clone())
        .with_public(public.clone());
    (XyProvider::new(ctx), public, http)
}

fn quote_response() -> serde_json::Value {
    json!({
        "success": true,
        "statusCode": 0,
        "msg": "OK",
        // 995 destination USDT in 18 decimals
        "toTokenAmount": "995000000000000000000",
        "xyFee": { "amount": "0.4", "symbol": "USDT" },
        "contractAddress": "0x1333333ac2009f7b0c1e77b522284848c376e333",
        "tx": {
            "to": "0x1333333ac2009f7b0c1e77b522284848c376e333",
            "data": "0xdeadbeef",
            "value": "0"
        }
    })
}

#[tokio::test]
async fn quote_maps_response_into_trade() {
    let (provider, _, http) = provider_with(fee_stubs(), MockHttp::new().route("/swap", quote_response()));
    let from = TokenAmount::from_amount(eth_usdt(), d("1000"));

    let trade = provider
        .calculate(&from, &bsc_usdt(), &CrossChainOptions::default())
        .await
        .unwrap();

    assert_eq!(trade.to().amount(), d("995"));
    assert_eq!(trade.to().token().decimals, 18);
    assert!(trade.to_amount_min() <= trade.to().amount());
    assert_eq!(trade.fee_info().crypto_fee.as_ref().unwrap().amount, d("0.4"));

    // Outbound parameters reproduce the API's names and units
    let requests = http.requests();
    assert_eq!(requests.len(), 1);
    let params = &requests[0].1;
    let get = |name: &str| {
        params
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.clone())
    };
    assert_eq!(get("srcChainId").as_deref(), Some("1"));
    assert_eq!(get("destChainId").as_deref(), Some("56"));
    // 2% fraction crosses the boundary as percent
    assert_eq!(get("slippage").as_deref(), Some("2.00"));
    assert_eq!(get("amount").as_deref(), Some("1000000000"));
    assert!(get("receiveAddress").is_some());
}

#[tokio::test]
async fn quote_is_idempotent() {
    let (provider, _, _) = provider_with(fee_stubs(), MockHttp::new().route("/swap", quote_response()));
    let from = TokenAmount::from_amount(eth_usdt(), d("1000"));
    let options = CrossChainOptions::default();

    let first = provider.calculate(&from, &bsc_usdt(), &options).await.unwrap();
    let second = provider.calculate(&from, &bsc_usdt(), &options).await.unwrap();
    assert_eq!(first.to().amount(), second.to().amount());
    assert_eq!(first.fee_info(), second.fee_info());
}

#[tokio::test]
async fn unsupported_blockchain_issues_no_requests() {
    let (provider, public, http) =
        provider_with(fee_stubs(), MockHttp::new().route("/swap", quote_response()));
    let metis_token = Token::new(
        BlockchainName::Metis,
        addr("0x0000000000000000000000000000000000000042"),
        "m.USDT",
        6,
    );
    let from = TokenAmount::from_amount(metis_token, d("100"));

    let result = provider
        .calculate(&from, &bsc_usdt(), &CrossChainOptions::default())
        .await;
    assert!(matches!(result, Err(CalculationError::NotSupportedTokens)));
    assert_eq!(public.call_count(), 0);
    assert!(http.requests().is_empty());
}

#[tokio::test]
async fn liquidity_status_maps_to_taxonomy() {
    let response = json!({ "statusCode": "4", "msg": "not enough depth" });
    let (provider, _, _) = provider_with(fee_stubs(), MockHttp::new().route("/swap", response));
    let from = TokenAmount::from_amount(eth_usdt(), d("1000"));

    let result = provider
        .calculate(&from, &bsc_usdt(), &CrossChainOptions::default())
        .await;
    assert!(matches!(
        result,
        Err(CalculationError::InsufficientLiquidity)
    ));
}

#[tokio::test]
async fn min_amount_status_carries_minimum() {
    let response = json!({
        "statusCode": "6",
        "msg": "Amount needs to be larger than or equal to 50 USDT)"
    });
    let (provider, _, _) = provider_with(fee_stubs(), MockHttp::new().route("/swap", response));
    let from = TokenAmount::from_amount(eth_usdt(), d("10"));

    let result = provider
        .calculate(&from, &bsc_usdt(), &CrossChainOptions::default())
        .await;
    match result {
        Err(CalculationError::MinAmount { min, token_symbol }) => {
            assert_eq!(min, d("50"));
            assert_eq!(token_symbol, "USDT");
        }
        other => panic!("expected MinAmount, got {other:?}"),
    }
}

#[tokio::test]
async fn http_failure_becomes_unknown() {
    // No /swap route registered: the fetch fails
    let (provider, _, _) = provider_with(fee_stubs(), MockHttp::new());
    let from = TokenAmount::from_amount(eth_usdt(), d("1000"));

    let result = provider
        .calculate(&from, &bsc_usdt(), &CrossChainOptions::default())
        .await;
    assert!(matches!(result, Err(CalculationError::Unknown(_))));
}
