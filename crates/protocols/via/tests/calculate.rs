//! Route discovery, whitelist and selection tests

use std::str::FromStr;
use std::sync::Arc;

use rust_decimal::Decimal;
use serde_json::json;

use causeway_core::{Address, BlockchainName, CalculationError, Token, TokenAmount};
use cross_chain::{CrossChainOptions, CrossChainProvider, SwapContext};
use evm_client::testkit::{address_word, uint_word, MockHttp, MockPublic, MockWallet};
use via::{via_contract_address, ViaProvider};

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

fn whitelisted_router() -> Address {
    addr("0x10ed43c718714eb63d5aa57b78b54704e256024e")
}

fn fee_and_whitelist_stubs(whitelisted: &Address) -> MockPublic {
    MockPublic::new(BlockchainName::Ethereum)
        .stub("fixedNativeFee(address)", vec![uint_word(0u64)])
        .stub("platformFee(address)", vec![uint_word(0u64)])
        .stub(
            "getAvailableRouters()",
            vec![uint_word(32u64), uint_word(1u64), address_word(whitelisted)],
        )
}

fn routes_response() -> serde_json::Value {
    json!({
        "routes": [{
            "routeId": "route-1",
            // 990 destination USDT in 18 decimals
            "toTokenAmount": "990000000000000000000",
            "slippage": 1.0,
            "actions": [{
                "additionalProviderFee": {
                    "amount": "2000000000000000000",
                    "token": { "symbol": "BNB", "decimals": 18 }
                },
                "steps": [
                    { "tool": { "name": "pancakeswap", "type": "swap" } },
                    { "tool": { "name": "stargate v1", "type": "cross" } }
                ]
            }]
        }]
    })
}

fn http_with_routes(tx_target: &Address) -> MockHttp {
    MockHttp::new()
        .route("/api/v2/routes/pages", json!({ "pages": 2 }))
        .route("/api/v1/routes", routes_response())
        .route(
            "/api/v2/send/tx",
            json!({
                "to": tx_target.to_lowercase_hex(),
                "data": "0xdeadbeef",
                "value": "0"
            }),
        )
        .route("/api/v1/token_price", json!({}))
}

fn provider_with(
    public: MockPublic,
    http: MockHttp,
) -> (ViaProvider, Arc<MockPublic>, Arc<MockHttp>) {
    let public = Arc::new(public);
    let http = Arc::new(http);
    let ctx = SwapContext::new(Arc::new(MockWallet::disconnected()), http.clone())
        .with_public(public.clone());
    (ViaProvider::new(ctx), public, http)
}

#[tokio::test]
async fn whitelisted_route_becomes_trade() {
    let router = whitelisted_router();
    let (provider, _, http) =
        provider_with(fee_and_whitelist_stubs(&router), http_with_routes(&router));
    let from = TokenAmount::from_amount(eth_usdt(), d("1000"));

    let trade = provider
        .calculate(&from, &bsc_usdt(), &CrossChainOptions::default())
        .await
        .unwrap();

    assert_eq!(trade.to().amount(), d("990"));
    // The route's own 1% slippage defines the floor
    assert_eq!(trade.to_amount_min(), d("980.1"));
    assert_eq!(trade.fee_info().crypto_fee.as_ref().unwrap().amount, d("2"));
    assert_eq!(
        trade.fee_info().crypto_fee.as_ref().unwrap().token_symbol,
        "BNB"
    );
    assert_eq!(trade.bridge(), Some("stargate"));

    // Both discovery pages were fetched
    let route_fetches = http
        .requests()
        .iter()
        .filter(|(url, _)| url.contains("/api/v1/routes"))
        .count();
    assert_eq!(route_fetches, 2);
}

#[tokio::test]
async fn non_whitelisted_targets_never_reach_trade_construction() {
    // The built transaction targets an address missing from the whitelist
    let unlisted = addr("0x7a250d5630b4cf539739df2c5dacb4c659f2488d");
    let (provider, _, _) = provider_with(
        fee_and_whitelist_stubs(&whitelisted_router()),
        http_with_routes(&unlisted),
    );
    let from = TokenAmount::from_amount(eth_usdt(), d("1000"));

    let result = provider
        .calculate(&from, &bsc_usdt(), &CrossChainOptions::default())
        .await;
    // No route survives: a calm no-route outcome, not a crash
    assert!(matches!(result, Err(CalculationError::NotSupportedTokens)));
}

#[tokio::test]
async fn empty_discovery_is_no_route() {
    let http = MockHttp::new()
        .route("/api/v2/routes/pages", json!({ "pages": 1 }))
        .route("/api/v1/routes", json!({ "routes": [] }));
    let (provider, _, _) =
        provider_with(fee_and_whitelist_stubs(&whitelisted_router()), http);
    let from = TokenAmount::from_amount(eth_usdt(), d("1000"));

    let result = provider
        .calculate(&from, &bsc_usdt(), &CrossChainOptions::default())
        .await;
    assert!(matches!(result, Err(CalculationError::NotSupportedTokens)));
}

#[tokio::test]
async fn unsupported_blockchain_issues_no_requests() {
    let (provider, public, http) = provider_with(
        fee_and_whitelist_stubs(&whitelisted_router()),
        http_with_routes(&whitelisted_router()),
    );
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
async fn discovery_sends_exact_parameter_names() {
    let router = whitelisted_router();
    let (provider, _, http) =
        provider_with(fee_and_whitelist_stubs(&router), http_with_routes(&router));
    let from = TokenAmount::from_amount(eth_usdt(), d("1000"));

    provider
        .calculate(&from, &bsc_usdt(), &CrossChainOptions::default())
        .await
        .unwrap();

    let requests = http.requests();
    let (_, params) = requests
        .iter()
        .find(|(url, _)| url.contains("/api/v1/routes"))
        .unwrap();
    let names: Vec<&str> = params.iter().map(|(name, _)| name.as_str()).collect();
    for expected in [
        "fromChainId",
        "fromTokenAddress",
        "fromAmount",
        "toChainId",
        "toTokenAddress",
        "fromAddress",
        "multiTx",
        "limit",
        "offset",
    ] {
        assert!(names.contains(&expected), "missing parameter {expected}");
    }
    // The route contract fronts the discovery request
    let from_address = params
        .iter()
        .find(|(name, _)| name == "fromAddress")
        .map(|(_, value)| value.clone())
        .unwrap();
    assert_eq!(
        from_address,
        via_contract_address(BlockchainName::Ethereum).to_lowercase_hex()
    );
}
