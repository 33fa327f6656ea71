//! Integrator fee reads from the proxy facade router
//!
//! The facade contract stores, per integrator: a flat fee in native wei and
//! a platform percentage in parts-per-million. Values are read fresh per
//! calculation; any caching is the caller's concern.

use rust_decimal::Decimal;

use causeway_core::{
    from_wei, Address, BlockchainName, ClientError, CryptoFee, FeeInfo, FixedFee, PlatformFee,
};
use evm_client::{ContractCall, EvmPublic};
use evm_tx::abi::{word_to_uint, AbiValue};

/// Fraction denominator of the stored platform fee (parts-per-million)
const PLATFORM_FEE_SCALE: i64 = 1_000_000;

/// Flat integrator fee in the network's native coin
pub async fn read_fixed_fee(
    public: &dyn EvmPublic,
    router: Address,
    integrator: Address,
) -> Result<Decimal, ClientError> {
    let call = ContractCall::new(
        router,
        "fixedNativeFee(address)",
        &[AbiValue::Address(integrator)],
    )?;
    let words = public.call(&call).await?;
    let wei = words
        .first()
        .map(word_to_uint)
        .ok_or_else(|| ClientError::UnexpectedResponse("empty fixedNativeFee".to_string()))?;
    Ok(from_wei(&wei, 18))
}

/// Platform percentage for an integrator, as a fraction in `[0, 1)`
pub async fn read_platform_fee_percent(
    public: &dyn EvmPublic,
    router: Address,
    integrator: Address,
) -> Result<Decimal, ClientError> {
    let call = ContractCall::new(
        router,
        "platformFee(address)",
        &[AbiValue::Address(integrator)],
    )?;
    let words = public.call(&call).await?;
    let ppm = words
        .first()
        .map(word_to_uint)
        .ok_or_else(|| ClientError::UnexpectedResponse("empty platformFee".to_string()))?;

    let ppm = Decimal::from(u64::try_from(ppm).unwrap_or(u64::MAX));
    Ok(ppm / Decimal::from(PLATFORM_FEE_SCALE))
}

/// Assemble the facade-derived part of a trade's fee info. The crypto fee
/// slot stays empty here; providers fill it from their own messaging quote.
pub async fn read_fee_info(
    public: &dyn EvmPublic,
    chain: BlockchainName,
    router: Address,
    integrator: Address,
    percent_fee_symbol: &str,
) -> Result<FeeInfo, ClientError> {
    let fixed = read_fixed_fee(public, router, integrator).await?;
    let percent = read_platform_fee_percent(public, router, integrator).await?;

    Ok(FeeInfo {
        fixed_fee: Some(FixedFee {
            amount: fixed,
            token_symbol: chain.native_coin().symbol.to_string(),
        }),
        platform_fee: Some(PlatformFee {
            percent,
            token_symbol: percent_fee_symbol.to_string(),
        }),
        crypto_fee: None,
    })
}

/// Attach a provider-quoted messaging fee
pub fn with_crypto_fee(mut fee_info: FeeInfo, amount: Decimal, token_symbol: &str) -> FeeInfo {
    fee_info.crypto_fee = Some(CryptoFee {
        amount,
        token_symbol: token_symbol.to_string(),
    });
    fee_info
}
