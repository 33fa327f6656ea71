//! Constant-product swap math (x · y = k)
//!
//! All arithmetic on minimal units in big integers; price impact is reported
//! in percent as an exact decimal derived from basis points.

use num_bigint::BigUint;
use num_traits::Zero;
use rust_decimal::Decimal;

/// Output amount for a single pool hop.
///
/// `output = reserves_out · input · fee_num / (reserves_in · fee_denom + input · fee_num)`
pub fn calculate_output(
    reserves_in: &BigUint,
    reserves_out: &BigUint,
    input: &BigUint,
    fee_num: u32,
    fee_denom: u32,
) -> BigUint {
    if reserves_in.is_zero() || reserves_out.is_zero() || input.is_zero() {
        return BigUint::zero();
    }

    let numerator = reserves_out * input * fee_num;
    let denominator = reserves_in * fee_denom + input * fee_num;
    numerator / denominator
}

/// Price impact across a route, in percent.
///
/// The spot ratio is the product of per-hop `reserves_out / reserves_in`;
/// the execution ratio is `output / input`. Impact in basis points:
/// `10000 − output · Π(reserves_in) · 10000 / (input · Π(reserves_out))`,
/// clamped at zero.
pub fn route_price_impact_percent(
    reserves: &[(BigUint, BigUint)],
    input: &BigUint,
    output: &BigUint,
) -> Decimal {
    if input.is_zero() || output.is_zero() || reserves.is_empty() {
        return Decimal::ZERO;
    }

    let mut spot_in = BigUint::from(1u8);
    let mut spot_out = BigUint::from(1u8);
    for (reserve_in, reserve_out) in reserves {
        if reserve_in.is_zero() || reserve_out.is_zero() {
            return Decimal::ZERO;
        }
        spot_in *= reserve_in;
        spot_out *= reserve_out;
    }

    let executed_share = output * spot_in * BigUint::from(10_000u32) / (input * spot_out);
    let bps = 10_000u64.saturating_sub(u64::try_from(executed_share).unwrap_or(u64::MAX));
    Decimal::from(bps) / Decimal::ONE_HUNDRED
}
