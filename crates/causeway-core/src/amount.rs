//! Conversions between human-unit and minimal-unit token amounts
//!
//! Human amounts are `rust_decimal::Decimal`, minimal (on-chain integer)
//! amounts are `num_bigint::BigUint`. The invariant maintained everywhere:
//! `human × 10^decimals == minimal`, truncated toward zero at conversion.
//! Floating point is never involved.

use num_bigint::{BigInt, BigUint, Sign};
use num_traits::Zero;
use rust_decimal::Decimal;
use std::str::FromStr;

/// `10^decimals` as a big integer
pub fn wei_pow10(decimals: u8) -> BigUint {
    BigUint::from(10u8).pow(decimals as u32)
}

/// Convert a human-unit amount to minimal units, truncating digits beyond
/// the token's precision. Negative inputs clamp to zero: minimal units are
/// unsigned on-chain.
pub fn to_wei(amount: Decimal, decimals: u8) -> BigUint {
    if amount.is_sign_negative() {
        return BigUint::zero();
    }
    let scale = amount.scale();
    let mantissa = BigUint::from(amount.mantissa().unsigned_abs());
    if u32::from(decimals) >= scale {
        mantissa * wei_pow10(decimals) / wei_pow10(scale as u8)
    } else {
        mantissa / BigUint::from(10u8).pow(scale - u32::from(decimals))
    }
}

/// Convert minimal units to a human-unit decimal.
///
/// `Decimal` holds at most 28 significant digits; excess fractional digits
/// are truncated and an integer part that cannot fit saturates to
/// `Decimal::MAX`. Real token amounts stay far below either bound.
pub fn from_wei(wei: &BigUint, decimals: u8) -> Decimal {
    let digits = wei.to_string();
    let decimals = decimals as usize;

    let padded = if digits.len() <= decimals {
        format!("{:0>width$}", digits, width = decimals + 1)
    } else {
        digits
    };
    let split = padded.len() - decimals;
    let int_part = &padded[..split];
    let mut frac_part = padded[split..].trim_end_matches('0').to_string();

    let int_digits = int_part.trim_start_matches('0').len();
    while int_digits + frac_part.len() > 28 && !frac_part.is_empty() {
        frac_part.pop();
    }

    let repr = if frac_part.is_empty() {
        int_part.to_string()
    } else {
        format!("{int_part}.{frac_part}")
    };
    Decimal::from_str(&repr).unwrap_or(Decimal::MAX)
}

/// Signed variant of [`from_wei`], for fee compositions that can go negative
/// (an equilibrium reward exceeding the charged fees).
pub fn from_wei_signed(wei: &BigInt, decimals: u8) -> Decimal {
    let (sign, magnitude) = wei.clone().into_parts();
    let value = from_wei(&magnitude, decimals);
    match sign {
        Sign::Minus => -value,
        _ => value,
    }
}
