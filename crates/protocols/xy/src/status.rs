//! XY status code normalization
//!
//! Raw API codes are mapped to the closed error taxonomy immediately on
//! receipt; nothing downstream matches on code strings.

use std::str::FromStr;

use rust_decimal::Decimal;

use causeway_core::CalculationError;

/// Convert a raw status code and message into a calculation outcome
pub fn analyze_status(code: Option<&str>, msg: Option<&str>) -> Result<(), CalculationError> {
    match code.unwrap_or_default() {
        "0" => Ok(()),
        "3" | "4" => Err(CalculationError::InsufficientLiquidity),
        "6" => Err(parse_min_amount(msg)),
        _ => Err(CalculationError::Unknown(
            msg.unwrap_or("Unknown error").to_string(),
        )),
    }
}

/// Extract the minimum and its symbol from a code-6 message, shaped like
/// `"Amount needs to be larger than or equal to 10.5 USDT)"`.
fn parse_min_amount(msg: Option<&str>) -> CalculationError {
    let Some(msg) = msg else {
        return CalculationError::Unknown("minimum amount not specified".to_string());
    };

    let parsed = msg.rsplit("to ").next().and_then(|tail| {
        let tail = tail.trim_end_matches(')');
        let mut parts = tail.split_whitespace();
        let min = Decimal::from_str(parts.next()?).ok()?;
        let symbol = parts.next()?;
        Some((min, symbol.to_string()))
    });

    match parsed {
        Some((min, token_symbol)) => CalculationError::MinAmount { min, token_symbol },
        None => CalculationError::Unknown(msg.to_string()),
    }
}
