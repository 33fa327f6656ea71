//! Best-route selection for multi-route providers
//!
//! Candidates reaching this point must already have passed the execution
//! target whitelist; selection is purely economic. The ordering is total
//! and stable: ties keep the first-seen candidate, so a fixed candidate set
//! always yields the same choice.

use rust_decimal::Decimal;

/// Economic view of one candidate route
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutePricing {
    /// Output amount in destination-token units
    pub output_amount: Decimal,
    /// Provider fee in native-coin units, when the route charges one
    pub provider_fee: Option<Decimal>,
}

/// Index of the best candidate.
///
/// With a known destination-token price, routes are compared by
/// `to_price × output − native_price × provider_fee`; without one, raw
/// output amounts decide. Returns `None` for an empty set: the "no route"
/// outcome, not an error.
pub fn best_route_index(
    candidates: &[RoutePricing],
    to_token_price: Option<Decimal>,
    native_token_price: Option<Decimal>,
) -> Option<usize> {
    let score = |candidate: &RoutePricing| -> Decimal {
        match to_token_price {
            Some(to_price) => {
                let fee_cost = match (native_token_price, candidate.provider_fee) {
                    (Some(native_price), Some(fee)) => native_price * fee,
                    _ => Decimal::ZERO,
                };
                to_price * candidate.output_amount - fee_cost
            }
            None => candidate.output_amount,
        }
    };

    let mut best: Option<(usize, Decimal)> = None;
    for (index, candidate) in candidates.iter().enumerate() {
        let value = score(candidate);
        match best {
            // Strict comparison keeps the first-seen candidate on ties
            Some((_, best_value)) if value <= best_value => {}
            _ => best = Some((index, value)),
        }
    }
    best.map(|(index, _)| index)
}
