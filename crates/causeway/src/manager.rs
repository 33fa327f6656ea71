//! Calculation manager
//!
//! Fans a quote request out to every enabled provider concurrently. Each
//! calculation runs on its own data; a slow or failing provider never
//! blocks or poisons the others. Results come back best-first.

use causeway_core::{CalculationError, Token, TokenAmount};
use cross_chain::{CrossChainOptions, CrossChainProvider, ProviderKind, SwapContext};
use stargate::StargateProvider;
use via::ViaProvider;
use xy::XyProvider;

use crate::trade::CrossChainTrade;

/// Which providers the manager consults
#[derive(Debug, Clone)]
pub struct ManagerConfig {
    pub stargate: bool,
    pub xy: bool,
    pub via: bool,
}

impl Default for ManagerConfig {
    fn default() -> Self {
        Self {
            stargate: true,
            xy: true,
            via: true,
        }
    }
}

/// Per-provider calculation outcome. Failures are first-class: a provider
/// with no route reports why instead of disappearing.
pub struct QuoteOutcome {
    pub provider: ProviderKind,
    pub result: Result<CrossChainTrade, CalculationError>,
}

pub struct CalculationManager {
    config: ManagerConfig,
    stargate: StargateProvider,
    xy: XyProvider,
    via: ViaProvider,
}

impl CalculationManager {
    pub fn new(ctx: SwapContext) -> Self {
        Self::with_config(ctx, ManagerConfig::default())
    }

    pub fn with_config(ctx: SwapContext, config: ManagerConfig) -> Self {
        Self {
            config,
            stargate: StargateProvider::new(ctx.clone()),
            xy: XyProvider::new(ctx.clone()),
            via: ViaProvider::new(ctx),
        }
    }

    /// Quote `from -> to` with every enabled provider, best outcome first.
    ///
    /// Successful trades rank by output value (USD when priced, raw amount
    /// otherwise); failed providers follow in consultation order.
    pub async fn calculate(
        &self,
        from: &TokenAmount,
        to: &Token,
        options: &CrossChainOptions,
    ) -> Vec<QuoteOutcome> {
        let (stargate, xy, via) = tokio::join!(
            async {
                if !self.config.stargate {
                    return None;
                }
                Some(QuoteOutcome {
                    provider: ProviderKind::Stargate,
                    result: self
                        .stargate
                        .calculate(from, to, options)
                        .await
                        .map(CrossChainTrade::Stargate),
                })
            },
            async {
                if !self.config.xy {
                    return None;
                }
                Some(QuoteOutcome {
                    provider: ProviderKind::Xy,
                    result: self
                        .xy
                        .calculate(from, to, options)
                        .await
                        .map(CrossChainTrade::Xy),
                })
            },
            async {
                if !self.config.via {
                    return None;
                }
                Some(QuoteOutcome {
                    provider: ProviderKind::Via,
                    result: self
                        .via
                        .calculate(from, to, options)
                        .await
                        .map(CrossChainTrade::Via),
                })
            },
        );

        let mut outcomes: Vec<QuoteOutcome> =
            [stargate, xy, via].into_iter().flatten().collect();
        for outcome in &outcomes {
            if let Err(err) = &outcome.result {
                tracing::debug!(provider = %outcome.provider, "no route: {err}");
            }
        }

        // Stable: equal-value trades keep consultation order
        outcomes.sort_by(|a, b| match (&a.result, &b.result) {
            (Ok(x), Ok(y)) => y.output_value().cmp(&x.output_value()),
            (Ok(_), Err(_)) => std::cmp::Ordering::Less,
            (Err(_), Ok(_)) => std::cmp::Ordering::Greater,
            (Err(_), Err(_)) => std::cmp::Ordering::Equal,
        });
        outcomes
    }

    /// Best successful trade, when any provider found a route
    pub async fn calculate_best(
        &self,
        from: &TokenAmount,
        to: &Token,
        options: &CrossChainOptions,
    ) -> Option<CrossChainTrade> {
        self.calculate(from, to, options)
            .await
            .into_iter()
            .find_map(|outcome| outcome.result.ok())
    }
}
