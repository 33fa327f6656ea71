//! Configuration types for Causeway

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::Address;

/// SDK session configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SdkConfig {
    /// Integrator address used for fee lookups on the proxy facade
    #[serde(default = "default_integrator")]
    pub integrator_address: Address,

    /// Slippage tolerance fraction applied when an option does not override it
    #[serde(default = "default_slippage")]
    pub default_slippage: Decimal,

    /// Advisory timeout handed to HTTP/RPC clients, in seconds
    #[serde(default = "default_timeout_secs")]
    pub calculation_timeout_secs: u64,

    /// On-chain swap deadline, in minutes from submission
    #[serde(default = "default_deadline_minutes")]
    pub deadline_minutes: u64,
}

fn default_integrator() -> Address {
    Address::ZERO
}

fn default_slippage() -> Decimal {
    // 2%
    Decimal::new(2, 2)
}

fn default_timeout_secs() -> u64 {
    25
}

fn default_deadline_minutes() -> u64 {
    20
}

impl Default for SdkConfig {
    fn default() -> Self {
        Self {
            integrator_address: default_integrator(),
            default_slippage: default_slippage(),
            calculation_timeout_secs: default_timeout_secs(),
            deadline_minutes: default_deadline_minutes(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SdkConfig::default();
        assert_eq!(config.default_slippage, Decimal::new(2, 2));
        assert_eq!(config.calculation_timeout_secs, 25);
        assert!(config.integrator_address.is_zero());
    }

    #[test]
    fn test_partial_deserialization() {
        // Missing fields fall back to defaults
        let config: SdkConfig = serde_json::from_str(r#"{"default_slippage": "0.005"}"#).unwrap();
        assert_eq!(config.default_slippage, Decimal::new(5, 3));
        assert_eq!(config.deadline_minutes, 20);
    }
}
