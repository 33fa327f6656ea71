//! Per-network DEX contract tables
//!
//! One V2-compatible venue per network. Address constants are stored
//! lowercase; checksums are recomputed on display.

use causeway_core::{Address, BlockchainName};

/// Contract set of one V2-compatible DEX deployment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DexContracts {
    pub router: Address,
    pub factory: Address,
    pub wrapped_native: Address,
}

/// Swap fee applied by every supported venue: 0.3%
pub mod fees {
    pub const FEE_NUM: u32 = 997;
    pub const FEE_DENOM: u32 = 1000;
}

fn addr(s: &'static str) -> Address {
    s.parse().expect("constant address table entry")
}

/// DEX contracts for `chain`, `None` when no venue is configured
pub fn dex_contracts(chain: BlockchainName) -> Option<DexContracts> {
    let (router, factory, wrapped_native) = match chain {
        BlockchainName::Ethereum => (
            "0x7a250d5630b4cf539739df2c5dacb4c659f2488d",
            "0x5c69bee701ef814a2b6a3edd4b1652cb9cc8aa6f",
            "0xc02aaa39b223fe8d0a0e5c4f27ead9083c756cc2",
        ),
        BlockchainName::BinanceSmartChain => (
            "0x10ed43c718714eb63d5aa57b78b54704e256024e",
            "0xca143ce32fe78f1f7019d7d551a6402fc5350c73",
            "0xbb4cdb9cbd36b01bd1cbaebf2de08d9173bc095c",
        ),
        BlockchainName::Polygon => (
            "0xa5e0829caced8ffdd4de3c43696c57f7d7a678ff",
            "0x5757371414417b8c6caad45baef941abc7d3ab32",
            "0x0d500b1d8e8ef31e21c99d1db9a6444d3adf1270",
        ),
        BlockchainName::Avalanche => (
            "0x60ae616a2155ee3d9a68541ba4544862310933d4",
            "0x9ad6c38be94206ca50bb0d90783181662f0cfa10",
            "0xb31f66aa3c1e785363f0875a1b74e27b85fd66c7",
        ),
        BlockchainName::Fantom => (
            "0xf491e7b69e4244ad4002bc14e878a34207e38c29",
            "0x152ee697f2e276fa89e96742e9bb9ab1f2e61be3",
            "0x21be370d5312f44cb42ce377bc9b8a0cef1a4c83",
        ),
        BlockchainName::Arbitrum => (
            "0x1b02da8cb0d097eb8d57a175b88c7d8b47997506",
            "0xc35dadb65012ec5796536bd9864ed8773abc74c4",
            "0x82af49447d8a07e3bd95bd0d56f35241523fbab1",
        ),
        _ => return None,
    };

    Some(DexContracts {
        router: addr(router),
        factory: addr(factory),
        wrapped_native: addr(wrapped_native),
    })
}
