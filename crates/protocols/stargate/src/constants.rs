//! Stargate constant tables
//!
//! Pool ids, shared pool decimals, per-network pool support, the pool path
//! table and contract addresses. The shared-decimals table is the single
//! authoritative source for scaling between pool integer units and display
//! units; nothing else may infer a scale.

use causeway_core::{Address, BlockchainName};

pub type PoolId = u32;

/// Symbols of tokens with Stargate pools
pub mod bridge_tokens {
    pub const USDC: &str = "USDC";
    pub const USDT: &str = "USDT";
    pub const DAI: &str = "DAI";
    pub const FRAX: &str = "FRAX";
    pub const USDD: &str = "USDD";
    pub const ETH: &str = "ETH";
    pub const SUSD: &str = "sUSD";
    pub const LUSD: &str = "LUSD";
    pub const MAI: &str = "MAI";
    pub const METIS: &str = "METIS";
    pub const METIS_USDT: &str = "m.USDT";
}

use bridge_tokens as bt;

/// Networks Stargate can bridge between
pub const SUPPORTED_BLOCKCHAINS: &[BlockchainName] = &[
    BlockchainName::Ethereum,
    BlockchainName::BinanceSmartChain,
    BlockchainName::Polygon,
    BlockchainName::Avalanche,
    BlockchainName::Fantom,
    BlockchainName::Arbitrum,
    BlockchainName::Optimism,
    BlockchainName::Metis,
];

/// LayerZero chain id of a network
pub fn layer_zero_chain_id(chain: BlockchainName) -> u16 {
    match chain {
        BlockchainName::Ethereum => 101,
        BlockchainName::BinanceSmartChain => 102,
        BlockchainName::Avalanche => 106,
        BlockchainName::Polygon => 109,
        BlockchainName::Arbitrum => 110,
        BlockchainName::Optimism => 111,
        BlockchainName::Fantom => 112,
        BlockchainName::Metis => 151,
        BlockchainName::Base => 184,
    }
}

/// Pool id of a bridge token symbol
pub fn pool_id(symbol: &str) -> Option<PoolId> {
    let id = match symbol {
        bt::USDC => 1,
        bt::USDT => 2,
        bt::DAI => 3,
        bt::FRAX => 7,
        bt::USDD => 11,
        bt::ETH => 13,
        bt::SUSD => 14,
        bt::LUSD => 15,
        bt::MAI => 16,
        bt::METIS => 17,
        bt::METIS_USDT => 19,
        _ => return None,
    };
    Some(id)
}

/// Shared ("SD") decimals of a pool. Pool fee functions speak this scale.
pub fn pool_decimals(symbol: &str) -> u8 {
    match symbol {
        bt::ETH | bt::METIS => 18,
        _ => 6,
    }
}

/// Pools deployed on a network
pub fn supported_pools(chain: BlockchainName) -> &'static [PoolId] {
    match chain {
        BlockchainName::Ethereum => &[1, 2, 3, 7, 11, 13, 14, 15, 16, 17],
        BlockchainName::BinanceSmartChain => &[2, 11, 16, 19],
        BlockchainName::Polygon => &[1, 2, 3, 16],
        BlockchainName::Avalanche => &[1, 2, 7],
        BlockchainName::Fantom => &[1],
        BlockchainName::Arbitrum => &[1, 2, 7, 13, 15, 16],
        BlockchainName::Optimism => &[1, 3, 7, 13, 14, 15, 16],
        BlockchainName::Base => &[],
        BlockchainName::Metis => &[17, 19],
    }
}

/// Destination symbols reachable from `(from_chain, from_symbol)` on
/// `to_chain`. Absence means no pool path; an empty entry never occurs.
pub fn pool_path(
    from_chain: BlockchainName,
    from_symbol: &str,
    to_chain: BlockchainName,
) -> Option<&'static [&'static str]> {
    use BlockchainName::*;

    let path: &'static [&'static str] = match (from_chain, from_symbol, to_chain) {
        (Ethereum, bt::USDC, BinanceSmartChain) => &[bt::USDT],
        (Ethereum, bt::USDC, Polygon) => &[bt::USDC, bt::USDT],
        (Ethereum, bt::USDC, Avalanche) => &[bt::USDC, bt::USDT],
        (Ethereum, bt::USDC, Arbitrum) => &[bt::USDC],
        (Ethereum, bt::USDC, Optimism) => &[bt::USDC],
        (Ethereum, bt::USDC, Fantom) => &[bt::USDC],
        (Ethereum, bt::USDT, BinanceSmartChain) => &[bt::USDT],
        (Ethereum, bt::USDT, Polygon) => &[bt::USDC, bt::USDT],
        (Ethereum, bt::USDT, Avalanche) => &[bt::USDT],
        (Ethereum, bt::USDT, Arbitrum) => &[bt::USDT],
        (Ethereum, bt::ETH, Arbitrum) => &[bt::ETH],
        (Ethereum, bt::ETH, Optimism) => &[bt::ETH],
        (BinanceSmartChain, bt::USDT, Ethereum) => &[bt::USDC, bt::USDT],
        (BinanceSmartChain, bt::USDT, Polygon) => &[bt::USDC, bt::USDT],
        (BinanceSmartChain, bt::USDT, Avalanche) => &[bt::USDT],
        (BinanceSmartChain, bt::USDT, Arbitrum) => &[bt::USDT],
        (BinanceSmartChain, bt::USDT, Metis) => &[bt::METIS_USDT],
        (Polygon, bt::USDC, Ethereum) => &[bt::USDC],
        (Polygon, bt::USDC, Avalanche) => &[bt::USDC, bt::USDT],
        (Polygon, bt::USDC, BinanceSmartChain) => &[bt::USDT],
        (Polygon, bt::USDT, Ethereum) => &[bt::USDT],
        (Avalanche, bt::USDC, Ethereum) => &[bt::USDC],
        (Avalanche, bt::USDT, Ethereum) => &[bt::USDT],
        (Arbitrum, bt::ETH, Ethereum) => &[bt::ETH],
        (Arbitrum, bt::ETH, Optimism) => &[bt::ETH],
        (Arbitrum, bt::USDC, Ethereum) => &[bt::USDC],
        (Optimism, bt::ETH, Ethereum) => &[bt::ETH],
        (Optimism, bt::ETH, Arbitrum) => &[bt::ETH],
        (Metis, bt::METIS_USDT, BinanceSmartChain) => &[bt::USDT],
        _ => return None,
    };
    Some(path)
}

fn addr(s: &'static str) -> Address {
    s.parse().expect("constant address table entry")
}

/// Stargate router on a network
pub fn router_address(chain: BlockchainName) -> Address {
    addr(match chain {
        BlockchainName::Ethereum => "0x8731d54e9d02c286767d56ac03e8037c07e01e98",
        BlockchainName::BinanceSmartChain => "0x4a364f8c717caad9a442737eb7b8a55cc6cf18d8",
        BlockchainName::Polygon => "0x45a01e4e04f14f7a4a6702c74187c5f6222033cd",
        BlockchainName::Avalanche => "0x45a01e4e04f14f7a4a6702c74187c5f6222033cd",
        BlockchainName::Fantom => "0xaf5191b0de278c7286d6c7cc6ab6bb8a73ba2cd6",
        BlockchainName::Arbitrum => "0x53bf833a5d6c4dda888f69c22c88c9f356a41614",
        BlockchainName::Optimism => "0xb0d502e938ed5f4df2e681fe6e419ff29631d62b",
        BlockchainName::Base => "0x45f1a95a4d3f3836523f5c83673c797f4d4d263b",
        BlockchainName::Metis => "0x2f6f07cdcf3588944bf4c42ac74ff24bf56e7590",
    })
}

/// Fee library computing equilibrium and protocol fees
pub fn fee_library_address(chain: BlockchainName) -> Address {
    addr(match chain {
        BlockchainName::Ethereum => "0x8c3085d9a554884124c998cdb7f6d7219e9c1e6f",
        BlockchainName::BinanceSmartChain => "0xca6522116e8611a346d53cc2005ac4192e3fc2bc",
        BlockchainName::Polygon => "0xb279b324ea5648bea54e999eeb81e7a55ee3d17b",
        BlockchainName::Avalanche => "0x5e8eb15975c19db125b30f356cf740b7c2d383a9",
        BlockchainName::Fantom => "0x616a68bd6dad19e066661c7278611487d4072839",
        BlockchainName::Arbitrum => "0x1cf31666c06ac3401ed0c1c6346c4a9425dd7de4",
        BlockchainName::Optimism => "0x505eca609475bf1d76a1ebe49cfee7afc6cdbe06",
        BlockchainName::Base => "0x9d1b1669c73b033dfe47ae5a0164ab96df25b944",
        BlockchainName::Metis => "0x55bdb4164d28fbaf0898e0ef14a589ac09ac9970",
    })
}

/// Relayer executing the destination-side swap payload
pub fn relayer_address(chain: BlockchainName) -> Address {
    addr(match chain {
        BlockchainName::Ethereum => "0xe93685f3bba03016f02bd1828badd6195988d950",
        BlockchainName::BinanceSmartChain => "0xa27a2ca24dd28ce14fb5f5844b59851f03dcf182",
        BlockchainName::Polygon => "0x75dc8e5f50c8221a82ca6af64af811caa983b65f",
        BlockchainName::Avalanche => "0xcd2e3622d483c7dc855f72e5eafadcd577ac78b4",
        BlockchainName::Fantom => "0x52eea5c490fb89c7a0084b32feab854eeff07c82",
        BlockchainName::Arbitrum => "0x177d36dbe2271a4ddb2ad8304d82628eb921d790",
        BlockchainName::Optimism => "0x81e792e5a9003cc1c8bf5569a00f34b65d75b017",
        BlockchainName::Base => "0xcb566e3b6934fa77258d68ea18e931fa75e1aaaa",
        BlockchainName::Metis => "0x5b19bd330a84c049b62d5b0fc2ba120217a18c1c",
    })
}

/// Proxy facade holding integrator fee configuration.
/// One deployment address across all served networks.
pub fn fee_facade_address(_chain: BlockchainName) -> Address {
    addr("0x3335733c454805df6a77f825f266e136fb4a3333")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pool_ids() {
        assert_eq!(pool_id("USDC"), Some(1));
        assert_eq!(pool_id("m.USDT"), Some(19));
        assert_eq!(pool_id("DOGE"), None);
    }

    #[test]
    fn test_shared_decimals() {
        assert_eq!(pool_decimals("USDT"), 6);
        assert_eq!(pool_decimals("ETH"), 18);
        assert_eq!(pool_decimals("METIS"), 18);
    }

    #[test]
    fn test_pool_path_lookup() {
        let path = pool_path(
            BlockchainName::Ethereum,
            "USDT",
            BlockchainName::BinanceSmartChain,
        )
        .unwrap();
        assert!(path.contains(&"USDT"));

        assert!(pool_path(
            BlockchainName::Fantom,
            "ETH",
            BlockchainName::Ethereum
        )
        .is_none());
    }

    #[test]
    fn test_supported_pools_match_pool_ids() {
        // Every listed pool id maps back to some bridge token
        let known: Vec<PoolId> = [
            "USDC", "USDT", "DAI", "FRAX", "USDD", "ETH", "sUSD", "LUSD", "MAI", "METIS",
            "m.USDT",
        ]
        .iter()
        .filter_map(|s| pool_id(s))
        .collect();

        for chain in SUPPORTED_BLOCKCHAINS {
            for pool in supported_pools(*chain) {
                assert!(known.contains(pool), "unknown pool {pool} on {chain}");
            }
        }
    }

    #[test]
    fn test_address_tables_parse() {
        for chain in SUPPORTED_BLOCKCHAINS {
            assert!(!router_address(*chain).is_zero());
            assert!(!fee_library_address(*chain).is_zero());
            assert!(!relayer_address(*chain).is_zero());
        }
    }
}
