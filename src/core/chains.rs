//! Supported EVM chains
//!
//! Every chain shares the Ethereum BIP44 path, so one phrase yields the same
//! address on all of them. The path is still stored per chain so a chain can
//! move to its own path without touching the derivation code.

/// Ethereum BIP44 path: m/44'/60'/0'/0/0
pub const EVM_SHARED_PATH: &str = "m/44'/60'/0'/0/0";

/// Catalog row seeded into the `chains` table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChainSpec {
    pub id: i64,
    pub key: &'static str,
    pub name: &'static str,
    pub symbol: &'static str,
    pub derivation_path: &'static str,
}

pub const DEFAULT_CHAINS: [ChainSpec; 3] = [
    ChainSpec {
        id: 1,
        key: "ethereum",
        name: "Ethereum",
        symbol: "ETH",
        derivation_path: EVM_SHARED_PATH,
    },
    ChainSpec {
        id: 137,
        key: "polygon",
        name: "Polygon",
        symbol: "MATIC",
        derivation_path: EVM_SHARED_PATH,
    },
    ChainSpec {
        id: 56,
        key: "bsc",
        name: "BNB Smart Chain",
        symbol: "BNB",
        derivation_path: EVM_SHARED_PATH,
    },
];

/// Chains an account is derived for when a wallet is created or imported.
pub const DEFAULT_CHAINS_TO_SHOW: [i64; 3] = [1, 137, 56];

pub fn find_default(id: i64) -> Option<&'static ChainSpec> {
    DEFAULT_CHAINS.iter().find(|c| c.id == id)
}
