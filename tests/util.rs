// tests/util.rs
// Shared test helpers for integration tests

#![allow(dead_code)]

use std::sync::Arc;

use evm_hd_wallet::core::config::WalletConfig;
use evm_hd_wallet::core::WalletManager;
use evm_hd_wallet::storage::WalletStorage;
use tempfile::TempDir;

pub const TEST_MNEMONIC: &str = "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";
pub const TEST_ADDRESS: &str = "0x9858EfFD232B4033E47d90003D41EC34EcaEda94";
pub const TEST_PRIVATE_KEY: &str = "0x1ab42cc412b618bdea3a599e3c9bae199ebf030895b039e9db1e30dafb12b727";

/// `sqlite://` URL for a fresh database file inside `dir`.
pub fn db_url(dir: &TempDir) -> String {
    format!("sqlite://{}", dir.path().join("wallet.db").display())
}

/// File-backed store in a temp dir; keep the `TempDir` alive for the test's duration.
pub async fn temp_storage() -> (TempDir, WalletStorage) {
    let dir = tempfile::tempdir().expect("tempdir");
    let storage = WalletStorage::new_with_url(&db_url(&dir)).await.expect("open storage");
    (dir, storage)
}

pub async fn temp_manager() -> (TempDir, WalletManager) {
    temp_manager_with(WalletConfig::default()).await
}

pub async fn temp_manager_with(mut config: WalletConfig) -> (TempDir, WalletManager) {
    let dir = tempfile::tempdir().expect("tempdir");
    config.storage.database_url = db_url(&dir);
    let storage = WalletStorage::open(&config.storage).await.expect("open storage");
    (dir, WalletManager::with_storage(config, Arc::new(storage)))
}
