//! Wallet Manager Core Module
//!
//! Orchestrates the wallet workflows on top of the derivation engine and the store.
//!
//! ## Module Structure
//! - `lifecycle` - create, import and delete
//! - `derivation` - one account per configured chain, derived before anything is written
//! - `keys` - recovery phrase generation and checks
//! - `selection` - selected-wallet refresh for the presentation layer

pub mod derivation;
pub mod keys;
pub mod lifecycle;
pub mod selection;

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::core::config::WalletConfig;
use crate::core::errors::WalletError;
use crate::storage::{WalletStorage, WalletStorageTrait};

/// Name used when a wallet is created with a blank name.
pub const DEFAULT_WALLET_NAME: &str = "My Wallet";
/// Name used when a wallet is imported with a blank name.
pub const DEFAULT_IMPORTED_WALLET_NAME: &str = "Imported Wallet";

/// Wallet manager
///
/// Single owner of the store for the process. Every mutating workflow takes
/// `write_gate` first, so at most one create/import/delete runs at a time.
pub struct WalletManager {
    pub config: WalletConfig,
    storage: Arc<dyn WalletStorageTrait>,
    write_gate: Mutex<()>,
}

impl WalletManager {
    /// Validate `config`, open the configured database and build a manager on top of it.
    pub async fn new(config: &WalletConfig) -> Result<Self, WalletError> {
        config.validate()?;
        let storage = WalletStorage::open(&config.storage).await?;
        Ok(Self::with_storage(config.clone(), Arc::new(storage)))
    }

    /// Build a manager over an already opened store.
    pub fn with_storage(config: WalletConfig, storage: Arc<dyn WalletStorageTrait>) -> Self {
        Self { config, storage, write_gate: Mutex::new(()) }
    }

    pub fn storage(&self) -> &Arc<dyn WalletStorageTrait> {
        &self.storage
    }
}

fn effective_name<'a>(name: &'a str, fallback: &'a str) -> &'a str {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        fallback
    } else {
        trimmed
    }
}
