// src/core/wallet_info.rs
use std::fmt;

use serde::Serialize;
use sqlx::FromRow;
use zeroize::Zeroizing;

use crate::core::bip44::DerivedAccount;

/// Persisted wallet row.
#[derive(Clone, PartialEq, Eq, FromRow)]
pub struct Wallet {
    pub id: i64,
    pub name: String,
    /// Recovery phrase, stored verbatim.
    pub mnemonic: String,
    /// Milliseconds since the Unix epoch; non-decreasing across inserts.
    pub created_at: i64,
}

impl fmt::Debug for Wallet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Wallet")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("mnemonic", &"[REDACTED]")
            .field("created_at", &self.created_at)
            .finish()
    }
}

/// Persisted chain row.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct Chain {
    pub id: i64,
    pub key: String,
    pub name: String,
    pub symbol: String,
    pub derivation_path: String,
}

/// Account row to insert for an existing wallet.
#[derive(Clone, PartialEq, Eq)]
pub struct NewAccount {
    pub chain_id: i64,
    pub address: String,
    pub private_key: Zeroizing<String>,
}

impl NewAccount {
    pub fn from_derived(chain_id: i64, derived: DerivedAccount) -> Self {
        Self {
            chain_id,
            address: derived.address,
            private_key: derived.private_key,
        }
    }
}

impl fmt::Debug for NewAccount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewAccount")
            .field("chain_id", &self.chain_id)
            .field("address", &self.address)
            .field("private_key", &"[REDACTED]")
            .finish()
    }
}

/// Account joined with its chain's display fields.
#[derive(Clone, PartialEq, Eq, FromRow)]
pub struct AccountView {
    pub id: i64,
    pub wallet_id: i64,
    pub chain_id: i64,
    pub address: String,
    pub private_key: String,
    pub chain_name: String,
    pub chain_symbol: String,
    pub chain_key: String,
}

impl fmt::Debug for AccountView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccountView")
            .field("id", &self.id)
            .field("wallet_id", &self.wallet_id)
            .field("chain_id", &self.chain_id)
            .field("chain_key", &self.chain_key)
            .field("address", &self.address)
            .field("private_key", &"[REDACTED]")
            .finish()
    }
}

/// Caller-owned selection state, passed into the manager instead of living in a global.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WalletContext {
    pub selected_wallet_id: Option<i64>,
}

/// Snapshot handed back to the presentation layer after every workflow.
#[derive(Debug, Clone, Default)]
pub struct WalletView {
    /// Newest first
    pub wallets: Vec<Wallet>,
    pub selected_wallet_id: Option<i64>,
    /// Accounts of the selected wallet, ordered by chain id
    pub accounts: Vec<AccountView>,
}

impl WalletView {
    pub fn selected_wallet(&self) -> Option<&Wallet> {
        let id = self.selected_wallet_id?;
        self.wallets.iter().find(|w| w.id == id)
    }
}
