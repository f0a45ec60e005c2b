//! Per-chain account derivation
//!
//! All accounts of a wallet are derived and checked here before the store is
//! touched, so a derivation failure can never leave a half-written wallet.

use std::collections::HashMap;

use tracing::debug;

use super::WalletManager;
use crate::core::bip44::{derive_account_from_seed, DerivationPath, DerivedAccount};
use crate::core::errors::WalletError;
use crate::core::mnemonic;
use crate::core::validation::{validate_checksummed_address, validate_private_key_hex};
use crate::core::wallet_info::{Chain, NewAccount};
use crate::security::redaction::short_address;

/// Derive one account per entry of `chain_ids`, in that order.
///
/// The seed is computed once; chains sharing a derivation path share the result.
///
/// # Errors
/// * `WalletError::IntegrityError` - a chain id is missing from `registry`
/// * `WalletError::InvalidMnemonic` - phrase does not parse
/// * `WalletError::InvalidPath` / `WalletError::KeyDerivationError` - bad registry path
pub fn derive_chain_accounts(
    phrase: &str,
    chain_ids: &[i64],
    registry: &[Chain],
) -> Result<Vec<NewAccount>, WalletError> {
    let targets = chain_ids
        .iter()
        .map(|id| {
            registry.iter().find(|c| c.id == *id).ok_or_else(|| {
                WalletError::IntegrityError(format!("chain {} is not in the registry", id))
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let seed = mnemonic::to_seed(phrase)?;
    let mut by_path: HashMap<&str, DerivedAccount> = HashMap::with_capacity(targets.len());
    let mut accounts = Vec::with_capacity(targets.len());

    for chain in targets {
        let derived = match by_path.get(chain.derivation_path.as_str()) {
            Some(cached) => cached.clone(),
            None => {
                let path = DerivationPath::parse(&chain.derivation_path)?;
                let derived = derive_account_from_seed(seed.as_slice(), &path)?;
                check_derived(&derived)?;
                by_path.insert(chain.derivation_path.as_str(), derived.clone());
                derived
            }
        };
        debug!(
            chain_id = chain.id,
            chain = %chain.key,
            address = %short_address(&derived.address),
            "Derived account"
        );
        accounts.push(NewAccount::from_derived(chain.id, derived));
    }
    Ok(accounts)
}

fn check_derived(derived: &DerivedAccount) -> Result<(), WalletError> {
    validate_checksummed_address(&derived.address)
        .and_then(|_| validate_private_key_hex(&derived.private_key))
        .map_err(|e| WalletError::KeyDerivationError(format!("Derived key failed checks: {}", e)))
}

impl WalletManager {
    /// Accounts for every configured chain-to-show, checked against the seeded registry.
    pub async fn derive_accounts(&self, phrase: &str) -> Result<Vec<NewAccount>, WalletError> {
        let registry = self.storage.list_chains().await?;
        derive_chain_accounts(phrase, &self.config.chains.chains_to_show, &registry)
    }
}
