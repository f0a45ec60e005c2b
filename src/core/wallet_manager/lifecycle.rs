//! Wallet lifecycle management
//!
//! Create, import and delete. Each workflow derives everything it needs first,
//! then persists in a single store transaction.

use tracing::{debug, info};

use super::{effective_name, WalletManager, DEFAULT_IMPORTED_WALLET_NAME, DEFAULT_WALLET_NAME};
use crate::core::errors::WalletError;
use crate::core::validation::validate_wallet_name;
use crate::core::wallet_info::{WalletContext, WalletView};
use crate::security::redaction::redact_mnemonic;

impl WalletManager {
    /// Create a wallet from `mnemonic`, or from a freshly generated phrase when `None`.
    ///
    /// # Returns
    /// The new wallet id. The wallet and one account per configured chain become
    /// visible together.
    ///
    /// # Errors
    /// * `WalletError::InvalidMnemonic` - supplied phrase does not validate
    /// * `WalletError::EntropyError` - no secure randomness for a new phrase
    /// * `WalletError::IntegrityError` - a configured chain is missing from the registry
    /// * `WalletError::StorageError` - the store write failed; nothing was persisted
    pub async fn create_wallet(&self, name: &str, mnemonic: Option<&str>) -> Result<i64, WalletError> {
        let name = effective_name(name, DEFAULT_WALLET_NAME);
        validate_wallet_name(name)?;

        let phrase = match mnemonic {
            Some(phrase) => self.normalize_and_validate(phrase)?,
            None => self.generate_mnemonic()?,
        };

        let _guard = self.write_gate.lock().await;
        let accounts = self.derive_accounts(&phrase).await?;
        let wallet_id = self.storage.create_wallet_with_accounts(name, &phrase, &accounts).await?;

        info!(wallet_id, name, accounts = accounts.len(), "Wallet created");
        Ok(wallet_id)
    }

    /// Import an existing recovery phrase.
    ///
    /// The phrase is normalized (trimmed, lowercased, single-spaced) and validated before
    /// anything is derived or written; the normalized phrase is what gets stored.
    pub async fn import_wallet(&self, name: &str, mnemonic: &str) -> Result<i64, WalletError> {
        debug!(phrase = %redact_mnemonic(mnemonic), "Importing wallet");
        let phrase = self.normalize_and_validate(mnemonic)?;
        let name = effective_name(name, DEFAULT_IMPORTED_WALLET_NAME);
        validate_wallet_name(name)?;

        let _guard = self.write_gate.lock().await;
        let accounts = self.derive_accounts(&phrase).await?;
        let wallet_id = self.storage.create_wallet_with_accounts(name, &phrase, &accounts).await?;

        info!(wallet_id, name, accounts = accounts.len(), "Wallet imported");
        Ok(wallet_id)
    }

    /// Delete a wallet with its accounts, then select the newest remaining wallet.
    ///
    /// Deleting an unknown id is a no-op apart from the refresh.
    pub async fn delete_wallet(
        &self,
        ctx: &mut WalletContext,
        wallet_id: i64,
    ) -> Result<WalletView, WalletError> {
        {
            let _guard = self.write_gate.lock().await;
            let existed = self.storage.delete_wallet(wallet_id).await?;
            info!(wallet_id, existed, "Wallet delete finished");
        }
        ctx.selected_wallet_id = None;
        self.refresh(ctx, None).await
    }
}
