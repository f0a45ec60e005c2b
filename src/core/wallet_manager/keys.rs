//! Recovery phrase helpers bound to the manager's configuration

use super::WalletManager;
use crate::core::errors::WalletError;
use crate::core::mnemonic::{self, MnemonicStrength};
use crate::security::secret::SecretString;

impl WalletManager {
    /// Fresh phrase at the configured strength.
    pub fn generate_mnemonic(&self) -> Result<SecretString, WalletError> {
        self.generate_mnemonic_with(self.config.strength()?)
    }

    pub fn generate_mnemonic_with(&self, strength: MnemonicStrength) -> Result<SecretString, WalletError> {
        mnemonic::generate(strength)
    }

    /// Normalized form of `phrase`, or `InvalidMnemonic` when it does not validate.
    pub fn normalize_and_validate(&self, phrase: &str) -> Result<SecretString, WalletError> {
        let normalized = SecretString::new(mnemonic::normalize(phrase));
        if !mnemonic::validate(&normalized) {
            return Err(WalletError::InvalidMnemonic(
                "recovery phrase must be 12 or 24 English words with a valid checksum".into(),
            ));
        }
        Ok(normalized)
    }
}
