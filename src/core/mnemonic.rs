//! BIP39 recovery phrases
//!
//! Generation from OS entropy, normalization, validation and the PBKDF2 seed
//! transform that feeds BIP32 derivation. Only English 12- and 24-word phrases
//! are accepted by [`validate`].

use bip39::{Language, Mnemonic};
use rand::rngs::OsRng;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use tracing::debug;
use zeroize::Zeroizing;

use crate::core::errors::WalletError;
use crate::security::secret::{string_to_secret, vec_to_secret, SecretString};

/// Entropy size of a generated phrase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MnemonicStrength {
    /// 128 bits, 12 words
    #[default]
    Words12,
    /// 256 bits, 24 words
    Words24,
}

impl MnemonicStrength {
    pub const fn bits(self) -> u32 {
        match self {
            MnemonicStrength::Words12 => 128,
            MnemonicStrength::Words24 => 256,
        }
    }

    pub const fn entropy_bytes(self) -> usize {
        (self.bits() / 8) as usize
    }

    pub const fn word_count(self) -> usize {
        match self {
            MnemonicStrength::Words12 => 12,
            MnemonicStrength::Words24 => 24,
        }
    }

    pub fn from_bits(bits: u32) -> Result<Self, WalletError> {
        match bits {
            128 => Ok(MnemonicStrength::Words12),
            256 => Ok(MnemonicStrength::Words24),
            other => Err(WalletError::ValidationError(format!(
                "Unsupported mnemonic strength: {} bits (expected 128 or 256)",
                other
            ))),
        }
    }

    pub fn from_word_count(words: usize) -> Result<Self, WalletError> {
        match words {
            12 => Ok(MnemonicStrength::Words12),
            24 => Ok(MnemonicStrength::Words24),
            other => Err(WalletError::ValidationError(format!(
                "Unsupported word count: {} (expected 12 or 24)",
                other
            ))),
        }
    }
}

/// Generate a fresh recovery phrase from the OS CSPRNG.
///
/// # Errors
/// `WalletError::EntropyError` if the platform cannot supply secure randomness.
/// There is no fallback to a weaker generator.
pub fn generate(strength: MnemonicStrength) -> Result<SecretString, WalletError> {
    let mut entropy = vec_to_secret(vec![0u8; strength.entropy_bytes()]);
    OsRng
        .try_fill_bytes(&mut entropy)
        .map_err(|e| WalletError::EntropyError(format!("OS random source unavailable: {}", e)))?;

    let mnemonic = Mnemonic::from_entropy_in(Language::English, &entropy)
        .map_err(|e| WalletError::EntropyError(e.to_string()))?;

    debug!(words = strength.word_count(), "Generated recovery phrase");
    Ok(string_to_secret(mnemonic.to_string()))
}

/// Trim, lowercase and collapse internal whitespace to single spaces.
pub fn normalize(phrase: &str) -> String {
    phrase
        .split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Predicate: exactly 12 or 24 English words with a valid checksum.
///
/// Never fails; malformed input simply yields `false`.
pub fn validate(phrase: &str) -> bool {
    let normalized = Zeroizing::new(normalize(phrase));
    let words = normalized.split_whitespace().count();
    if words != 12 && words != 24 {
        return false;
    }
    Mnemonic::parse_in_normalized(Language::English, &normalized).is_ok()
}

/// BIP39 seed (PBKDF2-HMAC-SHA512, 2048 rounds, empty passphrase).
///
/// # Errors
/// `WalletError::InvalidMnemonic` when the phrase does not parse.
pub fn to_seed(phrase: &str) -> Result<Zeroizing<[u8; 64]>, WalletError> {
    let normalized = Zeroizing::new(normalize(phrase));
    let mnemonic = Mnemonic::parse_in_normalized(Language::English, &normalized)
        .map_err(|e| WalletError::InvalidMnemonic(e.to_string()))?;
    Ok(Zeroizing::new(mnemonic.to_seed_normalized("")))
}
