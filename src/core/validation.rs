use std::sync::OnceLock;

use regex::Regex;
use sha3::{Digest, Keccak256};

use crate::core::errors::WalletError;

fn address_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^0x[0-9a-fA-F]{40}$").expect("Hardcoded regex should always compile"))
}

fn private_key_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^0x[0-9a-f]{64}$").expect("Hardcoded regex should always compile"))
}

/// Validates an Ethereum address.
///
/// All-lowercase and all-uppercase bodies are accepted; mixed case must match EIP-55.
pub fn validate_ethereum_address(address: &str) -> Result<(), WalletError> {
    if !address_regex().is_match(address) {
        return Err(WalletError::ValidationError(format!(
            "Invalid Ethereum address format: {}",
            address
        )));
    }
    let body = &address[2..];
    let is_all_lower = !body.chars().any(|c| c.is_ascii_uppercase());
    let is_all_upper = !body.chars().any(|c| c.is_ascii_lowercase());
    if is_all_lower || is_all_upper {
        return Ok(());
    }
    if !is_eip55_checksum_valid(body) {
        return Err(WalletError::ValidationError(
            "Invalid EIP-55 checksum for Ethereum address".into(),
        ));
    }
    Ok(())
}

/// Same as [`validate_ethereum_address`] but the address must carry its EIP-55 casing.
pub fn validate_checksummed_address(address: &str) -> Result<(), WalletError> {
    if !address_regex().is_match(address) || !is_eip55_checksum_valid(&address[2..]) {
        return Err(WalletError::ValidationError(format!(
            "Address is not EIP-55 checksummed: {}",
            address
        )));
    }
    Ok(())
}

fn is_eip55_checksum_valid(body: &str) -> bool {
    let lower = body.to_lowercase();
    let hash = Keccak256::digest(lower.as_bytes());
    for (i, ch) in body.chars().enumerate() {
        let nibble = (hash[i / 2] >> (4 * (1 - (i % 2)))) & 0x0f;
        match ch {
            'a'..='f' if nibble >= 8 => return false,
            'A'..='F' if nibble < 8 => return false,
            _ => {}
        }
    }
    true
}

/// `0x` followed by exactly 64 lowercase hex digits.
pub fn validate_private_key_hex(key: &str) -> Result<(), WalletError> {
    if !private_key_regex().is_match(key) {
        return Err(WalletError::ValidationError(
            "Private key must be 0x followed by 64 lowercase hex digits".into(),
        ));
    }
    Ok(())
}

/// Wallet display names: at most 64 characters, no control characters.
pub fn validate_wallet_name(name: &str) -> Result<(), WalletError> {
    if name.chars().count() > 64 {
        return Err(WalletError::ValidationError("Wallet name is longer than 64 characters".into()));
    }
    if name.chars().any(char::is_control) {
        return Err(WalletError::ValidationError("Wallet name contains control characters".into()));
    }
    Ok(())
}
