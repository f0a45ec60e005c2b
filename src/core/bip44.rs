//! BIP32/BIP44 HD key derivation for EVM accounts
//!
//! Path format: m/44'/coin_type'/account'/change/address_index
//!
//! The seed comes from [`crate::core::mnemonic::to_seed`]; the master key and
//! child keys follow BIP32 over secp256k1. Addresses are the EIP-55 encoding of
//! the last 20 bytes of Keccak-256 over the uncompressed public key.

use std::fmt;
use std::str::FromStr;

use coins_bip32::xkeys::{Parent, XPriv};
use k256::ecdsa::SigningKey;
use k256::elliptic_curve::sec1::ToEncodedPoint;
use sha3::{Digest, Keccak256};
use zeroize::Zeroizing;

use crate::core::errors::WalletError;
use crate::core::mnemonic;

/// Offset marking a hardened child index.
pub const HARDENED_OFFSET: u32 = 0x8000_0000;

/// Parsed derivation path: the child indices below the master key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DerivationPath {
    indices: Vec<u32>,
}

impl DerivationPath {
    /// Parse `m/44'/60'/0'/0/0`. Hardened segments end in `'` or `h`.
    ///
    /// # Errors
    /// * `WalletError::InvalidPath` - missing `m` root, empty segment, non-decimal index
    /// * `WalletError::KeyDerivationError` - index does not fit below the hardened offset
    pub fn parse(path: &str) -> Result<Self, WalletError> {
        let mut segments = path.trim().split('/');
        match segments.next() {
            Some("m") | Some("M") => {}
            _ => {
                return Err(WalletError::InvalidPath(format!(
                    "'{}' must start with 'm'",
                    path
                )))
            }
        }

        let mut indices = Vec::new();
        for segment in segments {
            let (digits, hardened) = match segment
                .strip_suffix('\'')
                .or_else(|| segment.strip_suffix('h'))
                .or_else(|| segment.strip_suffix('H'))
            {
                Some(digits) => (digits, true),
                None => (segment, false),
            };

            if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
                return Err(WalletError::InvalidPath(format!(
                    "invalid segment '{}' in '{}'",
                    segment, path
                )));
            }

            let index: u32 = digits.parse().map_err(|_| {
                WalletError::InvalidPath(format!("index '{}' out of range in '{}'", digits, path))
            })?;

            if index >= HARDENED_OFFSET {
                return Err(WalletError::KeyDerivationError(format!(
                    "child index {} exceeds 2^31 - 1 in '{}'",
                    index, path
                )));
            }

            indices.push(if hardened { index | HARDENED_OFFSET } else { index });
        }

        Ok(Self { indices })
    }

    /// Raw BIP32 indices, hardened ones carrying [`HARDENED_OFFSET`].
    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    pub fn depth(&self) -> usize {
        self.indices.len()
    }
}

impl FromStr for DerivationPath {
    type Err = WalletError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for DerivationPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "m")?;
        for index in &self.indices {
            if index & HARDENED_OFFSET != 0 {
                write!(f, "/{}'", index & !HARDENED_OFFSET)?;
            } else {
                write!(f, "/{}", index)?;
            }
        }
        Ok(())
    }
}

/// BIP32 extended private key
pub struct Bip32 {
    xpriv: XPriv,
}

impl Bip32 {
    /// Create master key from BIP39 seed
    pub fn from_seed(seed: &[u8]) -> Result<Self, WalletError> {
        if seed.len() < 16 {
            return Err(WalletError::KeyDerivationError(
                "Seed length must be at least 16 bytes".to_string(),
            ));
        }
        let xpriv = XPriv::root_from_seed(seed, None).map_err(|e| {
            WalletError::KeyDerivationError(format!("Master key derivation failed: {}", e))
        })?;
        Ok(Self { xpriv })
    }

    pub fn derive_child(&self, index: u32) -> Result<Self, WalletError> {
        let xpriv = self.xpriv.derive_child(index).map_err(|e| {
            WalletError::KeyDerivationError(format!("Child {} derivation failed: {}", index, e))
        })?;
        Ok(Self { xpriv })
    }

    /// Walk every index of `path`; `m` alone yields the master key itself.
    pub fn derive_path(&self, path: &DerivationPath) -> Result<Self, WalletError> {
        let mut xpriv = self.xpriv.clone();
        for &index in path.indices() {
            xpriv = xpriv.derive_child(index).map_err(|e| {
                WalletError::KeyDerivationError(format!("Child {} derivation failed: {}", index, e))
            })?;
        }
        Ok(Self { xpriv })
    }

    fn signing_key(&self) -> &SigningKey {
        self.xpriv.as_ref()
    }

    /// Raw 32-byte secp256k1 scalar.
    pub fn private_key(&self) -> Zeroizing<[u8; 32]> {
        let mut out = Zeroizing::new([0u8; 32]);
        out.copy_from_slice(&self.signing_key().to_bytes());
        out
    }

    /// EIP-55 checksummed address of this key.
    pub fn ethereum_address(&self) -> String {
        let point = self.signing_key().verifying_key().to_encoded_point(false);
        // drop the 0x04 SEC1 prefix
        let hash = Keccak256::digest(&point.as_bytes()[1..]);
        let mut address = [0u8; 20];
        address.copy_from_slice(&hash[12..]);
        to_checksum_address(&address)
    }
}

/// EIP-55 mixed-case encoding of a 20-byte address.
pub fn to_checksum_address(address: &[u8; 20]) -> String {
    let lower = hex::encode(address);
    let hash = Keccak256::digest(lower.as_bytes());
    let mut out = String::with_capacity(42);
    out.push_str("0x");
    for (i, ch) in lower.chars().enumerate() {
        let nibble = (hash[i / 2] >> (4 * (1 - (i % 2)))) & 0x0f;
        if ch.is_ascii_alphabetic() && nibble >= 8 {
            out.push(ch.to_ascii_uppercase());
        } else {
            out.push(ch);
        }
    }
    out
}

/// One derived (address, private key) pair.
#[derive(Clone, PartialEq, Eq)]
pub struct DerivedAccount {
    /// EIP-55 checksummed `0x…` address
    pub address: String,
    /// `0x` followed by 64 lowercase hex digits
    pub private_key: Zeroizing<String>,
}

impl fmt::Debug for DerivedAccount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DerivedAccount")
            .field("address", &self.address)
            .field("private_key", &"[REDACTED]")
            .finish()
    }
}

/// Derive the account at `derivation_path` from a recovery phrase.
///
/// Same `(phrase, derivation_path)` always yields the same pair.
///
/// # Errors
/// * `WalletError::InvalidMnemonic` - phrase does not parse
/// * `WalletError::InvalidPath` - malformed path
/// * `WalletError::KeyDerivationError` - index out of range or child derivation failure
pub fn derive_account(phrase: &str, derivation_path: &str) -> Result<DerivedAccount, WalletError> {
    let path = DerivationPath::parse(derivation_path)?;
    let seed = mnemonic::to_seed(phrase)?;
    derive_account_from_seed(seed.as_slice(), &path)
}

/// Same as [`derive_account`] for callers that already hold the seed.
pub fn derive_account_from_seed(
    seed: &[u8],
    path: &DerivationPath,
) -> Result<DerivedAccount, WalletError> {
    let child = Bip32::from_seed(seed)?.derive_path(path)?;
    let key = child.private_key();
    Ok(DerivedAccount {
        address: child.ethereum_address(),
        private_key: Zeroizing::new(format!("0x{}", hex::encode(key.as_slice()))),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_MNEMONIC: &str = "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";
    const ETH_PATH: &str = "m/44'/60'/0'/0/0";

    #[test]
    fn test_bip44_path() {
        let path = DerivationPath::parse(ETH_PATH).unwrap();
        let indices = path.indices();

        assert_eq!(indices.len(), 5);
        assert_eq!(indices[0], 0x8000002C); // 44'
        assert_eq!(indices[1], 0x8000003C); // 60'
        assert_eq!(indices[2], 0x80000000); // 0'
        assert_eq!(indices[3], 0); // 0
        assert_eq!(indices[4], 0); // 0
    }

    #[test]
    fn test_path_display_round_trip() {
        let path: DerivationPath = "m/44h/60H/0'/0/7".parse().unwrap();
        assert_eq!(path.to_string(), "m/44'/60'/0'/0/7");
        assert_eq!(DerivationPath::parse("m").unwrap().depth(), 0);
    }

    #[test]
    fn test_malformed_paths() {
        for bad in ["", "44'/60'", "m/", "m//0", "m/abc", "m/1''", "m/-1", "m/0x10", "x/0", "m/99999999999"] {
            let result = DerivationPath::parse(bad);
            assert!(
                matches!(result, Err(WalletError::InvalidPath(_))),
                "expected InvalidPath for {:?}, got {:?}",
                bad,
                result
            );
        }
    }

    #[test]
    fn test_index_beyond_hardened_range() {
        let result = DerivationPath::parse("m/44'/2147483648'");
        assert!(matches!(result, Err(WalletError::KeyDerivationError(_))));
        let result = DerivationPath::parse("m/2147483648");
        assert!(matches!(result, Err(WalletError::KeyDerivationError(_))));
    }

    #[test]
    fn test_bip32_master_key() {
        let seed = [1u8; 64];
        let master = Bip32::from_seed(&seed).unwrap();
        assert_eq!(master.private_key().len(), 32);
    }

    #[test]
    fn test_bip32_rejects_short_seed() {
        assert!(matches!(
            Bip32::from_seed(&[0u8; 8]),
            Err(WalletError::KeyDerivationError(_))
        ));
    }

    #[test]
    fn test_bip32_child_derivation() {
        let seed = [1u8; 64];
        let master = Bip32::from_seed(&seed).unwrap();

        let hardened = master.derive_child(HARDENED_OFFSET).unwrap();
        let normal = master.derive_child(0).unwrap();
        assert_ne!(*hardened.private_key(), *master.private_key());
        assert_ne!(*hardened.private_key(), *normal.private_key());
    }

    #[test]
    fn test_known_vector_address_and_key() {
        let account = derive_account(TEST_MNEMONIC, ETH_PATH).unwrap();
        assert_eq!(account.address, "0x9858EfFD232B4033E47d90003D41EC34EcaEda94");
        assert_eq!(
            account.private_key.as_str(),
            "0x1ab42cc412b618bdea3a599e3c9bae199ebf030895b039e9db1e30dafb12b727"
        );
    }

    #[test]
    fn test_derivation_is_deterministic() {
        let a = derive_account(TEST_MNEMONIC, ETH_PATH).unwrap();
        let b = derive_account(TEST_MNEMONIC, ETH_PATH).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_different_index_different_address() {
        let a = derive_account(TEST_MNEMONIC, "m/44'/60'/0'/0/0").unwrap();
        let b = derive_account(TEST_MNEMONIC, "m/44'/60'/0'/0/1").unwrap();
        assert_ne!(a.address, b.address);
        assert_ne!(a.private_key, b.private_key);
    }

    #[test]
    fn test_invalid_mnemonic() {
        let result = derive_account("invalid mnemonic words here", ETH_PATH);
        assert!(matches!(result, Err(WalletError::InvalidMnemonic(_))));
    }

    #[test]
    fn test_invalid_path_checked_before_seed() {
        let result = derive_account(TEST_MNEMONIC, "m/44'/sixty'");
        assert!(matches!(result, Err(WalletError::InvalidPath(_))));
    }

    #[test]
    fn test_checksum_address_known_vector() {
        // EIP-55 reference vector
        let raw = hex::decode("5aaeb6053f3e94c9b9a09f33669435e7ef1beaed").unwrap();
        let mut bytes = [0u8; 20];
        bytes.copy_from_slice(&raw);
        assert_eq!(
            to_checksum_address(&bytes),
            "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed"
        );
    }

    #[test]
    fn test_debug_redacts_private_key() {
        let account = derive_account(TEST_MNEMONIC, ETH_PATH).unwrap();
        let dbg = format!("{:?}", account);
        assert!(dbg.contains("REDACTED"));
        assert!(!dbg.contains("1ab42cc4"));
    }
}
