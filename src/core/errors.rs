use sqlx::error::ErrorKind;
use thiserror::Error;

/// Error type shared by the derivation engine, the store and the wallet manager.
#[derive(Debug, Error)]
pub enum WalletError {
    /// The OS could not supply secure randomness.
    #[error("Entropy error: {0}")]
    EntropyError(String),
    /// Recovery phrase failed word-list or checksum validation.
    #[error("Invalid mnemonic: {0}")]
    InvalidMnemonic(String),
    /// Derivation path string is malformed.
    #[error("Invalid derivation path: {0}")]
    InvalidPath(String),
    /// Child key could not be derived for the requested index.
    #[error("Key derivation error: {0}")]
    KeyDerivationError(String),
    /// Referential violation: missing wallet/chain id or a duplicate (wallet, chain) pair.
    #[error("Integrity error: {0}")]
    IntegrityError(String),
    /// I/O or transaction failure in the backing store.
    #[error("Storage error: {0}")]
    StorageError(String),
    /// Rejected user or configuration input.
    #[error("Validation error: {0}")]
    ValidationError(String),
    /// Configuration could not be read or parsed.
    #[error("Configuration error: {0}")]
    ConfigError(String),
    /// Requested wallet does not exist.
    #[error("Not found: {0}")]
    NotFoundError(String),
}

impl WalletError {
    /// Errors the caller can fix by re-entering input.
    ///
    /// Everything else aborts the workflow and leaves the store untouched.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            WalletError::InvalidMnemonic(_)
                | WalletError::ValidationError(_)
                | WalletError::NotFoundError(_)
        )
    }

    /// Errors that point at a defect in configuration or orchestration rather than user input.
    pub fn is_critical(&self) -> bool {
        matches!(
            self,
            WalletError::EntropyError(_)
                | WalletError::IntegrityError(_)
                | WalletError::InvalidPath(_)
                | WalletError::KeyDerivationError(_)
        )
    }
}

impl From<sqlx::Error> for WalletError {
    fn from(err: sqlx::Error) -> Self {
        if let Some(db_err) = err.as_database_error() {
            match db_err.kind() {
                ErrorKind::ForeignKeyViolation
                | ErrorKind::UniqueViolation
                | ErrorKind::NotNullViolation
                | ErrorKind::CheckViolation => {
                    return WalletError::IntegrityError(db_err.message().to_string());
                }
                _ => {}
            }
        }
        WalletError::StorageError(err.to_string())
    }
}

impl From<std::io::Error> for WalletError {
    fn from(err: std::io::Error) -> Self {
        WalletError::StorageError(err.to_string())
    }
}

impl From<toml::de::Error> for WalletError {
    fn from(err: toml::de::Error) -> Self {
        WalletError::ConfigError(err.to_string())
    }
}
