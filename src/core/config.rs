use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::chains::DEFAULT_CHAINS_TO_SHOW;
use crate::core::errors::WalletError;
use crate::core::mnemonic::MnemonicStrength;

/// Storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "StorageConfig::default_database_url")]
    pub database_url: String,
    pub max_connections: Option<u32>,
    pub connection_timeout_seconds: Option<u64>,
}

impl StorageConfig {
    fn default_database_url() -> String {
        "sqlite://wallet.db".to_string()
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_url: Self::default_database_url(),
            max_connections: Some(10),
            connection_timeout_seconds: Some(30),
        }
    }
}

/// Chains an account is derived for on create/import
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChainsConfig {
    #[serde(default = "ChainsConfig::default_chains_to_show")]
    pub chains_to_show: Vec<i64>,
}

impl ChainsConfig {
    fn default_chains_to_show() -> Vec<i64> {
        DEFAULT_CHAINS_TO_SHOW.to_vec()
    }
}

impl Default for ChainsConfig {
    fn default() -> Self {
        Self { chains_to_show: Self::default_chains_to_show() }
    }
}

/// Recovery phrase generation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MnemonicConfig {
    #[serde(default = "MnemonicConfig::default_strength_bits")]
    pub strength_bits: u32,
}

impl MnemonicConfig {
    fn default_strength_bits() -> u32 {
        MnemonicStrength::default().bits()
    }
}

impl Default for MnemonicConfig {
    fn default() -> Self {
        Self { strength_bits: Self::default_strength_bits() }
    }
}

/// Wallet configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WalletConfig {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub chains: ChainsConfig,
    #[serde(default)]
    pub mnemonic: MnemonicConfig,
}

impl WalletConfig {
    /// Parse and validate a TOML document. Missing sections take their defaults.
    pub fn from_toml_str(s: &str) -> Result<Self, WalletError> {
        let config: WalletConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Read a TOML file, apply environment overrides, then validate.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, WalletError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            WalletError::ConfigError(format!("Cannot read {}: {}", path.display(), e))
        })?;
        let mut config: WalletConfig = toml::from_str(&raw)?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// `DATABASE_URL` replaces `storage.database_url` when set and non-empty.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(url) = std::env::var("DATABASE_URL") {
            if !url.trim().is_empty() {
                self.storage.database_url = url;
            }
        }
    }

    pub fn validate(&self) -> Result<(), WalletError> {
        let url = self.storage.database_url.trim();
        if url.is_empty() {
            return Err(WalletError::ConfigError("storage.database_url is empty".into()));
        }
        if !url.starts_with("sqlite:") {
            return Err(WalletError::ConfigError(format!(
                "Only sqlite databases are supported, got '{}'",
                url
            )));
        }
        if self.storage.max_connections == Some(0) {
            return Err(WalletError::ConfigError("storage.max_connections must be > 0".into()));
        }

        let chains = &self.chains.chains_to_show;
        if chains.is_empty() {
            return Err(WalletError::ConfigError("chains.chains_to_show is empty".into()));
        }
        let mut seen = std::collections::HashSet::with_capacity(chains.len());
        if let Some(dup) = chains.iter().find(|id| !seen.insert(**id)) {
            return Err(WalletError::ConfigError(format!(
                "chains.chains_to_show lists chain {} twice",
                dup
            )));
        }

        self.strength().map(|_| ())
    }

    pub fn strength(&self) -> Result<MnemonicStrength, WalletError> {
        MnemonicStrength::from_bits(self.mnemonic.strength_bits)
    }
}
