use anyhow::{bail, Context, Result};
use clap::Parser;
use evm_hd_wallet::cli::{Cli, Commands};
use evm_hd_wallet::core::config::WalletConfig;
use evm_hd_wallet::core::mnemonic::{self, MnemonicStrength};
use evm_hd_wallet::core::wallet_info::{AccountView, Wallet, WalletContext};
use evm_hd_wallet::core::WalletManager;
use serde_json::{json, Value};
use std::path::Path;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[tokio::main]
async fn main() -> Result<()> {
    init_logging()?;
    let Cli { database_url, config, command } = Cli::parse();

    let output = match StoreCommand::try_from(command) {
        Ok(command) => {
            let config = load_config(config.as_deref(), database_url.as_deref())?;
            let manager =
                WalletManager::new(&config).await.context("failed to open wallet store")?;
            run(&manager, command).await?
        }
        // no store needed just to print a phrase
        Err(words) => generate_json(words)?,
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

/// Commands that need an open wallet store.
enum StoreCommand {
    Init,
    Create { name: String, mnemonic: Option<String> },
    Import { name: String, mnemonic: String },
    List,
    Chains,
    Accounts { wallet_id: Option<i64>, show_private_keys: bool },
    Delete { wallet_id: i64, yes: bool },
}

impl TryFrom<Commands> for StoreCommand {
    /// Word count of a `generate-mnemonic` request.
    type Error = usize;

    fn try_from(command: Commands) -> Result<Self, Self::Error> {
        Ok(match command {
            Commands::GenerateMnemonic { words } => return Err(words),
            Commands::Init => Self::Init,
            Commands::Create { name, mnemonic } => Self::Create { name, mnemonic },
            Commands::Import { name, mnemonic } => Self::Import { name, mnemonic },
            Commands::List => Self::List,
            Commands::Chains => Self::Chains,
            Commands::Accounts { wallet_id, show_private_keys } => {
                Self::Accounts { wallet_id, show_private_keys }
            }
            Commands::Delete { wallet_id, yes } => Self::Delete { wallet_id, yes },
        })
    }
}

async fn run(manager: &WalletManager, command: StoreCommand) -> Result<Value> {
    let mut ctx = WalletContext::default();

    let output = match command {
        StoreCommand::Init => {
            let chains = manager.storage().list_chains().await?;
            json!({ "initialized": true, "chains": chains.len() })
        }
        StoreCommand::Create { name, mnemonic } => {
            let generated = mnemonic.is_none();
            let wallet_id = manager.create_wallet(&name, mnemonic.as_deref()).await?;
            let view = manager.refresh(&mut ctx, Some(wallet_id)).await?;
            let wallet = view.selected_wallet().context("created wallet is missing")?;
            let mut out = wallet_json(wallet);
            out["accounts"] = accounts_json(&view.accounts, false);
            if generated {
                // shown once so it can be written down
                out["mnemonic"] = Value::String(wallet.mnemonic.clone());
            }
            out
        }
        StoreCommand::Import { name, mnemonic } => {
            let wallet_id = manager.import_wallet(&name, &mnemonic).await?;
            let view = manager.refresh(&mut ctx, Some(wallet_id)).await?;
            let wallet = view.selected_wallet().context("imported wallet is missing")?;
            let mut out = wallet_json(wallet);
            out["accounts"] = accounts_json(&view.accounts, false);
            out
        }
        StoreCommand::List => {
            let wallets = manager.storage().list_wallets().await?;
            Value::Array(wallets.iter().map(wallet_json).collect())
        }
        StoreCommand::Chains => serde_json::to_value(manager.storage().list_chains().await?)?,
        StoreCommand::Accounts { wallet_id, show_private_keys } => {
            let view = match wallet_id {
                Some(id) => manager.select_wallet(&mut ctx, id).await?,
                None => manager.refresh(&mut ctx, None).await?,
            };
            json!({
                "wallet_id": view.selected_wallet_id,
                "accounts": accounts_json(&view.accounts, show_private_keys),
            })
        }
        StoreCommand::Delete { wallet_id, yes } => {
            if !yes {
                bail!("refusing to delete wallet {} without --yes", wallet_id);
            }
            let view = manager.delete_wallet(&mut ctx, wallet_id).await?;
            json!({
                "deleted": wallet_id,
                "selected_wallet_id": view.selected_wallet_id,
                "remaining": view.wallets.len(),
            })
        }
    };
    Ok(output)
}

fn generate_json(words: usize) -> Result<Value> {
    let strength = MnemonicStrength::from_word_count(words)?;
    let phrase = mnemonic::generate(strength)?;
    Ok(json!({ "words": strength.word_count(), "mnemonic": phrase.as_str() }))
}

fn load_config(path: Option<&Path>, database_url: Option<&str>) -> Result<WalletConfig> {
    let mut config = match path {
        Some(path) => WalletConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => {
            let mut config = WalletConfig::default();
            config.apply_env_overrides();
            config
        }
    };
    if let Some(url) = database_url {
        config.storage.database_url = url.to_string();
    }
    config.validate().context("invalid configuration")?;
    Ok(config)
}

fn wallet_json(wallet: &Wallet) -> Value {
    json!({
        "id": wallet.id,
        "name": wallet.name,
        "created_at": wallet.created_at,
    })
}

fn accounts_json(accounts: &[AccountView], show_private_keys: bool) -> Value {
    accounts
        .iter()
        .map(|a| {
            json!({
                "chain_id": a.chain_id,
                "chain": a.chain_key,
                "name": a.chain_name,
                "symbol": a.chain_symbol,
                "address": a.address,
                "private_key": if show_private_keys { a.private_key.as_str() } else { "[REDACTED]" },
            })
        })
        .collect()
}

// Logs go to stderr so stdout stays machine readable.
fn init_logging() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}
