use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// EVM HD wallet CLI (library-facing definitions)
#[derive(Debug, Parser)]
#[command(name = "wallet-cli", about = "EVM HD wallet CLI", version, disable_help_subcommand = true)]
pub struct Cli {
    /// SQLite database URL; wins over the config file and DATABASE_URL
    #[arg(long, global = true)]
    pub database_url: Option<String>,

    /// TOML configuration file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Create the database and seed the chain catalog
    Init,
    /// Print a fresh recovery phrase without storing it
    GenerateMnemonic {
        /// 12 or 24
        #[arg(long, default_value_t = 12)]
        words: usize,
    },
    /// Create a wallet from a new or supplied recovery phrase
    Create {
        #[arg(long, default_value = "")]
        name: String,
        #[arg(long)]
        mnemonic: Option<String>,
    },
    /// Import an existing recovery phrase
    Import {
        #[arg(long, default_value = "")]
        name: String,
        #[arg(long)]
        mnemonic: String,
    },
    /// List wallets, newest first
    List,
    /// List supported chains
    Chains,
    /// Show the accounts of a wallet (the newest wallet when omitted)
    Accounts {
        #[arg(long)]
        wallet_id: Option<i64>,
        #[arg(long)]
        show_private_keys: bool,
    },
    /// Delete a wallet and its accounts
    Delete {
        #[arg(long)]
        wallet_id: i64,
        /// Confirm the deletion
        #[arg(long)]
        yes: bool,
    },
}
