pub mod bip44;
pub mod chains;
pub mod config;
pub mod errors;
pub mod mnemonic;
pub mod validation;
pub mod wallet_info;
pub mod wallet_manager;

pub use errors::WalletError;
pub use wallet_info::{AccountView, Chain, NewAccount, Wallet, WalletContext, WalletView};
pub use wallet_manager::WalletManager;
