use tracing::debug;

use super::WalletManager;
use crate::core::errors::WalletError;
use crate::core::wallet_info::{WalletContext, WalletView};

impl WalletManager {
    /// Reload the wallet list and the selected wallet's accounts.
    ///
    /// Selection falls back in order: `target`, the wallet already in `ctx`, the newest
    /// wallet. Ids that no longer exist are skipped.
    pub async fn refresh(
        &self,
        ctx: &mut WalletContext,
        target: Option<i64>,
    ) -> Result<WalletView, WalletError> {
        let wallets = self.storage.list_wallets().await?;
        let exists = |id: &i64| wallets.iter().any(|w| w.id == *id);

        let selected = target
            .filter(exists)
            .or_else(|| ctx.selected_wallet_id.filter(exists))
            .or_else(|| wallets.first().map(|w| w.id));

        let accounts = match selected {
            Some(id) => self.storage.list_accounts_for_wallet(id).await?,
            None => Vec::new(),
        };

        ctx.selected_wallet_id = selected;
        debug!(wallets = wallets.len(), selected = ?selected, "Wallet view refreshed");
        Ok(WalletView { wallets, selected_wallet_id: selected, accounts })
    }

    /// Make `wallet_id` the selected wallet.
    ///
    /// # Errors
    /// `WalletError::NotFoundError` when no such wallet exists; `ctx` is left unchanged.
    pub async fn select_wallet(
        &self,
        ctx: &mut WalletContext,
        wallet_id: i64,
    ) -> Result<WalletView, WalletError> {
        if self.storage.get_wallet(wallet_id).await?.is_none() {
            return Err(WalletError::NotFoundError(format!("wallet {}", wallet_id)));
        }
        self.refresh(ctx, Some(wallet_id)).await
    }
}
