use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use sqlx::sqlite::{
    SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions, SqliteSynchronous,
};
use sqlx::{Sqlite, SqliteConnection, Transaction};
use tracing::{debug, info, warn};

use crate::core::config::StorageConfig;
use crate::core::errors::WalletError;
use crate::core::wallet_info::{AccountView, Chain, NewAccount, Wallet};

mod chains;

#[derive(Debug, Clone)]
pub struct WalletStorage {
    pool: SqlitePool,
    is_memory: bool,
}

impl WalletStorage {
    /// Open (creating if needed) the database described by `config`, then initialize it.
    pub async fn open(config: &StorageConfig) -> Result<Self, WalletError> {
        Self::connect(
            &config.database_url,
            config.max_connections.unwrap_or(10),
            Duration::from_secs(config.connection_timeout_seconds.unwrap_or(30)),
        )
        .await
    }

    pub async fn new_with_url(database_url: &str) -> Result<Self, WalletError> {
        Self::open(&StorageConfig {
            database_url: database_url.to_string(),
            ..StorageConfig::default()
        })
        .await
    }

    async fn connect(
        database_url: &str,
        max_connections: u32,
        acquire_timeout: Duration,
    ) -> Result<Self, WalletError> {
        let is_memory = database_url.contains(":memory:") || database_url.contains("mode=memory");

        // Avoid logging the full URL; keep scheme and length for diagnostics.
        let safe_db_url_info = match database_url.split_once(':') {
            Some((scheme, rest)) => format!("{}:(redacted, len={})", scheme, rest.len()),
            None => "(invalid db_url format)".to_string(),
        };
        info!(db = %safe_db_url_info, is_memory, "[storage] connecting to database");

        let connect_options = SqliteConnectOptions::from_str(database_url)
            .map_err(|e| WalletError::StorageError(format!("Invalid database URL: {}", e)))?
            .create_if_missing(true)
            .foreign_keys(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(Duration::from_secs(5));

        if !is_memory {
            ensure_parent_dir(connect_options.get_filename());
        }

        // An in-memory database lives as long as its last connection, so pin exactly one.
        let pool_options = if is_memory {
            SqlitePoolOptions::new()
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new()
                .max_connections(max_connections.max(1))
                .idle_timeout(Duration::from_secs(600))
                .max_lifetime(Duration::from_secs(1800))
        };

        let pool = pool_options
            .acquire_timeout(acquire_timeout)
            .connect_with(connect_options)
            .await
            .map_err(|e| WalletError::StorageError(format!("Failed to connect to database: {}", e)))?;

        let storage = Self { pool, is_memory };
        storage.initialize().await?;

        info!("Wallet storage initialized");
        Ok(storage)
    }

    pub fn is_in_memory(&self) -> bool {
        self.is_memory
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Write transaction that takes the write lock up front.
    ///
    /// A deferred `BEGIN` that reads first cannot upgrade once another writer holds
    /// the lock, and SQLite reports busy without honoring `busy_timeout`.
    async fn begin_write(&self) -> Result<Transaction<'static, Sqlite>, WalletError> {
        Ok(self.pool.begin_with("BEGIN IMMEDIATE").await?)
    }

    /// Create the schema if absent and seed the chain catalog. Safe to call repeatedly.
    pub async fn initialize(&self) -> Result<(), WalletError> {
        debug!("Initializing database schema");
        let mut tx = self.begin_write().await?;

        // TODO: envelope-encrypt wallets.mnemonic and accounts.private_key with a device-held key.
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS wallets (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT,
                mnemonic TEXT NOT NULL,
                created_at INTEGER NOT NULL
            )
            "#,
        )
        .execute(&mut *tx)
        .await?;

        chains::init_schema(&mut tx).await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS accounts (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                wallet_id INTEGER NOT NULL,
                chain_id INTEGER NOT NULL,
                address TEXT NOT NULL,
                private_key TEXT NOT NULL,
                UNIQUE (wallet_id, chain_id),
                FOREIGN KEY (wallet_id) REFERENCES wallets (id) ON DELETE CASCADE,
                FOREIGN KEY (chain_id) REFERENCES chains (id) ON DELETE CASCADE
            )
            "#,
        )
        .execute(&mut *tx)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_accounts_wallet_id ON accounts (wallet_id)")
            .execute(&mut *tx)
            .await?;

        let seeded = chains::seed_defaults(&mut tx).await?;
        tx.commit().await?;

        debug!(seeded, "Chain catalog seeded");
        Ok(())
    }

    pub async fn create_wallet(&self, name: &str, mnemonic: &str) -> Result<i64, WalletError> {
        let mut tx = self.begin_write().await?;
        let wallet_id = insert_wallet_in(&mut tx, name, mnemonic).await?;
        tx.commit().await?;
        info!(wallet_id, "Wallet row created");
        Ok(wallet_id)
    }

    /// Insert `accounts` for an existing wallet as one all-or-nothing batch.
    ///
    /// # Errors
    /// `WalletError::IntegrityError` when the wallet or any chain id is unknown, or a
    /// (wallet, chain) pair already has an account. Nothing is written in that case.
    pub async fn insert_accounts(
        &self,
        wallet_id: i64,
        accounts: &[NewAccount],
    ) -> Result<(), WalletError> {
        let mut tx = self.begin_write().await?;
        insert_accounts_in(&mut tx, wallet_id, accounts).await?;
        tx.commit().await?;
        info!(wallet_id, count = accounts.len(), "Accounts inserted");
        Ok(())
    }

    /// Wallet row and its accounts in a single transaction.
    pub async fn create_wallet_with_accounts(
        &self,
        name: &str,
        mnemonic: &str,
        accounts: &[NewAccount],
    ) -> Result<i64, WalletError> {
        let mut tx = self.begin_write().await?;
        let wallet_id = insert_wallet_in(&mut tx, name, mnemonic).await?;
        insert_accounts_in(&mut tx, wallet_id, accounts).await?;
        tx.commit().await?;
        info!(wallet_id, accounts = accounts.len(), "Wallet persisted");
        Ok(wallet_id)
    }

    pub async fn get_wallet(&self, wallet_id: i64) -> Result<Option<Wallet>, WalletError> {
        let wallet = sqlx::query_as::<_, Wallet>(
            "SELECT id, COALESCE(name, '') AS name, mnemonic, created_at FROM wallets WHERE id = ?1",
        )
        .bind(wallet_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(wallet)
    }

    /// Newest first; ties on `created_at` fall back to the higher id.
    pub async fn list_wallets(&self) -> Result<Vec<Wallet>, WalletError> {
        let wallets = sqlx::query_as::<_, Wallet>(
            r#"
            SELECT id, COALESCE(name, '') AS name, mnemonic, created_at
            FROM wallets
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(wallets)
    }

    pub async fn list_chains(&self) -> Result<Vec<Chain>, WalletError> {
        chains::list(&self.pool).await
    }

    pub async fn count_chains(&self) -> Result<i64, WalletError> {
        chains::count(&self.pool).await
    }

    pub async fn list_accounts_for_wallet(
        &self,
        wallet_id: i64,
    ) -> Result<Vec<AccountView>, WalletError> {
        let accounts = sqlx::query_as::<_, AccountView>(
            r#"
            SELECT a.id, a.wallet_id, a.chain_id, a.address, a.private_key,
                   c.name AS chain_name, c.symbol AS chain_symbol, c.key AS chain_key
            FROM accounts a
            JOIN chains c ON c.id = a.chain_id
            WHERE a.wallet_id = ?1
            ORDER BY a.chain_id ASC
            "#,
        )
        .bind(wallet_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(accounts)
    }

    /// Remove a wallet and its accounts. Returns `false` when no such wallet existed.
    pub async fn delete_wallet(&self, wallet_id: i64) -> Result<bool, WalletError> {
        let mut tx = self.begin_write().await?;
        let accounts = sqlx::query("DELETE FROM accounts WHERE wallet_id = ?1")
            .bind(wallet_id)
            .execute(&mut *tx)
            .await?
            .rows_affected();
        let wallets = sqlx::query("DELETE FROM wallets WHERE id = ?1")
            .bind(wallet_id)
            .execute(&mut *tx)
            .await?
            .rows_affected();
        tx.commit().await?;

        if wallets == 0 {
            debug!(wallet_id, "Delete of unknown wallet ignored");
        } else {
            info!(wallet_id, accounts, "Wallet deleted");
        }
        Ok(wallets > 0)
    }
}

fn ensure_parent_dir(path: &Path) {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            if let Err(e) = std::fs::create_dir_all(parent) {
                warn!("Failed to create database dir {:?}: {}", parent, e);
            }
        }
    }
}

async fn insert_wallet_in(
    conn: &mut SqliteConnection,
    name: &str,
    mnemonic: &str,
) -> Result<i64, WalletError> {
    // created_at never goes backwards, even if the wall clock does
    let (latest,): (i64,) = sqlx::query_as("SELECT COALESCE(MAX(created_at), 0) FROM wallets")
        .fetch_one(&mut *conn)
        .await?;
    let created_at = Utc::now().timestamp_millis().max(latest);

    let result = sqlx::query("INSERT INTO wallets (name, mnemonic, created_at) VALUES (?1, ?2, ?3)")
        .bind(name)
        .bind(mnemonic)
        .bind(created_at)
        .execute(&mut *conn)
        .await?;
    Ok(result.last_insert_rowid())
}

async fn insert_accounts_in(
    conn: &mut SqliteConnection,
    wallet_id: i64,
    accounts: &[NewAccount],
) -> Result<(), WalletError> {
    let wallet: Option<(i64,)> = sqlx::query_as("SELECT id FROM wallets WHERE id = ?1")
        .bind(wallet_id)
        .fetch_optional(&mut *conn)
        .await?;
    if wallet.is_none() {
        return Err(WalletError::IntegrityError(format!("wallet {} does not exist", wallet_id)));
    }

    for account in accounts {
        if !chains::exists(&mut *conn, account.chain_id).await? {
            return Err(WalletError::IntegrityError(format!(
                "chain {} does not exist",
                account.chain_id
            )));
        }
        sqlx::query(
            "INSERT INTO accounts (wallet_id, chain_id, address, private_key) VALUES (?1, ?2, ?3, ?4)",
        )
        .bind(wallet_id)
        .bind(account.chain_id)
        .bind(&account.address)
        .bind(account.private_key.as_str())
        .execute(&mut *conn)
        .await?;
    }
    Ok(())
}

/// Store operations the wallet manager depends on.
#[async_trait]
pub trait WalletStorageTrait: Send + Sync {
    async fn create_wallet(&self, name: &str, mnemonic: &str) -> Result<i64, WalletError>;
    async fn insert_accounts(&self, wallet_id: i64, accounts: &[NewAccount]) -> Result<(), WalletError>;
    async fn create_wallet_with_accounts(
        &self,
        name: &str,
        mnemonic: &str,
        accounts: &[NewAccount],
    ) -> Result<i64, WalletError>;
    async fn get_wallet(&self, wallet_id: i64) -> Result<Option<Wallet>, WalletError>;
    async fn list_wallets(&self) -> Result<Vec<Wallet>, WalletError>;
    async fn list_chains(&self) -> Result<Vec<Chain>, WalletError>;
    async fn list_accounts_for_wallet(&self, wallet_id: i64) -> Result<Vec<AccountView>, WalletError>;
    async fn delete_wallet(&self, wallet_id: i64) -> Result<bool, WalletError>;
}

// Implement the trait for WalletStorage by delegating to the inherent methods
#[async_trait]
impl WalletStorageTrait for WalletStorage {
    async fn create_wallet(&self, name: &str, mnemonic: &str) -> Result<i64, WalletError> {
        self.create_wallet(name, mnemonic).await
    }

    async fn insert_accounts(&self, wallet_id: i64, accounts: &[NewAccount]) -> Result<(), WalletError> {
        self.insert_accounts(wallet_id, accounts).await
    }

    async fn create_wallet_with_accounts(
        &self,
        name: &str,
        mnemonic: &str,
        accounts: &[NewAccount],
    ) -> Result<i64, WalletError> {
        self.create_wallet_with_accounts(name, mnemonic, accounts).await
    }

    async fn get_wallet(&self, wallet_id: i64) -> Result<Option<Wallet>, WalletError> {
        self.get_wallet(wallet_id).await
    }

    async fn list_wallets(&self) -> Result<Vec<Wallet>, WalletError> {
        self.list_wallets().await
    }

    async fn list_chains(&self) -> Result<Vec<Chain>, WalletError> {
        self.list_chains().await
    }

    async fn list_accounts_for_wallet(&self, wallet_id: i64) -> Result<Vec<AccountView>, WalletError> {
        self.list_accounts_for_wallet(wallet_id).await
    }

    async fn delete_wallet(&self, wallet_id: i64) -> Result<bool, WalletError> {
        self.delete_wallet(wallet_id).await
    }
}
