use sqlx::{SqliteConnection, SqliteExecutor};

use crate::core::chains::DEFAULT_CHAINS;
use crate::core::errors::WalletError;
use crate::core::wallet_info::Chain;

pub(crate) async fn init_schema(conn: &mut SqliteConnection) -> Result<(), WalletError> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS chains (
            id INTEGER PRIMARY KEY,
            key TEXT UNIQUE NOT NULL,
            name TEXT NOT NULL,
            symbol TEXT NOT NULL,
            derivation_path TEXT NOT NULL
        )
        "#,
    )
    .execute(conn)
    .await?;
    Ok(())
}

/// Insert every catalog row that is not present yet. Existing rows are left untouched.
pub(crate) async fn seed_defaults(conn: &mut SqliteConnection) -> Result<u64, WalletError> {
    let mut inserted = 0;
    for chain in DEFAULT_CHAINS.iter() {
        let result = sqlx::query(
            r#"
            INSERT OR IGNORE INTO chains (id, key, name, symbol, derivation_path)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
        )
        .bind(chain.id)
        .bind(chain.key)
        .bind(chain.name)
        .bind(chain.symbol)
        .bind(chain.derivation_path)
        .execute(&mut *conn)
        .await?;
        inserted += result.rows_affected();
    }
    Ok(inserted)
}

pub(crate) async fn list<'e, E>(executor: E) -> Result<Vec<Chain>, WalletError>
where
    E: SqliteExecutor<'e>,
{
    let chains = sqlx::query_as::<_, Chain>(
        "SELECT id, key, name, symbol, derivation_path FROM chains ORDER BY id ASC",
    )
    .fetch_all(executor)
    .await?;
    Ok(chains)
}

pub(crate) async fn count<'e, E>(executor: E) -> Result<i64, WalletError>
where
    E: SqliteExecutor<'e>,
{
    let (n,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM chains").fetch_one(executor).await?;
    Ok(n)
}

pub(crate) async fn exists<'e, E>(executor: E, chain_id: i64) -> Result<bool, WalletError>
where
    E: SqliteExecutor<'e>,
{
    let row: Option<(i64,)> = sqlx::query_as("SELECT id FROM chains WHERE id = ?1")
        .bind(chain_id)
        .fetch_optional(executor)
        .await?;
    Ok(row.is_some())
}
