mod util;

use evm_hd_wallet::core::errors::WalletError;
use evm_hd_wallet::core::wallet_info::NewAccount;
use pretty_assertions::assert_eq;
use util::{temp_storage, TEST_ADDRESS, TEST_PRIVATE_KEY};
use zeroize::Zeroizing;

fn account(chain_id: i64) -> NewAccount {
    NewAccount {
        chain_id,
        address: TEST_ADDRESS.to_string(),
        private_key: Zeroizing::new(TEST_PRIVATE_KEY.to_string()),
    }
}

#[tokio::test]
async fn seeding_is_idempotent_and_never_overwrites() {
    let (_dir, storage) = temp_storage().await;
    let first = storage.list_chains().await.unwrap();
    storage.initialize().await.unwrap();
    let second = storage.list_chains().await.unwrap();

    assert_eq!(first, second);
    let rows: Vec<_> = second
        .iter()
        .map(|c| (c.id, c.key.as_str(), c.name.as_str(), c.symbol.as_str(), c.derivation_path.as_str()))
        .collect();
    assert_eq!(
        rows,
        vec![
            (1, "ethereum", "Ethereum", "ETH", "m/44'/60'/0'/0/0"),
            (56, "bsc", "BNB Smart Chain", "BNB", "m/44'/60'/0'/0/0"),
            (137, "polygon", "Polygon", "MATIC", "m/44'/60'/0'/0/0"),
        ]
    );
}

#[tokio::test]
async fn failing_row_in_batch_rolls_back_whole_batch() {
    let (_dir, storage) = temp_storage().await;
    let wallet_id = storage.create_wallet("w", "phrase").await.unwrap();

    let batch = [account(1), account(137), account(999), account(56)];
    let err = storage.insert_accounts(wallet_id, &batch).await.unwrap_err();

    assert!(matches!(err, WalletError::IntegrityError(_)), "{err:?}");
    assert!(storage.list_accounts_for_wallet(wallet_id).await.unwrap().is_empty());
    let wallets = storage.list_wallets().await.unwrap();
    assert_eq!(wallets.len(), 1);
    assert_eq!(wallets[0].id, wallet_id);
}

#[tokio::test]
async fn delete_removes_wallet_and_accounts_only() {
    let (_dir, storage) = temp_storage().await;
    let doomed = storage
        .create_wallet_with_accounts("doomed", "p1", &[account(1), account(137), account(56)])
        .await
        .unwrap();
    let kept = storage
        .create_wallet_with_accounts("kept", "p2", &[account(1), account(56)])
        .await
        .unwrap();

    assert!(storage.delete_wallet(doomed).await.unwrap());

    assert!(storage.get_wallet(doomed).await.unwrap().is_none());
    assert!(storage.list_accounts_for_wallet(doomed).await.unwrap().is_empty());
    assert_eq!(storage.list_accounts_for_wallet(kept).await.unwrap().len(), 2);

    let (orphans,): (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM accounts WHERE wallet_id NOT IN (SELECT id FROM wallets)")
            .fetch_one(storage.pool())
            .await
            .unwrap();
    assert_eq!(orphans, 0);
}

#[tokio::test]
async fn accounts_join_chain_display_fields() {
    let (_dir, storage) = temp_storage().await;
    let id = storage
        .create_wallet_with_accounts("w", "p", &[account(56), account(137), account(1)])
        .await
        .unwrap();

    let accounts = storage.list_accounts_for_wallet(id).await.unwrap();
    let shown: Vec<_> = accounts
        .iter()
        .map(|a| (a.chain_id, a.chain_name.as_str(), a.chain_symbol.as_str()))
        .collect();
    assert_eq!(
        shown,
        vec![(1, "Ethereum", "ETH"), (56, "BNB Smart Chain", "BNB"), (137, "Polygon", "MATIC")]
    );
    assert!(accounts.iter().all(|a| a.private_key == TEST_PRIVATE_KEY));
}

#[tokio::test]
async fn created_at_is_non_decreasing() {
    let (_dir, storage) = temp_storage().await;
    let mut ids = Vec::new();
    for i in 0..5 {
        ids.push(storage.create_wallet(&format!("w{i}"), "p").await.unwrap());
    }
    let wallets = storage.list_wallets().await.unwrap();
    ids.reverse();
    assert_eq!(wallets.iter().map(|w| w.id).collect::<Vec<_>>(), ids);
    assert!(wallets.windows(2).all(|w| w[0].created_at >= w[1].created_at));
}

#[tokio::test]
async fn foreign_keys_are_enforced_by_the_database() {
    let (_dir, storage) = temp_storage().await;
    let err = sqlx::query(
        "INSERT INTO accounts (wallet_id, chain_id, address, private_key) VALUES (77, 1, 'a', 'k')",
    )
    .execute(storage.pool())
    .await
    .map_err(WalletError::from)
    .unwrap_err();
    assert!(matches!(err, WalletError::IntegrityError(_)), "{err:?}");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_writers_on_shared_file_all_commit() {
    let (_dir, storage) = temp_storage().await;

    let mut handles = Vec::new();
    for i in 0..8 {
        let storage = storage.clone();
        handles.push(tokio::spawn(async move {
            let accounts = [account(1), account(137), account(56)];
            storage
                .create_wallet_with_accounts(&format!("w{i}"), util::TEST_MNEMONIC, &accounts)
                .await
        }));
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let wallets = storage.list_wallets().await.unwrap();
    assert_eq!(wallets.len(), 8);
    for wallet in wallets {
        assert_eq!(storage.list_accounts_for_wallet(wallet.id).await.unwrap().len(), 3);
    }
}
