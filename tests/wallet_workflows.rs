mod util;

use std::collections::HashSet;

use evm_hd_wallet::core::config::WalletConfig;
use evm_hd_wallet::core::errors::WalletError;
use evm_hd_wallet::core::mnemonic;
use evm_hd_wallet::core::wallet_info::WalletContext;
use pretty_assertions::assert_eq;
use util::{temp_manager, temp_manager_with, TEST_ADDRESS, TEST_MNEMONIC, TEST_PRIVATE_KEY};

#[tokio::test]
async fn create_my_wallet_derives_one_account_per_chain() {
    let (_dir, manager) = temp_manager().await;
    let wallet_id = manager.create_wallet("My Wallet", None).await.unwrap();

    let mut ctx = WalletContext::default();
    let view = manager.refresh(&mut ctx, Some(wallet_id)).await.unwrap();

    assert_eq!(view.wallets.len(), 1);
    let wallet = view.selected_wallet().unwrap();
    assert_eq!(wallet.name, "My Wallet");
    assert!(mnemonic::validate(&wallet.mnemonic));

    let chain_ids: HashSet<_> = view.accounts.iter().map(|a| a.chain_id).collect();
    assert_eq!(chain_ids, HashSet::from([1, 137, 56]));

    let addresses: HashSet<_> = view.accounts.iter().map(|a| a.address.as_str()).collect();
    assert_eq!(addresses.len(), 1, "shared path yields one address on every chain");
}

#[tokio::test]
async fn import_reproduces_known_vector() {
    let (_dir, manager) = temp_manager().await;
    let wallet_id = manager.import_wallet("Recovered", TEST_MNEMONIC).await.unwrap();

    let accounts = manager.storage().list_accounts_for_wallet(wallet_id).await.unwrap();
    assert_eq!(accounts.len(), 3);
    for account in &accounts {
        assert_eq!(account.address, TEST_ADDRESS);
        assert_eq!(account.private_key, TEST_PRIVATE_KEY);
    }
}

#[tokio::test]
async fn importing_same_phrase_twice_creates_two_wallets() {
    let (_dir, manager) = temp_manager().await;
    let a = manager.import_wallet("a", TEST_MNEMONIC).await.unwrap();
    let b = manager.import_wallet("b", TEST_MNEMONIC).await.unwrap();
    assert_ne!(a, b);

    let addr_a = manager.storage().list_accounts_for_wallet(a).await.unwrap();
    let addr_b = manager.storage().list_accounts_for_wallet(b).await.unwrap();
    assert_eq!(addr_a[0].address, addr_b[0].address);
}

#[tokio::test]
async fn invalid_import_has_no_side_effects() {
    let (_dir, manager) = temp_manager().await;
    let unknown_word = TEST_MNEMONIC.replace("about", "zzzz");
    for phrase in ["", "abandon", "hello world", unknown_word.as_str()] {
        let err = manager.import_wallet("w", phrase).await.unwrap_err();
        assert!(matches!(err, WalletError::InvalidMnemonic(_)), "{phrase:?}");
    }
    assert!(manager.storage().list_wallets().await.unwrap().is_empty());
}

#[tokio::test]
async fn unknown_configured_chain_aborts_before_any_write() {
    let mut config = WalletConfig::default();
    config.chains.chains_to_show = vec![1, 137, 999, 56];
    let (_dir, manager) = temp_manager_with(config).await;

    let err = manager.import_wallet("w", TEST_MNEMONIC).await.unwrap_err();
    assert!(matches!(err, WalletError::IntegrityError(_)));
    assert!(!err.is_recoverable());
    assert!(manager.storage().list_wallets().await.unwrap().is_empty());
}

#[tokio::test]
async fn configured_subset_of_chains() {
    let mut config = WalletConfig::default();
    config.chains.chains_to_show = vec![56];
    let (_dir, manager) = temp_manager_with(config).await;

    let id = manager.import_wallet("bsc only", TEST_MNEMONIC).await.unwrap();
    let accounts = manager.storage().list_accounts_for_wallet(id).await.unwrap();
    assert_eq!(accounts.len(), 1);
    assert_eq!(accounts[0].chain_key, "bsc");
}

#[tokio::test]
async fn delete_falls_back_to_newest_remaining() {
    let (_dir, manager) = temp_manager().await;
    let oldest = manager.create_wallet("oldest", None).await.unwrap();
    let middle = manager.create_wallet("middle", None).await.unwrap();
    let newest = manager.create_wallet("newest", None).await.unwrap();

    let mut ctx = WalletContext::default();
    manager.select_wallet(&mut ctx, middle).await.unwrap();

    let view = manager.delete_wallet(&mut ctx, middle).await.unwrap();
    assert_eq!(view.selected_wallet_id, Some(newest));
    assert_eq!(view.wallets.iter().map(|w| w.id).collect::<Vec<_>>(), vec![newest, oldest]);
    assert!(view.accounts.iter().all(|a| a.wallet_id == newest));
}

#[tokio::test]
async fn concurrent_creates_are_all_persisted_whole() {
    let (_dir, manager) = temp_manager().await;
    let manager = std::sync::Arc::new(manager);

    let mut handles = Vec::new();
    for i in 0..4 {
        let manager = manager.clone();
        handles.push(tokio::spawn(async move {
            manager.create_wallet(&format!("w{i}"), None).await
        }));
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let wallets = manager.storage().list_wallets().await.unwrap();
    assert_eq!(wallets.len(), 4);
    for wallet in wallets {
        let accounts = manager.storage().list_accounts_for_wallet(wallet.id).await.unwrap();
        assert_eq!(accounts.len(), 3);
    }
}
