//! bcrypt 身份库集成测试

mod common;

use answer_bank::auth::{BcryptKeyStore, CredentialValidator};
use chrono::Utc;
use entity::hashed_api_keys;
use sea_orm::{ActiveModelTrait, Set};

#[tokio::test]
async fn registered_key_validates() {
    let store = BcryptKeyStore::with_cost(common::memory_db().await, 4);
    let registered = store.register("客户端A").await.expect("register");
    assert_eq!(registered.name, "客户端A");
    let key = registered.api_key;

    assert_eq!(key.len(), 32);
    assert!(store.validate(&key).await.expect("validate"));
    assert!(!store.validate("wrong-key").await.expect("validate"));
    assert_eq!(store.count().await.expect("count"), 1);
}

#[tokio::test]
async fn any_matching_hash_is_accepted() {
    let store = BcryptKeyStore::with_cost(common::memory_db().await, 4);
    let first = store.register("a").await.expect("register").api_key;
    let second = store.register("b").await.expect("register").api_key;

    assert!(store.validate(&first).await.expect("validate"));
    assert!(store.validate(&second).await.expect("validate"));
}

#[tokio::test]
async fn unparsable_hash_counts_as_mismatch() {
    let db = common::memory_db().await;
    hashed_api_keys::ActiveModel {
        name: Set("broken".to_string()),
        key_value: Set("not-a-bcrypt-hash".to_string()),
        created_at: Set(Utc::now().naive_utc()),
        ..Default::default()
    }
    .insert(db.as_ref())
    .await
    .expect("insert");

    let store = BcryptKeyStore::with_cost(db, 4);
    assert!(!store.validate("not-a-bcrypt-hash").await.expect("validate"));

    let key = store.register("ok").await.expect("register").api_key;
    assert!(store.validate(&key).await.expect("validate"));
}

#[tokio::test]
async fn empty_store_rejects_everything() {
    let store = BcryptKeyStore::new(common::memory_db().await);
    assert!(!store.validate("anything").await.expect("validate"));
}
