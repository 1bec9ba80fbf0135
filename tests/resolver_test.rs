//! 答案解析端到端测试

mod common;

use answer_bank::auth::ApiKeyVault;
use answer_bank::cache::{AnswerStore, SeaOrmAnswerStore};
use answer_bank::error::{BankError, ProviderErrorKind};
use answer_bank::providers::{Platform, QuestionQuery};
use answer_bank::resolver::{AnswerResolver, AnswerSource, ResolveRequest};
use common::StubProvider;
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use std::time::Duration;

struct Fixture {
    resolver: Arc<AnswerResolver>,
    store: Arc<SeaOrmAnswerStore>,
    vault: Arc<ApiKeyVault>,
    provider: Arc<StubProvider>,
    key: String,
}

async fn fixture(db: Arc<DatabaseConnection>, provider: StubProvider) -> Fixture {
    let store = Arc::new(SeaOrmAnswerStore::new(Arc::clone(&db)));
    let vault = Arc::new(ApiKeyVault::new(db));
    let key = vault.create(None).await.expect("create key").key_value;
    let provider = Arc::new(provider);

    let resolver = AnswerResolver::new(
        vault.clone(),
        store.clone(),
        provider.clone(),
        Platform::Siliconflow,
    )
    .with_usage_meter(vault.clone());

    Fixture {
        resolver: Arc::new(resolver),
        store,
        vault,
        provider,
        key,
    }
}

fn request(key: &str, title: &str) -> ResolveRequest {
    ResolveRequest::new(Some(key.to_string()), QuestionQuery::new(title, "", ""))
}

#[tokio::test]
async fn fenced_json_answer_is_normalized_cached_and_reused() {
    let f = fixture(
        common::memory_db().await,
        StubProvider::answering("```json\n{\"answer\":\"2\"}\n```"),
    )
    .await;

    let first = f.resolver.resolve(request(&f.key, "1+1=?")).await.expect("first");
    assert_eq!(first.answer, "2");
    assert_eq!(first.source, AnswerSource::Provider);
    assert_eq!(f.store.get("1+1=?").await.expect("get").as_deref(), Some("2"));

    let second = f.resolver.resolve(request(&f.key, "1+1=?")).await.expect("second");
    assert_eq!(second.answer, "2");
    assert_eq!(second.source, AnswerSource::Cache);
    assert_eq!(f.provider.calls(), 1);

    let keys = f.vault.list().await.expect("list");
    assert_eq!(keys[0].call_count, 2);
}

#[tokio::test]
async fn rejected_requests_are_not_metered() {
    let f = fixture(common::memory_db().await, StubProvider::answering("x")).await;

    let err = f
        .resolver
        .resolve(request("bogus", "q"))
        .await
        .expect_err("invalid key");
    assert!(matches!(err, BankError::InvalidCredential));

    let err = f
        .resolver
        .resolve(request(&f.key, ""))
        .await
        .expect_err("empty title");
    assert!(matches!(err, BankError::InvalidInput { .. }));

    assert_eq!(f.vault.list().await.expect("list")[0].call_count, 0);
    assert_eq!(f.provider.calls(), 0);
}

#[tokio::test]
async fn provider_failure_is_typed_and_not_cached() {
    let f = fixture(common::memory_db().await, StubProvider::failing()).await;

    let err = f
        .resolver
        .resolve(request(&f.key, "q"))
        .await
        .expect_err("provider down");
    match err {
        BankError::Provider { source } => {
            assert_eq!(source.kind(), ProviderErrorKind::Unavailable);
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(f.store.get("q").await.expect("get"), None);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_misses_call_provider_once() {
    let dir = tempfile::tempdir().expect("tempdir");
    let f = fixture(
        common::file_db(dir.path()).await,
        StubProvider::answering("{\"answer\":\"C\"}").with_delay(Duration::from_millis(100)),
    )
    .await;

    let mut handles = Vec::new();
    for _ in 0..8 {
        let resolver = Arc::clone(&f.resolver);
        let key = f.key.clone();
        handles.push(tokio::spawn(async move {
            resolver.resolve(request(&key, "同一道题")).await
        }));
    }

    for handle in handles {
        let resolved = handle.await.expect("join").expect("resolve");
        assert_eq!(resolved.answer, "C");
    }
    assert_eq!(f.provider.calls(), 1);
}

#[tokio::test]
async fn ask_provider_bypasses_cache() {
    let f = fixture(common::memory_db().await, StubProvider::answering("{\"answer\":\"B\"}")).await;

    let answer = f
        .resolver
        .ask_provider("test", &QuestionQuery::new("q", "", ""))
        .await
        .expect("ask");
    assert_eq!(answer, "B");
    assert_eq!(f.store.get("q").await.expect("get"), None);
}
