//! # 答案解析编排
//!
//! 凭证校验 → 查缓存 → 未命中时调用服务商 → 规范化 → 回写缓存。
//! 缓存读写失败按降级处理，凭证校验时的存储失败直接返回错误

pub mod inflight;
pub mod normalize;

use std::sync::Arc;
use tracing::Instrument;

use crate::auth::{CredentialValidator, UsageMeter};
use crate::cache::{AnswerStore, NewAnswer};
use crate::error::{BankError, Context, Result};
use crate::logging::{LogComponent, LogStage, mask_secret};
use crate::providers::{AnswerProvider, Platform, QuestionQuery};
use crate::{ldebug, linfo, lwarn};

pub use inflight::{InflightGuard, InflightLocks};
pub use normalize::{MULTI_ANSWER_SEPARATOR, normalize_answer};

/// 一次解析请求
#[derive(Debug, Clone)]
pub struct ResolveRequest {
    pub request_id: String,
    pub credential: Option<String>,
    pub query: QuestionQuery,
}

impl ResolveRequest {
    /// 生成新的请求 ID
    pub fn new(credential: Option<String>, query: QuestionQuery) -> Self {
        Self {
            request_id: uuid::Uuid::new_v4().to_string(),
            credential,
            query,
        }
    }
}

/// 答案来源
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerSource {
    Cache,
    Provider,
}

/// 解析结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedAnswer {
    pub answer: String,
    pub source: AnswerSource,
}

/// 答案解析器
pub struct AnswerResolver {
    validator: Arc<dyn CredentialValidator>,
    store: Arc<dyn AnswerStore>,
    provider: Arc<dyn AnswerProvider>,
    platform: Platform,
    meter: Option<Arc<dyn UsageMeter>>,
    inflight: InflightLocks,
}

impl AnswerResolver {
    pub fn new(
        validator: Arc<dyn CredentialValidator>,
        store: Arc<dyn AnswerStore>,
        provider: Arc<dyn AnswerProvider>,
        platform: Platform,
    ) -> Self {
        Self {
            validator,
            store,
            provider,
            platform,
            meter: None,
            inflight: InflightLocks::new(),
        }
    }

    /// 启用调用计量
    #[must_use]
    pub fn with_usage_meter(mut self, meter: Arc<dyn UsageMeter>) -> Self {
        self.meter = Some(meter);
        self
    }

    /// 是否启用了调用计量
    #[must_use]
    pub const fn meters_usage(&self) -> bool {
        self.meter.is_some()
    }

    /// 配置的服务商平台
    #[must_use]
    pub const fn platform(&self) -> Platform {
        self.platform
    }

    /// 解析一个题目
    pub async fn resolve(&self, request: ResolveRequest) -> Result<ResolvedAnswer> {
        let ResolveRequest {
            request_id,
            credential,
            query,
        } = request;

        let credential = self.authenticate(&request_id, credential.as_deref(), &query).await?;
        self.record_usage(&request_id, &credential).await;

        if let Some(answer) = self.cached(&request_id, &query.title).await {
            return Ok(ResolvedAnswer {
                answer,
                source: AnswerSource::Cache,
            });
        }

        let _guard = self.inflight.acquire(&query.title).await;

        // 等锁期间其他请求可能已经写入
        if let Some(answer) = self.cached(&request_id, &query.title).await {
            return Ok(ResolvedAnswer {
                answer,
                source: AnswerSource::Cache,
            });
        }

        let answer = self.ask_provider(&request_id, &query).await?;
        self.write_back(&request_id, &query, &answer).await;

        Ok(ResolvedAnswer {
            answer,
            source: AnswerSource::Provider,
        })
    }

    /// 直接调用服务商并规范化答案，不读写缓存
    pub async fn ask_provider(&self, request_id: &str, query: &QuestionQuery) -> Result<String> {
        let span = tracing::info_span!("provider", request_id = %request_id, platform = %self.platform);
        let raw = self
            .provider
            .resolve(query, self.platform)
            .instrument(span)
            .await
            .map_err(|err| {
                lwarn!(
                    request_id,
                    LogStage::Upstream,
                    LogComponent::Resolver,
                    "provider_failed",
                    "AI服务商调用失败",
                    kind = err.kind(),
                    error = err.to_string()
                );
                BankError::from(err)
            })?;

        let answer = normalize_answer(&raw, self.platform)?;
        linfo!(
            request_id,
            LogStage::Upstream,
            LogComponent::Resolver,
            "provider_answered",
            "AI服务商返回答案",
            platform = self.platform.as_str()
        );
        Ok(answer)
    }

    async fn authenticate(
        &self,
        request_id: &str,
        credential: Option<&str>,
        query: &QuestionQuery,
    ) -> Result<String> {
        let Some(credential) = credential.map(str::trim).filter(|c| !c.is_empty()) else {
            return Err(BankError::MissingCredential);
        };
        if query.title.trim().is_empty() {
            return Err(BankError::invalid_input("题目不能为空"));
        }

        if !self.validator.validate(credential).await.context("凭证校验失败")? {
            lwarn!(
                request_id,
                LogStage::Authentication,
                LogComponent::Resolver,
                "invalid_credential",
                "API密钥校验失败",
                key = mask_secret(credential)
            );
            return Err(BankError::InvalidCredential);
        }

        Ok(credential.to_string())
    }

    async fn record_usage(&self, request_id: &str, credential: &str) {
        let Some(meter) = &self.meter else {
            return;
        };
        if let Err(err) = meter.record_usage(credential).await {
            lwarn!(
                request_id,
                LogStage::Authentication,
                LogComponent::Resolver,
                "usage_record_failed",
                "记录API密钥调用次数失败",
                error = err.to_string()
            );
        }
    }

    async fn cached(&self, request_id: &str, question: &str) -> Option<String> {
        match self.store.get(question).await {
            Ok(Some(answer)) => {
                ldebug!(
                    request_id,
                    LogStage::CacheLookup,
                    LogComponent::Resolver,
                    "cache_hit",
                    "命中缓存"
                );
                Some(answer)
            }
            Ok(None) => None,
            Err(err) => {
                lwarn!(
                    request_id,
                    LogStage::CacheLookup,
                    LogComponent::Resolver,
                    "cache_read_failed",
                    "读取缓存失败，按未命中处理",
                    error = err.to_string()
                );
                None
            }
        }
    }

    async fn write_back(&self, request_id: &str, query: &QuestionQuery, answer: &str) {
        if let Err(err) = self.store.put(&NewAnswer::from_query(query, answer)).await {
            lwarn!(
                request_id,
                LogStage::CacheWrite,
                LogComponent::Resolver,
                "cache_write_failed",
                "写入缓存失败",
                error = err.to_string()
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ProviderError, ProviderResult};
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FixedValidator(std::result::Result<bool, ()>);

    #[async_trait]
    impl CredentialValidator for FixedValidator {
        async fn validate(&self, _api_key: &str) -> Result<bool> {
            self.0.map_err(|()| BankError::database("存储不可用"))
        }
    }

    #[derive(Default)]
    struct MemoryStore {
        rows: Mutex<HashMap<String, String>>,
        fail: bool,
    }

    #[async_trait]
    impl AnswerStore for MemoryStore {
        async fn get(&self, question: &str) -> Result<Option<String>> {
            if self.fail {
                return Err(BankError::database("读失败"));
            }
            Ok(self.rows.lock().unwrap().get(question).cloned())
        }

        async fn put(&self, record: &NewAnswer) -> Result<()> {
            if self.fail {
                return Err(BankError::database("写失败"));
            }
            self.rows
                .lock()
                .unwrap()
                .insert(record.question.clone(), record.answer.clone());
            Ok(())
        }
    }

    struct CountingProvider {
        reply: ProviderResult<String>,
        calls: AtomicUsize,
    }

    impl CountingProvider {
        fn ok(reply: &str) -> Self {
            Self {
                reply: Ok(reply.to_string()),
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl AnswerProvider for CountingProvider {
        async fn resolve(&self, _query: &QuestionQuery, platform: Platform) -> ProviderResult<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.reply {
                Ok(answer) => Ok(answer.clone()),
                Err(_) => Err(ProviderError::EmptyCompletion { platform }),
            }
        }
    }

    #[derive(Default)]
    struct CountingMeter(AtomicUsize);

    #[async_trait]
    impl UsageMeter for CountingMeter {
        async fn record_usage(&self, _api_key: &str) -> Result<()> {
            self.0.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    fn resolver(
        valid: std::result::Result<bool, ()>,
        store: Arc<MemoryStore>,
        provider: Arc<CountingProvider>,
    ) -> AnswerResolver {
        AnswerResolver::new(
            Arc::new(FixedValidator(valid)),
            store,
            provider,
            Platform::Siliconflow,
        )
    }

    fn request(credential: Option<&str>, title: &str) -> ResolveRequest {
        ResolveRequest::new(
            credential.map(str::to_string),
            QuestionQuery::new(title, "", ""),
        )
    }

    #[tokio::test]
    async fn missing_credential_is_rejected_before_anything_else() {
        let provider = Arc::new(CountingProvider::ok("x"));
        let resolver = resolver(Ok(true), Arc::default(), Arc::clone(&provider));

        let err = resolver.resolve(request(None, "")).await.unwrap_err();
        assert!(matches!(err, BankError::MissingCredential));
        let err = resolver.resolve(request(Some("  "), "q")).await.unwrap_err();
        assert!(matches!(err, BankError::MissingCredential));
        assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn blank_title_is_invalid_input() {
        let resolver = resolver(Ok(true), Arc::default(), Arc::new(CountingProvider::ok("x")));
        let err = resolver.resolve(request(Some("k"), "   ")).await.unwrap_err();
        assert!(matches!(err, BankError::InvalidInput { .. }));
    }

    #[tokio::test]
    async fn unknown_credential_is_rejected() {
        let resolver = resolver(Ok(false), Arc::default(), Arc::new(CountingProvider::ok("x")));
        let err = resolver.resolve(request(Some("k"), "q")).await.unwrap_err();
        assert!(matches!(err, BankError::InvalidCredential));
    }

    #[tokio::test]
    async fn validation_store_failure_is_not_a_pass() {
        let provider = Arc::new(CountingProvider::ok("x"));
        let resolver = resolver(Err(()), Arc::default(), Arc::clone(&provider));
        let err = resolver.resolve(request(Some("k"), "q")).await.unwrap_err();
        let BankError::Context { context, source } = &err else {
            panic!("expected context error, got {err:?}");
        };
        assert_eq!(context, "凭证校验失败");
        assert!(matches!(source.as_ref(), BankError::Database { .. }));
        assert_eq!(err.client_message(), "服务器内部错误");
        assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn second_resolution_is_served_from_cache() {
        let store = Arc::new(MemoryStore::default());
        let provider = Arc::new(CountingProvider::ok("```json\n{\"answer\":\"2\"}\n```"));
        let meter = Arc::new(CountingMeter::default());
        let resolver = resolver(Ok(true), Arc::clone(&store), Arc::clone(&provider))
            .with_usage_meter(meter.clone());

        let first = resolver.resolve(request(Some("k"), "1+1=?")).await.unwrap();
        assert_eq!(first.answer, "2");
        assert_eq!(first.source, AnswerSource::Provider);
        assert_eq!(store.rows.lock().unwrap().get("1+1=?").map(String::as_str), Some("2"));

        let second = resolver.resolve(request(Some("k"), "1+1=?")).await.unwrap();
        assert_eq!(second.answer, "2");
        assert_eq!(second.source, AnswerSource::Cache);
        assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
        assert_eq!(meter.0.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn store_failures_degrade_to_provider() {
        let store = Arc::new(MemoryStore {
            fail: true,
            ..MemoryStore::default()
        });
        let provider = Arc::new(CountingProvider::ok("{\"answer\":\"B\"}"));
        let resolver = resolver(Ok(true), store, Arc::clone(&provider));

        let resolved = resolver.resolve(request(Some("k"), "q")).await.unwrap();
        assert_eq!(resolved.answer, "B");
        assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn provider_failure_is_surfaced_and_not_cached() {
        let store = Arc::new(MemoryStore::default());
        let provider = Arc::new(CountingProvider {
            reply: Err(ProviderError::EmptyCompletion {
                platform: Platform::Siliconflow,
            }),
            calls: AtomicUsize::new(0),
        });
        let resolver = resolver(Ok(true), Arc::clone(&store), provider);

        let err = resolver.resolve(request(Some("k"), "q")).await.unwrap_err();
        assert!(matches!(err, BankError::Provider { .. }));
        assert!(store.rows.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn empty_normalized_answer_is_not_cached() {
        let store = Arc::new(MemoryStore::default());
        let resolver = resolver(
            Ok(true),
            Arc::clone(&store),
            Arc::new(CountingProvider::ok("```json\n```")),
        );

        let err = resolver.resolve(request(Some("k"), "q")).await.unwrap_err();
        assert!(matches!(err, BankError::Provider { .. }));
        assert!(store.rows.lock().unwrap().is_empty());
    }
}
