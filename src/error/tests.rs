//! # 错误处理测试

use crate::error::{BankError, Context, ErrorCategory, ProviderError, ProviderErrorKind};
use crate::providers::Platform;
use axum::http::StatusCode;
use std::error::Error;

#[test]
fn test_config_error_creation() {
    let err = BankError::config("测试配置错误");
    assert!(matches!(err, BankError::Config { .. }));
    assert_eq!(err.to_string(), "配置错误: 测试配置错误");
}

#[test]
fn test_config_error_with_source() {
    let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "文件不存在");
    let err = BankError::config_with_source("配置文件加载失败", io_err);

    assert!(matches!(err, BankError::Config { .. }));
    assert!(err.to_string().contains("配置错误: 配置文件加载失败"));
    assert!(err.source().is_some());
}

#[test]
fn test_credential_errors_map_to_unauthorized() {
    let missing = BankError::MissingCredential;
    let invalid = BankError::InvalidCredential;

    assert_eq!(missing.to_string(), "缺少API密钥");
    assert_eq!(invalid.to_string(), "无效的API密钥");
    assert_eq!(missing.to_http_response_parts().0, StatusCode::UNAUTHORIZED);
    assert_eq!(invalid.to_http_response_parts().0, StatusCode::UNAUTHORIZED);
    assert_eq!(invalid.category(), ErrorCategory::Client);
}

#[test]
fn test_provider_error_message_and_kind() {
    let err: BankError = ProviderError::Status {
        platform: Platform::Zhipu,
        status: 429,
        body: "rate limited".to_string(),
    }
    .into();

    assert!(err.to_string().starts_with("AI模型调用失败: "));
    assert_eq!(
        err.to_http_response_parts(),
        (StatusCode::INTERNAL_SERVER_ERROR, "PROVIDER_ERROR")
    );
    match err {
        BankError::Provider { source } => {
            assert_eq!(source.kind(), ProviderErrorKind::Unavailable);
            assert_eq!(source.platform(), Platform::Zhipu);
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_malformed_kinds() {
    assert_eq!(
        ProviderError::malformed(Platform::Gemini, "missing candidates").kind(),
        ProviderErrorKind::MalformedResponse
    );
    assert_eq!(
        ProviderError::EmptyCompletion {
            platform: Platform::Ollama
        }
        .kind(),
        ProviderErrorKind::MalformedResponse
    );
}

#[test]
fn test_client_message_hides_internal_details() {
    let err = BankError::database("disk I/O error");
    assert_eq!(err.client_message(), "服务器内部错误");
    assert_eq!(err.category(), ErrorCategory::Server);

    let err = BankError::invalid_input("题目不能为空");
    assert_eq!(err.client_message(), "题目不能为空");
}

#[test]
fn test_context_preserves_status_and_message() {
    let result: Result<(), BankError> = Err(BankError::not_found("API密钥 7"));
    let err = result.context("删除API密钥失败").unwrap_err();

    assert_eq!(err.to_string(), "删除API密钥失败: 资源不存在: API密钥 7");
    assert_eq!(err.to_http_response_parts().0, StatusCode::NOT_FOUND);
    assert!(matches!(&err, BankError::Context { source, .. } if matches!(**source, BankError::NotFound { .. })));
    assert_eq!(err.client_message(), "API密钥 7");
}

#[test]
fn test_auto_conversion_from_io_error() {
    let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "文件不存在");
    let err: BankError = io_err.into();

    assert!(matches!(err, BankError::Io { .. }));
    assert!(err.to_string().contains("IO错误: 文件操作失败"));
}

#[test]
fn test_auto_conversion_from_toml_error() {
    let invalid_toml = "invalid = toml = syntax";
    let toml_err = toml::from_str::<toml::Value>(invalid_toml).unwrap_err();
    let err: BankError = toml_err.into();

    assert!(matches!(err, BankError::Config { .. }));
    assert!(err.to_string().contains("配置错误: TOML解析失败"));
}

#[test]
fn test_ensure_business_macro() {
    fn guard(count: u64) -> crate::error::Result<()> {
        crate::ensure_business!(count > 1, "不能删除最后一个API密钥");
        Ok(())
    }

    assert!(guard(2).is_ok());
    let err = guard(1).unwrap_err();
    assert_eq!(err.to_string(), "业务错误: 不能删除最后一个API密钥");
}
