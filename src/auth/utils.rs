//! # 认证工具函数

use axum::http::HeaderMap;
use std::collections::HashMap;

/// 请求头中携带密钥的名称（不区分大小写）
pub const API_KEY_HEADER: &str = "api-key";

/// 查询参数中携带密钥的名称
pub const API_KEY_QUERY_PARAMS: [&str; 2] = ["api_key", "api-key"];

/// 认证工具类
pub struct AuthUtils;

impl AuthUtils {
    /// 从请求头 `API-Key` 提取密钥，空值视为未提供
    #[must_use]
    pub fn extract_api_key_from_headers(headers: &HeaderMap) -> Option<String> {
        headers
            .get(API_KEY_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(str::to_string)
    }

    /// 从查询参数 `api_key` 或 `api-key` 提取密钥
    #[must_use]
    pub fn extract_api_key_from_query(params: &HashMap<String, String>) -> Option<String> {
        API_KEY_QUERY_PARAMS
            .iter()
            .filter_map(|name| params.get(*name))
            .map(|value| value.trim())
            .find(|value| !value.is_empty())
            .map(str::to_string)
    }

    /// 请求头优先，其次查询参数
    #[must_use]
    pub fn extract_api_key(
        headers: &HeaderMap,
        params: &HashMap<String, String>,
    ) -> Option<String> {
        Self::extract_api_key_from_headers(headers)
            .or_else(|| Self::extract_api_key_from_query(params))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn params(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn header_is_case_insensitive() {
        let mut headers = HeaderMap::new();
        headers.insert("API-Key", HeaderValue::from_static("abc"));
        assert_eq!(
            AuthUtils::extract_api_key_from_headers(&headers).as_deref(),
            Some("abc")
        );
    }

    #[test]
    fn blank_header_is_ignored() {
        let mut headers = HeaderMap::new();
        headers.insert("api-key", HeaderValue::from_static("  "));
        assert_eq!(AuthUtils::extract_api_key_from_headers(&headers), None);
    }

    #[test]
    fn query_accepts_both_spellings() {
        assert_eq!(
            AuthUtils::extract_api_key_from_query(&params(&[("api_key", "k1")])).as_deref(),
            Some("k1")
        );
        assert_eq!(
            AuthUtils::extract_api_key_from_query(&params(&[("api-key", "k2")])).as_deref(),
            Some("k2")
        );
        assert_eq!(AuthUtils::extract_api_key_from_query(&params(&[])), None);
    }

    #[test]
    fn header_takes_precedence_over_query() {
        let mut headers = HeaderMap::new();
        headers.insert("api-key", HeaderValue::from_static("from-header"));
        let key = AuthUtils::extract_api_key(&headers, &params(&[("api_key", "from-query")]));
        assert_eq!(key.as_deref(), Some("from-header"));
    }
}
