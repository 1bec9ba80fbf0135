//! # 客户端配置
//!
//! 生成答题脚本（OCS 题库配置格式）使用的 JSON

use serde_json::{Value, json};

use crate::config::ServerConfig;

/// 题库名称
pub const CLIENT_NAME: &str = "答案题库";

/// 未指定密钥时的占位符
pub const API_KEY_PLACEHOLDER: &str = "YOUR_API_KEY_HERE";

/// 脚本端解析响应的函数，成功时取 `data.data`
const RESPONSE_HANDLER: &str =
    "return (res)=>res.code === 0 ? [undefined, res.data.data] : [res.msg, undefined]";

/// 生成客户端配置
#[must_use]
pub fn client_config(server: &ServerConfig, api_key: Option<&str>) -> Value {
    json!({
        "name": CLIENT_NAME,
        "url": format!("http://{}:{}/api/query", server.host, server.port),
        "method": "get",
        "type": "GM_xmlhttpRequest",
        "contentType": "json",
        "data": {
            "title": "${title}",
            "options": "${options}",
            "type": "${type}",
            "api-key": api_key.unwrap_or(API_KEY_PLACEHOLDER),
        },
        "handler": RESPONSE_HANDLER,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn renders_query_url_and_placeholder() {
        let server = ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 9000,
        };
        let config = client_config(&server, None);

        assert_eq!(config["url"], "http://127.0.0.1:9000/api/query");
        assert_eq!(config["data"]["api-key"], API_KEY_PLACEHOLDER);
        assert_eq!(config["data"]["title"], "${title}");
    }

    #[test]
    fn embeds_given_key() {
        let config = client_config(&ServerConfig::default(), Some("abc"));
        assert_eq!(config["data"]["api-key"], "abc");
        assert_eq!(config["method"], "get");
    }
}
