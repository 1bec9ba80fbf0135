//! # 服务商配置
//!
//! 当前使用的平台、各平台凭证/模型/地址覆盖，以及调用超时

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

use crate::error::Result;
use crate::{config_error, ensure_config};
use crate::providers::Platform;

/// 服务商配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// 当前使用的平台名称，未知或为空时回退到 siliconflow
    #[serde(default = "default_platform")]
    pub platform: String,
    /// 调用超时（秒）
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
    /// 平台名 -> 凭证
    #[serde(default)]
    pub api_keys: HashMap<String, String>,
    /// 平台名 -> 模型
    #[serde(default)]
    pub models: HashMap<String, String>,
    /// 平台名 -> 接口地址覆盖
    #[serde(default)]
    pub base_urls: HashMap<String, String>,
}

fn default_platform() -> String {
    Platform::Siliconflow.as_str().to_string()
}

const fn default_timeout_seconds() -> u64 {
    15
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            platform: default_platform(),
            timeout_seconds: default_timeout_seconds(),
            api_keys: HashMap::new(),
            models: HashMap::new(),
            base_urls: HashMap::new(),
        }
    }
}

impl ProviderConfig {
    /// 解析后的当前平台
    #[must_use]
    pub fn platform(&self) -> Platform {
        Platform::resolve(&self.platform)
    }

    /// 平台凭证
    #[must_use]
    pub fn api_key(&self, platform: Platform) -> Option<&str> {
        self.api_keys
            .get(platform.as_str())
            .map(String::as_str)
            .filter(|key| !key.is_empty())
    }

    /// 平台模型，未配置时使用平台默认模型
    #[must_use]
    pub fn model(&self, platform: Platform) -> String {
        self.models
            .get(platform.as_str())
            .filter(|model| !model.is_empty())
            .map_or_else(|| platform.default_model().to_string(), Clone::clone)
    }

    /// 平台接口地址覆盖
    #[must_use]
    pub fn base_url(&self, platform: Platform) -> Option<&str> {
        self.base_urls
            .get(platform.as_str())
            .map(String::as_str)
            .filter(|url| !url.is_empty())
    }

    /// 调用超时
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    /// 设置某个平台的凭证
    pub fn set_api_key(&mut self, platform: Platform, api_key: impl Into<String>) {
        self.api_keys.insert(platform.as_str().to_string(), api_key.into());
    }

    /// 设置某个平台的模型
    pub fn set_model(&mut self, platform: Platform, model: impl Into<String>) {
        self.models.insert(platform.as_str().to_string(), model.into());
    }

    /// 设置某个平台的接口地址
    pub fn set_base_url(&mut self, platform: Platform, base_url: impl Into<String>) {
        self.base_urls.insert(platform.as_str().to_string(), base_url.into());
    }

    /// 验证服务商配置
    pub fn validate(&self) -> Result<()> {
        ensure_config!(self.timeout_seconds > 0, "服务商调用超时必须大于0");

        for (section, map) in [
            ("api_keys", &self.api_keys),
            ("models", &self.models),
            ("base_urls", &self.base_urls),
        ] {
            // 键名按小写平台名精确匹配
            if let Some(name) = map
                .keys()
                .find(|name| !Platform::parse(name).is_ok_and(|p| p.as_str() == name.as_str()))
            {
                return Err(config_error!("provider.{} 中存在未知的服务商: {}", section, name));
            }
        }

        Ok(())
    }
}
