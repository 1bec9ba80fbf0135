//! # 答案规范化
//!
//! 去掉模型输出外层的 Markdown 代码块，并从 `{"answer": ...}` 结构中取出答案

use serde_json::Value;

use crate::error::{ProviderError, ProviderResult};
use crate::providers::Platform;

/// 多个答案之间的分隔符
pub const MULTI_ANSWER_SEPARATOR: &str = "###";

/// 答案字段名，`anwser` 是旧版提示词中的拼写
const ANSWER_FIELDS: [&str; 2] = ["answer", "anwser"];

/// 规范化模型输出，结果为空时返回 `MalformedResponse`
pub fn normalize_answer(raw: &str, platform: Platform) -> ProviderResult<String> {
    let text = strip_code_fence(raw);

    let answer = match serde_json::from_str::<Value>(text) {
        Ok(Value::Object(map)) => ANSWER_FIELDS
            .iter()
            .find_map(|field| map.get(*field))
            .map_or_else(|| text.to_string(), value_to_answer),
        _ => text.to_string(),
    };

    let answer = answer.trim();
    if answer.is_empty() {
        return Err(ProviderError::malformed(platform, "规范化后的答案为空"));
    }
    Ok(answer.to_string())
}

/// 去掉首尾的 ```json / ``` 围栏
fn strip_code_fence(raw: &str) -> &str {
    let mut text = raw.trim();
    if let Some(rest) = text.strip_prefix("```") {
        text = rest.strip_prefix("json").unwrap_or(rest);
    }
    if let Some(rest) = text.strip_suffix("```") {
        text = rest;
    }
    text.trim()
}

fn value_to_answer(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .collect::<Vec<_>>()
            .join(MULTI_ANSWER_SEPARATOR),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProviderErrorKind;
    use rstest::rstest;

    #[rstest]
    #[case("```json\n{\"answer\":\"2\"}\n```", "2")]
    #[case("```\n{\"answer\": \"B\"}\n```", "B")]
    #[case("{\"anwser\":\"正确\"}", "正确")]
    #[case("{\"answer\":[\"A\",\"C\"]}", "A###C")]
    #[case("{\"answer\":42}", "42")]
    #[case("{\"answer\":true}", "true")]
    #[case("  plain text answer \n", "plain text answer")]
    #[case("{\"result\":\"x\"}", "{\"result\":\"x\"}")]
    #[case("[\"A\",\"B\"]", "[\"A\",\"B\"]")]
    fn normalizes_model_output(#[case] raw: &str, #[case] expected: &str) {
        assert_eq!(normalize_answer(raw, Platform::Siliconflow).unwrap(), expected);
    }

    #[rstest]
    #[case("")]
    #[case("```json\n```")]
    #[case("{\"answer\":\"  \"}")]
    #[case("{\"answer\":null}")]
    fn empty_answers_are_malformed(#[case] raw: &str) {
        let err = normalize_answer(raw, Platform::Deepseek).unwrap_err();
        assert_eq!(err.kind(), ProviderErrorKind::MalformedResponse);
        assert_eq!(err.platform(), Platform::Deepseek);
    }
}
