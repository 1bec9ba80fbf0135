//! # 提示词构造
//!
//! 所有平台共用同一段提示词，题目字段以 JSON 字符串形式嵌入

use serde_json::Value;

use super::types::QuestionQuery;

const INSTRUCTION: &str = "你是题库接口，根据问题和选项提供答案。选择题返回选项内容；\
多选题用###连接；判断题返回\"对\"或\"错\"；填空题用###连接多个空。\
格式：{\"answer\":\"答案\"}。只返回json格式。";

/// JSON 字符串字面量（含引号与转义）
fn quoted(text: &str) -> String {
    Value::from(text).to_string()
}

/// 构造发送给模型的提示词
#[must_use]
pub fn build_prompt(query: &QuestionQuery) -> String {
    format!(
        "{INSTRUCTION}\n{{\n  \"问题\": {},\n  \"选项\": {},\n  \"类型\": {}\n}}",
        quoted(&query.title),
        quoted(&query.options),
        quoted(&query.question_type),
    )
}
