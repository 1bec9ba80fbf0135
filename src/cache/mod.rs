//! # 答案缓存模块
//!
//! 以题目文本为键的持久化答案缓存（cache-aside 中的存储端）

pub mod answer_store;

pub use answer_store::{AnswerStats, AnswerStore, NewAnswer, QuestionRecord, SeaOrmAnswerStore};
