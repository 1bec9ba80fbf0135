//! # 题目级在途锁
//!
//! 同一进程内同一题目的未命中请求串行执行，保证至多一次服务商调用

use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// 按题目文本索引的锁表，最后一个持有者离开时移除条目
#[derive(Default)]
pub struct InflightLocks {
    locks: DashMap<String, Arc<Mutex<()>>>,
}

impl InflightLocks {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// 获取某个题目的锁，等待期间只挂起当前任务
    pub async fn acquire(&self, question: &str) -> InflightGuard<'_> {
        let lock = self
            .locks
            .entry(question.to_string())
            .or_default()
            .value()
            .clone();
        let guard = lock.lock_owned().await;

        InflightGuard {
            locks: self,
            question: question.to_string(),
            guard: Some(guard),
        }
    }

    /// 当前存在的锁条目数
    #[must_use]
    pub fn len(&self) -> usize {
        self.locks.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }
}

/// 在途锁守卫
pub struct InflightGuard<'a> {
    locks: &'a InflightLocks,
    question: String,
    guard: Option<OwnedMutexGuard<()>>,
}

impl Drop for InflightGuard<'_> {
    fn drop(&mut self) {
        drop(self.guard.take());
        // 只剩锁表自身的引用时说明没有等待者
        self.locks
            .locks
            .remove_if(&self.question, |_, lock| Arc::strong_count(lock) == 1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[tokio::test]
    async fn entry_removed_after_release() {
        let locks = InflightLocks::new();
        {
            let _guard = locks.acquire("q").await;
            assert_eq!(locks.len(), 1);
        }
        assert!(locks.is_empty());
    }

    #[tokio::test]
    async fn same_question_is_serialized() {
        let locks = Arc::new(InflightLocks::new());
        let active = Arc::new(AtomicUsize::new(0));
        let max_active = Arc::new(AtomicUsize::new(0));

        let mut handles = Vec::new();
        for _ in 0..8 {
            let locks = Arc::clone(&locks);
            let active = Arc::clone(&active);
            let max_active = Arc::clone(&max_active);
            handles.push(tokio::spawn(async move {
                let _guard = locks.acquire("same").await;
                let now = active.fetch_add(1, Ordering::SeqCst) + 1;
                max_active.fetch_max(now, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(5)).await;
                active.fetch_sub(1, Ordering::SeqCst);
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(max_active.load(Ordering::SeqCst), 1);
        assert!(locks.is_empty());
    }

    #[tokio::test]
    async fn different_questions_do_not_block() {
        let locks = InflightLocks::new();
        let _a = locks.acquire("a").await;
        let _b = tokio::time::timeout(Duration::from_millis(100), locks.acquire("b"))
            .await
            .unwrap();
        assert_eq!(locks.len(), 2);
    }
}
