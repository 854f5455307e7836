//! # 作业队列
//!
//! 有序作业列表上的互斥游标。每个作业按列表顺序恰好被认领一次。
//!
//! ## 依赖关系
//! - 被 `batch/runner.rs` 的并行工作线程共享

use crate::models::Job;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};

/// 作业队列
pub struct JobQueue<'a> {
    jobs: &'a [Job],
    /// 下一个未认领作业的下标
    cursor: Mutex<usize>,
    /// 最后一个作业被认领后置位；仅用于跳过加锁
    exhausted: AtomicBool,
}

impl<'a> JobQueue<'a> {
    pub fn new(jobs: &'a [Job]) -> Self {
        Self {
            jobs,
            cursor: Mutex::new(0),
            exhausted: AtomicBool::new(jobs.is_empty()),
        }
    }

    /// 认领下一个作业，返回其下标
    pub fn claim_next(&self) -> Option<(usize, &'a Job)> {
        if self.is_exhausted() {
            return None;
        }

        // 游标只是整数，锁中毒时仍可安全使用
        let mut cursor = self.cursor.lock().unwrap_or_else(PoisonError::into_inner);
        let index = *cursor;
        let job = self.jobs.get(index)?;
        *cursor += 1;
        if *cursor == self.jobs.len() {
            self.exhausted.store(true, Ordering::Release);
        }
        Some((index, job))
    }

    pub fn is_exhausted(&self) -> bool {
        self.exhausted.load(Ordering::Acquire)
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }
}
