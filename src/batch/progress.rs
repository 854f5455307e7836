//! # 进度跟踪
//!
//! 维护已完成 / 失败计数并刷新状态行。
//!
//! ## 依赖关系
//! - 被 `batch/runner.rs` 调用
//! - 使用 `utils/progress.rs` 创建进度条
//! - 可见的进度条挂载到 `utils/logging.rs` 的 `LiveBar`，日志借此暂停重绘

use crate::utils::logging::LiveBar;
use crate::utils::progress;

use indicatif::ProgressBar;
use std::fmt;
use std::sync::{Mutex, PoisonError};

/// 执行方式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionMode {
    Sequential,
    /// 工作线程数
    Parallel(usize),
}

impl ExecutionMode {
    /// 线程数不大于 1 时顺序执行
    pub fn from_threads(threads: usize) -> Self {
        if threads > 1 {
            ExecutionMode::Parallel(threads)
        } else {
            ExecutionMode::Sequential
        }
    }
}

impl fmt::Display for ExecutionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExecutionMode::Sequential => write!(f, "sequentially"),
            ExecutionMode::Parallel(n) => write!(f, "across {} threads", n),
        }
    }
}

/// 计数
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Counts {
    pub completed: usize,
    pub failed: usize,
}

/// 状态行文本
pub fn status_line(counts: Counts, total: usize, mode: ExecutionMode) -> String {
    let failures = if counts.failed > 0 {
        format!(" ({} errors)", counts.failed)
    } else {
        String::new()
    };
    format!(
        "{}/{} jobs completed {}{}",
        counts.completed, total, mode, failures
    )
}

/// 进度跟踪器：计数在锁内更新，锁内不做任何进程操作
pub struct ProgressTracker {
    bar: ProgressBar,
    counts: Mutex<Counts>,
    total: usize,
    mode: ExecutionMode,
    live: LiveBar,
}

impl ProgressTracker {
    pub fn new(total: usize, mode: ExecutionMode, visible: bool, live: LiveBar) -> Self {
        let bar = progress::create_job_bar(
            total as u64,
            &status_line(Counts::default(), total, mode),
            visible,
        );
        if visible {
            live.attach(&bar);
        }
        Self {
            bar,
            counts: Mutex::new(Counts::default()),
            total,
            mode,
            live,
        }
    }

    /// 记录一个作业进入终态
    pub fn record(&self, failed: bool) {
        let mut counts = self.counts.lock().unwrap_or_else(PoisonError::into_inner);
        counts.completed += 1;
        if failed {
            counts.failed += 1;
        }
        self.bar.set_message(status_line(*counts, self.total, self.mode));
        self.bar.inc(1);
    }

    pub fn counts(&self) -> Counts {
        *self.counts.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// 当前状态行
    pub fn message(&self) -> String {
        self.bar.message()
    }

    /// 结束进度条，保留最终状态行；之后的日志直接写 stderr
    pub fn finish(&self) {
        let counts = self.counts();
        self.bar
            .finish_with_message(status_line(counts, self.total, self.mode));
        self.live.detach();
    }
}
