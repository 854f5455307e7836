//! # 批量执行器
//!
//! 顺序或并行执行作业列表。
//!
//! ## 功能
//! - `threads <= 1`：当前线程按列表顺序逐个执行
//! - `threads > 1`：固定大小的 rayon 线程池，每个线程运行一个工作循环，
//!   从共享队列认领作业直到队列耗尽
//! - 单个作业失败只记录，不影响其他作业
//! - 进度条显示与结果汇总
//!
//! ## 依赖关系
//! - 被 `commands/mod.rs` 调用
//! - 使用 `batch/queue.rs`, `batch/progress.rs`, `batch/executor.rs`
//! - 使用 `rayon` 构建线程池

use super::executor::CommandExecutor;
use super::progress::{ExecutionMode, ProgressTracker};
use super::queue::JobQueue;
use super::report::BatchReport;
use crate::error::{ForeachError, Result};
use crate::models::{Job, Outcome};
use crate::utils::logging::LiveBar;

use tracing::{debug, info};

/// 批量执行器
pub struct BatchRunner<E> {
    /// 工作线程数
    threads: usize,
    executor: E,
    show_progress: bool,
    live: LiveBar,
}

impl<E: CommandExecutor> BatchRunner<E> {
    /// 创建新的批量执行器
    pub fn new(threads: usize, executor: E) -> Self {
        Self {
            threads,
            executor,
            show_progress: true,
            live: LiveBar::default(),
        }
    }

    /// 设置是否显示进度条
    pub fn show_progress(mut self, visible: bool) -> Self {
        self.show_progress = visible;
        self
    }

    /// 进度条显示期间日志经此写出
    pub fn live_bar(mut self, live: LiveBar) -> Self {
        self.live = live;
        self
    }

    pub fn mode(&self) -> ExecutionMode {
        ExecutionMode::from_threads(self.threads)
    }

    /// 执行全部作业，所有工作线程结束后返回汇总
    pub fn run(&self, jobs: Vec<Job>) -> Result<BatchReport> {
        let mode = self.mode();
        info!(jobs = jobs.len(), %mode, "Starting jobs");

        let tracker =
            ProgressTracker::new(jobs.len(), mode, self.show_progress, self.live.clone());
        let queue = JobQueue::new(&jobs);

        let finished: Vec<Vec<(usize, Outcome)>> = match mode {
            ExecutionMode::Sequential => vec![self.work(&queue, &tracker)],
            ExecutionMode::Parallel(threads) => {
                let pool = rayon::ThreadPoolBuilder::new()
                    .num_threads(threads)
                    .thread_name(|i| format!("foreach-worker-{}", i))
                    .build()?;
                // broadcast 在每个线程上各运行一个工作循环，全部返回后才继续
                pool.broadcast(|_| self.work(&queue, &tracker))
            }
        };

        tracker.finish();

        let outcomes = collect_outcomes(&jobs, finished)?;
        Ok(BatchReport::new(jobs, outcomes))
    }

    /// 工作循环：认领、执行、记录，直到队列耗尽
    fn work(&self, queue: &JobQueue<'_>, tracker: &ProgressTracker) -> Vec<(usize, Outcome)> {
        let mut finished = Vec::new();
        while let Some((index, job)) = queue.claim_next() {
            debug!(
                index,
                input = %job.input,
                substitutions = ?job.substitutions,
                "Claimed job"
            );
            let outcome = self.executor.run(&job.command_line());
            tracker.record(outcome.is_failed());
            finished.push((index, outcome));
        }
        finished
    }
}

/// 将各工作线程的结果按作业下标归位，每个作业恰好一个终态
fn collect_outcomes(jobs: &[Job], finished: Vec<Vec<(usize, Outcome)>>) -> Result<Vec<Outcome>> {
    let mut slots: Vec<Option<Outcome>> = jobs.iter().map(|_| None).collect();

    for (index, outcome) in finished.into_iter().flatten() {
        if slots[index].replace(outcome).is_some() {
            return Err(ForeachError::JobClaimedTwice {
                input: jobs[index].input.clone(),
            });
        }
    }

    slots
        .into_iter()
        .zip(jobs)
        .map(|(slot, job)| {
            slot.ok_or_else(|| ForeachError::JobNotCompleted {
                input: job.input.clone(),
            })
        })
        .collect()
}
