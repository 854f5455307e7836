//! # 统一错误处理模块
//!
//! 定义 foreach 的所有错误类型，使用 `thiserror` 派生。
//!
//! 单个作业的执行失败不在此处：它们以 `Outcome::Failed` 的形式记录在作业上，
//! 只有全部作业结束后才汇总为 `JobsFailed`。
//!
//! ## 依赖关系
//! - 被所有其他模块使用
//! - 无外部模块依赖

use thiserror::Error;

/// foreach 统一错误类型
#[derive(Error, Debug)]
pub enum ForeachError {
    // ─────────────────────────────────────────────────────────────
    // 调用方式错误
    // ─────────────────────────────────────────────────────────────
    #[error("Erroneous usage: a colon must be used to separate inputs from the command to be executed")]
    MissingSeparator,

    #[error("Erroneous usage: no command specified (colon separator cannot be the last entry provided)")]
    MissingCommand,

    #[error("Erroneous usage: no inputs specified before the colon separator")]
    NoInputs,

    // ─────────────────────────────────────────────────────────────
    // 配置错误（在任何作业运行之前）
    // ─────────────────────────────────────────────────────────────
    #[error("No inputs remaining after application of exclusion {}", criteria_noun(.criteria))]
    NoInputsRemaining { criteria: usize },

    #[error("None of the substitution keys {keys:?} appear in command string \"{command}\"; no substitution can occur")]
    NoSubstitutionKeys {
        keys: Vec<&'static str>,
        command: String,
    },

    #[error("Failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    // ─────────────────────────────────────────────────────────────
    // 执行错误
    // ─────────────────────────────────────────────────────────────
    #[error("Job for input \"{input}\" never reached a terminal state")]
    JobNotCompleted { input: String },

    #[error("Job for input \"{input}\" was claimed more than once")]
    JobClaimedTwice { input: String },

    #[error("{failed} of {total} jobs did not complete successfully: {inputs:?}")]
    JobsFailed {
        failed: usize,
        total: usize,
        inputs: Vec<String>,
    },
}

fn criteria_noun(count: &usize) -> &'static str {
    if *count == 1 {
        "criterion"
    } else {
        "criteria"
    }
}

/// Result 类型别名
pub type Result<T> = std::result::Result<T, ForeachError>;
