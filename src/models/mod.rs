//! # 数据模型模块
//!
//! 定义作业、替换关键字与作业终态。
//!
//! ## 依赖关系
//! - 被 `batch/` 和 `commands/` 使用
//! - 子模块: job

pub mod job;

pub use job::{Job, Key, Outcome, Substitutions};
