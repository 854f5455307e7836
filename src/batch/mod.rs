//! # 批量处理模块
//!
//! 为每个输入执行一次外部命令。
//!
//! ## 功能
//! - 输入排除过滤
//! - 命令模板文本替换
//! - 共享作业队列与固定大小的工作线程池
//! - 进度反馈与失败汇总
//!
//! ## 依赖关系
//! - 被 `commands/mod.rs` 使用
//! - 使用 `rayon` 进行并行处理
//! - 使用 `indicatif` 显示进度

pub mod executor;
pub mod progress;
pub mod queue;
pub mod report;
pub mod resolver;
pub mod runner;
pub mod substitution;

pub use executor::{CommandExecutor, ShellExecutor};
pub use report::BatchReport;
pub use resolver::InputResolver;
pub use runner::BatchRunner;
pub use substitution::{CommandTemplate, SubstitutionContext};
