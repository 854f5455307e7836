//! # 命令执行模块
//!
//! 串联输入解析、文本替换、作业执行与结果汇总。
//!
//! ## 依赖关系
//! - 被 `main.rs` 调用
//! - 使用 `cli/`, `batch/`, `utils/`
//! - 子模块: foreach

pub mod foreach;

use crate::batch::ShellExecutor;
use crate::cli::Cli;
use crate::error::Result;
use crate::utils::logging::LiveBar;

/// 执行命令
pub fn run(cli: Cli, live: LiveBar) -> Result<()> {
    foreach::execute(&cli, ShellExecutor, live)
}
