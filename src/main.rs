//! # foreach - 批量命令执行工具
//!
//! 对一组输入中的每一个执行同一条命令（经过文本替换），
//! 可顺序执行，也可在固定数量的工作线程间并行执行。
//!
//! ## 用法
//! ```text
//! foreach [OPTIONS] <INPUTS>... : <COMMAND>...
//! foreach -n 4 subjects/* : recon-all -subjid NAME -all
//! ```
//!
//! ## 依赖关系
//! ```text
//! main.rs
//!   ├── cli/        (命令行参数定义与拆分)
//!   ├── commands/   (命令执行逻辑)
//!   │     ├── batch/     (解析、替换、队列、线程池、汇总)
//!   │     └── models/    (作业模型)
//!   ├── utils/      (输出、进度条、日志)
//!   └── error.rs    (错误处理)
//! ```

mod batch;
mod cli;
mod commands;
mod error;
mod models;
mod utils;

use clap::Parser;
use cli::Cli;

fn main() {
    // Initialize colored output for Windows compatibility
    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    let cli = Cli::parse();
    let live = utils::logging::init(cli.verbosity());

    if let Err(e) = commands::run(cli, live) {
        utils::output::print_error(&format!("{}", e));
        std::process::exit(1);
    }
}
