//! # foreach 命令实现
//!
//! 对每个输入执行一次命令。
//!
//! ## 功能
//! - 拆分输入与命令模板，应用排除条件
//! - 检查模板关键字与路径冲突
//! - `--test` 时只打印替换后的命令
//! - 顺序或并行执行，汇总失败
//!
//! ## 依赖关系
//! - 使用 `cli/` 定义的参数
//! - 使用 `batch/`, `utils/output.rs`

use crate::batch::{
    BatchReport, BatchRunner, CommandExecutor, CommandTemplate, InputResolver, SubstitutionContext,
};
use crate::cli::invocation::Invocation;
use crate::cli::Cli;
use crate::error::Result;
use crate::models::Job;
use crate::utils::logging::{LiveBar, Verbosity};
use crate::utils::output;

use tracing::debug;

/// 执行 foreach 命令
///
/// `live` 为日志写出所用的 `LiveBar`；进度条显示期间挂载在其上。
pub fn execute<E: CommandExecutor>(cli: &Cli, executor: E, live: LiveBar) -> Result<()> {
    let verbosity = cli.verbosity();
    let quiet = verbosity == Verbosity::Quiet;

    let invocation = Invocation::split(&cli.args)?;
    debug!(command = ?invocation.command, "Command template");

    let mut excludes = cli.exclude.clone();
    excludes.extend(invocation.excludes);

    // 应用排除条件
    let resolved = InputResolver::new(invocation.inputs)
        .with_excludes(excludes)
        .resolve()?;
    if let Some(warning) = resolved.unmatched_warning() {
        output::print_warning(&warning);
    }
    let inputs = resolved.inputs;

    // 模板必须至少包含一个关键字
    let template = CommandTemplate::new(invocation.command)?;
    for warning in template.collision_warnings(&inputs) {
        output::print_warning(&warning);
    }

    let context = SubstitutionContext::new(&inputs);
    let jobs = template.build_jobs(&context, &inputs);

    if cli.test {
        print_command_strings(&jobs);
        return Ok(());
    }

    let runner = BatchRunner::new(cli.nthreads, executor)
        .show_progress(!quiet)
        .live_bar(live);
    let report = runner.run(jobs)?;

    finish(report, verbosity)
}

/// 每个作业的（输入，命令行）
fn command_strings(jobs: &[Job]) -> Vec<(String, String)> {
    jobs.iter()
        .map(|job| (format!("\"{}\"", job.input), job.command_line()))
        .collect()
}

/// 打印替换后的命令（不执行），写 stderr
fn print_command_strings(jobs: &[Job]) {
    output::print_header(&format!("Command strings for {} jobs:", jobs.len()));
    for (input, command) in command_strings(jobs) {
        output::print_labeled("Input:  ", &input);
        output::print_labeled("Command:", &command);
    }
}

/// 输出汇总并给出最终结果
fn finish(report: BatchReport, verbosity: Verbosity) -> Result<()> {
    for record in report.records() {
        debug!(input = %record.job.input, code = record.outcome.code(), "Job finished");
    }

    if report.fail_count() > 0 {
        report.print_failures();
        return report.into_result();
    }

    if verbosity >= Verbosity::Info {
        report.print_outputs();
    }

    if verbosity > Verbosity::Quiet {
        output::print_done("Script reported successful completion for all inputs");
    }
    Ok(())
}
