//! # 结果汇总
//!
//! 全部作业结束后统计失败数量，输出失败详情（或详细模式下的全部输出），
//! 并给出整体成功 / 失败信号。
//!
//! ## 依赖关系
//! - 由 `batch/runner.rs` 构建
//! - 被 `commands/mod.rs` 使用
//! - 使用 `utils/output.rs`

use crate::error::{ForeachError, Result};
use crate::models::{Job, Outcome};
use crate::utils::output;

/// 作业及其终态
#[derive(Debug, Clone)]
pub struct JobRecord {
    pub job: Job,
    pub outcome: Outcome,
}

/// 批量执行结果，按输入顺序排列
#[derive(Debug, Clone)]
pub struct BatchReport {
    records: Vec<JobRecord>,
}

impl BatchReport {
    /// `jobs` 与 `outcomes` 按下标一一对应
    pub fn new(jobs: Vec<Job>, outcomes: Vec<Outcome>) -> Self {
        let records = jobs
            .into_iter()
            .zip(outcomes)
            .map(|(job, outcome)| JobRecord { job, outcome })
            .collect();
        Self { records }
    }

    pub fn records(&self) -> &[JobRecord] {
        &self.records
    }

    pub fn total(&self) -> usize {
        self.records.len()
    }

    /// 失败的作业
    pub fn failed(&self) -> impl Iterator<Item = &JobRecord> {
        self.records.iter().filter(|r| r.outcome.is_failed())
    }

    pub fn fail_count(&self) -> usize {
        self.failed().count()
    }

    /// 有失败时返回汇总错误
    pub fn into_result(self) -> Result<()> {
        let inputs: Vec<String> = self.failed().map(|r| r.job.input.clone()).collect();
        if inputs.is_empty() {
            return Ok(());
        }
        Err(ForeachError::JobsFailed {
            failed: inputs.len(),
            total: self.total(),
            inputs,
        })
    }

    /// 失败详情：每个失败作业的输入、返回码与捕获的输出
    pub fn failure_lines(&self) -> Vec<String> {
        let mut lines = Vec::new();
        for record in self.failed() {
            let output = record.outcome.output();
            if output.is_empty() {
                lines.push(format!(
                    "No output from command for input \"{}\" (return code = {})",
                    record.job.input,
                    record.outcome.code()
                ));
            } else {
                lines.push(format!(
                    "For input \"{}\" (return code = {}):",
                    record.job.input,
                    record.outcome.code()
                ));
                lines.extend(indented(output));
            }
        }
        lines
    }

    /// 详细模式：全部作业的输出
    pub fn output_lines(&self) -> Vec<String> {
        if self.records.iter().all(|r| r.outcome.output().is_empty()) {
            return vec!["No output from command for any inputs".to_string()];
        }

        let mut lines = Vec::new();
        for record in &self.records {
            let output = record.outcome.output();
            if output.is_empty() {
                lines.push(format!("No output from command for input \"{}\"", record.job.input));
            } else {
                lines.push(format!("Output of command for input \"{}\":", record.job.input));
                lines.extend(indented(output));
            }
        }
        lines
    }

    /// 打印失败详情
    pub fn print_failures(&self) {
        let fail_count = self.fail_count();
        if fail_count == 0 {
            return;
        }

        output::print_warning(&format!(
            "{} of {} jobs did not complete successfully",
            fail_count,
            self.total()
        ));
        output::print_warning(if fail_count > 1 {
            "Outputs from failed commands:"
        } else {
            "Output from failed command:"
        });
        print_block(&self.failure_lines());
    }

    /// 打印全部输出
    pub fn print_outputs(&self) {
        print_block(&self.output_lines());
    }
}

/// 捕获输出的每一行缩进显示
fn indented(text: &str) -> Vec<String> {
    text.lines().map(|line| format!("    {}", line)).collect()
}

fn print_block(lines: &[String]) {
    output::print_separator();
    for line in lines {
        if line.starts_with("    ") {
            output::print_plain(line);
        } else {
            output::print_info(line);
        }
    }
    output::print_separator();
}
