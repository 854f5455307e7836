//! # 外部命令执行器
//!
//! 通过平台 shell 运行一条命令行，捕获 stdout+stderr 与返回码。
//!
//! ## 依赖关系
//! - 被 `batch/runner.rs` 调用
//! - 测试中以记录型替身实现 `CommandExecutor`

use crate::models::Outcome;

use std::process::{Command, ExitStatus, Output};
use thiserror::Error;
use tracing::debug;

/// 单条命令的执行失败
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExecError {
    /// 进程正常启动，但以非零状态退出
    #[error("Command exited with return code {code}")]
    NonZeroExit { code: i32, output: String },

    /// 进程无法启动或无法等待
    #[error("Failed to launch command: {0}")]
    Launch(String),
}

impl ExecError {
    /// 启动失败统一记为返回码 1
    pub fn into_outcome(self) -> Outcome {
        match self {
            ExecError::NonZeroExit { code, output } => Outcome::Failed { code, output },
            launch @ ExecError::Launch(_) => Outcome::Failed {
                code: 1,
                output: launch.to_string(),
            },
        }
    }
}

/// 执行单条命令行
pub trait CommandExecutor: Sync {
    /// 成功时返回捕获的 stdout+stderr
    fn execute(&self, command_line: &str) -> Result<String, ExecError>;

    /// 执行并转换为作业终态
    fn run(&self, command_line: &str) -> Outcome {
        match self.execute(command_line) {
            Ok(output) => Outcome::Success { output },
            Err(e) => e.into_outcome(),
        }
    }
}

impl<T: CommandExecutor + ?Sized> CommandExecutor for &T {
    fn execute(&self, command_line: &str) -> Result<String, ExecError> {
        (**self).execute(command_line)
    }
}

/// 通过 `sh -c`（Windows 下 `cmd /C`）执行
#[derive(Debug, Clone, Copy, Default)]
pub struct ShellExecutor;

impl ShellExecutor {
    fn shell(command_line: &str) -> Command {
        let (program, flag) = if cfg!(windows) {
            ("cmd", "/C")
        } else {
            ("sh", "-c")
        };
        let mut cmd = Command::new(program);
        cmd.arg(flag).arg(command_line);
        cmd
    }
}

impl CommandExecutor for ShellExecutor {
    fn execute(&self, command_line: &str) -> Result<String, ExecError> {
        debug!(command = command_line, "Executing");

        let output = Self::shell(command_line)
            .output()
            .map_err(|e| ExecError::Launch(format!("{}: {}", command_line, e)))?;

        let text = captured_text(&output);
        if output.status.success() {
            Ok(text)
        } else {
            let code = exit_code(output.status);
            debug!(command = command_line, code, "Command failed");
            Err(ExecError::NonZeroExit { code, output: text })
        }
    }
}

/// stdout 在前，stderr 在后
fn captured_text(output: &Output) -> String {
    let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
    text.push_str(&String::from_utf8_lossy(&output.stderr));
    text
}

/// 被信号终止时按 shell 惯例记为 128 + 信号值
fn exit_code(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }
    1
}
