//! # 调用参数拆分
//!
//! 以第一个独立的 `:` 为界，把位置参数拆成输入列表与命令模板片段。
//! 冒号之前出现的 `-exclude X` / `--exclude X` / `--exclude=X` 归入排除条件。
//!
//! ## 依赖关系
//! - 被 `commands/mod.rs` 调用
//! - 使用 `cli/mod.rs` 解析出的位置参数

use crate::error::{ForeachError, Result};

/// 命令分隔符
pub const SEPARATOR: &str = ":";

/// 拆分后的调用
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub inputs: Vec<String>,
    pub excludes: Vec<String>,
    pub command: Vec<String>,
}

impl Invocation {
    /// 拆分位置参数
    pub fn split(args: &[String]) -> Result<Self> {
        let colon = args
            .iter()
            .position(|a| a == SEPARATOR)
            .ok_or(ForeachError::MissingSeparator)?;

        let command = args[colon + 1..].to_vec();
        if command.is_empty() {
            return Err(ForeachError::MissingCommand);
        }

        let mut inputs = Vec::new();
        let mut excludes = Vec::new();
        let mut iter = args[..colon].iter();
        while let Some(arg) = iter.next() {
            if let Some(value) = arg.strip_prefix("--exclude=") {
                excludes.push(value.to_string());
            } else if arg == "--exclude" || arg == "-exclude" {
                // 缺少取值时按普通输入处理
                match iter.next() {
                    Some(value) => excludes.push(value.clone()),
                    None => inputs.push(arg.clone()),
                }
            } else {
                inputs.push(arg.clone());
            }
        }

        if inputs.is_empty() {
            return Err(ForeachError::NoInputs);
        }

        Ok(Self {
            inputs,
            excludes,
            command,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_split_at_first_colon() {
        let inv = Invocation::split(&args(&["a.nii", "b.nii", ":", "mrconvert", "IN", ":", "x"]))
            .unwrap();
        assert_eq!(inv.inputs, args(&["a.nii", "b.nii"]));
        assert!(inv.excludes.is_empty());
        assert_eq!(inv.command, args(&["mrconvert", "IN", ":", "x"]));
    }

    #[test]
    fn test_excludes_between_inputs_and_colon() {
        let inv = Invocation::split(&args(&[
            "001.nii",
            "002.nii",
            "003.nii",
            "-exclude",
            "001.nii",
            "--exclude=00[3]",
            "--exclude",
            "zzz",
            ":",
            "mrconvert",
            "IN",
            "PRE.mif",
        ]))
        .unwrap();
        assert_eq!(inv.inputs, args(&["001.nii", "002.nii", "003.nii"]));
        assert_eq!(inv.excludes, args(&["001.nii", "00[3]", "zzz"]));
        assert_eq!(inv.command, args(&["mrconvert", "IN", "PRE.mif"]));
    }

    #[test]
    fn test_missing_colon() {
        let err = Invocation::split(&args(&["a", "b", "echo", "IN"])).unwrap_err();
        assert!(matches!(err, ForeachError::MissingSeparator));
    }

    #[test]
    fn test_colon_last() {
        let err = Invocation::split(&args(&["a", ":"])).unwrap_err();
        assert!(matches!(err, ForeachError::MissingCommand));
    }

    #[test]
    fn test_no_inputs() {
        let err = Invocation::split(&args(&[":", "echo", "IN"])).unwrap_err();
        assert!(matches!(err, ForeachError::NoInputs));
        let err = Invocation::split(&args(&["--exclude", "x", ":", "echo", "IN"])).unwrap_err();
        assert!(matches!(err, ForeachError::NoInputs));
    }
}
