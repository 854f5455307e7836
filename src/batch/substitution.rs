//! # 文本替换引擎
//!
//! 对每个输入展开命令模板，生成作业列表。
//!
//! ## 功能
//! - 一次性计算全部输入的公共前缀 / 公共后缀
//! - 为每个输入导出 IN、NAME、PRE、UNI
//! - 按固定顺序替换模板中每个片段的关键字
//! - 运行前检查模板是否包含关键字，以及路径冲突（仅警告）
//!
//! ## 依赖关系
//! - 被 `commands/mod.rs` 调用
//! - 使用 `models/job.rs`

use crate::error::{ForeachError, Result};
use crate::models::{Job, Key, Substitutions};

use std::path::{is_separator, Path};
use tracing::debug;

/// 去掉扩展名之前先剥离的压缩后缀
const COMPRESSED_SUFFIX: &str = ".gz";

/// 替换上下文：公共前后缀，计算后只读
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubstitutionContext {
    pub common_prefix: String,
    pub common_suffix: String,
}

impl SubstitutionContext {
    /// 基于全部输入计算公共前后缀
    pub fn new(inputs: &[String]) -> Self {
        let common_prefix = common_prefix(inputs);
        let common_suffix = common_suffix(inputs);

        if common_prefix.is_empty() {
            debug!("No common prefix");
        } else {
            debug!(prefix = %common_prefix, "Common prefix");
        }
        if common_suffix.is_empty() {
            debug!("No common suffix");
        } else {
            debug!(suffix = %common_suffix, "Common suffix");
        }

        Self {
            common_prefix,
            common_suffix,
        }
    }

    /// 导出单个输入的替换表
    pub fn substitutions(&self, input: &str) -> Substitutions {
        let name = basename(input).to_string();
        let stem = name.strip_suffix(COMPRESSED_SUFFIX).unwrap_or(name.as_str());
        let pre = strip_extension(stem).to_string();
        let uni = self.unique_part(input).to_string();

        Substitutions {
            input: input.to_string(),
            name,
            pre,
            uni,
        }
    }

    /// 去掉公共前缀和（非空）公共后缀
    ///
    /// 前后缀相互重叠时（单个输入或输入很短）结果为空串。
    fn unique_part<'a>(&self, input: &'a str) -> &'a str {
        let start = self.common_prefix.len();
        let end = input.len().saturating_sub(self.common_suffix.len());
        if end > start {
            &input[start..end]
        } else {
            ""
        }
    }
}

/// 命令模板：冒号之后的片段序列
#[derive(Debug, Clone)]
pub struct CommandTemplate {
    tokens: Vec<String>,
}

impl CommandTemplate {
    /// 创建模板；不含任何关键字时报错
    pub fn new(tokens: Vec<String>) -> Result<Self> {
        let template = Self { tokens };
        if !template.tokens.iter().any(|t| !Key::present_in(t).is_empty()) {
            return Err(ForeachError::NoSubstitutionKeys {
                keys: Key::names(),
                command: template.to_string(),
            });
        }
        Ok(template)
    }

    /// 用替换表展开每个片段
    pub fn expand(&self, substitutions: &Substitutions) -> Vec<String> {
        self.tokens
            .iter()
            .map(|token| {
                let expanded = Key::ALL.iter().fold(token.clone(), |acc, key| {
                    acc.replace(key.as_str(), substitutions.get(*key))
                });
                if expanded.contains(' ') {
                    format!("\"{}\"", expanded)
                } else {
                    expanded
                }
            })
            .collect()
    }

    /// 路径冲突检查
    ///
    /// 模板片段或输入本身是文件系统上存在的路径且包含关键字时，
    /// 替换很可能会破坏该路径。
    pub fn collision_warnings(&self, inputs: &[String]) -> Vec<String> {
        let mut warnings = Vec::new();

        for token in &self.tokens {
            let keys = Key::present_in(token);
            if !keys.is_empty() && Path::new(token).exists() {
                warnings.push(format!(
                    "Performing text substitution of {:?} within command: \"{}\"; \
                     but the original text exists as a path on the file system... \
                     is this a problematic filesystem path?",
                    Key::names_of(&keys),
                    token
                ));
            }
        }

        for input in inputs {
            let keys = Key::present_in(input);
            if !keys.is_empty() && Path::new(input).exists() {
                warnings.push(format!(
                    "Input \"{}\" exists as a path on the file system and contains {:?}; \
                     it may be corrupted by substitution",
                    input,
                    Key::names_of(&keys)
                ));
            }
        }

        warnings
    }

    /// 为每个输入构建作业
    pub fn build_jobs(&self, context: &SubstitutionContext, inputs: &[String]) -> Vec<Job> {
        inputs
            .iter()
            .map(|input| {
                let mut job = Job {
                    input: input.clone(),
                    substitutions: context.substitutions(input),
                    command: Vec::new(),
                };
                // 命令只由作业保存的替换表展开
                job.command = self.expand(&job.substitutions);
                debug!(
                    input = %job.input,
                    substitutions = ?job.substitutions,
                    command = ?job.command,
                    "Built job"
                );
                job
            })
            .collect()
    }
}

impl std::fmt::Display for CommandTemplate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.tokens.join(" "))
    }
}

/// 所有输入的最长公共前缀（按字符边界）
pub fn common_prefix(inputs: &[String]) -> String {
    let Some((first, rest)) = inputs.split_first() else {
        return String::new();
    };

    let mut len = first.len();
    for other in rest {
        len = shared_prefix_len(&first[..len], other);
    }
    first[..len].to_string()
}

/// 所有输入的最长公共后缀（按字符边界）
pub fn common_suffix(inputs: &[String]) -> String {
    let Some((first, rest)) = inputs.split_first() else {
        return String::new();
    };

    let mut start = 0;
    for other in rest {
        let mut s = first.len();
        for ((i, a), b) in first[start..].char_indices().rev().zip(other.chars().rev()) {
            if a != b {
                break;
            }
            s = start + i;
        }
        start = s;
    }
    first[start..].to_string()
}

/// 两个字符串共同前缀的字节长度
fn shared_prefix_len(a: &str, b: &str) -> usize {
    a.char_indices()
        .zip(b.chars())
        .take_while(|((_, x), y)| x == y)
        .last()
        .map_or(0, |((i, c), _)| i + c.len_utf8())
}

/// 路径最后一级（先去掉末尾的分隔符）
fn basename(input: &str) -> &str {
    let trimmed = input.trim_end_matches(is_separator);
    trimmed.rsplit(is_separator).next().unwrap_or(trimmed)
}

/// 去掉最后一个扩展名；开头的点不算扩展名
fn strip_extension(name: &str) -> &str {
    match name.rfind('.') {
        Some(dot) if name[..dot].chars().any(|c| c != '.') => &name[..dot],
        _ => name,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_common_prefix_and_suffix() {
        let inputs = strings(&["folder/001dwi.mif", "folder/002dwi.mif", "folder/003dwi.mif"]);
        let ctx = SubstitutionContext::new(&inputs);
        assert_eq!(ctx.common_prefix, "folder/00");
        assert_eq!(ctx.common_suffix, "dwi.mif");

        let uni: Vec<String> = inputs.iter().map(|i| ctx.substitutions(i).uni).collect();
        assert_eq!(uni, strings(&["1", "2", "3"]));
    }

    #[test]
    fn test_common_prefix_shrinks() {
        let inputs = strings(&["abcd", "abxy", "abcz"]);
        assert_eq!(common_prefix(&inputs), "ab");
        assert_eq!(common_suffix(&inputs), "");
        assert_eq!(common_prefix(&strings(&["abc", "ab"])), "ab");
        assert_eq!(common_suffix(&strings(&["xbc", "bc"])), "bc");
        assert_eq!(common_prefix(&strings(&["abc", "xyz"])), "");
    }

    #[test]
    fn test_common_prefix_respects_char_boundaries() {
        let inputs = strings(&["dé1", "dè2"]);
        // 'é' 与 'è' 首字节相同，但前缀只能停在字符边界
        assert_eq!(common_prefix(&inputs), "d");
        assert_eq!(common_suffix(&strings(&["1é", "2é"])), "é");
    }

    #[test]
    fn test_single_input_unique_part_is_empty() {
        let inputs = strings(&["folder/image.mif"]);
        let ctx = SubstitutionContext::new(&inputs);
        assert_eq!(ctx.common_prefix, "folder/image.mif");
        assert_eq!(ctx.common_suffix, "folder/image.mif");
        assert_eq!(ctx.substitutions("folder/image.mif").uni, "");
    }

    #[test]
    fn test_overlapping_prefix_and_suffix() {
        let inputs = strings(&["aXa", "aXXa"]);
        let ctx = SubstitutionContext::new(&inputs);
        assert_eq!(ctx.common_prefix, "aX");
        assert_eq!(ctx.common_suffix, "Xa");
        assert_eq!(ctx.substitutions("aXa").uni, "");
        assert_eq!(ctx.substitutions("aXXa").uni, "");
    }

    #[test]
    fn test_no_common_suffix_strips_prefix_only() {
        let inputs = strings(&["sub-01.nii", "sub-02.mif"]);
        let ctx = SubstitutionContext::new(&inputs);
        assert_eq!(ctx.common_suffix, "");
        assert_eq!(ctx.substitutions("sub-01.nii").uni, "1.nii");
    }

    #[test]
    fn test_name_and_pre() {
        let ctx = SubstitutionContext::new(&strings(&["folder/my.image.mif.gz"]));
        let subs = ctx.substitutions("folder/my.image.mif.gz");
        assert_eq!(subs.input, "folder/my.image.mif.gz");
        assert_eq!(subs.name, "my.image.mif.gz");
        assert_eq!(subs.pre, "my.image");
    }

    #[test]
    fn test_name_strips_trailing_separators() {
        let ctx = SubstitutionContext::new(&strings(&["subjects/sub-01/"]));
        let subs = ctx.substitutions("subjects/sub-01/");
        assert_eq!(subs.name, "sub-01");
        assert_eq!(subs.pre, "sub-01");
    }

    #[test]
    fn test_strip_extension_rules() {
        assert_eq!(strip_extension("image.nii"), "image");
        assert_eq!(strip_extension("image"), "image");
        assert_eq!(strip_extension(".bashrc"), ".bashrc");
        assert_eq!(strip_extension("..hidden"), "..hidden");
        assert_eq!(strip_extension("a.b.c"), "a.b");
        assert_eq!(strip_extension("trailing."), "trailing");
    }

    #[test]
    fn test_expand_replaces_every_occurrence() {
        let inputs = strings(&["data/sub-01.nii", "data/sub-02.nii"]);
        let ctx = SubstitutionContext::new(&inputs);
        let template =
            CommandTemplate::new(strings(&["mrconvert", "IN", "out/PRE_UNI.mif", "-id", "UNIUNI"]))
                .unwrap();

        let command = template.expand(&ctx.substitutions("data/sub-02.nii"));
        assert_eq!(
            command,
            strings(&["mrconvert", "data/sub-02.nii", "out/sub-02_2.mif", "-id", "22"])
        );
    }

    #[test]
    fn test_expand_quotes_tokens_with_spaces() {
        let inputs = strings(&["my scans/a.nii", "my scans/b.nii"]);
        let ctx = SubstitutionContext::new(&inputs);
        let template = CommandTemplate::new(strings(&["cat", "IN"])).unwrap();

        let job = &template.build_jobs(&ctx, &inputs)[0];
        assert_eq!(job.command, strings(&["cat", "\"my scans/a.nii\""]));
        assert_eq!(job.command_line(), "cat \"my scans/a.nii\"");
    }

    #[test]
    fn test_template_without_keys_rejected() {
        let err = CommandTemplate::new(strings(&["echo", "hello"])).unwrap_err();
        match err {
            ForeachError::NoSubstitutionKeys { keys, command } => {
                assert_eq!(keys, vec!["IN", "NAME", "PRE", "UNI"]);
                assert_eq!(command, "echo hello");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_build_jobs_one_per_input() {
        let inputs = strings(&["a.mif", "b.mif", "c.mif"]);
        let ctx = SubstitutionContext::new(&inputs);
        let template = CommandTemplate::new(strings(&["mrinfo", "IN"])).unwrap();

        let jobs = template.build_jobs(&ctx, &inputs);
        assert_eq!(jobs.len(), 3);
        for (job, input) in jobs.iter().zip(&inputs) {
            assert_eq!(&job.input, input);
            assert_eq!(job.command_line(), format!("mrinfo {}", input));
        }
    }

    #[test]
    fn test_job_command_follows_stored_substitutions() {
        let inputs = strings(&["in/sub-01.nii.gz", "in/sub-02.nii.gz"]);
        let ctx = SubstitutionContext::new(&inputs);
        let template = CommandTemplate::new(strings(&["cp", "IN", "NAME", "PRE", "UNI"])).unwrap();

        let jobs = template.build_jobs(&ctx, &inputs);
        let job = &jobs[1];
        assert_eq!(job.substitutions, ctx.substitutions(&inputs[1]));
        assert_eq!(job.substitutions.get(Key::Uni), "2");
        assert_eq!(job.command, template.expand(&job.substitutions));
        assert_eq!(
            job.command_line(),
            "cp in/sub-02.nii.gz sub-02.nii.gz sub-02 2"
        );
    }

    #[test]
    fn test_collision_warnings_for_existing_paths() {
        let dir = tempfile::tempdir().unwrap();
        let clash = dir.path().join("NAME_list.txt");
        std::fs::write(&clash, "").unwrap();
        let clash = clash.to_string_lossy().to_string();

        let template = CommandTemplate::new(vec!["cat".to_string(), clash.clone(), "IN".to_string()])
            .unwrap();
        let inputs = vec![clash.clone(), "missing/PRE.nii".to_string()];

        let warnings = template.collision_warnings(&inputs);
        assert_eq!(warnings.len(), 2);
        assert!(warnings[0].contains("\"NAME\""));
        assert!(warnings[1].starts_with(&format!("Input \"{}\"", clash)));
    }

    #[test]
    fn test_no_collision_warning_for_missing_paths() {
        let template = CommandTemplate::new(strings(&["mrinfo", "IN"])).unwrap();
        assert!(template
            .collision_warnings(&strings(&["does/not/exist/IN.mif"]))
            .is_empty());
    }
}
