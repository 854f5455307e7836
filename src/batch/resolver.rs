//! # 输入解析器
//!
//! 根据排除条件过滤原始输入列表。
//!
//! ## 功能
//! - 先按字面完全匹配排除
//! - 无字面匹配时编译为正则表达式，对每个输入做子串搜索
//! - 未产生任何排除的条件记为 unmatched（仅警告）
//! - 全部输入被排除时报错
//!
//! ## 依赖关系
//! - 被 `commands/mod.rs` 调用
//! - 使用 `regex` 编译排除条件

use crate::error::{ForeachError, Result};

use regex::Regex;
use tracing::debug;

/// 解析结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved {
    /// 过滤后的输入，保持原有顺序
    pub inputs: Vec<String>,
    /// 没有排除任何输入的条件
    pub unmatched: Vec<String>,
}

impl Resolved {
    /// 未匹配条件的警告文本
    pub fn unmatched_warning(&self) -> Option<String> {
        match self.unmatched.as_slice() {
            [] => None,
            [single] => Some(format!(
                "Item specified via --exclude did not result in item exclusion, \
                 whether by direct match or compilation as regex: \"{}\"",
                single
            )),
            many => Some(format!(
                "Items specified via --exclude did not result in item exclusion, \
                 whether by direct match or compilation as regex: {:?}",
                many
            )),
        }
    }
}

/// 输入解析器
pub struct InputResolver {
    /// 原始输入
    inputs: Vec<String>,
    /// 排除条件
    excludes: Vec<String>,
}

impl InputResolver {
    /// 创建新的输入解析器
    pub fn new(inputs: Vec<String>) -> Self {
        Self {
            inputs,
            excludes: Vec::new(),
        }
    }

    /// 设置排除条件
    pub fn with_excludes(mut self, excludes: Vec<String>) -> Self {
        self.excludes = excludes;
        self
    }

    /// 应用排除条件
    pub fn resolve(self) -> Result<Resolved> {
        debug!(inputs = ?self.inputs, "All inputs");

        if self.inputs.is_empty() {
            return Err(ForeachError::NoInputs);
        }

        if self.excludes.is_empty() {
            return Ok(Resolved {
                inputs: self.inputs,
                unmatched: Vec::new(),
            });
        }

        debug!(excludes = ?self.excludes, "To exclude");

        let mut to_exclude: Vec<&str> = Vec::new();
        let mut unmatched = Vec::new();

        for criterion in &self.excludes {
            if self.inputs.iter().any(|input| input == criterion) {
                to_exclude.push(criterion);
                continue;
            }

            let hits = match Regex::new(criterion) {
                Ok(re) => self.regex_hits(&re),
                Err(e) => {
                    debug!(criterion = %criterion, error = %e, "Exclude string did not compile as regex");
                    unmatched.push(criterion.clone());
                    continue;
                }
            };

            if hits.is_empty() {
                debug!(criterion = %criterion, "Compiled exclude regex had no hits");
                unmatched.push(criterion.clone());
            } else {
                debug!(criterion = %criterion, hits = ?hits, "Inputs excluded via regex");
                to_exclude.extend(hits);
            }
        }

        let inputs: Vec<String> = self
            .inputs
            .iter()
            .filter(|input| !to_exclude.contains(&input.as_str()))
            .cloned()
            .collect();

        if inputs.is_empty() {
            return Err(ForeachError::NoInputsRemaining {
                criteria: self.excludes.len(),
            });
        }

        debug!(inputs = ?inputs, "Inputs after exclusion");

        Ok(Resolved { inputs, unmatched })
    }

    /// 正则子串搜索命中（非空匹配）的输入
    fn regex_hits(&self, re: &Regex) -> Vec<&str> {
        self.inputs
            .iter()
            .filter(|input| re.find(input).is_some_and(|m| !m.as_str().is_empty()))
            .map(|s| s.as_str())
            .collect()
    }
}
