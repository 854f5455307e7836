//! # 作业数据模型
//!
//! 每个输入对应一个作业：输入文本、替换表、展开后的命令。
//! 作业构建后不可变；执行结果 `Outcome` 单独存放，由认领该作业的工作线程产生。
//!
//! ## 依赖关系
//! - 被 `batch/substitution.rs` 构建
//! - 被 `batch/runner.rs`, `batch/report.rs` 使用

/// 可识别的替换关键字
///
/// 顺序即替换顺序：每个命令片段依次替换 IN、NAME、PRE、UNI。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    /// 完整输入
    In,
    /// 路径最后一级
    Name,
    /// 去掉扩展名的 NAME
    Pre,
    /// 去掉公共前后缀后的唯一部分
    Uni,
}

impl Key {
    /// 全部关键字，按替换顺序排列
    pub const ALL: [Key; 4] = [Key::In, Key::Name, Key::Pre, Key::Uni];

    /// 关键字在命令模板中的字面文本
    pub fn as_str(self) -> &'static str {
        match self {
            Key::In => "IN",
            Key::Name => "NAME",
            Key::Pre => "PRE",
            Key::Uni => "UNI",
        }
    }

    /// 所有关键字的字面文本
    pub fn names() -> Vec<&'static str> {
        Self::names_of(&Self::ALL)
    }

    /// 给定关键字的字面文本
    pub fn names_of(keys: &[Key]) -> Vec<&'static str> {
        keys.iter().map(|k| k.as_str()).collect()
    }

    /// 返回文本中出现的关键字
    pub fn present_in(text: &str) -> Vec<Key> {
        Self::ALL
            .into_iter()
            .filter(|k| text.contains(k.as_str()))
            .collect()
    }
}

/// 单个输入的替换表
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Substitutions {
    pub input: String,
    pub name: String,
    pub pre: String,
    pub uni: String,
}

impl Substitutions {
    /// 取某个关键字对应的值
    pub fn get(&self, key: Key) -> &str {
        match key {
            Key::In => &self.input,
            Key::Name => &self.name,
            Key::Pre => &self.pre,
            Key::Uni => &self.uni,
        }
    }
}

/// 作业：构建后只读
#[derive(Debug, Clone)]
pub struct Job {
    /// 原始输入
    pub input: String,

    /// 该输入的替换表
    pub substitutions: Substitutions,

    /// 替换后的命令片段（含空格的片段已加引号）
    pub command: Vec<String>,
}

impl Job {
    /// 交给 shell 执行的完整命令行
    pub fn command_line(&self) -> String {
        self.command.join(" ")
    }
}

/// 作业的终态
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// 正常结束，附带捕获的 stdout+stderr
    Success { output: String },
    /// 失败：返回码与捕获的输出（或错误信息）
    Failed { code: i32, output: String },
}

impl Outcome {
    pub fn is_failed(&self) -> bool {
        matches!(self, Outcome::Failed { .. })
    }

    /// 捕获的文本
    pub fn output(&self) -> &str {
        match self {
            Outcome::Success { output } | Outcome::Failed { output, .. } => output,
        }
    }

    /// 返回码；成功为 0
    pub fn code(&self) -> i32 {
        match self {
            Outcome::Success { .. } => 0,
            Outcome::Failed { code, .. } => *code,
        }
    }
}
