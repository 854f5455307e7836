//! # 美化输出工具
//!
//! 提供统一的终端输出样式。
//!
//! 捕获的命令输出与完成消息写 stdout；警告、错误以及 `--test`
//! 的命令清单写 stderr，不会与被执行命令的输出混在一起。
//!
//! ## 依赖关系
//! - 被 `commands/` 与 `batch/report.rs` 使用
//! - 使用 `colored` crate

use colored::Colorize;

/// 打印错误消息
pub fn print_error(msg: &str) {
    eprintln!("{} {}", "[ERR]".red().bold(), msg);
}

/// 打印警告消息
pub fn print_warning(msg: &str) {
    eprintln!("{} {}", "[WARN]".yellow().bold(), msg);
}

/// 打印信息消息
pub fn print_info(msg: &str) {
    println!("{} {}", "[*]".blue().bold(), msg);
}

/// 打印完成消息
pub fn print_done(msg: &str) {
    println!("{} {}", "[DONE]".green().bold(), msg);
}

/// 打印无前缀的内容行（如捕获的命令输出）
pub fn print_plain(msg: &str) {
    println!("{}", msg);
}

/// 打印标题（stderr）
pub fn print_header(title: &str) {
    let line = "─".repeat(60);
    eprintln!("\n{}", line.dimmed());
    eprintln!("  {}", title.bold());
    eprintln!("{}\n", line.dimmed());
}

/// 打印带标签的键值行（stderr）
pub fn print_labeled(label: &str, value: &str) {
    eprintln!("{} {}", label.cyan().bold(), value);
}

/// 打印分隔线
pub fn print_separator() {
    println!("{}", "─".repeat(60).dimmed());
}
