//! # CLI 模块
//!
//! 使用 `clap` 定义命令行参数。
//!
//! ## 命令结构
//! `foreach [OPTIONS] <INPUTS>... : <COMMAND>...`
//!
//! 选项须写在输入之前；`--exclude` 也可以写在输入与冒号之间。
//! 冒号之后的全部参数构成命令模板。
//!
//! ## 依赖关系
//! - 被 `main.rs` 使用
//! - 子模块: invocation

pub mod invocation;

use crate::utils::logging::Verbosity;

use clap::Parser;

/// foreach - 对一组输入逐个执行命令
#[derive(Parser, Debug)]
#[command(name = "foreach")]
#[command(author = "Changjiang Wu")]
#[command(version)]
#[command(
    about = "Perform some arbitrary processing step for each of a set of inputs",
    long_about = "Perform some arbitrary processing step for each of a set of inputs.\n\n\
        The command after the colon is run once per input, after text substitution of:\n  \
        IN    the full input, e.g. \"folder/image.mif\"\n  \
        NAME  the basename of the input, e.g. \"image.mif\"\n  \
        PRE   the basename stripped of its extension, e.g. \"my.image\" for \"my.image.mif.gz\"\n  \
        UNI   the unique part of the input after removing any common prefix and common suffix\n\n\
        Inputs MUST NOT contain any of these substitution strings themselves.\n\
        Use --test to check the command strings before executing them."
)]
pub struct Cli {
    /// Number of inputs to process in parallel (0 or 1: sequential)
    #[arg(short = 'n', long, env = "FOREACH_NTHREADS", default_value_t = 1)]
    pub nthreads: usize,

    /// Exclude one specific input string / all inputs matching a regular expression
    #[arg(long, value_name = "REGEX")]
    pub exclude: Vec<String>,

    /// Print the command strings after substitution, but do not execute them
    #[arg(long, default_value_t = false)]
    pub test: bool,

    /// Do not display the progress bar or informational messages
    #[arg(short, long, default_value_t = false, conflicts_with_all = ["info", "debug"])]
    pub quiet: bool,

    /// Display captured output of every command on success
    #[arg(long, default_value_t = false)]
    pub info: bool,

    /// As --info, and print diagnostic messages
    #[arg(long, default_value_t = false)]
    pub debug: bool,

    /// Inputs, a colon ":", and the command to run for each input
    #[arg(
        required = true,
        num_args = 1..,
        trailing_var_arg = true,
        allow_hyphen_values = true,
        value_name = "INPUTS... : COMMAND"
    )]
    pub args: Vec<String>,
}

impl Cli {
    pub fn verbosity(&self) -> Verbosity {
        if self.debug {
            Verbosity::Debug
        } else if self.info {
            Verbosity::Info
        } else if self.quiet {
            Verbosity::Quiet
        } else {
            Verbosity::Normal
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_options_before_inputs() {
        let cli = Cli::try_parse_from([
            "foreach", "-n", "4", "--test", "a.nii", "b.nii", ":", "mrconvert", "IN", "-force",
        ])
        .unwrap();
        assert_eq!(cli.nthreads, 4);
        assert!(cli.test);
        assert_eq!(
            cli.args,
            vec!["a.nii", "b.nii", ":", "mrconvert", "IN", "-force"]
        );
    }

    #[test]
    fn test_default_is_sequential() {
        let cli = Cli::try_parse_from(["foreach", "a", ":", "echo", "IN"]).unwrap();
        assert_eq!(cli.nthreads, 1);
        assert_eq!(cli.verbosity(), Verbosity::Normal);
    }

    #[test]
    fn test_options_after_colon_belong_to_command() {
        let cli = Cli::try_parse_from(["foreach", "a", ":", "ls", "--test", "-q", "IN"]).unwrap();
        assert!(!cli.test);
        assert!(!cli.quiet);
        assert_eq!(cli.args, vec!["a", ":", "ls", "--test", "-q", "IN"]);
    }

    #[test]
    fn test_verbosity_flags() {
        let cli = Cli::try_parse_from(["foreach", "--debug", "a", ":", "echo", "IN"]).unwrap();
        assert_eq!(cli.verbosity(), Verbosity::Debug);
        let cli = Cli::try_parse_from(["foreach", "--info", "a", ":", "echo", "IN"]).unwrap();
        assert_eq!(cli.verbosity(), Verbosity::Info);
        assert!(Cli::try_parse_from(["foreach", "-q", "--info", "a", ":", "echo", "IN"]).is_err());
    }
}
