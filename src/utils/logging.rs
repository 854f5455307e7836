//! # 日志初始化
//!
//! 诊断日志使用 `tracing`，输出到 stderr。`RUST_LOG` 优先，
//! 否则按命令行的详细程度选择级别。
//!
//! 进度条显示期间，日志经 `LiveBar` 写出：写入前先调用
//! `ProgressBar::suspend` 擦除状态行，写完后再重绘，两者不会互相覆盖。
//!
//! ## 依赖关系
//! - 被 `main.rs` 调用
//! - `LiveBar` 被 `batch/progress.rs` 挂载与卸载
//! - 使用 `tracing-subscriber` (env-filter)

use indicatif::ProgressBar;
use std::io::{self, Write};
use std::sync::{Arc, Mutex, PoisonError};
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::EnvFilter;

/// 日志详细程度
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Verbosity {
    Quiet,
    Normal,
    Info,
    Debug,
}

impl Verbosity {
    /// 默认过滤级别
    pub fn level(self) -> &'static str {
        match self {
            Verbosity::Quiet => "error",
            Verbosity::Normal => "warn",
            Verbosity::Info => "info",
            Verbosity::Debug => "debug",
        }
    }
}

/// 当前显示中的进度条（可为空），日志写入时借它暂停重绘
#[derive(Clone, Default)]
pub struct LiveBar {
    slot: Arc<Mutex<Option<ProgressBar>>>,
}

impl LiveBar {
    /// 挂载进度条
    pub fn attach(&self, bar: &ProgressBar) {
        *self.slot.lock().unwrap_or_else(PoisonError::into_inner) = Some(bar.clone());
    }

    /// 卸载进度条
    pub fn detach(&self) {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner).take();
    }

    pub fn is_attached(&self) -> bool {
        self.slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// 在进度条暂停期间执行 `f`；无进度条时直接执行
    pub fn suspend<R>(&self, f: impl FnOnce() -> R) -> R {
        // 先取出克隆再释放锁，suspend 期间不持有 slot
        let bar = self
            .slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        match bar {
            Some(bar) => bar.suspend(f),
            None => f(),
        }
    }
}

/// 经 `LiveBar` 写入 stderr
pub struct BarWriter {
    live: LiveBar,
}

impl Write for BarWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.live.suspend(|| io::stderr().write(buf))
    }

    fn write_all(&mut self, buf: &[u8]) -> io::Result<()> {
        self.live.suspend(|| io::stderr().write_all(buf))
    }

    fn flush(&mut self) -> io::Result<()> {
        io::stderr().flush()
    }
}

impl<'a> MakeWriter<'a> for LiveBar {
    type Writer = BarWriter;

    fn make_writer(&'a self) -> Self::Writer {
        BarWriter { live: self.clone() }
    }
}

/// 初始化全局日志；重复初始化时静默忽略
///
/// 返回的 `LiveBar` 需交给批量执行器，进度条显示时由它挂载。
pub fn init(verbosity: Verbosity) -> LiveBar {
    let live = LiveBar::default();
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(verbosity.level()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(live.clone())
        .with_target(false)
        .without_time()
        .try_init()
        .ok();

    live
}
