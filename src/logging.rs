//! 日志初始化.
//!
//! 库代码通过 `log` 门面输出诊断信息, 这里把它们接入 tracing:
//! - console: stderr, 彩色, 带源码位置
//! - file (可选): 无色, 按天滚动, 输出到 `{directory}/{file_prefix}.{date}.log`
//!
//! 文件过滤级别默认取 `LoggingConfig::level`, 可被 `M4VH_LOG` 环境变量覆盖.

use anyhow::{Context, Result};
use chrono::{Datelike, Local, Timelike};
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;
use tracing_subscriber::{
    EnvFilter, Registry,
    fmt::{self, FormatEvent, FormatFields, format::Writer},
    layer::{Layer, SubscriberExt},
    registry::LookupSpan,
    util::SubscriberInitExt,
};

/// 覆盖文件日志级别的环境变量
pub const LOG_ENV: &str = "M4VH_LOG";

static LOG_GUARD: OnceLock<tracing_appender::non_blocking::WorkerGuard> = OnceLock::new();

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// 文件日志级别 (EnvFilter 语法)
    #[serde(default = "default_level")]
    pub level: String,
    /// console 日志级别
    #[serde(default = "default_console_level")]
    pub console_level: String,
    /// 日志目录, 为空时不写文件
    #[serde(default)]
    pub directory: Option<String>,
    #[serde(default = "default_file_prefix")]
    pub file_prefix: String,
}

fn default_level() -> String {
    "info".to_string()
}

fn default_console_level() -> String {
    "warn".to_string()
}

fn default_file_prefix() -> String {
    "m4vh".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            console_level: default_console_level(),
            directory: None,
            file_prefix: default_file_prefix(),
        }
    }
}

impl LoggingConfig {
    /// 按 -v 次数构造: 0=warn, 1=info, 2=debug, 3+=trace
    pub fn for_verbosity(verbosity: u8) -> Self {
        Self {
            console_level: level_for_verbosity(verbosity).to_string(),
            ..Self::default()
        }
    }
}

pub fn level_for_verbosity(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// 初始化全局日志, 只能成功一次
pub fn init(config: &LoggingConfig) -> Result<()> {
    let console_filter = EnvFilter::try_new(&config.console_level)
        .with_context(|| format!("无效的 console 日志级别: {}", config.console_level))?;
    let console_layer = fmt::Layer::default()
        .with_writer(std::io::stderr)
        .with_ansi(true)
        .event_format(LineFormatter { ansi: true })
        .with_filter(console_filter);

    let file_layer = match &config.directory {
        Some(directory) => {
            std::fs::create_dir_all(directory)
                .with_context(|| format!("创建日志目录失败, path={}", directory))?;
            let appender = tracing_appender::rolling::RollingFileAppender::builder()
                .rotation(tracing_appender::rolling::Rotation::DAILY)
                .filename_prefix(&config.file_prefix)
                .filename_suffix("log")
                .build(directory)
                .with_context(|| format!("创建日志文件失败, directory={}", directory))?;
            let (non_blocking, guard) = tracing_appender::non_blocking(appender);
            LOG_GUARD.set(guard).ok();

            let file_filter = match EnvFilter::try_from_env(LOG_ENV) {
                Ok(filter) => filter,
                Err(_) => EnvFilter::try_new(&config.level)
                    .with_context(|| format!("无效的文件日志级别: {}", config.level))?,
            };
            Some(
                fmt::Layer::default()
                    .with_writer(non_blocking)
                    .with_ansi(false)
                    .event_format(LineFormatter { ansi: false })
                    .with_filter(file_filter),
            )
        }
        None => None,
    };

    Registry::default()
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .context("日志系统已初始化")?;
    Ok(())
}

/// 单行格式: `[MM-DD hh:mm:ss.mmm] LEVEL file:line > message`
struct LineFormatter {
    ansi: bool,
}

impl<S, N> FormatEvent<S, N> for LineFormatter
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &fmt::FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &tracing::Event<'_>,
    ) -> std::fmt::Result {
        let now = Local::now();
        let meta = event.metadata();
        write!(
            writer,
            "[{:02}-{:02} {:02}:{:02}:{:02}.{:03}] ",
            now.month(),
            now.day(),
            now.hour(),
            now.minute(),
            now.second(),
            now.timestamp_subsec_millis()
        )?;
        if self.ansi {
            let color = match *meta.level() {
                tracing::Level::ERROR => "\x1b[31m",
                tracing::Level::WARN => "\x1b[33m",
                tracing::Level::INFO => "\x1b[32m",
                _ => "\x1b[34m",
            };
            write!(writer, "{}{:5}\x1b[0m ", color, meta.level().to_string())?;
        } else {
            write!(writer, "{:5} ", meta.level().to_string())?;
        }
        write!(
            writer,
            "{}:{} > ",
            meta.file().unwrap_or("unknown"),
            meta.line().unwrap_or(0)
        )?;
        ctx.format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}
