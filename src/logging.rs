//! 日志初始化
//!
//! 标准输出归 TUI 使用，日志统一写入数据目录下的 shortqr.log

use std::fs;
use std::io;
use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

pub const LOG_FILE_NAME: &str = "shortqr.log";

/// 初始化全局日志，返回的 guard 需要在整个程序运行期间保持存活
///
/// 设置了 `RUST_LOG` 时优先使用它，否则使用配置中的级别。
pub fn init_logging(log_dir: &Path, level: &str) -> io::Result<WorkerGuard> {
    fs::create_dir_all(log_dir)?;

    let appender = tracing_appender::rolling::never(log_dir, LOG_FILE_NAME);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_writer(writer)
        .with_env_filter(filter)
        .with_ansi(false)
        .with_target(false)
        .try_init()
        .map_err(|e| io::Error::other(e.to_string()))?;

    Ok(guard)
}
