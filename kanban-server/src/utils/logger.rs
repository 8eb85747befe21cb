//! 日志初始化
//!
//! 控制台输出为默认；生产环境可附加按天滚动的文件输出。
//! `RUST_LOG` 覆盖配置的日志级别。

use std::path::Path;

use tracing_subscriber::EnvFilter;

/// Initialize console logging at the default level.
pub fn init_logger() {
    init_logger_with_file(None, None);
}

/// Initialize logging, optionally mirroring to a daily-rolling file.
///
/// `log_dir` is ignored when the directory does not exist so a missing
/// volume never prevents startup.
pub fn init_logger_with_file(log_level: Option<&str>, log_dir: Option<&str>) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_level.unwrap_or("info")));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_file(false)
        .with_line_number(false)
        .with_thread_ids(false)
        .with_target(false);

    if let Some(dir) = log_dir {
        let log_path = Path::new(dir);
        if log_path.exists()
            && let Some(dir_str) = log_path.to_str()
        {
            let file_appender = tracing_appender::rolling::daily(dir_str, "kanban-server.log");
            subscriber.with_writer(file_appender).init();
            return;
        }
    }

    subscriber.init();
}
