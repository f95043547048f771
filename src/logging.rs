use time::macros::format_description;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    fmt::{self, time::LocalTime},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

use crate::config::Config;

const LOG_FILE_PREFIX: &str = "user_service.log";

// -- 初始化日志：终端输出，配置了 LOG_DIR 时额外按天写入文件
pub fn init(config: &Config) -> Option<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let stdout_layer = fmt::layer().with_timer(LocalTime::new(format_description!(
        "[year]-[month]-[day] [hour]:[minute]:[second]"
    )));

    let (file_layer, guard) = match config.log_dir.as_deref() {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer()
                .with_timer(LocalTime::new(format_description!(
                    "[year]-[month]-[day] [hour]:[minute]:[second]"
                )))
                .with_ansi(false)
                .with_writer(writer);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stdout_layer)
        .with(file_layer)
        .init();

    guard
}
