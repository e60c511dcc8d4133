use crate::config::AppConfig;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{self, RollingFileAppender};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Directives used when `RUST_LOG` is unset. The pool logs every statement
/// at info, so it is held to warn.
fn default_directives(log_level: &str) -> String {
    format!("{log_level},sqlx=warn")
}

/// `hourly`, `daily`, anything else never rotates
fn file_appender(config: &AppConfig) -> RollingFileAppender {
    match config.rotation.as_str() {
        "hourly" => rolling::hourly(&config.log_dir, &config.log_file),
        "daily" => rolling::daily(&config.log_dir, &config.log_file),
        _ => rolling::never(&config.log_dir, &config.log_file),
    }
}

/// Install the global subscriber. `RUST_LOG` wins over `log_level`.
///
/// JSON mode writes only to the file, with targets kept for querying. Text
/// mode also echoes to stdout. Keep the returned guard alive for the life
/// of the process; dropping it stops the file writer.
pub fn init_logging(config: &AppConfig) -> WorkerGuard {
    let (writer, guard) = tracing_appender::non_blocking(file_appender(config));

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(&config.log_level)));
    let registry = tracing_subscriber::registry().with(filter);

    if config.use_json {
        registry
            .with(fmt::layer().json().with_writer(writer).with_ansi(false))
            .init();
    } else {
        registry
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_writer(writer)
                    .with_ansi(false),
            )
            .with(fmt::layer().with_target(false))
            .init();
    }

    guard
}
