use crate::config::toml_config::LoggingConfig;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn default_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("small_datetime={}", level)))
}

/// Compact human-readable output. Safe to call more than once; later calls are ignored.
pub fn init_logger(verbose: bool) {
    let filter = if verbose {
        default_filter("debug")
    } else {
        default_filter("info")
    };

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .compact(),
        )
        .try_init();
}

pub fn init_json_logger(level: &str) {
    let _ = tracing_subscriber::registry()
        .with(default_filter(level))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .json(),
        )
        .try_init();
}

pub fn init_from_config(config: &LoggingConfig) {
    if config.json {
        init_json_logger(&config.level);
        return;
    }

    let _ = tracing_subscriber::registry()
        .with(default_filter(&config.level))
        .with(tracing_subscriber::fmt::layer().with_target(false).compact())
        .try_init();
}
