use tracing_subscriber::EnvFilter;

use crate::settings::LogLevel;

/// Installs the global tracing subscriber, `RUST_LOG` takes precedence over `log_level`.
pub fn init_tracer(log_level: &LogLevel) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level.as_str()));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}
