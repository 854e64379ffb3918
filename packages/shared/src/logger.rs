//! Logging setup for the Tsunagi binaries.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the tracing subscriber.
///
/// `RUST_LOG` wins when set. Otherwise the server library, this crate and the
/// binary all log at `default_log_level`, and `tower_http` request spans are
/// emitted at the same level.
///
/// # Arguments
///
/// * `binary_name` - The name of the binary (e.g., "tsunagi_server")
/// * `default_log_level` - The default log level (e.g., "debug", "info", "warn")
///
/// # Examples
///
/// ```no_run
/// use tsunagi_shared::logger::setup_logger;
///
/// setup_logger("tsunagi_server", "info");
/// ```
pub fn setup_logger(binary_name: &str, default_log_level: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_directives(binary_name, default_log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
    tracing::debug!("Logger initialized (default level: {})", default_log_level);
}

fn default_directives(binary_name: &str, level: &str) -> String {
    format!(
        "tsunagi_server={level},{shared}={level},{bin}={level},tower_http={level}",
        shared = env!("CARGO_PKG_NAME").replace('-', "_"),
        bin = binary_name.replace('-', "_"),
    )
}
