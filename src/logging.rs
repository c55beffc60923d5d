//! Logging initialization and configuration.

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Environment variable holding the log filter, e.g. `RUSH_LOG=rush=debug`.
pub const LOG_ENV: &str = "RUSH_LOG";

fn filter() -> EnvFilter {
    // Quiet by default: stderr belongs to the error message and to child processes.
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("off"))
}

fn subscriber() -> impl tracing::Subscriber + Send + Sync + 'static {
    tracing_subscriber::registry().with(filter()).with(
        tracing_subscriber::fmt::layer()
            .compact()
            .with_writer(std::io::stderr),
    )
}

/// Initialize the logging system. Events go to standard error.
///
/// # Panics
///
/// Panics if called more than once, or if another tracing subscriber
/// has already been set.
pub fn init() {
    subscriber().init();
}

/// Try to initialize the logging system.
///
/// Returns `Err` if logging has already been initialized.
pub fn try_init() -> Result<(), tracing_subscriber::util::TryInitError> {
    subscriber().try_init()
}
