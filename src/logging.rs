//! Diagnostic logging setup.

use tracing_subscriber::filter::{EnvFilter, LevelFilter};

/// Environment variable holding the log filter (e.g. `GPCR_LOG=debug`).
pub const LOG_ENV_VAR: &str = "GPCR_LOG";

/// Install a stderr `tracing` subscriber, `warn` by default.
///
/// Calling it more than once is harmless.
pub fn init_logging() {
    let env_filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .with_env_var(LOG_ENV_VAR)
        .from_env_lossy();

    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
