//! Logging setup
//!
//! JSON lines in production, ANSI text everywhere else. `LOG_FORMAT`
//! (`json` or `pretty`) overrides the environment default and `RUST_LOG`
//! sets the filter.

use crate::config::{get_environment, get_log_format};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    Pretty,
}

impl LogFormat {
    /// Explicit override first, then the deployment environment.
    pub fn resolve(environment: &str, override_format: Option<&str>) -> Self {
        match override_format.map(|f| f.trim().to_ascii_lowercase()).as_deref() {
            Some("json") => LogFormat::Json,
            Some("pretty") | Some("text") => LogFormat::Pretty,
            _ if is_production(environment) => LogFormat::Json,
            _ => LogFormat::Pretty,
        }
    }
}

/// Install the global subscriber. Call once per process.
pub fn init_logging() {
    let format = LogFormat::resolve(&get_environment(), get_log_format().as_deref());
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(env_filter);

    match format {
        LogFormat::Json => registry
            .with(
                fmt::layer()
                    .json()
                    .with_target(true)
                    .with_current_span(false)
                    .with_writer(std::io::stdout),
            )
            .init(),
        LogFormat::Pretty => registry
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_file(true)
                    .with_line_number(true)
                    .with_ansi(true)
                    .with_writer(std::io::stdout),
            )
            .init(),
    }
}

pub fn is_production(env: &str) -> bool {
    matches!(env, "production" | "prod")
}
