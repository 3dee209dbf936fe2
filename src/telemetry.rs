//! Tracing subscriber setup

use tracing_subscriber::EnvFilter;

use crate::config::LogFormat;

/// Filter used when `RUST_LOG` is unset or invalid
pub const DEFAULT_FILTER: &str = "mcp_agent=info,warp=info";

/// Install the global subscriber; later calls are ignored
pub fn init(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_FILTER.into());
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false);

    let result = match format {
        LogFormat::Pretty => builder.pretty().try_init(),
        LogFormat::Json => builder.json().with_current_span(true).try_init(),
    };

    if let Err(e) = result {
        tracing::debug!(error = %e, "Tracing subscriber already installed");
    }
}
