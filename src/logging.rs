use tracing_subscriber::EnvFilter;

use crate::error::{Result, ToolError};

/// Installs the global tracing subscriber.
///
/// `RUST_LOG` takes precedence; otherwise `default_level` (for example
/// `info` or `debug`) applies to every target.
pub fn init_tracing(default_level: &str) -> Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(default_level)
            .map_err(|error| ToolError::Logging(error.to_string()))?,
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|error| ToolError::Logging(error.to_string()))
}
