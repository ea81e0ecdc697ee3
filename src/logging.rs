//! Logging setup, powered by tracing-subscriber.

use tracing_subscriber::EnvFilter;

use crate::error::{ExamPrepError, Result};

/// Environment variable holding a full `EnvFilter` directive string.
pub const LOG_ENV: &str = "EXAMPREP_LOG";

/// Build the filter from `EXAMPREP_LOG` when set, otherwise from `level` with
/// noisy dependency crates capped at `warn`.
fn build_env_filter(level: &str) -> Result<EnvFilter> {
    if let Ok(filter) = EnvFilter::try_from_env(LOG_ENV) {
        return Ok(filter);
    }

    let mut directives = vec![level.to_string()];
    for target in ["tokio_postgres", "hyper", "hyper_util", "reqwest", "rustls"] {
        directives.push(format!("{}=warn", target));
    }

    let filter_str = directives.join(",");
    EnvFilter::try_new(&filter_str)
        .map_err(|e| ExamPrepError::Config(format!("Invalid log filter '{}': {}", filter_str, e)))
}

/// Install a console subscriber. Calling this twice is harmless; the second call
/// leaves the first subscriber in place.
pub fn init_logging(level: &str) -> Result<()> {
    let filter = build_env_filter(level)?;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init();
    Ok(())
}
