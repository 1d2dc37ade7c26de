use tracing_subscriber::filter::Directive;
use tracing_subscriber::EnvFilter;

use crate::error::{FlyweightError, Result};

/// Builds a filter from `RUST_LOG`, adding `default_directive` on top.
pub fn env_filter(default_directive: &str) -> Result<EnvFilter> {
    let directive = default_directive
        .parse::<Directive>()
        .map_err(|e| FlyweightError::Logging(format!("{}: {}", default_directive, e)))?;
    Ok(EnvFilter::from_default_env().add_directive(directive))
}

/// Installs the global fmt subscriber. Call once, from a binary.
pub fn init_tracing(default_directive: &str) -> Result<()> {
    let filter = env_filter(default_directive)?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .map_err(|e| FlyweightError::Logging(e.to_string()))
}
