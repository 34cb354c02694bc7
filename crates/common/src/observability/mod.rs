//! Tracing subscriber setup
//!
//! Libraries in this workspace only emit `tracing` events. Binaries, examples
//! and tests that want to see them call [`init_tracing`] once.

use thiserror::Error;
use tracing_subscriber::layer::{Layer, SubscriberExt};
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Environment variable read before `RUST_LOG`
pub const LOG_ENV_VAR: &str = "WXWORK_LOG";
pub const DEFAULT_FILTER: &str = "info";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TracingConfig {
    /// Filter directives; `None` reads the environment
    pub filter: Option<String>,
    /// Emit one JSON object per event instead of human-readable lines
    pub json: bool,
}

impl TracingConfig {
    pub fn json() -> Self {
        Self { json: true, ..Self::default() }
    }

    #[must_use]
    pub fn with_filter(mut self, directives: impl Into<String>) -> Self {
        self.filter = Some(directives.into());
        self
    }
}

#[derive(Debug, Error)]
pub enum ObservabilityError {
    #[error("invalid log filter '{directives}': {reason}")]
    InvalidFilter { directives: String, reason: String },
}

/// Resolve filter directives: explicit, then `WXWORK_LOG`, then `RUST_LOG`,
/// then [`DEFAULT_FILTER`].
pub fn resolve_filter(config: &TracingConfig) -> String {
    config
        .filter
        .clone()
        .or_else(|| std::env::var(LOG_ENV_VAR).ok())
        .or_else(|| std::env::var(EnvFilter::DEFAULT_ENV).ok())
        .filter(|directives| !directives.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_FILTER.to_string())
}

/// Install the global subscriber.
///
/// Safe to call more than once; later calls leave the first subscriber in
/// place.
///
/// # Errors
/// Returns an error when the resolved filter directives do not parse.
pub fn init_tracing(config: &TracingConfig) -> Result<(), ObservabilityError> {
    let directives = resolve_filter(config);
    let env_filter = EnvFilter::try_new(&directives).map_err(|e| {
        ObservabilityError::InvalidFilter { directives: directives.clone(), reason: e.to_string() }
    })?;

    let fmt_layer = if config.json {
        tracing_subscriber::fmt::layer().json().flatten_event(true).boxed()
    } else {
        tracing_subscriber::fmt::layer().with_target(true).boxed()
    };

    tracing_subscriber::registry().with(env_filter).with(fmt_layer).try_init().ok();

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_filter_wins() {
        let config = TracingConfig::default().with_filter("wxwork_infra=debug");
        assert_eq!(resolve_filter(&config), "wxwork_infra=debug");
    }

    #[test]
    fn rejects_malformed_directives() {
        let err = init_tracing(&TracingConfig::default().with_filter("wxwork=notalevel")).unwrap_err();
        assert!(matches!(err, ObservabilityError::InvalidFilter { .. }));
    }

    #[test]
    fn repeated_init_is_harmless() {
        let config = TracingConfig::json().with_filter("warn");
        assert!(init_tracing(&config).is_ok());
        assert!(init_tracing(&config).is_ok());
    }
}
