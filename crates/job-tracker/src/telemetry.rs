//! Tracing subscriber setup for the command-line front end.

use crate::config::TelemetryConfig;
use tracing_subscriber::filter::ParseError;
use tracing_subscriber::EnvFilter;

#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    #[error("invalid log level/filter '{value}': unable to build EnvFilter")]
    EnvFilter {
        value: String,
        #[source]
        source: ParseError,
    },
    #[error("tracing subscriber already installed: {0}")]
    Subscriber(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// `RUST_LOG` wins when it parses; otherwise the configured level is used.
pub fn resolve_filter(config: &TelemetryConfig) -> Result<EnvFilter, TelemetryError> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }

    EnvFilter::try_new(config.log_level.trim()).map_err(|source| TelemetryError::EnvFilter {
        value: config.log_level.clone(),
        source,
    })
}

/// Installs the global subscriber on stderr, keeping stdout free for command output.
pub fn init(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    let env_filter = resolve_filter(config)?;

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .compact()
        .with_ansi(false)
        .try_init()
        .map_err(TelemetryError::Subscriber)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::env_guard;
    use std::env;

    #[test]
    fn configured_level_builds_filter() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        env::remove_var("RUST_LOG");
        let config = TelemetryConfig {
            log_level: "job_tracker=debug,warn".to_string(),
        };
        assert!(resolve_filter(&config).is_ok());
    }

    #[test]
    fn malformed_level_is_reported() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        env::remove_var("RUST_LOG");
        let config = TelemetryConfig {
            log_level: "job_tracker=bogus".to_string(),
        };
        match resolve_filter(&config) {
            Err(TelemetryError::EnvFilter { value, .. }) => assert_eq!(value, "job_tracker=bogus"),
            other => panic!("expected filter error, got {other:?}"),
        }
    }

    #[test]
    fn rust_log_takes_precedence_over_configured_level() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        env::set_var("RUST_LOG", "job_tracker=trace");
        let config = TelemetryConfig {
            log_level: "job_tracker=bogus".to_string(),
        };
        let resolved = resolve_filter(&config);
        env::remove_var("RUST_LOG");
        assert!(resolved.is_ok());
    }
}
