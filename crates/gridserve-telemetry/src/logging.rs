//! Structured logging configuration.

use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::{SubscriberInitExt, TryInitError},
    EnvFilter,
};

use crate::TelemetryConfig;

/// Initializes logging based on configuration.
///
/// # Panics
///
/// Panics if a global subscriber is already installed.
pub fn init_logging(config: &TelemetryConfig) {
    if let Err(e) = try_init_logging(config) {
        panic!("failed to initialize logging: {e}");
    }
}

/// Initializes logging, returning an error if a global subscriber is already
/// installed.
///
/// # Errors
///
/// Returns [`TryInitError`] if the subscriber could not be set.
pub fn try_init_logging(config: &TelemetryConfig) -> Result<(), TryInitError> {
    // RUST_LOG wins over the configured level.
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    let json = config
        .json_logs
        .then(|| fmt::layer().json().with_span_events(FmtSpan::CLOSE));
    let text = (!config.json_logs).then(|| fmt::layer().with_target(true).compact());

    tracing_subscriber::registry()
        .with(filter)
        .with(json)
        .with(text)
        .try_init()?;

    tracing::info!(
        service = %config.service_name,
        level = %config.log_level,
        json = config.json_logs,
        "Logging initialized"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_init_fails() {
        let config = TelemetryConfig::new("gridserve-test").with_log_level("warn");

        // Only the first call in this process can install the subscriber.
        let _ = try_init_logging(&config);
        assert!(try_init_logging(&config).is_err());
    }
}
