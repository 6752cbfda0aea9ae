// Logger configuration and subscriber installation
use crate::error::{LoggerError, LoggerResult};
use serde::{Deserialize, Serialize};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggerConfig {
    /// Run log messages through the PII redactor
    pub redaction_enabled: bool,
    /// Default filter directive when `RUST_LOG` is unset
    pub log_level: String,
    /// Emit JSON lines instead of human-readable output
    pub json_output: bool,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            redaction_enabled: true,
            log_level: "info".to_string(),
            json_output: false,
        }
    }
}

impl LoggerConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let redaction_enabled = std::env::var("CLINIC_LOG_REDACTION")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.redaction_enabled);

        let log_level = std::env::var("CLINIC_LOG_LEVEL").unwrap_or(defaults.log_level);

        let json_output = std::env::var("CLINIC_LOG_JSON")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.json_output);

        Self {
            redaction_enabled,
            log_level,
            json_output,
        }
    }
}

/// Install the global tracing subscriber.
///
/// Returns an error instead of panicking when a subscriber is already set,
/// so embedding applications and tests can call it more than once.
pub fn init_logging(config: &LoggerConfig) -> LoggerResult<()> {
    crate::redactor::set_redaction_enabled(config.redaction_enabled);

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.clone()));

    let result = if config.json_output {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().with_target(false).json())
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().with_target(true))
            .try_init()
    };

    result.map_err(|e| LoggerError::Init(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = LoggerConfig::default();
        assert!(config.redaction_enabled);
        assert_eq!(config.log_level, "info");
        assert!(!config.json_output);
    }

    #[test]
    fn test_second_init_is_an_error_not_a_panic() {
        let config = LoggerConfig::default();
        let _ = init_logging(&config);
        assert!(init_logging(&config).is_err());
    }
}
