//! Console configuration (environment-driven).

use serde::Deserialize;
use thiserror::Error;

pub const ENV_LOG_FILTER: &str = "ADMIN_CONSOLE_LOG";
pub const ENV_LOG_JSON: &str = "ADMIN_CONSOLE_LOG_JSON";
pub const ENV_PASSWORD_MIN_LENGTH: &str = "ADMIN_CONSOLE_PASSWORD_MIN_LENGTH";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var} must be a boolean, got '{value}'")]
    InvalidBool { var: &'static str, value: String },

    #[error("{var} must be a positive integer, got '{value}'")]
    InvalidNumber { var: &'static str, value: String },
}

/// Settings shared by the console crates.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ConsoleConfig {
    /// `tracing` filter directive (same syntax as `RUST_LOG`).
    pub log_filter: String,
    /// Emit JSON log lines instead of the human-readable format.
    pub log_json: bool,
    /// Minimum password length enforced by the BASIC and STRICT rule sets.
    pub password_min_length: usize,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            log_filter: "info".to_string(),
            log_json: true,
            password_min_length: 6,
        }
    }
}

impl ConsoleConfig {
    /// Load from the process environment, falling back to defaults for unset
    /// variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load from an arbitrary key lookup (the environment, a map in tests).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(filter) = lookup(ENV_LOG_FILTER).filter(|v| !v.trim().is_empty()) {
            config.log_filter = filter.trim().to_string();
        }

        if let Some(raw) = lookup(ENV_LOG_JSON) {
            config.log_json = parse_bool(ENV_LOG_JSON, &raw)?;
        }

        if let Some(raw) = lookup(ENV_PASSWORD_MIN_LENGTH) {
            config.password_min_length = match raw.trim().parse::<usize>() {
                Ok(n) if n > 0 => n,
                _ => {
                    return Err(ConfigError::InvalidNumber {
                        var: ENV_PASSWORD_MIN_LENGTH,
                        value: raw,
                    });
                }
            };
        }

        tracing::debug!(
            log_filter = %config.log_filter,
            log_json = config.log_json,
            password_min_length = config.password_min_length,
            "console configuration loaded"
        );

        Ok(config)
    }
}

fn parse_bool(var: &'static str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidBool {
            var,
            value: raw.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(pairs: &[(&str, &str)]) -> Result<ConsoleConfig, ConfigError> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ConsoleConfig::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let config = ConsoleConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config, ConsoleConfig::default());
        assert_eq!(config.password_min_length, 6);
    }

    #[test]
    fn reads_overrides() {
        let config = load(&[
            (ENV_LOG_FILTER, "debug,admin_console_auth=trace"),
            (ENV_LOG_JSON, "off"),
            (ENV_PASSWORD_MIN_LENGTH, "8"),
        ])
        .unwrap();

        assert_eq!(config.log_filter, "debug,admin_console_auth=trace");
        assert!(!config.log_json);
        assert_eq!(config.password_min_length, 8);
    }

    #[test]
    fn rejects_malformed_values() {
        let err = load(&[(ENV_LOG_JSON, "maybe")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidBool { var: ENV_LOG_JSON, .. }));

        let err = load(&[(ENV_PASSWORD_MIN_LENGTH, "0")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidNumber { .. }));
    }

    #[test]
    fn deserializes_with_partial_fields() {
        let config: ConsoleConfig =
            serde_json::from_str(r#"{ "password_min_length": 10 }"#).unwrap();
        assert_eq!(config.password_min_length, 10);
        assert_eq!(config.log_filter, "info");
    }
}
