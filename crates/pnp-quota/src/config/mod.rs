pub mod schema;

use crate::ThisError;
use schema::{ConfigSchemaError, Validate};
use std::sync::Arc;

pub use schema::ConfigModel;

/// Errors related to configuration parsing.
#[derive(Debug, ThisError)]
pub enum ConfigError {
    /// TOML could not be parsed into the expected structure.
    #[error("toml error: {0}")]
    CannotParseToml(String),

    #[error("toml serialize error: {0}")]
    CannotSerializeToml(String),

    /// Wrapper for data schema-level errors.
    #[error(transparent)]
    ConfigSchema(#[from] ConfigSchemaError),
}

///
/// Config
///
/// Loads the service model. There is no process-wide instance: the returned
/// `Arc` is handed to every component that needs it.
///

pub struct Config;

impl Config {
    /// Parse and validate a configuration from a TOML string.
    pub fn from_toml(config_str: &str) -> Result<Arc<ConfigModel>, ConfigError> {
        let config: ConfigModel =
            toml::from_str(config_str).map_err(|e| ConfigError::CannotParseToml(e.to_string()))?;

        // validate
        config.validate()?;

        Ok(Arc::new(config))
    }

    /// Return the config as a TOML string.
    pub fn to_toml(config: &ConfigModel) -> Result<String, ConfigError> {
        toml::to_string_pretty(config).map_err(|e| ConfigError::CannotSerializeToml(e.to_string()))
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;

    const FULL: &str = r#"
        version = "3.1.0"
        api_enabled = true

        [request]
        max_body_chars = 8000

        [auth]
        enabled = true

        [auth.ledger]
        fail_open = false
        timeout_ms = 1000
        retry_count = 3
        retry_delay_ms = 50

        [keys]
        current_version = 2

        [[keys.versions]]
        key_version = 1
        threshold = 3
        polynomial = "aa"
        pub_key = "bb"

        [[keys.versions]]
        key_version = 2
        threshold = 4
        polynomial = "cc"
        pub_key = "dd"
    "#;

    #[test]
    fn parses_full_config() {
        let cfg = Config::from_toml(FULL).unwrap();

        assert_eq!(cfg.version(), "3.1.0");
        assert_eq!(cfg.request.max_body_chars, 8000);
        let ledger = cfg.auth.ledger.as_ref().unwrap();
        assert_eq!(ledger.retry_count, 3);
        assert!(!ledger.fail_open);
        assert_eq!(cfg.keys.get(2).unwrap().threshold, 4);
    }

    #[test]
    fn minimal_config_uses_defaults() {
        let cfg = Config::from_toml("[keys]\ncurrent_version = 1\n").unwrap();

        assert!(cfg.api_enabled);
        assert!(!cfg.auth.enabled);
        assert_eq!(cfg.request.max_body_chars, schema::DEFAULT_MAX_BODY_CHARS);
        assert_eq!(cfg.version(), crate::VERSION);
    }

    #[test]
    fn rejects_unknown_fields() {
        let err = Config::from_toml("[keys]\ncurrent_version = 1\nbogus = 1\n").unwrap_err();

        assert!(matches!(err, ConfigError::CannotParseToml(_)));
    }

    #[test]
    fn enabled_auth_requires_ledger_settings() {
        let err = Config::from_toml("[auth]\nenabled = true\n[keys]\ncurrent_version = 1\n")
            .unwrap_err();

        assert!(matches!(err, ConfigError::ConfigSchema(_)));
    }

    #[test]
    fn toml_round_trip_preserves_model() {
        let cfg = Config::from_toml(FULL).unwrap();
        let text = Config::to_toml(&cfg).unwrap();
        let back = Config::from_toml(&text).unwrap();

        assert_eq!(*back, *cfg);
    }
}
