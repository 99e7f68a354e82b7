mod auth;
mod keys;

pub use auth::*;
pub use keys::*;

use crate::ThisError;
use serde::{Deserialize, Serialize};

///
/// ConfigSchemaError
///

#[derive(Debug, ThisError)]
pub enum ConfigSchemaError {
    #[error("validation error: {0}")]
    ValidationError(String),
}

/// Largest compact JSON request body the endpoint accepts, in UTF-16 units.
pub const DEFAULT_MAX_BODY_CHARS: usize = 16_000;

///
/// Validate
///

pub trait Validate {
    fn validate(&self) -> Result<(), ConfigSchemaError>;
}

///
/// ConfigModel
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigModel {
    /// Version string stamped on every response envelope.
    #[serde(default)]
    pub version: Option<String>,

    #[serde(default = "default_api_enabled")]
    pub api_enabled: bool,

    #[serde(default)]
    pub request: RequestConfig,

    #[serde(default)]
    pub auth: AuthConfig,

    pub keys: KeysConfig,
}

const fn default_api_enabled() -> bool {
    true
}

impl ConfigModel {
    /// Version string for response envelopes; the crate version unless
    /// overridden.
    #[must_use]
    pub fn version(&self) -> &str {
        self.version.as_deref().unwrap_or(crate::VERSION)
    }

    /// Baseline config used by unit tests.
    #[cfg(test)]
    #[must_use]
    pub fn test_default() -> Self {
        Self {
            version: Some("test-1.0.0".to_string()),
            api_enabled: true,
            request: RequestConfig::default(),
            auth: AuthConfig::default(),
            keys: KeysConfig {
                current_version: 1,
                versions: vec![KeyVersionConfig {
                    key_version: 1,
                    threshold: 2,
                    polynomial: "00".to_string(),
                    pub_key: "01".to_string(),
                }],
            },
        }
    }
}

impl Validate for ConfigModel {
    fn validate(&self) -> Result<(), ConfigSchemaError> {
        if self.version.as_deref().is_some_and(str::is_empty) {
            return Err(ConfigSchemaError::ValidationError(
                "version must not be empty".to_string(),
            ));
        }

        self.request.validate()?;
        self.auth.validate()?;
        self.keys.validate()?;

        Ok(())
    }
}

///
/// RequestConfig
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RequestConfig {
    #[serde(default = "default_max_body_chars")]
    pub max_body_chars: usize,
}

const fn default_max_body_chars() -> usize {
    DEFAULT_MAX_BODY_CHARS
}

impl Default for RequestConfig {
    fn default() -> Self {
        Self {
            max_body_chars: DEFAULT_MAX_BODY_CHARS,
        }
    }
}

impl Validate for RequestConfig {
    fn validate(&self) -> Result<(), ConfigSchemaError> {
        if self.max_body_chars == 0 {
            return Err(ConfigSchemaError::ValidationError(
                "request.max_body_chars must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }
}
