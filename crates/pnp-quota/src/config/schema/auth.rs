use crate::config::schema::{ConfigSchemaError, Validate};
use serde::{Deserialize, Serialize};
use std::time::Duration;

///
/// AuthConfig
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AuthConfig {
    #[serde(default)]
    pub enabled: bool,

    #[serde(default)]
    pub ledger: Option<LedgerCheckConfig>,
}

impl Validate for AuthConfig {
    fn validate(&self) -> Result<(), ConfigSchemaError> {
        match (&self.ledger, self.enabled) {
            (Some(ledger), _) => ledger.validate(),
            (None, true) => Err(ConfigSchemaError::ValidationError(
                "auth.enabled requires an [auth.ledger] section".to_string(),
            )),
            (None, false) => Ok(()),
        }
    }
}

///
/// LedgerCheckConfig
///
/// Parameters of the ledger-backed account check. None of these have
/// defaults; they must come from deployment configuration.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LedgerCheckConfig {
    /// Allow the call when the ledger cannot be reached.
    pub fail_open: bool,

    /// Upper bound on a single ledger attempt.
    pub timeout_ms: u64,

    /// Total number of attempts.
    pub retry_count: u32,

    /// Pause between failed attempts.
    pub retry_delay_ms: u64,
}

impl LedgerCheckConfig {
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    #[must_use]
    pub const fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }
}

impl Validate for LedgerCheckConfig {
    fn validate(&self) -> Result<(), ConfigSchemaError> {
        if self.retry_count == 0 {
            return Err(ConfigSchemaError::ValidationError(
                "auth.ledger.retry_count must be at least 1".to_string(),
            ));
        }
        if self.timeout_ms == 0 {
            return Err(ConfigSchemaError::ValidationError(
                "auth.ledger.timeout_ms must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }
}

///
/// TESTS
///
