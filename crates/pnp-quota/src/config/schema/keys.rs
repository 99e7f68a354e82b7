use crate::config::schema::{ConfigSchemaError, Validate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

///
/// KeysConfig
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(deny_unknown_fields)]
pub struct KeysConfig {
    /// Key generation used when a request does not name one.
    pub current_version: u32,

    #[serde(default)]
    pub versions: Vec<KeyVersionConfig>,
}

impl KeysConfig {
    #[must_use]
    pub fn get(&self, key_version: u32) -> Option<&KeyVersionConfig> {
        self.versions.iter().find(|v| v.key_version == key_version)
    }
}

impl Validate for KeysConfig {
    fn validate(&self) -> Result<(), ConfigSchemaError> {
        let mut seen = BTreeSet::new();
        for version in &self.versions {
            if !seen.insert(version.key_version) {
                return Err(ConfigSchemaError::ValidationError(format!(
                    "duplicate key version {}",
                    version.key_version
                )));
            }
            version.validate()?;
        }

        if !self.versions.is_empty() && !seen.contains(&self.current_version) {
            return Err(ConfigSchemaError::ValidationError(format!(
                "keys.current_version {} is not listed in keys.versions",
                self.current_version
            )));
        }

        Ok(())
    }
}

///
/// KeyVersionConfig
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(deny_unknown_fields)]
pub struct KeyVersionConfig {
    pub key_version: u32,
    pub threshold: u32,
    pub polynomial: String,
    pub pub_key: String,
}

impl Validate for KeyVersionConfig {
    fn validate(&self) -> Result<(), ConfigSchemaError> {
        if self.threshold == 0 {
            return Err(ConfigSchemaError::ValidationError(format!(
                "key version {} has a zero threshold",
                self.key_version
            )));
        }

        Ok(())
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;

    fn version(key_version: u32) -> KeyVersionConfig {
        KeyVersionConfig {
            key_version,
            threshold: 2,
            polynomial: "p".to_string(),
            pub_key: "k".to_string(),
        }
    }

    #[test]
    fn duplicate_versions_are_rejected() {
        let keys = KeysConfig {
            current_version: 1,
            versions: vec![version(1), version(1)],
        };

        assert!(keys.validate().is_err());
    }

    #[test]
    fn current_version_must_be_listed() {
        let keys = KeysConfig {
            current_version: 3,
            versions: vec![version(1), version(2)],
        };

        assert!(keys.validate().is_err());
    }

    #[test]
    fn empty_version_list_is_allowed() {
        let keys = KeysConfig {
            current_version: 7,
            versions: vec![],
        };

        assert!(keys.validate().is_ok());
        assert!(keys.get(7).is_none());
    }
}
