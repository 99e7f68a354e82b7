use crate::config::schema::KeyVersionConfig;

///
/// KeyVersionSource
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum KeyVersionSource {
    /// Named by the request's `keyVersion` header.
    Header,
    /// Taken from `keys.current_version`.
    Default,
}

///
/// KeyParams
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct KeyParams {
    pub threshold: u32,
    pub polynomial: String,
    pub pub_key: String,
}

impl From<&KeyVersionConfig> for KeyParams {
    fn from(cfg: &KeyVersionConfig) -> Self {
        Self {
            threshold: cfg.threshold,
            polynomial: cfg.polynomial.clone(),
            pub_key: cfg.pub_key.clone(),
        }
    }
}

///
/// KeyVersionInfo
///
/// Key generation a response is computed under. `params` is `None` when the
/// version is not one the service is configured for.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct KeyVersionInfo {
    pub key_version: u32,
    pub source: KeyVersionSource,
    pub params: Option<KeyParams>,
}
