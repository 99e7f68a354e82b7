//! Key-version resolution.
//!
//! Pure function of the request headers and the key configuration. It never
//! fails: a malformed header falls back to the current version, and a
//! version the service does not know resolves without key parameters.

use crate::{
    config::schema::KeysConfig,
    log,
    log::{CallLogger, Topic},
    types::{KeyParams, KeyVersionInfo, KeyVersionSource, QuotaRequest},
};

/// Header a client uses to pin the key generation.
pub const KEY_VERSION_HEADER: &str = "keyVersion";

///
/// KeyVersionOps
///

pub struct KeyVersionOps;

impl KeyVersionOps {
    #[must_use]
    pub fn resolve(
        request: &QuotaRequest,
        keys: &KeysConfig,
        logger: &CallLogger,
    ) -> KeyVersionInfo {
        let (key_version, source) = match Self::requested_version(request, logger) {
            Some(v) => (v, KeyVersionSource::Header),
            None => (keys.current_version, KeyVersionSource::Default),
        };

        let params = keys.get(key_version).map(KeyParams::from);
        if params.is_none() {
            log!(
                logger,
                Topic::KeyVersion,
                Warn,
                "key version {key_version} is not configured"
            );
        }

        log!(
            logger,
            Topic::KeyVersion,
            Debug,
            "resolved key version {key_version} ({source:?})"
        );

        KeyVersionInfo {
            key_version,
            source,
            params,
        }
    }

    fn requested_version(request: &QuotaRequest, logger: &CallLogger) -> Option<u32> {
        let raw = request.http().headers.get(KEY_VERSION_HEADER)?;

        match raw.trim().parse::<u32>() {
            Ok(v) => Some(v),
            Err(_) => {
                log!(
                    logger,
                    Topic::KeyVersion,
                    Warn,
                    "ignoring invalid key version header '{raw}'"
                );
                None
            }
        }
    }
}

///
/// TESTS
///
