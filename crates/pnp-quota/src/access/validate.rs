//! Inbound request validation.
//!
//! Validation is a pure gate: it reads the request and either narrows it to
//! a [`QuotaRequest`] or rejects it. Reporting the rejection is left to the
//! caller, and no authentication or ledger work happens for rejected input.

use crate::{
    ThisError,
    config::ConfigModel,
    dto::{http::HttpRequest, quota::QuotaRequestBody},
    types::{Address, AddressError, QuotaRequest},
};
use serde::de::DeserializeOwned;
use serde_json::Value;

///
/// ValidationError
///

#[derive(Debug, ThisError)]
pub enum ValidationError {
    #[error("request body is not a JSON object")]
    NotJsonObject,

    #[error("request body does not match schema: {0}")]
    Schema(String),

    #[error("invalid account: {0}")]
    InvalidAccount(#[from] AddressError),

    #[error("request body is {size} characters, limit is {max}")]
    BodyTooLarge { size: usize, max: usize },

    #[error("raw request body is {size} bytes, limit is {max}")]
    RawBodyTooLarge { size: usize, max: usize },
}

/// Raw bodies longer than this multiple of the character limit are refused
/// before parsing. A `\uXXXX` escape is the longest raw form of one UTF-16
/// unit, so no body within the limit comes close.
pub const RAW_BODY_FACTOR: usize = 8;

/// Generic structural check shared by every endpoint: the body must be a
/// JSON object that deserializes into the endpoint schema `T`.
pub fn parse_json_body<T: DeserializeOwned>(
    request: &HttpRequest,
) -> Result<(Value, T), ValidationError> {
    let value: Value =
        serde_json::from_slice(&request.body).map_err(|_| ValidationError::NotJsonObject)?;
    if !value.is_object() {
        return Err(ValidationError::NotJsonObject);
    }

    let body = T::deserialize(&value).map_err(|e| ValidationError::Schema(e.to_string()))?;

    Ok((value, body))
}

///
/// RequestValidator
///

#[derive(Clone, Copy, Debug)]
pub struct RequestValidator {
    max_body_chars: usize,
    max_raw_bytes: usize,
}

impl RequestValidator {
    #[must_use]
    pub const fn new(config: &ConfigModel) -> Self {
        let max_body_chars = config.request.max_body_chars;

        Self {
            max_body_chars,
            max_raw_bytes: max_body_chars.saturating_mul(RAW_BODY_FACTOR),
        }
    }

    /// Narrow `request` to a [`QuotaRequest`], or `None` if it is rejected.
    #[must_use]
    pub fn validate(&self, request: HttpRequest) -> Option<QuotaRequest> {
        self.check(request).ok()
    }

    /// Same as [`Self::validate`], reporting why a request was rejected.
    ///
    /// Checks run in order: raw length, schema, account, then the length of
    /// the compact re-serialized body in UTF-16 units.
    pub fn check(&self, request: HttpRequest) -> Result<QuotaRequest, ValidationError> {
        let raw = request.body.len();
        if raw > self.max_raw_bytes {
            return Err(ValidationError::RawBodyTooLarge {
                size: raw,
                max: self.max_raw_bytes,
            });
        }

        let (value, body) = parse_json_body::<QuotaRequestBody>(&request)?;

        let account: Address = body.account.parse()?;

        let size = value.to_string().encode_utf16().count();
        if size > self.max_body_chars {
            return Err(ValidationError::BodyTooLarge {
                size,
                max: self.max_body_chars,
            });
        }

        Ok(QuotaRequest::new(request, body, account))
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::schema::DEFAULT_MAX_BODY_CHARS,
        test::{ACCOUNT, quota_body},
    };
    use serde_json::json;

    fn validator() -> RequestValidator {
        RequestValidator::new(&ConfigModel::test_default())
    }

    #[test]
    fn accepts_well_formed_request_and_keeps_it_intact() {
        let http = HttpRequest::json(&quota_body()).with_header("authorization", "sig");

        let req = validator().validate(http.clone()).unwrap();

        assert_eq!(req.account().to_string(), ACCOUNT.to_lowercase());
        assert_eq!(req.authorization(), Some("sig"));
        assert_eq!(req.into_http(), http);
    }

    #[test]
    fn rejects_non_object_bodies() {
        for body in ["", "not json", "[1,2]", "\"0xabc\""] {
            let err = validator().check(HttpRequest::new(body)).unwrap_err();
            assert!(matches!(err, ValidationError::NotJsonObject), "{body}");
        }
    }

    #[test]
    fn rejects_missing_or_mistyped_fields() {
        let missing = HttpRequest::json(&json!({ "sessionID": "s" }));
        let mistyped = HttpRequest::json(&json!({ "account": ACCOUNT, "sessionID": 5 }));

        assert!(matches!(
            validator().check(missing),
            Err(ValidationError::Schema(_))
        ));
        assert!(matches!(
            validator().check(mistyped),
            Err(ValidationError::Schema(_))
        ));
    }

    #[test]
    fn rejects_invalid_account() {
        let http = HttpRequest::json(&json!({ "account": "0x1234" }));

        assert!(matches!(
            validator().check(http),
            Err(ValidationError::InvalidAccount(AddressError::InvalidLength(4)))
        ));
    }

    #[test]
    fn rejects_oversized_body() {
        let mut cfg = ConfigModel::test_default();
        cfg.request.max_body_chars = 100;
        let http = HttpRequest::json(&json!({
            "account": ACCOUNT,
            "padding": "x".repeat(100),
        }));

        let err = RequestValidator::new(&cfg).check(http).unwrap_err();

        assert!(matches!(err, ValidationError::BodyTooLarge { max: 100, .. }));
    }

    #[test]
    fn size_is_measured_on_compact_json() {
        let body = json!({ "account": ACCOUNT });
        let compact = body.to_string();
        let mut cfg = ConfigModel::test_default();
        cfg.request.max_body_chars = compact.len();

        let spaced = serde_json::to_string_pretty(&body).unwrap();
        assert!(spaced.len() > compact.len());

        assert!(
            RequestValidator::new(&cfg)
                .validate(HttpRequest::new(spaced))
                .is_some()
        );
    }

    #[test]
    fn size_counts_characters_not_utf8_bytes() {
        let note = "\u{e9}".repeat(9_000);
        let http = HttpRequest::json(&json!({ "account": ACCOUNT, "note": note }));
        assert!(http.body.len() > DEFAULT_MAX_BODY_CHARS);

        assert!(validator().validate(http).is_some());

        let note = "\u{e9}".repeat(16_000);
        let http = HttpRequest::json(&json!({ "account": ACCOUNT, "note": note }));

        assert!(matches!(
            validator().check(http),
            Err(ValidationError::BodyTooLarge { max: 16_000, .. })
        ));
    }

    #[test]
    fn astral_characters_count_as_two_units() {
        let body = json!({ "account": ACCOUNT, "note": "\u{1f600}" });
        let mut cfg = ConfigModel::test_default();
        cfg.request.max_body_chars = body.to_string().chars().count();

        assert!(matches!(
            RequestValidator::new(&cfg).check(HttpRequest::json(&body)),
            Err(ValidationError::BodyTooLarge { .. })
        ));
    }

    #[test]
    fn oversized_raw_body_is_refused_before_parsing() {
        let mut cfg = ConfigModel::test_default();
        cfg.request.max_body_chars = 10;
        let garbage = "x".repeat(10 * RAW_BODY_FACTOR + 1);

        let err = RequestValidator::new(&cfg)
            .check(HttpRequest::new(garbage))
            .unwrap_err();

        assert!(matches!(
            err,
            ValidationError::RawBodyTooLarge { size: 81, max: 80 }
        ));
    }
}
