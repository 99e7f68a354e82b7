//! Response envelopes for the quota status endpoint.
//!
//! Every body written by the endpoint is one of two shapes, told apart by the
//! literal `success` flag:
//! - `{ success: true, version, ...QuotaStatus, warnings }`
//! - `{ success: false, version, error }`

use crate::dto::{error::ErrorCode, prelude::*, quota::QuotaStatus};
use serde::{Deserializer, Serializer, de};

///
/// Flag
///
/// Boolean literal field. Serializes as `B` and only deserializes from `B`,
/// which lets the untagged envelope pick its variant from `success` alone.
///

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Flag<const B: bool>;

impl<const B: bool> Serialize for Flag<B> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_bool(B)
    }
}

impl<'de, const B: bool> Deserialize<'de> for Flag<B> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = bool::deserialize(deserializer)?;
        if value == B {
            Ok(Self)
        } else {
            Err(de::Error::custom(format!("expected `{B}`, got `{value}`")))
        }
    }
}

///
/// QuotaResponseSuccess
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct QuotaResponseSuccess {
    pub success: Flag<true>,
    pub version: String,

    #[serde(flatten)]
    pub status: QuotaStatus,

    #[serde(default)]
    pub warnings: Vec<String>,
}

///
/// QuotaResponseFailure
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct QuotaResponseFailure {
    pub success: Flag<false>,
    pub version: String,
    pub error: ErrorCode,
}

///
/// QuotaResponse
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(untagged)]
pub enum QuotaResponse {
    Success(QuotaResponseSuccess),
    Failure(QuotaResponseFailure),
}

impl QuotaResponse {
    pub fn success(version: impl Into<String>, status: QuotaStatus, warnings: Vec<String>) -> Self {
        Self::Success(QuotaResponseSuccess {
            success: Flag,
            version: version.into(),
            status,
            warnings,
        })
    }

    pub fn failure(version: impl Into<String>, error: ErrorCode) -> Self {
        Self::Failure(QuotaResponseFailure {
            success: Flag,
            version: version.into(),
            error,
        })
    }

    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    #[must_use]
    pub fn version(&self) -> &str {
        match self {
            Self::Success(s) => &s.version,
            Self::Failure(f) => &f.version,
        }
    }
}

///
/// TESTS
///
