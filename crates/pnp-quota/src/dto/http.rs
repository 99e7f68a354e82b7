use crate::dto::prelude::*;
use std::collections::BTreeMap;

///
/// StatusCode
///

#[derive(Clone, Copy, Debug, Deserialize, Display, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub struct StatusCode(pub u16);

impl StatusCode {
    pub const OK: Self = Self(200);
    pub const BAD_REQUEST: Self = Self(400);
    pub const UNAUTHORIZED: Self = Self(401);
    pub const INTERNAL_SERVER_ERROR: Self = Self(500);
    pub const SERVICE_UNAVAILABLE: Self = Self(503);

    #[must_use]
    pub const fn is_success(self) -> bool {
        self.0 >= 200 && self.0 < 300
    }
}

///
/// HttpHeaders
/// Header map with case-insensitive names (stored lower case).
///

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct HttpHeaders(BTreeMap<String, String>);

impl HttpHeaders {
    pub fn insert(&mut self, name: &str, value: impl Into<String>) {
        self.0.insert(name.to_ascii_lowercase(), value.into());
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(&name.to_ascii_lowercase()).map(String::as_str)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }
}

///
/// HttpRequest
///
/// Transport-neutral inbound request: headers plus the raw body bytes.
///

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct HttpRequest {
    pub headers: HttpHeaders,
    pub body: Vec<u8>,
}

impl HttpRequest {
    pub fn new(body: impl Into<Vec<u8>>) -> Self {
        Self {
            headers: HttpHeaders::default(),
            body: body.into(),
        }
    }

    /// Request whose body is the JSON encoding of `value`.
    #[must_use]
    pub fn json(value: &serde_json::Value) -> Self {
        Self::new(value.to_string())
    }

    #[must_use]
    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.insert(name, value);
        self
    }
}

///
/// TESTS
///
