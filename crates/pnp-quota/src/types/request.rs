use crate::{
    dto::{http::HttpRequest, quota::QuotaRequestBody},
    types::Address,
};

/// Header carrying the caller's signature over the request body.
pub const AUTHORIZATION_HEADER: &str = "authorization";

///
/// QuotaRequest
///
/// An inbound request that has passed validation. Holds the original
/// [`HttpRequest`] untouched alongside its parsed body and account, so once
/// one exists the body is known to satisfy the schema and size limit.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct QuotaRequest {
    http: HttpRequest,
    body: QuotaRequestBody,
    account: Address,
}

impl QuotaRequest {
    pub(crate) const fn new(http: HttpRequest, body: QuotaRequestBody, account: Address) -> Self {
        Self {
            http,
            body,
            account,
        }
    }

    #[must_use]
    pub const fn http(&self) -> &HttpRequest {
        &self.http
    }

    #[must_use]
    pub const fn body(&self) -> &QuotaRequestBody {
        &self.body
    }

    #[must_use]
    pub const fn account(&self) -> Address {
        self.account
    }

    #[must_use]
    pub fn authorization(&self) -> Option<&str> {
        self.http.headers.get(AUTHORIZATION_HEADER)
    }

    #[must_use]
    pub fn into_http(self) -> HttpRequest {
        self.http
    }
}
