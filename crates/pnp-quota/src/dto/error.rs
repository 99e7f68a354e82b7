use crate::dto::{http::StatusCode, prelude::*};

///
/// ErrorCode
///
/// Value carried in the `error` field of a failure envelope.
///

#[derive(Clone, Copy, Debug, Deserialize, Display, Eq, Hash, PartialEq, Serialize)]
#[non_exhaustive]
#[remain::sorted]
pub enum ErrorCode {
    #[display("api unavailable")]
    #[serde(rename = "api unavailable")]
    ApiUnavailable,

    #[display("internal error")]
    #[serde(rename = "internal error")]
    Internal,

    #[display("invalid input")]
    #[serde(rename = "invalid input")]
    InvalidInput,

    #[display("unauthenticated user")]
    #[serde(rename = "unauthenticated user")]
    UnauthenticatedUser,
}

impl ErrorCode {
    /// Status used when the code is emitted by the request gates.
    #[must_use]
    pub const fn status(self) -> StatusCode {
        match self {
            Self::ApiUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            Self::Internal => StatusCode::INTERNAL_SERVER_ERROR,
            Self::InvalidInput => StatusCode::BAD_REQUEST,
            Self::UnauthenticatedUser => StatusCode::UNAUTHORIZED,
        }
    }
}

///
/// TESTS
///
