use crate::{
    Error, ThisError,
    dto::{error::ErrorCode, http::StatusCode, quota::QuotaStatus},
    types::QuotaRequest,
    workflow::session::Session,
};
use async_trait::async_trait;

///
/// QuotaOutcome
///

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct QuotaOutcome {
    pub status: QuotaStatus,
    pub warnings: Vec<String>,
}

///
/// HandlerError
///
/// Failure reported by downstream quota handling; becomes a failure
/// envelope with `code` at `status`.
///

#[derive(Debug, Eq, PartialEq, ThisError)]
#[error("{code} ({status}): {message}")]
pub struct HandlerError {
    pub code: ErrorCode,
    pub status: StatusCode,
    pub message: String,
}

impl HandlerError {
    pub fn new(code: ErrorCode, status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            code,
            status,
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::Internal,
            StatusCode::INTERNAL_SERVER_ERROR,
            message,
        )
    }
}

impl From<Error> for HandlerError {
    fn from(err: Error) -> Self {
        let code = err.code();

        Self::new(code, code.status(), err.to_string())
    }
}

///
/// QuotaHandler
///
/// Downstream quota computation (e.g. combining signer responses). It only
/// borrows the session, so answering the call stays with the workflow.
///

#[async_trait]
pub trait QuotaHandler: Send + Sync {
    async fn quota_status(
        &self,
        session: &Session<QuotaRequest>,
    ) -> Result<QuotaOutcome, HandlerError>;
}

///
/// TESTS
///
