//! Response sink and the shared send primitive.
//!
//! A [`Response`] wraps the transport for one call together with the
//! per-call logger. [`SendOps::send`] is the only way a body leaves the
//! endpoint: it serializes, writes, records that the call has been answered
//! and logs the outcome. A response can be sent at most once.

use crate::{
    ThisError,
    dto::http::StatusCode,
    log,
    log::{CallLogger, Topic},
};
use serde::Serialize;
use std::fmt;

pub const CONTENT_TYPE_JSON: &str = "application/json";

///
/// TransportError
///

#[derive(Debug, ThisError)]
#[error("transport error: {0}")]
pub struct TransportError(pub String);

///
/// Transport
///
/// Outbound half of the HTTP layer for a single call.
///

pub trait Transport: Send + Sync {
    fn write(
        &mut self,
        status: StatusCode,
        content_type: &str,
        body: Vec<u8>,
    ) -> Result<(), TransportError>;
}

///
/// SendError
///

#[derive(Debug, ThisError)]
pub enum SendError {
    #[error("response already sent with status {0}")]
    AlreadySent(StatusCode),

    #[error("cannot serialize response body: {0}")]
    Serialize(String),

    #[error(transparent)]
    Transport(#[from] TransportError),
}

///
/// Response
///

pub struct Response {
    transport: Box<dyn Transport>,
    logger: CallLogger,
    sent: Option<StatusCode>,
}

impl Response {
    pub fn new(transport: Box<dyn Transport>, logger: CallLogger) -> Self {
        Self {
            transport,
            logger,
            sent: None,
        }
    }

    #[must_use]
    pub const fn logger(&self) -> &CallLogger {
        &self.logger
    }

    /// Status of the body already sent, if any.
    #[must_use]
    pub const fn sent_status(&self) -> Option<StatusCode> {
        self.sent
    }

    #[must_use]
    pub const fn is_sent(&self) -> bool {
        self.sent.is_some()
    }
}

impl fmt::Debug for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Response")
            .field("logger", &self.logger)
            .field("sent", &self.sent)
            .finish_non_exhaustive()
    }
}

///
/// SendOps
///

pub struct SendOps;

impl SendOps {
    pub fn send<T: Serialize>(
        response: &mut Response,
        body: &T,
        status: StatusCode,
    ) -> Result<(), SendError> {
        if let Some(prev) = response.sent {
            log!(
                response.logger,
                Topic::Response,
                Error,
                "refusing to send status={status}: already sent status={prev}"
            );
            return Err(SendError::AlreadySent(prev));
        }

        let bytes = serde_json::to_vec(body).map_err(|e| {
            log!(
                response.logger,
                Topic::Response,
                Error,
                "cannot serialize response: {e}"
            );
            SendError::Serialize(e.to_string())
        })?;
        let len = bytes.len();

        // the call counts as answered once writing starts
        response.sent = Some(status);

        if let Err(err) = response.transport.write(status, CONTENT_TYPE_JSON, bytes) {
            log!(
                response.logger,
                Topic::Response,
                Error,
                "response write failed status={status}: {err}"
            );
            return Err(err.into());
        }

        if status.is_success() {
            log!(
                response.logger,
                Topic::Response,
                Ok,
                "response sent status={status} bytes={len}"
            );
        } else {
            log!(
                response.logger,
                Topic::Response,
                Warn,
                "response sent status={status} bytes={len}"
            );
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
    use crate::{
        log::Level,
        test::{FailingTransport, MemorySink, RecordingTransport},
    };
    use serde_json::{Value, json};
    use std::sync::Arc;

    fn response(transport: Box<dyn Transport>) -> (Response, Arc<MemorySink>) {
        let sink = Arc::new(MemorySink::default());

        (Response::new(transport, CallLogger::new(sink.clone(), "send-test")), sink)
    }

    #[test]
    fn writes_json_and_logs_outcome() {
        let transport = RecordingTransport::default();
        let (mut resp, sink) = response(Box::new(transport.clone()));

        SendOps::send(&mut resp, &json!({ "ok": 1 }), StatusCode::OK).unwrap();

        let written = transport.written();
        assert_eq!(written.len(), 1);
        assert_eq!(written[0].status, StatusCode::OK);
        assert_eq!(written[0].content_type, CONTENT_TYPE_JSON);
        assert_eq!(
            serde_json::from_slice::<Value>(&written[0].body).unwrap(),
            json!({ "ok": 1 })
        );
        assert_eq!(resp.sent_status(), Some(StatusCode::OK));
        assert_eq!(sink.entries()[0].level, Level::Ok);
    }

    #[test]
    fn second_send_is_refused() {
        let transport = RecordingTransport::default();
        let (mut resp, sink) = response(Box::new(transport.clone()));

        SendOps::send(&mut resp, &json!({}), StatusCode::UNAUTHORIZED).unwrap();
        let err = SendOps::send(&mut resp, &json!({}), StatusCode::OK).unwrap_err();

        assert!(matches!(err, SendError::AlreadySent(StatusCode(401))));
        assert_eq!(transport.written().len(), 1);
        assert!(sink.entries().iter().any(|e| e.level == Level::Error));
    }

    #[test]
    fn transport_failure_still_marks_the_call_answered() {
        let (mut resp, _) = response(Box::new(FailingTransport));

        let err = SendOps::send(&mut resp, &json!({}), StatusCode::OK).unwrap_err();

        assert!(matches!(err, SendError::Transport(_)));
        assert!(resp.is_sent());
    }
}
