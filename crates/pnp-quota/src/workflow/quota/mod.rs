//! Quota status endpoint.
//!
//! [`QuotaIo`] owns the request gates and the response envelopes;
//! [`QuotaWorkflow`] runs one call end to end so that every path answers
//! with exactly one envelope.

mod handler;
mod io;

pub use handler::*;
pub use io::*;

use crate::{
    dto::{error::ErrorCode, http::HttpRequest, http::StatusCode},
    log,
    log::Topic,
    ops::send::Response,
    workflow::EndpointIo,
};
use futures::FutureExt;
use std::{any::Any, panic::AssertUnwindSafe};

///
/// QuotaWorkflow
///

pub struct QuotaWorkflow;

impl QuotaWorkflow {
    /// Handle one inbound call. Returns the status written once a session
    /// exists; `None` when one of the gates already answered the call.
    pub async fn handle(
        io: &QuotaIo,
        handler: &dyn QuotaHandler,
        request: HttpRequest,
        response: Response,
    ) -> Option<StatusCode> {
        let mut session = io.init(request, response).await?;

        let outcome = AssertUnwindSafe(handler.quota_status(&session))
            .catch_unwind()
            .await
            .unwrap_or_else(|panic| {
                let message = panic_message(panic.as_ref());
                log!(
                    session.logger(),
                    Topic::Handler,
                    Error,
                    "quota handler panicked: {message}"
                );
                Err(HandlerError::internal(message))
            });

        let response = session.response_mut();
        let sent = match outcome {
            Ok(QuotaOutcome { status, warnings }) => {
                io.send_success(StatusCode::OK, response, status, warnings)
            }
            Err(err) => {
                log!(
                    response.logger(),
                    Topic::Handler,
                    Warn,
                    "quota handler failed: {err}"
                );
                io.send_failure(err.code, err.status, response)
            }
        };

        // a failed write still counts as answered; SendOps logged it
        if let Err(err) = sent {
            log!(
                response.logger(),
                Topic::Response,
                Debug,
                "handler result not delivered: {err}"
            );
        }

        response.sent_status()
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        ErrorCode::Internal.to_string()
    }
}
