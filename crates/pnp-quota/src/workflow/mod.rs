pub mod quota;
pub mod session;

use crate::{
    dto::http::HttpRequest, ids::CombinerEndpoint, ops::send::Response, workflow::session::Session,
};
use async_trait::async_trait;

///
/// EndpointIo
///
/// Shared request-lifecycle surface. Each endpoint implements it by composing
/// the access gates with its own schema and auth policy.
///

#[async_trait]
pub trait EndpointIo: Send + Sync {
    type Request: Send + Sync;

    fn endpoint(&self) -> CombinerEndpoint;

    /// Pure validation gate; narrows the raw request or rejects it.
    fn validate(&self, request: HttpRequest) -> Option<Self::Request>;

    /// Run every gate and build the per-call session. `None` means a failure
    /// response has already been written.
    async fn init(
        &self,
        request: HttpRequest,
        response: Response,
    ) -> Option<Session<Self::Request>>;
}
