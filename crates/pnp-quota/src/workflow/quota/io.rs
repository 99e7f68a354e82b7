use crate::{
    Error,
    access::{
        auth::{AuthPolicy, Authenticator, LedgerClient},
        validate::RequestValidator,
    },
    config::{ConfigError, ConfigModel},
    dto::{
        envelope::QuotaResponse, error::ErrorCode, http::HttpRequest, http::StatusCode,
        quota::QuotaStatus,
    },
    ids::{CombinerEndpoint, SignerEndpoint},
    log,
    log::{CallLogger, Topic},
    ops::{
        key_version::KeyVersionOps,
        send::{Response, SendError, SendOps},
    },
    types::{KeyVersionInfo, QuotaRequest},
    workflow::{EndpointIo, session::Session},
};
use async_trait::async_trait;
use std::sync::Arc;

///
/// QuotaIo
///
/// Request lifecycle of the quota status endpoint: input checks,
/// authentication, key-version resolution, session construction and the two
/// response envelopes.
///

#[derive(Clone)]
pub struct QuotaIo {
    config: Arc<ConfigModel>,
    validator: RequestValidator,
    authenticator: Authenticator,
}

impl QuotaIo {
    pub const ENDPOINT: CombinerEndpoint = CombinerEndpoint::PnpQuota;

    pub fn new(config: Arc<ConfigModel>, ledger: Arc<dyn LedgerClient>) -> Result<Self, Error> {
        let policy = AuthPolicy::from_config(&config.auth).map_err(ConfigError::from)?;

        Ok(Self {
            validator: RequestValidator::new(&config),
            authenticator: Authenticator::new(policy, ledger),
            config,
        })
    }

    #[must_use]
    pub const fn signer_endpoint(&self) -> SignerEndpoint {
        Self::ENDPOINT.signer_endpoint()
    }

    #[must_use]
    pub fn config(&self) -> &ConfigModel {
        &self.config
    }

    // -------------------------------------------------------------------------
    // Gates
    // -------------------------------------------------------------------------

    /// Service-level gate followed by request validation. Writes the failure
    /// response itself when the request is turned away.
    pub fn input_checks(
        &self,
        request: HttpRequest,
        response: &mut Response,
    ) -> Option<QuotaRequest> {
        if !self.config.api_enabled {
            self.reject(ErrorCode::ApiUnavailable, response);
            return None;
        }

        match self.validator.check(request) {
            Ok(request) => Some(request),
            Err(err) => {
                log!(
                    response.logger(),
                    Topic::Validation,
                    Warn,
                    "rejecting request to {}: {err}",
                    Self::ENDPOINT
                );
                self.reject(ErrorCode::InvalidInput, response);
                None
            }
        }
    }

    pub async fn authenticate(&self, request: &QuotaRequest, logger: &CallLogger) -> bool {
        self.authenticator.authenticate(request, logger).await
    }

    #[must_use]
    pub fn key_version_info(&self, request: &QuotaRequest, logger: &CallLogger) -> KeyVersionInfo {
        KeyVersionOps::resolve(request, &self.config.keys, logger)
    }

    // -------------------------------------------------------------------------
    // Responses
    // -------------------------------------------------------------------------

    pub fn send_success(
        &self,
        status: StatusCode,
        response: &mut Response,
        quota_status: QuotaStatus,
        warnings: Vec<String>,
    ) -> Result<(), SendError> {
        let body = QuotaResponse::success(self.config.version(), quota_status, warnings);

        SendOps::send(response, &body, status)
    }

    pub fn send_failure(
        &self,
        error: ErrorCode,
        status: StatusCode,
        response: &mut Response,
    ) -> Result<(), SendError> {
        let body = QuotaResponse::failure(self.config.version(), error);

        SendOps::send(response, &body, status)
    }

    // The call ends here whether or not the write succeeds; SendOps has
    // already logged the failure at Error.
    fn reject(&self, error: ErrorCode, response: &mut Response) {
        if let Err(err) = self.send_failure(error, error.status(), response) {
            log!(
                response.logger(),
                Topic::Response,
                Debug,
                "{error} rejection not delivered: {err}"
            );
        }
    }
}

#[async_trait]
impl EndpointIo for QuotaIo {
    type Request = QuotaRequest;

    fn endpoint(&self) -> CombinerEndpoint {
        Self::ENDPOINT
    }

    fn validate(&self, request: HttpRequest) -> Option<QuotaRequest> {
        self.validator.validate(request)
    }

    async fn init(
        &self,
        request: HttpRequest,
        mut response: Response,
    ) -> Option<Session<QuotaRequest>> {
        let request = self.input_checks(request, &mut response)?;

        if !self.authenticate(&request, response.logger()).await {
            self.reject(ErrorCode::UnauthenticatedUser, &mut response);
            return None;
        }

        let key_version_info = self.key_version_info(&request, response.logger());
        log!(
            response.logger(),
            Topic::Session,
            Debug,
            "session ready account={} key_version={}",
            request.account(),
            key_version_info.key_version
        );

        Some(Session::new(request, response, key_version_info))
    }
}

///
/// TESTS
///
