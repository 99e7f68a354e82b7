//! Caller authentication for quota requests.
//!
//! The policy is data: [`AuthPolicy::Disabled`] lets every validated request
//! through, [`AuthPolicy::Ledger`] asks the ledger whether the caller owns
//! the claimed account. Ledger attempts are bounded by a per-attempt timeout
//! and retried a fixed number of times; when every attempt fails the
//! configured fail-open flag decides the outcome.

use crate::{
    ThisError,
    config::schema::{AuthConfig, ConfigSchemaError, LedgerCheckConfig, Validate},
    log,
    log::{CallLogger, Topic},
    types::{Address, QuotaRequest},
};
use async_trait::async_trait;
use std::sync::Arc;
use tokio::time::{sleep, timeout};

///
/// AuthError
///

#[derive(Debug, ThisError)]
pub enum AuthError {
    #[error("request has no authorization header")]
    MissingAuthorization,

    #[error("account '{0}' is not authorized by the ledger")]
    NotAuthorized(Address),

    #[error("ledger check failed after {attempts} attempt(s): {reason}")]
    LedgerUnavailable { attempts: u32, reason: String },
}

///
/// LedgerError
///

#[derive(Debug, ThisError)]
pub enum LedgerError {
    #[error("ledger unreachable: {0}")]
    Unreachable(String),

    #[error("ledger returned an invalid response: {0}")]
    InvalidResponse(String),
}

///
/// LedgerClient
///
/// Ledger-backed ownership check. Shared across calls, so implementations
/// must be safe for concurrent use.
///

#[async_trait]
pub trait LedgerClient: Send + Sync {
    /// `Ok(true)` when the request's signature is valid for its account.
    async fn is_authorized(&self, request: &QuotaRequest) -> Result<bool, LedgerError>;
}

///
/// AuthPolicy
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum AuthPolicy {
    Disabled,
    Ledger(LedgerCheckConfig),
}

impl AuthPolicy {
    pub fn from_config(cfg: &AuthConfig) -> Result<Self, ConfigSchemaError> {
        cfg.validate()?;

        match (&cfg.ledger, cfg.enabled) {
            (Some(ledger), true) => Ok(Self::Ledger(ledger.clone())),
            _ => Ok(Self::Disabled),
        }
    }
}

///
/// Authenticator
///

#[derive(Clone)]
pub struct Authenticator {
    policy: AuthPolicy,
    ledger: Arc<dyn LedgerClient>,
}

impl Authenticator {
    pub fn new(policy: AuthPolicy, ledger: Arc<dyn LedgerClient>) -> Self {
        Self { policy, ledger }
    }

    #[must_use]
    pub const fn policy(&self) -> &AuthPolicy {
        &self.policy
    }

    /// Whether the caller may query quota for the claimed account.
    pub async fn authenticate(&self, request: &QuotaRequest, logger: &CallLogger) -> bool {
        match self.check(request, logger).await {
            Ok(()) => true,
            Err(err) => {
                log!(
                    logger,
                    Topic::Auth,
                    Warn,
                    "authentication failed account={}: {err}",
                    request.account()
                );
                false
            }
        }
    }

    /// Same as [`Self::authenticate`], reporting why a caller was denied.
    pub async fn check(
        &self,
        request: &QuotaRequest,
        logger: &CallLogger,
    ) -> Result<(), AuthError> {
        let cfg = match &self.policy {
            AuthPolicy::Disabled => {
                log!(
                    logger,
                    Topic::Auth,
                    Debug,
                    "authentication disabled, allowing account={}",
                    request.account()
                );
                return Ok(());
            }
            AuthPolicy::Ledger(cfg) => cfg,
        };

        if request.authorization().is_none() {
            return Err(AuthError::MissingAuthorization);
        }

        match self.query_ledger(request, cfg, logger).await {
            Ok(true) => Ok(()),
            Ok(false) => Err(AuthError::NotAuthorized(request.account())),
            Err(err) if cfg.fail_open => {
                log!(logger, Topic::Auth, Warn, "failing open: {err}");
                Ok(())
            }
            Err(err) => {
                log!(logger, Topic::Auth, Error, "failing closed: {err}");
                Err(err)
            }
        }
    }

    // Definitive answers return immediately; only errors and timeouts are
    // retried.
    async fn query_ledger(
        &self,
        request: &QuotaRequest,
        cfg: &LedgerCheckConfig,
        logger: &CallLogger,
    ) -> Result<bool, AuthError> {
        let mut reason = String::new();

        for attempt in 1..=cfg.retry_count {
            match timeout(cfg.timeout(), self.ledger.is_authorized(request)).await {
                Ok(Ok(authorized)) => return Ok(authorized),
                Ok(Err(err)) => reason = err.to_string(),
                Err(_) => reason = format!("timed out after {}ms", cfg.timeout_ms),
            }

            log!(
                logger,
                Topic::Auth,
                Debug,
                "ledger attempt {attempt}/{} failed: {reason}",
                cfg.retry_count
            );

            if attempt < cfg.retry_count {
                sleep(cfg.retry_delay()).await;
            }
        }

        Err(AuthError::LedgerUnavailable {
            attempts: cfg.retry_count,
            reason,
        })
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
        test::{MemorySink, StubLedger, StubReply, validated_request},
    };
    use std::time::Duration;
    use tokio::time::Instant;

    fn ledger_cfg(fail_open: bool) -> LedgerCheckConfig {
        LedgerCheckConfig {
            fail_open,
            timeout_ms: 1_000,
            retry_count: 3,
            retry_delay_ms: 200,
        }
    }

    fn setup(
        policy: AuthPolicy,
        replies: Vec<StubReply>,
    ) -> (Authenticator, Arc<StubLedger>, Arc<MemorySink>, CallLogger) {
        let ledger = Arc::new(StubLedger::new(replies));
        let sink = Arc::new(MemorySink::default());
        let logger = CallLogger::new(sink.clone(), "auth-test");

        (Authenticator::new(policy, ledger.clone()), ledger, sink, logger)
    }

    #[tokio::test]
    async fn disabled_policy_allows_without_ledger_call() {
        let (auth, ledger, _, logger) = setup(AuthPolicy::Disabled, vec![]);

        assert!(auth.authenticate(&validated_request(true), &logger).await);
        assert_eq!(ledger.calls(), 0);
    }

    #[tokio::test]
    async fn missing_authorization_header_is_denied_without_ledger_call() {
        let (auth, ledger, _, logger) =
            setup(AuthPolicy::Ledger(ledger_cfg(true)), vec![StubReply::Allow]);

        let res = auth.check(&validated_request(false), &logger).await;

        assert!(matches!(res, Err(AuthError::MissingAuthorization)));
        assert_eq!(ledger.calls(), 0);
    }

    #[tokio::test]
    async fn definitive_denial_is_not_retried() {
        let (auth, ledger, _, logger) =
            setup(AuthPolicy::Ledger(ledger_cfg(true)), vec![StubReply::Deny]);

        let res = auth.check(&validated_request(true), &logger).await;

        assert!(matches!(res, Err(AuthError::NotAuthorized(_))));
        assert_eq!(ledger.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn errors_are_retried_with_delay_until_success() {
        let (auth, ledger, _, logger) = setup(
            AuthPolicy::Ledger(ledger_cfg(false)),
            vec![StubReply::Fail, StubReply::Fail, StubReply::Allow],
        );
        let start = Instant::now();

        assert!(auth.authenticate(&validated_request(true), &logger).await);
        assert_eq!(ledger.calls(), 3);
        assert_eq!(start.elapsed(), Duration::from_millis(400));
    }

    #[tokio::test(start_paused = true)]
    async fn exhausted_attempts_fail_closed() {
        let (auth, ledger, sink, logger) =
            setup(AuthPolicy::Ledger(ledger_cfg(false)), vec![StubReply::Fail]);

        let res = auth.check(&validated_request(true), &logger).await;

        assert!(matches!(
            res,
            Err(AuthError::LedgerUnavailable { attempts: 3, .. })
        ));
        assert_eq!(ledger.calls(), 3);
        assert!(
            sink.entries()
                .iter()
                .any(|e| e.level == Level::Error && e.message.starts_with("failing closed"))
        );
    }

    #[tokio::test(start_paused = true)]
    async fn timeouts_count_as_failed_attempts_and_fail_open() {
        let (auth, ledger, sink, logger) =
            setup(AuthPolicy::Ledger(ledger_cfg(true)), vec![StubReply::Hang]);
        let start = Instant::now();

        assert!(auth.authenticate(&validated_request(true), &logger).await);
        assert_eq!(ledger.calls(), 3);
        // three timeouts plus two delays
        assert_eq!(start.elapsed(), Duration::from_millis(3_400));
        assert!(
            sink.entries()
                .iter()
                .any(|e| e.level == Level::Warn && e.message.starts_with("failing open"))
        );
    }

    #[test]
    fn policy_follows_enabled_flag() {
        let mut cfg = AuthConfig {
            enabled: false,
            ledger: Some(ledger_cfg(true)),
        };
        assert_eq!(AuthPolicy::from_config(&cfg).unwrap(), AuthPolicy::Disabled);

        cfg.enabled = true;
        assert_eq!(
            AuthPolicy::from_config(&cfg).unwrap(),
            AuthPolicy::Ledger(ledger_cfg(true))
        );

        cfg.ledger = None;
        assert!(AuthPolicy::from_config(&cfg).is_err());
    }
}
