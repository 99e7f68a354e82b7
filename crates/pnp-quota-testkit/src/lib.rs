//! Test utilities and fixtures for exercising the quota endpoint lifecycle.
//!
//! Provides deterministic dummy accounts, a recording transport, an
//! in-memory log sink, a scripted ledger client and canned quota handlers,
//! so integration tests can drive whole calls without a network.

use async_trait::async_trait;
use pnp_quota::{
    access::auth::{LedgerClient, LedgerError},
    config::{Config, ConfigModel},
    dto::{envelope::QuotaResponse, http::StatusCode, quota::QuotaStatus},
    log::{CallLogger, Level, LogEntry, LogSink},
    ops::send::{Response, Transport, TransportError},
    types::{ADDRESS_BYTES, Address, QuotaRequest},
    workflow::{
        quota::{HandlerError, QuotaHandler, QuotaOutcome},
        session::Session,
    },
};
use std::sync::{
    Arc, Mutex, MutexGuard, PoisonError,
    atomic::{AtomicUsize, Ordering},
};

/// Version string stamped by [`TestConfig`] configs.
pub const TEST_VERSION: &str = "test-combiner-1.0.0";

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

///
/// Deterministic dummy-value generator for tests.
///

pub struct Fake;

impl Fake {
    ///
    /// Deterministically derive an [`Address`] from `seed`.
    ///
    #[must_use]
    pub fn address(seed: u32) -> Address {
        let mut buf = [0u8; ADDRESS_BYTES];
        buf[..4].copy_from_slice(&seed.to_be_bytes());
        buf[ADDRESS_BYTES - 1] = 0xab;

        Address::from_bytes(buf)
    }

    /// Textual account for `seed`, upper-cased hex the way wallets often
    /// send it.
    #[must_use]
    pub fn account(seed: u32) -> String {
        let addr = Self::address(seed).to_string();

        format!("0x{}", addr[2..].to_uppercase())
    }
}

///
/// TestConfig
///

pub struct TestConfig;

impl TestConfig {
    const KEYS: &'static str = r#"
        [keys]
        current_version = 1

        [[keys.versions]]
        key_version = 1
        threshold = 3
        polynomial = "0001"
        pub_key = "0002"

        [[keys.versions]]
        key_version = 2
        threshold = 4
        polynomial = "0101"
        pub_key = "0102"
    "#;

    /// Config with authentication switched off.
    #[must_use]
    pub fn auth_disabled() -> Arc<ConfigModel> {
        Self::parse(&format!("version = \"{TEST_VERSION}\"\n{}", Self::KEYS))
    }

    /// Config with the ledger check switched on.
    #[must_use]
    pub fn ledger(
        fail_open: bool,
        timeout_ms: u64,
        retry_count: u32,
        retry_delay_ms: u64,
    ) -> Arc<ConfigModel> {
        Self::parse(&format!(
            r#"
            version = "{TEST_VERSION}"

            [auth]
            enabled = true

            [auth.ledger]
            fail_open = {fail_open}
            timeout_ms = {timeout_ms}
            retry_count = {retry_count}
            retry_delay_ms = {retry_delay_ms}
            {}
            "#,
            Self::KEYS
        ))
    }

    /// Parse a config, panicking on error; for fixtures only.
    #[must_use]
    pub fn parse(toml: &str) -> Arc<ConfigModel> {
        match Config::from_toml(toml) {
            Ok(cfg) => cfg,
            Err(err) => panic!("invalid test config: {err}"),
        }
    }
}

///
/// MemoryLogSink
///

#[derive(Default)]
pub struct MemoryLogSink(Mutex<Vec<LogEntry>>);

impl MemoryLogSink {
    #[must_use]
    pub fn entries(&self) -> Vec<LogEntry> {
        lock(&self.0).clone()
    }

    #[must_use]
    pub fn contains(&self, level: Level, needle: &str) -> bool {
        lock(&self.0)
            .iter()
            .any(|e| e.level == level && e.message.contains(needle))
    }
}

impl LogSink for MemoryLogSink {
    fn append(&self, entry: LogEntry) {
        lock(&self.0).push(entry);
    }
}

///
/// Written
///

#[derive(Clone, Debug)]
pub struct Written {
    pub status: StatusCode,
    pub content_type: String,
    pub body: Vec<u8>,
}

impl Written {
    #[must_use]
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_slice(&self.body).unwrap_or(serde_json::Value::Null)
    }

    /// Decode the body as an envelope, panicking if it is not one.
    #[must_use]
    pub fn envelope(&self) -> QuotaResponse {
        match serde_json::from_slice(&self.body) {
            Ok(env) => env,
            Err(err) => panic!("body is not a quota envelope: {err}"),
        }
    }
}

///
/// RecordingTransport
///

#[derive(Clone, Default)]
pub struct RecordingTransport(Arc<Mutex<Vec<Written>>>);

impl RecordingTransport {
    #[must_use]
    pub fn written(&self) -> Vec<Written> {
        lock(&self.0).clone()
    }

    /// The single response written for the call, panicking otherwise.
    #[must_use]
    pub fn only(&self) -> Written {
        let written = self.written();
        assert_eq!(written.len(), 1, "expected exactly one response");

        written[0].clone()
    }
}

impl Transport for RecordingTransport {
    fn write(
        &mut self,
        status: StatusCode,
        content_type: &str,
        body: Vec<u8>,
    ) -> Result<(), TransportError> {
        lock(&self.0).push(Written {
            status,
            content_type: content_type.to_string(),
            body,
        });

        Ok(())
    }
}

///
/// CallProbe
/// Observers for one call's response sink.
///

#[derive(Clone)]
pub struct CallProbe {
    pub transport: RecordingTransport,
    pub logs: Arc<MemoryLogSink>,
}

/// Fresh response sink for one call, plus its observers.
#[must_use]
pub fn response(context: &str) -> (Response, CallProbe) {
    let transport = RecordingTransport::default();
    let logs = Arc::new(MemoryLogSink::default());
    let logger = CallLogger::new(logs.clone(), context);

    (
        Response::new(Box::new(transport.clone()), logger),
        CallProbe { transport, logs },
    )
}

///
/// ScriptedLedger
/// Replays `replies` in order; the last reply repeats once exhausted.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum LedgerReply {
    Authorized,
    Unauthorized,
    Unreachable,
    Hang,
}

pub struct ScriptedLedger {
    replies: Vec<LedgerReply>,
    attempts: AtomicUsize,
}

impl ScriptedLedger {
    #[must_use]
    pub fn new(replies: impl Into<Vec<LedgerReply>>) -> Arc<Self> {
        Arc::new(Self {
            replies: replies.into(),
            attempts: AtomicUsize::new(0),
        })
    }

    #[must_use]
    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LedgerClient for ScriptedLedger {
    async fn is_authorized(&self, _: &QuotaRequest) -> Result<bool, LedgerError> {
        let n = self.attempts.fetch_add(1, Ordering::SeqCst);
        let reply = self
            .replies
            .get(n)
            .or_else(|| self.replies.last())
            .copied()
            .unwrap_or(LedgerReply::Unreachable);

        match reply {
            LedgerReply::Authorized => Ok(true),
            LedgerReply::Unauthorized => Ok(false),
            LedgerReply::Unreachable => Err(LedgerError::Unreachable("scripted".to_string())),
            LedgerReply::Hang => futures::future::pending().await,
        }
    }
}

///
/// CannedHandler
///

pub enum CannedHandler {
    Ok(QuotaOutcome),
    Err(HandlerError),
    Panic(&'static str),
}

impl CannedHandler {
    #[must_use]
    pub const fn quota(performed_query_count: u64, total_quota: u64) -> Self {
        Self::Ok(QuotaOutcome {
            status: QuotaStatus {
                performed_query_count,
                total_quota,
                block_number: None,
            },
            warnings: Vec::new(),
        })
    }
}

#[async_trait]
impl QuotaHandler for CannedHandler {
    async fn quota_status(
        &self,
        _: &Session<QuotaRequest>,
    ) -> Result<QuotaOutcome, HandlerError> {
        match self {
            Self::Ok(outcome) => Ok(outcome.clone()),
            Self::Err(err) => Err(HandlerError::new(err.code, err.status, err.message.clone())),
            Self::Panic(msg) => panic!("{msg}"),
        }
    }
}

///
/// TESTS
///
