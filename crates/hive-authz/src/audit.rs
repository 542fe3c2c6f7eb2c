// crates/hive-authz/src/audit.rs
// ============================================================================
// Module: Authz Audit Logging
// Description: Structured audit events for authorization and authentication.
// Purpose: Emit JSON-line audit records without a logging framework dependency.
// Dependencies: hive-authz-config, hive-authz-core, serde
// ============================================================================

//! ## Overview
//! Audit events are serde-serialized structs written as JSON lines to a sink.
//! Events never carry credentials: tokens, private keys, and hashes stay out.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs::OpenOptions;
use std::io;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use std::sync::Mutex;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use hive_authz_config::AuditConfig;
use hive_authz_config::AuditSinkKind;
use hive_authz_core::Action;
use serde::Serialize;

// ============================================================================
// SECTION: Events
// ============================================================================

/// Authorization decision audit event.
#[derive(Debug, Clone, Serialize)]
pub struct AuthzDecisionEvent {
    /// Event identifier.
    pub event: &'static str,
    /// Event timestamp (milliseconds since epoch).
    pub timestamp_ms: u128,
    /// Session kind label.
    pub session_kind: &'static str,
    /// Requested action.
    pub action: Action,
    /// Requested organization.
    pub organization_id: String,
    /// `allow`, `deny`, or `error`.
    pub outcome: &'static str,
    /// Deny reason or error kind.
    pub reason: Option<&'static str>,
    /// Whether the outcome was served from the session cache.
    pub cached: bool,
}

/// Inputs required to construct a decision event.
pub struct AuthzDecisionEventParams {
    /// Session kind label.
    pub session_kind: &'static str,
    /// Requested action.
    pub action: Action,
    /// Requested organization.
    pub organization_id: String,
    /// Outcome label.
    pub outcome: &'static str,
    /// Deny reason or error kind.
    pub reason: Option<&'static str>,
    /// Whether the outcome was served from the session cache.
    pub cached: bool,
}

impl AuthzDecisionEvent {
    /// Builds a decision event stamped with the current time.
    #[must_use]
    pub fn new(params: AuthzDecisionEventParams) -> Self {
        Self {
            event: "authz_decision",
            timestamp_ms: now_ms(),
            session_kind: params.session_kind,
            action: params.action,
            organization_id: params.organization_id,
            outcome: params.outcome,
            reason: params.reason,
            cached: params.cached,
        }
    }
}

/// Session cache reset audit event.
#[derive(Debug, Clone, Serialize)]
pub struct AuthzCacheResetEvent {
    /// Event identifier.
    pub event: &'static str,
    /// Event timestamp (milliseconds since epoch).
    pub timestamp_ms: u128,
    /// Session kind label.
    pub session_kind: &'static str,
    /// Number of cleared decision entries.
    pub decisions_cleared: usize,
    /// Number of cleared statement entries.
    pub statements_cleared: usize,
}

impl AuthzCacheResetEvent {
    /// Builds a reset event stamped with the current time.
    #[must_use]
    pub fn new(
        session_kind: &'static str,
        decisions_cleared: usize,
        statements_cleared: usize,
    ) -> Self {
        Self {
            event: "authz_cache_reset",
            timestamp_ms: now_ms(),
            session_kind,
            decisions_cleared,
            statements_cleared,
        }
    }
}

/// Authentication chain audit event.
#[derive(Debug, Clone, Serialize)]
pub struct AuthnSessionEvent {
    /// Event identifier.
    pub event: &'static str,
    /// Event timestamp (milliseconds since epoch).
    pub timestamp_ms: u128,
    /// Request identifier when provided.
    pub request_id: Option<String>,
    /// `authenticated`, `unauthenticated`, or `rejected`.
    pub outcome: &'static str,
    /// Strategy that produced or rejected the session.
    pub strategy: Option<&'static str>,
    /// Rejection message.
    pub error: Option<String>,
}

impl AuthnSessionEvent {
    /// Event for a session produced by a strategy.
    #[must_use]
    pub fn authenticated(request_id: Option<String>, strategy: &'static str) -> Self {
        Self::build(request_id, "authenticated", Some(strategy), None)
    }

    /// Event for a request no strategy recognized.
    #[must_use]
    pub fn unauthenticated(request_id: Option<String>) -> Self {
        Self::build(request_id, "unauthenticated", None, None)
    }

    /// Event for a credential rejected by a strategy or the chain.
    #[must_use]
    pub fn rejected(
        request_id: Option<String>,
        strategy: Option<&'static str>,
        error: String,
    ) -> Self {
        Self::build(request_id, "rejected", strategy, Some(error))
    }

    /// Builds the event stamped with the current time.
    fn build(
        request_id: Option<String>,
        outcome: &'static str,
        strategy: Option<&'static str>,
        error: Option<String>,
    ) -> Self {
        Self {
            event: "authn_session",
            timestamp_ms: now_ms(),
            request_id,
            outcome,
            strategy,
            error,
        }
    }
}

// ============================================================================
// SECTION: Trait
// ============================================================================

/// Audit sink for authorization events.
pub trait AuthzAuditSink: Send + Sync {
    /// Records an authorization decision.
    fn record_decision(&self, event: &AuthzDecisionEvent);

    /// Records a session cache reset.
    fn record_reset(&self, _event: &AuthzCacheResetEvent) {}

    /// Records an authentication chain outcome.
    fn record_authn(&self, _event: &AuthnSessionEvent) {}
}

// ============================================================================
// SECTION: Sinks
// ============================================================================

/// Audit sink that writes JSON lines to stderr.
pub struct AuthzStderrAuditSink;

impl AuthzAuditSink for AuthzStderrAuditSink {
    fn record_decision(&self, event: &AuthzDecisionEvent) {
        write_stderr(event);
    }

    fn record_reset(&self, event: &AuthzCacheResetEvent) {
        write_stderr(event);
    }

    fn record_authn(&self, event: &AuthnSessionEvent) {
        write_stderr(event);
    }
}

/// Audit sink that appends JSON lines to a file.
pub struct AuthzFileAuditSink {
    /// Append-mode log file.
    file: Mutex<std::fs::File>,
}

impl AuthzFileAuditSink {
    /// Opens the audit log in append mode, creating it when missing.
    ///
    /// # Errors
    ///
    /// Returns [`io::Error`] when the file cannot be opened.
    pub fn new(path: &Path) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            file: Mutex::new(file),
        })
    }

    /// Appends one serialized event.
    fn append<T: Serialize>(&self, event: &T) {
        if let Ok(payload) = serde_json::to_string(event)
            && let Ok(mut file) = self.file.lock()
        {
            let _ = writeln!(file, "{payload}");
            let _ = file.flush();
        }
    }
}

impl AuthzAuditSink for AuthzFileAuditSink {
    fn record_decision(&self, event: &AuthzDecisionEvent) {
        self.append(event);
    }

    fn record_reset(&self, event: &AuthzCacheResetEvent) {
        self.append(event);
    }

    fn record_authn(&self, event: &AuthnSessionEvent) {
        self.append(event);
    }
}

/// Audit sink that discards events.
pub struct AuthzNoopAuditSink;

impl AuthzAuditSink for AuthzNoopAuditSink {
    fn record_decision(&self, _event: &AuthzDecisionEvent) {}
}

/// Builds the audit sink selected by configuration.
///
/// # Errors
///
/// Returns [`io::Error`] when the file sink cannot be opened.
pub fn audit_sink_from_config(config: &AuditConfig) -> io::Result<Arc<dyn AuthzAuditSink>> {
    match (config.sink, config.path.as_deref()) {
        (AuditSinkKind::File, Some(path)) => {
            Ok(Arc::new(AuthzFileAuditSink::new(Path::new(path.trim()))?))
        }
        (AuditSinkKind::File, None) => Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            "audit.path is required for the file sink",
        )),
        (AuditSinkKind::Stderr, _) => Ok(Arc::new(AuthzStderrAuditSink)),
        (AuditSinkKind::None, _) => Ok(Arc::new(AuthzNoopAuditSink)),
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Milliseconds since the Unix epoch.
fn now_ms() -> u128 {
    SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_millis()
}

/// Writes one serialized event to stderr.
fn write_stderr<T: Serialize>(event: &T) {
    if let Ok(payload) = serde_json::to_string(event) {
        let _ = writeln!(std::io::stderr(), "{payload}");
    }
}
