// crates/hive-authz/src/session.rs
// ============================================================================
// Module: Authorization Session
// Description: Per-request session with memoized statements and decisions.
// Purpose: Answer authorization checks with at-most-once evaluation per key.
// Dependencies: hive-authz-core, serde_jcs, tokio, async-trait
// ============================================================================

//! ## Overview
//! A [`Session`] wraps a [`SessionBackend`] that knows how to load the
//! caller's policy statements. Each check is keyed by the canonical JSON of
//! `{action, organizationId, params}`; the cache stores a shared
//! [`OnceCell`] per key so concurrent identical checks await one evaluation.
//! Statements are memoized per organization the same way.
//!
//! Invariants:
//! - Cache mutexes are never held across an `.await`.
//! - Outcomes are memoized whether they succeed or fail, until [`Session::reset`].

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::PoisonError;

use async_trait::async_trait;
use hive_authz_core::Action;
use hive_authz_core::ActionParams;
use hive_authz_core::ActionRegistry;
use hive_authz_core::Decision;
use hive_authz_core::PolicyStatement;
use hive_authz_core::evaluate_statements;
use serde::Deserialize;
use serde::Serialize;
use tokio::sync::OnceCell;

use crate::audit::AuthzAuditSink;
use crate::audit::AuthzCacheResetEvent;
use crate::audit::AuthzDecisionEvent;
use crate::audit::AuthzDecisionEventParams;
use crate::audit::AuthzNoopAuditSink;
use crate::error::AccessError;
use crate::error::AuthzError;

// ============================================================================
// SECTION: Identity Types
// ============================================================================

/// Authenticated user behind a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Viewer {
    /// User identifier.
    pub id: String,
    /// Primary email address.
    pub email: String,
    /// Display name.
    pub display_name: String,
}

/// Resource selector bound to a legacy target access token.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacySelector {
    /// Raw token presented by the caller.
    pub token: String,
    /// Organization owning the token.
    pub organization_id: String,
    /// Project owning the token.
    pub project_id: String,
    /// Target the token is bound to.
    pub target_id: String,
}

impl std::fmt::Debug for LegacySelector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LegacySelector")
            .field("token", &"<redacted>")
            .field("organization_id", &self.organization_id)
            .field("project_id", &self.project_id)
            .field("target_id", &self.target_id)
            .finish()
    }
}

// ============================================================================
// SECTION: Backend Contract
// ============================================================================

/// Credential-specific part of a session.
#[async_trait]
pub trait SessionBackend: Send + Sync {
    /// Stable label for audit records.
    fn kind(&self) -> &'static str;

    /// Loads the statements that apply to this caller for an organization.
    ///
    /// # Errors
    ///
    /// Returns [`AuthzError::StatementLoad`] when storage fails.
    async fn load_policy_statements_for_organization(
        &self,
        organization_id: &str,
    ) -> Result<Vec<PolicyStatement>, AuthzError>;

    /// Resolves the user behind the session.
    ///
    /// # Errors
    ///
    /// Returns an `UNAUTHENTICATED` [`AccessError`] unless overridden.
    async fn viewer(&self) -> Result<Viewer, AuthzError> {
        Err(AccessError::unauthenticated("Authorization token is missing").into())
    }

    /// Whether the session belongs to a user.
    fn is_viewer(&self) -> bool {
        false
    }

    /// Returns the selector bound to a legacy token.
    ///
    /// # Errors
    ///
    /// Returns [`AccessError`] unless overridden.
    fn legacy_selector(&self) -> Result<LegacySelector, AccessError> {
        Err(AccessError::unauthorised("Authorization header is missing"))
    }
}

/// Backend for requests no strategy recognized. Grants nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnauthenticatedBackend;

#[async_trait]
impl SessionBackend for UnauthenticatedBackend {
    fn kind(&self) -> &'static str {
        "unauthenticated"
    }

    async fn load_policy_statements_for_organization(
        &self,
        _organization_id: &str,
    ) -> Result<Vec<PolicyStatement>, AuthzError> {
        Ok(Vec::new())
    }
}

// ============================================================================
// SECTION: Session
// ============================================================================

/// Memoized outcome of one authorization check.
type DecisionCell = Arc<OnceCell<Result<Decision, AuthzError>>>;
/// Memoized statements of one organization.
type StatementCell = Arc<OnceCell<Result<Arc<[PolicyStatement]>, AuthzError>>>;

/// Canonical cache key of an authorization check.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DecisionKey<'a> {
    /// Requested action.
    action: Action,
    /// Requested organization.
    organization_id: &'a str,
    /// Resource parameters.
    params: &'a ActionParams,
}

/// Per-request authorization session.
pub struct Session {
    /// Credential-specific behavior.
    backend: Arc<dyn SessionBackend>,
    /// Action table used to build requested resource paths.
    registry: Arc<ActionRegistry>,
    /// Decision audit sink.
    audit: Arc<dyn AuthzAuditSink>,
    /// Statements keyed by organization id.
    statements: Mutex<HashMap<String, StatementCell>>,
    /// Decisions keyed by canonical request JSON.
    decisions: Mutex<HashMap<String, DecisionCell>>,
}

impl Session {
    /// Creates a session without audit output.
    #[must_use]
    pub fn new(backend: Arc<dyn SessionBackend>, registry: Arc<ActionRegistry>) -> Self {
        Self {
            backend,
            registry,
            audit: Arc::new(AuthzNoopAuditSink),
            statements: Mutex::new(HashMap::new()),
            decisions: Mutex::new(HashMap::new()),
        }
    }

    /// Creates a session that grants nothing.
    #[must_use]
    pub fn unauthenticated(registry: Arc<ActionRegistry>) -> Self {
        Self::new(Arc::new(UnauthenticatedBackend), registry)
    }

    /// Returns a copy with the audit sink set.
    #[must_use]
    pub fn with_audit_sink(mut self, audit: Arc<dyn AuthzAuditSink>) -> Self {
        self.audit = audit;
        self
    }

    /// Returns the backend label.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        self.backend.kind()
    }

    /// Succeeds when the session may perform `action` on the resource.
    ///
    /// # Errors
    ///
    /// Returns [`AuthzError::Access`] when denied, and any other variant
    /// when the decision could not be made.
    pub async fn assert_perform_action(
        &self,
        action: Action,
        organization_id: &str,
        params: &ActionParams,
    ) -> Result<(), AuthzError> {
        match self.decide(action, organization_id, params).await? {
            Decision::Allow => Ok(()),
            Decision::Deny(_) => Err(AccessError::missing_permission(action).into()),
        }
    }

    /// Returns whether the session may perform `action` on the resource.
    ///
    /// # Errors
    ///
    /// Propagates every [`AuthzError`] except [`AuthzError::Access`].
    pub async fn can_perform_action(
        &self,
        action: Action,
        organization_id: &str,
        params: &ActionParams,
    ) -> Result<bool, AuthzError> {
        match self.assert_perform_action(action, organization_id, params).await {
            Ok(()) => Ok(true),
            Err(AuthzError::Access(_)) => Ok(false),
            Err(err) => Err(err),
        }
    }

    /// Resolves the user behind the session.
    ///
    /// # Errors
    ///
    /// Returns [`AuthzError::Access`] for sessions without a user.
    pub async fn viewer(&self) -> Result<Viewer, AuthzError> {
        self.backend.viewer().await
    }

    /// Whether the session belongs to a user.
    #[must_use]
    pub fn is_viewer(&self) -> bool {
        self.backend.is_viewer()
    }

    /// Returns the selector bound to a legacy token.
    ///
    /// # Errors
    ///
    /// Returns [`AccessError`] for sessions without a legacy token.
    pub fn legacy_selector(&self) -> Result<LegacySelector, AccessError> {
        self.backend.legacy_selector()
    }

    /// Clears memoized statements and decisions.
    ///
    /// Must not race with in-flight checks on the same session.
    pub fn reset(&self) {
        let decisions_cleared = {
            let mut decisions = self.decisions.lock().unwrap_or_else(PoisonError::into_inner);
            let cleared = decisions.len();
            decisions.clear();
            cleared
        };
        let statements_cleared = {
            let mut statements = self.statements.lock().unwrap_or_else(PoisonError::into_inner);
            let cleared = statements.len();
            statements.clear();
            cleared
        };
        self.audit.record_reset(&AuthzCacheResetEvent::new(
            self.kind(),
            decisions_cleared,
            statements_cleared,
        ));
    }

    /// Returns the memoized decision, evaluating it on first use.
    async fn decide(
        &self,
        action: Action,
        organization_id: &str,
        params: &ActionParams,
    ) -> Result<Decision, AuthzError> {
        let key = serde_jcs::to_string(&DecisionKey {
            action,
            organization_id,
            params,
        })
        .map_err(|err| AuthzError::InvalidParams(err.to_string()))?;
        let cell = {
            let mut decisions = self
                .decisions
                .lock()
                .map_err(|_| AuthzError::Internal("decision cache lock poisoned".to_string()))?;
            Arc::clone(decisions.entry(key).or_default())
        };
        let mut evaluated = false;
        let outcome = cell
            .get_or_init(|| {
                evaluated = true;
                self.evaluate(action, organization_id, params)
            })
            .await
            .clone();
        self.record_decision(action, organization_id, &outcome, !evaluated);
        outcome
    }

    /// Evaluates one check against the organization's statements.
    async fn evaluate(
        &self,
        action: Action,
        organization_id: &str,
        params: &ActionParams,
    ) -> Result<Decision, AuthzError> {
        params.validate_identifiers(action.level())?;
        let statements = self.statements_for(organization_id).await?;
        let resource_paths = self.registry.resource_paths(action, params)?;
        Ok(evaluate_statements(
            &statements,
            action.as_str(),
            organization_id,
            resource_paths.as_slice(),
        )?)
    }

    /// Returns the memoized statements of an organization.
    async fn statements_for(
        &self,
        organization_id: &str,
    ) -> Result<Arc<[PolicyStatement]>, AuthzError> {
        let cell = {
            let mut statements = self
                .statements
                .lock()
                .map_err(|_| AuthzError::Internal("statement cache lock poisoned".to_string()))?;
            Arc::clone(statements.entry(organization_id.to_string()).or_default())
        };
        cell.get_or_init(|| async {
            self.backend
                .load_policy_statements_for_organization(organization_id)
                .await
                .map(Arc::<[PolicyStatement]>::from)
        })
        .await
        .clone()
    }

    /// Emits the decision audit event.
    fn record_decision(
        &self,
        action: Action,
        organization_id: &str,
        outcome: &Result<Decision, AuthzError>,
        cached: bool,
    ) {
        let (outcome, reason) = match outcome {
            Ok(Decision::Allow) => ("allow", None),
            Ok(Decision::Deny(reason)) => ("deny", Some(reason.as_str())),
            Err(err) => ("error", Some(err.kind())),
        };
        self.audit.record_decision(&AuthzDecisionEvent::new(AuthzDecisionEventParams {
            session_kind: self.kind(),
            action,
            organization_id: organization_id.to_string(),
            outcome,
            reason,
            cached,
        }));
    }
}
