// crates/hive-authz/src/authn.rs
// ============================================================================
// Module: Authentication Chain
// Description: Ordered strategies that turn a request into a session.
// Purpose: Pick the first strategy that recognizes the caller's credential.
// Dependencies: hive-authz-config, hive-authz-core, async-trait
// ============================================================================

//! ## Overview
//! Each [`AuthnStrategy`] inspects the request and answers with a session
//! backend, `None` when the credential is not its format, or an error when
//! the credential is its format but invalid. The first backend wins; when
//! every strategy passes, the request gets an unauthenticated session.
//!
//! Security posture: a rejected credential never falls through to an
//! unauthenticated session.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;

use async_trait::async_trait;
use hive_authz_config::AuthnConfig;
use hive_authz_core::ActionRegistry;

use crate::access_token::OrganizationAccessTokenStore;
use crate::access_token::OrganizationAccessTokenStrategy;
use crate::audit::AuthnSessionEvent;
use crate::audit::AuthzAuditSink;
use crate::audit::AuthzNoopAuditSink;
use crate::error::AuthnError;
use crate::member::MemberSubjectStrategy;
use crate::member::MembershipStore;
use crate::session::Session;
use crate::session::SessionBackend;
use crate::target_token::TargetAccessTokenStore;
use crate::target_token::TargetAccessTokenStrategy;

// ============================================================================
// SECTION: Request Context
// ============================================================================

/// Credential material extracted from an inbound request.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    /// `Authorization` header value.
    pub authorization: Option<String>,
    /// User subject asserted by the upstream session layer.
    pub subject: Option<String>,
    /// Optional request identifier for auditing.
    pub request_id: Option<String>,
}

impl RequestContext {
    /// Builds a context carrying an `Authorization` header.
    #[must_use]
    pub fn with_authorization(authorization: impl Into<String>) -> Self {
        Self {
            authorization: Some(authorization.into()),
            ..Self::default()
        }
    }

    /// Builds a context carrying a verified user subject.
    #[must_use]
    pub fn with_subject(subject: impl Into<String>) -> Self {
        Self {
            subject: Some(subject.into()),
            ..Self::default()
        }
    }

    /// Returns a copy with the request identifier set.
    #[must_use]
    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = Some(request_id.into());
        self
    }

    /// Returns the bearer token, if the header uses the bearer scheme.
    #[must_use]
    pub fn bearer_token(&self) -> Option<&str> {
        parse_bearer_token(self.authorization.as_deref())
    }
}

/// Extracts the token of a `Bearer` authorization header.
#[must_use]
pub fn parse_bearer_token(header: Option<&str>) -> Option<&str> {
    let mut parts = header?.trim().splitn(2, ' ');
    let scheme = parts.next().unwrap_or_default();
    let token = parts.next().unwrap_or_default().trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}

// ============================================================================
// SECTION: Strategy Contract
// ============================================================================

/// One credential format in the authentication chain.
#[async_trait]
pub trait AuthnStrategy: Send + Sync {
    /// Stable label for audit records.
    fn name(&self) -> &'static str;

    /// Produces a session backend for a recognized credential.
    ///
    /// # Errors
    ///
    /// Returns [`AuthnError`] when the credential is this strategy's format
    /// but does not validate, or its store is unavailable.
    async fn parse(
        &self,
        request: &RequestContext,
    ) -> Result<Option<Arc<dyn SessionBackend>>, AuthnError>;
}

// ============================================================================
// SECTION: Authenticator
// ============================================================================

/// Credential stores consulted by the configured strategies.
#[derive(Default, Clone)]
pub struct AuthnStores {
    /// Users and organization memberships.
    pub memberships: Option<Arc<dyn MembershipStore>>,
    /// Organization access token records.
    pub organization_access_tokens: Option<Arc<dyn OrganizationAccessTokenStore>>,
    /// Legacy target access token records.
    pub target_access_tokens: Option<Arc<dyn TargetAccessTokenStore>>,
}

/// Ordered authentication strategy chain.
pub struct Authenticator {
    /// Strategies in evaluation order.
    strategies: Vec<Arc<dyn AuthnStrategy>>,
    /// Action table shared with every session.
    registry: Arc<ActionRegistry>,
    /// Audit sink shared with every session.
    audit: Arc<dyn AuthzAuditSink>,
    /// Maximum accepted `Authorization` header size.
    max_authorization_header_bytes: usize,
}

impl Authenticator {
    /// Creates an empty chain with default limits and no audit output.
    #[must_use]
    pub fn new(registry: Arc<ActionRegistry>) -> Self {
        Self {
            strategies: Vec::new(),
            registry,
            audit: Arc::new(AuthzNoopAuditSink),
            max_authorization_header_bytes:
                hive_authz_config::DEFAULT_MAX_AUTHORIZATION_HEADER_BYTES,
        }
    }

    /// Builds the chain selected by configuration.
    ///
    /// Strategy order: member subject, organization access token, legacy
    /// target access token.
    ///
    /// # Errors
    ///
    /// Returns [`AuthnError::Misconfigured`] when an enabled strategy has no store.
    pub fn from_config(
        config: &AuthnConfig,
        stores: AuthnStores,
        registry: Arc<ActionRegistry>,
        audit: Arc<dyn AuthzAuditSink>,
    ) -> Result<Self, AuthnError> {
        let mut authenticator = Self::new(registry)
            .with_audit_sink(audit)
            .with_max_authorization_header_bytes(config.max_authorization_header_bytes);
        let toggles = config.strategies;
        if toggles.member_subject {
            let store = stores.memberships.ok_or_else(|| {
                missing_store("authn.strategies.member_subject", "membership")
            })?;
            authenticator =
                authenticator.with_strategy(Arc::new(MemberSubjectStrategy::new(store)));
        }
        if toggles.organization_access_token {
            let store = stores.organization_access_tokens.ok_or_else(|| {
                missing_store(
                    "authn.strategies.organization_access_token",
                    "organization access token",
                )
            })?;
            authenticator = authenticator.with_strategy(Arc::new(
                OrganizationAccessTokenStrategy::new(store, config.validation_cache_max_entries),
            ));
        }
        if toggles.target_access_token {
            let store = stores.target_access_tokens.ok_or_else(|| {
                missing_store("authn.strategies.target_access_token", "target access token")
            })?;
            authenticator =
                authenticator.with_strategy(Arc::new(TargetAccessTokenStrategy::new(store)));
        }
        Ok(authenticator)
    }

    /// Appends a strategy to the chain.
    #[must_use]
    pub fn with_strategy(mut self, strategy: Arc<dyn AuthnStrategy>) -> Self {
        self.strategies.push(strategy);
        self
    }

    /// Returns a copy with the audit sink set.
    #[must_use]
    pub fn with_audit_sink(mut self, audit: Arc<dyn AuthzAuditSink>) -> Self {
        self.audit = audit;
        self
    }

    /// Returns a copy with the header size limit set.
    #[must_use]
    pub const fn with_max_authorization_header_bytes(mut self, limit: usize) -> Self {
        self.max_authorization_header_bytes = limit;
        self
    }

    /// Labels of the configured strategies, in order.
    #[must_use]
    pub fn strategy_names(&self) -> Vec<&'static str> {
        self.strategies.iter().map(|strategy| strategy.name()).collect()
    }

    /// Authenticates a request into a session.
    ///
    /// # Errors
    ///
    /// Returns [`AuthnError`] when the header is oversized or a strategy
    /// rejects its credential.
    pub async fn authenticate(&self, request: &RequestContext) -> Result<Session, AuthnError> {
        if request
            .authorization
            .as_ref()
            .is_some_and(|header| header.len() > self.max_authorization_header_bytes)
        {
            let err = AuthnError::InvalidCredential("authorization header too large".to_string());
            self.audit.record_authn(&AuthnSessionEvent::rejected(
                request.request_id.clone(),
                None,
                err.to_string(),
            ));
            return Err(err);
        }
        for strategy in &self.strategies {
            match strategy.parse(request).await {
                Ok(Some(backend)) => {
                    self.audit.record_authn(&AuthnSessionEvent::authenticated(
                        request.request_id.clone(),
                        strategy.name(),
                    ));
                    return Ok(self.session(backend));
                }
                Ok(None) => {}
                Err(err) => {
                    self.audit.record_authn(&AuthnSessionEvent::rejected(
                        request.request_id.clone(),
                        Some(strategy.name()),
                        err.to_string(),
                    ));
                    return Err(err);
                }
            }
        }
        self.audit.record_authn(&AuthnSessionEvent::unauthenticated(request.request_id.clone()));
        Ok(Session::unauthenticated(Arc::clone(&self.registry))
            .with_audit_sink(Arc::clone(&self.audit)))
    }

    /// Wraps a backend into a session sharing the chain's registry and sink.
    fn session(&self, backend: Arc<dyn SessionBackend>) -> Session {
        Session::new(backend, Arc::clone(&self.registry)).with_audit_sink(Arc::clone(&self.audit))
    }
}

/// Error for an enabled strategy without its store.
fn missing_store(field: &str, store: &str) -> AuthnError {
    AuthnError::Misconfigured(format!("{field} is enabled but no {store} store was provided"))
}
