// crates/hive-authz/src/target_token.rs
// ============================================================================
// Module: Legacy Target Access Tokens
// Description: Strategy and session backend for 32-character target tokens.
// Purpose: Keep registry tokens issued before policy statements working.
// Dependencies: hive-authz-core, async-trait, serde
// ============================================================================

//! ## Overview
//! Legacy tokens are 32 hexadecimal characters bound to one target. Their
//! flat scopes translate into statements anchored at the token's own project
//! and target, and the session exposes the binding as a [`LegacySelector`].

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;

use async_trait::async_trait;
use hive_authz_core::LegacyScope;
use hive_authz_core::PolicyStatement;
use hive_authz_core::translate_legacy_token_scopes;
use serde::Deserialize;
use serde::Serialize;

use crate::authn::AuthnStrategy;
use crate::authn::RequestContext;
use crate::error::AccessError;
use crate::error::AuthnError;
use crate::error::AuthzError;
use crate::session::LegacySelector;
use crate::session::SessionBackend;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Length of a legacy target access token.
pub const TARGET_ACCESS_TOKEN_LENGTH: usize = 32;

/// Returns true when the value has the legacy token shape.
#[must_use]
pub fn is_target_access_token(value: &str) -> bool {
    value.len() == TARGET_ACCESS_TOKEN_LENGTH && value.bytes().all(|byte| byte.is_ascii_hexdigit())
}

// ============================================================================
// SECTION: Records
// ============================================================================

/// Stored legacy target access token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetAccessTokenRecord {
    /// Owning organization.
    pub organization_id: String,
    /// Owning project.
    pub project_id: String,
    /// Bound target.
    pub target_id: String,
    /// Granted legacy scopes.
    pub scopes: Vec<LegacyScope>,
}

/// Lookup of legacy target access tokens.
#[async_trait]
pub trait TargetAccessTokenStore: Send + Sync {
    /// Finds the record of a presented token.
    ///
    /// # Errors
    ///
    /// Returns [`AuthnError::Unavailable`] when the store cannot be reached.
    async fn find_by_token(&self, token: &str) -> Result<Option<TargetAccessTokenRecord>, AuthnError>;
}

// ============================================================================
// SECTION: Session Backend
// ============================================================================

/// Session backend of a legacy target access token.
pub struct TargetAccessTokenBackend {
    /// Presented token.
    token: String,
    /// Stored record.
    record: TargetAccessTokenRecord,
}

impl TargetAccessTokenBackend {
    /// Builds the backend for a token and its record.
    #[must_use]
    pub const fn new(token: String, record: TargetAccessTokenRecord) -> Self {
        Self {
            token,
            record,
        }
    }
}

#[async_trait]
impl SessionBackend for TargetAccessTokenBackend {
    fn kind(&self) -> &'static str {
        "target_access_token"
    }

    async fn load_policy_statements_for_organization(
        &self,
        _organization_id: &str,
    ) -> Result<Vec<PolicyStatement>, AuthzError> {
        Ok(translate_legacy_token_scopes(
            &self.record.organization_id,
            &self.record.project_id,
            &self.record.target_id,
            &self.record.scopes,
        ))
    }

    fn legacy_selector(&self) -> Result<LegacySelector, AccessError> {
        Ok(LegacySelector {
            token: self.token.clone(),
            organization_id: self.record.organization_id.clone(),
            project_id: self.record.project_id.clone(),
            target_id: self.record.target_id.clone(),
        })
    }
}

// ============================================================================
// SECTION: Strategy
// ============================================================================

/// Authenticates `Authorization: Bearer <32 hex chars>` headers.
pub struct TargetAccessTokenStrategy {
    /// Token lookup.
    store: Arc<dyn TargetAccessTokenStore>,
}

impl TargetAccessTokenStrategy {
    /// Creates the strategy.
    #[must_use]
    pub fn new(store: Arc<dyn TargetAccessTokenStore>) -> Self {
        Self {
            store,
        }
    }
}

#[async_trait]
impl AuthnStrategy for TargetAccessTokenStrategy {
    fn name(&self) -> &'static str {
        "target_access_token"
    }

    async fn parse(
        &self,
        request: &RequestContext,
    ) -> Result<Option<Arc<dyn SessionBackend>>, AuthnError> {
        let Some(token) = request.bearer_token() else {
            return Ok(None);
        };
        if !is_target_access_token(token) {
            return Ok(None);
        }
        let record = self.store.find_by_token(token).await?.ok_or_else(|| {
            AuthnError::InvalidCredential("target access token not found".to_string())
        })?;
        Ok(Some(Arc::new(TargetAccessTokenBackend::new(token.to_string(), record))))
    }
}
