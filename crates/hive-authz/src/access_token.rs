// crates/hive-authz/src/access_token.rs
// ============================================================================
// Module: Organization Access Tokens
// Description: Token records, validation cache, strategy, and session backend.
// Purpose: Authenticate `hvo1/` bearer keys into statement-carrying sessions.
// Dependencies: hive-authz-core, async-trait, moka, serde
// ============================================================================

//! ## Overview
//! A token record stores its permissions and assigned resources; its
//! statements are computed on demand by
//! [`OrganizationAccessTokenRecord::authorization_policy_statements`].
//! Secret checks are memoized in a bounded [`ValidationCache`] keyed by the
//! SHA-256 digest of the presented key, so plain keys are never retained.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;

use async_trait::async_trait;
use hive_authz_core::Action;
use hive_authz_core::ORGANIZATION_ACCESS_TOKEN_PERMISSIONS;
use hive_authz_core::PermissionsByLevel;
use hive_authz_core::PolicyStatement;
use hive_authz_core::ResolvedResourceAssignments;
use hive_authz_core::ResourceAssignmentGroup;
use hive_authz_core::is_uuid;
use hive_authz_core::resolve_resource_assignment;
use hive_authz_core::translate_resolved_assignments;
use moka::sync::Cache;
use serde::Deserialize;
use serde::Serialize;

use crate::access_key;
use crate::access_key::CreatedAccessKey;
use crate::authn::AuthnStrategy;
use crate::authn::RequestContext;
use crate::error::AuthnError;
use crate::error::AuthzError;
use crate::session::SessionBackend;

// ============================================================================
// SECTION: Records
// ============================================================================

/// Stored organization access token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganizationAccessTokenRecord {
    /// Record identifier embedded in the access key.
    pub id: String,
    /// Owning organization.
    pub organization_id: String,
    /// Human-readable title.
    pub title: String,
    /// Granted actions.
    pub permissions: Vec<Action>,
    /// Resources the permissions apply to; `None` means every resource.
    #[serde(default)]
    pub assigned_resources: Option<ResourceAssignmentGroup>,
    /// Leading characters of the access key.
    pub first_characters: String,
    /// Hex SHA-256 digest of the key secret.
    pub hash: String,
}

impl OrganizationAccessTokenRecord {
    /// Issues a new token record and its access key.
    ///
    /// Permissions outside [`ORGANIZATION_ACCESS_TOKEN_PERMISSIONS`] are
    /// dropped and duplicates collapse.
    #[must_use]
    pub fn issue(
        id: impl Into<String>,
        organization_id: impl Into<String>,
        title: impl Into<String>,
        permissions: &[Action],
        assigned_resources: ResourceAssignmentGroup,
    ) -> (Self, String) {
        let id = id.into();
        let CreatedAccessKey {
            private_access_token,
            hash,
            first_characters,
        } = access_key::create(&id);
        let mut granted: Vec<Action> = permissions
            .iter()
            .copied()
            .filter(|action| ORGANIZATION_ACCESS_TOKEN_PERMISSIONS.contains(action))
            .collect();
        granted.sort_unstable();
        granted.dedup();
        let record = Self {
            id,
            organization_id: organization_id.into(),
            title: title.into(),
            permissions: granted,
            assigned_resources: Some(assigned_resources),
            first_characters,
            hash,
        };
        (record, private_access_token)
    }

    /// Computes the statements granted by this token.
    ///
    /// Only token-assignable permissions contribute.
    #[must_use]
    pub fn authorization_policy_statements(&self) -> Vec<PolicyStatement> {
        let permissions = PermissionsByLevel::from_actions(
            self.permissions
                .iter()
                .copied()
                .filter(|action| ORGANIZATION_ACCESS_TOKEN_PERMISSIONS.contains(action)),
        );
        let resolved = match &self.assigned_resources {
            Some(assigned) => resolve_resource_assignment(&self.organization_id, assigned),
            None => ResolvedResourceAssignments::organization_wide(self.organization_id.as_str()),
        };
        translate_resolved_assignments(&permissions, &resolved)
    }
}

/// Lookup of organization access token records.
#[async_trait]
pub trait OrganizationAccessTokenStore: Send + Sync {
    /// Finds a token record by id.
    ///
    /// # Errors
    ///
    /// Returns [`AuthnError::Unavailable`] when the store cannot be reached.
    async fn find_by_id(
        &self,
        id: &str,
    ) -> Result<Option<OrganizationAccessTokenRecord>, AuthnError>;
}

// ============================================================================
// SECTION: Validation Cache
// ============================================================================

/// Bounded memo of secret verification results.
///
/// # Invariants
/// - Holds at most `max_entries` results once pending evictions have run.
/// - Keys are SHA-256 digests of the presented key.
/// - Concurrent misses on one key run the verification once.
pub struct ValidationCache {
    /// Results keyed by key digest.
    results: Cache<String, bool>,
}

impl ValidationCache {
    /// Creates a cache holding at most `max_entries` results (minimum one).
    #[must_use]
    pub fn new(max_entries: usize) -> Self {
        let capacity = u64::try_from(max_entries.max(1)).unwrap_or(u64::MAX);
        Self {
            results: Cache::builder().max_capacity(capacity).build(),
        }
    }

    /// Returns the memoized result for `access_key`, running `verify` on a miss.
    pub fn get_or_insert_with(&self, access_key: &str, verify: impl FnOnce() -> bool) -> bool {
        self.results.get_with(access_key::sha256_hex(access_key.as_bytes()), verify)
    }

    /// Number of memoized results after pending evictions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.results.run_pending_tasks();
        usize::try_from(self.results.entry_count()).unwrap_or(usize::MAX)
    }

    /// Whether the cache is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// ============================================================================
// SECTION: Session Backend
// ============================================================================

/// Session backend of an organization access token.
#[derive(Debug, Clone)]
pub struct OrganizationAccessTokenBackend {
    /// Token record identifier.
    token_id: String,
    /// Owning organization.
    organization_id: String,
    /// Statements computed when the session was created.
    statements: Vec<PolicyStatement>,
}

impl OrganizationAccessTokenBackend {
    /// Builds the backend from a verified record.
    #[must_use]
    pub fn from_record(record: &OrganizationAccessTokenRecord) -> Self {
        Self {
            token_id: record.id.clone(),
            organization_id: record.organization_id.clone(),
            statements: record.authorization_policy_statements(),
        }
    }

    /// Token record identifier.
    #[must_use]
    pub fn token_id(&self) -> &str {
        &self.token_id
    }

    /// Owning organization.
    #[must_use]
    pub fn organization_id(&self) -> &str {
        &self.organization_id
    }
}

#[async_trait]
impl SessionBackend for OrganizationAccessTokenBackend {
    fn kind(&self) -> &'static str {
        "organization_access_token"
    }

    async fn load_policy_statements_for_organization(
        &self,
        _organization_id: &str,
    ) -> Result<Vec<PolicyStatement>, AuthzError> {
        Ok(self.statements.clone())
    }
}

// ============================================================================
// SECTION: Strategy
// ============================================================================

/// Authenticates `Authorization: Bearer hvo1/...` headers.
pub struct OrganizationAccessTokenStrategy {
    /// Token record lookup.
    store: Arc<dyn OrganizationAccessTokenStore>,
    /// Memoized secret checks.
    validations: ValidationCache,
}

impl OrganizationAccessTokenStrategy {
    /// Creates the strategy with a validation cache of the given capacity.
    #[must_use]
    pub fn new(store: Arc<dyn OrganizationAccessTokenStore>, cache_max_entries: usize) -> Self {
        Self {
            store,
            validations: ValidationCache::new(cache_max_entries),
        }
    }

    /// Memoized secret checks.
    #[must_use]
    pub const fn validations(&self) -> &ValidationCache {
        &self.validations
    }
}

#[async_trait]
impl AuthnStrategy for OrganizationAccessTokenStrategy {
    fn name(&self) -> &'static str {
        "organization_access_token"
    }

    async fn parse(
        &self,
        request: &RequestContext,
    ) -> Result<Option<Arc<dyn SessionBackend>>, AuthnError> {
        let Some(token) = request.bearer_token() else {
            return Ok(None);
        };
        if !access_key::has_access_key_prefix(token) {
            return Ok(None);
        }
        let decoded = access_key::decode(token)
            .map_err(|err| AuthnError::InvalidCredential(format!("organization access key: {err}")))?;
        if !is_uuid(&decoded.id) {
            return Err(AuthnError::InvalidCredential(
                "organization access key id is not a uuid".to_string(),
            ));
        }
        let record = self.store.find_by_id(&decoded.id).await?.ok_or_else(|| {
            AuthnError::InvalidCredential("organization access key not found".to_string())
        })?;
        let verified = self
            .validations
            .get_or_insert_with(token, || access_key::verify(&decoded.private_key, &record.hash));
        if !verified {
            return Err(AuthnError::InvalidCredential(
                "organization access key does not match".to_string(),
            ));
        }
        Ok(Some(Arc::new(OrganizationAccessTokenBackend::from_record(&record))))
    }
}
