// crates/hive-authz/src/member.rs
// ============================================================================
// Module: Member Sessions
// Description: Strategy and backend for users identified by an upstream subject.
// Purpose: Derive statements from organization membership and role.
// Dependencies: hive-authz-core, async-trait, serde
// ============================================================================

//! ## Overview
//! The upstream session layer verifies the user and hands over a subject.
//! Statements are derived per organization from the membership record:
//! owners get `*` on the organization, other members get their role's
//! permissions applied to their assigned resources, and everyone else gets
//! nothing.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;

use async_trait::async_trait;
use hive_authz_core::Action;
use hive_authz_core::HRN_SCHEME;
use hive_authz_core::LegacyScope;
use hive_authz_core::PolicyStatement;
use hive_authz_core::ResolvedResourceAssignments;
use hive_authz_core::ResourceAssignmentGroup;
use hive_authz_core::RolePermissions;
use hive_authz_core::WILDCARD;
use hive_authz_core::is_uuid;
use hive_authz_core::resolve_resource_assignment;
use hive_authz_core::translate_resolved_assignments;
use serde::Deserialize;
use serde::Serialize;

use crate::authn::AuthnStrategy;
use crate::authn::RequestContext;
use crate::error::AccessError;
use crate::error::AuthnError;
use crate::error::AuthzError;
use crate::session::SessionBackend;
use crate::session::Viewer;

// ============================================================================
// SECTION: Records
// ============================================================================

/// Role assigned to a member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberRoleRecord {
    /// Role name; `Admin` and `Viewer` are predefined.
    pub name: String,
    /// Explicit permissions, when the role uses them.
    #[serde(default)]
    pub permissions: Option<Vec<Action>>,
    /// Flat legacy scopes of roles created before explicit permissions.
    #[serde(default)]
    pub legacy_scopes: Vec<LegacyScope>,
}

/// Organization membership of a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MembershipRecord {
    /// Organization identifier.
    pub organization_id: String,
    /// User identifier.
    pub user_id: String,
    /// Whether the user owns the organization.
    pub is_owner: bool,
    /// Assigned role.
    pub role: MemberRoleRecord,
    /// Resources the role applies to; `None` means every resource.
    #[serde(default)]
    pub assigned_resources: Option<ResourceAssignmentGroup>,
}

impl MembershipRecord {
    /// Computes the statements granted by this membership.
    #[must_use]
    pub fn authorization_policy_statements(&self) -> Vec<PolicyStatement> {
        let organization_id = self.organization_id.as_str();
        if self.is_owner {
            return vec![PolicyStatement::allow(
                WILDCARD,
                format!("{HRN_SCHEME}:{organization_id}:organization/{organization_id}"),
            )];
        }
        let role = RolePermissions::for_role(
            &self.role.name,
            self.role.permissions.clone(),
            self.role.legacy_scopes.clone(),
        );
        let resolved = match &self.assigned_resources {
            Some(assigned) => resolve_resource_assignment(organization_id, assigned),
            None => ResolvedResourceAssignments::organization_wide(organization_id),
        };
        translate_resolved_assignments(&role.permissions_by_level(), &resolved)
    }
}

/// Lookup of users and memberships.
#[async_trait]
pub trait MembershipStore: Send + Sync {
    /// Finds the user behind an upstream subject.
    ///
    /// # Errors
    ///
    /// Returns [`AuthnError::Unavailable`] when the store cannot be reached.
    async fn find_user(&self, subject: &str) -> Result<Option<Viewer>, AuthnError>;

    /// Finds a user's membership in an organization.
    ///
    /// # Errors
    ///
    /// Returns [`AuthnError::Unavailable`] when the store cannot be reached.
    async fn find_membership(
        &self,
        organization_id: &str,
        user_id: &str,
    ) -> Result<Option<MembershipRecord>, AuthnError>;
}

// ============================================================================
// SECTION: Session Backend
// ============================================================================

/// Session backend of an authenticated user.
pub struct MemberBackend {
    /// Upstream subject.
    subject: String,
    /// User and membership lookup.
    store: Arc<dyn MembershipStore>,
}

impl MemberBackend {
    /// Builds the backend for a verified subject.
    #[must_use]
    pub fn new(subject: impl Into<String>, store: Arc<dyn MembershipStore>) -> Self {
        Self {
            subject: subject.into(),
            store,
        }
    }
}

#[async_trait]
impl SessionBackend for MemberBackend {
    fn kind(&self) -> &'static str {
        "member"
    }

    async fn load_policy_statements_for_organization(
        &self,
        organization_id: &str,
    ) -> Result<Vec<PolicyStatement>, AuthzError> {
        let user = self.viewer().await?;
        if !is_uuid(organization_id) {
            return Ok(Vec::new());
        }
        let membership = self
            .store
            .find_membership(organization_id, &user.id)
            .await
            .map_err(|err| AuthzError::StatementLoad(err.to_string()))?;
        Ok(membership.map(|record| record.authorization_policy_statements()).unwrap_or_default())
    }

    async fn viewer(&self) -> Result<Viewer, AuthzError> {
        self.store
            .find_user(&self.subject)
            .await
            .map_err(|err| AuthzError::Storage(err.to_string()))?
            .ok_or_else(|| AccessError::unauthorised("User not found").into())
    }

    fn is_viewer(&self) -> bool {
        true
    }
}

// ============================================================================
// SECTION: Strategy
// ============================================================================

/// Authenticates requests carrying a verified user subject.
pub struct MemberSubjectStrategy {
    /// User and membership lookup.
    store: Arc<dyn MembershipStore>,
}

impl MemberSubjectStrategy {
    /// Creates the strategy.
    #[must_use]
    pub fn new(store: Arc<dyn MembershipStore>) -> Self {
        Self {
            store,
        }
    }
}

#[async_trait]
impl AuthnStrategy for MemberSubjectStrategy {
    fn name(&self) -> &'static str {
        "member_subject"
    }

    async fn parse(
        &self,
        request: &RequestContext,
    ) -> Result<Option<Arc<dyn SessionBackend>>, AuthnError> {
        let Some(subject) = request.subject.as_deref() else {
            return Ok(None);
        };
        let subject = subject.trim();
        if subject.is_empty() {
            return Err(AuthnError::InvalidCredential("member subject is empty".to_string()));
        }
        Ok(Some(Arc::new(MemberBackend::new(subject, Arc::clone(&self.store)))))
    }
}
