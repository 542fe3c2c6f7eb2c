// crates/hive-authz/src/resolver.rs
// ============================================================================
// Module: Resource Reference Resolution
// Description: Turns by-id or by-slug references into concrete identifiers.
// Purpose: Produce action parameters before an authorization check runs.
// Dependencies: hive-authz-core, async-trait, serde, thiserror
// ============================================================================

//! ## Overview
//! Checks need concrete organization, project, and target identifiers, while
//! callers usually hold a reference by id or by slug. The lookup itself is a
//! collaborator ([`ResourceReferenceResolver`]); this module adds the shared
//! rules: ids must be UUIDs, an unresolvable reference is reported as a
//! missing permission, and a missing target reference falls back to the
//! session's legacy token binding.

// ============================================================================
// SECTION: Imports
// ============================================================================

use async_trait::async_trait;
use hive_authz_core::Action;
use hive_authz_core::ActionParams;
use hive_authz_core::is_uuid;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use crate::error::AccessError;
use crate::error::AuthzError;
use crate::session::Session;

// ============================================================================
// SECTION: References
// ============================================================================

/// Organization addressed by slug.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganizationSelector {
    /// Organization slug.
    pub organization_slug: String,
}

/// Project addressed by slugs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectSelector {
    /// Organization slug.
    pub organization_slug: String,
    /// Project slug.
    pub project_slug: String,
}

/// Target addressed by slugs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetSelector {
    /// Organization slug.
    pub organization_slug: String,
    /// Project slug.
    pub project_slug: String,
    /// Target slug.
    pub target_slug: String,
}

/// Reference to a resource, by id or by selector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ResourceReference<S> {
    /// Resource UUID.
    ById(String),
    /// Slug selector.
    BySelector(S),
}

/// Reference to an organization.
pub type OrganizationReference = ResourceReference<OrganizationSelector>;
/// Reference to a project.
pub type ProjectReference = ResourceReference<ProjectSelector>;
/// Reference to a target.
pub type TargetReference = ResourceReference<TargetSelector>;

/// Concrete identifiers of a project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedProject {
    /// Organization identifier.
    pub organization_id: String,
    /// Project identifier.
    pub project_id: String,
}

/// Concrete identifiers of a target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTarget {
    /// Organization identifier.
    pub organization_id: String,
    /// Project identifier.
    pub project_id: String,
    /// Target identifier.
    pub target_id: String,
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// A reference could not be resolved for the requested action.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Missing permission for performing '{action}' on resource")]
pub struct InsufficientPermissionError {
    /// Action the caller wanted to perform.
    pub action: Action,
}

impl From<InsufficientPermissionError> for AccessError {
    fn from(err: InsufficientPermissionError) -> Self {
        Self::missing_permission(err.action)
    }
}

/// Reference resolution errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReferenceError {
    /// The reference does not resolve to a resource.
    #[error(transparent)]
    InsufficientPermission(#[from] InsufficientPermissionError),
    /// No target reference was given and the session has no bound target.
    #[error("No target was provided.")]
    MissingTarget,
    /// The lookup itself failed.
    #[error(transparent)]
    Authz(#[from] AuthzError),
}

// ============================================================================
// SECTION: Resolver Contract
// ============================================================================

/// Storage-backed lookup of references.
///
/// Implementations return `Ok(None)` when a reference does not exist.
#[async_trait]
pub trait ResourceReferenceResolver: Send + Sync {
    /// Resolves an organization reference to its id.
    ///
    /// # Errors
    ///
    /// Returns [`AuthzError::Storage`] when the lookup fails.
    async fn organization(
        &self,
        reference: &OrganizationReference,
    ) -> Result<Option<String>, AuthzError>;

    /// Resolves a project reference.
    ///
    /// # Errors
    ///
    /// Returns [`AuthzError::Storage`] when the lookup fails.
    async fn project(
        &self,
        reference: &ProjectReference,
    ) -> Result<Option<ResolvedProject>, AuthzError>;

    /// Resolves a target reference.
    ///
    /// # Errors
    ///
    /// Returns [`AuthzError::Storage`] when the lookup fails.
    async fn target(&self, reference: &TargetReference)
    -> Result<Option<ResolvedTarget>, AuthzError>;
}

// ============================================================================
// SECTION: Resolution
// ============================================================================

/// Resolves an organization reference into action parameters.
///
/// # Errors
///
/// Returns [`ReferenceError::InsufficientPermission`] when unresolvable.
pub async fn resolve_organization_reference(
    resolver: &dyn ResourceReferenceResolver,
    reference: &OrganizationReference,
    action: Action,
) -> Result<ActionParams, ReferenceError> {
    reject_malformed_id(reference, action)?;
    let organization_id = resolver
        .organization(reference)
        .await?
        .ok_or(InsufficientPermissionError {
            action,
        })?;
    Ok(ActionParams::organization(organization_id))
}

/// Resolves a project reference into action parameters.
///
/// # Errors
///
/// Returns [`ReferenceError::InsufficientPermission`] when unresolvable.
pub async fn resolve_project_reference(
    resolver: &dyn ResourceReferenceResolver,
    reference: &ProjectReference,
    action: Action,
) -> Result<ActionParams, ReferenceError> {
    reject_malformed_id(reference, action)?;
    let project = resolver.project(reference).await?.ok_or(InsufficientPermissionError {
        action,
    })?;
    Ok(ActionParams::project(project.organization_id, project.project_id))
}

/// Resolves a target reference into action parameters.
///
/// Without a reference, the session's legacy token binding is used.
///
/// # Errors
///
/// Returns [`ReferenceError::MissingTarget`] when neither a reference nor a
/// bound target exists, and [`ReferenceError::InsufficientPermission`] when
/// the reference is unresolvable.
pub async fn resolve_target_reference(
    resolver: &dyn ResourceReferenceResolver,
    session: &Session,
    reference: Option<&TargetReference>,
    action: Action,
) -> Result<ActionParams, ReferenceError> {
    let Some(reference) = reference else {
        let selector = session.legacy_selector().map_err(|_| ReferenceError::MissingTarget)?;
        return Ok(ActionParams::target(
            selector.organization_id,
            selector.project_id,
            selector.target_id,
        ));
    };
    reject_malformed_id(reference, action)?;
    let target = resolver.target(reference).await?.ok_or(InsufficientPermissionError {
        action,
    })?;
    Ok(ActionParams::target(target.organization_id, target.project_id, target.target_id))
}

/// By-id references must carry a UUID.
fn reject_malformed_id<S>(
    reference: &ResourceReference<S>,
    action: Action,
) -> Result<(), InsufficientPermissionError> {
    match reference {
        ResourceReference::ById(id) if !is_uuid(id) => Err(InsufficientPermissionError {
            action,
        }),
        _ => Ok(()),
    }
}
