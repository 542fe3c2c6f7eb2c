// crates/hive-authz-core/src/core/action.rs
// ============================================================================
// Module: Actions and Resource Levels
// Description: Closed action table, resource levels, and identity builders.
// Purpose: Map every action to exactly one resource level and path builder.
// Dependencies: serde, thiserror
// ============================================================================

//! ## Overview
//! Every action string (`<namespace>:<verb>`) belongs to exactly one
//! [`ResourceLevel`]. The level decides which resource paths a request for the
//! action targets. Paths are emitted as a full ancestor chain so that a grant
//! on a coarser resource (organization, project, target) matches requests for
//! any resource nested beneath it.
//!
//! The [`ActionRegistry`] is an immutable table built once and shared by
//! reference; it is the only lookup the evaluator uses.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use crate::core::identifiers::is_uuid;

// ============================================================================
// SECTION: Resource Levels
// ============================================================================

/// Depth of the resource hierarchy a permission applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ResourceLevel {
    /// Organization-wide resources.
    Organization,
    /// Project resources.
    Project,
    /// Target resources.
    Target,
    /// Services (subgraphs) of a target.
    Service,
    /// App deployments of a target.
    AppDeployment,
}

impl ResourceLevel {
    /// All levels, ordered from the root down.
    pub const ALL: [Self; 5] =
        [Self::Organization, Self::Project, Self::Target, Self::Service, Self::AppDeployment];

    /// Returns a stable label for the level.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Organization => "organization",
            Self::Project => "project",
            Self::Target => "target",
            Self::Service => "service",
            Self::AppDeployment => "appDeployment",
        }
    }

    /// Builds the resource paths a request at this level targets.
    ///
    /// The result always starts with the organization path and descends one
    /// entry per level, so coarser grants stay matchable.
    ///
    /// # Errors
    ///
    /// Returns [`ActionParamsError`] when a required identifier is missing.
    pub fn resource_paths(self, params: &ActionParams) -> Result<Vec<String>, ActionParamsError> {
        let mut paths = vec![format!("organization/{}", params.organization_id)];
        if self == Self::Organization {
            return Ok(paths);
        }
        let project_id = params.require(self, "projectId", params.project_id.as_deref())?;
        paths.push(format!("project/{project_id}"));
        if self == Self::Project {
            return Ok(paths);
        }
        let target_id = params.require(self, "targetId", params.target_id.as_deref())?;
        paths.push(format!("target/{target_id}"));
        match self {
            Self::Service => {
                if let Some(service_name) = &params.service_name {
                    paths.push(format!("target/{target_id}/service/{service_name}"));
                }
            }
            Self::AppDeployment => {
                if let Some(app_deployment_name) = &params.app_deployment_name {
                    paths.push(format!("target/{target_id}/appDeployment/{app_deployment_name}"));
                }
            }
            Self::Organization | Self::Project | Self::Target => {}
        }
        Ok(paths)
    }
}

impl fmt::Display for ResourceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// SECTION: Action Parameters
// ============================================================================

/// Concrete identifiers of the resource an action is performed on.
///
/// # Invariants
/// - Fields below the action's level are ignored; fields at or above it are required.
/// - Project and target ids in use are UUIDs; see [`ActionParams::validate_identifiers`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionParams {
    /// Organization identifier.
    pub organization_id: String,
    /// Project identifier.
    pub project_id: Option<String>,
    /// Target identifier.
    pub target_id: Option<String>,
    /// Service name (schema checks and publishes of a single service).
    pub service_name: Option<String>,
    /// App deployment name.
    pub app_deployment_name: Option<String>,
}

impl ActionParams {
    /// Parameters for an organization-level resource.
    #[must_use]
    pub fn organization(organization_id: impl Into<String>) -> Self {
        Self {
            organization_id: organization_id.into(),
            project_id: None,
            target_id: None,
            service_name: None,
            app_deployment_name: None,
        }
    }

    /// Parameters for a project resource.
    #[must_use]
    pub fn project(organization_id: impl Into<String>, project_id: impl Into<String>) -> Self {
        Self {
            project_id: Some(project_id.into()),
            ..Self::organization(organization_id)
        }
    }

    /// Parameters for a target resource.
    #[must_use]
    pub fn target(
        organization_id: impl Into<String>,
        project_id: impl Into<String>,
        target_id: impl Into<String>,
    ) -> Self {
        Self {
            target_id: Some(target_id.into()),
            ..Self::project(organization_id, project_id)
        }
    }

    /// Returns a copy scoped to a single service of the target.
    #[must_use]
    pub fn with_service(mut self, service_name: impl Into<String>) -> Self {
        self.service_name = Some(service_name.into());
        self
    }

    /// Returns a copy scoped to a single app deployment of the target.
    #[must_use]
    pub fn with_app_deployment(mut self, app_deployment_name: impl Into<String>) -> Self {
        self.app_deployment_name = Some(app_deployment_name.into());
        self
    }

    /// Checks that the project and target ids used at `level` are UUIDs.
    ///
    /// Missing ids are left to [`ResourceLevel::resource_paths`].
    ///
    /// # Errors
    ///
    /// Returns [`ActionParamsError::MalformedIdentifier`] for a non-UUID id.
    pub fn validate_identifiers(&self, level: ResourceLevel) -> Result<(), ActionParamsError> {
        let checks = [
            (ResourceLevel::Project, "projectId", self.project_id.as_deref()),
            (ResourceLevel::Target, "targetId", self.target_id.as_deref()),
        ];
        for (min_level, field, value) in checks {
            if level >= min_level
                && let Some(value) = value
                && !is_uuid(value)
            {
                return Err(ActionParamsError::MalformedIdentifier {
                    field,
                });
            }
        }
        Ok(())
    }

    /// Returns the value or a missing-field error for the level.
    fn require<'a>(
        &self,
        level: ResourceLevel,
        field: &'static str,
        value: Option<&'a str>,
    ) -> Result<&'a str, ActionParamsError> {
        value.ok_or(ActionParamsError::MissingField {
            level,
            field,
        })
    }
}

/// Invalid action parameter errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActionParamsError {
    /// A required identifier is missing for the action's level.
    #[error("{level} actions require {field}")]
    MissingField {
        /// Level of the requested action.
        level: ResourceLevel,
        /// Missing parameter name.
        field: &'static str,
    },
    /// An identifier is not a UUID.
    #[error("{field} must be a uuid")]
    MalformedIdentifier {
        /// Malformed parameter name.
        field: &'static str,
    },
    /// The action is not present in the registry.
    #[error("action {0} is not registered")]
    Unregistered(Action),
}

// ============================================================================
// SECTION: Actions
// ============================================================================

/// Every action a session can be authorized for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Action {
    /// View the organization.
    #[serde(rename = "organization:describe")]
    OrganizationDescribe,
    /// Update the organization slug.
    #[serde(rename = "organization:modifySlug")]
    OrganizationModifySlug,
    /// Delete the organization.
    #[serde(rename = "organization:delete")]
    OrganizationDelete,
    /// Manage the GitHub integration.
    #[serde(rename = "gitHubIntegration:modify")]
    GitHubIntegrationModify,
    /// Manage the Slack integration.
    #[serde(rename = "slackIntegration:modify")]
    SlackIntegrationModify,
    /// Manage the OIDC integration.
    #[serde(rename = "oidc:modify")]
    OidcModify,
    /// Access support tickets.
    #[serde(rename = "support:manageTickets")]
    SupportManageTickets,
    /// View billing information.
    #[serde(rename = "billing:describe")]
    BillingDescribe,
    /// Change the organization plan.
    #[serde(rename = "billing:update")]
    BillingUpdate,
    /// View organization members.
    #[serde(rename = "member:describe")]
    MemberDescribe,
    /// Invite members and manage roles.
    #[serde(rename = "member:modify")]
    MemberModify,
    /// Create projects.
    #[serde(rename = "project:create")]
    ProjectCreate,
    /// Manage organization schema linting rules.
    #[serde(rename = "schemaLinting:modifyOrganizationRules")]
    SchemaLintingModifyOrganizationRules,
    /// Export the audit log.
    #[serde(rename = "auditLog:export")]
    AuditLogExport,
    /// Manage organization access tokens.
    #[serde(rename = "accessToken:modify")]
    AccessTokenModify,
    /// View a project.
    #[serde(rename = "project:describe")]
    ProjectDescribe,
    /// Delete a project.
    #[serde(rename = "project:delete")]
    ProjectDelete,
    /// Modify project settings.
    #[serde(rename = "project:modifySettings")]
    ProjectModifySettings,
    /// Manage project alerts.
    #[serde(rename = "alert:modify")]
    AlertModify,
    /// Manage project schema linting rules.
    #[serde(rename = "schemaLinting:modifyProjectRules")]
    SchemaLintingModifyProjectRules,
    /// Create targets in a project.
    #[serde(rename = "target:create")]
    TargetCreate,
    /// Delete a target.
    #[serde(rename = "target:delete")]
    TargetDelete,
    /// Modify target settings.
    #[serde(rename = "target:modifySettings")]
    TargetModifySettings,
    /// Manage registry access tokens of a target.
    #[serde(rename = "targetAccessToken:modify")]
    TargetAccessTokenModify,
    /// Manage CDN access tokens of a target.
    #[serde(rename = "cdnAccessToken:modify")]
    CdnAccessTokenModify,
    /// Use the laboratory.
    #[serde(rename = "laboratory:describe")]
    LaboratoryDescribe,
    /// Manage laboratory collections.
    #[serde(rename = "laboratory:modify")]
    LaboratoryModify,
    /// Update the laboratory preflight script.
    #[serde(rename = "laboratory:modifyPreflightScript")]
    LaboratoryModifyPreflightScript,
    /// View app deployments.
    #[serde(rename = "appDeployment:describe")]
    AppDeploymentDescribe,
    /// Approve schema versions.
    #[serde(rename = "schemaVersion:approve")]
    SchemaVersionApprove,
    /// Load the schema from the registry.
    #[serde(rename = "schema:loadFromRegistry")]
    SchemaLoadFromRegistry,
    /// Compose schemas.
    #[serde(rename = "schema:compose")]
    SchemaCompose,
    /// Report usage data.
    #[serde(rename = "usage:report")]
    UsageReport,
    /// Run a schema check.
    #[serde(rename = "schemaCheck:create")]
    SchemaCheckCreate,
    /// Approve a failed schema check.
    #[serde(rename = "schemaCheck:approve")]
    SchemaCheckApprove,
    /// Publish a schema version.
    #[serde(rename = "schemaVersion:publish")]
    SchemaVersionPublish,
    /// Delete a service from the registry.
    #[serde(rename = "schemaVersion:deleteService")]
    SchemaVersionDeleteService,
    /// Create an app deployment.
    #[serde(rename = "appDeployment:create")]
    AppDeploymentCreate,
    /// Publish an app deployment.
    #[serde(rename = "appDeployment:publish")]
    AppDeploymentPublish,
    /// Retire an app deployment.
    #[serde(rename = "appDeployment:retire")]
    AppDeploymentRetire,
}

impl Action {
    /// Every declared action.
    pub const ALL: [Self; 40] = [
        Self::OrganizationDescribe,
        Self::OrganizationModifySlug,
        Self::OrganizationDelete,
        Self::GitHubIntegrationModify,
        Self::SlackIntegrationModify,
        Self::OidcModify,
        Self::SupportManageTickets,
        Self::BillingDescribe,
        Self::BillingUpdate,
        Self::MemberDescribe,
        Self::MemberModify,
        Self::ProjectCreate,
        Self::SchemaLintingModifyOrganizationRules,
        Self::AuditLogExport,
        Self::AccessTokenModify,
        Self::ProjectDescribe,
        Self::ProjectDelete,
        Self::ProjectModifySettings,
        Self::AlertModify,
        Self::SchemaLintingModifyProjectRules,
        Self::TargetCreate,
        Self::TargetDelete,
        Self::TargetModifySettings,
        Self::TargetAccessTokenModify,
        Self::CdnAccessTokenModify,
        Self::LaboratoryDescribe,
        Self::LaboratoryModify,
        Self::LaboratoryModifyPreflightScript,
        Self::AppDeploymentDescribe,
        Self::SchemaVersionApprove,
        Self::SchemaLoadFromRegistry,
        Self::SchemaCompose,
        Self::UsageReport,
        Self::SchemaCheckCreate,
        Self::SchemaCheckApprove,
        Self::SchemaVersionPublish,
        Self::SchemaVersionDeleteService,
        Self::AppDeploymentCreate,
        Self::AppDeploymentPublish,
        Self::AppDeploymentRetire,
    ];

    /// Returns the canonical action string.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::OrganizationDescribe => "organization:describe",
            Self::OrganizationModifySlug => "organization:modifySlug",
            Self::OrganizationDelete => "organization:delete",
            Self::GitHubIntegrationModify => "gitHubIntegration:modify",
            Self::SlackIntegrationModify => "slackIntegration:modify",
            Self::OidcModify => "oidc:modify",
            Self::SupportManageTickets => "support:manageTickets",
            Self::BillingDescribe => "billing:describe",
            Self::BillingUpdate => "billing:update",
            Self::MemberDescribe => "member:describe",
            Self::MemberModify => "member:modify",
            Self::ProjectCreate => "project:create",
            Self::SchemaLintingModifyOrganizationRules => "schemaLinting:modifyOrganizationRules",
            Self::AuditLogExport => "auditLog:export",
            Self::AccessTokenModify => "accessToken:modify",
            Self::ProjectDescribe => "project:describe",
            Self::ProjectDelete => "project:delete",
            Self::ProjectModifySettings => "project:modifySettings",
            Self::AlertModify => "alert:modify",
            Self::SchemaLintingModifyProjectRules => "schemaLinting:modifyProjectRules",
            Self::TargetCreate => "target:create",
            Self::TargetDelete => "target:delete",
            Self::TargetModifySettings => "target:modifySettings",
            Self::TargetAccessTokenModify => "targetAccessToken:modify",
            Self::CdnAccessTokenModify => "cdnAccessToken:modify",
            Self::LaboratoryDescribe => "laboratory:describe",
            Self::LaboratoryModify => "laboratory:modify",
            Self::LaboratoryModifyPreflightScript => "laboratory:modifyPreflightScript",
            Self::AppDeploymentDescribe => "appDeployment:describe",
            Self::SchemaVersionApprove => "schemaVersion:approve",
            Self::SchemaLoadFromRegistry => "schema:loadFromRegistry",
            Self::SchemaCompose => "schema:compose",
            Self::UsageReport => "usage:report",
            Self::SchemaCheckCreate => "schemaCheck:create",
            Self::SchemaCheckApprove => "schemaCheck:approve",
            Self::SchemaVersionPublish => "schemaVersion:publish",
            Self::SchemaVersionDeleteService => "schemaVersion:deleteService",
            Self::AppDeploymentCreate => "appDeployment:create",
            Self::AppDeploymentPublish => "appDeployment:publish",
            Self::AppDeploymentRetire => "appDeployment:retire",
        }
    }

    /// Returns the resource level the action is scoped to.
    #[must_use]
    pub const fn level(self) -> ResourceLevel {
        match self {
            Self::OrganizationDescribe
            | Self::OrganizationModifySlug
            | Self::OrganizationDelete
            | Self::GitHubIntegrationModify
            | Self::SlackIntegrationModify
            | Self::OidcModify
            | Self::SupportManageTickets
            | Self::BillingDescribe
            | Self::BillingUpdate
            | Self::MemberDescribe
            | Self::MemberModify
            | Self::ProjectCreate
            | Self::SchemaLintingModifyOrganizationRules
            | Self::AuditLogExport
            | Self::AccessTokenModify => ResourceLevel::Organization,
            Self::ProjectDescribe
            | Self::ProjectDelete
            | Self::ProjectModifySettings
            | Self::AlertModify
            | Self::SchemaLintingModifyProjectRules
            | Self::TargetCreate => ResourceLevel::Project,
            Self::TargetDelete
            | Self::TargetModifySettings
            | Self::TargetAccessTokenModify
            | Self::CdnAccessTokenModify
            | Self::LaboratoryDescribe
            | Self::LaboratoryModify
            | Self::LaboratoryModifyPreflightScript
            | Self::AppDeploymentDescribe
            | Self::SchemaVersionApprove
            | Self::SchemaLoadFromRegistry
            | Self::SchemaCompose
            | Self::UsageReport => ResourceLevel::Target,
            Self::SchemaCheckCreate
            | Self::SchemaCheckApprove
            | Self::SchemaVersionPublish
            | Self::SchemaVersionDeleteService => ResourceLevel::Service,
            Self::AppDeploymentCreate | Self::AppDeploymentPublish | Self::AppDeploymentRetire => {
                ResourceLevel::AppDeployment
            }
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unknown action string error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown action: {0}")]
pub struct UnknownActionError(pub String);

impl FromStr for Action {
    type Err = UnknownActionError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|action| action.as_str() == value)
            .ok_or_else(|| UnknownActionError(value.to_string()))
    }
}

// ============================================================================
// SECTION: Registry
// ============================================================================

/// Registered definition of a single action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActionDefinition {
    /// Action being defined.
    pub action: Action,
    /// Resource level the action targets.
    pub level: ResourceLevel,
}

impl ActionDefinition {
    /// Builds the resource paths the action targets for the given parameters.
    ///
    /// # Errors
    ///
    /// Returns [`ActionParamsError`] when a required identifier is missing.
    pub fn resource_paths(&self, params: &ActionParams) -> Result<Vec<String>, ActionParamsError> {
        self.level.resource_paths(params)
    }
}

/// Immutable action table keyed by canonical action string.
///
/// # Invariants
/// - Contains exactly one definition per [`Action`] variant.
#[derive(Debug, Clone)]
pub struct ActionRegistry {
    /// Definitions keyed by action string.
    definitions: BTreeMap<&'static str, ActionDefinition>,
}

impl ActionRegistry {
    /// Builds the registry from the closed action table.
    #[must_use]
    pub fn new() -> Self {
        let definitions = Action::ALL
            .into_iter()
            .map(|action| {
                (
                    action.as_str(),
                    ActionDefinition {
                        action,
                        level: action.level(),
                    },
                )
            })
            .collect();
        Self {
            definitions,
        }
    }

    /// Returns the definition registered for an action string.
    #[must_use]
    pub fn lookup(&self, action: &str) -> Option<&ActionDefinition> {
        self.definitions.get(action)
    }

    /// Returns the definition registered for an action.
    #[must_use]
    pub fn definition(&self, action: Action) -> Option<&ActionDefinition> {
        self.lookup(action.as_str())
    }

    /// Returns the resource level of an action string, if registered.
    #[must_use]
    pub fn level_of(&self, action: &str) -> Option<ResourceLevel> {
        self.lookup(action).map(|definition| definition.level)
    }

    /// Returns the resource paths targeted by an action request.
    ///
    /// # Errors
    ///
    /// Returns [`ActionParamsError`] when the action is unregistered or the
    /// parameters lack a required identifier.
    pub fn resource_paths(
        &self,
        action: Action,
        params: &ActionParams,
    ) -> Result<Vec<String>, ActionParamsError> {
        self.definition(action)
            .ok_or(ActionParamsError::Unregistered(action))?
            .resource_paths(params)
    }

    /// Iterates over the actions registered at a level.
    pub fn actions_at_level(&self, level: ResourceLevel) -> impl Iterator<Item = Action> + '_ {
        self.definitions
            .values()
            .filter(move |definition| definition.level == level)
            .map(|definition| definition.action)
    }

    /// Returns the number of registered actions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    /// Returns true when no actions are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}

impl Default for ActionRegistry {
    fn default() -> Self {
        Self::new()
    }
}
