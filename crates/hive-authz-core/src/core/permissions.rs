// crates/hive-authz-core/src/core/permissions.rs
// ============================================================================
// Module: Permission Sets
// Description: Permission groupings per level and the predefined permission sets.
// Purpose: Define who may be granted which actions, grouped by resource level.
// Dependencies: crate::core::{action, legacy}
// ============================================================================

//! ## Overview
//! A permission set is a set of [`Action`] values grouped by the level each
//! action targets. The constants below are the closed lists of actions that
//! member roles and organization access tokens may carry. Every action is
//! either member assignable, a member default, or explicitly reserved for
//! non-member credentials.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;

use crate::core::action::Action;
use crate::core::action::ResourceLevel;
use crate::core::legacy::LegacyScope;

// ============================================================================
// SECTION: Predefined Sets
// ============================================================================

/// Actions granted to every organization member.
pub const MEMBER_DEFAULT_PERMISSIONS: [Action; 1] = [Action::OrganizationDescribe];

/// Actions a member role may be granted.
pub const MEMBER_ASSIGNABLE_PERMISSIONS: [Action; 27] = [
    Action::SupportManageTickets,
    Action::OrganizationModifySlug,
    Action::AuditLogExport,
    Action::OrganizationDelete,
    Action::MemberDescribe,
    Action::MemberModify,
    Action::BillingDescribe,
    Action::BillingUpdate,
    Action::OidcModify,
    Action::GitHubIntegrationModify,
    Action::SlackIntegrationModify,
    Action::ProjectCreate,
    Action::ProjectDescribe,
    Action::ProjectDelete,
    Action::ProjectModifySettings,
    Action::SchemaLintingModifyOrganizationRules,
    Action::SchemaLintingModifyProjectRules,
    Action::TargetCreate,
    Action::TargetDelete,
    Action::TargetModifySettings,
    Action::AlertModify,
    Action::TargetAccessTokenModify,
    Action::CdnAccessTokenModify,
    Action::LaboratoryDescribe,
    Action::LaboratoryModify,
    Action::LaboratoryModifyPreflightScript,
    Action::SchemaCheckApprove,
];

/// Actions that are never granted through a member role.
pub const NON_MEMBER_PERMISSIONS: [Action; 12] = [
    Action::SchemaCompose,
    Action::SchemaCheckCreate,
    Action::SchemaVersionPublish,
    Action::SchemaVersionDeleteService,
    Action::AppDeploymentCreate,
    Action::AppDeploymentPublish,
    Action::AppDeploymentRetire,
    Action::UsageReport,
    Action::AccessTokenModify,
    Action::AppDeploymentDescribe,
    Action::SchemaVersionApprove,
    Action::SchemaLoadFromRegistry,
];

/// Actions the predefined viewer role adds to the member defaults.
pub const VIEWER_ROLE_PERMISSIONS: [Action; 3] =
    [Action::SupportManageTickets, Action::ProjectDescribe, Action::LaboratoryDescribe];

/// Actions an organization access token may be granted.
pub const ORGANIZATION_ACCESS_TOKEN_PERMISSIONS: [Action; 18] = [
    Action::OrganizationDescribe,
    Action::MemberDescribe,
    Action::MemberModify,
    Action::AccessTokenModify,
    Action::ProjectDescribe,
    Action::ProjectCreate,
    Action::ProjectDelete,
    Action::ProjectModifySettings,
    Action::TargetCreate,
    Action::TargetDelete,
    Action::TargetModifySettings,
    Action::CdnAccessTokenModify,
    Action::UsageReport,
    Action::SchemaCheckCreate,
    Action::SchemaVersionPublish,
    Action::SchemaVersionDeleteService,
    Action::AppDeploymentCreate,
    Action::AppDeploymentPublish,
];

// ============================================================================
// SECTION: Permissions By Level
// ============================================================================

/// Actions grouped by the resource level they target.
///
/// # Invariants
/// - Each action is stored under [`Action::level`] and nowhere else.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PermissionsByLevel {
    /// Organization level actions.
    organization: BTreeSet<Action>,
    /// Project level actions.
    project: BTreeSet<Action>,
    /// Target level actions.
    target: BTreeSet<Action>,
    /// Service level actions.
    service: BTreeSet<Action>,
    /// App deployment level actions.
    app_deployment: BTreeSet<Action>,
}

impl PermissionsByLevel {
    /// Groups actions by level.
    #[must_use]
    pub fn from_actions(actions: impl IntoIterator<Item = Action>) -> Self {
        let mut permissions = Self::default();
        for action in actions {
            permissions.insert(action);
        }
        permissions
    }

    /// Adds an action under its level.
    pub fn insert(&mut self, action: Action) {
        self.level_mut(action.level()).insert(action);
    }

    /// Returns true when the action is part of the set.
    #[must_use]
    pub fn contains(&self, action: Action) -> bool {
        self.actions(action.level()).contains(&action)
    }

    /// Returns the actions stored for a level.
    #[must_use]
    pub const fn actions(&self, level: ResourceLevel) -> &BTreeSet<Action> {
        match level {
            ResourceLevel::Organization => &self.organization,
            ResourceLevel::Project => &self.project,
            ResourceLevel::Target => &self.target,
            ResourceLevel::Service => &self.service,
            ResourceLevel::AppDeployment => &self.app_deployment,
        }
    }

    /// Returns true when no level holds an action.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        ResourceLevel::ALL.into_iter().all(|level| self.actions(level).is_empty())
    }

    /// Returns the mutable set for a level.
    const fn level_mut(&mut self, level: ResourceLevel) -> &mut BTreeSet<Action> {
        match level {
            ResourceLevel::Organization => &mut self.organization,
            ResourceLevel::Project => &mut self.project,
            ResourceLevel::Target => &mut self.target,
            ResourceLevel::Service => &mut self.service,
            ResourceLevel::AppDeployment => &mut self.app_deployment,
        }
    }
}

impl FromIterator<Action> for PermissionsByLevel {
    fn from_iter<I: IntoIterator<Item = Action>>(iter: I) -> Self {
        Self::from_actions(iter)
    }
}

// ============================================================================
// SECTION: Role Permissions
// ============================================================================

/// Name of the predefined administrator role.
pub const ADMIN_ROLE_NAME: &str = "Admin";

/// Name of the predefined viewer role.
pub const VIEWER_ROLE_NAME: &str = "Viewer";

/// Permission source of a member role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RolePermissions {
    /// Predefined administrator: defaults plus every assignable action.
    Admin,
    /// Predefined viewer: defaults plus [`VIEWER_ROLE_PERMISSIONS`].
    Viewer,
    /// Explicit permission list; non-assignable entries are ignored.
    Granular(Vec<Action>),
    /// Flat legacy scopes.
    Legacy(Vec<LegacyScope>),
}

impl RolePermissions {
    /// Selects the permission source of a stored role.
    ///
    /// Predefined role names win over stored data, and an explicit permission
    /// list wins over legacy scopes.
    #[must_use]
    pub fn for_role(
        name: &str,
        permissions: Option<Vec<Action>>,
        legacy_scopes: Vec<LegacyScope>,
    ) -> Self {
        match (name, permissions) {
            (ADMIN_ROLE_NAME, _) => Self::Admin,
            (VIEWER_ROLE_NAME, _) => Self::Viewer,
            (_, Some(permissions)) => Self::Granular(permissions),
            (_, None) => Self::Legacy(legacy_scopes),
        }
    }

    /// Returns the actions the role grants, grouped by level.
    #[must_use]
    pub fn permissions_by_level(&self) -> PermissionsByLevel {
        let granted: Vec<Action> = match self {
            Self::Admin => MEMBER_ASSIGNABLE_PERMISSIONS.to_vec(),
            Self::Viewer => VIEWER_ROLE_PERMISSIONS.to_vec(),
            Self::Granular(actions) => actions
                .iter()
                .copied()
                .filter(|action| MEMBER_ASSIGNABLE_PERMISSIONS.contains(action))
                .collect(),
            Self::Legacy(scopes) => {
                scopes.iter().flat_map(|scope| scope.member_actions().iter().copied()).collect()
            }
        };
        MEMBER_DEFAULT_PERMISSIONS.into_iter().chain(granted).collect()
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
