// crates/hive-authz-core/src/core/legacy.rs
// ============================================================================
// Module: Legacy Scopes
// Description: Flat scope enums that predate policy statements.
// Purpose: Map every legacy scope to the actions it still grants.
// Dependencies: serde, thiserror
// ============================================================================

//! ## Overview
//! Member roles and target access tokens created before resource-based
//! permissions carry flat scopes such as `target:registry:write`. The tables
//! here are a one-way migration shim: each scope maps to a fixed action list,
//! once for members and once for tokens. A scope may map to nothing.
//!
//! Members never receive `member:modify` through a legacy scope; the check for
//! it changed and translating it would widen access.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use crate::core::action::Action;

// ============================================================================
// SECTION: Organization Scopes
// ============================================================================

/// Legacy organization scopes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum LegacyOrganizationScope {
    /// `organization:read`
    #[serde(rename = "organization:read")]
    Read,
    /// `organization:delete`
    #[serde(rename = "organization:delete")]
    Delete,
    /// `organization:settings`
    #[serde(rename = "organization:settings")]
    Settings,
    /// `organization:integrations`
    #[serde(rename = "organization:integrations")]
    Integrations,
    /// `organization:members`
    #[serde(rename = "organization:members")]
    Members,
}

impl LegacyOrganizationScope {
    /// Every organization scope.
    pub const ALL: [Self; 5] =
        [Self::Read, Self::Delete, Self::Settings, Self::Integrations, Self::Members];

    /// Returns the stored scope string.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Read => "organization:read",
            Self::Delete => "organization:delete",
            Self::Settings => "organization:settings",
            Self::Integrations => "organization:integrations",
            Self::Members => "organization:members",
        }
    }

    /// Actions the scope grants to a member.
    #[must_use]
    pub const fn member_actions(self) -> &'static [Action] {
        match self {
            Self::Read => {
                &[Action::SupportManageTickets, Action::ProjectDescribe, Action::ProjectCreate]
            }
            Self::Settings => &[
                Action::OrganizationModifySlug,
                Action::SchemaLintingModifyOrganizationRules,
                Action::BillingDescribe,
                Action::BillingUpdate,
                Action::AuditLogExport,
            ],
            Self::Delete => &[Action::OrganizationDelete],
            Self::Integrations => &[
                Action::OidcModify,
                Action::GitHubIntegrationModify,
                Action::SlackIntegrationModify,
            ],
            Self::Members => &[Action::MemberDescribe],
        }
    }

    /// Actions the scope grants to a target access token.
    #[must_use]
    pub const fn token_actions(self) -> &'static [Action] {
        match self {
            Self::Read => &[Action::OrganizationDescribe],
            Self::Members => &[Action::MemberDescribe],
            Self::Delete | Self::Settings | Self::Integrations => &[],
        }
    }
}

// ============================================================================
// SECTION: Project Scopes
// ============================================================================

/// Legacy project scopes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum LegacyProjectScope {
    /// `project:read`
    #[serde(rename = "project:read")]
    Read,
    /// `project:delete`
    #[serde(rename = "project:delete")]
    Delete,
    /// `project:settings`
    #[serde(rename = "project:settings")]
    Settings,
    /// `project:alerts`
    #[serde(rename = "project:alerts")]
    Alerts,
    /// `project:operations-store:read`
    #[serde(rename = "project:operations-store:read")]
    OperationsStoreRead,
    /// `project:operations-store:write`
    #[serde(rename = "project:operations-store:write")]
    OperationsStoreWrite,
}

impl LegacyProjectScope {
    /// Every project scope.
    pub const ALL: [Self; 6] = [
        Self::Read,
        Self::Delete,
        Self::Settings,
        Self::Alerts,
        Self::OperationsStoreRead,
        Self::OperationsStoreWrite,
    ];

    /// Returns the stored scope string.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Read => "project:read",
            Self::Delete => "project:delete",
            Self::Settings => "project:settings",
            Self::Alerts => "project:alerts",
            Self::OperationsStoreRead => "project:operations-store:read",
            Self::OperationsStoreWrite => "project:operations-store:write",
        }
    }

    /// Actions the scope grants to a member.
    #[must_use]
    pub const fn member_actions(self) -> &'static [Action] {
        match self {
            Self::Alerts => &[Action::AlertModify],
            Self::Read => &[Action::ProjectDescribe],
            Self::Delete => &[Action::ProjectDelete],
            Self::Settings => &[
                Action::ProjectDelete,
                Action::ProjectModifySettings,
                Action::SchemaLintingModifyProjectRules,
            ],
            Self::OperationsStoreRead | Self::OperationsStoreWrite => &[],
        }
    }

    /// Actions the scope grants to a target access token.
    #[must_use]
    pub const fn token_actions(self) -> &'static [Action] {
        match self {
            Self::Read => &[Action::ProjectDescribe],
            Self::Delete => &[Action::ProjectDelete],
            Self::Settings => {
                &[Action::ProjectModifySettings, Action::SchemaLintingModifyProjectRules]
            }
            Self::Alerts => &[Action::AlertModify],
            Self::OperationsStoreRead => &[Action::LaboratoryDescribe],
            Self::OperationsStoreWrite => &[Action::LaboratoryModify],
        }
    }
}

// ============================================================================
// SECTION: Target Scopes
// ============================================================================

/// Legacy target scopes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum LegacyTargetScope {
    /// `target:read`
    #[serde(rename = "target:read")]
    Read,
    /// `target:delete`
    #[serde(rename = "target:delete")]
    Delete,
    /// `target:settings`
    #[serde(rename = "target:settings")]
    Settings,
    /// `target:registry:read`
    #[serde(rename = "target:registry:read")]
    RegistryRead,
    /// `target:registry:write`
    #[serde(rename = "target:registry:write")]
    RegistryWrite,
    /// `target:tokens:read`
    #[serde(rename = "target:tokens:read")]
    TokensRead,
    /// `target:tokens:write`
    #[serde(rename = "target:tokens:write")]
    TokensWrite,
}

impl LegacyTargetScope {
    /// Every target scope.
    pub const ALL: [Self; 7] = [
        Self::Read,
        Self::Delete,
        Self::Settings,
        Self::RegistryRead,
        Self::RegistryWrite,
        Self::TokensRead,
        Self::TokensWrite,
    ];

    /// Returns the stored scope string.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Read => "target:read",
            Self::Delete => "target:delete",
            Self::Settings => "target:settings",
            Self::RegistryRead => "target:registry:read",
            Self::RegistryWrite => "target:registry:write",
            Self::TokensRead => "target:tokens:read",
            Self::TokensWrite => "target:tokens:write",
        }
    }

    /// Actions the scope grants to a member.
    #[must_use]
    pub const fn member_actions(self) -> &'static [Action] {
        match self {
            Self::Read => &[Action::TargetCreate, Action::LaboratoryDescribe],
            Self::RegistryWrite => &[Action::LaboratoryModify, Action::SchemaCheckApprove],
            Self::TokensWrite => &[Action::TargetAccessTokenModify, Action::CdnAccessTokenModify],
            Self::Settings => {
                &[Action::TargetModifySettings, Action::LaboratoryModifyPreflightScript]
            }
            Self::Delete => &[Action::TargetDelete],
            Self::RegistryRead | Self::TokensRead => &[],
        }
    }

    /// Actions the scope grants to a target access token.
    #[must_use]
    pub const fn token_actions(self) -> &'static [Action] {
        match self {
            Self::Read => &[Action::LaboratoryDescribe, Action::AppDeploymentDescribe],
            Self::RegistryRead => &[
                Action::SchemaLoadFromRegistry,
                Action::SchemaCompose,
                Action::SchemaCheckCreate,
                Action::LaboratoryDescribe,
            ],
            Self::RegistryWrite => &[
                Action::SchemaVersionPublish,
                Action::SchemaVersionDeleteService,
                Action::SchemaVersionApprove,
                Action::SchemaCheckApprove,
                Action::AppDeploymentCreate,
                Action::AppDeploymentPublish,
                Action::AppDeploymentRetire,
                Action::UsageReport,
                Action::LaboratoryModify,
            ],
            Self::TokensRead => &[],
            Self::TokensWrite => &[Action::TargetAccessTokenModify, Action::CdnAccessTokenModify],
            Self::Settings => {
                &[Action::TargetModifySettings, Action::LaboratoryModifyPreflightScript]
            }
            Self::Delete => &[Action::TargetDelete],
        }
    }
}

// ============================================================================
// SECTION: Any Scope
// ============================================================================

/// Any legacy scope, as stored in a flat scope list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LegacyScope {
    /// Organization scope.
    Organization(LegacyOrganizationScope),
    /// Project scope.
    Project(LegacyProjectScope),
    /// Target scope.
    Target(LegacyTargetScope),
}

impl LegacyScope {
    /// Returns the stored scope string.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Organization(scope) => scope.as_str(),
            Self::Project(scope) => scope.as_str(),
            Self::Target(scope) => scope.as_str(),
        }
    }

    /// Actions the scope grants to a member.
    #[must_use]
    pub const fn member_actions(self) -> &'static [Action] {
        match self {
            Self::Organization(scope) => scope.member_actions(),
            Self::Project(scope) => scope.member_actions(),
            Self::Target(scope) => scope.member_actions(),
        }
    }

    /// Actions the scope grants to a target access token.
    #[must_use]
    pub const fn token_actions(self) -> &'static [Action] {
        match self {
            Self::Organization(scope) => scope.token_actions(),
            Self::Project(scope) => scope.token_actions(),
            Self::Target(scope) => scope.token_actions(),
        }
    }

    /// Iterates over every legacy scope.
    pub fn all() -> impl Iterator<Item = Self> {
        LegacyOrganizationScope::ALL
            .into_iter()
            .map(Self::Organization)
            .chain(LegacyProjectScope::ALL.into_iter().map(Self::Project))
            .chain(LegacyTargetScope::ALL.into_iter().map(Self::Target))
    }
}

impl fmt::Display for LegacyScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unknown legacy scope string error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown legacy scope: {0}")]
pub struct UnknownScopeError(pub String);

impl FromStr for LegacyScope {
    type Err = UnknownScopeError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::all()
            .find(|scope| scope.as_str() == value)
            .ok_or_else(|| UnknownScopeError(value.to_string()))
    }
}
