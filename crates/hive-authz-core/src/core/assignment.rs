// crates/hive-authz-core/src/core/assignment.rs
// ============================================================================
// Module: Resource Assignments
// Description: Stored assignment trees and their resolved per-level form.
// Purpose: Describe which resources a member role or token applies to.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! The stored form is a tree mirroring the hierarchy. Every level is either
//! `{"mode": "*"}` (everything below) or `{"mode": "granular", ...}` with an
//! explicit child list; an empty granular list grants nothing below it.
//! Project and target ids must be UUIDs and service or app deployment names
//! a single concrete segment; a stored tree violating either fails to decode.
//!
//! The resolved form flattens the tree into one entry per resource level. A
//! level is either organization-wide or a list of assignments that may be
//! coarser than the level itself (a project entry in the target list stands
//! for every target of that project).

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Deserializer;
use serde::Serialize;
use serde::de::Error as _;

use crate::core::action::ResourceLevel;
use crate::core::hrn::HRN_SCHEME;
use crate::core::identifiers::is_resource_name;
use crate::core::identifiers::is_uuid;

// ============================================================================
// SECTION: Stored Tree
// ============================================================================

/// Root of a stored assignment tree: all projects or a project list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode")]
pub enum ResourceAssignmentGroup {
    /// Every resource of the organization.
    #[serde(rename = "*")]
    Wildcard,
    /// Only the listed projects.
    #[serde(rename = "granular")]
    Granular {
        /// Assigned projects.
        projects: Vec<ProjectAssignmentNode>,
    },
}

/// Stored project assignment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename = "project")]
pub struct ProjectAssignmentNode {
    /// Project identifier.
    #[serde(deserialize_with = "uuid_id")]
    pub id: String,
    /// Targets assigned within the project.
    pub targets: AssignedTargets,
}

/// Target selection of a project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode")]
pub enum AssignedTargets {
    /// Every target of the project.
    #[serde(rename = "*")]
    Wildcard,
    /// Only the listed targets.
    #[serde(rename = "granular")]
    Granular {
        /// Assigned targets.
        targets: Vec<TargetAssignmentNode>,
    },
}

/// Stored target assignment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename = "target", rename_all = "camelCase")]
pub struct TargetAssignmentNode {
    /// Target identifier.
    #[serde(deserialize_with = "uuid_id")]
    pub id: String,
    /// Services assigned within the target.
    pub services: AssignedServices,
    /// App deployments assigned within the target.
    pub app_deployments: AssignedAppDeployments,
}

/// Service selection of a target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode")]
pub enum AssignedServices {
    /// Every service of the target.
    #[serde(rename = "*")]
    Wildcard,
    /// Only the listed services. A missing or null list is empty.
    #[serde(rename = "granular")]
    Granular {
        /// Assigned services.
        #[serde(default, deserialize_with = "null_as_empty")]
        services: Vec<ServiceAssignmentNode>,
    },
}

/// Stored service assignment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename = "service", rename_all = "camelCase")]
pub struct ServiceAssignmentNode {
    /// Service name.
    #[serde(deserialize_with = "resource_name")]
    pub service_name: String,
}

/// App deployment selection of a target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode")]
pub enum AssignedAppDeployments {
    /// Every app deployment of the target.
    #[serde(rename = "*")]
    Wildcard,
    /// Only the listed app deployments.
    #[serde(rename = "granular")]
    Granular {
        /// Assigned app deployments.
        #[serde(rename = "appDeployments")]
        app_deployments: Vec<AppDeploymentAssignmentNode>,
    },
}

/// Stored app deployment assignment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename = "appDeployment", rename_all = "camelCase")]
pub struct AppDeploymentAssignmentNode {
    /// App deployment name.
    #[serde(deserialize_with = "resource_name")]
    pub app_name: String,
}

/// Treats an explicit `null` list as empty.
fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<Vec<T>>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// Accepts only hyphenated UUID identifiers.
fn uuid_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = String::deserialize(deserializer)?;
    if is_uuid(&value) { Ok(value) } else { Err(D::Error::custom("resource id must be a uuid")) }
}

/// Accepts only names usable as one concrete path segment.
fn resource_name<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = String::deserialize(deserializer)?;
    if is_resource_name(&value) {
        Ok(value)
    } else {
        Err(D::Error::custom("resource name must be a single non-wildcard segment"))
    }
}

// ============================================================================
// SECTION: Resolved Assignments
// ============================================================================

/// Concrete resource a resolved level entry refers to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ResourceAssignment {
    /// Whole organization.
    Organization {
        /// Organization identifier.
        organization_id: String,
    },
    /// Whole project.
    Project {
        /// Project identifier.
        project_id: String,
    },
    /// Whole target.
    Target {
        /// Target identifier.
        target_id: String,
    },
    /// Single service of a target.
    Service {
        /// Owning target identifier.
        target_id: String,
        /// Service name.
        service_name: String,
    },
    /// Single app deployment of a target.
    AppDeployment {
        /// Owning target identifier.
        target_id: String,
        /// App deployment name.
        app_deployment_name: String,
    },
}

impl ResourceAssignment {
    /// Returns the level of the resource itself.
    #[must_use]
    pub const fn level(&self) -> ResourceLevel {
        match self {
            Self::Organization {
                ..
            } => ResourceLevel::Organization,
            Self::Project {
                ..
            } => ResourceLevel::Project,
            Self::Target {
                ..
            } => ResourceLevel::Target,
            Self::Service {
                ..
            } => ResourceLevel::Service,
            Self::AppDeployment {
                ..
            } => ResourceLevel::AppDeployment,
        }
    }

    /// Returns the resource path in the form produced by action identities.
    #[must_use]
    pub fn resource_path(&self) -> String {
        match self {
            Self::Organization {
                organization_id,
            } => format!("organization/{organization_id}"),
            Self::Project {
                project_id,
            } => format!("project/{project_id}"),
            Self::Target {
                target_id,
            } => format!("target/{target_id}"),
            Self::Service {
                target_id,
                service_name,
            } => format!("target/{target_id}/service/{service_name}"),
            Self::AppDeployment {
                target_id,
                app_deployment_name,
            } => format!("target/{target_id}/appDeployment/{app_deployment_name}"),
        }
    }

    /// Encodes the assignment as a resource identifier scoped to the organization.
    #[must_use]
    pub fn to_resource_identifier(&self, organization_id: &str) -> String {
        format!("{HRN_SCHEME}:{organization_id}:{}", self.resource_path())
    }
}

/// Resolved entry for one resource level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LevelAssignment {
    /// Every resource of the organization at this level.
    OrganizationWide,
    /// Explicit entries; an empty list grants nothing.
    Granular(Vec<ResourceAssignment>),
}

impl LevelAssignment {
    /// Returns the concrete assignments this level stands for.
    #[must_use]
    pub fn assignments(&self, organization_id: &str) -> Vec<ResourceAssignment> {
        match self {
            Self::OrganizationWide => vec![ResourceAssignment::Organization {
                organization_id: organization_id.to_string(),
            }],
            Self::Granular(entries) => entries.clone(),
        }
    }
}

/// Organization level entry shared by every resolution.
static ORGANIZATION_WIDE: LevelAssignment = LevelAssignment::OrganizationWide;

/// Assignment tree flattened into one entry per resource level.
///
/// # Invariants
/// - The organization level is always organization-wide.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedResourceAssignments {
    /// Organization the assignments belong to.
    pub organization_id: String,
    /// Project level entries.
    pub project: LevelAssignment,
    /// Target level entries.
    pub target: LevelAssignment,
    /// Service level entries.
    pub service: LevelAssignment,
    /// App deployment level entries.
    pub app_deployment: LevelAssignment,
}

impl ResolvedResourceAssignments {
    /// Builds an organization-wide resolution for every level.
    #[must_use]
    pub fn organization_wide(organization_id: impl Into<String>) -> Self {
        Self {
            organization_id: organization_id.into(),
            project: LevelAssignment::OrganizationWide,
            target: LevelAssignment::OrganizationWide,
            service: LevelAssignment::OrganizationWide,
            app_deployment: LevelAssignment::OrganizationWide,
        }
    }

    /// Returns the resolved entry for a level.
    #[must_use]
    pub fn level(&self, level: ResourceLevel) -> &LevelAssignment {
        match level {
            ResourceLevel::Organization => &ORGANIZATION_WIDE,
            ResourceLevel::Project => &self.project,
            ResourceLevel::Target => &self.target,
            ResourceLevel::Service => &self.service,
            ResourceLevel::AppDeployment => &self.app_deployment,
        }
    }

    /// Returns the resource identifiers granted at a level.
    #[must_use]
    pub fn resource_identifiers(&self, level: ResourceLevel) -> Vec<String> {
        self.level(level)
            .assignments(&self.organization_id)
            .iter()
            .map(|assignment| assignment.to_resource_identifier(&self.organization_id))
            .collect()
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
