// crates/hive-authz-core/src/runtime/legacy.rs
// ============================================================================
// Module: Legacy Scope Translation
// Description: Converts flat legacy scopes into allow statements.
// Purpose: Keep pre-statement memberships and tokens working unchanged.
// Dependencies: crate::core, crate::runtime::{resolver, translator}
// ============================================================================

//! ## Overview
//! Member scopes are anchored at the organization root: every level resolves
//! organization-wide. Target access token scopes are anchored at the token's
//! own project and target, so a token never reaches a sibling target.

// ============================================================================
// SECTION: Imports
// ============================================================================

use crate::core::assignment::AssignedAppDeployments;
use crate::core::assignment::AssignedServices;
use crate::core::assignment::AssignedTargets;
use crate::core::assignment::ProjectAssignmentNode;
use crate::core::assignment::ResolvedResourceAssignments;
use crate::core::assignment::ResourceAssignmentGroup;
use crate::core::assignment::TargetAssignmentNode;
use crate::core::legacy::LegacyScope;
use crate::core::permissions::MEMBER_DEFAULT_PERMISSIONS;
use crate::core::permissions::PermissionsByLevel;
use crate::core::statement::PolicyStatement;
use crate::runtime::resolver::resolve_resource_assignment;
use crate::runtime::translator::translate_resolved_assignments;

// ============================================================================
// SECTION: Members
// ============================================================================

/// Translates a member's legacy scopes into statements for the organization.
///
/// Member defaults are always included.
#[must_use]
pub fn translate_legacy_member_scopes(
    organization_id: &str,
    scopes: &[LegacyScope],
) -> Vec<PolicyStatement> {
    let permissions: PermissionsByLevel = MEMBER_DEFAULT_PERMISSIONS
        .into_iter()
        .chain(scopes.iter().flat_map(|scope| scope.member_actions().iter().copied()))
        .collect();
    translate_resolved_assignments(
        &permissions,
        &ResolvedResourceAssignments::organization_wide(organization_id),
    )
}

// ============================================================================
// SECTION: Target Access Tokens
// ============================================================================

/// Translates a legacy target access token's scopes into statements.
///
/// Organization level actions apply to the organization, project level
/// actions to the token's project, and everything below to its target.
#[must_use]
pub fn translate_legacy_token_scopes(
    organization_id: &str,
    project_id: &str,
    target_id: &str,
    scopes: &[LegacyScope],
) -> Vec<PolicyStatement> {
    let permissions: PermissionsByLevel =
        scopes.iter().flat_map(|scope| scope.token_actions().iter().copied()).collect();
    let tree = ResourceAssignmentGroup::Granular {
        projects: vec![ProjectAssignmentNode {
            id: project_id.to_string(),
            targets: AssignedTargets::Granular {
                targets: vec![TargetAssignmentNode {
                    id: target_id.to_string(),
                    services: AssignedServices::Wildcard,
                    app_deployments: AssignedAppDeployments::Wildcard,
                }],
            },
        }],
    };
    translate_resolved_assignments(
        &permissions,
        &resolve_resource_assignment(organization_id, &tree),
    )
}
