// crates/hive-authz-core/src/runtime/resolver.rs
// ============================================================================
// Module: Resource Assignment Resolver
// Description: Flattens stored assignment trees into per-level entries.
// Purpose: Implement wildcard inheritance across the resource hierarchy.
// Dependencies: crate::core::assignment
// ============================================================================

//! ## Overview
//! Hierarchy: organization, project, target, then service and app deployment
//! side by side under a target. A wildcard at one level grants everything
//! below it, which the resolver expresses by pushing the coarser entry into
//! every finer level list. A granular level with an empty list contributes
//! nothing to the levels below it.
//!
//! Nodes whose id is not a UUID, and services or app deployments whose name
//! is not a single concrete segment, are skipped together with everything
//! below them. Such a node would otherwise encode as a wildcard pattern.

// ============================================================================
// SECTION: Imports
// ============================================================================

use crate::core::assignment::AssignedAppDeployments;
use crate::core::assignment::AssignedServices;
use crate::core::assignment::AssignedTargets;
use crate::core::assignment::LevelAssignment;
use crate::core::assignment::ResolvedResourceAssignments;
use crate::core::assignment::ResourceAssignment;
use crate::core::assignment::ResourceAssignmentGroup;
use crate::core::identifiers::is_resource_name;
use crate::core::identifiers::is_uuid;

// ============================================================================
// SECTION: Resolution
// ============================================================================

/// Resolves a stored assignment tree for an organization.
#[must_use]
pub fn resolve_resource_assignment(
    organization_id: &str,
    projects: &ResourceAssignmentGroup,
) -> ResolvedResourceAssignments {
    let ResourceAssignmentGroup::Granular {
        projects,
    } = projects
    else {
        return ResolvedResourceAssignments::organization_wide(organization_id);
    };

    let mut project_entries = Vec::new();
    let mut target_entries = Vec::new();
    let mut service_entries = Vec::new();
    let mut app_deployment_entries = Vec::new();

    for project in projects.iter().filter(|project| is_uuid(&project.id)) {
        let project_entry = ResourceAssignment::Project {
            project_id: project.id.clone(),
        };
        project_entries.push(project_entry.clone());

        let AssignedTargets::Granular {
            targets,
        } = &project.targets
        else {
            target_entries.push(project_entry.clone());
            service_entries.push(project_entry.clone());
            app_deployment_entries.push(project_entry);
            continue;
        };

        for target in targets.iter().filter(|target| is_uuid(&target.id)) {
            let target_entry = ResourceAssignment::Target {
                target_id: target.id.clone(),
            };
            target_entries.push(target_entry.clone());

            match &target.services {
                AssignedServices::Wildcard => service_entries.push(target_entry.clone()),
                AssignedServices::Granular {
                    services,
                } => service_entries.extend(
                    services.iter().filter(|service| is_resource_name(&service.service_name)).map(
                        |service| ResourceAssignment::Service {
                            target_id: target.id.clone(),
                            service_name: service.service_name.clone(),
                        },
                    ),
                ),
            }

            match &target.app_deployments {
                AssignedAppDeployments::Wildcard => app_deployment_entries.push(target_entry),
                AssignedAppDeployments::Granular {
                    app_deployments,
                } => app_deployment_entries.extend(
                    app_deployments
                        .iter()
                        .filter(|app_deployment| is_resource_name(&app_deployment.app_name))
                        .map(|app_deployment| ResourceAssignment::AppDeployment {
                            target_id: target.id.clone(),
                            app_deployment_name: app_deployment.app_name.clone(),
                        }),
                ),
            }
        }
    }

    ResolvedResourceAssignments {
        organization_id: organization_id.to_string(),
        project: LevelAssignment::Granular(project_entries),
        target: LevelAssignment::Granular(target_entries),
        service: LevelAssignment::Granular(service_entries),
        app_deployment: LevelAssignment::Granular(app_deployment_entries),
    }
}
