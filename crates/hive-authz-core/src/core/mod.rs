// crates/hive-authz-core/src/core/mod.rs
// ============================================================================
// Module: Hive Authz Core Types
// Description: Data model for resources, actions, statements, and permissions.
// Purpose: Define the canonical, serializable authorization vocabulary.
// Dependencies: serde, thiserror, uuid
// ============================================================================

//! ## Overview
//! Core types are pure data: they parse, validate, and serialize, but never
//! evaluate. Evaluation lives in [`crate::runtime`].

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod action;
pub mod assignment;
pub mod hrn;
pub mod identifiers;
pub mod legacy;
pub mod permissions;
pub mod statement;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use action::Action;
pub use action::ActionDefinition;
pub use action::ActionParams;
pub use action::ActionParamsError;
pub use action::ActionRegistry;
pub use action::ResourceLevel;
pub use action::UnknownActionError;
pub use assignment::AssignedAppDeployments;
pub use assignment::AssignedServices;
pub use assignment::AssignedTargets;
pub use assignment::AppDeploymentAssignmentNode;
pub use assignment::LevelAssignment;
pub use assignment::ProjectAssignmentNode;
pub use assignment::ResolvedResourceAssignments;
pub use assignment::ResourceAssignment;
pub use assignment::ResourceAssignmentGroup;
pub use assignment::ServiceAssignmentNode;
pub use assignment::TargetAssignmentNode;
pub use hrn::HRN_SCHEME;
pub use hrn::ResourceIdentifier;
pub use hrn::ResourceIdentifierError;
pub use hrn::match_resource_path;
pub use identifiers::WILDCARD;
pub use identifiers::is_resource_name;
pub use identifiers::is_uuid;
pub use legacy::LegacyOrganizationScope;
pub use legacy::LegacyProjectScope;
pub use legacy::LegacyScope;
pub use legacy::LegacyTargetScope;
pub use legacy::UnknownScopeError;
pub use permissions::ADMIN_ROLE_NAME;
pub use permissions::MEMBER_ASSIGNABLE_PERMISSIONS;
pub use permissions::MEMBER_DEFAULT_PERMISSIONS;
pub use permissions::NON_MEMBER_PERMISSIONS;
pub use permissions::ORGANIZATION_ACCESS_TOKEN_PERMISSIONS;
pub use permissions::PermissionsByLevel;
pub use permissions::RolePermissions;
pub use permissions::VIEWER_ROLE_NAME;
pub use permissions::VIEWER_ROLE_PERMISSIONS;
pub use statement::Effect;
pub use statement::OneOrMany;
pub use statement::PolicyStatement;
