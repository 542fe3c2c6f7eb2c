// crates/hive-authz-core/src/runtime/translator.rs
// ============================================================================
// Module: Policy Statement Translator
// Description: Builds allow statements from permissions and resolved assignments.
// Purpose: Produce the canonical statements evaluated for members and tokens.
// Dependencies: crate::core
// ============================================================================

//! ## Overview
//! One allow statement is emitted per level that holds at least one action.
//! A level without actions emits nothing, so no request at that level can
//! ever match.

// ============================================================================
// SECTION: Imports
// ============================================================================

use crate::core::action::ResourceLevel;
use crate::core::assignment::ResolvedResourceAssignments;
use crate::core::permissions::PermissionsByLevel;
use crate::core::statement::PolicyStatement;

// ============================================================================
// SECTION: Translation
// ============================================================================

/// Translates permissions and resolved assignments into allow statements.
///
/// Statements are ordered from the organization level down.
#[must_use]
pub fn translate_resolved_assignments(
    permissions: &PermissionsByLevel,
    assignments: &ResolvedResourceAssignments,
) -> Vec<PolicyStatement> {
    ResourceLevel::ALL
        .into_iter()
        .filter_map(|level| {
            let actions = permissions.actions(level);
            if actions.is_empty() {
                return None;
            }
            let actions: Vec<String> =
                actions.iter().map(|action| action.as_str().to_string()).collect();
            Some(PolicyStatement::allow(actions, assignments.resource_identifiers(level)))
        })
        .collect()
}
