// crates/hive-authz-core/src/runtime/matcher.rs
// ============================================================================
// Module: Action Matcher
// Description: Wildcard-aware matching of action patterns.
// Purpose: Decide whether a statement's action pattern covers a request.
// Dependencies: crate::core::identifiers
// ============================================================================

//! ## Overview
//! Action patterns are `*`, an exact action, or `<namespace>:*`. Namespace
//! wildcards never cross namespaces: `project:*` does not cover
//! `target:delete`.

use crate::core::identifiers::WILDCARD;

/// Returns true when the action pattern covers the requested action.
#[must_use]
pub fn match_action(pattern: &str, action: &str) -> bool {
    if pattern == WILDCARD || pattern == action {
        return true;
    }
    let namespace = action.split(':').next();
    let mut pattern_parts = pattern.split(':');
    let pattern_namespace = pattern_parts.next();
    let pattern_verb = pattern_parts.next();
    pattern_namespace == namespace && pattern_verb == Some(WILDCARD)
}
