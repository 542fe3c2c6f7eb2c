// crates/hive-authz-core/src/core/identifiers.rs
// ============================================================================
// Module: Identifier Helpers
// Description: Shared identifier constants and UUID validation.
// Purpose: Keep wildcard and UUID rules identical across parsers.
// Dependencies: uuid
// ============================================================================

//! ## Overview
//! Organization, project, and target identifiers are UUID strings in their
//! hyphenated form. The wildcard `*` is accepted wherever a pattern allows it.
//! Service and app deployment names are free-form but must stay a single
//! concrete path segment.

use uuid::Uuid;

/// Wildcard segment accepted by resource and action patterns.
pub const WILDCARD: &str = "*";

/// Length of a hyphenated UUID string.
const HYPHENATED_UUID_LEN: usize = 36;

/// Returns true when the value is a hyphenated UUID string.
#[must_use]
pub fn is_uuid(value: &str) -> bool {
    value.len() == HYPHENATED_UUID_LEN && Uuid::try_parse(value).is_ok()
}

/// Returns true when the value is usable as one concrete resource path segment.
#[must_use]
pub fn is_resource_name(value: &str) -> bool {
    !value.is_empty() && value != WILDCARD && !value.contains('/')
}
