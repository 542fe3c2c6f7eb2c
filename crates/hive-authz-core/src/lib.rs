// crates/hive-authz-core/src/lib.rs
// ============================================================================
// Module: Hive Authz Core Library
// Description: Public API surface for the Hive authorization engine.
// Purpose: Expose resource identifiers, actions, statements, and evaluators.
// Dependencies: crate::{core, runtime}
// ============================================================================

//! ## Overview
//! Hive authz core evaluates allow/deny policy statements against a
//! hierarchical resource model (organization, project, target, service, app
//! deployment). It is storage-agnostic and synchronous; session caching and
//! authentication live in the `hive-authz` crate.
//!
//! Security posture: an explicit deny always wins, and malformed statements are
//! surfaced as errors rather than silently treated as a denial.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod core;
pub mod runtime;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use core::*;

pub use runtime::Decision;
pub use runtime::DenyReason;
pub use runtime::evaluate_statements;
pub use runtime::match_action;
pub use runtime::resolve_resource_assignment;
pub use runtime::translate_legacy_member_scopes;
pub use runtime::translate_legacy_token_scopes;
pub use runtime::translate_resolved_assignments;
