// crates/hive-authz-core/src/runtime/mod.rs
// ============================================================================
// Module: Hive Authz Runtime
// Description: Matching, resolution, translation, and evaluation logic.
// Purpose: Turn stored assignments into statements and statements into decisions.
// Dependencies: crate::core
// ============================================================================

//! ## Overview
//! Runtime functions are pure and synchronous. They never load data; callers
//! pass in the statements and resource paths to evaluate.
//!
//! Security posture: statements are trusted data produced by this crate, but a
//! malformed statement is reported as an error and never treated as a denial.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod evaluator;
pub mod legacy;
pub mod matcher;
pub mod resolver;
pub mod translator;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use evaluator::Decision;
pub use evaluator::DenyReason;
pub use evaluator::evaluate_statements;
pub use legacy::translate_legacy_member_scopes;
pub use legacy::translate_legacy_token_scopes;
pub use matcher::match_action;
pub use resolver::resolve_resource_assignment;
pub use translator::translate_resolved_assignments;
