// crates/hive-authz-config/src/lib.rs
// ============================================================================
// Module: Hive Authz Config Library
// Description: Canonical config model and validation.
// Purpose: Single source of truth for hive-authz.toml semantics.
// Dependencies: serde, toml
// ============================================================================

//! ## Overview
//! `hive-authz-config` defines the configuration of the authentication chain
//! and the authorization audit sink. Validation is strict and fail-closed.
//!
//! Security posture: config inputs are untrusted.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use config::*;
