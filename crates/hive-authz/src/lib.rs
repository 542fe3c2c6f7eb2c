// crates/hive-authz/src/lib.rs
// ============================================================================
// Module: Hive Authz Library
// Description: Async authorization sessions and authentication strategies.
// Purpose: Evaluate policy statements per request with memoized decisions.
// Dependencies: hive-authz-core, hive-authz-config, tokio, async-trait
// ============================================================================

//! ## Overview
//! The session layer sits between request handlers and the pure policy engine
//! in `hive-authz-core`. A request is authenticated by an ordered strategy
//! chain into a [`Session`], which loads statements through a
//! [`SessionBackend`] and memoizes both statements and decisions.
//!
//! Security posture: every failure is fail-closed. Storage failures surface as
//! errors and are never reported as a plain denial.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod access_key;
pub mod access_token;
pub mod audit;
pub mod authn;
pub mod error;
pub mod member;
pub mod resolver;
pub mod session;
pub mod target_token;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use access_token::OrganizationAccessTokenRecord;
pub use access_token::OrganizationAccessTokenStore;
pub use access_token::OrganizationAccessTokenStrategy;
pub use audit::AuthzAuditSink;
pub use audit::AuthzFileAuditSink;
pub use audit::AuthzNoopAuditSink;
pub use audit::AuthzStderrAuditSink;
pub use audit::audit_sink_from_config;
pub use authn::AuthnStores;
pub use authn::AuthnStrategy;
pub use authn::Authenticator;
pub use authn::RequestContext;
pub use error::AccessError;
pub use error::AccessErrorCode;
pub use error::AuthnError;
pub use error::AuthzError;
pub use member::MemberSubjectStrategy;
pub use member::MembershipRecord;
pub use member::MembershipStore;
pub use resolver::InsufficientPermissionError;
pub use resolver::ReferenceError;
pub use resolver::ResourceReferenceResolver;
pub use session::LegacySelector;
pub use session::Session;
pub use session::SessionBackend;
pub use session::UnauthenticatedBackend;
pub use session::Viewer;
pub use target_token::TargetAccessTokenRecord;
pub use target_token::TargetAccessTokenStore;
pub use target_token::TargetAccessTokenStrategy;
