// crates/hive-authz/src/error.rs
// ============================================================================
// Module: Authz Errors
// Description: Access, authorization, and authentication error types.
// Purpose: Keep legitimate denials distinct from infrastructure failures.
// Dependencies: hive-authz-core, thiserror
// ============================================================================

//! ## Overview
//! [`AccessError`] is the only denial signal. Every other [`AuthzError`]
//! variant is a failure that callers must not treat as "not permitted".

// ============================================================================
// SECTION: Imports
// ============================================================================

use hive_authz_core::Action;
use hive_authz_core::ActionParamsError;
use hive_authz_core::ResourceIdentifierError;
use thiserror::Error;

// ============================================================================
// SECTION: Access Errors
// ============================================================================

/// Error code attached to an [`AccessError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessErrorCode {
    /// Caller is known but not permitted.
    Unauthorised,
    /// Caller identity is missing.
    Unauthenticated,
}

impl AccessErrorCode {
    /// Returns the wire code.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unauthorised => "UNAUTHORISED",
            Self::Unauthenticated => "UNAUTHENTICATED",
        }
    }
}

/// Access denial with a human-readable reason.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("No access (reason: \"{reason}\")")]
pub struct AccessError {
    /// Denial reason.
    reason: String,
    /// Error code.
    code: AccessErrorCode,
}

impl AccessError {
    /// Builds an `UNAUTHORISED` access error.
    #[must_use]
    pub fn unauthorised(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
            code: AccessErrorCode::Unauthorised,
        }
    }

    /// Builds an `UNAUTHENTICATED` access error.
    #[must_use]
    pub fn unauthenticated(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
            code: AccessErrorCode::Unauthenticated,
        }
    }

    /// Builds the denial raised when no statement grants an action.
    #[must_use]
    pub fn missing_permission(action: Action) -> Self {
        Self::unauthorised(format!("Missing permission for performing '{action}' on resource"))
    }

    /// Returns the denial reason.
    #[must_use]
    pub fn reason(&self) -> &str {
        &self.reason
    }

    /// Returns the error code.
    #[must_use]
    pub const fn code(&self) -> AccessErrorCode {
        self.code
    }
}

// ============================================================================
// SECTION: Authorization Errors
// ============================================================================

/// Errors raised by authorization checks.
///
/// Cloneable because memoized outcomes are shared between concurrent callers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthzError {
    /// The caller is not permitted.
    #[error(transparent)]
    Access(#[from] AccessError),
    /// A stored statement carries a malformed resource identifier.
    #[error("malformed policy statement: {0}")]
    MalformedStatement(#[from] ResourceIdentifierError),
    /// The request parameters do not identify a resource.
    #[error("invalid action parameters: {0}")]
    InvalidParams(String),
    /// Policy statements could not be loaded.
    #[error("policy statement load failed: {0}")]
    StatementLoad(String),
    /// A collaborator lookup other than statement loading failed.
    #[error("storage error: {0}")]
    Storage(String),
    /// Internal state failure.
    #[error("authz internal error: {0}")]
    Internal(String),
}

impl AuthzError {
    /// Returns a stable label for audit records.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Access(_) => "access_denied",
            Self::MalformedStatement(_) => "malformed_statement",
            Self::InvalidParams(_) => "invalid_params",
            Self::StatementLoad(_) => "statement_load",
            Self::Storage(_) => "storage",
            Self::Internal(_) => "internal",
        }
    }
}

impl From<ActionParamsError> for AuthzError {
    fn from(err: ActionParamsError) -> Self {
        Self::InvalidParams(err.to_string())
    }
}

// ============================================================================
// SECTION: Authentication Errors
// ============================================================================

/// Errors raised by authentication strategies.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthnError {
    /// A credential in a recognized format failed validation.
    #[error("invalid credential: {0}")]
    InvalidCredential(String),
    /// A credential store could not be reached.
    #[error("credential store unavailable: {0}")]
    Unavailable(String),
    /// The strategy chain is misconfigured.
    #[error("authentication misconfigured: {0}")]
    Misconfigured(String),
}
