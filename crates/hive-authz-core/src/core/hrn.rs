// crates/hive-authz-core/src/core/hrn.rs
// ============================================================================
// Module: Hive Resource Names
// Description: Codec and pattern matching for `hrn:<org>:<path>` identifiers.
// Purpose: Provide strict parsing of statement resources and path matching.
// Dependencies: serde, thiserror, uuid
// ============================================================================

//! ## Overview
//! A Hive Resource Name (HRN) scopes a slash-delimited resource path to an
//! organization: `hrn:<organizationId-or-*>:<resourcePath>`. Parsing is strict
//! because a malformed HRN indicates a broken statement, not an access denial.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use thiserror::Error;

use crate::core::identifiers::WILDCARD;
use crate::core::identifiers::is_uuid;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Scheme prefix of every resource identifier.
pub const HRN_SCHEME: &str = "hrn";

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Malformed resource identifier errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResourceIdentifierError {
    /// Identifier has fewer than three `:`-delimited parts.
    #[error("malformed resource identifier: expected `hrn:<organization>:<path>` in {0:?}")]
    MissingParts(String),
    /// Identifier does not start with the `hrn` scheme.
    #[error("malformed resource identifier: expected string to start with hrn: in {0:?}")]
    InvalidScheme(String),
    /// Organization segment is neither a UUID nor `*`.
    #[error("malformed resource identifier: expected UUID or * as organization in {0:?}")]
    InvalidOrganization(String),
    /// Resource path is empty.
    #[error("malformed resource identifier: expected resource path or * in {0:?}")]
    EmptyPath(String),
}

// ============================================================================
// SECTION: Resource Identifier
// ============================================================================

/// Parsed Hive Resource Name.
///
/// # Invariants
/// - `organization_id` is a UUID or `*`.
/// - `resource_path` is non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResourceIdentifier {
    /// Organization segment (UUID or `*`).
    organization_id: String,
    /// Slash-delimited resource path (may contain wildcards).
    resource_path: String,
}

impl ResourceIdentifier {
    /// Builds an identifier from already validated parts.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceIdentifierError`] when the parts violate the HRN invariants.
    pub fn new(
        organization_id: impl Into<String>,
        resource_path: impl Into<String>,
    ) -> Result<Self, ResourceIdentifierError> {
        let organization_id = organization_id.into();
        let resource_path = resource_path.into();
        if organization_id != WILDCARD && !is_uuid(&organization_id) {
            return Err(ResourceIdentifierError::InvalidOrganization(format!(
                "{HRN_SCHEME}:{organization_id}:{resource_path}"
            )));
        }
        if resource_path.is_empty() {
            return Err(ResourceIdentifierError::EmptyPath(format!(
                "{HRN_SCHEME}:{organization_id}:"
            )));
        }
        Ok(Self {
            organization_id,
            resource_path,
        })
    }

    /// Parses a `hrn:<organization>:<path>` string.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceIdentifierError`] when the identifier is malformed.
    pub fn parse(identifier: &str) -> Result<Self, ResourceIdentifierError> {
        let mut parts = identifier.splitn(3, ':');
        let (Some(scheme), Some(organization_id), Some(resource_path)) =
            (parts.next(), parts.next(), parts.next())
        else {
            return Err(ResourceIdentifierError::MissingParts(identifier.to_string()));
        };
        if scheme != HRN_SCHEME {
            return Err(ResourceIdentifierError::InvalidScheme(identifier.to_string()));
        }
        if organization_id != WILDCARD && !is_uuid(organization_id) {
            return Err(ResourceIdentifierError::InvalidOrganization(identifier.to_string()));
        }
        if resource_path.is_empty() {
            return Err(ResourceIdentifierError::EmptyPath(identifier.to_string()));
        }
        Ok(Self {
            organization_id: organization_id.to_string(),
            resource_path: resource_path.to_string(),
        })
    }

    /// Returns the organization segment.
    #[must_use]
    pub fn organization_id(&self) -> &str {
        &self.organization_id
    }

    /// Returns the resource path segment.
    #[must_use]
    pub fn resource_path(&self) -> &str {
        &self.resource_path
    }

    /// Returns true when the identifier applies to the given organization.
    #[must_use]
    pub fn matches_organization(&self, organization_id: &str) -> bool {
        self.organization_id == WILDCARD || self.organization_id == organization_id
    }

    /// Returns true when the identifier path matches any of the concrete paths.
    #[must_use]
    pub fn matches_any_path<S: AsRef<str>>(&self, concrete_paths: &[S]) -> bool {
        concrete_paths.iter().any(|path| match_resource_path(&self.resource_path, path.as_ref()))
    }
}

impl fmt::Display for ResourceIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{HRN_SCHEME}:{}:{}", self.organization_id, self.resource_path)
    }
}

// ============================================================================
// SECTION: Path Matching
// ============================================================================

/// Returns true when a wildcard-bearing path pattern matches a concrete path.
///
/// A `*` segment acts as a wildcard only in the last pattern position, where it
/// matches the remaining concrete path regardless of depth.
#[must_use]
pub fn match_resource_path(pattern: &str, concrete: &str) -> bool {
    let mut pattern_parts = pattern.split('/').peekable();
    let mut concrete_parts = concrete.split('/');
    loop {
        let pattern_part = pattern_parts.next();
        let concrete_part = concrete_parts.next();
        if pattern_part == Some(WILDCARD) && pattern_parts.peek().is_none() {
            return true;
        }
        match (pattern_part, concrete_part) {
            (None, None) => return true,
            (Some(expected), Some(actual)) if expected == actual => {}
            _ => return false,
        }
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
