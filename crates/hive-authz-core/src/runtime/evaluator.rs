// crates/hive-authz-core/src/runtime/evaluator.rs
// ============================================================================
// Module: Policy Evaluator
// Description: Allow/deny evaluation of statements for a single request.
// Purpose: Decide one authorization check with explicit-deny precedence.
// Dependencies: crate::core, crate::runtime::matcher
// ============================================================================

//! ## Overview
//! A statement applies when its organization segment is `*` or the requested
//! organization, and one of its resource patterns matches one of the
//! requested resource paths. An applicable statement whose action pattern
//! covers the requested action either vetoes (deny) or grants (allow).
//! Invariants:
//! - A matching deny wins regardless of statement order.
//! - Without a matching allow the decision is a deny.
//! - Every resource of an inspected statement is parsed; a malformed one is an error.

// ============================================================================
// SECTION: Imports
// ============================================================================

use crate::core::hrn::ResourceIdentifier;
use crate::core::hrn::ResourceIdentifierError;
use crate::core::statement::Effect;
use crate::core::statement::PolicyStatement;
use crate::runtime::matcher::match_action;

// ============================================================================
// SECTION: Decision
// ============================================================================

/// Why a request was denied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenyReason {
    /// A deny statement matched.
    ExplicitDeny,
    /// No allow statement matched.
    NoMatchingAllow,
}

impl DenyReason {
    /// Returns a stable label for the reason.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ExplicitDeny => "explicit_deny",
            Self::NoMatchingAllow => "no_matching_allow",
        }
    }
}

/// Outcome of a single authorization check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// The request is allowed.
    Allow,
    /// The request is denied.
    Deny(DenyReason),
}

impl Decision {
    /// Returns true for [`Decision::Allow`].
    #[must_use]
    pub const fn is_allowed(self) -> bool {
        matches!(self, Self::Allow)
    }
}

// ============================================================================
// SECTION: Evaluation
// ============================================================================

/// Evaluates statements for an action on the requested resource paths.
///
/// # Errors
///
/// Returns [`ResourceIdentifierError`] when an inspected statement carries a
/// malformed resource identifier.
pub fn evaluate_statements<S: AsRef<str>>(
    statements: &[PolicyStatement],
    action: &str,
    organization_id: &str,
    resource_paths: &[S],
) -> Result<Decision, ResourceIdentifierError> {
    let mut allowed = false;
    for statement in statements {
        let resources = statement
            .resources()
            .iter()
            .map(|resource| ResourceIdentifier::parse(resource))
            .collect::<Result<Vec<_>, _>>()?;
        let applies = resources.iter().any(|resource| {
            resource.matches_organization(organization_id)
                && resource.matches_any_path(resource_paths)
        });
        if !applies {
            continue;
        }
        if !statement.actions().iter().any(|pattern| match_action(pattern, action)) {
            continue;
        }
        match statement.effect {
            Effect::Deny => return Ok(Decision::Deny(DenyReason::ExplicitDeny)),
            Effect::Allow => allowed = true,
        }
    }
    if allowed { Ok(Decision::Allow) } else { Ok(Decision::Deny(DenyReason::NoMatchingAllow)) }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
