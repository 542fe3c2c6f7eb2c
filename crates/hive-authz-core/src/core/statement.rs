// crates/hive-authz-core/src/core/statement.rs
// ============================================================================
// Module: Policy Statements
// Description: Allow/deny statements pairing action and resource patterns.
// Purpose: Provide the stored, JSON-compatible statement representation.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! A policy statement is `{ effect, action, resource }` where `action` and
//! `resource` are each a single pattern or a list of patterns. Resource
//! patterns stay unparsed strings here; the evaluator parses them so that a
//! malformed stored statement surfaces as an error at evaluation time.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::slice;

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Effect
// ============================================================================

/// Statement effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Effect {
    /// Grants the matched actions.
    Allow,
    /// Vetoes the matched actions regardless of any allow.
    Deny,
}

// ============================================================================
// SECTION: One Or Many
// ============================================================================

/// Single value or list, as accepted by the stored statement format.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    /// Single value.
    One(T),
    /// List of values.
    Many(Vec<T>),
}

impl<T> OneOrMany<T> {
    /// Returns the values as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        match self {
            Self::One(value) => slice::from_ref(value),
            Self::Many(values) => values,
        }
    }
}

impl From<&str> for OneOrMany<String> {
    fn from(value: &str) -> Self {
        Self::One(value.to_string())
    }
}

impl From<String> for OneOrMany<String> {
    fn from(value: String) -> Self {
        Self::One(value)
    }
}

impl From<Vec<String>> for OneOrMany<String> {
    fn from(values: Vec<String>) -> Self {
        Self::Many(values)
    }
}

impl From<Vec<&str>> for OneOrMany<String> {
    fn from(values: Vec<&str>) -> Self {
        Self::Many(values.into_iter().map(str::to_string).collect())
    }
}

// ============================================================================
// SECTION: Statement
// ============================================================================

/// Authorization policy statement.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PolicyStatement {
    /// Allow or deny.
    pub effect: Effect,
    /// Action patterns (`*`, `<namespace>:*`, or an exact action).
    pub action: OneOrMany<String>,
    /// Resource identifiers in HRN form, possibly ending in `*`.
    pub resource: OneOrMany<String>,
}

impl PolicyStatement {
    /// Builds an allow statement.
    #[must_use]
    pub fn allow(
        action: impl Into<OneOrMany<String>>,
        resource: impl Into<OneOrMany<String>>,
    ) -> Self {
        Self {
            effect: Effect::Allow,
            action: action.into(),
            resource: resource.into(),
        }
    }

    /// Builds a deny statement.
    #[must_use]
    pub fn deny(
        action: impl Into<OneOrMany<String>>,
        resource: impl Into<OneOrMany<String>>,
    ) -> Self {
        Self {
            effect: Effect::Deny,
            action: action.into(),
            resource: resource.into(),
        }
    }

    /// Returns the action patterns.
    #[must_use]
    pub fn actions(&self) -> &[String] {
        self.action.as_slice()
    }

    /// Returns the resource identifiers.
    #[must_use]
    pub fn resources(&self) -> &[String] {
        self.resource.as_slice()
    }
}
