// crates/hive-authz-core/tests/hrn.rs
// ============================================================================
// Module: Resource Identifier Tests
// Description: Parse errors and path matching for Hive resource names.
// Purpose: Ensure malformed identifiers fail loudly and wildcards behave.
// ============================================================================

//! Resource identifier codec tests.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only assertions and helpers are permitted."
)]

use hive_authz_core::ResourceIdentifier;
use hive_authz_core::ResourceIdentifierError;
use hive_authz_core::match_resource_path;

const ORG: &str = "aaaaaaaa-aaaa-aaaa-aaaa-aaaaaaaaaaaa";
const OTHER_ORG: &str = "bbbbbbbb-bbbb-bbbb-bbbb-bbbbbbbbbbbb";

// ============================================================================
// SECTION: Parsing
// ============================================================================

#[test]
fn parses_organization_and_path() {
    let parsed = ResourceIdentifier::parse(&format!("hrn:{ORG}:project/p1")).unwrap();
    assert_eq!(parsed.organization_id(), ORG);
    assert_eq!(parsed.resource_path(), "project/p1");
}

#[test]
fn accepts_wildcard_organization() {
    let parsed = ResourceIdentifier::parse("hrn:*:*").unwrap();
    assert!(parsed.matches_organization(ORG));
    assert!(parsed.matches_organization(OTHER_ORG));
}

#[test]
fn rejects_too_few_parts() {
    assert_eq!(
        ResourceIdentifier::parse("hrn:*"),
        Err(ResourceIdentifierError::MissingParts("hrn:*".to_string()))
    );
    assert!(matches!(
        ResourceIdentifier::parse("organization"),
        Err(ResourceIdentifierError::MissingParts(_))
    ));
}

#[test]
fn rejects_wrong_scheme() {
    assert!(matches!(
        ResourceIdentifier::parse(&format!("arn:{ORG}:organization/{ORG}")),
        Err(ResourceIdentifierError::InvalidScheme(_))
    ));
}

#[test]
fn rejects_non_uuid_organization() {
    assert!(matches!(
        ResourceIdentifier::parse("hrn:acme:organization/acme"),
        Err(ResourceIdentifierError::InvalidOrganization(_))
    ));
    assert!(matches!(
        ResourceIdentifier::parse("hrn::organization/x"),
        Err(ResourceIdentifierError::InvalidOrganization(_))
    ));
}

#[test]
fn rejects_empty_path() {
    assert!(matches!(
        ResourceIdentifier::parse(&format!("hrn:{ORG}:")),
        Err(ResourceIdentifierError::EmptyPath(_))
    ));
}

#[test]
fn new_validates_like_parse() {
    assert!(ResourceIdentifier::new("not-a-uuid", "organization/x").is_err());
    assert!(ResourceIdentifier::new(ORG, "").is_err());
    let built = ResourceIdentifier::new(ORG, "target/t").unwrap();
    assert_eq!(built.to_string(), format!("hrn:{ORG}:target/t"));
}

#[test]
fn concrete_organization_never_matches_another() {
    let parsed = ResourceIdentifier::parse(&format!("hrn:{ORG}:*")).unwrap();
    assert!(!parsed.matches_organization(OTHER_ORG));
}

// ============================================================================
// SECTION: Path Matching
// ============================================================================

#[test]
fn exact_paths_match_only_themselves() {
    assert!(match_resource_path("project/p1", "project/p1"));
    assert!(!match_resource_path("project/p1", "project/p2"));
    assert!(!match_resource_path("project/p1", "project/p1/extra"));
    assert!(!match_resource_path("project/p1/extra", "project/p1"));
}

#[test]
fn trailing_wildcard_matches_any_depth() {
    assert!(match_resource_path("*", "organization/o"));
    assert!(match_resource_path("target/t/*", "target/t/service/users"));
    assert!(match_resource_path("target/t/*", "target/t/appDeployment/web"));
    assert!(match_resource_path("target/t/*", "target/t"));
    assert!(!match_resource_path("target/t/*", "target/u/service/users"));
}

#[test]
fn matches_any_path_checks_each_candidate() {
    let parsed = ResourceIdentifier::parse(&format!("hrn:{ORG}:project/p1")).unwrap();
    assert!(parsed.matches_any_path(&["organization/o", "project/p1", "target/t"]));
    assert!(!parsed.matches_any_path(&["organization/o", "project/p2"]));
    let empty: [&str; 0] = [];
    assert!(!parsed.matches_any_path(&empty));
}
