// crates/hive-authz/tests/session_decisions.rs
// ============================================================================
// Module: Session Decision Tests
// Description: Allow/deny outcomes and error propagation through sessions.
// Purpose: Ensure denials and failures stay distinct at the session surface.
// ============================================================================

//! Session decision tests.

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

use std::sync::Arc;

use async_trait::async_trait;
use hive_authz::AccessErrorCode;
use hive_authz::AuthzError;
use hive_authz::Session;
use hive_authz::SessionBackend;
use hive_authz_core::Action;
use hive_authz_core::ActionParams;
use hive_authz_core::ActionRegistry;
use hive_authz_core::PolicyStatement;

const ORG: &str = "aaaaaaaa-aaaa-aaaa-aaaa-aaaaaaaaaaaa";
const OTHER_ORG: &str = "eeeeeeee-eeee-eeee-eeee-eeeeeeeeeeee";
const PROJECT_B: &str = "bbbbbbbb-bbbb-bbbb-bbbb-bbbbbbbbbbbb";
const PROJECT_C: &str = "cccccccc-cccc-cccc-cccc-cccccccccccc";
const TARGET: &str = "dddddddd-dddd-dddd-dddd-dddddddddddd";

struct StaticBackend {
    statements: Vec<PolicyStatement>,
}

#[async_trait]
impl SessionBackend for StaticBackend {
    fn kind(&self) -> &'static str {
        "static"
    }

    async fn load_policy_statements_for_organization(
        &self,
        _organization_id: &str,
    ) -> Result<Vec<PolicyStatement>, AuthzError> {
        Ok(self.statements.clone())
    }
}

struct FailingBackend;

#[async_trait]
impl SessionBackend for FailingBackend {
    fn kind(&self) -> &'static str {
        "failing"
    }

    async fn load_policy_statements_for_organization(
        &self,
        _organization_id: &str,
    ) -> Result<Vec<PolicyStatement>, AuthzError> {
        Err(AuthzError::StatementLoad("database unavailable".to_string()))
    }
}

fn session(statements: Vec<PolicyStatement>) -> Session {
    Session::new(
        Arc::new(StaticBackend {
            statements,
        }),
        Arc::new(ActionRegistry::new()),
    )
}

fn org_resource() -> String {
    format!("hrn:{ORG}:organization/{ORG}")
}

// ============================================================================
// SECTION: Scenarios
// ============================================================================

#[tokio::test]
async fn organization_describe_is_allowed_by_matching_statement() {
    let session = session(vec![PolicyStatement::allow("organization:describe", org_resource())]);
    session
        .assert_perform_action(Action::OrganizationDescribe, ORG, &ActionParams::organization(ORG))
        .await
        .unwrap();
}

#[tokio::test]
async fn empty_statements_raise_access_error() {
    let session = session(Vec::new());
    let err = session
        .assert_perform_action(Action::OrganizationDescribe, ORG, &ActionParams::organization(ORG))
        .await
        .unwrap_err();
    let AuthzError::Access(access) = err else {
        panic!("expected access error, got {err:?}");
    };
    assert_eq!(access.code(), AccessErrorCode::Unauthorised);
    assert_eq!(
        access.reason(),
        "Missing permission for performing 'organization:describe' on resource"
    );
    assert_eq!(
        access.to_string(),
        "No access (reason: \"Missing permission for performing 'organization:describe' on \
         resource\")"
    );
}

#[tokio::test]
async fn project_deny_vetoes_organization_allow() {
    let session = session(vec![
        PolicyStatement::allow("project:describe", org_resource()),
        PolicyStatement::deny("project:describe", format!("hrn:{ORG}:project/{PROJECT_C}")),
    ]);
    session
        .assert_perform_action(
            Action::ProjectDescribe,
            ORG,
            &ActionParams::project(ORG, PROJECT_B),
        )
        .await
        .unwrap();
    let denied = session
        .assert_perform_action(
            Action::ProjectDescribe,
            ORG,
            &ActionParams::project(ORG, PROJECT_C),
        )
        .await;
    assert!(matches!(denied, Err(AuthzError::Access(_))));
}

#[tokio::test]
async fn deny_wins_regardless_of_order() {
    let allow = PolicyStatement::allow("*", org_resource());
    let deny = PolicyStatement::deny("target:delete", format!("hrn:{ORG}:target/{TARGET}"));
    let params = ActionParams::target(ORG, PROJECT_B, TARGET);
    for statements in [vec![allow.clone(), deny.clone()], vec![deny, allow]] {
        let session = session(statements);
        let allowed =
            session.can_perform_action(Action::TargetDelete, ORG, &params).await.unwrap();
        assert!(!allowed);
    }
}

#[tokio::test]
async fn wildcard_actions_cover_only_their_namespace() {
    let session = session(vec![PolicyStatement::allow("project:*", org_resource())]);
    let project = ActionParams::project(ORG, PROJECT_B);
    assert!(session.can_perform_action(Action::ProjectDelete, ORG, &project).await.unwrap());
    let target = ActionParams::target(ORG, PROJECT_B, TARGET);
    assert!(!session.can_perform_action(Action::TargetDelete, ORG, &target).await.unwrap());
}

#[tokio::test]
async fn statements_of_one_organization_do_not_reach_another() {
    let session = session(vec![PolicyStatement::allow(
        "*",
        format!("hrn:{ORG}:organization/{OTHER_ORG}"),
    )]);
    let allowed = session
        .can_perform_action(
            Action::OrganizationDescribe,
            OTHER_ORG,
            &ActionParams::organization(OTHER_ORG),
        )
        .await
        .unwrap();
    assert!(!allowed);
}

#[tokio::test]
async fn organization_wildcard_statements_reach_service_actions() {
    let session = session(vec![PolicyStatement::allow(
        "schemaVersion:publish",
        format!("hrn:{ORG}:organization/{ORG}/*"),
    )]);
    let params = ActionParams::target(ORG, PROJECT_B, TARGET).with_service("products");
    assert!(session.can_perform_action(Action::SchemaVersionPublish, ORG, &params).await.unwrap());
}

// ============================================================================
// SECTION: Error Propagation
// ============================================================================

#[tokio::test]
async fn storage_failures_are_not_denials() {
    let session = Session::new(Arc::new(FailingBackend), Arc::new(ActionRegistry::new()));
    let result = session
        .can_perform_action(Action::OrganizationDescribe, ORG, &ActionParams::organization(ORG))
        .await;
    assert_eq!(result, Err(AuthzError::StatementLoad("database unavailable".to_string())));
}

#[tokio::test]
async fn malformed_statements_are_not_denials() {
    let session = session(vec![PolicyStatement::allow("*", "urn:nope:organization/x")]);
    let result = session
        .can_perform_action(Action::OrganizationDescribe, ORG, &ActionParams::organization(ORG))
        .await;
    assert!(matches!(result, Err(AuthzError::MalformedStatement(_))));
}

#[tokio::test]
async fn missing_identifiers_are_invalid_params() {
    let session = session(vec![PolicyStatement::allow("*", org_resource())]);
    let result = session
        .can_perform_action(Action::TargetDelete, ORG, &ActionParams::project(ORG, PROJECT_B))
        .await;
    assert!(matches!(result, Err(AuthzError::InvalidParams(_))));
}

#[tokio::test]
async fn non_uuid_identifiers_are_invalid_params() {
    let session = session(vec![PolicyStatement::allow("*", org_resource())]);
    let wildcard_project = ActionParams::project(ORG, "*");
    let slug_target = ActionParams::target(ORG, PROJECT_B, "production");
    for (action, params) in
        [(Action::ProjectDescribe, &wildcard_project), (Action::TargetDelete, &slug_target)]
    {
        let result = session.can_perform_action(action, ORG, params).await;
        let Err(AuthzError::InvalidParams(message)) = result else {
            panic!("expected invalid params for {action}");
        };
        assert!(message.ends_with("must be a uuid"), "{message}");
    }
}

#[tokio::test]
async fn identifiers_finer_than_the_action_level_are_ignored() {
    let session = session(vec![PolicyStatement::allow("*", org_resource())]);
    let params = ActionParams::project(ORG, "*");
    assert!(session.can_perform_action(Action::OrganizationDescribe, ORG, &params).await.unwrap());
}

// ============================================================================
// SECTION: Identity Defaults
// ============================================================================

#[tokio::test]
async fn default_identity_accessors_reject() {
    let session = session(Vec::new());
    let Err(AuthzError::Access(viewer)) = session.viewer().await else {
        panic!("viewer must be rejected");
    };
    assert_eq!(viewer.code(), AccessErrorCode::Unauthenticated);
    assert_eq!(viewer.reason(), "Authorization token is missing");

    let selector = session.legacy_selector().unwrap_err();
    assert_eq!(selector.code(), AccessErrorCode::Unauthorised);
    assert_eq!(selector.reason(), "Authorization header is missing");
    assert!(!session.is_viewer());
}

#[tokio::test]
async fn unauthenticated_sessions_deny_everything() {
    let session = Session::unauthenticated(Arc::new(ActionRegistry::new()));
    assert_eq!(session.kind(), "unauthenticated");
    for action in [Action::OrganizationDescribe, Action::MemberModify, Action::BillingUpdate] {
        let allowed = session
            .can_perform_action(action, ORG, &ActionParams::organization(ORG))
            .await
            .unwrap();
        assert!(!allowed);
    }
}
