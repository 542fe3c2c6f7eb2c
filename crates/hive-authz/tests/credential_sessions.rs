// crates/hive-authz/tests/credential_sessions.rs
// ============================================================================
// Module: Credential Session Tests
// Description: End-to-end sessions for members, access keys, and legacy tokens.
// Purpose: Ensure each credential kind yields exactly the statements it grants.
// ============================================================================

//! Credential-backed session tests.

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

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use hive_authz::AuthnError;
use hive_authz::AuthnStores;
use hive_authz::Authenticator;
use hive_authz::AuthzError;
use hive_authz::AuthzNoopAuditSink;
use hive_authz::MembershipRecord;
use hive_authz::MembershipStore;
use hive_authz::OrganizationAccessTokenRecord;
use hive_authz::OrganizationAccessTokenStore;
use hive_authz::RequestContext;
use hive_authz::Session;
use hive_authz::TargetAccessTokenRecord;
use hive_authz::TargetAccessTokenStore;
use hive_authz::Viewer;
use hive_authz::access_key;
use hive_authz::member::MemberRoleRecord;
use hive_authz_config::AuthnConfig;
use hive_authz_core::Action;
use hive_authz_core::ActionParams;
use hive_authz_core::ActionRegistry;
use hive_authz_core::AssignedAppDeployments;
use hive_authz_core::AssignedServices;
use hive_authz_core::AssignedTargets;
use hive_authz_core::LegacyScope;
use hive_authz_core::LegacyTargetScope;
use hive_authz_core::ProjectAssignmentNode;
use hive_authz_core::ResourceAssignmentGroup;
use hive_authz_core::TargetAssignmentNode;

const ORG: &str = "aaaaaaaa-aaaa-aaaa-aaaa-aaaaaaaaaaaa";
const OTHER_ORG: &str = "eeeeeeee-eeee-eeee-eeee-eeeeeeeeeeee";
const PROJECT: &str = "bbbbbbbb-bbbb-bbbb-bbbb-bbbbbbbbbbbb";
const TARGET: &str = "dddddddd-dddd-dddd-dddd-dddddddddddd";
const OTHER_TARGET: &str = "dddddddd-0000-0000-0000-dddddddddddd";
const TOKEN_ID: &str = "11111111-1111-1111-1111-111111111111";
const LEGACY_TOKEN: &str = "0123456789abcdef0123456789abcdef";

// ============================================================================
// SECTION: In-Memory Stores
// ============================================================================

#[derive(Default)]
struct MemoryStore {
    users: HashMap<String, Viewer>,
    memberships: HashMap<(String, String), MembershipRecord>,
    access_tokens: HashMap<String, OrganizationAccessTokenRecord>,
    target_tokens: HashMap<String, TargetAccessTokenRecord>,
}

#[async_trait]
impl MembershipStore for MemoryStore {
    async fn find_user(&self, subject: &str) -> Result<Option<Viewer>, AuthnError> {
        Ok(self.users.get(subject).cloned())
    }

    async fn find_membership(
        &self,
        organization_id: &str,
        user_id: &str,
    ) -> Result<Option<MembershipRecord>, AuthnError> {
        Ok(self.memberships.get(&(organization_id.to_string(), user_id.to_string())).cloned())
    }
}

#[async_trait]
impl OrganizationAccessTokenStore for MemoryStore {
    async fn find_by_id(
        &self,
        id: &str,
    ) -> Result<Option<OrganizationAccessTokenRecord>, AuthnError> {
        Ok(self.access_tokens.get(id).cloned())
    }
}

#[async_trait]
impl TargetAccessTokenStore for MemoryStore {
    async fn find_by_token(
        &self,
        token: &str,
    ) -> Result<Option<TargetAccessTokenRecord>, AuthnError> {
        Ok(self.target_tokens.get(token).cloned())
    }
}

fn single_target_assignment() -> ResourceAssignmentGroup {
    ResourceAssignmentGroup::Granular {
        projects: vec![ProjectAssignmentNode {
            id: PROJECT.to_string(),
            targets: AssignedTargets::Granular {
                targets: vec![TargetAssignmentNode {
                    id: TARGET.to_string(),
                    services: AssignedServices::Wildcard,
                    app_deployments: AssignedAppDeployments::Wildcard,
                }],
            },
        }],
    }
}

fn membership(user_id: &str, is_owner: bool, role: MemberRoleRecord) -> MembershipRecord {
    MembershipRecord {
        organization_id: ORG.to_string(),
        user_id: user_id.to_string(),
        is_owner,
        role,
        assigned_resources: None,
    }
}

fn role(name: &str, permissions: Option<Vec<Action>>) -> MemberRoleRecord {
    MemberRoleRecord {
        name: name.to_string(),
        permissions,
        legacy_scopes: Vec::new(),
    }
}

fn viewer(id: &str) -> Viewer {
    Viewer {
        id: id.to_string(),
        email: format!("{id}@example.com"),
        display_name: id.to_string(),
    }
}

/// Builds a populated store and returns it with a valid access key.
fn populated_store() -> (Arc<MemoryStore>, String) {
    let mut store = MemoryStore::default();
    for user in ["owner", "viewer", "editor"] {
        store.users.insert(format!("subject-{user}"), viewer(user));
    }
    let memberships = [
        membership("owner", true, role("Custom", None)),
        membership("viewer", false, role("Viewer", Some(vec![Action::OrganizationDelete]))),
        MembershipRecord {
            assigned_resources: Some(single_target_assignment()),
            ..membership(
                "editor",
                false,
                role(
                    "Editor",
                    Some(vec![Action::TargetModifySettings, Action::SchemaVersionPublish]),
                ),
            )
        },
    ];
    for record in memberships {
        store.memberships.insert((ORG.to_string(), record.user_id.clone()), record);
    }

    let (record, key) = OrganizationAccessTokenRecord::issue(
        TOKEN_ID,
        ORG,
        "ci",
        &[Action::SchemaVersionPublish, Action::UsageReport, Action::BillingUpdate],
        single_target_assignment(),
    );
    store.access_tokens.insert(TOKEN_ID.to_string(), record);

    store.target_tokens.insert(LEGACY_TOKEN.to_string(), TargetAccessTokenRecord {
        organization_id: ORG.to_string(),
        project_id: PROJECT.to_string(),
        target_id: TARGET.to_string(),
        scopes: vec![LegacyScope::Target(LegacyTargetScope::RegistryRead)],
    });
    (Arc::new(store), key)
}

fn authenticator(store: &Arc<MemoryStore>) -> Authenticator {
    Authenticator::from_config(
        &AuthnConfig::default(),
        AuthnStores {
            memberships: Some(store.clone()),
            organization_access_tokens: Some(store.clone()),
            target_access_tokens: Some(store.clone()),
        },
        Arc::new(ActionRegistry::new()),
        Arc::new(AuthzNoopAuditSink),
    )
    .unwrap()
}

async fn member_session(subject: &str) -> Session {
    let (store, _) = populated_store();
    authenticator(&store).authenticate(&RequestContext::with_subject(subject)).await.unwrap()
}

async fn allowed(session: &Session, action: Action, params: &ActionParams) -> bool {
    session.can_perform_action(action, &params.organization_id, params).await.unwrap()
}

// ============================================================================
// SECTION: Members
// ============================================================================

#[tokio::test]
async fn chain_runs_in_configured_order() {
    let (store, _) = populated_store();
    assert_eq!(authenticator(&store).strategy_names(), [
        "member_subject",
        "organization_access_token",
        "target_access_token"
    ]);
}

#[tokio::test]
async fn owners_may_do_anything_in_their_organization_only() {
    let session = member_session("subject-owner").await;
    assert_eq!(session.kind(), "member");
    assert!(session.is_viewer());
    assert_eq!(session.viewer().await.unwrap().id, "owner");
    assert!(allowed(&session, Action::BillingUpdate, &ActionParams::organization(ORG)).await);
    assert!(
        allowed(
            &session,
            Action::AppDeploymentRetire,
            &ActionParams::target(ORG, PROJECT, TARGET).with_app_deployment("web")
        )
        .await
    );
    assert!(!allowed(&session, Action::BillingUpdate, &ActionParams::organization(OTHER_ORG)).await);
}

#[tokio::test]
async fn viewer_role_ignores_stored_permissions() {
    let session = member_session("subject-viewer").await;
    assert!(allowed(&session, Action::OrganizationDescribe, &ActionParams::organization(ORG)).await);
    assert!(allowed(&session, Action::ProjectDescribe, &ActionParams::project(ORG, PROJECT)).await);
    assert!(!allowed(&session, Action::ProjectDelete, &ActionParams::project(ORG, PROJECT)).await);
    assert!(!allowed(&session, Action::OrganizationDelete, &ActionParams::organization(ORG)).await);
}

#[tokio::test]
async fn granular_roles_apply_to_assigned_resources_only() {
    let session = member_session("subject-editor").await;
    let own = ActionParams::target(ORG, PROJECT, TARGET);
    let other = ActionParams::target(ORG, PROJECT, OTHER_TARGET);
    assert!(allowed(&session, Action::TargetModifySettings, &own).await);
    assert!(!allowed(&session, Action::TargetModifySettings, &other).await);
    let publish = own.clone().with_service("products");
    assert!(!allowed(&session, Action::SchemaVersionPublish, &publish).await);
    assert!(allowed(&session, Action::OrganizationDescribe, &ActionParams::organization(ORG)).await);
}

#[tokio::test]
async fn non_uuid_organizations_grant_nothing() {
    let session = member_session("subject-owner").await;
    let params = ActionParams::organization("my-org-slug");
    assert!(!allowed(&session, Action::OrganizationDescribe, &params).await);
}

#[tokio::test]
async fn unknown_users_are_denied_not_failed() {
    let session = member_session("subject-ghost").await;
    let Err(AuthzError::Access(err)) = session.viewer().await else {
        panic!("expected access error");
    };
    assert_eq!(err.reason(), "User not found");
    assert!(!allowed(&session, Action::OrganizationDescribe, &ActionParams::organization(ORG)).await);
}

// ============================================================================
// SECTION: Organization Access Tokens
// ============================================================================

#[tokio::test]
async fn access_key_sessions_carry_token_statements() {
    let (store, key) = populated_store();
    let record = store.access_tokens.get(TOKEN_ID).unwrap();
    assert_eq!(record.permissions.len(), 2);
    assert!(!record.permissions.contains(&Action::BillingUpdate));

    let session = authenticator(&store)
        .authenticate(&RequestContext::with_authorization(format!("Bearer {key}")))
        .await
        .unwrap();
    assert_eq!(session.kind(), "organization_access_token");
    let publish = ActionParams::target(ORG, PROJECT, TARGET).with_service("products");
    assert!(allowed(&session, Action::SchemaVersionPublish, &publish).await);
    assert!(allowed(&session, Action::UsageReport, &ActionParams::target(ORG, PROJECT, TARGET)).await);
    let elsewhere = ActionParams::target(ORG, PROJECT, OTHER_TARGET).with_service("products");
    assert!(!allowed(&session, Action::SchemaVersionPublish, &elsewhere).await);
    assert!(!allowed(&session, Action::BillingUpdate, &ActionParams::organization(ORG)).await);
}

#[tokio::test]
async fn access_keys_with_bad_secrets_are_rejected() {
    let (store, _) = populated_store();
    let authenticator = authenticator(&store);
    for key in [
        access_key::encode(TOKEN_ID, "not-the-secret"),
        access_key::encode("22222222-2222-2222-2222-222222222222", "secret"),
        access_key::encode("not-a-uuid", "secret"),
        "hvo1/???".to_string(),
    ] {
        let result = authenticator
            .authenticate(&RequestContext::with_authorization(format!("Bearer {key}")))
            .await;
        assert!(matches!(result, Err(AuthnError::InvalidCredential(_))), "key {key}");
    }
}

#[test]
fn token_statements_default_to_the_whole_organization() {
    let record = OrganizationAccessTokenRecord {
        id: TOKEN_ID.to_string(),
        organization_id: ORG.to_string(),
        title: "ops".to_string(),
        permissions: vec![Action::ProjectDescribe, Action::OidcModify],
        assigned_resources: None,
        first_characters: "hvo1/abcde".to_string(),
        hash: String::new(),
    };
    let statements = record.authorization_policy_statements();
    assert_eq!(statements.len(), 1);
    assert_eq!(statements[0].actions(), ["project:describe".to_string()]);
    assert_eq!(statements[0].resources(), [format!("hrn:{ORG}:organization/{ORG}")]);
}

// ============================================================================
// SECTION: Legacy Target Tokens
// ============================================================================

#[tokio::test]
async fn legacy_tokens_are_bound_to_their_target() {
    let (store, _) = populated_store();
    let session = authenticator(&store)
        .authenticate(&RequestContext::with_authorization(format!("Bearer {LEGACY_TOKEN}")))
        .await
        .unwrap();
    assert_eq!(session.kind(), "target_access_token");
    let selector = session.legacy_selector().unwrap();
    assert_eq!(selector.target_id, TARGET);
    assert_eq!(selector.project_id, PROJECT);
    assert_eq!(selector.token, LEGACY_TOKEN);

    let own = ActionParams::target(ORG, PROJECT, TARGET);
    let other = ActionParams::target(ORG, PROJECT, OTHER_TARGET);
    assert!(allowed(&session, Action::SchemaLoadFromRegistry, &own).await);
    assert!(!allowed(&session, Action::SchemaLoadFromRegistry, &other).await);
    assert!(!allowed(&session, Action::TargetDelete, &own).await);
}

#[tokio::test]
async fn unknown_legacy_tokens_are_rejected() {
    let (store, _) = populated_store();
    let result = authenticator(&store)
        .authenticate(&RequestContext::with_authorization(
            "Bearer ffffffffffffffffffffffffffffffff",
        ))
        .await;
    assert!(matches!(result, Err(AuthnError::InvalidCredential(_))));
}

#[tokio::test]
async fn unrecognized_bearer_tokens_fall_through() {
    let (store, _) = populated_store();
    let session = authenticator(&store)
        .authenticate(&RequestContext::with_authorization("Bearer not-a-known-format"))
        .await
        .unwrap();
    assert_eq!(session.kind(), "unauthenticated");
}
