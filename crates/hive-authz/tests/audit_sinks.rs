// crates/hive-authz/tests/audit_sinks.rs
// ============================================================================
// Module: Audit Sink Tests
// Description: JSON line output of the configured audit sinks.
// Purpose: Ensure decisions, resets, and authentication outcomes are recorded.
// ============================================================================

//! Audit sink tests.

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

use std::fs;
use std::path::Path;
use std::sync::Arc;

use hive_authz::Authenticator;
use hive_authz::RequestContext;
use hive_authz::audit_sink_from_config;
use hive_authz_config::AuditConfig;
use hive_authz_config::AuditSinkKind;
use hive_authz_core::Action;
use hive_authz_core::ActionParams;
use hive_authz_core::ActionRegistry;
use serde_json::Value;

const ORG: &str = "aaaaaaaa-aaaa-aaaa-aaaa-aaaaaaaaaaaa";

fn read_events(path: &Path) -> Vec<Value> {
    fs::read_to_string(path)
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect()
}

#[tokio::test]
async fn file_sink_records_the_session_lifecycle() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("authz-audit.jsonl");
    let config = AuditConfig {
        sink: AuditSinkKind::File,
        path: Some(path.display().to_string()),
    };
    let sink = audit_sink_from_config(&config).unwrap();
    let authenticator = Authenticator::new(Arc::new(ActionRegistry::new()))
        .with_audit_sink(sink)
        .with_max_authorization_header_bytes(32);

    let rejected = authenticator
        .authenticate(
            &RequestContext::with_authorization(format!("Bearer {}", "x".repeat(64)))
                .with_request_id("req-1"),
        )
        .await;
    assert!(rejected.is_err());

    let session = authenticator
        .authenticate(&RequestContext::default().with_request_id("req-2"))
        .await
        .unwrap();
    let params = ActionParams::organization(ORG);
    assert!(!session.can_perform_action(Action::OrganizationDescribe, ORG, &params).await.unwrap());
    assert!(!session.can_perform_action(Action::OrganizationDescribe, ORG, &params).await.unwrap());
    session.reset();

    let events = read_events(&path);
    let names: Vec<&str> = events.iter().map(|event| event["event"].as_str().unwrap()).collect();
    assert_eq!(names, [
        "authn_session",
        "authn_session",
        "authz_decision",
        "authz_decision",
        "authz_cache_reset"
    ]);

    assert_eq!(events[0]["outcome"], "rejected");
    assert_eq!(events[0]["request_id"], "req-1");
    assert_eq!(events[0]["error"], "invalid credential: authorization header too large");
    assert_eq!(events[1]["outcome"], "unauthenticated");
    assert_eq!(events[1]["request_id"], "req-2");

    assert_eq!(events[2]["action"], "organization:describe");
    assert_eq!(events[2]["session_kind"], "unauthenticated");
    assert_eq!(events[2]["outcome"], "deny");
    assert_eq!(events[2]["reason"], "no_matching_allow");
    assert_eq!(events[2]["cached"], false);
    assert_eq!(events[3]["cached"], true);

    assert_eq!(events[4]["decisions_cleared"], 1);
    assert_eq!(events[4]["statements_cleared"], 1);
    assert!(events.iter().all(|event| event["timestamp_ms"].as_u64().is_some()));
}

#[test]
fn file_sink_appends_to_existing_logs() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("audit.jsonl");
    fs::write(&path, "{\"event\":\"previous\"}\n").unwrap();
    let config = AuditConfig {
        sink: AuditSinkKind::File,
        path: Some(format!("  {}  ", path.display())),
    };
    let sink = audit_sink_from_config(&config).unwrap();
    sink.record_reset(&hive_authz::audit::AuthzCacheResetEvent::new("member", 0, 0));
    let events = read_events(&path);
    assert_eq!(events.len(), 2);
    assert_eq!(events[0]["event"], "previous");
    assert_eq!(events[1]["event"], "authz_cache_reset");
    assert_eq!(events[1]["session_kind"], "member");
}

#[test]
fn file_sink_without_a_path_is_an_error() {
    let config = AuditConfig {
        sink: AuditSinkKind::File,
        path: None,
    };
    assert!(audit_sink_from_config(&config).is_err());
}

#[test]
fn file_sink_in_a_missing_directory_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let config = AuditConfig {
        sink: AuditSinkKind::File,
        path: Some(dir.path().join("missing").join("audit.jsonl").display().to_string()),
    };
    assert!(audit_sink_from_config(&config).is_err());
}

#[test]
fn non_file_sinks_build() {
    for sink in [AuditSinkKind::Stderr, AuditSinkKind::None] {
        let config = AuditConfig {
            sink,
            path: None,
        };
        assert!(audit_sink_from_config(&config).is_ok());
    }
}
