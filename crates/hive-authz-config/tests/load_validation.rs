//! Config load validation tests for hive-authz-config.
// crates/hive-authz-config/tests/load_validation.rs
// =============================================================================
// Module: Config Load Validation Tests
// Description: Validate config loading guards (path, size, encoding).
// Purpose: Ensure config input handling is strict and fail-closed.
// =============================================================================

use std::io::Write;
use std::path::Path;

use hive_authz_config::AuditSinkKind;
use hive_authz_config::ConfigError;
use hive_authz_config::HiveAuthzConfig;
use tempfile::NamedTempFile;

type TestResult = Result<(), String>;

fn assert_invalid(result: Result<HiveAuthzConfig, ConfigError>, needle: &str) -> TestResult {
    match result {
        Err(error) => {
            let message = error.to_string();
            if message.contains(needle) {
                Ok(())
            } else {
                Err(format!("error {message} did not contain {needle}"))
            }
        }
        Ok(_) => Err("expected invalid config load".to_string()),
    }
}

fn write_config(content: &[u8]) -> Result<NamedTempFile, String> {
    let mut file = NamedTempFile::new().map_err(|err| err.to_string())?;
    file.write_all(content).map_err(|err| err.to_string())?;
    Ok(file)
}

#[test]
fn load_rejects_path_too_long() -> TestResult {
    let long_path = "a".repeat(5_000);
    assert_invalid(HiveAuthzConfig::load(Some(Path::new(&long_path))), "config path exceeds max length")
}

#[test]
fn load_rejects_path_component_too_long() -> TestResult {
    let long_component = "a".repeat(300);
    assert_invalid(
        HiveAuthzConfig::load(Some(Path::new(&long_component))),
        "config path component too long",
    )
}

#[test]
fn load_rejects_missing_file() -> TestResult {
    let dir = tempfile::tempdir().map_err(|err| err.to_string())?;
    let path = dir.path().join("absent.toml");
    assert_invalid(HiveAuthzConfig::load(Some(&path)), "config io error")
}

#[test]
fn load_rejects_oversized_file() -> TestResult {
    let file = write_config(&vec![b'#'; 1_048_577])?;
    assert_invalid(HiveAuthzConfig::load(Some(file.path())), "config file exceeds size limit")
}

#[test]
fn load_rejects_non_utf8_file() -> TestResult {
    let file = write_config(&[0xFF, 0xFE, 0xFF])?;
    assert_invalid(HiveAuthzConfig::load(Some(file.path())), "config file must be utf-8")
}

#[test]
fn load_rejects_malformed_toml() -> TestResult {
    let file = write_config(b"[authn\nmax_authorization_header_bytes = 1")?;
    assert_invalid(HiveAuthzConfig::load(Some(file.path())), "config parse error")
}

#[test]
fn load_rejects_unknown_sections() -> TestResult {
    let file = write_config(b"[server]\nbind = \"0.0.0.0:1\"\n")?;
    assert_invalid(HiveAuthzConfig::load(Some(file.path())), "config parse error")
}

#[test]
fn load_accepts_empty_file_with_defaults() -> TestResult {
    let file = write_config(b"")?;
    let config = HiveAuthzConfig::load(Some(file.path())).map_err(|err| err.to_string())?;
    if config != HiveAuthzConfig::default() {
        return Err("empty config must equal defaults".to_string());
    }
    if config.audit.sink != AuditSinkKind::None {
        return Err("audit must default to none".to_string());
    }
    Ok(())
}

#[test]
fn load_reads_a_full_config() -> TestResult {
    let file = write_config(
        br#"
[authn]
max_authorization_header_bytes = 4096
validation_cache_max_entries = 50

[authn.strategies]
target_access_token = false

[audit]
sink = "file"
path = "/var/log/hive-authz.jsonl"
"#,
    )?;
    let config = HiveAuthzConfig::load(Some(file.path())).map_err(|err| err.to_string())?;
    if config.authn.max_authorization_header_bytes != 4096 {
        return Err("header limit not applied".to_string());
    }
    if config.authn.validation_cache_max_entries != 50 {
        return Err("cache limit not applied".to_string());
    }
    if config.authn.strategies.target_access_token
        || !config.authn.strategies.member_subject
        || !config.authn.strategies.organization_access_token
    {
        return Err("strategy toggles not applied".to_string());
    }
    if config.audit.sink != AuditSinkKind::File {
        return Err("audit sink not applied".to_string());
    }
    Ok(())
}
