// crates/hive-authz-config/src/config.rs
// ============================================================================
// Module: Hive Authz Configuration
// Description: Configuration loading and validation for the authz runtime.
// Purpose: Provide strict, fail-closed config parsing with hard limits.
// Dependencies: serde, thiserror, toml
// ============================================================================

//! ## Overview
//! Configuration is loaded from a TOML file with strict size and path limits.
//! Every section is optional and defaults to the safest working setup: all
//! authentication strategies enabled and no audit output.
//! Invariants:
//! - Numeric limits are bounded on both sides.
//! - A file audit sink always has a path; other sinks never do.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::env;
use std::fs;
use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default configuration filename when no path is specified.
const DEFAULT_CONFIG_NAME: &str = "hive-authz.toml";
/// Environment variable holding the config path.
pub const CONFIG_ENV_VAR: &str = "HIVE_AUTHZ_CONFIG";
/// Maximum size of the configuration file in bytes.
pub const MAX_CONFIG_FILE_SIZE: usize = 1024 * 1024;
/// Maximum length of a single path component.
const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum length of a full path.
const MAX_TOTAL_PATH_LENGTH: usize = 4096;
/// Default maximum size of an `Authorization` header.
pub const DEFAULT_MAX_AUTHORIZATION_HEADER_BYTES: usize = 8 * 1024;
/// Upper bound for the `Authorization` header limit.
pub const MAX_AUTHORIZATION_HEADER_BYTES: usize = 64 * 1024;
/// Default number of cached token validations.
pub const DEFAULT_VALIDATION_CACHE_MAX_ENTRIES: usize = 10_000;
/// Upper bound for cached token validations.
pub const MAX_VALIDATION_CACHE_MAX_ENTRIES: usize = 1_000_000;

// ============================================================================
// SECTION: Root Config
// ============================================================================

/// Hive authz configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct HiveAuthzConfig {
    /// Authentication chain configuration.
    #[serde(default)]
    pub authn: AuthnConfig,
    /// Authorization audit configuration.
    #[serde(default)]
    pub audit: AuditConfig,
}

impl HiveAuthzConfig {
    /// Loads configuration from disk using the default resolution rules.
    ///
    /// The path argument wins, then [`CONFIG_ENV_VAR`], then `hive-authz.toml`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when loading or validation fails.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let resolved = resolve_path(path)?;
        validate_path(&resolved)?;
        let bytes = fs::read(&resolved).map_err(|err| ConfigError::Io(err.to_string()))?;
        if bytes.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::Invalid("config file exceeds size limit".to_string()));
        }
        let content = std::str::from_utf8(&bytes)
            .map_err(|_| ConfigError::Invalid("config file must be utf-8".to_string()))?;
        Self::from_toml(content)
    }

    /// Parses and validates configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when parsing or validation fails.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self =
            toml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration for internal consistency.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when configuration is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.authn.validate()?;
        self.audit.validate()?;
        Ok(())
    }
}

// ============================================================================
// SECTION: Authentication
// ============================================================================

/// Authentication chain configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct AuthnConfig {
    /// Maximum accepted `Authorization` header size in bytes.
    #[serde(default = "default_max_authorization_header_bytes")]
    pub max_authorization_header_bytes: usize,
    /// Maximum number of cached organization access token validations.
    #[serde(default = "default_validation_cache_max_entries")]
    pub validation_cache_max_entries: usize,
    /// Strategy toggles, in chain order.
    #[serde(default)]
    pub strategies: StrategyToggles,
}

impl Default for AuthnConfig {
    fn default() -> Self {
        Self {
            max_authorization_header_bytes: default_max_authorization_header_bytes(),
            validation_cache_max_entries: default_validation_cache_max_entries(),
            strategies: StrategyToggles::default(),
        }
    }
}

impl AuthnConfig {
    /// Validates authentication limits.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.max_authorization_header_bytes == 0
            || self.max_authorization_header_bytes > MAX_AUTHORIZATION_HEADER_BYTES
        {
            return Err(ConfigError::Invalid(format!(
                "authn.max_authorization_header_bytes must be between 1 and \
                 {MAX_AUTHORIZATION_HEADER_BYTES}"
            )));
        }
        if self.validation_cache_max_entries == 0
            || self.validation_cache_max_entries > MAX_VALIDATION_CACHE_MAX_ENTRIES
        {
            return Err(ConfigError::Invalid(format!(
                "authn.validation_cache_max_entries must be between 1 and \
                 {MAX_VALIDATION_CACHE_MAX_ENTRIES}"
            )));
        }
        Ok(())
    }
}

/// Enables or disables individual authentication strategies.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct StrategyToggles {
    /// Member sessions identified by an upstream subject.
    #[serde(default = "default_strategy_enabled")]
    pub member_subject: bool,
    /// Organization access tokens (`hvo1/` keys).
    #[serde(default = "default_strategy_enabled")]
    pub organization_access_token: bool,
    /// Legacy target access tokens.
    #[serde(default = "default_strategy_enabled")]
    pub target_access_token: bool,
}

impl Default for StrategyToggles {
    fn default() -> Self {
        Self {
            member_subject: default_strategy_enabled(),
            organization_access_token: default_strategy_enabled(),
            target_access_token: default_strategy_enabled(),
        }
    }
}

// ============================================================================
// SECTION: Audit
// ============================================================================

/// Audit sink selection.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum AuditSinkKind {
    /// JSON lines on stderr.
    Stderr,
    /// JSON lines appended to a file.
    File,
    /// Audit disabled.
    #[default]
    None,
}

/// Authorization audit configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct AuditConfig {
    /// Audit sink.
    #[serde(default)]
    pub sink: AuditSinkKind,
    /// Audit log path (file sink only).
    #[serde(default)]
    pub path: Option<String>,
}

impl AuditConfig {
    /// Validates audit configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        match (self.sink, &self.path) {
            (AuditSinkKind::File, Some(path)) => validate_path_string("audit.path", path),
            (AuditSinkKind::File, None) => {
                Err(ConfigError::Invalid("audit.path is required for the file sink".to_string()))
            }
            (AuditSinkKind::Stderr | AuditSinkKind::None, Some(_)) => Err(ConfigError::Invalid(
                "audit.path is only valid with the file sink".to_string(),
            )),
            (AuditSinkKind::Stderr | AuditSinkKind::None, None) => Ok(()),
        }
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration loading or validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O failure while reading configuration.
    #[error("config io error: {0}")]
    Io(String),
    /// TOML parsing error.
    #[error("config parse error: {0}")]
    Parse(String),
    /// Invalid configuration data.
    #[error("invalid config: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Resolves the config path from the argument or environment defaults.
fn resolve_path(path: Option<&Path>) -> Result<PathBuf, ConfigError> {
    if let Some(path) = path {
        return Ok(path.to_path_buf());
    }
    if let Ok(env_path) = env::var(CONFIG_ENV_VAR) {
        if env_path.len() > MAX_TOTAL_PATH_LENGTH {
            return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
        }
        return Ok(PathBuf::from(env_path));
    }
    Ok(PathBuf::from(DEFAULT_CONFIG_NAME))
}

/// Validates the resolved path against security limits.
fn validate_path(path: &Path) -> Result<(), ConfigError> {
    let text = path.to_string_lossy();
    if text.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
    }
    for component in path.components() {
        let value = component.as_os_str().to_string_lossy();
        if value.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid("config path component too long".to_string()));
        }
    }
    Ok(())
}

/// Validates a path string against length constraints.
fn validate_path_string(field: &str, value: &str) -> Result<(), ConfigError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::Invalid(format!("{field} must be non-empty")));
    }
    if trimmed.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid(format!("{field} exceeds max length")));
    }
    for component in Path::new(trimmed).components() {
        if component.as_os_str().len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid(format!("{field} path component too long")));
        }
    }
    Ok(())
}

/// Default `Authorization` header limit.
const fn default_max_authorization_header_bytes() -> usize {
    DEFAULT_MAX_AUTHORIZATION_HEADER_BYTES
}

/// Default token validation cache size.
const fn default_validation_cache_max_entries() -> usize {
    DEFAULT_VALIDATION_CACHE_MAX_ENTRIES
}

/// Strategies are enabled unless explicitly disabled.
const fn default_strategy_enabled() -> bool {
    true
}
