// crates/checksuite-config/src/config.rs
// ============================================================================
// Module: Suite Configuration
// Description: Configuration loading and validation for check suites.
// Purpose: Provide strict, fail-closed config parsing with hard limits.
// Dependencies: checksuite-core, serde, thiserror, toml
// ============================================================================

//! ## Overview
//! Configuration is loaded from a TOML file with strict size and path limits.
//! Unknown keys and out-of-range values are rejected rather than ignored. An
//! empty file yields exactly [`SuiteOptions::default`].

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::env;
use std::fs;
use std::path::Path;
use std::path::PathBuf;

use checksuite_core::DEFAULT_DASHBOARD_PREFIX;
use checksuite_core::DEFAULT_MAX_NODES;
use checksuite_core::FailurePolicy;
use checksuite_core::SuiteOptions;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default configuration filename when no path is specified.
pub const DEFAULT_CONFIG_NAME: &str = "checksuite.toml";
/// Environment variable naming the configuration file.
pub const CONFIG_ENV_VAR: &str = "CHECKSUITE_CONFIG";
/// Maximum configuration file size in bytes.
pub const MAX_CONFIG_FILE_SIZE: usize = 1024 * 1024;
/// Maximum length of one path component.
pub(crate) const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum total path length.
pub(crate) const MAX_TOTAL_PATH_LENGTH: usize = 4096;
/// Upper bound for `execution.max_nodes`.
pub const MAX_NODES_LIMIT: usize = 65_536;
/// Maximum length of `export.dashboard_prefix`.
pub const MAX_DASHBOARD_PREFIX_LENGTH: usize = 64;

// ============================================================================
// SECTION: Configuration Model
// ============================================================================

/// Top-level suite configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SuiteConfig {
    /// Execution settings.
    #[serde(default)]
    pub execution: ExecutionConfig,
    /// Export settings.
    #[serde(default)]
    pub export: ExportConfig,
}

/// Execution settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExecutionConfig {
    /// Reaction to metric and test failures.
    #[serde(default)]
    pub failure_policy: FailurePolicy,
    /// Maximum number of nodes a suite may register.
    #[serde(default = "default_max_nodes")]
    pub max_nodes: usize,
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        Self {
            failure_policy: FailurePolicy::default(),
            max_nodes: default_max_nodes(),
        }
    }
}

impl ExecutionConfig {
    /// Validates execution settings.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.max_nodes == 0 || self.max_nodes > MAX_NODES_LIMIT {
            return Err(ConfigError::Invalid(format!(
                "execution.max_nodes must be between 1 and {MAX_NODES_LIMIT}"
            )));
        }
        Ok(())
    }
}

/// Export settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExportConfig {
    /// Prefix of generated dashboard identifiers.
    #[serde(default = "default_dashboard_prefix")]
    pub dashboard_prefix: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            dashboard_prefix: default_dashboard_prefix(),
        }
    }
}

impl ExportConfig {
    /// Validates export settings.
    fn validate(&self) -> Result<(), ConfigError> {
        let prefix = &self.dashboard_prefix;
        if prefix.is_empty() {
            return Err(ConfigError::Invalid("export.dashboard_prefix must be non-empty".to_string()));
        }
        if prefix.len() > MAX_DASHBOARD_PREFIX_LENGTH {
            return Err(ConfigError::Invalid(format!(
                "export.dashboard_prefix exceeds {MAX_DASHBOARD_PREFIX_LENGTH} characters"
            )));
        }
        if !prefix.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-') {
            return Err(ConfigError::Invalid(
                "export.dashboard_prefix may only contain [A-Za-z0-9_-]".to_string(),
            ));
        }
        Ok(())
    }
}

/// Default for `execution.max_nodes`.
const fn default_max_nodes() -> usize {
    DEFAULT_MAX_NODES
}

/// Default for `export.dashboard_prefix`.
fn default_dashboard_prefix() -> String {
    DEFAULT_DASHBOARD_PREFIX.to_string()
}

// ============================================================================
// SECTION: Loading
// ============================================================================

impl SuiteConfig {
    /// Loads configuration from disk using the default resolution rules.
    ///
    /// The path argument wins, then [`CONFIG_ENV_VAR`], then
    /// [`DEFAULT_CONFIG_NAME`] in the working directory.
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
        Self::from_toml_str(content)
    }

    /// Parses and validates configuration text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when parsing or validation fails.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        if content.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::Invalid("config file exceeds size limit".to_string()));
        }
        let config: Self = toml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when a value is out of range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.execution.validate()?;
        self.export.validate()?;
        Ok(())
    }

    /// Returns the suite options described by this configuration.
    #[must_use]
    pub fn options(&self) -> SuiteOptions {
        SuiteOptions {
            failure_policy: self.execution.failure_policy,
            max_nodes: self.execution.max_nodes,
            dashboard_prefix: self.export.dashboard_prefix.clone(),
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
    match env::var(CONFIG_ENV_VAR) {
        Ok(env_path) if env_path.len() > MAX_TOTAL_PATH_LENGTH => {
            Err(ConfigError::Invalid("config path exceeds max length".to_string()))
        }
        Ok(env_path) => Ok(PathBuf::from(env_path)),
        Err(_) => Ok(PathBuf::from(DEFAULT_CONFIG_NAME)),
    }
}

/// Validates the resolved path against length limits.
fn validate_path(path: &Path) -> Result<(), ConfigError> {
    if path.as_os_str().len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
    }
    if path.components().any(|component| component.as_os_str().len() > MAX_PATH_COMPONENT_LENGTH) {
        return Err(ConfigError::Invalid("config path component too long".to_string()));
    }
    Ok(())
}
