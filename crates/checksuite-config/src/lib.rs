// crates/checksuite-config/src/lib.rs
// ============================================================================
// Module: Check Suite Config Library
// Description: Public API surface for suite configuration.
// Purpose: Expose configuration loading and validation.
// Dependencies: crate::config
// ============================================================================

//! ## Overview
//! Loads `checksuite.toml`, validates it fail-closed, and converts it into
//! [`checksuite_core::SuiteOptions`].

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use config::CONFIG_ENV_VAR;
pub use config::ConfigError;
pub use config::DEFAULT_CONFIG_NAME;
pub use config::ExecutionConfig;
pub use config::ExportConfig;
pub use config::MAX_CONFIG_FILE_SIZE;
pub use config::MAX_DASHBOARD_PREFIX_LENGTH;
pub use config::MAX_NODES_LIMIT;
pub use config::SuiteConfig;
