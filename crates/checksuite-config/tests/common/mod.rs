// crates/checksuite-config/tests/common/mod.rs
// =============================================================================
// Module: Config Test Helpers
// Description: Shared helpers for config loading tests.
// Purpose: Write configuration files into temporary directories.
// =============================================================================

#![allow(dead_code, reason = "Test helpers are selectively used across suites.")]

use std::fs;
use std::path::PathBuf;

use tempfile::TempDir;

/// Result type for config tests.
pub type TestResult = Result<(), String>;

/// Writes `content` to `checksuite.toml` in a fresh temporary directory.
///
/// The directory is returned so it outlives the test body.
pub fn write_config(content: &[u8]) -> Result<(TempDir, PathBuf), String> {
    let dir = tempfile::tempdir().map_err(|err| err.to_string())?;
    let path = dir.path().join("checksuite.toml");
    fs::write(&path, content).map_err(|err| err.to_string())?;
    Ok((dir, path))
}

/// Returns an error unless `message` contains `needle`.
pub fn expect_message(message: &str, needle: &str) -> TestResult {
    if message.contains(needle) {
        Ok(())
    } else {
        Err(format!("expected error containing {needle:?}, got {message:?}"))
    }
}
