// crates/checksuite-core/src/export/digest.rs
// ============================================================================
// Module: Report Digests
// Description: RFC 8785 canonical JSON and SHA-256 fingerprints.
// Purpose: Give a run's export a stable textual form and content hash.
// Dependencies: serde, serde_jcs, sha2
// ============================================================================

//! ## Overview
//! Exports are canonicalized with JCS so that equal results always produce
//! byte-identical text regardless of map ordering, and hashed over those
//! bytes.

use std::fmt::Write;

use serde::Deserialize;
use serde::Serialize;
use sha2::Digest;
use sha2::Sha256;

use crate::export::renderer::ExportError;

/// Digest algorithm tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DigestAlgorithm {
    /// SHA-256.
    Sha256,
}

/// Content digest of a canonical export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportDigest {
    /// Algorithm used.
    pub algorithm: DigestAlgorithm,
    /// Lowercase hex digest.
    pub value: String,
}

/// Serializes a value to canonical JSON bytes.
///
/// # Errors
///
/// Returns [`ExportError::Serialization`] when the value cannot be serialized.
pub fn canonical_bytes<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>, ExportError> {
    serde_jcs::to_vec(value).map_err(|err| ExportError::Serialization(err.to_string()))
}

/// Serializes a value to canonical JSON text.
///
/// # Errors
///
/// Returns [`ExportError::Serialization`] when the value cannot be serialized.
pub fn canonical_string<T: Serialize + ?Sized>(value: &T) -> Result<String, ExportError> {
    serde_jcs::to_string(value).map_err(|err| ExportError::Serialization(err.to_string()))
}

/// Hashes the canonical JSON form of a value.
///
/// # Errors
///
/// Returns [`ExportError::Serialization`] when the value cannot be serialized.
pub fn digest_canonical<T: Serialize + ?Sized>(value: &T) -> Result<ReportDigest, ExportError> {
    let bytes = canonical_bytes(value)?;
    let hash = Sha256::digest(&bytes);
    let mut hex = String::with_capacity(hash.len() * 2);
    for byte in hash {
        let _ = write!(hex, "{byte:02x}");
    }
    Ok(ReportDigest {
        algorithm: DigestAlgorithm::Sha256,
        value: hex,
    })
}
