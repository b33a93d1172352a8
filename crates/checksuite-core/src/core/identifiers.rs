// crates/checksuite-core/src/core/identifiers.rs
// ============================================================================
// Module: Check Suite Identifiers
// Description: Node identity keys and report identifiers.
// Purpose: Give nodes and report instances stable, comparable identities.
// Dependencies: serde, uuid
// ============================================================================

//! ## Overview
//! Node identity is instance identity: a metric or test is the same node only
//! when it is the same shared allocation. Two structurally identical metrics
//! built separately are two nodes and are computed twice. Report identifiers
//! are random UUIDs generated once per suite instance and never reused.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::sync::Arc;

use serde::Deserialize;
use serde::Serialize;
use uuid::Uuid;

// ============================================================================
// SECTION: Node Key
// ============================================================================

/// Identity of a registered metric or test node.
///
/// # Invariants
/// - Derived from the address of the node's shared allocation, so it stays
///   stable for as long as any handle to the node is alive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeKey(usize);

impl NodeKey {
    /// Returns the key of a shared node allocation.
    #[must_use]
    pub(crate) fn of<T: ?Sized>(node: &Arc<T>) -> Self {
        Self(Arc::as_ptr(node).cast::<()>().addr())
    }

    /// Returns the raw key value.
    #[must_use]
    pub const fn get(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "node-{:x}", self.0)
    }
}

// ============================================================================
// SECTION: Report Identifier
// ============================================================================

/// Random identifier attached to one suite instance and its exports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReportId(Uuid);

impl ReportId {
    /// Generates a fresh random identifier.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Returns the underlying UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }

    /// Returns the identifier as 32 lowercase hex digits without hyphens.
    #[must_use]
    pub fn simple(&self) -> String {
        self.0.simple().to_string()
    }
}

impl Default for ReportId {
    fn default() -> Self {
        Self::generate()
    }
}

impl From<Uuid> for ReportId {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl fmt::Display for ReportId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
