// crates/calc-graph/src/error.rs
// ============================================================================
// Module: Graph Error Definitions
// Description: Structured diagnostics for dependency graph validation.
// Purpose: Report missing dependencies, cycles, and size violations by label.
// Dependencies: thiserror
// ============================================================================

//! ## Overview
//! Errors carry node labels rather than keys so callers can surface them
//! directly; keys are frequently opaque (addresses, dense ids) and carry no
//! meaning for a reader.

use thiserror::Error;

/// Errors raised while validating or ordering a dependency graph.
///
/// # Invariants
/// - `Cycle::path` starts and ends with the same label.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    /// A node declares a dependency that was never registered.
    #[error("node `{node}` depends on unregistered node `{dependency}`")]
    MissingDependency {
        /// Label of the declaring node.
        node: String,
        /// Label of the missing dependency.
        dependency: String,
    },

    /// The declared dependencies form a cycle.
    #[error("dependency cycle detected: {}", path.join(" -> "))]
    Cycle {
        /// Labels along the cycle, in dependency direction.
        path: Vec<String>,
    },

    /// The graph exceeds the configured node limit.
    #[error("graph holds {actual} nodes (max {max})")]
    TooManyNodes {
        /// Maximum allowed node count.
        max: usize,
        /// Node count encountered.
        actual: usize,
    },
}

/// Convenient Result type for graph operations.
pub type GraphResult<T = ()> = Result<T, GraphError>;
