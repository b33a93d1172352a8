// crates/calc-graph/src/lib.rs
// ============================================================================
// Module: Calc Graph Root
// Description: Public API surface for the dependency graph subsystem.
// Purpose: Wire together graph registration, ordering, and error modules.
// Dependencies: crate::{error, graph, order}
// ============================================================================

//! ## Overview
//! `calc-graph` is a small, domain-agnostic dependency graph. Callers register
//! nodes by key together with the keys they depend on; the graph tolerates
//! duplicate registration, reports dependencies that were never registered,
//! and produces a deterministic topological order where every dependency
//! precedes its dependents. Cycles are rejected with the offending path.

// ============================================================================
// SECTION: Core Modules
// ============================================================================

pub mod error;
pub mod graph;
pub mod order;


// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use error::GraphError;
pub use error::GraphResult;
pub use graph::DependencyGraph;
pub use graph::GraphLimits;
pub use order::ExecutionOrder;
