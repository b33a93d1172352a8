// crates/calc-graph/src/order.rs
// ============================================================================
// Module: Execution Order
// Description: Deterministic topological ordering with cycle diagnostics.
// Purpose: Produce dependency-first node sequences for execution engines.
// Dependencies: crate::{error, graph}, std::collections
// ============================================================================

//! ## Overview
//! Ordering uses Kahn's algorithm with the ready set kept sorted by insertion
//! position. When nodes remain after the ready set drains, they all sit on or
//! behind a cycle; one concrete cycle is extracted for the error report.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;
use std::hash::Hash;

use crate::error::GraphError;
use crate::error::GraphResult;
use crate::graph::DependencyGraph;

// ============================================================================
// SECTION: Execution Order
// ============================================================================

/// Node keys ordered so every dependency precedes its dependents.
///
/// # Invariants
/// - Contains every registered key exactly once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionOrder<K> {
    /// Ordered keys.
    keys: Vec<K>,
}

impl<K: PartialEq> ExecutionOrder<K> {
    /// Returns the ordered keys.
    #[must_use]
    pub fn as_slice(&self) -> &[K] {
        &self.keys
    }

    /// Iterates keys in execution order.
    pub fn iter(&self) -> std::slice::Iter<'_, K> {
        self.keys.iter()
    }

    /// Returns the number of ordered keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Returns true when the order is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Returns the execution position of a key.
    #[must_use]
    pub fn position(&self, key: &K) -> Option<usize> {
        self.keys.iter().position(|candidate| candidate == key)
    }

    /// Consumes the order and returns the keys.
    #[must_use]
    pub fn into_vec(self) -> Vec<K> {
        self.keys
    }
}

impl<'a, K> IntoIterator for &'a ExecutionOrder<K> {
    type Item = &'a K;
    type IntoIter = std::slice::Iter<'a, K>;

    fn into_iter(self) -> Self::IntoIter {
        self.keys.iter()
    }
}

// ============================================================================
// SECTION: Kahn Ordering
// ============================================================================

/// Computes a topological order for a validated graph.
///
/// # Errors
///
/// Returns [`GraphError::Cycle`] when some nodes can never become ready.
pub(crate) fn topological_order<K>(graph: &DependencyGraph<K>) -> GraphResult<ExecutionOrder<K>>
where
    K: Clone + Eq + Hash,
{
    let count = graph.nodes.len();
    let mut pending = vec![0usize; count];
    let mut dependents: Vec<Vec<usize>> = vec![Vec::new(); count];

    for position in 0 .. count {
        for dependency in graph.dependency_positions(position) {
            pending[position] += 1;
            dependents[dependency].push(position);
        }
    }

    let mut ready: BTreeSet<usize> =
        (0 .. count).filter(|&position| pending[position] == 0).collect();
    let mut keys = Vec::with_capacity(count);

    while let Some(position) = ready.pop_first() {
        keys.push(graph.nodes[position].key.clone());
        for &dependent in &dependents[position] {
            pending[dependent] -= 1;
            if pending[dependent] == 0 {
                ready.insert(dependent);
            }
        }
    }

    if keys.len() < count {
        return Err(GraphError::Cycle {
            path: cycle_path(graph, &pending),
        });
    }

    Ok(ExecutionOrder {
        keys,
    })
}

// ============================================================================
// SECTION: Cycle Extraction
// ============================================================================

/// Extracts one cycle among nodes left unresolved by Kahn ordering.
///
/// Every unresolved node still waits on at least one unresolved dependency,
/// so following those edges from any unresolved node must revisit a node.
fn cycle_path<K>(graph: &DependencyGraph<K>, pending: &[usize]) -> Vec<String>
where
    K: Clone + Eq + Hash,
{
    let Some(start) = pending.iter().position(|&waiting| waiting > 0) else {
        return Vec::new();
    };

    let mut walk: Vec<usize> = Vec::new();
    let mut current = start;
    loop {
        if let Some(index) = walk.iter().position(|&seen| seen == current) {
            let mut path: Vec<String> =
                walk[index ..].iter().map(|&position| graph.nodes[position].label.clone()).collect();
            path.push(graph.nodes[current].label.clone());
            return path;
        }
        walk.push(current);
        match graph.dependency_positions(current).find(|&dependency| pending[dependency] > 0) {
            Some(next) => current = next,
            None => {
                return walk.iter().map(|&position| graph.nodes[position].label.clone()).collect();
            }
        }
    }
}
