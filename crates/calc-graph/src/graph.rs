// crates/calc-graph/src/graph.rs
// ============================================================================
// Module: Dependency Graph
// Description: Idempotent node registry with declared dependency edges.
// Purpose: Store nodes in insertion order and validate their declared edges.
// Dependencies: crate::{error, order}, std::collections
// ============================================================================

//! ## Overview
//! `DependencyGraph` records nodes in insertion order. Each node carries a
//! display label and the keys it depends on. Dependencies may be declared
//! before they are registered; [`DependencyGraph::validate`] reports any that
//! never were. Registering an existing key is a no-op, which lets callers
//! feed the same node through several discovery paths.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::HashMap;
use std::collections::HashSet;
use std::hash::Hash;

use crate::error::GraphError;
use crate::error::GraphResult;
use crate::order::ExecutionOrder;
use crate::order::topological_order;

// ============================================================================
// SECTION: Limits
// ============================================================================

/// Size limits applied when planning execution.
///
/// # Invariants
/// - `max_nodes` of zero rejects every non-empty graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GraphLimits {
    /// Maximum number of registered nodes.
    pub max_nodes: usize,
}

impl GraphLimits {
    /// Limits that never reject a graph.
    #[must_use]
    pub const fn unbounded() -> Self {
        Self {
            max_nodes: usize::MAX,
        }
    }
}

impl Default for GraphLimits {
    fn default() -> Self {
        Self::unbounded()
    }
}

// ============================================================================
// SECTION: Node Storage
// ============================================================================

/// Declared dependency edge.
#[derive(Debug, Clone)]
pub(crate) struct Edge<K> {
    /// Key of the dependency.
    pub(crate) key: K,
    /// Label used when the dependency is missing.
    pub(crate) label: String,
}

/// Registered node with its declared edges.
#[derive(Debug, Clone)]
pub(crate) struct NodeEntry<K> {
    /// Node key.
    pub(crate) key: K,
    /// Display label.
    pub(crate) label: String,
    /// Declared dependencies in declaration order, without duplicates.
    pub(crate) dependencies: Vec<Edge<K>>,
}

// ============================================================================
// SECTION: Dependency Graph
// ============================================================================

/// Dependency graph keyed by node identity.
#[derive(Debug, Clone)]
pub struct DependencyGraph<K> {
    /// Nodes in insertion order.
    pub(crate) nodes: Vec<NodeEntry<K>>,
    /// Key to insertion index.
    pub(crate) index: HashMap<K, usize>,
}

impl<K> Default for DependencyGraph<K> {
    fn default() -> Self {
        Self {
            nodes: Vec::new(),
            index: HashMap::new(),
        }
    }
}

impl<K> DependencyGraph<K>
where
    K: Clone + Eq + Hash,
{
    /// Creates an empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a node without dependencies.
    ///
    /// Returns `false` when the key was already registered.
    pub fn insert(&mut self, key: K, label: impl Into<String>) -> bool {
        self.insert_with_dependencies(key, label, std::iter::empty::<(K, String)>())
    }

    /// Registers a node together with its declared dependencies.
    ///
    /// Returns `false` and leaves the graph unchanged when the key was
    /// already registered; the first registration's edges win.
    pub fn insert_with_dependencies<I, L>(
        &mut self,
        key: K,
        label: impl Into<String>,
        dependencies: I,
    ) -> bool
    where
        I: IntoIterator<Item = (K, L)>,
        L: Into<String>,
    {
        if self.index.contains_key(&key) {
            return false;
        }

        let mut seen: HashSet<K> = HashSet::new();
        let mut edges = Vec::new();
        for (dependency, dependency_label) in dependencies {
            if seen.insert(dependency.clone()) {
                edges.push(Edge {
                    key: dependency,
                    label: dependency_label.into(),
                });
            }
        }

        self.index.insert(key.clone(), self.nodes.len());
        self.nodes.push(NodeEntry {
            key,
            label: label.into(),
            dependencies: edges,
        });
        true
    }

    /// Returns true when the key is registered.
    #[must_use]
    pub fn contains(&self, key: &K) -> bool {
        self.index.contains_key(key)
    }

    /// Returns the number of registered nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true when no nodes are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Returns the registered keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.nodes.iter().map(|node| &node.key)
    }

    /// Returns the label of a registered node.
    #[must_use]
    pub fn label(&self, key: &K) -> Option<&str> {
        self.index.get(key).map(|&position| self.nodes[position].label.as_str())
    }

    /// Returns the declared direct dependencies of a node.
    ///
    /// Unregistered nodes have no dependencies.
    pub fn dependencies(&self, key: &K) -> impl Iterator<Item = &K> {
        self.index
            .get(key)
            .into_iter()
            .flat_map(move |&position| self.nodes[position].dependencies.iter().map(|edge| &edge.key))
    }

    /// Returns every registered node reachable through declared dependencies.
    ///
    /// Nodes are listed in discovery order (depth-first, declaration order) and
    /// the starting node is never included, even when it sits on a cycle.
    #[must_use]
    pub fn transitive_dependencies(&self, key: &K) -> Vec<&K> {
        let Some(&start) = self.index.get(key) else {
            return Vec::new();
        };

        let mut visited = vec![false; self.nodes.len()];
        visited[start] = true;
        let mut out = Vec::new();
        let mut stack: Vec<usize> = self.dependency_positions(start).rev().collect();

        while let Some(position) = stack.pop() {
            if visited[position] {
                continue;
            }
            visited[position] = true;
            out.push(&self.nodes[position].key);
            stack.extend(self.dependency_positions(position).rev());
        }

        out
    }

    /// Ensures every declared dependency is registered.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::MissingDependency`] for the first unresolved edge
    /// in insertion order.
    pub fn validate(&self) -> GraphResult {
        for node in &self.nodes {
            for edge in &node.dependencies {
                if !self.index.contains_key(&edge.key) {
                    return Err(GraphError::MissingDependency {
                        node: node.label.clone(),
                        dependency: edge.label.clone(),
                    });
                }
            }
        }
        Ok(())
    }

    /// Validates the graph and returns an order with dependencies first.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError`] when a dependency is missing or a cycle exists.
    pub fn execution_order(&self) -> GraphResult<ExecutionOrder<K>> {
        self.plan(GraphLimits::unbounded())
    }

    /// Validates the graph against limits and returns an execution order.
    ///
    /// Ties between independent nodes are broken by insertion order, so the
    /// result is deterministic for a given registration sequence.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::TooManyNodes`], [`GraphError::MissingDependency`],
    /// or [`GraphError::Cycle`].
    pub fn plan(&self, limits: GraphLimits) -> GraphResult<ExecutionOrder<K>> {
        if self.nodes.len() > limits.max_nodes {
            return Err(GraphError::TooManyNodes {
                max: limits.max_nodes,
                actual: self.nodes.len(),
            });
        }
        self.validate()?;
        topological_order(self)
    }

    /// Returns insertion positions of a node's registered dependencies.
    pub(crate) fn dependency_positions(
        &self,
        position: usize,
    ) -> impl DoubleEndedIterator<Item = usize> + '_ {
        self.nodes[position].dependencies.iter().filter_map(|edge| self.index.get(&edge.key).copied())
    }
}
