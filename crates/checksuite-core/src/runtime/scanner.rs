// crates/checksuite-core/src/runtime/scanner.rs
// ============================================================================
// Module: Dependency Scanner
// Description: Discovery of the nodes a set of tests depends on.
// Purpose: Expand top-level tests into the full set of nodes to register.
// Dependencies: crate::core
// ============================================================================

//! ## Overview
//! Tests name their inputs through `dependencies()`. The scanner follows
//! those declarations to a fixed point: test dependencies are expanded into
//! their own dependencies, metrics into their metric dependencies. Nodes are
//! deduplicated by identity and each is visited once, so cyclic declarations
//! terminate here and are rejected later by verify.

use std::collections::HashSet;

use crate::core::identifiers::NodeKey;
use crate::core::node::Dependency;
use crate::core::node::MetricNode;
use crate::core::node::TestNode;

/// Nodes discovered behind a set of tests, in registration order.
///
/// Every node appears after the nodes it depends on, except where the
/// declarations are cyclic.
#[derive(Debug, Clone, Default)]
pub struct Discovery {
    /// Discovered metrics.
    pub metrics: Vec<MetricNode>,
    /// Discovered dependency tests.
    pub tests: Vec<TestNode>,
}

/// Returns the distinct direct dependencies of a test in declaration order.
#[must_use]
pub fn direct_dependencies(test: &TestNode) -> Vec<Dependency> {
    let mut seen: HashSet<NodeKey> = HashSet::new();
    test.dependencies().into_iter().filter(|dependency| seen.insert(dependency.key())).collect()
}

/// Discovers every node the given tests transitively depend on.
///
/// The tests themselves are only included when another test depends on them.
#[must_use]
pub fn discover(tests: &[TestNode]) -> Discovery {
    let mut discovery = Discovery::default();
    let mut seen: HashSet<NodeKey> = HashSet::new();
    for test in tests {
        for dependency in direct_dependencies(test) {
            visit(dependency, &mut discovery, &mut seen);
        }
    }
    discovery
}

/// Adds a node after its own dependencies.
fn visit(dependency: Dependency, discovery: &mut Discovery, seen: &mut HashSet<NodeKey>) {
    if !seen.insert(dependency.key()) {
        return;
    }
    match dependency {
        Dependency::Metric(metric) => {
            for inner in metric.dependencies() {
                visit(Dependency::Metric(inner), discovery, seen);
            }
            discovery.metrics.push(metric);
        }
        Dependency::Test(test) => {
            for inner in direct_dependencies(&test) {
                visit(inner, discovery, seen);
            }
            discovery.tests.push(test);
        }
    }
}
