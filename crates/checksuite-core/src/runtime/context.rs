// crates/checksuite-core/src/runtime/context.rs
// ============================================================================
// Module: Suite Context
// Description: Registry of metrics, tests, and their dependency graph.
// Purpose: Collect nodes for one suite and close registration once verified.
// Dependencies: calc-graph, crate::{core, export, runtime}
// ============================================================================

//! ## Overview
//! The context owns every node registered for a suite, in registration
//! order, along with the dependency graph built from their declarations and
//! the renderer registry used at export time. Registration is idempotent by
//! node identity. After the pipeline verifies the context it is sealed and
//! further registration is refused.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::HashMap;

use calc_graph::DependencyGraph;

use crate::core::identifiers::NodeKey;
use crate::core::node::MetricNode;
use crate::core::node::TestNode;
use crate::export::renderer::RendererRegistry;
use crate::runtime::pipeline::ConfigurationError;

// ============================================================================
// SECTION: Suite Context
// ============================================================================

/// Registered nodes of one suite.
///
/// # Invariants
/// - Every registered node appears once in the graph and once in its list.
/// - No node is added after [`SuiteContext::is_sealed`] turns true.
#[derive(Debug)]
pub struct SuiteContext {
    /// Dependency graph over all registered nodes.
    graph: DependencyGraph<NodeKey>,
    /// Metrics in registration order.
    metrics: Vec<MetricNode>,
    /// Metric key to list position.
    metric_index: HashMap<NodeKey, usize>,
    /// Tests in registration order.
    tests: Vec<TestNode>,
    /// Test key to list position.
    test_index: HashMap<NodeKey, usize>,
    /// Renderers used by exporters.
    renderers: RendererRegistry,
    /// Set once the context has been verified.
    sealed: bool,
}

impl Default for SuiteContext {
    fn default() -> Self {
        Self::new()
    }
}

impl SuiteContext {
    /// Creates an empty context with the default renderers.
    #[must_use]
    pub fn new() -> Self {
        Self::with_renderers(RendererRegistry::with_defaults())
    }

    /// Creates an empty context with a custom renderer registry.
    #[must_use]
    pub fn with_renderers(renderers: RendererRegistry) -> Self {
        Self {
            graph: DependencyGraph::new(),
            metrics: Vec::new(),
            metric_index: HashMap::new(),
            tests: Vec::new(),
            test_index: HashMap::new(),
            renderers,
            sealed: false,
        }
    }

    /// Registers metrics and their declared metric dependencies as edges.
    ///
    /// Already registered metrics are skipped.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::RegistrationClosed`] once sealed.
    pub fn add_metrics<I>(&mut self, metrics: I) -> Result<(), ConfigurationError>
    where
        I: IntoIterator<Item = MetricNode>,
    {
        self.ensure_open()?;
        for metric in metrics {
            let key = metric.key();
            let dependencies = metric.dependencies();
            let edges =
                dependencies.iter().map(|dependency| (dependency.key(), dependency.name().to_string()));
            if self.graph.insert_with_dependencies(key, metric.name(), edges) {
                self.metric_index.insert(key, self.metrics.len());
                self.metrics.push(metric);
            }
        }
        Ok(())
    }

    /// Registers tests and their declared dependencies as edges.
    ///
    /// Already registered tests are skipped.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::RegistrationClosed`] once sealed.
    pub fn add_tests<I>(&mut self, tests: I) -> Result<(), ConfigurationError>
    where
        I: IntoIterator<Item = TestNode>,
    {
        self.ensure_open()?;
        for test in tests {
            let key = test.key();
            let dependencies = test.dependencies();
            let edges =
                dependencies.iter().map(|dependency| (dependency.key(), dependency.name().to_string()));
            if self.graph.insert_with_dependencies(key, test.name(), edges) {
                self.test_index.insert(key, self.tests.len());
                self.tests.push(test);
            }
        }
        Ok(())
    }

    /// Returns registered metrics in registration order.
    #[must_use]
    pub fn metrics(&self) -> &[MetricNode] {
        &self.metrics
    }

    /// Returns registered tests in registration order.
    #[must_use]
    pub fn tests(&self) -> &[TestNode] {
        &self.tests
    }

    /// Returns the registered metric with the given key.
    #[must_use]
    pub fn metric(&self, key: NodeKey) -> Option<&MetricNode> {
        self.metric_index.get(&key).map(|&position| &self.metrics[position])
    }

    /// Returns the registered test with the given key.
    #[must_use]
    pub fn test(&self, key: NodeKey) -> Option<&TestNode> {
        self.test_index.get(&key).map(|&position| &self.tests[position])
    }

    /// Returns true when a node with the key is registered.
    #[must_use]
    pub fn contains(&self, key: NodeKey) -> bool {
        self.graph.contains(&key)
    }

    /// Returns the dependency graph.
    #[must_use]
    pub const fn graph(&self) -> &DependencyGraph<NodeKey> {
        &self.graph
    }

    /// Returns the renderer registry.
    #[must_use]
    pub const fn renderers(&self) -> &RendererRegistry {
        &self.renderers
    }

    /// Returns the renderer registry for customization.
    pub const fn renderers_mut(&mut self) -> &mut RendererRegistry {
        &mut self.renderers
    }

    /// Returns true once registration is closed.
    #[must_use]
    pub const fn is_sealed(&self) -> bool {
        self.sealed
    }

    /// Closes registration.
    pub(crate) const fn seal(&mut self) {
        self.sealed = true;
    }

    /// Fails when registration is closed.
    fn ensure_open(&self) -> Result<(), ConfigurationError> {
        if self.sealed {
            return Err(ConfigurationError::RegistrationClosed);
        }
        Ok(())
    }
}
