// crates/checksuite-core/src/core/node.rs
// ============================================================================
// Module: Metric and Test Nodes
// Description: Computation and check interfaces plus their shared handles.
// Purpose: Define what the engine schedules and how nodes declare inputs.
// Dependencies: crate::{core, runtime::store}, thiserror
// ============================================================================

//! ## Overview
//! Metrics compute typed values; tests turn metric values (or raw data) into
//! a [`TestResult`]. Both declare their inputs explicitly through
//! `dependencies()`, and the engine schedules them from those declarations
//! alone. Nodes are shared through `Arc`, and a node's identity is its
//! allocation: cloning a [`MetricHandle`] or [`TestNode`] yields the same node,
//! building a second equal value yields a different one.
//!
//! Metric outputs are type-erased in the graph and recovered through the
//! typed [`MetricHandle`] that registered them.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use thiserror::Error;

use crate::core::data::ColumnRole;
use crate::core::data::DatasetSide;
use crate::core::data::InputData;
use crate::core::identifiers::NodeKey;
use crate::core::result::TestResult;
use crate::runtime::store::CheckContext;
use crate::runtime::store::MetricStore;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Failure of a single metric or test.
///
/// # Invariants
/// - Scoped to one node; the pipeline decides whether it aborts the run.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ComputationError {
    /// The node's own logic failed.
    #[error("{0}")]
    Failed(String),
    /// A dependency failed, so the node was not invoked.
    #[error("dependency `{node}` failed: {reason}")]
    DependencyFailed {
        /// Name of the failed dependency.
        node: String,
        /// Failure reported by the dependency.
        reason: String,
    },
    /// No value was recorded for a requested metric.
    #[error("no result recorded for `{node}`")]
    MissingResult {
        /// Name of the requested metric.
        node: String,
    },
    /// The recorded value has a different type than requested.
    #[error("result of `{node}` has an unexpected type")]
    TypeMismatch {
        /// Name of the requested metric.
        node: String,
    },
    /// A column needed at computation time is absent.
    #[error("column `{column}` is missing from the {side} dataset")]
    MissingColumn {
        /// Column name.
        column: String,
        /// Dataset that lacks it.
        side: DatasetSide,
    },
}

impl ComputationError {
    /// Builds a [`ComputationError::Failed`] from a message.
    #[must_use]
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed(message.into())
    }
}

// ============================================================================
// SECTION: Metric Interface
// ============================================================================

/// Shared computation producing a typed value for tests to consume.
///
/// A metric is computed at most once per run, no matter how many tests
/// depend on it.
pub trait Metric: Send + Sync + 'static {
    /// Value produced by the metric.
    type Output: Send + Sync + 'static;

    /// Returns the display name.
    fn name(&self) -> &str;

    /// Returns metrics that must be computed first.
    fn dependencies(&self) -> Vec<MetricNode> {
        Vec::new()
    }

    /// Returns columns that must be mapped and present before the run.
    fn required_columns(&self) -> Vec<ColumnRole> {
        Vec::new()
    }

    /// Computes the metric value.
    ///
    /// # Errors
    ///
    /// Returns [`ComputationError`] when the value cannot be computed.
    fn calculate(
        &self,
        input: &InputData,
        metrics: &MetricStore,
    ) -> Result<Self::Output, ComputationError>;
}

/// Type-erased metric output stored by the pipeline.
pub(crate) type MetricValue = Arc<dyn Any + Send + Sync>;

/// Object-safe view of [`Metric`] used inside the graph.
pub(crate) trait ErasedMetric: Send + Sync {
    /// Returns the display name.
    fn erased_name(&self) -> &str;
    /// Returns metrics that must be computed first.
    fn erased_dependencies(&self) -> Vec<MetricNode>;
    /// Returns required columns.
    fn erased_required_columns(&self) -> Vec<ColumnRole>;
    /// Computes the metric and erases the output type.
    fn erased_calculate(
        &self,
        input: &InputData,
        metrics: &MetricStore,
    ) -> Result<MetricValue, ComputationError>;
}

impl<M: Metric> ErasedMetric for M {
    fn erased_name(&self) -> &str {
        self.name()
    }

    fn erased_dependencies(&self) -> Vec<MetricNode> {
        self.dependencies()
    }

    fn erased_required_columns(&self) -> Vec<ColumnRole> {
        self.required_columns()
    }

    fn erased_calculate(
        &self,
        input: &InputData,
        metrics: &MetricStore,
    ) -> Result<MetricValue, ComputationError> {
        let value: MetricValue = Arc::new(self.calculate(input, metrics)?);
        Ok(value)
    }
}

// ============================================================================
// SECTION: Metric Handles
// ============================================================================

/// Typed, clonable handle to a shared metric.
///
/// Tests keep a handle to each metric they read so that
/// [`MetricStore::get`] can return the metric's concrete output type.
pub struct MetricHandle<M: Metric> {
    /// Shared metric instance.
    inner: Arc<M>,
}

impl<M: Metric> MetricHandle<M> {
    /// Wraps a metric in a new shared node.
    #[must_use]
    pub fn new(metric: M) -> Self {
        Self {
            inner: Arc::new(metric),
        }
    }

    /// Returns the node identity.
    #[must_use]
    pub fn key(&self) -> NodeKey {
        NodeKey::of(&self.inner)
    }

    /// Returns the metric itself.
    #[must_use]
    pub fn metric(&self) -> &M {
        &self.inner
    }

    /// Returns the type-erased graph node for this metric.
    #[must_use]
    pub fn node(&self) -> MetricNode {
        let inner: Arc<dyn ErasedMetric> = self.inner.clone();
        MetricNode {
            inner,
        }
    }
}

impl<M: Metric> Clone for MetricHandle<M> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<M: Metric> fmt::Debug for MetricHandle<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MetricHandle")
            .field("name", &self.inner.name())
            .field("key", &self.key())
            .finish()
    }
}

/// Type-erased metric node.
#[derive(Clone)]
pub struct MetricNode {
    /// Shared metric instance.
    inner: Arc<dyn ErasedMetric>,
}

impl MetricNode {
    /// Wraps a metric in a new shared node.
    #[must_use]
    pub fn new<M: Metric>(metric: M) -> Self {
        MetricHandle::new(metric).node()
    }

    /// Returns the node identity.
    #[must_use]
    pub fn key(&self) -> NodeKey {
        NodeKey::of(&self.inner)
    }

    /// Returns the display name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.inner.erased_name()
    }

    /// Returns metrics that must be computed first.
    #[must_use]
    pub fn dependencies(&self) -> Vec<Self> {
        self.inner.erased_dependencies()
    }

    /// Returns required columns.
    #[must_use]
    pub fn required_columns(&self) -> Vec<ColumnRole> {
        self.inner.erased_required_columns()
    }

    /// Computes the metric.
    pub(crate) fn calculate(
        &self,
        input: &InputData,
        metrics: &MetricStore,
    ) -> Result<MetricValue, ComputationError> {
        self.inner.erased_calculate(input, metrics)
    }
}

impl<M: Metric> From<MetricHandle<M>> for MetricNode {
    fn from(handle: MetricHandle<M>) -> Self {
        handle.node()
    }
}

impl<M: Metric> From<&MetricHandle<M>> for MetricNode {
    fn from(handle: &MetricHandle<M>) -> Self {
        handle.node()
    }
}

impl fmt::Debug for MetricNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MetricNode").field("name", &self.name()).field("key", &self.key()).finish()
    }
}

// ============================================================================
// SECTION: Test Interface
// ============================================================================

/// Check producing exactly one [`TestResult`] per run.
pub trait Test: Send + Sync + 'static {
    /// Returns the display name.
    fn name(&self) -> &str;

    /// Returns metrics and tests that must be evaluated first.
    fn dependencies(&self) -> Vec<Dependency> {
        Vec::new()
    }

    /// Returns columns that must be mapped and present before the run.
    fn required_columns(&self) -> Vec<ColumnRole> {
        Vec::new()
    }

    /// Evaluates the test.
    ///
    /// # Errors
    ///
    /// Returns [`ComputationError`] when the test cannot reach a verdict; the
    /// pipeline records it as an ERROR result or aborts, depending on policy.
    fn check(&self, ctx: &CheckContext<'_>) -> Result<TestResult, ComputationError>;

    /// Returns true when a result counts toward a passing suite.
    ///
    /// Only SUCCESS passes unless a test overrides this.
    fn is_passed(&self, result: &TestResult) -> bool {
        result.status.is_success()
    }
}

/// Shared test node.
#[derive(Clone)]
pub struct TestNode {
    /// Shared test instance.
    inner: Arc<dyn Test>,
}

impl TestNode {
    /// Wraps a test in a new shared node.
    #[must_use]
    pub fn new<T: Test>(test: T) -> Self {
        let inner: Arc<dyn Test> = Arc::new(test);
        Self {
            inner,
        }
    }

    /// Returns the node identity.
    #[must_use]
    pub fn key(&self) -> NodeKey {
        NodeKey::of(&self.inner)
    }

    /// Returns the display name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.inner.name()
    }

    /// Returns declared dependencies.
    #[must_use]
    pub fn dependencies(&self) -> Vec<Dependency> {
        self.inner.dependencies()
    }

    /// Returns required columns.
    #[must_use]
    pub fn required_columns(&self) -> Vec<ColumnRole> {
        self.inner.required_columns()
    }

    /// Evaluates the test.
    pub(crate) fn check(&self, ctx: &CheckContext<'_>) -> Result<TestResult, ComputationError> {
        self.inner.check(ctx)
    }

    /// Applies the test's pass policy to a result.
    #[must_use]
    pub fn is_passed(&self, result: &TestResult) -> bool {
        self.inner.is_passed(result)
    }
}

impl fmt::Debug for TestNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TestNode").field("name", &self.name()).field("key", &self.key()).finish()
    }
}

// ============================================================================
// SECTION: Dependencies
// ============================================================================

/// Node a test declares as an input.
#[derive(Debug, Clone)]
pub enum Dependency {
    /// Metric whose value the test reads.
    Metric(MetricNode),
    /// Test whose result the test reads.
    Test(TestNode),
}

impl Dependency {
    /// Returns the node identity.
    #[must_use]
    pub fn key(&self) -> NodeKey {
        match self {
            Self::Metric(node) => node.key(),
            Self::Test(node) => node.key(),
        }
    }

    /// Returns the display name.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Metric(node) => node.name(),
            Self::Test(node) => node.name(),
        }
    }
}

impl From<MetricNode> for Dependency {
    fn from(node: MetricNode) -> Self {
        Self::Metric(node)
    }
}

impl<M: Metric> From<&MetricHandle<M>> for Dependency {
    fn from(handle: &MetricHandle<M>) -> Self {
        Self::Metric(handle.node())
    }
}

impl From<TestNode> for Dependency {
    fn from(node: TestNode) -> Self {
        Self::Test(node)
    }
}

impl From<&TestNode> for Dependency {
    fn from(node: &TestNode) -> Self {
        Self::Test(node.clone())
    }
}
