// crates/checksuite-core/src/runtime/pipeline.rs
// ============================================================================
// Module: Execution Pipeline
// Description: Verify, calculate, and check phases over a suite context.
// Purpose: Run every registered node exactly once in dependency order.
// Dependencies: calc-graph, crate::{core, export, runtime}, thiserror, tracing
// ============================================================================

//! ## Overview
//! The pipeline runs three phases with explicit outputs:
//! - verify: validates the graph and column requirements, yields a
//!   [`VerifiedPlan`].
//! - calculate: computes metrics in plan order, yields a [`MetricStore`].
//! - check: evaluates tests in plan order, yields [`TestResults`].
//!
//! Configuration problems are fatal and surface from verify before any node
//! runs. Computation failures are scoped to their node under
//! [`FailurePolicy::Isolate`] and abort the run under [`FailurePolicy::Abort`].

// ============================================================================
// SECTION: Imports
// ============================================================================

use calc_graph::ExecutionOrder;
use calc_graph::GraphError;
use calc_graph::GraphLimits;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;
use tracing::debug;
use tracing::info;
use tracing::warn;

use crate::core::data::ColumnRole;
use crate::core::data::DatasetSide;
use crate::core::data::InputData;
use crate::core::identifiers::NodeKey;
use crate::core::node::ComputationError;
use crate::core::node::Dependency;
use crate::core::node::MetricNode;
use crate::core::result::TestResult;
use crate::export::renderer::ExportError;
use crate::runtime::context::SuiteContext;
use crate::runtime::store::CheckContext;
use crate::runtime::store::MetricStore;
use crate::runtime::store::TestResults;

// ============================================================================
// SECTION: Options
// ============================================================================

/// Default node limit for a single suite.
pub const DEFAULT_MAX_NODES: usize = 4096;

/// Default prefix of generated dashboard identifiers.
pub const DEFAULT_DASHBOARD_PREFIX: &str = "suite_dashboard_";

/// How the pipeline reacts to a failing metric or test.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Record the failure on the node and its dependents, keep running.
    #[default]
    Isolate,
    /// Stop the run at the first failure.
    Abort,
}

/// Execution and export options for a suite.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuiteOptions {
    /// Reaction to node failures.
    pub failure_policy: FailurePolicy,
    /// Maximum number of registered nodes.
    pub max_nodes: usize,
    /// Prefix of generated dashboard identifiers.
    pub dashboard_prefix: String,
}

impl Default for SuiteOptions {
    fn default() -> Self {
        Self {
            failure_policy: FailurePolicy::Isolate,
            max_nodes: DEFAULT_MAX_NODES,
            dashboard_prefix: DEFAULT_DASHBOARD_PREFIX.to_string(),
        }
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Fatal problems found before any computation runs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    /// A node requires a semantic column the mapping does not assign.
    #[error("`{node}` requires the {role} mapping, which is not set")]
    MissingMapping {
        /// Node name.
        node: String,
        /// Unmapped role.
        role: ColumnRole,
    },
    /// A node requires a column absent from one of the datasets.
    #[error("`{node}` requires column `{column}`, which is missing from the {side} dataset")]
    MissingColumn {
        /// Node name.
        node: String,
        /// Column name.
        column: String,
        /// Dataset lacking the column.
        side: DatasetSide,
    },
    /// The dependency graph is invalid.
    #[error(transparent)]
    Graph(#[from] GraphError),
    /// Registration was attempted after verification.
    #[error("registration is closed once the suite has been verified")]
    RegistrationClosed,
}

/// Errors returned by suite operations.
#[derive(Debug, Error)]
pub enum SuiteError {
    /// The suite failed verification.
    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigurationError),
    /// A node failed under the abort policy.
    #[error("`{node}` failed: {source}")]
    Computation {
        /// Failing node name.
        node: String,
        /// Underlying failure.
        #[source]
        source: ComputationError,
    },
    /// Export failed.
    #[error("export error: {0}")]
    Export(#[from] ExportError),
    /// The suite was already run.
    #[error("suite has already run")]
    AlreadyRun,
    /// An internal invariant was broken.
    #[error("invariant violated: {0}")]
    InvariantViolation(String),
}

// ============================================================================
// SECTION: Verified Plan
// ============================================================================

/// Execution order produced by a successful verify.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedPlan {
    /// Node keys with dependencies first.
    order: ExecutionOrder<NodeKey>,
}

impl VerifiedPlan {
    /// Returns node keys in execution order.
    #[must_use]
    pub fn order(&self) -> &[NodeKey] {
        self.order.as_slice()
    }

    /// Returns the number of planned nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Returns true when nothing is planned.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Returns the execution position of a node.
    #[must_use]
    pub fn position(&self, key: NodeKey) -> Option<usize> {
        self.order.position(&key)
    }
}

// ============================================================================
// SECTION: Pipeline
// ============================================================================

/// Runs the phases of one suite over a borrowed context.
#[derive(Debug, Clone, Copy)]
pub struct ExecutionPipeline<'a> {
    /// Registered nodes.
    context: &'a SuiteContext,
    /// Execution options.
    options: &'a SuiteOptions,
}

impl<'a> ExecutionPipeline<'a> {
    /// Creates a pipeline over a context.
    #[must_use]
    pub const fn new(context: &'a SuiteContext, options: &'a SuiteOptions) -> Self {
        Self {
            context,
            options,
        }
    }

    /// Validates the context against the input and plans execution.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError`] for missing dependencies, cycles, node
    /// limits, unmapped roles, or missing columns.
    pub fn verify(&self, input: &InputData) -> Result<VerifiedPlan, ConfigurationError> {
        let limits = GraphLimits {
            max_nodes: self.options.max_nodes,
        };
        let order = self.context.graph().plan(limits)?;
        for metric in self.context.metrics() {
            verify_columns(metric.name(), &metric.required_columns(), input)?;
        }
        for test in self.context.tests() {
            verify_columns(test.name(), &test.required_columns(), input)?;
        }
        info!(
            metrics = self.context.metrics().len(),
            tests = self.context.tests().len(),
            "suite verified"
        );
        Ok(VerifiedPlan {
            order,
        })
    }

    /// Computes every planned metric once, dependencies first.
    ///
    /// # Errors
    ///
    /// Returns [`SuiteError::Computation`] under [`FailurePolicy::Abort`] and
    /// [`SuiteError::InvariantViolation`] when a metric is recorded twice.
    pub fn calculate(&self, plan: &VerifiedPlan, input: &InputData) -> Result<MetricStore, SuiteError> {
        let mut store = MetricStore::default();
        for &key in plan.order() {
            let Some(metric) = self.context.metric(key) else {
                continue;
            };
            let outcome = match failed_metric(&metric.dependencies(), &store) {
                Some(err) => Err(err),
                None => metric.calculate(input, &store),
            };
            match &outcome {
                Ok(_) => debug!(metric = metric.name(), "metric calculated"),
                Err(err) => {
                    if self.options.failure_policy == FailurePolicy::Abort {
                        return Err(SuiteError::Computation {
                            node: metric.name().to_string(),
                            source: err.clone(),
                        });
                    }
                    warn!(metric = metric.name(), error = %err, "metric calculation failed");
                }
            }
            if !store.record(key, metric.name(), outcome) {
                return Err(SuiteError::InvariantViolation(format!(
                    "metric `{}` computed twice",
                    metric.name()
                )));
            }
        }
        info!(metrics = store.len(), "metrics calculated");
        Ok(store)
    }

    /// Evaluates every planned test once, dependencies first.
    ///
    /// A test whose metric dependency failed is not invoked and receives an
    /// ERROR result naming the failed dependency.
    ///
    /// # Errors
    ///
    /// Returns [`SuiteError::Computation`] under [`FailurePolicy::Abort`] and
    /// [`SuiteError::InvariantViolation`] when a test is recorded twice.
    pub fn check(
        &self,
        plan: &VerifiedPlan,
        input: &InputData,
        metrics: &MetricStore,
    ) -> Result<TestResults, SuiteError> {
        let mut results = TestResults::default();
        for &key in plan.order() {
            let Some(test) = self.context.test(key) else {
                continue;
            };
            let metric_dependencies: Vec<MetricNode> = test
                .dependencies()
                .into_iter()
                .filter_map(|dependency| match dependency {
                    Dependency::Metric(node) => Some(node),
                    Dependency::Test(_) => None,
                })
                .collect();
            let outcome = match failed_metric(&metric_dependencies, metrics) {
                Some(err) => Err(err),
                None => test.check(&CheckContext::new(input, metrics, &results)),
            };
            let result = match outcome {
                Ok(result) => result,
                Err(err) => {
                    if self.options.failure_policy == FailurePolicy::Abort {
                        return Err(SuiteError::Computation {
                            node: test.name().to_string(),
                            source: err,
                        });
                    }
                    warn!(test = test.name(), error = %err, "test raised an error");
                    TestResult::error(test.name(), &err)
                }
            };
            debug!(test = test.name(), status = %result.status, "test checked");
            if !results.record(key, result) {
                return Err(SuiteError::InvariantViolation(format!(
                    "test `{}` checked twice",
                    test.name()
                )));
            }
        }
        info!(tests = results.len(), "tests checked");
        Ok(results)
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Ensures required roles are mapped and present in every supplied dataset.
fn verify_columns(
    node: &str,
    roles: &[ColumnRole],
    input: &InputData,
) -> Result<(), ConfigurationError> {
    for role in roles {
        let Some(columns) = input.column_mapping().resolve(role) else {
            return Err(ConfigurationError::MissingMapping {
                node: node.to_string(),
                role: role.clone(),
            });
        };
        for column in columns {
            for side in [DatasetSide::Current, DatasetSide::Reference] {
                let Some(dataset) = input.dataset(side) else {
                    continue;
                };
                if !dataset.has_column(&column) {
                    return Err(ConfigurationError::MissingColumn {
                        node: node.to_string(),
                        column,
                        side,
                    });
                }
            }
        }
    }
    Ok(())
}

/// Returns the failure of the first metric dependency without a value.
fn failed_metric(dependencies: &[MetricNode], store: &MetricStore) -> Option<ComputationError> {
    dependencies.iter().find_map(|dependency| {
        if let Some(err) = store.failure(dependency.key()) {
            return Some(ComputationError::DependencyFailed {
                node: dependency.name().to_string(),
                reason: err.to_string(),
            });
        }
        if store.contains(dependency.key()) {
            None
        } else {
            Some(ComputationError::MissingResult {
                node: dependency.name().to_string(),
            })
        }
    })
}
