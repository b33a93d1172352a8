// crates/checksuite-core/src/runtime/suite.rs
// ============================================================================
// Module: Test Suite
// Description: Facade driving discovery, the pipeline, and exports.
// Purpose: Provide the single entry point for building and running a suite.
// Dependencies: crate::{core, export, runtime}, serde_json, tracing
// ============================================================================

//! ## Overview
//! A [`TestSuite`] is built from top-level tests. Construction discovers and
//! registers their dependencies, then the tests themselves. `run` drives
//! verify, calculate, and check exactly once:
//!
//! ```text
//! Unverified --run--> Calculated --> Checked
//!                 \-- abort policy failure --> Aborted
//! ```
//!
//! A configuration error leaves the suite `Unverified` and unsealed so the
//! caller can correct the input and run again. There are no backward
//! transitions.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde_json::Value;
use tracing::info;

use crate::core::data::InputData;
use crate::core::identifiers::ReportId;
use crate::core::node::Metric;
use crate::core::node::MetricHandle;
use crate::core::node::TestNode;
use crate::core::result::TestResult;
use crate::export::dashboard::DashboardBundle;
use crate::export::dashboard::build_dashboard;
use crate::export::digest::ReportDigest;
use crate::export::digest::canonical_string;
use crate::export::digest::digest_canonical;
use crate::export::json::export_json;
use crate::export::renderer::RendererRegistry;
use crate::export::summary::SuiteSummary;
use crate::runtime::context::SuiteContext;
use crate::runtime::pipeline::ExecutionPipeline;
use crate::runtime::pipeline::SuiteError;
use crate::runtime::pipeline::SuiteOptions;
use crate::runtime::scanner::discover;
use crate::runtime::store::MetricStore;
use crate::runtime::store::TestResults;

// ============================================================================
// SECTION: Suite State
// ============================================================================

/// Lifecycle state of a suite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SuiteState {
    /// Not yet run, or the last attempt failed verification.
    Unverified,
    /// Metrics are computed; tests are being checked.
    Calculated,
    /// Every test has a result.
    Checked,
    /// A node failure stopped the run under the abort policy.
    Aborted,
}

// ============================================================================
// SECTION: Test Suite
// ============================================================================

/// Composable set of tests run against one reference/current pair.
#[derive(Debug)]
pub struct TestSuite {
    /// Registered nodes.
    context: SuiteContext,
    /// Execution and export options.
    options: SuiteOptions,
    /// Lifecycle state.
    state: SuiteState,
    /// Identifier of this suite instance.
    report_id: ReportId,
    /// Metric values from the last run.
    metrics: MetricStore,
    /// Test results from the last run.
    results: TestResults,
}

impl TestSuite {
    /// Builds a suite with default options.
    ///
    /// # Errors
    ///
    /// Returns [`SuiteError::Configuration`] when registration fails.
    pub fn new<I>(tests: I) -> Result<Self, SuiteError>
    where
        I: IntoIterator<Item = TestNode>,
    {
        Self::with_options(tests, SuiteOptions::default())
    }

    /// Builds a suite with explicit options.
    ///
    /// Dependencies of every test are registered first, then the tests in
    /// the given order.
    ///
    /// # Errors
    ///
    /// Returns [`SuiteError::Configuration`] when registration fails.
    pub fn with_options<I>(tests: I, options: SuiteOptions) -> Result<Self, SuiteError>
    where
        I: IntoIterator<Item = TestNode>,
    {
        let mut suite = Self {
            context: SuiteContext::new(),
            options,
            state: SuiteState::Unverified,
            report_id: ReportId::generate(),
            metrics: MetricStore::default(),
            results: TestResults::default(),
        };
        suite.add_tests(tests)?;
        Ok(suite)
    }

    /// Registers more tests together with everything they depend on.
    ///
    /// # Errors
    ///
    /// Returns [`SuiteError::Configuration`] once the suite has been verified.
    pub fn add_tests<I>(&mut self, tests: I) -> Result<(), SuiteError>
    where
        I: IntoIterator<Item = TestNode>,
    {
        let tests: Vec<TestNode> = tests.into_iter().collect();
        let discovery = discover(&tests);
        self.context.add_metrics(discovery.metrics)?;
        self.context.add_tests(discovery.tests)?;
        self.context.add_tests(tests)?;
        Ok(())
    }

    /// Replaces the renderer registry used by exports.
    #[must_use]
    pub fn with_renderers(mut self, renderers: RendererRegistry) -> Self {
        *self.context.renderers_mut() = renderers;
        self
    }

    /// Runs verify, calculate, and check in order.
    ///
    /// # Errors
    ///
    /// Returns [`SuiteError::AlreadyRun`] after a completed or aborted run,
    /// [`SuiteError::Configuration`] when verification fails, and
    /// [`SuiteError::Computation`] when a node fails under the abort policy.
    pub fn run(&mut self, input: &InputData) -> Result<(), SuiteError> {
        if self.state != SuiteState::Unverified {
            return Err(SuiteError::AlreadyRun);
        }
        info!(report_id = %self.report_id, "running suite");

        let plan = ExecutionPipeline::new(&self.context, &self.options).verify(input)?;
        self.context.seal();

        match ExecutionPipeline::new(&self.context, &self.options).calculate(&plan, input) {
            Ok(metrics) => self.metrics = metrics,
            Err(err) => {
                self.state = SuiteState::Aborted;
                return Err(err);
            }
        }
        self.state = SuiteState::Calculated;

        match ExecutionPipeline::new(&self.context, &self.options).check(&plan, input, &self.metrics) {
            Ok(results) => {
                self.results = results;
                self.state = SuiteState::Checked;
                info!(report_id = %self.report_id, passed = self.is_passed(), "suite finished");
                Ok(())
            }
            Err(err) => {
                self.state = SuiteState::Aborted;
                Err(err)
            }
        }
    }

    /// Returns the lifecycle state.
    #[must_use]
    pub const fn state(&self) -> SuiteState {
        self.state
    }

    /// Returns the identifier of this suite instance.
    #[must_use]
    pub const fn report_id(&self) -> ReportId {
        self.report_id
    }

    /// Returns the registered nodes.
    #[must_use]
    pub const fn context(&self) -> &SuiteContext {
        &self.context
    }

    /// Returns the options.
    #[must_use]
    pub const fn options(&self) -> &SuiteOptions {
        &self.options
    }

    /// Returns true when every recorded result passes its test's policy.
    ///
    /// A suite without results is vacuously green.
    #[must_use]
    pub fn is_passed(&self) -> bool {
        self.results().all(|(test, result)| test.is_passed(result))
    }

    /// Iterates results in registration order.
    pub fn results(&self) -> impl Iterator<Item = (&TestNode, &TestResult)> + '_ {
        self.context
            .tests()
            .iter()
            .filter_map(|test| self.results.get(test.key()).map(|result| (test, result)))
    }

    /// Returns the result of a registered test.
    #[must_use]
    pub fn result_for(&self, test: &TestNode) -> Option<&TestResult> {
        self.results.get(test.key())
    }

    /// Returns the computed value of a registered metric.
    #[must_use]
    pub fn metric_value<M: Metric>(&self, handle: &MetricHandle<M>) -> Option<&M::Output> {
        self.metrics.get(handle).ok()
    }

    /// Returns status counts over all results.
    #[must_use]
    pub fn summary(&self) -> SuiteSummary {
        SuiteSummary::from_results(self.results().map(|(_, result)| result))
    }

    /// Exports results as `{"tests": [...]}` in registration order.
    ///
    /// # Errors
    ///
    /// Returns [`SuiteError::Export`] when a result has no renderer.
    pub fn json(&self) -> Result<Value, SuiteError> {
        Ok(export_json(&self.context, &self.results)?)
    }

    /// Returns the JSON export as canonical (RFC 8785) text.
    ///
    /// # Errors
    ///
    /// Returns [`SuiteError::Export`] when rendering or serialization fails.
    pub fn json_string(&self) -> Result<String, SuiteError> {
        Ok(canonical_string(&self.json()?)?)
    }

    /// Returns the SHA-256 digest of the canonical JSON export.
    ///
    /// # Errors
    ///
    /// Returns [`SuiteError::Export`] when rendering or serialization fails.
    pub fn json_digest(&self) -> Result<ReportDigest, SuiteError> {
        Ok(digest_canonical(&self.json()?)?)
    }

    /// Builds the dashboard structure for the results.
    ///
    /// Every call generates a fresh dashboard identifier.
    ///
    /// # Errors
    ///
    /// Returns [`SuiteError::Export`] when a result has no renderer.
    pub fn dashboard(&self) -> Result<DashboardBundle, SuiteError> {
        Ok(build_dashboard(&self.context, &self.results, self.report_id, &self.options.dashboard_prefix)?)
    }
}
