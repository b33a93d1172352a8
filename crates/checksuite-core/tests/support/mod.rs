// crates/checksuite-core/tests/support/mod.rs
// ============================================================================
// Module: Test Support
// Description: Shared helpers and fixture nodes for suite integration tests.
// ============================================================================
//! ## Overview
//! Result helpers plus small metrics and tests with observable side effects
//! (invocation counters, scripted outcomes, late-bound dependencies).

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    dead_code,
    reason = "Test-only output and panic-based assertions are permitted."
)]

use std::error::Error;
use std::fmt;
use std::sync::Arc;
use std::sync::OnceLock;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;

use checksuite_core::Bin;
use checksuite_core::CellValue;
use checksuite_core::CheckContext;
use checksuite_core::ColumnMapping;
use checksuite_core::ColumnRole;
use checksuite_core::ComputationError;
use checksuite_core::Condition;
use checksuite_core::DataFrame;
use checksuite_core::DatasetSide;
use checksuite_core::Dependency;
use checksuite_core::InputData;
use checksuite_core::Metric;
use checksuite_core::MetricHandle;
use checksuite_core::MetricNode;
use checksuite_core::MetricStore;
use checksuite_core::Test;
use checksuite_core::TestDetails;
use checksuite_core::TestNode;
use checksuite_core::TestResult;
use checksuite_core::TestStatus;

// ========================================================================
// Test Result Helpers
// ========================================================================

/// Standard result type used across suite integration tests.
pub type CaseResult<T = ()> = Result<T, Box<dyn Error>>;

/// Lightweight error type for test assertions.
#[derive(Debug)]
struct CaseError {
    /// Human-readable failure message.
    message: String,
}

impl fmt::Display for CaseError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.message)
    }
}

impl Error for CaseError {}

/// Returns an error when a test condition fails.
///
/// # Errors
/// Returns a `CaseError` when the condition is false.
pub fn ensure(condition: bool, message: impl Into<String>) -> CaseResult {
    if condition {
        Ok(())
    } else {
        Err(Box::new(CaseError {
            message: message.into(),
        }))
    }
}

// ========================================================================
// Fixture Data
// ========================================================================

/// Labels shared by the classification fixtures.
const TARGET: [i64; 8] = [1, 0, 1, 1, 0, 0, 1, 0];
/// Predictions: tp=3, fn=1, fp=1, tn=3.
const PREDICTION: [i64; 8] = [1, 0, 0, 1, 1, 0, 1, 0];

/// Builds a frame with `target`, `prediction`, and `feature` columns.
pub fn classification_frame() -> DataFrame {
    DataFrame::new()
        .with_column("target", TARGET)
        .and_then(|frame| frame.with_column("prediction", PREDICTION))
        .and_then(|frame| frame.with_column("feature", [0.5, 1.5, 2.5, 3.5, 4.5, 5.5, 6.5, 7.5]))
        .expect("fixture frame is rectangular")
}

/// Mapping with both target and prediction set.
pub fn full_mapping() -> ColumnMapping {
    ColumnMapping::new().with_target("target").with_prediction_labels("prediction")
}

/// Input with identical reference and current frames.
pub fn classification_input() -> InputData {
    InputData::from_frames(Some(classification_frame()), classification_frame(), full_mapping())
}

// ========================================================================
// Metrics
// ========================================================================

/// Metric returning a constant while counting invocations.
pub struct CountingMetric {
    /// Display name.
    name: String,
    /// Returned value.
    value: f64,
    /// Invocation counter.
    calls: Arc<AtomicUsize>,
}

impl CountingMetric {
    /// Creates a handle and the counter it increments.
    pub fn handle(name: &str, value: f64) -> (MetricHandle<Self>, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let metric = Self {
            name: name.to_string(),
            value,
            calls: Arc::clone(&calls),
        };
        (MetricHandle::new(metric), calls)
    }
}

impl Metric for CountingMetric {
    type Output = f64;

    fn name(&self) -> &str {
        &self.name
    }

    fn calculate(&self, _input: &InputData, _metrics: &MetricStore) -> Result<f64, ComputationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.value)
    }
}

/// Confusion-matrix based quality scores.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quality {
    /// Share of correct predictions.
    pub accuracy: f64,
    /// Precision of the positive label.
    pub precision: f64,
    /// Recall of the positive label.
    pub recall: f64,
    /// Harmonic mean of precision and recall.
    pub f1: f64,
}

/// Binary classification quality over the current dataset.
pub struct ClassificationQuality {
    /// Invocation counter.
    pub calls: Arc<AtomicUsize>,
}

impl ClassificationQuality {
    /// Creates a handle and its invocation counter.
    pub fn handle() -> (MetricHandle<Self>, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        (
            MetricHandle::new(Self {
                calls: Arc::clone(&calls),
            }),
            calls,
        )
    }
}

/// Returns `numerator / denominator`, or zero for an empty denominator.
fn ratio(numerator: u32, denominator: u32) -> f64 {
    if denominator == 0 { 0.0 } else { f64::from(numerator) / f64::from(denominator) }
}

impl Metric for ClassificationQuality {
    type Output = Quality;

    fn name(&self) -> &str {
        "classification_quality"
    }

    fn required_columns(&self) -> Vec<ColumnRole> {
        vec![ColumnRole::Target, ColumnRole::Prediction]
    }

    fn calculate(&self, input: &InputData, _metrics: &MetricStore) -> Result<Quality, ComputationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let target = input.target(DatasetSide::Current).ok_or(ComputationError::MissingColumn {
            column: "target".to_string(),
            side: DatasetSide::Current,
        })?;
        let prediction = input.current().column("prediction").ok_or(ComputationError::MissingColumn {
            column: "prediction".to_string(),
            side: DatasetSide::Current,
        })?;
        let positive = CellValue::Int(1);
        let (mut tp, mut fp, mut fn_, mut tn) = (0u32, 0u32, 0u32, 0u32);
        for (actual, predicted) in target.iter().zip(prediction) {
            match (actual == &positive, predicted == &positive) {
                (true, true) => tp += 1,
                (false, true) => fp += 1,
                (true, false) => fn_ += 1,
                (false, false) => tn += 1,
            }
        }
        let precision = ratio(tp, tp + fp);
        let recall = ratio(tp, tp + fn_);
        let f1 = if precision + recall == 0.0 {
            0.0
        } else {
            2.0 * precision * recall / (precision + recall)
        };
        Ok(Quality {
            accuracy: ratio(tp + tn, tp + tn + fp + fn_),
            precision,
            recall,
            f1,
        })
    }
}

/// Metric that always fails.
pub struct FailingMetric;

impl Metric for FailingMetric {
    type Output = f64;

    fn name(&self) -> &str {
        "failing_metric"
    }

    fn calculate(&self, _input: &InputData, _metrics: &MetricStore) -> Result<f64, ComputationError> {
        Err(ComputationError::failed("metric exploded"))
    }
}

/// Metric doubling the value of another metric.
pub struct DoubledMetric {
    /// Source metric.
    pub source: MetricHandle<CountingMetric>,
}

impl Metric for DoubledMetric {
    type Output = f64;

    fn name(&self) -> &str {
        "doubled"
    }

    fn dependencies(&self) -> Vec<MetricNode> {
        vec![self.source.node()]
    }

    fn calculate(&self, _input: &InputData, metrics: &MetricStore) -> Result<f64, ComputationError> {
        Ok(metrics.get(&self.source)? * 2.0)
    }
}

/// Counting metric built on top of [`FailingMetric`].
pub struct ChainedMetric {
    /// Upstream metric.
    source: MetricHandle<FailingMetric>,
    /// Invocation counter.
    calls: Arc<AtomicUsize>,
}

impl ChainedMetric {
    /// Creates a handle over the given upstream and the counter it increments.
    pub fn handle(source: &MetricHandle<FailingMetric>) -> (MetricHandle<Self>, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let metric = Self {
            source: source.clone(),
            calls: Arc::clone(&calls),
        };
        (MetricHandle::new(metric), calls)
    }
}

impl Metric for ChainedMetric {
    type Output = f64;

    fn name(&self) -> &str {
        "chained"
    }

    fn dependencies(&self) -> Vec<MetricNode> {
        vec![self.source.node()]
    }

    fn calculate(&self, _input: &InputData, metrics: &MetricStore) -> Result<f64, ComputationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(metrics.get(&self.source)? + 1.0)
    }
}

// ========================================================================
// Tests
// ========================================================================

/// Test checking one value extracted from a metric against a condition.
pub struct ValueTest<M: Metric> {
    /// Display name.
    name: String,
    /// Metric read by the test.
    metric: MetricHandle<M>,
    /// Extracts the checked value from the metric output.
    extract: fn(&M::Output) -> f64,
    /// Condition the value must satisfy.
    condition: Condition,
}

impl<M: Metric> ValueTest<M> {
    /// Creates a test node.
    pub fn node(
        name: &str,
        metric: &MetricHandle<M>,
        extract: fn(&M::Output) -> f64,
        condition: Condition,
    ) -> TestNode {
        TestNode::new(Self {
            name: name.to_string(),
            metric: metric.clone(),
            extract,
            condition,
        })
    }
}

impl<M: Metric> Test for ValueTest<M> {
    fn name(&self) -> &str {
        &self.name
    }

    fn dependencies(&self) -> Vec<Dependency> {
        vec![Dependency::from(&self.metric)]
    }

    fn check(&self, ctx: &CheckContext<'_>) -> Result<TestResult, ComputationError> {
        let value = (self.extract)(ctx.metric(&self.metric)?);
        let description = format!("{} is {value:.3}", self.name);
        Ok(TestResult::from_condition(self.name.clone(), description, value, self.condition)
            .with_parameter("value", value))
    }
}

/// Drift check comparing the target mean between reference and current.
pub struct TargetDriftTest {
    /// Largest tolerated absolute difference of means.
    pub threshold: f64,
}

/// Returns the mean of the numeric cells, or zero when there are none.
#[allow(clippy::cast_precision_loss, reason = "Fixture sizes are tiny.")]
fn mean(values: &[CellValue]) -> f64 {
    let numbers: Vec<f64> = values.iter().filter_map(CellValue::as_f64).collect();
    if numbers.is_empty() { 0.0 } else { numbers.iter().sum::<f64>() / numbers.len() as f64 }
}

impl Test for TargetDriftTest {
    fn name(&self) -> &str {
        "target_drift"
    }

    fn required_columns(&self) -> Vec<ColumnRole> {
        vec![ColumnRole::Target]
    }

    fn check(&self, ctx: &CheckContext<'_>) -> Result<TestResult, ComputationError> {
        let input = ctx.input();
        let current = input.target(DatasetSide::Current).ok_or(ComputationError::MissingColumn {
            column: "target".to_string(),
            side: DatasetSide::Current,
        })?;
        let reference = input.target(DatasetSide::Reference).unwrap_or_default();
        let drift = (mean(reference) - mean(current)).abs();
        let status = if drift <= self.threshold { TestStatus::Success } else { TestStatus::Fail };
        Ok(TestResult::new("target_drift", format!("target mean moved by {drift:.3}"), status)
            .with_details(TestDetails::Distribution {
                column: "target".to_string(),
                reference: vec![Bin::new("mean", mean(reference))],
                current: vec![Bin::new("mean", mean(current))],
            }))
    }
}

/// Test returning a scripted status.
pub struct FixedTest {
    /// Display name.
    pub name: String,
    /// Returned status.
    pub status: TestStatus,
    /// Whether WARNING counts as a pass.
    pub warning_passes: bool,
}

impl FixedTest {
    /// Creates a node returning `status`.
    pub fn node(name: &str, status: TestStatus) -> TestNode {
        TestNode::new(Self {
            name: name.to_string(),
            status,
            warning_passes: false,
        })
    }

    /// Creates a node returning WARNING that treats WARNING as a pass.
    pub fn lenient_warning(name: &str) -> TestNode {
        TestNode::new(Self {
            name: name.to_string(),
            status: TestStatus::Warning,
            warning_passes: true,
        })
    }
}

impl Test for FixedTest {
    fn name(&self) -> &str {
        &self.name
    }

    fn check(&self, _ctx: &CheckContext<'_>) -> Result<TestResult, ComputationError> {
        Ok(TestResult::new(self.name.clone(), "scripted outcome", self.status))
    }

    fn is_passed(&self, result: &TestResult) -> bool {
        result.status.is_success() || (self.warning_passes && result.status == TestStatus::Warning)
    }
}

/// Test whose check always raises.
pub struct RaisingTest;

impl Test for RaisingTest {
    fn name(&self) -> &str {
        "raising"
    }

    fn check(&self, _ctx: &CheckContext<'_>) -> Result<TestResult, ComputationError> {
        Err(ComputationError::failed("check raised"))
    }
}

/// Test reporting whether its metric was computed before the check ran.
pub struct ProbeTest {
    /// Display name.
    pub name: String,
    /// Metric that must be ready.
    pub metric: MetricNode,
}

impl Test for ProbeTest {
    fn name(&self) -> &str {
        &self.name
    }

    fn dependencies(&self) -> Vec<Dependency> {
        vec![Dependency::Metric(self.metric.clone())]
    }

    fn check(&self, ctx: &CheckContext<'_>) -> Result<TestResult, ComputationError> {
        let ready = ctx.metrics().is_computed(self.metric.key());
        let status = if ready { TestStatus::Success } else { TestStatus::Fail };
        Ok(TestResult::new(self.name.clone(), "metric readiness", status))
    }
}

/// Test that mirrors the status of another test.
pub struct MirrorTest {
    /// Test being mirrored.
    pub upstream: TestNode,
}

impl Test for MirrorTest {
    fn name(&self) -> &str {
        "mirror"
    }

    fn dependencies(&self) -> Vec<Dependency> {
        vec![Dependency::from(&self.upstream)]
    }

    fn check(&self, ctx: &CheckContext<'_>) -> Result<TestResult, ComputationError> {
        let upstream = ctx.test_result(&self.upstream).ok_or(ComputationError::MissingResult {
            node: self.upstream.name().to_string(),
        })?;
        Ok(TestResult::new("mirror", "mirrors upstream", upstream.status))
    }
}

/// Test whose dependency is bound after construction, allowing cycles.
pub struct LateBoundTest {
    /// Display name.
    name: String,
    /// Dependency slot shared with the creator.
    slot: Arc<OnceLock<Dependency>>,
}

impl LateBoundTest {
    /// Creates an unbound test node and the slot that binds its dependency.
    pub fn node(name: &str) -> (TestNode, Arc<OnceLock<Dependency>>) {
        let slot = Arc::new(OnceLock::new());
        let node = TestNode::new(Self {
            name: name.to_string(),
            slot: Arc::clone(&slot),
        });
        (node, slot)
    }
}

impl Test for LateBoundTest {
    fn name(&self) -> &str {
        &self.name
    }

    fn dependencies(&self) -> Vec<Dependency> {
        self.slot.get().cloned().into_iter().collect()
    }

    fn check(&self, _ctx: &CheckContext<'_>) -> Result<TestResult, ComputationError> {
        Ok(TestResult::success(self.name.clone(), "late bound"))
    }
}
