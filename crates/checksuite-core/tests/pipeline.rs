// crates/checksuite-core/tests/pipeline.rs
// ============================================================================
// Module: Execution Pipeline Tests
// Description: Phase ordering, deduplication, failure policy, and lifecycle.
// ============================================================================
//! ## Overview
//! Exercises verify, calculate, and check both through the suite facade and
//! directly over a hand-built context.

mod support;

use std::sync::atomic::Ordering;

use calc_graph::GraphError;
use checksuite_core::ColumnMapping;
use checksuite_core::ColumnRole;
use checksuite_core::ComputationError;
use checksuite_core::Condition;
use checksuite_core::ConfigurationError;
use checksuite_core::DataFrame;
use checksuite_core::DatasetSide;
use checksuite_core::Dependency;
use checksuite_core::ExecutionPipeline;
use checksuite_core::FailurePolicy;
use checksuite_core::InputData;
use checksuite_core::MetricHandle;
use checksuite_core::SuiteContext;
use checksuite_core::SuiteError;
use checksuite_core::SuiteOptions;
use checksuite_core::SuiteState;
use checksuite_core::TestNode;
use checksuite_core::TestStatus;
use checksuite_core::TestSuite;
use support::CaseResult;
use support::ChainedMetric;
use support::ClassificationQuality;
use support::CountingMetric;
use support::DoubledMetric;
use support::FailingMetric;
use support::FixedTest;
use support::LateBoundTest;
use support::MirrorTest;
use support::ProbeTest;
use support::RaisingTest;
use support::ValueTest;
use support::classification_frame;
use support::classification_input;
use support::ensure;

/// Options using the abort failure policy.
fn abort_options() -> SuiteOptions {
    SuiteOptions {
        failure_policy: FailurePolicy::Abort,
        ..SuiteOptions::default()
    }
}

// ============================================================================
// SECTION: Deduplication and Ordering
// ============================================================================

#[test]
fn test_metric_shared_by_two_tests_runs_once() -> CaseResult {
    let (metric, calls) = CountingMetric::handle("shared", 1.0);
    let first = ValueTest::node("first", &metric, |value: &f64| *value, Condition::eq(1.0));
    let second = ValueTest::node("second", &metric, |value: &f64| *value, Condition::lt(2.0));
    let mut suite = TestSuite::new([first, second])?;
    suite.run(&classification_input())?;

    ensure(calls.load(Ordering::SeqCst) == 1, "shared metric invoked once")?;
    ensure(suite.context().metrics().len() == 1, "one metric registered")?;
    ensure(suite.is_passed(), "both tests pass")?;
    Ok(())
}

#[test]
fn test_equal_metrics_built_separately_run_twice() -> CaseResult {
    let (left, left_calls) = CountingMetric::handle("value", 1.0);
    let (right, right_calls) = CountingMetric::handle("value", 1.0);
    let tests = [
        ValueTest::node("left", &left, |value: &f64| *value, Condition::any()),
        ValueTest::node("right", &right, |value: &f64| *value, Condition::any()),
    ];
    let mut suite = TestSuite::new(tests)?;
    suite.run(&classification_input())?;

    ensure(left_calls.load(Ordering::SeqCst) == 1, "left metric computed")?;
    ensure(right_calls.load(Ordering::SeqCst) == 1, "right metric computed")?;
    ensure(suite.context().metrics().len() == 2, "identity, not equality, decides")?;
    Ok(())
}

#[test]
fn test_metric_is_stored_before_dependent_test_checks() -> CaseResult {
    let (metric, _) = CountingMetric::handle("ready", 3.0);
    let probe = TestNode::new(ProbeTest {
        name: "probe".to_string(),
        metric: metric.node(),
    });
    let mut suite = TestSuite::new([probe])?;
    suite.run(&classification_input())?;

    let (_, result) = suite.results().next().ok_or("probe result")?;
    ensure(result.status == TestStatus::Success, "metric was ready at check time")?;
    Ok(())
}

#[test]
fn test_metric_dependencies_are_discovered_and_ordered() -> CaseResult {
    let (source, source_calls) = CountingMetric::handle("source", 2.5);
    let doubled = MetricHandle::new(DoubledMetric {
        source: source.clone(),
    });
    let test = ValueTest::node("doubled_is_five", &doubled, |value: &f64| *value, Condition::eq(5.0));
    let mut suite = TestSuite::new([test])?;

    let names: Vec<&str> = suite.context().metrics().iter().map(|metric| metric.name()).collect();
    ensure(names == ["source", "doubled"], format!("metrics registered dependency first: {names:?}"))?;

    suite.run(&classification_input())?;
    ensure(source_calls.load(Ordering::SeqCst) == 1, "source computed once")?;
    ensure(suite.metric_value(&doubled) == Some(&5.0), "doubled value stored")?;
    ensure(suite.metric_value(&source) == Some(&2.5), "source value stored")?;
    ensure(suite.is_passed(), "doubled value satisfies the condition")?;
    Ok(())
}

#[test]
fn test_dependent_test_reads_upstream_result() -> CaseResult {
    let upstream = FixedTest::node("upstream", TestStatus::Warning);
    let mirror = TestNode::new(MirrorTest {
        upstream: upstream.clone(),
    });
    let mut suite = TestSuite::new([mirror.clone()])?;
    suite.run(&classification_input())?;

    let names: Vec<&str> = suite.results().map(|(_, result)| result.name.as_str()).collect();
    ensure(names == ["upstream", "mirror"], format!("dependency test registered first: {names:?}"))?;
    let mirrored = suite.result_for(&mirror).ok_or("mirror result")?;
    ensure(mirrored.status == TestStatus::Warning, "mirror copies the upstream status")?;
    Ok(())
}

#[test]
fn test_top_level_test_keeps_first_registration_position() -> CaseResult {
    let upstream = FixedTest::node("upstream", TestStatus::Success);
    let mirror = TestNode::new(MirrorTest {
        upstream: upstream.clone(),
    });
    let suite = TestSuite::new([mirror, upstream])?;

    let names: Vec<&str> = suite.context().tests().iter().map(TestNode::name).collect();
    ensure(names == ["upstream", "mirror"], format!("registration order: {names:?}"))?;
    Ok(())
}

// ============================================================================
// SECTION: Graph Validation
// ============================================================================

#[test]
fn test_cyclic_tests_are_rejected_during_verify() -> CaseResult {
    let (first, first_slot) = LateBoundTest::node("first");
    let (second, second_slot) = LateBoundTest::node("second");
    first_slot.set(Dependency::from(&second)).map_err(|_| "slot already bound")?;
    second_slot.set(Dependency::from(&first)).map_err(|_| "slot already bound")?;

    let mut suite = TestSuite::new([first])?;
    let err = suite.run(&classification_input()).err().ok_or("cycle must be rejected")?;
    ensure(
        matches!(err, SuiteError::Configuration(ConfigurationError::Graph(GraphError::Cycle { .. }))),
        format!("expected cycle error, got {err}"),
    )?;
    ensure(suite.results().next().is_none(), "nothing was checked")?;
    ensure(suite.state() == SuiteState::Unverified, "state unchanged")?;
    Ok(())
}

#[test]
fn test_unregistered_dependency_is_reported() -> CaseResult {
    let (metric, _) = CountingMetric::handle("orphan", 1.0);
    let test = ValueTest::node("needs_orphan", &metric, |value: &f64| *value, Condition::any());
    let mut context = SuiteContext::new();
    context.add_tests([test])?;

    let options = SuiteOptions::default();
    let err = ExecutionPipeline::new(&context, &options)
        .verify(&classification_input())
        .err()
        .ok_or("missing dependency must be rejected")?;
    ensure(
        err == ConfigurationError::Graph(GraphError::MissingDependency {
            node: "needs_orphan".to_string(),
            dependency: "orphan".to_string(),
        }),
        format!("unexpected error: {err}"),
    )?;
    Ok(())
}

#[test]
fn test_node_limit_is_enforced() -> CaseResult {
    let tests = [FixedTest::node("a", TestStatus::Success), FixedTest::node("b", TestStatus::Success)];
    let options = SuiteOptions {
        max_nodes: 1,
        ..SuiteOptions::default()
    };
    let mut suite = TestSuite::with_options(tests, options)?;
    let err = suite.run(&classification_input()).err().ok_or("limit must be enforced")?;
    ensure(
        matches!(
            err,
            SuiteError::Configuration(ConfigurationError::Graph(GraphError::TooManyNodes {
                max: 1,
                actual: 2,
            }))
        ),
        format!("unexpected error: {err}"),
    )?;
    Ok(())
}

#[test]
fn test_missing_reference_column_is_reported() -> CaseResult {
    let (quality, _) = ClassificationQuality::handle();
    let test = ValueTest::node("accuracy", &quality, |q: &support::Quality| q.accuracy, Condition::any());
    let mut suite = TestSuite::new([test])?;

    let reference = DataFrame::new().with_column("target", [1_i64, 0])?;
    let mapping = ColumnMapping::new().with_target("target").with_prediction_labels("prediction");
    let input = InputData::from_frames(Some(reference), classification_frame(), mapping);
    let err = suite.run(&input).err().ok_or("missing column must be rejected")?;
    ensure(
        matches!(
            &err,
            SuiteError::Configuration(ConfigurationError::MissingColumn {
                side: DatasetSide::Reference,
                column,
                ..
            }) if column == "prediction"
        ),
        format!("unexpected error: {err}"),
    )?;
    Ok(())
}

#[test]
fn test_named_column_requirement_checks_current_data() -> CaseResult {
    struct NeedsColumn;

    impl checksuite_core::Test for NeedsColumn {
        fn name(&self) -> &str {
            "needs_column"
        }

        fn required_columns(&self) -> Vec<ColumnRole> {
            vec![ColumnRole::column("absent")]
        }

        fn check(
            &self,
            _ctx: &checksuite_core::CheckContext<'_>,
        ) -> Result<checksuite_core::TestResult, ComputationError> {
            Ok(checksuite_core::TestResult::success("needs_column", "unreachable"))
        }
    }

    let mut suite = TestSuite::new([TestNode::new(NeedsColumn)])?;
    let err = suite.run(&classification_input()).err().ok_or("absent column rejected")?;
    ensure(
        matches!(
            err,
            SuiteError::Configuration(ConfigurationError::MissingColumn {
                side: DatasetSide::Current,
                ..
            })
        ),
        format!("unexpected error: {err}"),
    )?;
    Ok(())
}

// ============================================================================
// SECTION: Failure Policy
// ============================================================================

#[test]
fn test_failed_metric_marks_dependents_as_error() -> CaseResult {
    let failing = MetricHandle::new(FailingMetric);
    let dependent = ValueTest::node("dependent", &failing, |value: &f64| *value, Condition::any());
    let independent = FixedTest::node("independent", TestStatus::Success);
    let mut suite = TestSuite::new([dependent.clone(), independent.clone()])?;
    suite.run(&classification_input())?;

    let dependent_result = suite.result_for(&dependent).ok_or("dependent result")?;
    ensure(dependent_result.status == TestStatus::Error, "dependent test errors")?;
    ensure(
        dependent_result.description.contains("failing_metric"),
        "error names the failed dependency",
    )?;
    let independent_result = suite.result_for(&independent).ok_or("independent result")?;
    ensure(independent_result.status == TestStatus::Success, "independent test still runs")?;
    ensure(suite.metric_value(&failing).is_none(), "failed metric has no value")?;
    ensure(suite.state() == SuiteState::Checked, "isolated failures complete the run")?;
    Ok(())
}

#[test]
fn test_metric_over_failed_metric_is_not_invoked() -> CaseResult {
    let failing = MetricHandle::new(FailingMetric);
    let (chained, calls) = ChainedMetric::handle(&failing);
    let dependent = ValueTest::node("dependent", &chained, |value: &f64| *value, Condition::any());
    let mut suite = TestSuite::new([dependent.clone()])?;
    suite.run(&classification_input())?;

    ensure(calls.load(Ordering::SeqCst) == 0, "downstream metric never calculates")?;
    ensure(suite.metric_value(&chained).is_none(), "downstream metric has no value")?;
    ensure(suite.metric_value(&failing).is_none(), "upstream metric has no value")?;
    let result = suite.result_for(&dependent).ok_or("dependent result")?;
    ensure(result.status == TestStatus::Error, "dependent test errors")?;
    ensure(
        result.description.contains("dependency `chained` failed")
            && result.description.contains("dependency `failing_metric` failed: metric exploded"),
        format!("error carries the nested reason: {}", result.description),
    )?;
    ensure(suite.state() == SuiteState::Checked, "isolated failures complete the run")?;
    Ok(())
}

#[test]
fn test_empty_probability_mapping_is_rejected() -> CaseResult {
    let (quality, calls) = ClassificationQuality::handle();
    let test = ValueTest::node("accuracy", &quality, |q: &support::Quality| q.accuracy, Condition::any());
    let mut suite = TestSuite::new([test])?;

    let mapping =
        ColumnMapping::new().with_target("target").with_prediction_probabilities(Vec::<String>::new());
    let input = InputData::from_frames(None, classification_frame(), mapping);
    let err = suite.run(&input).err().ok_or("empty prediction mapping must be rejected")?;
    ensure(
        matches!(
            &err,
            SuiteError::Configuration(ConfigurationError::MissingMapping {
                role: ColumnRole::Prediction,
                ..
            })
        ),
        format!("unexpected error: {err}"),
    )?;
    ensure(calls.load(Ordering::SeqCst) == 0, "verify runs before calculation")?;
    ensure(suite.state() == SuiteState::Unverified, "suite stays unverified")?;
    Ok(())
}

#[test]
fn test_abort_policy_stops_on_metric_failure() -> CaseResult {
    let failing = MetricHandle::new(FailingMetric);
    let dependent = ValueTest::node("dependent", &failing, |value: &f64| *value, Condition::any());
    let mut suite = TestSuite::with_options([dependent], abort_options())?;

    let err = suite.run(&classification_input()).err().ok_or("abort policy must fail the run")?;
    ensure(
        matches!(
            &err,
            SuiteError::Computation {
                node,
                source: ComputationError::Failed(_),
            } if node == "failing_metric"
        ),
        format!("unexpected error: {err}"),
    )?;
    ensure(suite.state() == SuiteState::Aborted, "suite is aborted")?;
    ensure(suite.results().next().is_none(), "no test was checked")?;
    Ok(())
}

#[test]
fn test_abort_policy_stops_on_raising_test() -> CaseResult {
    let mut suite = TestSuite::with_options([TestNode::new(RaisingTest)], abort_options())?;
    let err = suite.run(&classification_input()).err().ok_or("abort policy must fail the run")?;
    ensure(matches!(err, SuiteError::Computation { .. }), format!("unexpected error: {err}"))?;
    ensure(suite.state() == SuiteState::Aborted, "suite is aborted")?;
    Ok(())
}

// ============================================================================
// SECTION: Lifecycle
// ============================================================================

#[test]
fn test_second_run_is_refused() -> CaseResult {
    let mut suite = TestSuite::new([FixedTest::node("only", TestStatus::Success)])?;
    suite.run(&classification_input())?;
    let err = suite.run(&classification_input()).err().ok_or("second run must fail")?;
    ensure(matches!(err, SuiteError::AlreadyRun), format!("unexpected error: {err}"))?;
    ensure(suite.results().count() == 1, "first results are kept")?;
    Ok(())
}

#[test]
fn test_registration_closes_after_verify() -> CaseResult {
    let mut suite = TestSuite::new([FixedTest::node("first", TestStatus::Success)])?;
    suite.add_tests([FixedTest::node("second", TestStatus::Success)])?;
    ensure(suite.context().tests().len() == 2, "tests can be added before the run")?;

    suite.run(&classification_input())?;
    ensure(suite.context().is_sealed(), "context is sealed after the run")?;
    let err = suite
        .add_tests([FixedTest::node("late", TestStatus::Success)])
        .err()
        .ok_or("late registration must fail")?;
    ensure(
        matches!(err, SuiteError::Configuration(ConfigurationError::RegistrationClosed)),
        format!("unexpected error: {err}"),
    )?;
    ensure(suite.context().tests().len() == 2, "late test was not registered")?;
    Ok(())
}

#[test]
fn test_pipeline_phases_can_be_driven_directly() -> CaseResult {
    let (metric, calls) = CountingMetric::handle("direct", 4.0);
    let test = ValueTest::node("direct_test", &metric, |value: &f64| *value, Condition::gt(3.0));
    let mut context = SuiteContext::new();
    context.add_metrics([metric.node()])?;
    context.add_tests([test.clone()])?;

    let options = SuiteOptions::default();
    let input = classification_input();
    let pipeline = ExecutionPipeline::new(&context, &options);
    let plan = pipeline.verify(&input)?;
    ensure(plan.len() == 2, "plan holds both nodes")?;
    ensure(plan.position(metric.key()) < plan.position(test.key()), "metric planned first")?;

    let store = pipeline.calculate(&plan, &input)?;
    ensure(store.get(&metric)? == &4.0, "metric value stored")?;
    let results = pipeline.check(&plan, &input, &store)?;
    ensure(
        results.get(test.key()).map(|result| result.status) == Some(TestStatus::Success),
        "test succeeds",
    )?;
    ensure(calls.load(Ordering::SeqCst) == 1, "metric computed once")?;
    Ok(())
}
