// crates/checksuite-core/src/tests.rs
// ============================================================================
// Module: Check Suite Core Unit Tests
// Description: Crate-internal checks for node identity and stores.
// Purpose: Exercise crate-private helpers that integration tests cannot reach.
// Dependencies: checksuite-core
// ============================================================================

//! ## Overview
//! Provides test-only lint relaxations and unit tests for engine internals.

// ============================================================================
// SECTION: Lint Configuration
// ============================================================================

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
    reason = "Test-only output and panic-based assertions are permitted."
)]

use std::sync::Arc;

use crate::ComputationError;
use crate::InputData;
use crate::Metric;
use crate::MetricHandle;
use crate::MetricStore;
use crate::NodeKey;
use crate::TestResult;
use crate::TestResults;
use crate::TestStatus;
use crate::core::node::MetricValue;

/// Metric returning a fixed number.
struct Constant(f64);

impl Metric for Constant {
    type Output = f64;

    fn name(&self) -> &str {
        "constant"
    }

    fn calculate(&self, _input: &InputData, _metrics: &MetricStore) -> Result<f64, ComputationError> {
        Ok(self.0)
    }
}

// ============================================================================
// SECTION: Node Identity
// ============================================================================

#[test]
fn handle_and_erased_node_share_a_key() {
    let handle = MetricHandle::new(Constant(1.0));
    assert_eq!(handle.key(), handle.node().key());
    assert_eq!(handle.key(), handle.clone().key());
}

#[test]
fn equal_metrics_built_separately_are_distinct_nodes() {
    let first = MetricHandle::new(Constant(1.0));
    let second = MetricHandle::new(Constant(1.0));
    assert_ne!(first.key(), second.key());
}

#[test]
fn node_key_follows_the_allocation() {
    let shared = Arc::new(5u8);
    assert_eq!(NodeKey::of(&shared), NodeKey::of(&Arc::clone(&shared)));
}

// ============================================================================
// SECTION: Single Assignment
// ============================================================================

#[test]
fn metric_store_refuses_second_write() {
    let handle = MetricHandle::new(Constant(2.0));
    let mut store = MetricStore::default();
    let first: MetricValue = Arc::new(2.0_f64);
    let second: MetricValue = Arc::new(3.0_f64);
    assert!(store.record(handle.key(), "constant", Ok(first)));
    assert!(!store.record(handle.key(), "constant", Ok(second)));
    assert_eq!(store.get(&handle), Ok(&2.0));
}

#[test]
fn metric_store_reports_type_mismatch() {
    let handle = MetricHandle::new(Constant(2.0));
    let mut store = MetricStore::default();
    let wrong: MetricValue = Arc::new("not a float".to_string());
    assert!(store.record(handle.key(), "constant", Ok(wrong)));
    assert_eq!(
        store.get(&handle),
        Err(ComputationError::TypeMismatch {
            node: "constant".to_string(),
        })
    );
}

#[test]
fn metric_store_wraps_recorded_failure() {
    let handle = MetricHandle::new(Constant(2.0));
    let mut store = MetricStore::default();
    assert!(store.record(handle.key(), "constant", Err(ComputationError::failed("boom"))));
    assert!(!store.is_computed(handle.key()));
    assert_eq!(
        store.get(&handle),
        Err(ComputationError::DependencyFailed {
            node: "constant".to_string(),
            reason: "boom".to_string(),
        })
    );
}

#[test]
fn test_results_refuse_second_write() {
    let handle = MetricHandle::new(Constant(0.0));
    let mut results = TestResults::default();
    assert!(results.record(handle.key(), TestResult::success("t", "first")));
    assert!(!results.record(handle.key(), TestResult::fail("t", "second")));
    assert_eq!(results.get(handle.key()).map(|result| result.status), Some(TestStatus::Success));
    assert_eq!(results.len(), 1);
}
