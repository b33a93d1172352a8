// crates/checksuite-core/src/runtime/store.rs
// ============================================================================
// Module: Run Stores
// Description: Single-assignment metric values and test results.
// Purpose: Hold phase outputs and expose them to tests during check.
// Dependencies: crate::core
// ============================================================================

//! ## Overview
//! [`MetricStore`] is filled by the calculate phase and [`TestResults`] by the
//! check phase. Both are single-assignment: a second write for the same node
//! is refused, and the pipeline treats that as an invariant violation. Tests
//! read both through a [`CheckContext`].

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::HashMap;
use std::fmt;

use crate::core::data::InputData;
use crate::core::identifiers::NodeKey;
use crate::core::node::ComputationError;
use crate::core::node::Metric;
use crate::core::node::MetricHandle;
use crate::core::node::MetricValue;
use crate::core::node::TestNode;
use crate::core::result::TestResult;

// ============================================================================
// SECTION: Metric Store
// ============================================================================

/// Outcome recorded for one metric.
struct MetricSlot {
    /// Metric name, kept for diagnostics.
    name: String,
    /// Computed value or the failure that prevented it.
    outcome: Result<MetricValue, ComputationError>,
}

/// Computed metric values keyed by node identity.
///
/// # Invariants
/// - Each key is recorded at most once.
#[derive(Default)]
pub struct MetricStore {
    /// Outcomes by node.
    slots: HashMap<NodeKey, MetricSlot>,
    /// Keys in the order they were recorded.
    order: Vec<NodeKey>,
}

impl MetricStore {
    /// Returns the computed value of a metric.
    ///
    /// # Errors
    ///
    /// Returns [`ComputationError::MissingResult`] when nothing was recorded,
    /// [`ComputationError::DependencyFailed`] when the metric failed, and
    /// [`ComputationError::TypeMismatch`] when the stored type differs.
    pub fn get<M: Metric>(&self, handle: &MetricHandle<M>) -> Result<&M::Output, ComputationError> {
        let Some(slot) = self.slots.get(&handle.key()) else {
            return Err(ComputationError::MissingResult {
                node: handle.metric().name().to_string(),
            });
        };
        match &slot.outcome {
            Ok(value) => (**value).downcast_ref::<M::Output>().ok_or_else(|| {
                ComputationError::TypeMismatch {
                    node: slot.name.clone(),
                }
            }),
            Err(err) => Err(ComputationError::DependencyFailed {
                node: slot.name.clone(),
                reason: err.to_string(),
            }),
        }
    }

    /// Returns true when an outcome is recorded for the key.
    #[must_use]
    pub fn contains(&self, key: NodeKey) -> bool {
        self.slots.contains_key(&key)
    }

    /// Returns true when the key holds a computed value.
    #[must_use]
    pub fn is_computed(&self, key: NodeKey) -> bool {
        self.slots.get(&key).is_some_and(|slot| slot.outcome.is_ok())
    }

    /// Returns the recorded failure for the key.
    #[must_use]
    pub fn failure(&self, key: NodeKey) -> Option<&ComputationError> {
        self.slots.get(&key).and_then(|slot| slot.outcome.as_ref().err())
    }

    /// Returns keys in recording order.
    pub fn keys(&self) -> impl Iterator<Item = NodeKey> + '_ {
        self.order.iter().copied()
    }

    /// Returns the number of recorded metrics.
    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Returns true when nothing is recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Records a metric outcome; returns `false` when the key already exists.
    pub(crate) fn record(
        &mut self,
        key: NodeKey,
        name: &str,
        outcome: Result<MetricValue, ComputationError>,
    ) -> bool {
        if self.slots.contains_key(&key) {
            return false;
        }
        self.slots.insert(
            key,
            MetricSlot {
                name: name.to_string(),
                outcome,
            },
        );
        self.order.push(key);
        true
    }
}

impl fmt::Debug for MetricStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut list = f.debug_list();
        for key in &self.order {
            if let Some(slot) = self.slots.get(key) {
                list.entry(&(slot.name.as_str(), slot.outcome.is_ok()));
            }
        }
        list.finish()
    }
}

// ============================================================================
// SECTION: Test Results
// ============================================================================

/// Test results keyed by node identity.
///
/// # Invariants
/// - Each key is recorded at most once.
#[derive(Debug, Clone, Default)]
pub struct TestResults {
    /// Results by node.
    results: HashMap<NodeKey, TestResult>,
    /// Keys in check order.
    order: Vec<NodeKey>,
}

impl TestResults {
    /// Returns the result recorded for a key.
    #[must_use]
    pub fn get(&self, key: NodeKey) -> Option<&TestResult> {
        self.results.get(&key)
    }

    /// Iterates results in check order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeKey, &TestResult)> + '_ {
        self.order.iter().filter_map(|key| self.results.get(key).map(|result| (*key, result)))
    }

    /// Returns the number of results.
    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Returns true when no result is recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Records a result; returns `false` when the key already exists.
    pub(crate) fn record(&mut self, key: NodeKey, result: TestResult) -> bool {
        if self.results.contains_key(&key) {
            return false;
        }
        self.results.insert(key, result);
        self.order.push(key);
        true
    }
}

// ============================================================================
// SECTION: Check Context
// ============================================================================

/// Read-only view handed to [`crate::Test::check`].
#[derive(Clone, Copy)]
pub struct CheckContext<'a> {
    /// Run input.
    input: &'a InputData,
    /// Metric values from the calculate phase.
    metrics: &'a MetricStore,
    /// Results of tests checked so far.
    tests: &'a TestResults,
}

impl<'a> CheckContext<'a> {
    /// Creates a context over phase outputs.
    #[must_use]
    pub const fn new(input: &'a InputData, metrics: &'a MetricStore, tests: &'a TestResults) -> Self {
        Self {
            input,
            metrics,
            tests,
        }
    }

    /// Returns the run input.
    #[must_use]
    pub const fn input(&self) -> &'a InputData {
        self.input
    }

    /// Returns the metric store.
    #[must_use]
    pub const fn metrics(&self) -> &'a MetricStore {
        self.metrics
    }

    /// Returns the computed value of a metric.
    ///
    /// # Errors
    ///
    /// See [`MetricStore::get`].
    pub fn metric<M: Metric>(&self, handle: &MetricHandle<M>) -> Result<&'a M::Output, ComputationError> {
        self.metrics.get(handle)
    }

    /// Returns the result of a test checked earlier in the run.
    #[must_use]
    pub fn test_result(&self, test: &TestNode) -> Option<&'a TestResult> {
        self.tests.get(test.key())
    }
}
