// crates/checksuite-core/src/export/summary.rs
// ============================================================================
// Module: Status Summary
// Description: Status counts over a suite's results.
// Purpose: Back the summary counter widget and quick verdict displays.
// Dependencies: crate::core, serde
// ============================================================================

//! ## Overview
//! Counts cover every status, including ones no test produced.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::core::result::TestResult;
use crate::core::status::TestStatus;

/// Total and per-status result counts.
///
/// # Invariants
/// - `by_status` holds every [`TestStatus`] and its values sum to `total`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SuiteSummary {
    /// Number of results.
    pub total: usize,
    /// Result count per status.
    pub by_status: BTreeMap<TestStatus, usize>,
}

impl SuiteSummary {
    /// Counts the given results.
    #[must_use]
    pub fn from_results<'a, I>(results: I) -> Self
    where
        I: IntoIterator<Item = &'a TestResult>,
    {
        let mut by_status: BTreeMap<TestStatus, usize> =
            TestStatus::ALL.iter().map(|status| (*status, 0)).collect();
        let mut total = 0;
        for result in results {
            total += 1;
            *by_status.entry(result.status).or_insert(0) += 1;
        }
        Self {
            total,
            by_status,
        }
    }

    /// Returns the count for one status.
    #[must_use]
    pub fn count(&self, status: TestStatus) -> usize {
        self.by_status.get(&status).copied().unwrap_or(0)
    }
}
