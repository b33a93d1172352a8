// crates/checksuite-core/src/core/status.rs
// ============================================================================
// Module: Test Status
// Description: Closed outcome set for a single test.
// Purpose: Provide a totally ordered status with stable wire and display names.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Statuses order from best to worst: SUCCESS, WARNING, FAIL, ERROR. The same
//! order is used for summary counters and dashboard labels. Whether a status
//! counts as a pass is decided by each test, not here.

use std::fmt;

use serde::Deserialize;
use serde::Serialize;

/// Outcome of a single test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TestStatus {
    /// The checked condition holds.
    Success,
    /// The condition holds but something deserves attention.
    Warning,
    /// The checked condition does not hold.
    Fail,
    /// The test could not produce an outcome.
    Error,
}

impl TestStatus {
    /// Every status in display order.
    pub const ALL: [Self; 4] = [Self::Success, Self::Warning, Self::Fail, Self::Error];

    /// Returns the upper-case wire name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Success => "SUCCESS",
            Self::Warning => "WARNING",
            Self::Fail => "FAIL",
            Self::Error => "ERROR",
        }
    }

    /// Returns the title-case name used in summary labels.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Success => "Success",
            Self::Warning => "Warning",
            Self::Fail => "Fail",
            Self::Error => "Error",
        }
    }

    /// Returns the lower-case name used as dashboard state.
    #[must_use]
    pub const fn state(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Warning => "warning",
            Self::Fail => "fail",
            Self::Error => "error",
        }
    }

    /// Returns true for [`TestStatus::Success`].
    #[must_use]
    pub const fn is_success(self) -> bool {
        matches!(self, Self::Success)
    }
}

impl fmt::Display for TestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
