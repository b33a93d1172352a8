// crates/checksuite-core/src/core/result.rs
// ============================================================================
// Module: Test Results
// Description: Per-test outcome records, detail payloads, and value conditions.
// Purpose: Carry what a test concluded and the evidence used to render it.
// Dependencies: crate::core::{node, status}, serde, serde_json
// ============================================================================

//! ## Overview
//! A [`TestResult`] is produced exactly once per test per run. Its
//! [`TestDetails`] payload is a closed set of shapes; exporters pick a
//! renderer by the payload's [`DetailKind`]. [`Condition`] models the
//! numeric bounds most value-threshold tests check against.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;
use serde_json::Map;
use serde_json::Value;

use crate::core::node::ComputationError;
use crate::core::status::TestStatus;

// ============================================================================
// SECTION: Conditions
// ============================================================================

/// Conjunction of numeric bounds.
///
/// # Invariants
/// - An empty condition accepts every value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    /// Value must equal this bound.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub eq: Option<f64>,
    /// Value must differ from this bound.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub not_eq: Option<f64>,
    /// Value must be strictly greater.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gt: Option<f64>,
    /// Value must be greater or equal.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gte: Option<f64>,
    /// Value must be strictly less.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lt: Option<f64>,
    /// Value must be less or equal.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lte: Option<f64>,
}

impl Condition {
    /// Condition with no bounds.
    #[must_use]
    pub const fn any() -> Self {
        Self {
            eq: None,
            not_eq: None,
            gt: None,
            gte: None,
            lt: None,
            lte: None,
        }
    }

    /// Condition `value == bound`.
    #[must_use]
    pub const fn eq(bound: f64) -> Self {
        Self::any().and_eq(bound)
    }

    /// Condition `value > bound`.
    #[must_use]
    pub const fn gt(bound: f64) -> Self {
        Self::any().and_gt(bound)
    }

    /// Condition `value >= bound`.
    #[must_use]
    pub const fn gte(bound: f64) -> Self {
        Self::any().and_gte(bound)
    }

    /// Condition `value < bound`.
    #[must_use]
    pub const fn lt(bound: f64) -> Self {
        Self::any().and_lt(bound)
    }

    /// Condition `value <= bound`.
    #[must_use]
    pub const fn lte(bound: f64) -> Self {
        Self::any().and_lte(bound)
    }

    /// Adds an equality bound.
    #[must_use]
    pub const fn and_eq(mut self, bound: f64) -> Self {
        self.eq = Some(bound);
        self
    }

    /// Adds an inequality bound.
    #[must_use]
    pub const fn and_not_eq(mut self, bound: f64) -> Self {
        self.not_eq = Some(bound);
        self
    }

    /// Adds a strict lower bound.
    #[must_use]
    pub const fn and_gt(mut self, bound: f64) -> Self {
        self.gt = Some(bound);
        self
    }

    /// Adds an inclusive lower bound.
    #[must_use]
    pub const fn and_gte(mut self, bound: f64) -> Self {
        self.gte = Some(bound);
        self
    }

    /// Adds a strict upper bound.
    #[must_use]
    pub const fn and_lt(mut self, bound: f64) -> Self {
        self.lt = Some(bound);
        self
    }

    /// Adds an inclusive upper bound.
    #[must_use]
    pub const fn and_lte(mut self, bound: f64) -> Self {
        self.lte = Some(bound);
        self
    }

    /// Returns true when no bound is set.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.eq.is_none()
            && self.not_eq.is_none()
            && self.gt.is_none()
            && self.gte.is_none()
            && self.lt.is_none()
            && self.lte.is_none()
    }

    /// Returns true when the value satisfies every set bound.
    #[must_use]
    #[allow(clippy::float_cmp, reason = "Equality bounds compare exact values.")]
    pub fn is_satisfied(&self, value: f64) -> bool {
        self.eq.is_none_or(|bound| value == bound)
            && self.not_eq.is_none_or(|bound| value != bound)
            && self.gt.is_none_or(|bound| value > bound)
            && self.gte.is_none_or(|bound| value >= bound)
            && self.lt.is_none_or(|bound| value < bound)
            && self.lte.is_none_or(|bound| value <= bound)
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bounds = [
            ("eq", self.eq),
            ("not_eq", self.not_eq),
            ("gt", self.gt),
            ("gte", self.gte),
            ("lt", self.lt),
            ("lte", self.lte),
        ];
        let mut wrote = false;
        for (name, bound) in bounds {
            let Some(bound) = bound else {
                continue;
            };
            if wrote {
                f.write_str(" and ")?;
            }
            write!(f, "{name}={bound}")?;
            wrote = true;
        }
        if !wrote {
            f.write_str("any value")?;
        }
        Ok(())
    }
}

// ============================================================================
// SECTION: Detail Payloads
// ============================================================================

/// Discriminant of [`TestDetails`], used to select a renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetailKind {
    /// No payload.
    None,
    /// Free text.
    Text,
    /// Single value checked against a condition.
    Threshold,
    /// Reference/current histogram of one column.
    Distribution,
    /// Tabular payload.
    Table,
}

impl DetailKind {
    /// Every kind in declaration order.
    pub const ALL: [Self; 5] = [Self::None, Self::Text, Self::Threshold, Self::Distribution, Self::Table];

    /// Returns the snake-case name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Text => "text",
            Self::Threshold => "threshold",
            Self::Distribution => "distribution",
            Self::Table => "table",
        }
    }
}

impl fmt::Display for DetailKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Histogram bin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bin {
    /// Bin label (category or interval).
    pub label: String,
    /// Count or share of rows in the bin.
    pub value: f64,
}

impl Bin {
    /// Creates a bin.
    #[must_use]
    pub fn new(label: impl Into<String>, value: f64) -> Self {
        Self {
            label: label.into(),
            value,
        }
    }
}

/// Evidence attached to a result for rendering.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TestDetails {
    /// No payload.
    #[default]
    None,
    /// Free text.
    Text {
        /// Section title.
        title: String,
        /// Body text.
        body: String,
    },
    /// Single value checked against a condition.
    Threshold {
        /// Observed value.
        value: f64,
        /// Condition the value was checked against.
        condition: Condition,
    },
    /// Reference/current histogram of one column.
    Distribution {
        /// Column the histogram describes.
        column: String,
        /// Reference bins, empty without a reference dataset.
        reference: Vec<Bin>,
        /// Current bins.
        current: Vec<Bin>,
    },
    /// Tabular payload.
    Table {
        /// Table title.
        title: String,
        /// Column headers.
        columns: Vec<String>,
        /// Rows of cells.
        rows: Vec<Vec<Value>>,
    },
}

impl TestDetails {
    /// Returns the payload kind.
    #[must_use]
    pub const fn kind(&self) -> DetailKind {
        match self {
            Self::None => DetailKind::None,
            Self::Text {
                ..
            } => DetailKind::Text,
            Self::Threshold {
                ..
            } => DetailKind::Threshold,
            Self::Distribution {
                ..
            } => DetailKind::Distribution,
            Self::Table {
                ..
            } => DetailKind::Table,
        }
    }

    /// Builds a text payload.
    #[must_use]
    pub fn text(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self::Text {
            title: title.into(),
            body: body.into(),
        }
    }
}

// ============================================================================
// SECTION: Test Result
// ============================================================================

/// Outcome of one test in one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestResult {
    /// Display name of the test.
    pub name: String,
    /// Human-readable explanation of the outcome.
    pub description: String,
    /// Outcome status.
    pub status: TestStatus,
    /// Test-specific fields exported with the result.
    #[serde(default)]
    pub parameters: Map<String, Value>,
    /// Rendering payload.
    #[serde(default)]
    pub details: TestDetails,
}

impl TestResult {
    /// Creates a result without parameters or details.
    #[must_use]
    pub fn new(name: impl Into<String>, description: impl Into<String>, status: TestStatus) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            status,
            parameters: Map::new(),
            details: TestDetails::None,
        }
    }

    /// Creates a SUCCESS result.
    #[must_use]
    pub fn success(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(name, description, TestStatus::Success)
    }

    /// Creates a WARNING result.
    #[must_use]
    pub fn warning(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(name, description, TestStatus::Warning)
    }

    /// Creates a FAIL result.
    #[must_use]
    pub fn fail(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(name, description, TestStatus::Fail)
    }

    /// Creates the ERROR result recorded when a test cannot complete.
    #[must_use]
    pub fn error(name: impl Into<String>, error: &ComputationError) -> Self {
        let message = error.to_string();
        Self::new(name, message.clone(), TestStatus::Error)
            .with_details(TestDetails::text("Error", message))
    }

    /// Checks a value against a condition and records both in the result.
    #[must_use]
    pub fn from_condition(
        name: impl Into<String>,
        description: impl Into<String>,
        value: f64,
        condition: Condition,
    ) -> Self {
        let status =
            if condition.is_satisfied(value) { TestStatus::Success } else { TestStatus::Fail };
        Self::new(name, description, status).with_details(TestDetails::Threshold {
            value,
            condition,
        })
    }

    /// Adds an exported parameter.
    #[must_use]
    pub fn with_parameter(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.parameters.insert(key.into(), value.into());
        self
    }

    /// Replaces the rendering payload.
    #[must_use]
    pub fn with_details(mut self, details: TestDetails) -> Self {
        self.details = details;
        self
    }
}
