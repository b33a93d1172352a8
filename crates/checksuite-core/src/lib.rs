// crates/checksuite-core/src/lib.rs
// ============================================================================
// Module: Check Suite Core Library
// Description: Public API surface for the check suite engine.
// Purpose: Expose the data model, the runtime, and exporters.
// Dependencies: crate::{core, export, runtime}
// ============================================================================

//! ## Overview
//! Check suite core validates a current dataset against a reference dataset
//! by running a composable set of tests. Tests declare the metrics (and other
//! tests) they read; the engine discovers those declarations, computes each
//! shared metric exactly once, and runs the suite in three phases: verify,
//! calculate, check. Outcomes aggregate into a single verdict and can be
//! exported as JSON or as a dashboard structure.
//!
//! The engine knows nothing about the statistics behind any test. It only
//! knows that nodes declare inputs, that metrics are computed before tests
//! are checked, and that each test produces exactly one result per run.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod core;
pub mod export;
pub mod runtime;

#[cfg(test)]
mod tests;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use crate::core::data::CellValue;
pub use crate::core::data::ColumnMapping;
pub use crate::core::data::ColumnRole;
pub use crate::core::data::DataError;
pub use crate::core::data::DataFrame;
pub use crate::core::data::Dataset;
pub use crate::core::data::DatasetSide;
pub use crate::core::data::InputData;
pub use crate::core::data::PredictionColumns;
pub use crate::core::data::Row;
pub use crate::core::data::Rows;
pub use crate::core::identifiers::NodeKey;
pub use crate::core::identifiers::ReportId;
pub use crate::core::node::ComputationError;
pub use crate::core::node::Dependency;
pub use crate::core::node::Metric;
pub use crate::core::node::MetricHandle;
pub use crate::core::node::MetricNode;
pub use crate::core::node::Test;
pub use crate::core::node::TestNode;
pub use crate::core::result::Bin;
pub use crate::core::result::Condition;
pub use crate::core::result::DetailKind;
pub use crate::core::result::TestDetails;
pub use crate::core::result::TestResult;
pub use crate::core::status::TestStatus;
pub use crate::export::dashboard::DashboardBundle;
pub use crate::export::dashboard::DashboardInfo;
pub use crate::export::digest::DigestAlgorithm;
pub use crate::export::digest::ReportDigest;
pub use crate::export::renderer::DetailsPart;
pub use crate::export::renderer::ExportError;
pub use crate::export::renderer::RendererRegistry;
pub use crate::export::renderer::TestHtmlInfo;
pub use crate::export::renderer::TestRenderer;
pub use crate::export::summary::SuiteSummary;
pub use crate::export::widget::WidgetInfo;
pub use crate::runtime::context::SuiteContext;
pub use crate::runtime::pipeline::ConfigurationError;
pub use crate::runtime::pipeline::DEFAULT_DASHBOARD_PREFIX;
pub use crate::runtime::pipeline::DEFAULT_MAX_NODES;
pub use crate::runtime::pipeline::ExecutionPipeline;
pub use crate::runtime::pipeline::FailurePolicy;
pub use crate::runtime::pipeline::SuiteError;
pub use crate::runtime::pipeline::SuiteOptions;
pub use crate::runtime::pipeline::VerifiedPlan;
pub use crate::runtime::scanner::Discovery;
pub use crate::runtime::scanner::direct_dependencies;
pub use crate::runtime::scanner::discover;
pub use crate::runtime::store::CheckContext;
pub use crate::runtime::store::MetricStore;
pub use crate::runtime::store::TestResults;
pub use crate::runtime::suite::SuiteState;
pub use crate::runtime::suite::TestSuite;
