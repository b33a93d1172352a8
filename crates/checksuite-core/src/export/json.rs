// crates/checksuite-core/src/export/json.rs
// ============================================================================
// Module: JSON Export
// Description: Machine-readable export of a suite's results.
// Purpose: Emit `{"tests": [...]}` records in registration order.
// Dependencies: crate::{core, export::renderer, runtime}, serde_json
// ============================================================================

//! ## Overview
//! Records are produced by the renderer registered for each result's payload
//! kind and listed in the order tests were registered, not the order they
//! were checked. The output is deterministic for a fixed result set.

use serde_json::Map;
use serde_json::Value;

use crate::core::node::TestNode;
use crate::core::result::TestResult;
use crate::export::renderer::ExportError;
use crate::runtime::context::SuiteContext;
use crate::runtime::store::TestResults;

/// Builds the JSON export of a suite's results.
///
/// # Errors
///
/// Returns [`ExportError::MissingRenderer`] when a payload kind has no renderer.
pub fn export_json(context: &SuiteContext, results: &TestResults) -> Result<Value, ExportError> {
    let mut tests = Vec::with_capacity(results.len());
    for (_, result) in ordered_results(context, results) {
        let renderer = context.renderers().resolve(result.details.kind())?;
        tests.push(Value::Object(renderer.render_json(result)));
    }
    let mut root = Map::new();
    root.insert("tests".to_string(), Value::Array(tests));
    Ok(Value::Object(root))
}

/// Pairs registered tests with their results in registration order.
pub(crate) fn ordered_results<'a>(
    context: &'a SuiteContext,
    results: &'a TestResults,
) -> impl Iterator<Item = (&'a TestNode, &'a TestResult)> + 'a {
    context.tests().iter().filter_map(|test| results.get(test.key()).map(|result| (test, result)))
}
