// crates/checksuite-core/src/export/dashboard.rs
// ============================================================================
// Module: Dashboard Export
// Description: Dashboard structure listing a suite's results.
// Purpose: Describe the summary counter, the test list, and detail widgets.
// Dependencies: crate::{core, export, runtime}, serde, serde_json, uuid
// ============================================================================

//! ## Overview
//! A dashboard holds two widgets: a summary counter with the total and one
//! counter per status, and a `test_suite` list with one entry per result in
//! registration order. Each entry links its detail parts by id; the widgets
//! behind those ids travel alongside in [`DashboardBundle::additional_graphs`].
//! Each build generates a fresh dashboard id.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;
use serde_json::json;
use uuid::Uuid;

use crate::core::identifiers::ReportId;
use crate::core::status::TestStatus;
use crate::export::json::ordered_results;
use crate::export::renderer::ExportError;
use crate::export::summary::SuiteSummary;
use crate::export::widget::FULL_WIDTH;
use crate::export::widget::WidgetInfo;
use crate::runtime::context::SuiteContext;
use crate::runtime::store::TestResults;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Dashboard title.
pub const DASHBOARD_NAME: &str = "Test Suite";

/// Title of the summary counter widget.
pub const SUMMARY_WIDGET_TITLE: &str = "Test Summary";

// ============================================================================
// SECTION: Dashboard Model
// ============================================================================

/// Dashboard layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardInfo {
    /// Dashboard title.
    pub name: String,
    /// Widgets in display order.
    pub widgets: Vec<WidgetInfo>,
}

/// Dashboard with its identifiers and linked detail widgets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardBundle {
    /// Fresh dashboard identifier.
    pub dashboard_id: String,
    /// Identifier of the suite that produced the results.
    pub report_id: ReportId,
    /// Dashboard layout.
    pub info: DashboardInfo,
    /// Detail widgets keyed by part id.
    pub additional_graphs: BTreeMap<String, WidgetInfo>,
}

// ============================================================================
// SECTION: Builder
// ============================================================================

/// Builds the dashboard for a suite's results.
///
/// # Errors
///
/// Returns [`ExportError::MissingRenderer`] when a payload kind has no renderer.
pub fn build_dashboard(
    context: &SuiteContext,
    results: &TestResults,
    report_id: ReportId,
    prefix: &str,
) -> Result<DashboardBundle, ExportError> {
    let dashboard_id = format!("{prefix}{}", Uuid::new_v4().simple());
    let summary = SuiteSummary::from_results(ordered_results(context, results).map(|(_, result)| result));

    let mut entries = Vec::new();
    let mut additional_graphs = BTreeMap::new();
    for (test_index, (_, result)) in ordered_results(context, results).enumerate() {
        let renderer = context.renderers().resolve(result.details.kind())?;
        let rendered = renderer.render_html(result);
        let mut parts = Vec::with_capacity(rendered.details.len());
        for (part_index, part) in rendered.details.into_iter().enumerate() {
            let part_id = format!("{dashboard_id}_{test_index}_{part_index}");
            parts.push(json!({ "id": part_id, "title": part.title, "type": "widget" }));
            additional_graphs.insert(part_id, part.info);
        }
        entries.push(json!({
            "title": rendered.name,
            "description": rendered.description,
            "state": rendered.status.state(),
            "details": { "parts": parts },
        }));
    }

    let widgets = vec![summary_widget(&summary), test_list_widget(entries)];
    Ok(DashboardBundle {
        dashboard_id,
        report_id,
        info: DashboardInfo {
            name: DASHBOARD_NAME.to_string(),
            widgets,
        },
        additional_graphs,
    })
}

/// Builds the counter widget with the total and one counter per status.
fn summary_widget(summary: &SuiteSummary) -> WidgetInfo {
    let mut counters = vec![json!({ "value": summary.total.to_string(), "label": "Total Tests" })];
    for status in TestStatus::ALL {
        counters.push(json!({
            "value": summary.count(status).to_string(),
            "label": format!("{} Tests", status.title()),
        }));
    }
    WidgetInfo::new(SUMMARY_WIDGET_TITLE, "counter", FULL_WIDTH, json!({ "counters": counters }))
}

/// Builds the test list widget.
fn test_list_widget(entries: Vec<Value>) -> WidgetInfo {
    WidgetInfo::new("", "test_suite", FULL_WIDTH, json!({ "tests": entries }))
}
