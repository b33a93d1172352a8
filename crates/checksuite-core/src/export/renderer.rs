// crates/checksuite-core/src/export/renderer.rs
// ============================================================================
// Module: Result Renderers
// Description: Per-payload renderers and the registry that resolves them.
// Purpose: Turn test results into JSON records and widget parts.
// Dependencies: crate::{core, export::widget}, serde_json, thiserror
// ============================================================================

//! ## Overview
//! Exporters never inspect a result's payload themselves. They look up a
//! [`TestRenderer`] by the payload's [`DetailKind`] in a [`RendererRegistry`].
//! The default registry covers every kind; a custom registry may leave kinds
//! out, in which case exporting such a result fails with
//! [`ExportError::MissingRenderer`].

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde_json::Map;
use serde_json::Value;
use serde_json::json;
use thiserror::Error;

use crate::core::result::DetailKind;
use crate::core::result::TestDetails;
use crate::core::result::TestResult;
use crate::core::status::TestStatus;
use crate::export::widget::FULL_WIDTH;
use crate::export::widget::HALF_WIDTH;
use crate::export::widget::WidgetInfo;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors raised while exporting results.
#[derive(Debug, Error)]
pub enum ExportError {
    /// No renderer handles the payload kind of a result.
    #[error("no renderer registered for `{0}` details")]
    MissingRenderer(DetailKind),
    /// Canonical serialization failed.
    #[error("failed to serialize export: {0}")]
    Serialization(String),
}

// ============================================================================
// SECTION: Renderer Interface
// ============================================================================

/// Titled widget describing part of a result.
#[derive(Debug, Clone, PartialEq)]
pub struct DetailsPart {
    /// Part title shown in the test list.
    pub title: String,
    /// Widget drawn for the part.
    pub info: WidgetInfo,
}

/// Dashboard-facing rendering of one result.
#[derive(Debug, Clone, PartialEq)]
pub struct TestHtmlInfo {
    /// Test name.
    pub name: String,
    /// Outcome description.
    pub description: String,
    /// Outcome status.
    pub status: TestStatus,
    /// Detail parts in display order.
    pub details: Vec<DetailsPart>,
}

/// Renders results carrying one payload kind.
pub trait TestRenderer: Send + Sync {
    /// Returns the JSON record of a result.
    fn render_json(&self, result: &TestResult) -> Map<String, Value> {
        base_json(result)
    }

    /// Returns the dashboard rendering of a result.
    fn render_html(&self, result: &TestResult) -> TestHtmlInfo {
        base_html(result, Vec::new())
    }
}

/// Returns the fields every JSON record carries.
#[must_use]
pub fn base_json(result: &TestResult) -> Map<String, Value> {
    let mut record = Map::new();
    record.insert("name".to_string(), Value::String(result.name.clone()));
    record.insert("description".to_string(), Value::String(result.description.clone()));
    record.insert("status".to_string(), Value::String(result.status.as_str().to_string()));
    record.insert("parameters".to_string(), Value::Object(result.parameters.clone()));
    record
}

/// Returns a dashboard rendering with the given parts.
#[must_use]
pub fn base_html(result: &TestResult, details: Vec<DetailsPart>) -> TestHtmlInfo {
    TestHtmlInfo {
        name: result.name.clone(),
        description: result.description.clone(),
        status: result.status,
        details,
    }
}

// ============================================================================
// SECTION: Built-In Renderers
// ============================================================================

/// Renderer for results without a payload.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainRenderer;

impl TestRenderer for PlainRenderer {}

/// Renderer for free-text payloads.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextRenderer;

impl TestRenderer for TextRenderer {
    fn render_html(&self, result: &TestResult) -> TestHtmlInfo {
        let TestDetails::Text {
            title,
            body,
        } = &result.details
        else {
            return base_html(result, Vec::new());
        };
        let part = DetailsPart {
            title: title.clone(),
            info: WidgetInfo::new(title.clone(), "text", FULL_WIDTH, json!({ "text": body })),
        };
        base_html(result, vec![part])
    }
}

/// Renderer for value-versus-condition payloads.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThresholdRenderer;

impl TestRenderer for ThresholdRenderer {
    fn render_json(&self, result: &TestResult) -> Map<String, Value> {
        let mut record = base_json(result);
        if let TestDetails::Threshold {
            value,
            condition,
        } = &result.details
        {
            record.insert("value".to_string(), json!(value));
            record.insert("condition".to_string(), json!(condition));
        }
        record
    }

    fn render_html(&self, result: &TestResult) -> TestHtmlInfo {
        let TestDetails::Threshold {
            value,
            condition,
        } = &result.details
        else {
            return base_html(result, Vec::new());
        };
        let counters = json!({
            "counters": [{ "value": format!("{value:.3}"), "label": condition.to_string() }]
        });
        let part = DetailsPart {
            title: "Value".to_string(),
            info: WidgetInfo::new(result.name.clone(), "counter", HALF_WIDTH, counters),
        };
        base_html(result, vec![part])
    }
}

/// Renderer for reference/current histograms.
#[derive(Debug, Clone, Copy, Default)]
pub struct DistributionRenderer;

impl TestRenderer for DistributionRenderer {
    fn render_json(&self, result: &TestResult) -> Map<String, Value> {
        let mut record = base_json(result);
        if let TestDetails::Distribution {
            column,
            ..
        } = &result.details
        {
            record.insert("column".to_string(), Value::String(column.clone()));
        }
        record
    }

    fn render_html(&self, result: &TestResult) -> TestHtmlInfo {
        let TestDetails::Distribution {
            column,
            reference,
            current,
        } = &result.details
        else {
            return base_html(result, Vec::new());
        };
        let mut traces = Vec::new();
        for (name, bins) in [("reference", reference), ("current", current)] {
            if bins.is_empty() {
                continue;
            }
            let labels: Vec<&str> = bins.iter().map(|bin| bin.label.as_str()).collect();
            let values: Vec<f64> = bins.iter().map(|bin| bin.value).collect();
            traces.push(json!({ "name": name, "x": labels, "y": values }));
        }
        let params = json!({ "data": traces, "layout": { "title": column } });
        let part = DetailsPart {
            title: format!("Distribution of {column}"),
            info: WidgetInfo::new(column.clone(), "big_graph", FULL_WIDTH, params),
        };
        base_html(result, vec![part])
    }
}

/// Renderer for tabular payloads.
#[derive(Debug, Clone, Copy, Default)]
pub struct TableRenderer;

impl TestRenderer for TableRenderer {
    fn render_html(&self, result: &TestResult) -> TestHtmlInfo {
        let TestDetails::Table {
            title,
            columns,
            rows,
        } = &result.details
        else {
            return base_html(result, Vec::new());
        };
        let params = json!({ "header": columns, "data": rows });
        let part = DetailsPart {
            title: title.clone(),
            info: WidgetInfo::new(title.clone(), "table", FULL_WIDTH, params),
        };
        base_html(result, vec![part])
    }
}

// ============================================================================
// SECTION: Registry
// ============================================================================

/// Renderers keyed by payload kind.
#[derive(Clone, Default)]
pub struct RendererRegistry {
    /// Registered renderers.
    renderers: BTreeMap<DetailKind, Arc<dyn TestRenderer>>,
}

impl RendererRegistry {
    /// Creates a registry without renderers.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Creates a registry covering every payload kind.
    #[must_use]
    pub fn with_defaults() -> Self {
        let mut registry = Self::empty();
        registry.register(DetailKind::None, PlainRenderer);
        registry.register(DetailKind::Text, TextRenderer);
        registry.register(DetailKind::Threshold, ThresholdRenderer);
        registry.register(DetailKind::Distribution, DistributionRenderer);
        registry.register(DetailKind::Table, TableRenderer);
        registry
    }

    /// Registers a renderer, replacing any previous one for the kind.
    pub fn register<R>(&mut self, kind: DetailKind, renderer: R)
    where
        R: TestRenderer + 'static,
    {
        self.renderers.insert(kind, Arc::new(renderer));
    }

    /// Removes the renderer for a kind.
    pub fn remove(&mut self, kind: DetailKind) -> bool {
        self.renderers.remove(&kind).is_some()
    }

    /// Returns true when a renderer handles the kind.
    #[must_use]
    pub fn contains(&self, kind: DetailKind) -> bool {
        self.renderers.contains_key(&kind)
    }

    /// Returns the renderer for a kind.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::MissingRenderer`] when none is registered.
    pub fn resolve(&self, kind: DetailKind) -> Result<&dyn TestRenderer, ExportError> {
        self.renderers.get(&kind).map(|renderer| &**renderer).ok_or(ExportError::MissingRenderer(kind))
    }
}

impl fmt::Debug for RendererRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.renderers.keys()).finish()
    }
}
