// crates/checksuite-core/src/export/widget.rs
// ============================================================================
// Module: Widget Model
// Description: Serializable widget descriptions for dashboard exports.
// Purpose: Describe what to draw without committing to a rendering stack.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! Widgets are plain data: a title, a type tag understood by a front end, a
//! grid size, and free-form parameters. Nothing here produces HTML.

use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;

/// Full-width widget size.
pub const FULL_WIDTH: u8 = 2;

/// Half-width widget size.
pub const HALF_WIDTH: u8 = 1;

/// Renderable widget description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WidgetInfo {
    /// Widget title.
    pub title: String,
    /// Front-end widget type.
    #[serde(rename = "type")]
    pub widget_type: String,
    /// Grid width.
    pub size: u8,
    /// Type-specific parameters.
    pub params: Value,
}

impl WidgetInfo {
    /// Creates a widget.
    #[must_use]
    pub fn new(
        title: impl Into<String>,
        widget_type: impl Into<String>,
        size: u8,
        params: Value,
    ) -> Self {
        Self {
            title: title.into(),
            widget_type: widget_type.into(),
            size,
            params,
        }
    }
}
