// crates/checksuite-core/src/export/mod.rs
// ============================================================================
// Module: Export
// Description: Result rendering, JSON export, summaries, and dashboards.
// Purpose: Group everything that reads results after a run.
// Dependencies: crate::export::*
// ============================================================================

//! ## Overview
//! Export is read-only over a finished run: results are never modified here.

pub mod dashboard;
pub mod digest;
pub mod json;
pub mod renderer;
pub mod summary;
pub mod widget;
