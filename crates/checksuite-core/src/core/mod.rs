// crates/checksuite-core/src/core/mod.rs
// ============================================================================
// Module: Core Model
// Description: Data, node, status, and result types.
// Purpose: Group the types shared by the runtime and export layers.
// Dependencies: crate::core::*
// ============================================================================

//! ## Overview
//! Core types carry no execution logic beyond local validation.

pub mod data;
pub mod identifiers;
pub mod node;
pub mod result;
pub mod status;
