// crates/checksuite-core/src/runtime/mod.rs
// ============================================================================
// Module: Runtime
// Description: Discovery, registration, and phased execution of suites.
// Purpose: Group the engine that schedules metrics and tests.
// Dependencies: crate::runtime::*
// ============================================================================

//! ## Overview
//! The runtime turns a set of top-level tests into registered nodes and runs
//! them through verify, calculate, and check.

pub mod context;
pub mod pipeline;
pub mod scanner;
pub mod store;
pub mod suite;
