// crates/provision-gate-core/src/core/mod.rs
// ============================================================================
// Module: Core Data Model
// Description: Identifiers, declarations, planning, and pipeline state types.
// Purpose: Group the pure data model consumed by the runtime pipeline.
// Dependencies: serde, thiserror
// ============================================================================

//! ## Overview
//! The core model is pure: no I/O, no clocks, no randomness. Everything here
//! is deterministic and owned by the planning side of the pipeline.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod group;
pub mod identifiers;
pub mod images;
pub mod instance_types;
pub mod planner;
pub mod state;
pub mod time;
pub mod zones;
