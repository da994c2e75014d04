// crates/provision-gate-config/src/lib.rs
// ============================================================================
// Module: Provision Gate Config
// Description: Canonical configuration model, load guards, and conversion.
// Purpose: Turn operator TOML into validated core planning inputs.
// Dependencies: provision-gate-core, serde, thiserror, toml
// ============================================================================

//! ## Overview
//! This crate defines the operator-facing TOML configuration for Provision
//! Gate: zones, instance groups, category-to-type mappings, image rules,
//! gate bounds, and secret minting settings. Loading is strict and
//! fail-closed (path, size, and encoding guards), validation runs before any
//! conversion, and converters produce the typed inputs the core planner and
//! runtime consume.
//!
//! Invariants:
//! - A configuration that loads and validates converts without error.
//! - Validation rejects duplicates and empty required fields before any
//!   provisioning can start.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod convert;
pub mod load;
pub mod model;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use load::ConfigError;
pub use load::MAX_CONFIG_BYTES;
pub use model::GateSection;
pub use model::GroupConfig;
pub use model::ImageRuleConfig;
pub use model::ImagesSection;
pub use model::ProvisionGateConfig;
pub use model::SecretsSection;
