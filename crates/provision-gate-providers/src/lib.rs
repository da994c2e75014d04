// crates/provision-gate-providers/src/lib.rs
// ============================================================================
// Module: Provision Gate Providers
// Description: Built-in compute providers, probes, and registry utilities.
// Purpose: Provide backend implementations aligned with Provision Gate core.
// Dependencies: provision-gate-core, async-trait, base64, ed25519-dalek, tokio
// ============================================================================

//! ## Overview
//! This crate ships a scripted compute provider for development and testing,
//! a TCP reachability probe, and a registry that routes instance creation by
//! provider identifier. The scripted provider generates real ed25519 key
//! material so downstream minting handles credentials of realistic shape.
//!
//! Invariants:
//! - Instance creation is routed via [`ProviderRegistry`] by provider
//!   identifier.
//! - The scripted provider generates distinct key material per instance.
//! - The TCP probe proves reachability only, never credential validity.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod registry;
pub mod scripted;
pub mod tcp;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use registry::ProviderRegistry;
pub use registry::RegistryError;
pub use scripted::ScriptedProbe;
pub use scripted::ScriptedProvider;
pub use scripted::ScriptedProviderConfig;
pub use tcp::TcpReachabilityProbe;
