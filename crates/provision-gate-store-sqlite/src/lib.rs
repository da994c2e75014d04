// crates/provision-gate-store-sqlite/src/lib.rs
// ============================================================================
// Module: Provision Gate SQLite Store
// Description: Durable SecretStore backed by SQLite.
// Purpose: Persist minted credentials with conflict detection.
// Dependencies: provision-gate-core, rusqlite, serde_json, thiserror
// ============================================================================

//! ## Overview
//! This crate implements a durable [`provision_gate_core::SecretStore`] over
//! `SQLite`. Minted credential payloads are stored as JSON keyed by secret
//! path; fresh writes fail on an existing path unless overwrite is
//! explicitly requested.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod store;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use store::MAX_PAYLOAD_BYTES;
pub use store::SqliteSecretStore;
pub use store::SqliteStoreConfig;
pub use store::SqliteStoreError;
pub use store::SqliteStoreMode;
pub use store::SqliteSyncMode;
