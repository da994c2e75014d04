// crates/provision-gate-core/src/lib.rs
// ============================================================================
// Module: Provision Gate Core
// Description: Planning, readiness gating, and secret minting for instance fleets.
// Purpose: Provide the backend-agnostic provisioning pipeline and its contracts.
// Dependencies: async-trait, rand, serde, thiserror, tokio
// ============================================================================

//! ## Overview
//! Provision Gate resolves logical instance-group declarations into concrete
//! instance specifications, drives each instance through provisioning, blocks
//! on secure-shell readiness, and mints a unique secret-store path for the
//! instance credential only after readiness is confirmed.
//!
//! Invariants:
//! - Planning is deterministic and fails atomically on configuration errors.
//! - No credential is published for an instance that never passed the gate;
//!   minting consumes a [`runtime::ReadyInstance`], which only the gate can
//!   construct.
//! - Per-instance pipelines are isolated; one instance failing never aborts
//!   the others.

// ============================================================================
// SECTION: Modules
// ============================================================================

mod core;
pub mod interfaces;
pub mod runtime;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use core::group::InstanceGroupDeclaration;
pub use core::group::ResolvedInstanceSpec;
pub use core::identifiers::CategoryId;
pub use core::identifiers::GroupName;
pub use core::identifiers::InstanceId;
pub use core::identifiers::ProviderId;
pub use core::identifiers::RoleName;
pub use core::identifiers::SecretPath;
pub use core::identifiers::ZoneId;
pub use core::images::ImageCatalog;
pub use core::instance_types::CategoryMap;
pub use core::instance_types::UnknownCategoryError;
pub use core::planner::PlanError;
pub use core::planner::plan;
pub use core::state::Endpoint;
pub use core::state::GateStatus;
pub use core::state::KeyMaterial;
pub use core::state::MintedSecret;
pub use core::state::ProvisionedInstance;
pub use core::state::ReadinessResult;
pub use core::time::Timestamp;
pub use core::zones::distribute_per_zone;
pub use core::zones::total_instances;
pub use interfaces::ComputeProvider;
pub use interfaces::OverwritePolicy;
pub use interfaces::ProbeError;
pub use interfaces::ProvisionError;
pub use interfaces::RemoteShellProbe;
pub use interfaces::SecretPayload;
pub use interfaces::SecretStore;
pub use interfaces::SecretStoreError;
