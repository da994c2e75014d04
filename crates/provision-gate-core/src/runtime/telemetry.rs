// crates/provision-gate-core/src/runtime/telemetry.rs
// ============================================================================
// Module: Pipeline Telemetry
// Description: Observability hooks for pipeline stage transitions.
// Purpose: Provide stage events without hard logging or metrics deps.
// Dependencies: crate::core
// ============================================================================

//! ## Overview
//! This module exposes a thin observer interface for pipeline stage events.
//! It is intentionally dependency-light so deployments can plug in their
//! logging or metrics stack without redesign. Observers must never receive
//! key material; hooks carry identifiers, counts, and paths only.

// ============================================================================
// SECTION: Imports
// ============================================================================

use crate::core::group::ResolvedInstanceSpec;
use crate::core::identifiers::InstanceId;
use crate::core::identifiers::SecretPath;

// ============================================================================
// SECTION: Observer
// ============================================================================

/// Observer for pipeline stage transitions.
///
/// All hooks default to no-ops; implementations override the ones they care
/// about. Hooks are called from instance tasks and must be cheap and
/// non-blocking.
pub trait PipelineObserver: Send + Sync {
    /// An instance was created by the compute provider.
    fn on_provisioned(&self, instance_id: &InstanceId, spec: &ResolvedInstanceSpec) {
        let _ = (instance_id, spec);
    }

    /// Provisioning failed for a spec.
    fn on_provision_failed(&self, spec: &ResolvedInstanceSpec, cause: &str) {
        let _ = (spec, cause);
    }

    /// A gate probe attempt is starting.
    fn on_gate_attempt(&self, instance_id: &InstanceId, attempt: u32) {
        let _ = (instance_id, attempt);
    }

    /// An instance passed the readiness gate.
    fn on_ready(&self, instance_id: &InstanceId, attempts: u32) {
        let _ = (instance_id, attempts);
    }

    /// The gate gave up on an instance.
    fn on_timed_out(&self, instance_id: &InstanceId, attempts: u32) {
        let _ = (instance_id, attempts);
    }

    /// A credential was minted for an instance.
    fn on_minted(&self, instance_id: &InstanceId, path: &SecretPath) {
        let _ = (instance_id, path);
    }
}

/// Observer that ignores every event.
///
/// # Invariants
/// - All hooks are no-ops.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullObserver;

impl PipelineObserver for NullObserver {}
