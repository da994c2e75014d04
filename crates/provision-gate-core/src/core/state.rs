// crates/provision-gate-core/src/core/state.rs
// ============================================================================
// Module: Pipeline State
// Description: Provisioned instances, readiness results, and minted secrets.
// Purpose: Capture per-instance pipeline state with redacted key material.
// Dependencies: crate::core::{group, identifiers, time}, serde
// ============================================================================

//! ## Overview
//! Each instance's pipeline owns its state exclusively until terminal. The
//! private key handed over by the compute provider is wrapped in
//! [`KeyMaterial`], which never appears in `Debug` output and is not
//! serializable; it leaves the process only through an explicit secret-store
//! write performed by the minting service.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;

use crate::core::group::ResolvedInstanceSpec;
use crate::core::identifiers::InstanceId;
use crate::core::identifiers::SecretPath;
use crate::core::time::Timestamp;

// ============================================================================
// SECTION: Endpoints and Key Material
// ============================================================================

/// Network endpoint for the instance's secure-shell service.
///
/// # Invariants
/// - `host` is non-empty as returned by the compute provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Endpoint {
    /// Hostname or address.
    pub host: String,
    /// TCP port of the secure-shell service.
    pub port: u16,
}

impl Endpoint {
    /// Creates a new endpoint.
    #[must_use]
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

/// Private key bytes generated by the compute provider.
///
/// Generated exactly once per instance and never regenerated by this core.
/// The wrapper deliberately implements neither `Serialize` nor a revealing
/// `Debug`; the only egress is the minting service's secret-store write.
#[derive(Clone, PartialEq, Eq)]
pub struct KeyMaterial(Vec<u8>);

impl KeyMaterial {
    /// Wraps raw private key bytes.
    #[must_use]
    pub const fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    /// Returns the raw key bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Returns true when no key bytes are present.
    ///
    /// Empty key material means the generated key was lost before minting,
    /// which is unrecoverable for the instance.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the key length in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl fmt::Debug for KeyMaterial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "KeyMaterial(<{} bytes redacted>)", self.0.len())
    }
}

// ============================================================================
// SECTION: Provisioned Instances
// ============================================================================

/// Instance created by a compute provider, awaiting readiness gating.
///
/// # Invariants
/// - Owned exclusively by one pipeline task until terminal state.
/// - `private_key` is the only copy of the generated key material.
#[derive(Debug, Clone)]
pub struct ProvisionedInstance {
    /// Provider-assigned instance identifier.
    pub instance_id: InstanceId,
    /// Spec the instance was created from.
    pub spec: ResolvedInstanceSpec,
    /// Secure-shell endpoint reported by the provider.
    pub endpoint: Endpoint,
    /// Remote user the generated key authenticates as.
    pub user: String,
    /// Generated private key material.
    pub private_key: KeyMaterial,
}

// ============================================================================
// SECTION: Readiness
// ============================================================================

/// Gate status for a single instance.
///
/// # Invariants
/// - Variants are stable for serialization and reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GateStatus {
    /// Gate has not yet confirmed readiness.
    Pending,
    /// Instance accepted a probe connection.
    Ready,
    /// Gate exhausted its attempt or deadline budget.
    TimedOut,
}

/// Transient readiness outcome reported per instance.
///
/// # Invariants
/// - `attempts` counts probe attempts actually started.
/// - `last_error` is present when `status` is [`GateStatus::TimedOut`] and a
///   probe failure was observed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadinessResult {
    /// Instance the result refers to.
    pub instance_id: InstanceId,
    /// Terminal (or current) gate status.
    pub status: GateStatus,
    /// Number of probe attempts started.
    pub attempts: u32,
    /// Last observed probe error, if any.
    pub last_error: Option<String>,
}

// ============================================================================
// SECTION: Minted Secrets
// ============================================================================

/// Record of a published credential path.
///
/// # Invariants
/// - Written once; never mutated. Deletion is an external concern.
/// - `path` is globally unique under the mint identifier's entropy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MintedSecret {
    /// Secret-store path the credential was written to.
    pub path: SecretPath,
    /// Instance the credential belongs to.
    pub instance_id: InstanceId,
    /// Mint time supplied by the runtime host.
    pub created_at: Timestamp,
}
