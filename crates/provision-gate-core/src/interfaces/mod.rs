// crates/provision-gate-core/src/interfaces/mod.rs
// ============================================================================
// Module: Provision Gate Interfaces
// Description: Backend-agnostic interfaces for compute, probing, and secrets.
// Purpose: Define the collaborator seams used by the provisioning pipeline.
// Dependencies: crate::core, async-trait, serde, thiserror
// ============================================================================

//! ## Overview
//! Interfaces define how Provision Gate integrates with cloud providers,
//! remote-shell probing, and the secret store without embedding backend
//! details. Implementations must fail closed: a provider error fails that
//! instance's pipeline, and a store conflict is surfaced, never ignored.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::fmt;

use async_trait::async_trait;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use crate::core::group::ResolvedInstanceSpec;
use crate::core::identifiers::SecretPath;
use crate::core::state::Endpoint;
use crate::core::state::KeyMaterial;
use crate::core::state::ProvisionedInstance;

// ============================================================================
// SECTION: Compute Provider
// ============================================================================

/// Compute provider errors.
///
/// Quota exhaustion, invalid images, and invalid instance types are all
/// surfaced as a single failure cause; the core does not retry provisioning.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProvisionError {
    /// Provider failed to create the instance.
    #[error("provisioning failed: {0}")]
    Failed(String),
}

/// Backend-agnostic compute provider.
///
/// The provider creates the network interface, public address, and compute
/// instance, and generates the instance key pair exactly once.
#[async_trait]
pub trait ComputeProvider: std::fmt::Debug + Send + Sync {
    /// Creates one instance from a resolved spec.
    ///
    /// # Errors
    ///
    /// Returns [`ProvisionError`] when the instance cannot be created.
    /// Retrying is the provider's responsibility, not the core's.
    async fn create_instance(
        &self,
        spec: &ResolvedInstanceSpec,
    ) -> Result<ProvisionedInstance, ProvisionError>;
}

// ============================================================================
// SECTION: Remote Shell Probe
// ============================================================================

/// Probe errors observed while confirming readiness.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProbeError {
    /// Transport-level connection failure.
    #[error("probe connect failed: {0}")]
    Connect(String),
    /// Connection established but the key was rejected.
    #[error("probe auth failed: {0}")]
    Auth(String),
    /// No-op command execution failed after authentication.
    #[error("probe command failed: {0}")]
    Command(String),
}

/// Secure-shell readiness probe.
///
/// One attempt opens a connection with the instance's generated key and runs
/// a trivial no-op command, proving reachability and credential validity
/// end to end. Opening the port alone is not sufficient.
#[async_trait]
pub trait RemoteShellProbe: Send + Sync {
    /// Performs a single readiness attempt.
    ///
    /// # Errors
    ///
    /// Returns [`ProbeError`] when the attempt fails; the gate decides
    /// whether to retry.
    async fn attempt(
        &self,
        endpoint: &Endpoint,
        user: &str,
        key: &KeyMaterial,
    ) -> Result<(), ProbeError>;
}

// ============================================================================
// SECTION: Secret Store
// ============================================================================

/// Credential payload written to the secret store.
///
/// Values may contain private key material, so `Debug` prints keys only.
///
/// # Invariants
/// - Iteration order is lexicographic by key for deterministic snapshots.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SecretPayload {
    /// Payload entries.
    entries: BTreeMap<String, String>,
}

impl SecretPayload {
    /// Creates an empty payload.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts an entry, replacing any previous value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(key.into(), value.into());
    }

    /// Returns the value for a key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Returns the number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true when the payload is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the payload keys in lexicographic order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}

impl fmt::Debug for SecretPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecretPayload")
            .field("keys", &self.entries.keys().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

/// Overwrite policy for secret writes.
///
/// Fresh mints never overwrite: re-running a pipeline against an
/// already-minted instance must not clobber the existing secret unless the
/// operator explicitly requests it.
///
/// # Invariants
/// - Variants are stable for serialization and configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverwritePolicy {
    /// Fail with a conflict when the path already exists (default).
    #[default]
    Fail,
    /// Replace any existing payload at the path.
    Overwrite,
}

/// Secret store errors.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SecretStoreError {
    /// Path already exists and overwrite was not requested.
    #[error("secret path already exists: {path}")]
    Conflict {
        /// Conflicting path.
        path: SecretPath,
    },
    /// Store I/O error.
    #[error("secret store io error: {0}")]
    Io(String),
    /// Stored data failed to deserialize.
    #[error("secret store invalid data: {0}")]
    Invalid(String),
    /// Store reported an error.
    #[error("secret store error: {0}")]
    Store(String),
}

/// Secret store for minted credentials.
///
/// Writes are keyed by unique generated paths, so concurrent pipelines never
/// contend on the same key.
#[async_trait]
pub trait SecretStore: Send + Sync {
    /// Writes a payload at the given path.
    ///
    /// # Errors
    ///
    /// Returns [`SecretStoreError::Conflict`] when the path exists and
    /// `policy` is [`OverwritePolicy::Fail`], or another variant when the
    /// write fails.
    async fn write(
        &self,
        path: &SecretPath,
        payload: &SecretPayload,
        policy: OverwritePolicy,
    ) -> Result<(), SecretStoreError>;

    /// Reads the payload at the given path, if present.
    ///
    /// # Errors
    ///
    /// Returns [`SecretStoreError`] when the read fails.
    async fn read(&self, path: &SecretPath) -> Result<Option<SecretPayload>, SecretStoreError>;

    /// Reports store readiness for liveness/readiness probes.
    ///
    /// # Errors
    ///
    /// Returns [`SecretStoreError`] when the store is unavailable.
    async fn readiness(&self) -> Result<(), SecretStoreError> {
        Ok(())
    }
}
