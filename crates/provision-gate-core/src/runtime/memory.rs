// crates/provision-gate-core/src/runtime/memory.rs
// ============================================================================
// Module: In-Memory Secret Store
// Description: Map-backed SecretStore for tests and examples.
// Purpose: Exercise pipeline semantics without a durable backend.
// Dependencies: crate::core, crate::interfaces
// ============================================================================

//! ## Overview
//! A map-backed [`SecretStore`] with the same conflict semantics as the
//! durable adapters: fresh writes fail on an existing path unless overwrite
//! is requested. Suitable for tests, examples, and dry runs only.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::core::identifiers::SecretPath;
use crate::interfaces::OverwritePolicy;
use crate::interfaces::SecretPayload;
use crate::interfaces::SecretStore;
use crate::interfaces::SecretStoreError;

// ============================================================================
// SECTION: Store
// ============================================================================

/// Map-backed secret store with conflict detection.
///
/// # Invariants
/// - Cloning shares the underlying map.
#[derive(Debug, Clone, Default)]
pub struct InMemorySecretStore {
    /// Stored payloads keyed by path.
    entries: Arc<Mutex<BTreeMap<SecretPath, SecretPayload>>>,
}

impl InMemorySecretStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored secrets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.lock().map_or(0, |entries| entries.len())
    }

    /// Returns true when no secrets are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns all stored paths in lexicographic order.
    #[must_use]
    pub fn paths(&self) -> Vec<SecretPath> {
        self.entries.lock().map_or_else(|_| Vec::new(), |entries| entries.keys().cloned().collect())
    }
}

#[async_trait]
impl SecretStore for InMemorySecretStore {
    async fn write(
        &self,
        path: &SecretPath,
        payload: &SecretPayload,
        policy: OverwritePolicy,
    ) -> Result<(), SecretStoreError> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| SecretStoreError::Store("store lock poisoned".to_string()))?;
        if matches!(policy, OverwritePolicy::Fail) && entries.contains_key(path) {
            return Err(SecretStoreError::Conflict { path: path.clone() });
        }
        entries.insert(path.clone(), payload.clone());
        Ok(())
    }

    async fn read(&self, path: &SecretPath) -> Result<Option<SecretPayload>, SecretStoreError> {
        let entries = self
            .entries
            .lock()
            .map_err(|_| SecretStoreError::Store("store lock poisoned".to_string()))?;
        Ok(entries.get(path).cloned())
    }
}
