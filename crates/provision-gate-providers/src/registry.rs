// crates/provision-gate-providers/src/registry.rs
// ============================================================================
// Module: Provider Registry
// Description: Registry routing instance creation by provider identifier.
// Purpose: Resolve the compute backend named by operator configuration.
// Dependencies: provision-gate-core
// ============================================================================

//! ## Overview
//! The registry maps provider identifiers to compute provider
//! implementations. Configuration names the provider to use; resolution
//! fails closed on unknown identifiers, and duplicate registration is an
//! error so wiring mistakes surface at startup rather than mid-run.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::sync::Arc;

use provision_gate_core::ComputeProvider;
use provision_gate_core::ProviderId;
use thiserror::Error;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Registry errors.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// A provider is already registered under this identifier.
    #[error("provider already registered: {provider_id}")]
    Duplicate {
        /// Conflicting identifier.
        provider_id: ProviderId,
    },
    /// No provider is registered under this identifier.
    #[error("provider not registered: {provider_id}")]
    Unknown {
        /// Requested identifier.
        provider_id: ProviderId,
    },
}

// ============================================================================
// SECTION: Registry
// ============================================================================

/// Compute provider registry.
///
/// # Invariants
/// - Provider identifiers are unique within the registry.
/// - Registered providers are `Send + Sync` and stored behind trait objects.
#[derive(Default)]
pub struct ProviderRegistry {
    /// Provider implementations keyed by provider identifier.
    providers: BTreeMap<ProviderId, Arc<dyn ComputeProvider>>,
}

impl ProviderRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a provider under the given identifier.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Duplicate`] when the identifier is already
    /// registered.
    pub fn register(
        &mut self,
        provider_id: ProviderId,
        provider: Arc<dyn ComputeProvider>,
    ) -> Result<(), RegistryError> {
        if self.providers.contains_key(&provider_id) {
            return Err(RegistryError::Duplicate { provider_id });
        }
        self.providers.insert(provider_id, provider);
        Ok(())
    }

    /// Resolves the provider registered under the given identifier.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Unknown`] when no provider is registered
    /// under the identifier.
    pub fn resolve(&self, provider_id: &ProviderId) -> Result<Arc<dyn ComputeProvider>, RegistryError> {
        self.providers
            .get(provider_id)
            .cloned()
            .ok_or_else(|| RegistryError::Unknown {
                provider_id: provider_id.clone(),
            })
    }

    /// Returns all registered identifiers in lexicographic order.
    #[must_use]
    pub fn provider_ids(&self) -> Vec<ProviderId> {
        self.providers.keys().cloned().collect()
    }

    /// Returns the number of registered providers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.providers.len()
    }

    /// Returns true when no providers are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}
