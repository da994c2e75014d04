// crates/provision-gate-core/src/runtime/mint.rs
// ============================================================================
// Module: Secret Minting
// Description: Unique path derivation and credential publication.
// Purpose: Publish instance credentials only for gate-proven instances.
// Dependencies: crate::core, crate::interfaces, rand
// ============================================================================

//! ## Overview
//! Minting generates a 128-bit random identifier, derives a deterministic
//! secret-store path from it, and writes the instance credential to that
//! path. The only input accepted is a [`ReadyInstance`], so minting cannot
//! run for an instance the gate never confirmed.
//!
//! Invariants:
//! - Path derivation is a pure function, testable without I/O.
//! - Fresh mints fail on path collision; overwrite requires explicit opt-in.
//! - 128 bits of entropy make collisions negligible over a deployment's life.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;

use rand::RngCore;
use rand::rngs::OsRng;
use thiserror::Error;

use crate::core::identifiers::RoleName;
use crate::core::identifiers::SecretPath;
use crate::core::state::MintedSecret;
use crate::core::time::Timestamp;
use crate::interfaces::OverwritePolicy;
use crate::interfaces::SecretPayload;
use crate::interfaces::SecretStore;
use crate::interfaces::SecretStoreError;
use crate::runtime::gate::ReadyInstance;

// ============================================================================
// SECTION: Identifier and Path Derivation
// ============================================================================

/// Generates a 128-bit random mint identifier rendered as 32 hex chars.
#[must_use]
pub fn random_mint_id() -> String {
    let mut bytes = [0_u8; 16];
    OsRng.fill_bytes(&mut bytes);
    format!("{:032x}", u128::from_be_bytes(bytes))
}

/// Derives the secret-store path for a mint identifier.
///
/// Trailing slashes on the prefix are ignored so configuration variants
/// produce identical paths.
#[must_use]
pub fn derive_secret_path(prefix: &str, mint_id: &str) -> SecretPath {
    let trimmed = prefix.trim_end_matches('/');
    SecretPath::new(format!("{trimmed}/{mint_id}"))
}

// ============================================================================
// SECTION: Settings and Errors
// ============================================================================

/// Minting settings supplied by the operator.
///
/// # Invariants
/// - `path_prefix` is non-empty (enforced by the configuration layer).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MintSettings {
    /// Role name recorded in the credential payload.
    pub role_name: RoleName,
    /// Secret-store path prefix for minted credentials.
    pub path_prefix: String,
    /// Overwrite policy for the store write.
    pub overwrite: OverwritePolicy,
}

/// Minting errors.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MintError {
    /// The secret store rejected or failed the write.
    #[error(transparent)]
    Store(#[from] SecretStoreError),
}

// ============================================================================
// SECTION: Minter
// ============================================================================

/// Publishes credentials for gate-proven instances.
#[derive(Clone)]
pub struct SecretMinter {
    /// Secret store collaborator.
    store: Arc<dyn SecretStore>,
    /// Operator-supplied minting settings.
    settings: MintSettings,
}

impl SecretMinter {
    /// Creates a minter over the given store.
    #[must_use]
    pub fn new(store: Arc<dyn SecretStore>, settings: MintSettings) -> Self {
        Self { store, settings }
    }

    /// Returns the minting settings.
    #[must_use]
    pub const fn settings(&self) -> &MintSettings {
        &self.settings
    }

    /// Mints a credential path for a ready instance.
    ///
    /// Generates a fresh identifier, derives the path, and writes
    /// `{role_name, host, port, user, private_key}` to the store.
    ///
    /// # Errors
    ///
    /// Returns [`MintError::Store`] when the write fails, including the
    /// conflict case where the derived path already exists and overwrite was
    /// not requested.
    pub async fn mint(
        &self,
        ready: &ReadyInstance,
        minted_at: Timestamp,
    ) -> Result<MintedSecret, MintError> {
        let instance = ready.instance();
        let mint_id = random_mint_id();
        let path = derive_secret_path(&self.settings.path_prefix, &mint_id);

        let mut payload = SecretPayload::new();
        payload.insert("role_name", self.settings.role_name.as_str());
        payload.insert("host", instance.endpoint.host.as_str());
        payload.insert("port", instance.endpoint.port.to_string());
        payload.insert("user", instance.user.as_str());
        payload.insert(
            "private_key",
            String::from_utf8_lossy(instance.private_key.as_bytes()),
        );

        self.store.write(&path, &payload, self.settings.overwrite).await?;

        Ok(MintedSecret {
            path,
            instance_id: instance.instance_id.clone(),
            created_at: minted_at,
        })
    }
}
