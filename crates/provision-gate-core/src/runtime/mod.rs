// crates/provision-gate-core/src/runtime/mod.rs
// ============================================================================
// Module: Provision Gate Runtime
// Description: Async pipeline driving provision, gate, and mint stages.
// Purpose: Group the runtime components and in-memory adapters.
// Dependencies: crate::core, crate::interfaces, tokio
// ============================================================================

//! ## Overview
//! The runtime executes the provisioning pipeline: one task per instance,
//! each moving strictly through provision, readiness gate, and secret mint.
//! Cancellation is cooperative; gate polling stops at the next suspension
//! point and no further minting starts after the signal.

// ============================================================================
// SECTION: Modules
// ============================================================================

mod cancel;
mod gate;
mod memory;
mod mint;
mod pipeline;
mod telemetry;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use cancel::CancelSource;
pub use cancel::CancelToken;
pub use gate::GateConfig;
pub use gate::GateError;
pub use gate::ReadinessGate;
pub use gate::ReadyInstance;
pub use memory::InMemorySecretStore;
pub use mint::MintError;
pub use mint::MintSettings;
pub use mint::SecretMinter;
pub use mint::derive_secret_path;
pub use mint::random_mint_id;
pub use pipeline::InstanceOutcome;
pub use pipeline::MintRecord;
pub use pipeline::PipelineReport;
pub use pipeline::ProvisioningPipeline;
pub use telemetry::NullObserver;
pub use telemetry::PipelineObserver;
