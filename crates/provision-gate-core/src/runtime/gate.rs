// crates/provision-gate-core/src/runtime/gate.rs
// ============================================================================
// Module: Readiness Gate
// Description: Bounded secure-shell polling before credential minting.
// Purpose: Produce the only value minting accepts, proving connect-before-mint.
// Dependencies: crate::core, crate::interfaces, tokio
// ============================================================================

//! ## Overview
//! The gate drives one instance through `Pending -> Ready` or
//! `Pending -> TimedOut`. Each attempt runs the remote-shell probe under a
//! per-attempt timeout; a fixed poll interval separates attempts. The gate
//! gives up after `max_attempts` or when the optional wall-clock deadline
//! elapses, whichever comes first.
//!
//! Invariants:
//! - [`ReadyInstance`] has no public constructor; holding one proves the
//!   instance passed the gate. Minting consumes it, so the connect-before-mint
//!   ordering cannot be bypassed by refactoring.
//! - Expected waits are boot time: bounded and short, so backoff is a fixed
//!   interval rather than exponential.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::time::Instant;
use tokio::time::sleep;
use tokio::time::timeout;

use crate::core::state::ProvisionedInstance;
use crate::interfaces::RemoteShellProbe;
use crate::runtime::cancel::CancelToken;
use crate::runtime::telemetry::PipelineObserver;

// ============================================================================
// SECTION: Config
// ============================================================================

/// Readiness gate configuration.
///
/// # Invariants
/// - `max_attempts` >= 1 (enforced by the configuration layer).
/// - `deadline`, when set, bounds the whole gate run in wall-clock time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GateConfig {
    /// Maximum number of probe attempts.
    pub max_attempts: u32,
    /// Timeout applied to each individual probe attempt.
    pub attempt_timeout: Duration,
    /// Fixed interval between attempts.
    pub poll_interval: Duration,
    /// Optional overall wall-clock deadline.
    pub deadline: Option<Duration>,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            max_attempts: 30,
            attempt_timeout: Duration::from_secs(5),
            poll_interval: Duration::from_secs(1),
            deadline: None,
        }
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Terminal gate failures.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GateError {
    /// Attempt or deadline budget exhausted without a successful probe.
    #[error("readiness timed out after {attempts} attempts")]
    TimedOut {
        /// Probe attempts started.
        attempts: u32,
        /// Last observed probe error, if any.
        last_error: Option<String>,
    },
    /// Cancellation was signalled while polling.
    #[error("readiness polling cancelled after {attempts} attempts")]
    Cancelled {
        /// Probe attempts started before cancellation.
        attempts: u32,
    },
}

// ============================================================================
// SECTION: Ready Proof
// ============================================================================

/// Proof that an instance passed the readiness gate.
///
/// Constructed only inside [`ReadinessGate::wait_ready`]; the minting
/// service accepts nothing else, so an unready instance can never reach the
/// secret store.
#[derive(Debug)]
pub struct ReadyInstance {
    /// The gated instance.
    instance: ProvisionedInstance,
    /// Probe attempts it took to confirm readiness.
    attempts: u32,
}

impl ReadyInstance {
    /// Returns the gated instance.
    #[must_use]
    pub fn instance(&self) -> &ProvisionedInstance {
        &self.instance
    }

    /// Returns the number of probe attempts started.
    #[must_use]
    pub const fn attempts(&self) -> u32 {
        self.attempts
    }
}

// ============================================================================
// SECTION: Gate
// ============================================================================

/// Bounded readiness gate polling one instance's secure-shell endpoint.
#[derive(Clone)]
pub struct ReadinessGate {
    /// Probe collaborator performing individual attempts.
    probe: Arc<dyn RemoteShellProbe>,
    /// Gate configuration.
    config: GateConfig,
}

impl ReadinessGate {
    /// Creates a gate over the given probe.
    #[must_use]
    pub fn new(probe: Arc<dyn RemoteShellProbe>, config: GateConfig) -> Self {
        Self { probe, config }
    }

    /// Returns the gate configuration.
    #[must_use]
    pub const fn config(&self) -> &GateConfig {
        &self.config
    }

    /// Polls the instance until it accepts a probe or the budget runs out.
    ///
    /// # Errors
    ///
    /// Returns [`GateError::TimedOut`] when attempts or the deadline are
    /// exhausted, or [`GateError::Cancelled`] when the token fires between
    /// suspension points. Either way the instance (and its key material) is
    /// dropped without ever reaching the minting service.
    pub async fn wait_ready(
        &self,
        instance: ProvisionedInstance,
        cancel: &CancelToken,
        observer: &dyn PipelineObserver,
    ) -> Result<ReadyInstance, GateError> {
        let started = Instant::now();
        let mut last_error: Option<String> = None;

        for attempt in 1..=self.config.max_attempts {
            if cancel.is_cancelled() {
                return Err(GateError::Cancelled {
                    attempts: attempt.saturating_sub(1),
                });
            }
            if let Some(deadline) = self.config.deadline
                && started.elapsed() >= deadline
            {
                return Err(GateError::TimedOut {
                    attempts: attempt.saturating_sub(1),
                    last_error,
                });
            }

            observer.on_gate_attempt(&instance.instance_id, attempt);
            let outcome = timeout(
                self.config.attempt_timeout,
                self.probe.attempt(&instance.endpoint, &instance.user, &instance.private_key),
            )
            .await;

            match outcome {
                Ok(Ok(())) => {
                    return Ok(ReadyInstance {
                        instance,
                        attempts: attempt,
                    });
                }
                Ok(Err(error)) => last_error = Some(error.to_string()),
                Err(_) => last_error = Some("probe attempt timed out".to_string()),
            }

            if attempt < self.config.max_attempts {
                tokio::select! {
                    () = cancel.cancelled() => {
                        return Err(GateError::Cancelled { attempts: attempt });
                    }
                    () = sleep(self.config.poll_interval) => {}
                }
            }
        }

        Err(GateError::TimedOut {
            attempts: self.config.max_attempts,
            last_error,
        })
    }
}
