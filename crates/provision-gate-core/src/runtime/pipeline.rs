// crates/provision-gate-core/src/runtime/pipeline.rs
// ============================================================================
// Module: Provisioning Pipeline
// Description: Per-instance orchestration of provision, gate, and mint.
// Purpose: Run independent instance pipelines concurrently with isolation.
// Dependencies: crate::core, crate::interfaces, crate::runtime, tokio
// ============================================================================

//! ## Overview
//! The pipeline spawns one task per planned spec. Within a task the stages
//! are strictly sequential: provision, then gate, then mint. Across tasks
//! there is no ordering; a failed instance never aborts its peers, and the
//! report preserves plan order regardless of completion order.
//!
//! Invariants:
//! - Minting only ever receives the gate's [`ReadyInstance`] output.
//! - Empty key material from the provider is unrecoverable and terminal for
//!   that instance.
//! - After cancellation no new minting starts; already-minted secrets stay.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use serde::Deserialize;
use serde::Serialize;
use tokio::task::JoinSet;

use crate::core::group::ResolvedInstanceSpec;
use crate::core::identifiers::GroupName;
use crate::core::identifiers::InstanceId;
use crate::core::identifiers::SecretPath;
use crate::core::identifiers::ZoneId;
use crate::core::state::GateStatus;
use crate::core::state::ReadinessResult;
use crate::core::time::Timestamp;
use crate::interfaces::ComputeProvider;
use crate::runtime::cancel::CancelToken;
use crate::runtime::gate::GateError;
use crate::runtime::gate::ReadinessGate;
use crate::runtime::mint::SecretMinter;
use crate::runtime::telemetry::NullObserver;
use crate::runtime::telemetry::PipelineObserver;

// ============================================================================
// SECTION: Outcomes
// ============================================================================

/// Terminal outcome for one instance's pipeline.
///
/// # Invariants
/// - Exactly one outcome exists per planned spec.
/// - `Minted` is the only variant carrying a secret path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstanceOutcome {
    /// Instance passed the gate and its credential was published.
    Minted {
        /// Spec the instance was created from.
        spec: ResolvedInstanceSpec,
        /// Provider-assigned instance identifier.
        instance_id: InstanceId,
        /// Published secret path.
        path: SecretPath,
        /// Gate attempts it took to confirm readiness.
        attempts: u32,
    },
    /// The compute provider failed to create the instance.
    ProvisioningFailed {
        /// Spec that failed to provision.
        spec: ResolvedInstanceSpec,
        /// Provider-reported cause.
        cause: String,
    },
    /// The provider returned empty key material; minting is impossible.
    KeyMaterialLost {
        /// Spec the instance was created from.
        spec: ResolvedInstanceSpec,
        /// Provider-assigned instance identifier.
        instance_id: InstanceId,
    },
    /// The gate exhausted its budget without a successful probe.
    TimedOut {
        /// Spec the instance was created from.
        spec: ResolvedInstanceSpec,
        /// Provider-assigned instance identifier.
        instance_id: InstanceId,
        /// Probe attempts started.
        attempts: u32,
        /// Last observed probe error, if any.
        last_error: Option<String>,
    },
    /// The secret-store write failed after a successful gate.
    MintFailed {
        /// Spec the instance was created from.
        spec: ResolvedInstanceSpec,
        /// Provider-assigned instance identifier.
        instance_id: InstanceId,
        /// Gate attempts it took to confirm readiness.
        attempts: u32,
        /// Store-reported cause.
        cause: String,
    },
    /// Cancellation stopped the pipeline before a terminal stage.
    Cancelled {
        /// Spec whose pipeline was cancelled.
        spec: ResolvedInstanceSpec,
    },
}

impl InstanceOutcome {
    /// Returns the spec this outcome refers to.
    #[must_use]
    pub const fn spec(&self) -> &ResolvedInstanceSpec {
        match self {
            Self::Minted { spec, .. }
            | Self::ProvisioningFailed { spec, .. }
            | Self::KeyMaterialLost { spec, .. }
            | Self::TimedOut { spec, .. }
            | Self::MintFailed { spec, .. }
            | Self::Cancelled { spec } => spec,
        }
    }

    /// Returns true for the minted outcome.
    #[must_use]
    pub const fn is_minted(&self) -> bool {
        matches!(self, Self::Minted { .. })
    }
}

/// Published-credential record reported for each minted instance.
///
/// # Invariants
/// - One record per successfully minted instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MintRecord {
    /// Declaring group.
    pub group_name: GroupName,
    /// Zone the instance was placed in.
    pub zone: ZoneId,
    /// Index within the group/zone pair.
    pub index: u32,
    /// Published secret path.
    pub secret_path: SecretPath,
}

// ============================================================================
// SECTION: Report
// ============================================================================

/// Batch report covering every planned spec.
///
/// # Invariants
/// - `outcomes` preserves plan order, independent of completion order.
#[derive(Debug, Clone, Default)]
pub struct PipelineReport {
    /// One outcome per planned spec, in plan order.
    outcomes: Vec<InstanceOutcome>,
}

impl PipelineReport {
    /// Returns all outcomes in plan order.
    #[must_use]
    pub fn outcomes(&self) -> &[InstanceOutcome] {
        &self.outcomes
    }

    /// Returns one record per minted instance, in plan order.
    #[must_use]
    pub fn mint_records(&self) -> Vec<MintRecord> {
        self.outcomes
            .iter()
            .filter_map(|outcome| match outcome {
                InstanceOutcome::Minted { spec, path, .. } => Some(MintRecord {
                    group_name: spec.group_name.clone(),
                    zone: spec.zone.clone(),
                    index: spec.index,
                    secret_path: path.clone(),
                }),
                _ => None,
            })
            .collect()
    }

    /// Returns a readiness result for every instance the gate saw.
    ///
    /// Outcomes that never reached a provisioned instance (creation failures
    /// and pre-provision cancellations) carry no instance identifier and are
    /// omitted.
    #[must_use]
    pub fn readiness_results(&self) -> Vec<ReadinessResult> {
        self.outcomes
            .iter()
            .filter_map(|outcome| match outcome {
                InstanceOutcome::Minted {
                    instance_id,
                    attempts,
                    ..
                }
                | InstanceOutcome::MintFailed {
                    instance_id,
                    attempts,
                    ..
                } => Some(ReadinessResult {
                    instance_id: instance_id.clone(),
                    status: GateStatus::Ready,
                    attempts: *attempts,
                    last_error: None,
                }),
                InstanceOutcome::TimedOut {
                    instance_id,
                    attempts,
                    last_error,
                    ..
                } => Some(ReadinessResult {
                    instance_id: instance_id.clone(),
                    status: GateStatus::TimedOut,
                    attempts: *attempts,
                    last_error: last_error.clone(),
                }),
                InstanceOutcome::KeyMaterialLost { instance_id, .. } => Some(ReadinessResult {
                    instance_id: instance_id.clone(),
                    status: GateStatus::Pending,
                    attempts: 0,
                    last_error: None,
                }),
                InstanceOutcome::ProvisioningFailed { .. }
                | InstanceOutcome::Cancelled { .. } => None,
            })
            .collect()
    }

    /// Returns the number of minted instances.
    #[must_use]
    pub fn minted_count(&self) -> usize {
        self.outcomes.iter().filter(|outcome| outcome.is_minted()).count()
    }

    /// Returns true when every planned instance was minted.
    #[must_use]
    pub fn is_fully_minted(&self) -> bool {
        self.outcomes.iter().all(InstanceOutcome::is_minted)
    }
}

// ============================================================================
// SECTION: Pipeline
// ============================================================================

/// Orchestrates independent per-instance pipelines.
#[derive(Clone)]
pub struct ProvisioningPipeline {
    /// Compute provider collaborator.
    provider: Arc<dyn ComputeProvider>,
    /// Readiness gate shared by all instance tasks.
    gate: ReadinessGate,
    /// Minting service shared by all instance tasks.
    minter: SecretMinter,
    /// Stage-event observer.
    observer: Arc<dyn PipelineObserver>,
}

impl ProvisioningPipeline {
    /// Creates a pipeline with a no-op observer.
    #[must_use]
    pub fn new(
        provider: Arc<dyn ComputeProvider>,
        gate: ReadinessGate,
        minter: SecretMinter,
    ) -> Self {
        Self {
            provider,
            gate,
            minter,
            observer: Arc::new(NullObserver),
        }
    }

    /// Replaces the stage-event observer.
    #[must_use]
    pub fn with_observer(mut self, observer: Arc<dyn PipelineObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Runs the full plan to completion and reports every outcome.
    ///
    /// Instances progress concurrently and independently; the report
    /// preserves plan order. Configuration errors never reach this method;
    /// the planner rejects them before any provisioning starts.
    pub async fn run(
        &self,
        plan: Vec<ResolvedInstanceSpec>,
        cancel: &CancelToken,
    ) -> PipelineReport {
        let spec_table: Vec<ResolvedInstanceSpec> = plan.clone();
        let mut tasks: JoinSet<(usize, InstanceOutcome)> = JoinSet::new();

        for (slot, spec) in plan.into_iter().enumerate() {
            let pipeline = self.clone();
            let token = cancel.clone();
            tasks.spawn(async move {
                let outcome = pipeline.run_instance(spec, &token).await;
                (slot, outcome)
            });
        }

        let mut slots: Vec<Option<InstanceOutcome>> = vec![None; spec_table.len()];
        while let Some(joined) = tasks.join_next().await {
            // Join failures only happen on runtime shutdown; the slot then
            // stays empty and is reported as cancelled below.
            if let Ok((slot, outcome)) = joined
                && let Some(entry) = slots.get_mut(slot)
            {
                *entry = Some(outcome);
            }
        }

        let outcomes = slots
            .into_iter()
            .zip(spec_table)
            .map(|(outcome, spec)| outcome.unwrap_or(InstanceOutcome::Cancelled { spec }))
            .collect();
        PipelineReport { outcomes }
    }

    /// Runs one instance through provision, gate, and mint.
    async fn run_instance(
        &self,
        spec: ResolvedInstanceSpec,
        cancel: &CancelToken,
    ) -> InstanceOutcome {
        if cancel.is_cancelled() {
            return InstanceOutcome::Cancelled { spec };
        }

        let provisioned = match self.provider.create_instance(&spec).await {
            Ok(provisioned) => provisioned,
            Err(error) => {
                let cause = error.to_string();
                self.observer.on_provision_failed(&spec, &cause);
                return InstanceOutcome::ProvisioningFailed { spec, cause };
            }
        };
        let instance_id = provisioned.instance_id.clone();
        self.observer.on_provisioned(&instance_id, &spec);

        if provisioned.private_key.is_empty() {
            return InstanceOutcome::KeyMaterialLost { spec, instance_id };
        }

        let ready = match self.gate.wait_ready(provisioned, cancel, self.observer.as_ref()).await {
            Ok(ready) => ready,
            Err(GateError::Cancelled { .. }) => {
                return InstanceOutcome::Cancelled { spec };
            }
            Err(GateError::TimedOut {
                attempts,
                last_error,
            }) => {
                self.observer.on_timed_out(&instance_id, attempts);
                return InstanceOutcome::TimedOut {
                    spec,
                    instance_id,
                    attempts,
                    last_error,
                };
            }
        };
        self.observer.on_ready(&instance_id, ready.attempts());

        if cancel.is_cancelled() {
            return InstanceOutcome::Cancelled { spec };
        }

        match self.minter.mint(&ready, unix_timestamp_now()).await {
            Ok(secret) => {
                self.observer.on_minted(&instance_id, &secret.path);
                InstanceOutcome::Minted {
                    spec,
                    instance_id,
                    path: secret.path,
                    attempts: ready.attempts(),
                }
            }
            Err(error) => InstanceOutcome::MintFailed {
                spec,
                instance_id,
                attempts: ready.attempts(),
                cause: error.to_string(),
            },
        }
    }
}

// ============================================================================
// SECTION: Runtime Clock Helper
// ============================================================================

/// Samples the host clock for minted-secret timestamps.
///
/// This is the runtime's single wall-clock read; the core model stays
/// clock-free.
fn unix_timestamp_now() -> Timestamp {
    let millis = SystemTime::now().duration_since(UNIX_EPOCH).map_or(0, |elapsed| {
        i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX)
    });
    Timestamp::from_unix_millis(millis)
}
