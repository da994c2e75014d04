// crates/provision-gate-core/tests/gate_unit.rs
// ============================================================================
// Module: Readiness Gate Unit Tests
// Description: Gate state transitions, retry bounds, and cancellation.
// Purpose: Ensure readiness polling is bounded and timeout prevents minting.
// ============================================================================

//! Readiness gate tests for retry, timeout, deadline, and cancellation paths.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only assertions and helpers are permitted."
)]

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::AtomicU32;
use std::sync::atomic::Ordering;
use std::time::Duration;

use async_trait::async_trait;
use provision_gate_core::CategoryId;
use provision_gate_core::Endpoint;
use provision_gate_core::InstanceId;
use provision_gate_core::KeyMaterial;
use provision_gate_core::ProbeError;
use provision_gate_core::ProvisionedInstance;
use provision_gate_core::RemoteShellProbe;
use provision_gate_core::ResolvedInstanceSpec;
use provision_gate_core::ZoneId;
use provision_gate_core::runtime::CancelSource;
use provision_gate_core::runtime::CancelToken;
use provision_gate_core::runtime::GateConfig;
use provision_gate_core::runtime::GateError;
use provision_gate_core::runtime::NullObserver;
use provision_gate_core::runtime::PipelineObserver;
use provision_gate_core::runtime::ReadinessGate;

// ============================================================================
// SECTION: Test Fixtures
// ============================================================================

/// Probe failing a fixed number of attempts before succeeding.
struct FlakyProbe {
    /// Attempts that must fail before the first success.
    failures_before_success: u32,
    /// Attempts observed so far.
    calls: AtomicU32,
}

impl FlakyProbe {
    fn new(failures_before_success: u32) -> Self {
        Self {
            failures_before_success,
            calls: AtomicU32::new(0),
        }
    }
}

#[async_trait]
impl RemoteShellProbe for FlakyProbe {
    async fn attempt(
        &self,
        _endpoint: &Endpoint,
        _user: &str,
        _key: &KeyMaterial,
    ) -> Result<(), ProbeError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        if call <= self.failures_before_success {
            Err(ProbeError::Connect("connection refused".to_string()))
        } else {
            Ok(())
        }
    }
}

/// Probe that hangs past every attempt timeout.
struct HangingProbe;

#[async_trait]
impl RemoteShellProbe for HangingProbe {
    async fn attempt(
        &self,
        _endpoint: &Endpoint,
        _user: &str,
        _key: &KeyMaterial,
    ) -> Result<(), ProbeError> {
        tokio::time::sleep(Duration::from_secs(3600)).await;
        Ok(())
    }
}

/// Observer recording attempt numbers as they start.
#[derive(Default)]
struct RecordingObserver {
    /// Attempt numbers seen by `on_gate_attempt`.
    attempts: Mutex<Vec<u32>>,
}

impl PipelineObserver for RecordingObserver {
    fn on_gate_attempt(&self, _instance_id: &InstanceId, attempt: u32) {
        self.attempts.lock().unwrap().push(attempt);
    }
}

fn instance() -> ProvisionedInstance {
    ProvisionedInstance {
        instance_id: InstanceId::new("i-test-1"),
        spec: ResolvedInstanceSpec {
            group_name: "workers".into(),
            zone: ZoneId::new("z1"),
            category: CategoryId::new("arm_small"),
            instance_type: "t.arm.small".to_string(),
            image: "arm64-image-v1".to_string(),
            index: 0,
        },
        endpoint: Endpoint::new("instance-1.internal", 22),
        user: "ops".to_string(),
        private_key: KeyMaterial::new(b"test-key".to_vec()),
    }
}

fn fast_config(max_attempts: u32) -> GateConfig {
    GateConfig {
        max_attempts,
        attempt_timeout: Duration::from_millis(50),
        poll_interval: Duration::from_millis(5),
        deadline: None,
    }
}

// ============================================================================
// SECTION: Success Path
// ============================================================================

#[tokio::test]
async fn gate_succeeds_on_third_attempt_after_two_failures() {
    let observer = RecordingObserver::default();
    let gate = ReadinessGate::new(Arc::new(FlakyProbe::new(2)), fast_config(3));

    let ready = gate
        .wait_ready(instance(), &CancelToken::never(), &observer)
        .await
        .unwrap();

    assert_eq!(ready.attempts(), 3);
    assert_eq!(*observer.attempts.lock().unwrap(), vec![1, 2, 3]);
    assert_eq!(ready.instance().instance_id, InstanceId::new("i-test-1"));
}

#[tokio::test]
async fn gate_succeeds_immediately_on_reachable_instance() {
    let gate = ReadinessGate::new(Arc::new(FlakyProbe::new(0)), fast_config(5));

    let ready = gate
        .wait_ready(instance(), &CancelToken::never(), &NullObserver)
        .await
        .unwrap();

    assert_eq!(ready.attempts(), 1);
}

// ============================================================================
// SECTION: Timeout Path
// ============================================================================

#[tokio::test]
async fn gate_times_out_after_exhausting_attempts() {
    let gate = ReadinessGate::new(Arc::new(FlakyProbe::new(10)), fast_config(3));

    let error = gate
        .wait_ready(instance(), &CancelToken::never(), &NullObserver)
        .await
        .unwrap_err();

    match error {
        GateError::TimedOut {
            attempts,
            last_error,
        } => {
            assert_eq!(attempts, 3);
            assert!(last_error.unwrap().contains("connection refused"));
        }
        other => panic!("unexpected gate error: {other}"),
    }
}

#[tokio::test]
async fn hanging_probe_attempts_are_bounded_by_attempt_timeout() {
    let config = GateConfig {
        max_attempts: 2,
        attempt_timeout: Duration::from_millis(20),
        poll_interval: Duration::from_millis(5),
        deadline: None,
    };
    let gate = ReadinessGate::new(Arc::new(HangingProbe), config);

    let error = gate
        .wait_ready(instance(), &CancelToken::never(), &NullObserver)
        .await
        .unwrap_err();

    match error {
        GateError::TimedOut {
            attempts,
            last_error,
        } => {
            assert_eq!(attempts, 2);
            assert!(last_error.unwrap().contains("timed out"));
        }
        other => panic!("unexpected gate error: {other}"),
    }
}

#[tokio::test]
async fn wall_clock_deadline_trips_before_attempt_budget() {
    let config = GateConfig {
        max_attempts: 1_000,
        attempt_timeout: Duration::from_millis(20),
        poll_interval: Duration::from_millis(10),
        deadline: Some(Duration::from_millis(40)),
    };
    let gate = ReadinessGate::new(Arc::new(FlakyProbe::new(u32::MAX)), config);

    let error = gate
        .wait_ready(instance(), &CancelToken::never(), &NullObserver)
        .await
        .unwrap_err();

    match error {
        GateError::TimedOut { attempts, .. } => assert!(attempts < 1_000),
        other => panic!("unexpected gate error: {other}"),
    }
}

// ============================================================================
// SECTION: Cancellation Path
// ============================================================================

#[tokio::test]
async fn cancellation_stops_polling_between_attempts() {
    let source = CancelSource::new();
    let token = source.token();
    let config = GateConfig {
        max_attempts: 1_000,
        attempt_timeout: Duration::from_millis(50),
        poll_interval: Duration::from_millis(50),
        deadline: None,
    };
    let gate = ReadinessGate::new(Arc::new(FlakyProbe::new(u32::MAX)), config);

    let wait = tokio::spawn(async move {
        gate.wait_ready(instance(), &token, &NullObserver).await
    });
    tokio::time::sleep(Duration::from_millis(20)).await;
    source.cancel();

    let error = wait.await.unwrap().unwrap_err();
    assert!(matches!(error, GateError::Cancelled { .. }));
}

#[tokio::test]
async fn already_cancelled_token_fails_before_first_attempt() {
    let source = CancelSource::new();
    let token = source.token();
    source.cancel();
    let gate = ReadinessGate::new(Arc::new(FlakyProbe::new(0)), fast_config(3));

    let error = gate.wait_ready(instance(), &token, &NullObserver).await.unwrap_err();

    assert!(matches!(error, GateError::Cancelled { attempts: 0 }));
}
