// crates/provision-gate-providers/tests/tcp_probe_unit.rs
// ============================================================================
// Module: TCP Probe Unit Tests
// Description: Reachability checks against a local listener.
// Purpose: Ensure the probe reports transport liveness accurately.
// ============================================================================

//! TCP reachability probe tests using a loopback listener.

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

use provision_gate_core::Endpoint;
use provision_gate_core::KeyMaterial;
use provision_gate_core::ProbeError;
use provision_gate_core::RemoteShellProbe;
use provision_gate_providers::TcpReachabilityProbe;
use tokio::net::TcpListener;

// ============================================================================
// SECTION: Tests
// ============================================================================

#[tokio::test]
async fn listening_endpoint_is_reported_ready() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    let probe = TcpReachabilityProbe::new();
    let endpoint = Endpoint::new("127.0.0.1", port);

    let result = probe.attempt(&endpoint, "ops", &KeyMaterial::new(Vec::new())).await;

    assert!(result.is_ok());
}

#[tokio::test]
async fn closed_endpoint_reports_connect_failure() {
    // Bind then drop to obtain a port that is very likely closed.
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    let probe = TcpReachabilityProbe::new();
    let endpoint = Endpoint::new("127.0.0.1", port);

    let error = probe.attempt(&endpoint, "ops", &KeyMaterial::new(Vec::new())).await.unwrap_err();

    assert!(matches!(error, ProbeError::Connect(_)));
}
