// crates/provision-gate-providers/src/tcp.rs
// ============================================================================
// Module: TCP Reachability Probe
// Description: Probe confirming the instance endpoint accepts connections.
// Purpose: Provide a transport-level readiness signal for development use.
// Dependencies: provision-gate-core, tokio
// ============================================================================

//! ## Overview
//! The TCP probe opens a connection to the instance endpoint and reports
//! success if the connect completes. It proves reachability only: the key is
//! never presented and no command runs, so it is weaker than a full
//! secure-shell probe and intended for development and smoke testing where
//! transport liveness is the signal of interest.

// ============================================================================
// SECTION: Imports
// ============================================================================

use async_trait::async_trait;
use provision_gate_core::Endpoint;
use provision_gate_core::KeyMaterial;
use provision_gate_core::ProbeError;
use provision_gate_core::RemoteShellProbe;
use tokio::net::TcpStream;

// ============================================================================
// SECTION: Probe
// ============================================================================

/// Transport-level reachability probe.
#[derive(Debug, Clone, Copy, Default)]
pub struct TcpReachabilityProbe;

impl TcpReachabilityProbe {
    /// Creates the probe.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

#[async_trait]
impl RemoteShellProbe for TcpReachabilityProbe {
    async fn attempt(
        &self,
        endpoint: &Endpoint,
        _user: &str,
        _key: &KeyMaterial,
    ) -> Result<(), ProbeError> {
        let address = format!("{}:{}", endpoint.host, endpoint.port);
        match TcpStream::connect(&address).await {
            Ok(_stream) => Ok(()),
            Err(error) => Err(ProbeError::Connect(format!("{address}: {error}"))),
        }
    }
}
