// crates/provision-gate-core/examples/minimal.rs
// ============================================================================
// Module: Provision Gate Minimal Example
// Description: Minimal end-to-end provisioning run using in-memory adapters.
// Purpose: Demonstrate plan, pipeline run, and mint-record reporting.
// Dependencies: provision-gate-core
// ============================================================================

//! ## Overview
//! Plans a small fleet, runs each instance through provision, gate, and mint
//! using in-memory collaborators, and inspects the resulting report. This
//! example is backend-agnostic and suitable for quick verification.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use provision_gate_core::CategoryId;
use provision_gate_core::CategoryMap;
use provision_gate_core::ComputeProvider;
use provision_gate_core::Endpoint;
use provision_gate_core::ImageCatalog;
use provision_gate_core::InstanceGroupDeclaration;
use provision_gate_core::InstanceId;
use provision_gate_core::KeyMaterial;
use provision_gate_core::OverwritePolicy;
use provision_gate_core::ProbeError;
use provision_gate_core::ProvisionError;
use provision_gate_core::ProvisionedInstance;
use provision_gate_core::RemoteShellProbe;
use provision_gate_core::ResolvedInstanceSpec;
use provision_gate_core::RoleName;
use provision_gate_core::ZoneId;
use provision_gate_core::plan;
use provision_gate_core::runtime::CancelToken;
use provision_gate_core::runtime::GateConfig;
use provision_gate_core::runtime::InMemorySecretStore;
use provision_gate_core::runtime::MintSettings;
use provision_gate_core::runtime::ProvisioningPipeline;
use provision_gate_core::runtime::ReadinessGate;
use provision_gate_core::runtime::SecretMinter;

/// Error type for example preconditions.
#[derive(Debug)]
struct ExampleError(&'static str);

impl std::fmt::Display for ExampleError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl std::error::Error for ExampleError {}

/// Provider that fabricates an instance for each spec.
#[derive(Debug)]
struct ExampleProvider;

#[async_trait]
impl ComputeProvider for ExampleProvider {
    async fn create_instance(
        &self,
        spec: &ResolvedInstanceSpec,
    ) -> Result<ProvisionedInstance, ProvisionError> {
        let host = format!("{}-{}-{}.internal", spec.group_name, spec.zone, spec.index);
        Ok(ProvisionedInstance {
            instance_id: InstanceId::new(format!("i-{host}")),
            spec: spec.clone(),
            endpoint: Endpoint::new(host.clone(), 22),
            user: "ops".to_string(),
            private_key: KeyMaterial::new(format!("key-for-{host}").into_bytes()),
        })
    }
}

/// Probe that reports every instance ready on the first attempt.
struct ExampleProbe;

#[async_trait]
impl RemoteShellProbe for ExampleProbe {
    async fn attempt(
        &self,
        _endpoint: &Endpoint,
        _user: &str,
        _key: &KeyMaterial,
    ) -> Result<(), ProbeError> {
        Ok(())
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let declarations = vec![
        InstanceGroupDeclaration {
            name: "workers".into(),
            category: CategoryId::new("arm_small"),
            count_per_zone: 2,
            image: None,
        },
        InstanceGroupDeclaration {
            name: "frontends".into(),
            category: CategoryId::new("x86_small"),
            count_per_zone: 1,
            image: None,
        },
    ];
    let zones = vec![ZoneId::new("zone-a"), ZoneId::new("zone-b")];
    let categories: CategoryMap = [
        ("arm_small", "t.arm.small"),
        ("x86_small", "t.x86.small"),
    ]
    .into_iter()
    .collect();
    let images = ImageCatalog::new("base-image-v1")
        .with_rule("arm_", "arm64-image-v1")
        .with_rule("x86_", "amd64-image-v1");

    let specs = plan(&declarations, &zones, &categories, &images)?;

    let store = InMemorySecretStore::new();
    let gate = ReadinessGate::new(
        Arc::new(ExampleProbe),
        GateConfig {
            max_attempts: 3,
            attempt_timeout: Duration::from_millis(100),
            poll_interval: Duration::from_millis(10),
            deadline: None,
        },
    );
    let minter = SecretMinter::new(
        Arc::new(store.clone()),
        MintSettings {
            role_name: RoleName::new("fleet-worker"),
            path_prefix: "secret/provision".to_string(),
            overwrite: OverwritePolicy::Fail,
        },
    );
    let pipeline = ProvisioningPipeline::new(Arc::new(ExampleProvider), gate, minter);

    let report = pipeline.run(specs, &CancelToken::never()).await;
    if !report.is_fully_minted() {
        return Err(
            Box::new(ExampleError("expected every instance to mint")) as Box<dyn std::error::Error>
        );
    }

    let records = report.mint_records();
    let _ = (records, store.paths());
    Ok(())
}
