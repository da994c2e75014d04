// crates/provision-gate-providers/tests/registry_unit.rs
// ============================================================================
// Module: Provider Registry Unit Tests
// Description: Registration, routing, and error behavior.
// Purpose: Ensure provider lookup fails closed on wiring mistakes.
// ============================================================================

//! Registry routing tests.

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

use provision_gate_core::CategoryId;
use provision_gate_core::ProviderId;
use provision_gate_core::ResolvedInstanceSpec;
use provision_gate_core::ZoneId;
use provision_gate_providers::ProviderRegistry;
use provision_gate_providers::RegistryError;
use provision_gate_providers::ScriptedProvider;

// ============================================================================
// SECTION: Tests
// ============================================================================

#[test]
fn resolve_returns_the_registered_provider() {
    let mut registry = ProviderRegistry::new();
    registry
        .register(ProviderId::new("scripted"), Arc::new(ScriptedProvider::default()))
        .unwrap();

    assert!(registry.resolve(&ProviderId::new("scripted")).is_ok());
    assert_eq!(registry.len(), 1);
}

#[test]
fn duplicate_registration_is_rejected() {
    let mut registry = ProviderRegistry::new();
    registry
        .register(ProviderId::new("scripted"), Arc::new(ScriptedProvider::default()))
        .unwrap();

    let error = registry
        .register(ProviderId::new("scripted"), Arc::new(ScriptedProvider::default()))
        .unwrap_err();

    assert!(matches!(error, RegistryError::Duplicate { .. }));
    assert_eq!(registry.len(), 1);
}

#[test]
fn unknown_provider_fails_closed() {
    let registry = ProviderRegistry::new();

    let error = registry.resolve(&ProviderId::new("missing")).unwrap_err();

    match error {
        RegistryError::Unknown { provider_id } => {
            assert_eq!(provider_id, ProviderId::new("missing"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn provider_ids_are_sorted() {
    let mut registry = ProviderRegistry::new();
    registry
        .register(ProviderId::new("zeta"), Arc::new(ScriptedProvider::default()))
        .unwrap();
    registry
        .register(ProviderId::new("alpha"), Arc::new(ScriptedProvider::default()))
        .unwrap();

    assert_eq!(
        registry.provider_ids(),
        vec![ProviderId::new("alpha"), ProviderId::new("zeta")]
    );
}

#[tokio::test]
async fn resolved_provider_creates_instances() {
    let mut registry = ProviderRegistry::new();
    registry
        .register(ProviderId::new("scripted"), Arc::new(ScriptedProvider::default()))
        .unwrap();
    let provider = registry.resolve(&ProviderId::new("scripted")).unwrap();

    let spec = ResolvedInstanceSpec {
        group_name: "workers".into(),
        zone: ZoneId::new("z1"),
        category: CategoryId::new("arm_small"),
        instance_type: "t.arm.small".to_string(),
        image: "arm64-image-v1".to_string(),
        index: 0,
    };
    let instance = provider.create_instance(&spec).await.unwrap();

    assert!(!instance.private_key.is_empty());
}
