// crates/provision-gate-core/tests/planner_unit.rs
// ============================================================================
// Module: Planner Unit Tests
// Description: Group resolution, ordering, and fail-fast validation behavior.
// Purpose: Ensure plans are deterministic, complete, and atomic on failure.
// ============================================================================

//! Planner tests covering counts, ordering, image defaults, and atomic failure.

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

use provision_gate_core::CategoryId;
use provision_gate_core::CategoryMap;
use provision_gate_core::ImageCatalog;
use provision_gate_core::InstanceGroupDeclaration;
use provision_gate_core::PlanError;
use provision_gate_core::ZoneId;
use provision_gate_core::distribute_per_zone;
use provision_gate_core::plan;

// ============================================================================
// SECTION: Test Fixtures
// ============================================================================

fn catalog() -> ImageCatalog {
    ImageCatalog::new("base-image-v1")
        .with_rule("arm_", "arm64-image-v1")
        .with_rule("x86_", "amd64-image-v1")
}

fn categories() -> CategoryMap {
    [
        ("arm_small", "t.arm.small"),
        ("arm_large", "t.arm.large"),
        ("x86_small", "t.x86.small"),
        ("gpu_node", "t.gpu.xlarge"),
    ]
    .into_iter()
    .collect()
}

fn zones(names: &[&str]) -> Vec<ZoneId> {
    names.iter().map(|name| ZoneId::new(*name)).collect()
}

fn declaration(name: &str, category: &str, count: u32) -> InstanceGroupDeclaration {
    InstanceGroupDeclaration {
        name: name.into(),
        category: CategoryId::new(category),
        count_per_zone: count,
        image: None,
    }
}

// ============================================================================
// SECTION: Scenario Tests
// ============================================================================

#[test]
fn arm_small_group_yields_one_spec_per_zone_with_arch_default_image() {
    let declarations = vec![declaration("workers", "arm_small", 1)];
    let zones = zones(&["z1", "z2"]);

    let specs = plan(&declarations, &zones, &categories(), &catalog()).unwrap();

    assert_eq!(specs.len(), 2);
    assert_eq!(specs[0].zone, ZoneId::new("z1"));
    assert_eq!(specs[1].zone, ZoneId::new("z2"));
    for spec in &specs {
        assert_eq!(spec.instance_type, "t.arm.small");
        assert_eq!(spec.image, "arm64-image-v1");
        assert_eq!(spec.index, 0);
    }
}

#[test]
fn plan_emits_count_per_zone_in_every_zone() {
    let declarations = vec![declaration("workers", "x86_small", 3)];
    let zones = zones(&["z1", "z2", "z3"]);

    let specs = plan(&declarations, &zones, &categories(), &catalog()).unwrap();

    // Per-zone semantics: 3 per zone, not 3 split across zones.
    assert_eq!(specs.len(), 9);
    for zone in ["z1", "z2", "z3"] {
        let in_zone = specs.iter().filter(|spec| spec.zone == ZoneId::new(zone)).count();
        assert_eq!(in_zone, 3);
    }
}

#[test]
fn plan_ordering_is_declarations_then_zones_then_index() {
    let declarations = vec![
        declaration("alpha", "arm_small", 2),
        declaration("beta", "x86_small", 1),
    ];
    let zones = zones(&["z1", "z2"]);

    let specs = plan(&declarations, &zones, &categories(), &catalog()).unwrap();

    let order: Vec<(String, String, u32)> = specs
        .iter()
        .map(|spec| (spec.group_name.to_string(), spec.zone.to_string(), spec.index))
        .collect();
    let expected = vec![
        ("alpha".to_string(), "z1".to_string(), 0),
        ("alpha".to_string(), "z1".to_string(), 1),
        ("alpha".to_string(), "z2".to_string(), 0),
        ("alpha".to_string(), "z2".to_string(), 1),
        ("beta".to_string(), "z1".to_string(), 0),
        ("beta".to_string(), "z2".to_string(), 0),
    ];
    assert_eq!(order, expected);
}

#[test]
fn plan_is_idempotent_for_identical_inputs() {
    let declarations = vec![
        declaration("alpha", "arm_large", 2),
        declaration("beta", "gpu_node", 1),
    ];
    let zones = zones(&["z1", "z2"]);

    let first = plan(&declarations, &zones, &categories(), &catalog()).unwrap();
    let second = plan(&declarations, &zones, &categories(), &catalog()).unwrap();

    assert_eq!(first, second);
}

#[test]
fn explicit_image_overrides_category_default() {
    let mut declarations = vec![declaration("workers", "arm_small", 1)];
    declarations[0].image = Some("custom-image-v9".to_string());

    let specs = plan(&declarations, &zones(&["z1"]), &categories(), &catalog()).unwrap();

    assert_eq!(specs[0].image, "custom-image-v9");
}

#[test]
fn empty_explicit_image_falls_back_to_category_default() {
    let mut declarations = vec![declaration("workers", "gpu_node", 1)];
    declarations[0].image = Some(String::new());

    let specs = plan(&declarations, &zones(&["z1"]), &categories(), &catalog()).unwrap();

    // gpu_node matches no prefix rule; the baseline applies.
    assert_eq!(specs[0].image, "base-image-v1");
}

#[test]
fn zero_count_group_emits_no_specs_without_error() {
    let declarations = vec![declaration("idle", "arm_small", 0)];

    let specs = plan(&declarations, &zones(&["z1", "z2"]), &categories(), &catalog()).unwrap();

    assert!(specs.is_empty());
}

// ============================================================================
// SECTION: Failure Tests
// ============================================================================

#[test]
fn unknown_category_fails_atomically_with_zero_specs() {
    let declarations = vec![
        declaration("valid", "arm_small", 2),
        declaration("broken", "quantum_node", 1),
    ];

    let error = plan(&declarations, &zones(&["z1"]), &categories(), &catalog()).unwrap_err();

    match error {
        PlanError::UnknownCategory { group, category } => {
            assert_eq!(group.as_str(), "broken");
            assert_eq!(category.as_str(), "quantum_node");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn nonzero_demand_with_empty_zone_list_is_rejected() {
    let declarations = vec![declaration("workers", "arm_small", 1)];

    let error = plan(&declarations, &[], &categories(), &catalog()).unwrap_err();

    assert!(matches!(error, PlanError::EmptyZones { .. }));
}

#[test]
fn zero_demand_with_empty_zone_list_is_accepted() {
    let declarations = vec![declaration("idle", "arm_small", 0)];

    let specs = plan(&declarations, &[], &categories(), &catalog()).unwrap();

    assert!(specs.is_empty());
}

// ============================================================================
// SECTION: Zone Distribution Tests
// ============================================================================

#[test]
fn distribution_assigns_full_count_to_every_zone_in_order() {
    let zones = zones(&["z2", "z1", "z3"]);

    let distribution = distribute_per_zone(4, &zones);

    assert_eq!(
        distribution,
        vec![
            (ZoneId::new("z2"), 4),
            (ZoneId::new("z1"), 4),
            (ZoneId::new("z3"), 4),
        ]
    );
}

#[test]
fn distribution_over_zero_zones_is_empty() {
    assert!(distribute_per_zone(7, &[]).is_empty());
}

#[test]
fn total_instance_count_multiplies_count_by_zones() {
    let zones = zones(&["z1", "z2", "z3"]);

    assert_eq!(provision_gate_core::total_instances(4, &zones), 12);
    assert_eq!(provision_gate_core::total_instances(4, &[]), 0);
}
