// crates/provision-gate-core/tests/proptest_planner.rs
// ============================================================================
// Module: Planner Property-Based Tests
// Description: Property tests for plan counts, images, and determinism.
// Purpose: Detect invariant violations across wide declaration ranges.
// ============================================================================

//! Property-based tests for planner invariants.

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
use provision_gate_core::ZoneId;
use provision_gate_core::plan;
use proptest::prelude::*;

// ============================================================================
// SECTION: Strategies
// ============================================================================

/// Categories drawn from a fixed alphabet so the map can cover all of them.
const KNOWN_CATEGORIES: [&str; 4] = ["arm_small", "arm_large", "x86_small", "x86_large"];

fn category_map() -> CategoryMap {
    KNOWN_CATEGORIES.iter().map(|category| (*category, format!("type.{category}"))).collect()
}

fn image_catalog() -> ImageCatalog {
    ImageCatalog::new("baseline-image").with_rule("arm_", "arm-image").with_rule("x86_", "x86-image")
}

fn declaration_strategy() -> impl Strategy<Value = InstanceGroupDeclaration> {
    (
        "[a-z]{1,8}",
        prop::sample::select(&KNOWN_CATEGORIES[..]),
        0_u32 .. 5,
        prop::option::of("[a-z0-9-]{1,12}"),
    )
        .prop_map(|(name, category, count_per_zone, image)| InstanceGroupDeclaration {
            name: name.into(),
            category: CategoryId::new(category),
            count_per_zone,
            image,
        })
}

fn zones_strategy() -> impl Strategy<Value = Vec<ZoneId>> {
    prop::collection::vec("[a-z]{1,4}-[0-9]", 1 .. 5)
        .prop_map(|zones| zones.into_iter().map(ZoneId::new).collect())
}

// ============================================================================
// SECTION: Properties
// ============================================================================

proptest! {
    #[test]
    fn plan_emits_count_per_zone_times_zone_count(
        declarations in prop::collection::vec(declaration_strategy(), 0 .. 6),
        zones in zones_strategy(),
    ) {
        let specs = plan(&declarations, &zones, &category_map(), &image_catalog()).unwrap();
        let expected: usize = declarations
            .iter()
            .map(|declaration| usize::try_from(declaration.count_per_zone).unwrap() * zones.len())
            .sum();
        prop_assert_eq!(specs.len(), expected);
    }

    #[test]
    fn planned_images_are_never_empty(
        declarations in prop::collection::vec(declaration_strategy(), 0 .. 6),
        zones in zones_strategy(),
    ) {
        let specs = plan(&declarations, &zones, &category_map(), &image_catalog()).unwrap();
        for spec in &specs {
            prop_assert!(!spec.image.is_empty());
            prop_assert!(!spec.instance_type.is_empty());
        }
    }

    #[test]
    fn plan_is_deterministic(
        declarations in prop::collection::vec(declaration_strategy(), 0 .. 6),
        zones in zones_strategy(),
    ) {
        let first = plan(&declarations, &zones, &category_map(), &image_catalog()).unwrap();
        let second = plan(&declarations, &zones, &category_map(), &image_catalog()).unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn unknown_category_always_fails_with_zero_specs(
        mut declarations in prop::collection::vec(declaration_strategy(), 1 .. 6),
        zones in zones_strategy(),
        unknown in "[a-z]{3,8}_unmapped",
    ) {
        declarations[0].category = CategoryId::new(unknown);
        let result = plan(&declarations, &zones, &category_map(), &image_catalog());
        prop_assert!(result.is_err());
    }
}
