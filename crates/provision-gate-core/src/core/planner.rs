// crates/provision-gate-core/src/core/planner.rs
// ============================================================================
// Module: Instance Group Planner
// Description: Resolves group declarations into concrete instance specs.
// Purpose: Validate all groups first, then emit a stable, ordered plan.
// Dependencies: crate::core::{group, identifiers, images, instance_types, zones}, thiserror
// ============================================================================

//! ## Overview
//! Planning composes image resolution, instance-type resolution, and zone
//! distribution into a flat, ordered list of [`ResolvedInstanceSpec`] values.
//!
//! Invariants:
//! - Output order is stable: declarations in input order, then zones in input
//!   order, then index ascending. Log correlation and test fixtures rely on it.
//! - Planning fails atomically: a single invalid declaration yields zero specs.
//! - Every emitted spec carries a non-empty image and instance type.

// ============================================================================
// SECTION: Imports
// ============================================================================

use thiserror::Error;

use crate::core::group::InstanceGroupDeclaration;
use crate::core::group::ResolvedInstanceSpec;
use crate::core::identifiers::CategoryId;
use crate::core::identifiers::GroupName;
use crate::core::identifiers::ZoneId;
use crate::core::images::ImageCatalog;
use crate::core::instance_types::CategoryMap;
use crate::core::zones::distribute_per_zone;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Planning errors. All variants are configuration errors surfaced before
/// any provisioning starts.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlanError {
    /// A declaration references a category absent from the category map.
    #[error("group {group}: unknown category: {category}")]
    UnknownCategory {
        /// Declaring group.
        group: GroupName,
        /// Category missing from the map.
        category: CategoryId,
    },
    /// A declaration demands instances but the zone list is empty.
    #[error("group {group}: nonzero demand with empty zone list")]
    EmptyZones {
        /// Declaring group.
        group: GroupName,
    },
    /// Image resolution produced an empty image for a declaration.
    #[error("group {group}: resolved image is empty")]
    EmptyImage {
        /// Declaring group.
        group: GroupName,
    },
}

// ============================================================================
// SECTION: Planner
// ============================================================================

/// Resolves declarations into one spec per instance to create.
///
/// The function validates every declaration before emitting anything, so a
/// failed plan returns zero specs. Identical inputs yield identical output,
/// element for element.
///
/// # Errors
///
/// Returns [`PlanError`] when any declaration references an unknown category,
/// demands instances with an empty zone list, or resolves to an empty image.
pub fn plan(
    declarations: &[InstanceGroupDeclaration],
    zones: &[ZoneId],
    categories: &CategoryMap,
    images: &ImageCatalog,
) -> Result<Vec<ResolvedInstanceSpec>, PlanError> {
    // Validation pass: no spec is emitted until every declaration checks out.
    for declaration in declarations {
        if !categories.contains(&declaration.category) {
            return Err(PlanError::UnknownCategory {
                group: declaration.name.clone(),
                category: declaration.category.clone(),
            });
        }
        if declaration.count_per_zone > 0 && zones.is_empty() {
            return Err(PlanError::EmptyZones {
                group: declaration.name.clone(),
            });
        }
        let image = images.resolve(&declaration.category, declaration.image.as_deref());
        if image.is_empty() {
            return Err(PlanError::EmptyImage {
                group: declaration.name.clone(),
            });
        }
    }

    let mut specs = Vec::new();
    for declaration in declarations {
        let instance_type = match categories.resolve(&declaration.category) {
            Ok(instance_type) => instance_type.to_string(),
            Err(error) => {
                return Err(PlanError::UnknownCategory {
                    group: declaration.name.clone(),
                    category: error.category,
                });
            }
        };
        let image = images.resolve(&declaration.category, declaration.image.as_deref());
        for (zone, count) in distribute_per_zone(declaration.count_per_zone, zones) {
            for index in 0..count {
                specs.push(ResolvedInstanceSpec {
                    group_name: declaration.name.clone(),
                    zone: zone.clone(),
                    category: declaration.category.clone(),
                    instance_type: instance_type.clone(),
                    image: image.clone(),
                    index,
                });
            }
        }
    }
    Ok(specs)
}
