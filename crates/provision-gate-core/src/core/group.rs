// crates/provision-gate-core/src/core/group.rs
// ============================================================================
// Module: Instance Group Declarations
// Description: Operator-declared groups and resolved per-instance specs.
// Purpose: Define the planner's input and output records.
// Dependencies: crate::core::identifiers, serde
// ============================================================================

//! ## Overview
//! An [`InstanceGroupDeclaration`] is the operator-facing, abstract form of a
//! group of identical instances. The planner resolves each declaration into
//! one [`ResolvedInstanceSpec`] per instance to create. Declarations are
//! immutable once planning begins.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

use crate::core::identifiers::CategoryId;
use crate::core::identifiers::GroupName;
use crate::core::identifiers::ZoneId;

// ============================================================================
// SECTION: Declarations
// ============================================================================

/// Logical instance-group declaration supplied by the operator.
///
/// # Invariants
/// - `count_per_zone` is a per-zone count, not a total split across zones.
/// - `image` overrides the category default when present and non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstanceGroupDeclaration {
    /// Group name, unique within a plan.
    pub name: GroupName,
    /// Architecture/size category resolved against the category map.
    pub category: CategoryId,
    /// Number of instances to create in every listed zone.
    pub count_per_zone: u32,
    /// Optional explicit machine image overriding the category default.
    pub image: Option<String>,
}

// ============================================================================
// SECTION: Resolved Specs
// ============================================================================

/// Concrete, provider-ready specification for a single instance.
///
/// # Invariants
/// - `image` and `instance_type` are non-empty after planning.
/// - `index` disambiguates instances sharing a group and zone; it is
///   0-based and ascending within the plan's stable output order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedInstanceSpec {
    /// Name of the declaring group.
    pub group_name: GroupName,
    /// Availability zone the instance is placed in.
    pub zone: ZoneId,
    /// Category the declaration referenced.
    pub category: CategoryId,
    /// Provider-specific instance size/type.
    pub instance_type: String,
    /// Machine image the instance boots from.
    pub image: String,
    /// 0-based index within the group/zone pair.
    pub index: u32,
}
