// crates/provision-gate-core/src/core/zones.rs
// ============================================================================
// Module: Zone Distribution
// Description: Per-zone instance count assignment across availability zones.
// Purpose: Keep zone spreading deterministic and order-preserving.
// Dependencies: crate::core::identifiers
// ============================================================================

//! ## Overview
//! Zone distribution assigns the requested count to every listed zone. The
//! count is per zone, not a total divided across zones; a declaration with
//! `count_per_zone = 2` and three zones yields six instances. Output order
//! always follows zone input order so downstream planning stays stable.

// ============================================================================
// SECTION: Imports
// ============================================================================

use crate::core::identifiers::ZoneId;

// ============================================================================
// SECTION: Distribution
// ============================================================================

/// Assigns `count_per_zone` instances to every zone, preserving zone order.
///
/// Zero zones yields an empty distribution without error; whether that is
/// acceptable for a declaration with nonzero demand is decided by the
/// planner, which rejects it before provisioning.
#[must_use]
pub fn distribute_per_zone(count_per_zone: u32, zones: &[ZoneId]) -> Vec<(ZoneId, u32)> {
    zones.iter().map(|zone| (zone.clone(), count_per_zone)).collect()
}

/// Returns the total number of instances a distribution produces.
#[must_use]
pub fn total_instances(count_per_zone: u32, zones: &[ZoneId]) -> u64 {
    u64::from(count_per_zone) * u64::try_from(zones.len()).unwrap_or(u64::MAX)
}
