// crates/provision-gate-core/src/core/instance_types.rs
// ============================================================================
// Module: Instance Type Resolution
// Description: Category-to-instance-type lookup with fail-fast semantics.
// Purpose: Surface unknown categories before any provisioning begins.
// Dependencies: crate::core::identifiers, serde, thiserror
// ============================================================================

//! ## Overview
//! The category map is operator-supplied configuration translating abstract
//! categories into provider-specific instance types. A missing category is a
//! configuration error, not a runtime condition; the planner validates every
//! declaration against the map before emitting a single spec.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use crate::core::identifiers::CategoryId;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Error raised when a category has no instance-type mapping.
///
/// # Invariants
/// - Carries the offending category verbatim for operator diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown category: {category}")]
pub struct UnknownCategoryError {
    /// Category missing from the map.
    pub category: CategoryId,
}

// ============================================================================
// SECTION: Category Map
// ============================================================================

/// Operator-supplied mapping from category to provider instance type.
///
/// # Invariants
/// - Lookups are deterministic; iteration order is lexicographic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryMap {
    /// Category-to-instance-type entries.
    entries: BTreeMap<CategoryId, String>,
}

impl CategoryMap {
    /// Creates an empty category map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a category mapping, replacing any previous entry.
    pub fn insert(&mut self, category: CategoryId, instance_type: impl Into<String>) {
        self.entries.insert(category, instance_type.into());
    }

    /// Returns the number of mapped categories.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true when no categories are mapped.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns true when the category has a mapping.
    #[must_use]
    pub fn contains(&self, category: &CategoryId) -> bool {
        self.entries.contains_key(category)
    }

    /// Resolves a category into its provider instance type.
    ///
    /// # Errors
    ///
    /// Returns [`UnknownCategoryError`] when the category is absent. This is
    /// a configuration error and must be surfaced before provisioning.
    pub fn resolve(&self, category: &CategoryId) -> Result<&str, UnknownCategoryError> {
        self.entries.get(category).map(String::as_str).ok_or_else(|| UnknownCategoryError {
            category: category.clone(),
        })
    }
}

impl<K, V> FromIterator<(K, V)> for CategoryMap
where
    K: Into<CategoryId>,
    V: Into<String>,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self {
            entries: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}
