// crates/provision-gate-core/src/core/images.rs
// ============================================================================
// Module: Image Resolution
// Description: Default machine-image selection by category prefix.
// Purpose: Guarantee every planned instance carries a non-empty image.
// Dependencies: crate::core::identifiers
// ============================================================================

//! ## Overview
//! The image catalog maps architecture-tagged category prefixes to default
//! machine images. Resolution is a pure, total function: an explicit image
//! always wins, a matching prefix rule supplies the architecture default,
//! and everything else falls back to the baseline image.
//!
//! Invariants:
//! - Prefix rules are evaluated in insertion order; the first match wins.
//! - Resolution never fails for a non-empty category.

// ============================================================================
// SECTION: Imports
// ============================================================================

use crate::core::identifiers::CategoryId;

// ============================================================================
// SECTION: Image Catalog
// ============================================================================

/// Single prefix-to-image default rule.
///
/// # Invariants
/// - `prefix` and `image` are non-empty (enforced by the configuration layer).
#[derive(Debug, Clone, PartialEq, Eq)]
struct PrefixRule {
    /// Category prefix selecting this rule.
    prefix: String,
    /// Default image for matching categories.
    image: String,
}

/// Catalog of default machine images keyed by category prefix.
///
/// # Invariants
/// - `baseline` is the fallback for categories no rule matches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageCatalog {
    /// Ordered prefix rules; first match wins.
    rules: Vec<PrefixRule>,
    /// Baseline image for unmatched categories.
    baseline: String,
}

impl ImageCatalog {
    /// Creates a catalog with the given baseline image and no prefix rules.
    #[must_use]
    pub fn new(baseline: impl Into<String>) -> Self {
        Self {
            rules: Vec::new(),
            baseline: baseline.into(),
        }
    }

    /// Appends a prefix rule. Rules match in insertion order.
    #[must_use]
    pub fn with_rule(mut self, prefix: impl Into<String>, image: impl Into<String>) -> Self {
        self.rules.push(PrefixRule {
            prefix: prefix.into(),
            image: image.into(),
        });
        self
    }

    /// Returns the baseline image.
    #[must_use]
    pub fn baseline(&self) -> &str {
        &self.baseline
    }

    /// Resolves the image for a category.
    ///
    /// A non-empty `explicit_image` is returned unchanged. Otherwise the
    /// first rule whose prefix matches the category supplies the default,
    /// and unmatched categories fall back to the baseline.
    #[must_use]
    pub fn resolve(&self, category: &CategoryId, explicit_image: Option<&str>) -> String {
        if let Some(image) = explicit_image
            && !image.is_empty()
        {
            return image.to_string();
        }
        for rule in &self.rules {
            if category.as_str().starts_with(rule.prefix.as_str()) {
                return rule.image.clone();
            }
        }
        self.baseline.clone()
    }
}
