// crates/provision-gate-config/src/model.rs
// ============================================================================
// Module: Configuration Model
// Description: Typed TOML configuration sections and validation.
// Purpose: Describe the fleet an operator wants provisioned.
// Dependencies: provision-gate-core, serde
// ============================================================================

//! ## Overview
//! The configuration model mirrors the TOML an operator writes. Sections
//! default where a safe default exists (gate bounds, overwrite policy) and
//! are mandatory where silence would hide a mistake (zones, groups, images).
//! Validation is structural only; semantic checks such as category
//! resolution stay with the planner so every failure has one home.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::collections::BTreeSet;

use provision_gate_core::OverwritePolicy;
use serde::Deserialize;
use serde::Serialize;

use crate::load::ConfigError;

// ============================================================================
// SECTION: Sections
// ============================================================================

/// One instance group declaration.
///
/// # Invariants
/// - `name` and `category` are non-empty after validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupConfig {
    /// Logical group name, unique within the configuration.
    pub name: String,
    /// Hardware category resolved through `[instance_types]`.
    pub category: String,
    /// Instances to create in each zone.
    pub count_per_zone: u32,
    /// Optional explicit image overriding category rules.
    #[serde(default)]
    pub image: Option<String>,
}

/// One category-prefix image rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRuleConfig {
    /// Category prefix the rule matches.
    pub prefix: String,
    /// Image selected when the prefix matches.
    pub image: String,
}

/// Image selection section.
///
/// # Invariants
/// - `baseline` is non-empty after validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImagesSection {
    /// Fallback image when no rule matches.
    pub baseline: String,
    /// Prefix rules applied in declaration order.
    #[serde(default)]
    pub rules: Vec<ImageRuleConfig>,
}

/// Readiness gate section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GateSection {
    /// Maximum probe attempts per instance.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    /// Per-attempt timeout in milliseconds.
    #[serde(default = "default_attempt_timeout_ms")]
    pub attempt_timeout_ms: u64,
    /// Pause between attempts in milliseconds.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    /// Optional wall-clock deadline in milliseconds.
    #[serde(default)]
    pub deadline_ms: Option<u64>,
}

impl Default for GateSection {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            attempt_timeout_ms: default_attempt_timeout_ms(),
            poll_interval_ms: default_poll_interval_ms(),
            deadline_ms: None,
        }
    }
}

/// Returns the default probe attempt budget.
const fn default_max_attempts() -> u32 {
    30
}

/// Returns the default per-attempt timeout in milliseconds.
const fn default_attempt_timeout_ms() -> u64 {
    5_000
}

/// Returns the default pause between attempts in milliseconds.
const fn default_poll_interval_ms() -> u64 {
    1_000
}

/// Secret minting section.
///
/// # Invariants
/// - `path_prefix` and `role_name` are non-empty after validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecretsSection {
    /// Secret-store path prefix for minted credentials.
    pub path_prefix: String,
    /// Role name recorded in each credential payload.
    pub role_name: String,
    /// Overwrite policy for secret writes.
    #[serde(default)]
    pub overwrite: OverwritePolicy,
}

// ============================================================================
// SECTION: Root Config
// ============================================================================

/// Root Provision Gate configuration.
///
/// # Invariants
/// - Group names and zones are unique after validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProvisionGateConfig {
    /// Compute provider identifier to route instance creation through.
    pub provider: String,
    /// Availability zones in placement order.
    pub zones: Vec<String>,
    /// Instance group declarations.
    #[serde(default)]
    pub groups: Vec<GroupConfig>,
    /// Category-to-instance-type mapping.
    #[serde(default)]
    pub instance_types: BTreeMap<String, String>,
    /// Image selection rules.
    pub images: ImagesSection,
    /// Readiness gate bounds.
    #[serde(default)]
    pub gate: GateSection,
    /// Secret minting settings.
    pub secrets: SecretsSection,
}

impl ProvisionGateConfig {
    /// Validates structural configuration invariants.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first violated invariant.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.provider.is_empty() {
            return Err(ConfigError::Invalid("provider must not be empty".to_string()));
        }

        let mut seen_zones = BTreeSet::new();
        for zone in &self.zones {
            if zone.is_empty() {
                return Err(ConfigError::Invalid("zones must not contain empty names".to_string()));
            }
            if !seen_zones.insert(zone.as_str()) {
                return Err(ConfigError::Invalid(format!("duplicate zone: {zone}")));
            }
        }

        let mut seen_groups = BTreeSet::new();
        for group in &self.groups {
            if group.name.is_empty() {
                return Err(ConfigError::Invalid("group name must not be empty".to_string()));
            }
            if group.category.is_empty() {
                return Err(ConfigError::Invalid(format!(
                    "group {} has an empty category",
                    group.name
                )));
            }
            if !seen_groups.insert(group.name.as_str()) {
                return Err(ConfigError::Invalid(format!("duplicate group: {}", group.name)));
            }
        }

        for (category, instance_type) in &self.instance_types {
            if instance_type.is_empty() {
                return Err(ConfigError::Invalid(format!(
                    "instance type for category {category} must not be empty"
                )));
            }
        }

        if self.images.baseline.is_empty() {
            return Err(ConfigError::Invalid("images.baseline must not be empty".to_string()));
        }
        for rule in &self.images.rules {
            if rule.prefix.is_empty() || rule.image.is_empty() {
                return Err(ConfigError::Invalid(
                    "image rules require a prefix and an image".to_string(),
                ));
            }
        }

        if self.gate.max_attempts == 0 {
            return Err(ConfigError::Invalid(
                "gate.max_attempts must be greater than zero".to_string(),
            ));
        }
        if self.gate.poll_interval_ms == 0 {
            return Err(ConfigError::Invalid(
                "gate.poll_interval_ms must be greater than zero".to_string(),
            ));
        }
        if self.gate.attempt_timeout_ms == 0 {
            return Err(ConfigError::Invalid(
                "gate.attempt_timeout_ms must be greater than zero".to_string(),
            ));
        }
        if let Some(deadline_ms) = self.gate.deadline_ms
            && deadline_ms == 0
        {
            return Err(ConfigError::Invalid(
                "gate.deadline_ms must be greater than zero when set".to_string(),
            ));
        }

        if self.secrets.path_prefix.is_empty() {
            return Err(ConfigError::Invalid(
                "secrets.path_prefix must not be empty".to_string(),
            ));
        }
        if self.secrets.role_name.is_empty() {
            return Err(ConfigError::Invalid("secrets.role_name must not be empty".to_string()));
        }

        Ok(())
    }
}
