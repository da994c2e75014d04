// crates/provision-gate-config/src/convert.rs
// ============================================================================
// Module: Configuration Conversion
// Description: Conversion from the TOML model into core planning inputs.
// Purpose: Hand the planner and runtime typed, validated inputs.
// Dependencies: provision-gate-core
// ============================================================================

//! ## Overview
//! Converters are total over a validated configuration: validation rejects
//! every shape these functions cannot express, so conversion itself never
//! fails. Each converter borrows the configuration and builds fresh typed
//! values the core owns outright.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::time::Duration;

use provision_gate_core::CategoryId;
use provision_gate_core::CategoryMap;
use provision_gate_core::ImageCatalog;
use provision_gate_core::InstanceGroupDeclaration;
use provision_gate_core::ProviderId;
use provision_gate_core::RoleName;
use provision_gate_core::ZoneId;
use provision_gate_core::runtime::GateConfig;
use provision_gate_core::runtime::MintSettings;

use crate::model::ProvisionGateConfig;

// ============================================================================
// SECTION: Converters
// ============================================================================

impl ProvisionGateConfig {
    /// Returns the configured provider identifier.
    #[must_use]
    pub fn provider_id(&self) -> ProviderId {
        ProviderId::new(self.provider.as_str())
    }

    /// Returns the zones in placement order.
    #[must_use]
    pub fn zone_ids(&self) -> Vec<ZoneId> {
        self.zones.iter().map(ZoneId::new).collect()
    }

    /// Returns the instance group declarations.
    #[must_use]
    pub fn declarations(&self) -> Vec<InstanceGroupDeclaration> {
        self.groups
            .iter()
            .map(|group| InstanceGroupDeclaration {
                name: group.name.as_str().into(),
                category: CategoryId::new(group.category.as_str()),
                count_per_zone: group.count_per_zone,
                image: group.image.clone(),
            })
            .collect()
    }

    /// Returns the category-to-instance-type map.
    #[must_use]
    pub fn category_map(&self) -> CategoryMap {
        self.instance_types
            .iter()
            .map(|(category, instance_type)| (category.as_str(), instance_type.as_str()))
            .collect()
    }

    /// Returns the image catalog with rules in declaration order.
    #[must_use]
    pub fn image_catalog(&self) -> ImageCatalog {
        let mut catalog = ImageCatalog::new(self.images.baseline.as_str());
        for rule in &self.images.rules {
            catalog = catalog.with_rule(rule.prefix.as_str(), rule.image.as_str());
        }
        catalog
    }

    /// Returns the readiness gate bounds.
    #[must_use]
    pub fn gate_config(&self) -> GateConfig {
        GateConfig {
            max_attempts: self.gate.max_attempts,
            attempt_timeout: Duration::from_millis(self.gate.attempt_timeout_ms),
            poll_interval: Duration::from_millis(self.gate.poll_interval_ms),
            deadline: self.gate.deadline_ms.map(Duration::from_millis),
        }
    }

    /// Returns the secret minting settings.
    #[must_use]
    pub fn mint_settings(&self) -> MintSettings {
        MintSettings {
            role_name: RoleName::new(self.secrets.role_name.as_str()),
            path_prefix: self.secrets.path_prefix.clone(),
            overwrite: self.secrets.overwrite,
        }
    }
}
