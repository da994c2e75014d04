// crates/provision-gate-config/src/load.rs
// ============================================================================
// Module: Configuration Loading
// Description: Strict, fail-closed loading of TOML configuration files.
// Purpose: Guard path, size, and encoding before parsing untrusted input.
// Dependencies: serde, thiserror, toml
// ============================================================================

//! ## Overview
//! Configuration files are untrusted input. Loading enforces path length
//! limits, a hard size limit, and UTF-8 encoding before the TOML parser ever
//! sees the bytes, then validates the parsed model. Every guard failure
//! names the violated limit.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::path::Path;

use thiserror::Error;

use crate::model::ProvisionGateConfig;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Maximum configuration file size in bytes.
pub const MAX_CONFIG_BYTES: usize = 1_048_576;
/// Maximum total path length.
const MAX_PATH_LENGTH: usize = 4096;
/// Maximum length of a single path component.
const MAX_PATH_COMPONENT_LENGTH: usize = 255;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration errors.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Filesystem error while reading the configuration.
    #[error("config io error: {0}")]
    Io(String),
    /// The TOML failed to parse.
    #[error("config parse error: {0}")]
    Parse(String),
    /// The configuration violated a structural invariant.
    #[error("config invalid: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Loading
// ============================================================================

impl ProvisionGateConfig {
    /// Loads and validates a configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a load guard trips, the TOML fails to
    /// parse, or validation rejects the model.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        validate_config_path(path)?;
        let bytes = std::fs::read(path).map_err(|err| ConfigError::Io(err.to_string()))?;
        if bytes.len() > MAX_CONFIG_BYTES {
            return Err(ConfigError::Invalid(format!(
                "config file exceeds size limit: {} bytes (max {MAX_CONFIG_BYTES})",
                bytes.len()
            )));
        }
        let text = String::from_utf8(bytes)
            .map_err(|_| ConfigError::Invalid("config file must be utf-8".to_string()))?;
        Self::from_toml_str(&text)
    }

    /// Parses and validates a configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] on malformed TOML or
    /// [`ConfigError::Invalid`] when validation rejects the model.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self =
            toml::from_str(text).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }
}

/// Validates configuration paths for safety limits.
fn validate_config_path(path: &Path) -> Result<(), ConfigError> {
    let path_string = path.display().to_string();
    if path_string.len() > MAX_PATH_LENGTH {
        return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
    }
    for component in path.components() {
        let name = component.as_os_str().to_string_lossy();
        if name.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid("config path component too long".to_string()));
        }
    }
    Ok(())
}
