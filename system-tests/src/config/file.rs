// system-tests/src/config/file.rs
// ============================================================================
// Module: Image Test Config File
// Description: Optional TOML file layered under environment configuration.
// Purpose: Let CI pin image targets and tuning in one reviewed file.
// Dependencies: serde, thiserror, toml
// ============================================================================

//! ## Overview
//! The config file is optional and every key in it is optional. Unknown keys
//! are rejected so typos fail closed instead of silently falling back to
//! defaults.
//!
//! Invariants:
//! - Files larger than [`MAX_CONFIG_FILE_SIZE`] are rejected before parsing.
//! - File content must be UTF-8.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs;
use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;
use thiserror::Error;

// ============================================================================
// SECTION: Limits
// ============================================================================

/// Maximum size of a config file in bytes.
pub const MAX_CONFIG_FILE_SIZE: usize = 1024 * 1024;

// ============================================================================
// SECTION: File Shape
// ============================================================================

/// Top-level TOML document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    /// Engine CLI binary.
    pub engine: Option<String>,
    /// Timeout floor in seconds.
    pub timeout_sec: Option<u64>,
    /// Idle lifetime of launched containers in seconds.
    pub session_ttl_sec: Option<u64>,
    /// Artifact run root.
    pub run_root: Option<PathBuf>,
    /// Audit log destination.
    pub audit_log: Option<String>,
    /// Fail instead of skip for unconfigured variants.
    pub require_all_variants: Option<bool>,
    /// Expected `python --version` series.
    pub python_series: Option<String>,
    /// Expected `com.opendatahub.python` label value.
    pub expected_python_version: Option<String>,
    /// Python variant target.
    pub python: Option<VariantFileConfig>,
    /// CUDA variant target.
    pub cuda: Option<VariantFileConfig>,
}

/// Per-variant `[python]` / `[cuda]` table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VariantFileConfig {
    /// Image reference to launch.
    pub image: Option<String>,
    /// Running container to reuse.
    pub container: Option<String>,
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Config file loading errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O failure while reading configuration.
    #[error("config io error: {0}")]
    Io(String),
    /// TOML parsing error.
    #[error("config parse error: {0}")]
    Parse(String),
    /// Invalid configuration data.
    #[error("invalid config: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Loading
// ============================================================================

impl ConfigFile {
    /// Reads and parses a config file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the file cannot be read, is oversized or
    /// not UTF-8, or does not match the expected shape.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let bytes = fs::read(path)
            .map_err(|err| ConfigError::Io(format!("{}: {err}", path.display())))?;
        Self::parse(&bytes)
    }

    /// Parses config file bytes.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the content is oversized, not UTF-8, or
    /// does not match the expected shape.
    pub fn parse(bytes: &[u8]) -> Result<Self, ConfigError> {
        if bytes.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::Invalid("config file exceeds size limit".to_string()));
        }
        let content = std::str::from_utf8(bytes)
            .map_err(|_| ConfigError::Invalid("config file must be utf-8".to_string()))?;
        toml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
