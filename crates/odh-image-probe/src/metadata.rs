// crates/odh-image-probe/src/metadata.rs
// ============================================================================
// Module: Container Metadata
// Description: Decoding of the engine's container configuration object.
// Purpose: Answer env, label, and config lookups without running a shell.
// Dependencies: serde_json
// ============================================================================

//! ## Overview
//! [`ContainerConfig`] decodes the `.Config` object returned by
//! `container inspect`. Env and labels are indexed up front; the raw object is
//! kept so [`ContainerConfig::get`] can answer any engine key (`WorkingDir`,
//! `User`, `Entrypoint`, ...).
//! Invariants:
//! - The value is read-only once decoded.
//! - Duplicate env keys resolve to the last entry, matching engine semantics.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use serde_json::Map;
use serde_json::Value;

use crate::error::ProbeError;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Decoded container configuration metadata.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ContainerConfig {
    /// Raw `.Config` object.
    raw: Map<String, Value>,
    /// Declared environment, keyed by variable name.
    env: BTreeMap<String, String>,
    /// Image and container labels.
    labels: BTreeMap<String, String>,
}

impl ContainerConfig {
    /// Decodes inspect output bytes (`{{json .Config}}`).
    ///
    /// # Errors
    ///
    /// Returns [`ProbeError::Decode`] when the bytes are not a JSON object or
    /// the `Env`/`Labels` members have unexpected shapes.
    pub fn from_json(bytes: &[u8]) -> Result<Self, ProbeError> {
        let value: Value =
            serde_json::from_slice(bytes).map_err(|err| ProbeError::Decode(err.to_string()))?;
        Self::from_value(value)
    }

    /// Decodes an already parsed `.Config` value.
    ///
    /// # Errors
    ///
    /// Returns [`ProbeError::Decode`] on shape mismatches.
    pub fn from_value(value: Value) -> Result<Self, ProbeError> {
        let Value::Object(raw) = value else {
            return Err(ProbeError::Decode("config must be a JSON object".to_string()));
        };
        let env = decode_env(raw.get("Env"))?;
        let labels = decode_labels(raw.get("Labels"))?;
        Ok(Self {
            raw,
            env,
            labels,
        })
    }

    /// Returns the declared value of an environment variable.
    #[must_use]
    pub fn env(&self, name: &str) -> Option<&str> {
        self.env.get(name).map(String::as_str)
    }

    /// Returns the full declared environment.
    #[must_use]
    pub const fn env_map(&self) -> &BTreeMap<String, String> {
        &self.env
    }

    /// Returns all labels.
    #[must_use]
    pub const fn labels(&self) -> &BTreeMap<String, String> {
        &self.labels
    }

    /// Looks up a raw config key.
    ///
    /// Strings are returned verbatim, `null` and missing keys yield `None`, and
    /// any other JSON value is rendered compactly.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<String> {
        match self.raw.get(key)? {
            Value::Null => None,
            Value::String(text) => Some(text.clone()),
            other => Some(other.to_string()),
        }
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Indexes `KEY=VALUE` entries; entries without `=` declare nothing.
fn decode_env(value: Option<&Value>) -> Result<BTreeMap<String, String>, ProbeError> {
    let mut env = BTreeMap::new();
    let entries = match value {
        None | Some(Value::Null) => return Ok(env),
        Some(Value::Array(entries)) => entries,
        Some(_) => return Err(ProbeError::Decode("Env must be an array".to_string())),
    };
    for entry in entries {
        let Value::String(entry) = entry else {
            return Err(ProbeError::Decode("Env entries must be strings".to_string()));
        };
        if let Some((key, val)) = entry.split_once('=') {
            env.insert(key.to_string(), val.to_string());
        }
    }
    Ok(env)
}

/// Decodes the label map; `null` means no labels.
fn decode_labels(value: Option<&Value>) -> Result<BTreeMap<String, String>, ProbeError> {
    let mut labels = BTreeMap::new();
    let entries = match value {
        None | Some(Value::Null) => return Ok(labels),
        Some(Value::Object(entries)) => entries,
        Some(_) => return Err(ProbeError::Decode("Labels must be an object".to_string())),
    };
    for (key, val) in entries {
        let Value::String(val) = val else {
            return Err(ProbeError::Decode(format!("label {key} must be a string")));
        };
        labels.insert(key.clone(), val.clone());
    }
    Ok(labels)
}

// ============================================================================
// SECTION: Tests
// ============================================================================
