// crates/odh-image-probe/src/variant.rs
// ============================================================================
// Module: Image Variants
// Description: The base image variants covered by the contract suites.
// Purpose: Give every fixture, log line, and artifact a stable variant label.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! [`ImageVariant`] names the two base images: the CPU Python image and the
//! CUDA image. The same label keys session cells, audit events, environment
//! variables, and artifact directories.
//! Invariants:
//! - Serialized and displayed labels are identical (`python`, `cuda`).
//! - Only the Python variant pins an accelerator label value.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Variant
// ============================================================================

/// Base image variant under test.
///
/// # Invariants
/// - Labels returned by [`ImageVariant::as_str`] are stable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageVariant {
    /// CPU-only Python base image.
    Python,
    /// CUDA-enabled base image.
    Cuda,
}

impl ImageVariant {
    /// Every variant, in suite order.
    pub const ALL: [Self; 2] = [Self::Python, Self::Cuda];

    /// Returns the stable lowercase label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Python => "python",
            Self::Cuda => "cuda",
        }
    }

    /// Returns the value `com.opendatahub.accelerator` must carry, if pinned.
    #[must_use]
    pub const fn expected_accelerator(self) -> Option<&'static str> {
        match self {
            Self::Python => Some("cpu"),
            Self::Cuda => None,
        }
    }
}

impl fmt::Display for ImageVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
