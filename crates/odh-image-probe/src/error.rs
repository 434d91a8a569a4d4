// crates/odh-image-probe/src/error.rs
// ============================================================================
// Module: Probe Errors
// Description: Error type for container probe operations.
// Purpose: Distinguish engine, timeout, and metadata failures.
// Dependencies: thiserror
// ============================================================================

//! ## Overview
//! [`ProbeError`] covers every way a probe can fail before producing a
//! result. Messages built from engine output are redacted at construction so
//! a formatted error never carries package-index credentials.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::time::Duration;

use thiserror::Error;

use crate::redact::redact_url_credentials;
use crate::variant::ImageVariant;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors emitted by the container probe facade.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProbeError {
    /// The container engine CLI is missing or not responding.
    #[error("container engine unavailable: {0}")]
    EngineUnavailable(String),
    /// The engine CLI process could not be spawned or awaited.
    #[error("failed to spawn engine process: {0}")]
    Spawn(String),
    /// The engine could not run a command inside the container.
    #[error("exec failed (exit {exit_code}) for `{command}`: {detail}")]
    Exec {
        /// Redacted command text.
        command: String,
        /// Exit code reported by the engine.
        exit_code: i64,
        /// Redacted engine diagnostics.
        detail: String,
    },
    /// The command did not finish before its timeout.
    #[error("command timed out after {}s: `{command}`", timeout.as_secs_f64())]
    Timeout {
        /// Redacted command text.
        command: String,
        /// Timeout that elapsed.
        timeout: Duration,
    },
    /// Metadata inspection failed.
    #[error("inspect failed for {target}: {detail}")]
    Inspect {
        /// Container or image that was inspected.
        target: String,
        /// Redacted engine diagnostics.
        detail: String,
    },
    /// Inspect output could not be decoded.
    #[error("failed to decode inspect output: {0}")]
    Decode(String),
    /// The container to attach to is not running.
    #[error("container {0} is not running")]
    ContainerNotRunning(String),
    /// The image reference cannot be launched.
    #[error("invalid image reference `{reference}`: {reason}")]
    InvalidImageRef {
        /// Reference as supplied.
        reference: String,
        /// Why it was rejected.
        reason: String,
    },
    /// Launching a fresh container failed.
    #[error("failed to launch {variant} image `{image}`: {detail}")]
    Launch {
        /// Variant being launched.
        variant: ImageVariant,
        /// Image reference.
        image: String,
        /// Redacted failure detail.
        detail: String,
    },
}

impl ProbeError {
    /// Builds an [`ProbeError::Exec`] with redacted command and diagnostics.
    #[must_use]
    pub fn exec(command: &str, exit_code: i64, detail: &str) -> Self {
        Self::Exec {
            command: redact_url_credentials(command),
            exit_code,
            detail: redact_url_credentials(detail.trim()),
        }
    }

    /// Builds a [`ProbeError::Timeout`] with redacted command text.
    #[must_use]
    pub fn timeout(command: &str, timeout: Duration) -> Self {
        Self::Timeout {
            command: redact_url_credentials(command),
            timeout,
        }
    }

    /// Builds a [`ProbeError::Inspect`] with redacted diagnostics.
    #[must_use]
    pub fn inspect(target: &str, detail: &str) -> Self {
        Self::Inspect {
            target: target.to_string(),
            detail: redact_url_credentials(detail.trim()),
        }
    }

    /// Builds a [`ProbeError::Launch`] with redacted diagnostics.
    #[must_use]
    pub fn launch(variant: ImageVariant, image: &str, detail: &str) -> Self {
        Self::Launch {
            variant,
            image: image.to_string(),
            detail: redact_url_credentials(detail),
        }
    }

    /// Returns true when the error is a timeout rather than an engine failure.
    #[must_use]
    pub const fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
