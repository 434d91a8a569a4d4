// crates/odh-image-probe/src/command.rs
// ============================================================================
// Module: Command Output
// Description: Captured result of a command executed inside a container.
// Purpose: Provide an immutable exit/stdout/stderr record for assertions.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! [`CommandOutput`] is the request-scoped record produced by every
//! [`crate::ContainerProbe::run`] call. A non-zero exit code is a normal
//! outcome here; only engine failures and timeouts are errors.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Serialize;

use crate::redact::redact_url_credentials;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Captured output of a single in-container command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommandOutput {
    /// Process exit code as reported by the engine.
    pub exit_code: i64,
    /// Captured standard output (lossy UTF-8).
    pub stdout: String,
    /// Captured standard error (lossy UTF-8).
    pub stderr: String,
}

impl CommandOutput {
    /// Builds an output record from raw engine bytes.
    #[must_use]
    pub fn from_bytes(exit_code: i64, stdout: &[u8], stderr: &[u8]) -> Self {
        Self {
            exit_code,
            stdout: String::from_utf8_lossy(stdout).into_owned(),
            stderr: String::from_utf8_lossy(stderr).into_owned(),
        }
    }

    /// Returns true when the command exited with status zero.
    #[must_use]
    pub const fn success(&self) -> bool {
        self.exit_code == 0
    }

    /// Returns stdout with surrounding whitespace removed.
    #[must_use]
    pub fn stdout_trimmed(&self) -> &str {
        self.stdout.trim()
    }

    /// Returns stderr with URL credentials redacted, for failure messages.
    #[must_use]
    pub fn stderr_redacted(&self) -> String {
        redact_url_credentials(&self.stderr)
    }

    /// Returns stdout with URL credentials redacted, for failure messages.
    #[must_use]
    pub fn stdout_redacted(&self) -> String {
        redact_url_credentials(&self.stdout)
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
