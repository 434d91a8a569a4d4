// crates/odh-image-probe/src/probe.rs
// ============================================================================
// Module: Container Probe Facade
// Description: Uniform probe interface over the image variants under test.
// Purpose: Let the contract suites stay agnostic of how a container is run.
// Dependencies: async-trait
// ============================================================================

//! ## Overview
//! [`ContainerProbe`] is the seam between the assertion suites and the
//! engine. Implementors provide command execution and metadata inspection;
//! filesystem predicates and env/label/config lookups are derived from those
//! two primitives.
//! Invariants:
//! - Every operation is read-only with respect to container state.
//! - `run` is safe to call concurrently on the same probe.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;

use crate::command::CommandOutput;
use crate::error::ProbeError;
use crate::metadata::ContainerConfig;
use crate::variant::ImageVariant;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Timeout applied by [`ContainerProbe::run_default`].
pub const DEFAULT_COMMAND_TIMEOUT: Duration = Duration::from_secs(30);

// ============================================================================
// SECTION: Trait
// ============================================================================

/// Read-only probe interface over a running container instance.
#[async_trait]
pub trait ContainerProbe: Send + Sync {
    /// Variant the container was started from.
    fn variant(&self) -> ImageVariant;

    /// Executes `command` with `/bin/sh -c` inside the container.
    ///
    /// # Errors
    ///
    /// Returns [`ProbeError::Timeout`] when `timeout` elapses and other
    /// [`ProbeError`] variants when the engine fails. A non-zero exit is not
    /// an error.
    async fn run(&self, command: &str, timeout: Duration) -> Result<CommandOutput, ProbeError>;

    /// Returns the container's configuration metadata.
    ///
    /// # Errors
    ///
    /// Returns [`ProbeError`] when inspection or decoding fails.
    async fn inspect(&self) -> Result<&ContainerConfig, ProbeError>;

    /// Executes `command` with [`DEFAULT_COMMAND_TIMEOUT`].
    ///
    /// # Errors
    ///
    /// See [`ContainerProbe::run`].
    async fn run_default(&self, command: &str) -> Result<CommandOutput, ProbeError> {
        self.run(command, DEFAULT_COMMAND_TIMEOUT).await
    }

    /// Returns true when `path` exists inside the container.
    ///
    /// # Errors
    ///
    /// Returns [`ProbeError::Exec`] when the check itself could not run.
    async fn file_exists(&self, path: &str) -> Result<bool, ProbeError> {
        let command = format!("test -e {}", shell_quote(path));
        predicate(&command, self.run_default(&command).await?)
    }

    /// Returns true when `path` is a regular, executable file.
    ///
    /// # Errors
    ///
    /// Returns [`ProbeError::Exec`] when the check itself could not run.
    async fn file_executable(&self, path: &str) -> Result<bool, ProbeError> {
        let quoted = shell_quote(path);
        let command = format!("test -f {quoted} && test -x {quoted}");
        predicate(&command, self.run_default(&command).await?)
    }

    /// Returns the declared value of environment variable `name`.
    ///
    /// # Errors
    ///
    /// See [`ContainerProbe::inspect`].
    async fn get_env(&self, name: &str) -> Result<Option<String>, ProbeError> {
        Ok(self.inspect().await?.env(name).map(str::to_string))
    }

    /// Returns the configuration value stored under engine key `key`.
    ///
    /// # Errors
    ///
    /// See [`ContainerProbe::inspect`].
    async fn get_config(&self, key: &str) -> Result<Option<String>, ProbeError> {
        Ok(self.inspect().await?.get(key))
    }

    /// Returns every label on the container.
    ///
    /// # Errors
    ///
    /// See [`ContainerProbe::inspect`].
    async fn get_labels(&self) -> Result<BTreeMap<String, String>, ProbeError> {
        Ok(self.inspect().await?.labels().clone())
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Quotes `value` for safe interpolation into a POSIX shell command.
#[must_use]
pub fn shell_quote(value: &str) -> String {
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('\'');
    for ch in value.chars() {
        if ch == '\'' {
            quoted.push_str("'\\''");
        } else {
            quoted.push(ch);
        }
    }
    quoted.push('\'');
    quoted
}

/// Maps a `test(1)` result to a boolean; other exit codes are engine failures.
fn predicate(command: &str, output: CommandOutput) -> Result<bool, ProbeError> {
    match output.exit_code {
        0 => Ok(true),
        1 => Ok(false),
        code => Err(ProbeError::exec(command, code, &output.stderr)),
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
