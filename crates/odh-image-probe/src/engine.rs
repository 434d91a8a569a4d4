// crates/odh-image-probe/src/engine.rs
// ============================================================================
// Module: Container Engine Adapter
// Description: Thin async wrapper over the container engine CLI.
// Purpose: Execute and inspect inside running containers with hard timeouts.
// Dependencies: tokio
// ============================================================================

//! ## Overview
//! [`ContainerEngine`] shells out to `docker` (or a compatible CLI such as
//! `podman`) for exec and inspect calls. Each call is an independent child
//! process, so concurrent probes against one container never contend for
//! in-process state.
//! Invariants:
//! - Children are killed when their timeout elapses or the future is dropped.
//! - stdin is closed; commands that need input pipe it inside the shell.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::ffi::OsStr;
use std::path::PathBuf;
use std::process::Output;
use std::process::Stdio;
use std::time::Duration;

use tokio::process::Command;

use crate::command::CommandOutput;
use crate::error::ProbeError;
use crate::metadata::ContainerConfig;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Engine binary used when none is configured.
pub const DEFAULT_ENGINE: &str = "docker";

/// Timeout for engine bookkeeping calls (`info`, `inspect`).
pub const ENGINE_CALL_TIMEOUT: Duration = Duration::from_secs(30);

/// Shell used to interpret probe commands inside the container.
const CONTAINER_SHELL: &str = "/bin/sh";

/// Host shell script that waits for `$1` to exit, then runs `$2 rm -f $3`.
#[cfg(unix)]
const REAPER_SCRIPT: &str = "trap '' INT HUP; \
    while kill -0 \"$1\" 2>/dev/null; do sleep 2; done; \
    exec \"$2\" rm -f \"$3\" >/dev/null 2>&1";

// ============================================================================
// SECTION: Engine
// ============================================================================

/// Container engine CLI handle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerEngine {
    /// Engine binary (name on `PATH` or absolute path).
    binary: PathBuf,
}

impl Default for ContainerEngine {
    fn default() -> Self {
        Self::new(DEFAULT_ENGINE)
    }
}

impl ContainerEngine {
    /// Creates an engine handle for the given CLI binary.
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    /// Verifies the engine responds to `info`.
    ///
    /// # Errors
    ///
    /// Returns [`ProbeError::EngineUnavailable`] when the CLI is missing,
    /// hangs, or reports an error.
    pub async fn ensure_available(&self) -> Result<(), ProbeError> {
        let output = self
            .output(["info"], ENGINE_CALL_TIMEOUT)
            .await
            .map_err(|err| ProbeError::EngineUnavailable(err.to_string()))?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ProbeError::EngineUnavailable(format!(
                "{} info failed: {}",
                self.binary.display(),
                stderr.trim()
            )));
        }
        Ok(())
    }

    /// Runs `command` through `/bin/sh -c` inside the container.
    ///
    /// A non-zero exit is returned as data. Exit codes produced by the engine
    /// itself (125-127) are passed through unchanged for callers to interpret.
    ///
    /// # Errors
    ///
    /// Returns [`ProbeError::Timeout`] when the command outlives `timeout`, or
    /// [`ProbeError::Spawn`] when the engine CLI cannot be started.
    pub async fn exec(
        &self,
        container_id: &str,
        command: &str,
        timeout: Duration,
    ) -> Result<CommandOutput, ProbeError> {
        let args: [&OsStr; 5] = [
            OsStr::new("exec"),
            OsStr::new(container_id),
            OsStr::new(CONTAINER_SHELL),
            OsStr::new("-c"),
            OsStr::new(command),
        ];
        let output = self.output(args, timeout).await.map_err(|err| match err {
            EngineCallError::Timeout => ProbeError::timeout(command, timeout),
            EngineCallError::Spawn(detail) => ProbeError::Spawn(detail),
        })?;
        Ok(CommandOutput::from_bytes(exit_code(&output), &output.stdout, &output.stderr))
    }

    /// Fetches and decodes the container's `.Config` object.
    ///
    /// # Errors
    ///
    /// Returns [`ProbeError::Inspect`] when the engine rejects the call and
    /// [`ProbeError::Decode`] when the output is not a config object.
    pub async fn inspect_config(&self, container_id: &str) -> Result<ContainerConfig, ProbeError> {
        let output = self.inspect(container_id, "{{json .Config}}").await?;
        ContainerConfig::from_json(&output)
    }

    /// Reports whether the container exists and is running.
    ///
    /// # Errors
    ///
    /// Returns [`ProbeError::Spawn`] when the engine cannot be invoked.
    pub async fn is_running(&self, container_id: &str) -> Result<bool, ProbeError> {
        match self.inspect(container_id, "{{.State.Running}}").await {
            Ok(bytes) => Ok(String::from_utf8_lossy(&bytes).trim() == "true"),
            Err(ProbeError::Inspect { .. }) => Ok(false),
            Err(err) => Err(err),
        }
    }

    /// Schedules `rm -f <container_id>` for when process `owner_pid` exits.
    ///
    /// The reaper is a detached host shell in its own process group, so it
    /// survives the owner being interrupted and removes the container even
    /// when the owner never drops its handle.
    ///
    /// # Errors
    ///
    /// Returns [`ProbeError::Spawn`] when the host shell cannot be started.
    #[cfg(unix)]
    pub fn spawn_reaper(&self, container_id: &str, owner_pid: u32) -> Result<(), ProbeError> {
        Command::new("/bin/sh")
            .arg("-c")
            .arg(REAPER_SCRIPT)
            .arg("odh-reaper")
            .arg(owner_pid.to_string())
            .arg(&self.binary)
            .arg(container_id)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .process_group(0)
            .spawn()
            .map(drop)
            .map_err(|err| ProbeError::Spawn(format!("container reaper: {err}")))
    }

    /// Removal on owner exit is only supported on Unix hosts.
    ///
    /// # Errors
    ///
    /// Never fails.
    #[cfg(not(unix))]
    pub const fn spawn_reaper(&self, _container_id: &str, _owner_pid: u32) -> Result<(), ProbeError> {
        Ok(())
    }

    /// Runs `container inspect --format <format>` and returns stdout.
    async fn inspect(&self, container_id: &str, format: &str) -> Result<Vec<u8>, ProbeError> {
        let args = ["container", "inspect", "--format", format, container_id];
        let output = self.output(args, ENGINE_CALL_TIMEOUT).await.map_err(|err| match err {
            EngineCallError::Timeout => ProbeError::inspect(
                container_id,
                &format!("timed out after {}s", ENGINE_CALL_TIMEOUT.as_secs()),
            ),
            EngineCallError::Spawn(detail) => ProbeError::Spawn(detail),
        })?;
        if !output.status.success() {
            return Err(ProbeError::inspect(container_id, &String::from_utf8_lossy(&output.stderr)));
        }
        Ok(output.stdout)
    }

    /// Spawns the engine CLI with `args` and collects its output.
    async fn output<I, S>(&self, args: I, timeout: Duration) -> Result<Output, EngineCallError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let child = Command::new(&self.binary)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|err| {
                EngineCallError::Spawn(format!("{}: {err}", self.binary.display()))
            })?;
        match tokio::time::timeout(timeout, child.wait_with_output()).await {
            Ok(result) => result.map_err(|err| EngineCallError::Spawn(err.to_string())),
            Err(_) => Err(EngineCallError::Timeout),
        }
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Failure modes of a single engine CLI invocation.
#[derive(Debug)]
enum EngineCallError {
    /// The call outlived its timeout; the child was killed.
    Timeout,
    /// The CLI could not be spawned or awaited.
    Spawn(String),
}

impl std::fmt::Display for EngineCallError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Timeout => f.write_str("engine call timed out"),
            Self::Spawn(detail) => f.write_str(detail),
        }
    }
}

/// Maps a process status to an exit code; signal deaths map to `128 + signo`.
fn exit_code(output: &Output) -> i64 {
    if let Some(code) = output.status.code() {
        return i64::from(code);
    }
    signal_exit_code(&output.status)
}

/// Shell-style exit code for a signal-terminated process.
#[cfg(unix)]
fn signal_exit_code(status: &std::process::ExitStatus) -> i64 {
    use std::os::unix::process::ExitStatusExt;
    status.signal().map_or(-1, |signo| 128 + i64::from(signo))
}

/// Signal deaths do not exist off Unix.
#[cfg(not(unix))]
const fn signal_exit_code(_status: &std::process::ExitStatus) -> i64 {
    -1
}

// ============================================================================
// SECTION: Tests
// ============================================================================
