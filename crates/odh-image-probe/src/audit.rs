// crates/odh-image-probe/src/audit.rs
// ============================================================================
// Module: Probe Audit Logging
// Description: Structured JSON-line events for container probes.
// Purpose: Record every exec, inspect, and launch without hard log deps.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! Each probe emits one [`ProbeAuditEvent`] to a [`ProbeAuditSink`]. Sinks are
//! plain JSON-lines writers so a CI job can archive them next to the test
//! artifacts.
//! Invariants:
//! - `command` and `detail` are redacted before serialization.
//! - Sink failures never fail a probe.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs::OpenOptions;
use std::io;
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;
use std::time::Duration;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use serde::Serialize;

use crate::redact::redact_url_credentials;
use crate::variant::ImageVariant;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Probe outcome classification.
///
/// # Invariants
/// - Variants are stable for log labeling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProbeOutcome {
    /// Probe completed (any exit code).
    Ok,
    /// Probe exceeded its timeout.
    Timeout,
    /// Engine or decode failure.
    Error,
}

/// Probe audit event payload.
#[derive(Debug, Clone, Serialize)]
pub struct ProbeAuditEvent {
    /// Event identifier (`probe_exec`, `probe_inspect`, `container_launch`, ...).
    pub event: &'static str,
    /// Event timestamp (milliseconds since epoch).
    pub timestamp_ms: u128,
    /// Variant the container belongs to.
    pub variant: ImageVariant,
    /// Engine container identifier.
    pub container_id: String,
    /// Redacted command text, when the event ran one.
    pub command: Option<String>,
    /// Exit code when the command completed.
    pub exit_code: Option<i64>,
    /// Outcome classification.
    pub outcome: ProbeOutcome,
    /// Wall-clock duration in milliseconds.
    pub duration_ms: u128,
    /// Redacted error detail when the probe failed.
    pub detail: Option<String>,
}

impl ProbeAuditEvent {
    /// Creates an event stamped with the current time.
    #[must_use]
    pub fn new(
        event: &'static str,
        variant: ImageVariant,
        container_id: &str,
        outcome: ProbeOutcome,
        elapsed: Duration,
    ) -> Self {
        Self {
            event,
            timestamp_ms: now_millis(),
            variant,
            container_id: container_id.to_string(),
            command: None,
            exit_code: None,
            outcome,
            duration_ms: elapsed.as_millis(),
            detail: None,
        }
    }

    /// Attaches the command text (redacted).
    #[must_use]
    pub fn with_command(mut self, command: &str) -> Self {
        self.command = Some(redact_url_credentials(command));
        self
    }

    /// Attaches the exit code.
    #[must_use]
    pub const fn with_exit_code(mut self, exit_code: i64) -> Self {
        self.exit_code = Some(exit_code);
        self
    }

    /// Attaches failure detail (redacted).
    #[must_use]
    pub fn with_detail(mut self, detail: &str) -> Self {
        self.detail = Some(redact_url_credentials(detail));
        self
    }
}

/// Returns milliseconds since the Unix epoch.
fn now_millis() -> u128 {
    SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_millis()
}

// ============================================================================
// SECTION: Trait
// ============================================================================

/// Audit sink for probe events.
pub trait ProbeAuditSink: Send + Sync {
    /// Record an audit event.
    fn record(&self, event: &ProbeAuditEvent);
}

/// Audit sink that logs JSON lines to stderr.
pub struct StderrAuditSink;

impl ProbeAuditSink for StderrAuditSink {
    fn record(&self, event: &ProbeAuditEvent) {
        if let Ok(payload) = serde_json::to_string(event) {
            let _ = writeln!(std::io::stderr(), "{payload}");
        }
    }
}

/// Audit sink that logs JSON lines to a file.
pub struct FileAuditSink {
    /// File handle used for append-only logging.
    file: Mutex<std::fs::File>,
}

impl FileAuditSink {
    /// Opens the audit log file in append mode.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened.
    pub fn new(path: &Path) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            file: Mutex::new(file),
        })
    }
}

impl ProbeAuditSink for FileAuditSink {
    fn record(&self, event: &ProbeAuditEvent) {
        if let Ok(payload) = serde_json::to_string(event)
            && let Ok(mut file) = self.file.lock()
        {
            let _ = writeln!(file, "{payload}");
            let _ = file.flush();
        }
    }
}

/// No-op audit sink.
pub struct NoopAuditSink;

impl ProbeAuditSink for NoopAuditSink {
    fn record(&self, _event: &ProbeAuditEvent) {}
}

// ============================================================================
// SECTION: Tests
// ============================================================================
