// crates/odh-image-probe/src/lib.rs
// ============================================================================
// Module: ODH Image Probe Library
// Description: Container probe facade for ODH base image contract tests.
// Purpose: Run read-only probes against running image instances.
// Dependencies: async-trait, regex, serde, testcontainers, thiserror, tokio
// ============================================================================

//! ## Overview
//! `odh-image-probe` exposes the [`ContainerProbe`] facade used by the image
//! contract suites. [`EngineContainer`] implements it on top of a container
//! engine CLI ([`ContainerEngine`]) for either a freshly launched instance
//! ([`launch_container`]) or an already running one ([`attach_container`]).
//! Invariants:
//! - Probes never mutate container state.
//! - Non-zero exits are data, timeouts are errors.
//! - Error and audit text passes through [`redact_url_credentials`].
//!
//! Security posture: engine output may embed package-index credentials and is
//! redacted before it reaches error messages or logs.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod audit;
pub mod command;
pub mod container;
pub mod engine;
pub mod error;
pub mod launch;
pub mod metadata;
pub mod probe;
pub mod redact;
pub mod variant;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use audit::FileAuditSink;
pub use audit::NoopAuditSink;
pub use audit::ProbeAuditEvent;
pub use audit::ProbeAuditSink;
pub use audit::ProbeOutcome;
pub use audit::StderrAuditSink;
pub use command::CommandOutput;
pub use container::EngineContainer;
pub use engine::ContainerEngine;
pub use engine::DEFAULT_ENGINE;
pub use error::ProbeError;
pub use launch::LaunchRequest;
pub use launch::attach_container;
pub use launch::launch_container;
pub use launch::split_image_ref;
pub use metadata::ContainerConfig;
pub use probe::ContainerProbe;
pub use probe::DEFAULT_COMMAND_TIMEOUT;
pub use probe::shell_quote;
pub use redact::REDACTED;
pub use redact::redact_url_credentials;
pub use variant::ImageVariant;
