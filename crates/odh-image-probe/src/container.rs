// crates/odh-image-probe/src/container.rs
// ============================================================================
// Module: Engine Container
// Description: ContainerProbe implementation backed by the engine CLI.
// Purpose: Bind a running container to the probe facade with caching and audit.
// Dependencies: async-trait, testcontainers, tokio
// ============================================================================

//! ## Overview
//! [`EngineContainer`] is the concrete probe used by the suites. It owns the
//! launched container handle (when it started one), caches the inspected
//! configuration after the first successful fetch, and emits an audit event
//! for every exec and inspect.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;
use std::time::Duration;
use std::time::Instant;

use async_trait::async_trait;
use testcontainers::ContainerAsync;
use testcontainers::GenericImage;
use tokio::sync::OnceCell;

use crate::audit::NoopAuditSink;
use crate::audit::ProbeAuditEvent;
use crate::audit::ProbeAuditSink;
use crate::audit::ProbeOutcome;
use crate::command::CommandOutput;
use crate::engine::ContainerEngine;
use crate::error::ProbeError;
use crate::metadata::ContainerConfig;
use crate::probe::ContainerProbe;
use crate::variant::ImageVariant;

// ============================================================================
// SECTION: Engine Container
// ============================================================================

/// Probe over a running container reached through the engine CLI.
pub struct EngineContainer {
    /// Engine used for exec and inspect.
    engine: ContainerEngine,
    /// Engine container identifier.
    container_id: String,
    /// Variant the container was started from.
    variant: ImageVariant,
    /// Inspected configuration, fetched once.
    config: OnceCell<ContainerConfig>,
    /// Audit sink for probe events.
    audit: Arc<dyn ProbeAuditSink>,
    /// Minimum timeout applied to every command.
    timeout_floor: Option<Duration>,
    /// Launched container handle; `None` when attached to an existing one.
    owned: Option<ContainerAsync<GenericImage>>,
}

impl EngineContainer {
    /// Wraps an already running container.
    pub fn new(engine: ContainerEngine, container_id: impl Into<String>, variant: ImageVariant) -> Self {
        Self {
            engine,
            container_id: container_id.into(),
            variant,
            config: OnceCell::new(),
            audit: Arc::new(NoopAuditSink),
            timeout_floor: None,
            owned: None,
        }
    }

    /// Routes probe events to `audit`.
    #[must_use]
    pub fn with_audit(mut self, audit: Arc<dyn ProbeAuditSink>) -> Self {
        self.audit = audit;
        self
    }

    /// Lengthens every command timeout to at least `floor`.
    #[must_use]
    pub const fn with_timeout_floor(mut self, floor: Option<Duration>) -> Self {
        self.timeout_floor = floor;
        self
    }

    /// Takes ownership of a launched container so it lives as long as `self`.
    #[must_use]
    pub(crate) fn owning(mut self, container: ContainerAsync<GenericImage>) -> Self {
        self.owned = Some(container);
        self
    }

    /// Returns the engine container identifier.
    #[must_use]
    pub fn container_id(&self) -> &str {
        &self.container_id
    }

    /// Returns true when this probe launched (and owns) its container.
    #[must_use]
    pub const fn owns_container(&self) -> bool {
        self.owned.is_some()
    }

    /// Applies the configured floor to a requested timeout.
    fn effective_timeout(&self, requested: Duration) -> Duration {
        self.timeout_floor.map_or(requested, |floor| requested.max(floor))
    }

    /// Records an audit event for this container.
    fn record(&self, event: ProbeAuditEvent) {
        self.audit.record(&event);
    }
}

#[async_trait]
impl ContainerProbe for EngineContainer {
    fn variant(&self) -> ImageVariant {
        self.variant
    }

    async fn run(&self, command: &str, timeout: Duration) -> Result<CommandOutput, ProbeError> {
        let timeout = self.effective_timeout(timeout);
        let started = Instant::now();
        let result = self.engine.exec(&self.container_id, command, timeout).await;
        let event = match &result {
            Ok(output) => ProbeAuditEvent::new(
                "probe_exec",
                self.variant,
                &self.container_id,
                ProbeOutcome::Ok,
                started.elapsed(),
            )
            .with_exit_code(output.exit_code),
            Err(err) => ProbeAuditEvent::new(
                "probe_exec",
                self.variant,
                &self.container_id,
                if err.is_timeout() { ProbeOutcome::Timeout } else { ProbeOutcome::Error },
                started.elapsed(),
            )
            .with_detail(&err.to_string()),
        };
        self.record(event.with_command(command));
        result
    }

    async fn inspect(&self) -> Result<&ContainerConfig, ProbeError> {
        self.config
            .get_or_try_init(|| async {
                let started = Instant::now();
                let result = self.engine.inspect_config(&self.container_id).await;
                let outcome = if result.is_ok() { ProbeOutcome::Ok } else { ProbeOutcome::Error };
                let mut event = ProbeAuditEvent::new(
                    "probe_inspect",
                    self.variant,
                    &self.container_id,
                    outcome,
                    started.elapsed(),
                );
                if let Err(err) = &result {
                    event = event.with_detail(&err.to_string());
                }
                self.record(event);
                result
            })
            .await
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
