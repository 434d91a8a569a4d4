// crates/odh-image-probe/src/launch.rs
// ============================================================================
// Module: Container Launch
// Description: Start or attach to the container instance behind a probe.
// Purpose: Produce an EngineContainer for a variant from an image or an id.
// Dependencies: testcontainers
// ============================================================================

//! ## Overview
//! [`launch_container`] starts a fresh instance through testcontainers with
//! its entrypoint replaced by `sleep <ttl>`, so the instance idles until
//! probed and exits on its own once the session TTL passes. A host-side
//! reaper removes it as soon as the launching process exits.
//! [`attach_container`] reuses an instance someone else started.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;
use std::time::Duration;
use std::time::Instant;

use testcontainers::ContainerAsync;
use testcontainers::GenericImage;
use testcontainers::ImageExt;
use testcontainers::runners::AsyncRunner;

use crate::audit::ProbeAuditEvent;
use crate::audit::ProbeAuditSink;
use crate::audit::ProbeOutcome;
use crate::container::EngineContainer;
use crate::engine::ContainerEngine;
use crate::error::ProbeError;
use crate::variant::ImageVariant;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Tag used when an image reference does not carry one.
const DEFAULT_TAG: &str = "latest";

// ============================================================================
// SECTION: Launch
// ============================================================================

/// Parameters for launching a fresh container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchRequest {
    /// Variant being launched.
    pub variant: ImageVariant,
    /// Image reference (`repository[:tag]`).
    pub image: String,
    /// Idle lifetime of the instance.
    pub session_ttl: Duration,
}

/// Launches a fresh container for `request` and wraps it in a probe.
///
/// The container is removed by the engine once the current process exits.
/// Every outcome is recorded as a `container_launch` audit event.
///
/// # Errors
///
/// Returns [`ProbeError::InvalidImageRef`] for unusable references,
/// [`ProbeError::EngineUnavailable`] when the engine is down, and
/// [`ProbeError::Launch`] when the container fails to start.
pub async fn launch_container(
    engine: ContainerEngine,
    request: &LaunchRequest,
    audit: Arc<dyn ProbeAuditSink>,
) -> Result<EngineContainer, ProbeError> {
    let started = Instant::now();
    let container = match start_instance(&engine, request).await {
        Ok(container) => container,
        Err(err) => {
            audit.record(
                &ProbeAuditEvent::new(
                    "container_launch",
                    request.variant,
                    "",
                    ProbeOutcome::Error,
                    started.elapsed(),
                )
                .with_detail(&err.to_string()),
            );
            return Err(err);
        }
    };
    let container_id = container.id().to_string();
    audit.record(
        &ProbeAuditEvent::new(
            "container_launch",
            request.variant,
            &container_id,
            ProbeOutcome::Ok,
            started.elapsed(),
        )
        .with_detail(&request.image),
    );
    if let Err(err) = engine.spawn_reaper(&container_id, std::process::id()) {
        audit.record(
            &ProbeAuditEvent::new(
                "container_reaper",
                request.variant,
                &container_id,
                ProbeOutcome::Error,
                Duration::ZERO,
            )
            .with_detail(&err.to_string()),
        );
    }
    Ok(EngineContainer::new(engine, container_id, request.variant)
        .with_audit(audit)
        .owning(container))
}

/// Validates the reference, checks the engine, and starts the instance.
async fn start_instance(
    engine: &ContainerEngine,
    request: &LaunchRequest,
) -> Result<ContainerAsync<GenericImage>, ProbeError> {
    let (repository, tag) = split_image_ref(&request.image)?;
    engine.ensure_available().await?;
    let ttl_secs = request.session_ttl.as_secs().max(1);
    GenericImage::new(repository, tag)
        .with_entrypoint("sleep")
        .with_cmd([ttl_secs.to_string()])
        .start()
        .await
        .map_err(|err| ProbeError::launch(request.variant, &request.image, &err.to_string()))
}

/// Attaches a probe to an already running container.
///
/// # Errors
///
/// Returns [`ProbeError::ContainerNotRunning`] when the container is stopped
/// or unknown, and engine errors when the check cannot run.
pub async fn attach_container(
    engine: ContainerEngine,
    variant: ImageVariant,
    container_id: &str,
    audit: Arc<dyn ProbeAuditSink>,
) -> Result<EngineContainer, ProbeError> {
    let started = Instant::now();
    if !engine.is_running(container_id).await? {
        return Err(ProbeError::ContainerNotRunning(container_id.to_string()));
    }
    audit.record(&ProbeAuditEvent::new(
        "container_attach",
        variant,
        container_id,
        ProbeOutcome::Ok,
        started.elapsed(),
    ));
    Ok(EngineContainer::new(engine, container_id, variant).with_audit(audit))
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Splits an image reference into repository and tag.
///
/// The tag follows the last `:` after the last `/`, so registry ports are kept
/// in the repository. Missing tags default to `latest`.
///
/// # Errors
///
/// Returns [`ProbeError::InvalidImageRef`] for empty references, empty tags,
/// and digest references.
pub fn split_image_ref(reference: &str) -> Result<(String, String), ProbeError> {
    let invalid = |reason: &str| ProbeError::InvalidImageRef {
        reference: reference.to_string(),
        reason: reason.to_string(),
    };
    let trimmed = reference.trim();
    if trimmed.is_empty() {
        return Err(invalid("reference is empty"));
    }
    if trimmed.contains('@') {
        return Err(invalid("digest references cannot be launched; attach to a container instead"));
    }
    let name_start = trimmed.rfind('/').map_or(0, |idx| idx + 1);
    match trimmed[name_start..].rfind(':') {
        Some(offset) => {
            let split = name_start + offset;
            let (repository, tag) = (&trimmed[..split], &trimmed[split + 1..]);
            if repository.is_empty() || tag.is_empty() {
                return Err(invalid("repository and tag must be non-empty"));
            }
            Ok((repository.to_string(), tag.to_string()))
        }
        None => Ok((trimmed.to_string(), DEFAULT_TAG.to_string())),
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
