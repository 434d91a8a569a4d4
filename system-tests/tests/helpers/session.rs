// system-tests/tests/helpers/session.rs
// ============================================================================
// Module: Image Sessions
// Description: Session-scoped container fixtures per image variant.
// Purpose: Launch or attach once per variant and run cases against it.
// Dependencies: system-tests, odh-image-probe, tokio
// ============================================================================

//! ## Overview
//! Each test binary owns one dedicated multi-thread runtime and at most one
//! container per variant. Cases block on that runtime, so the launched
//! container handle and the engine child processes all live on a runtime that
//! outlives any single test. Session setup runs once per variant; its result
//! (including a failure) is shared by every case for that variant.
//!
//! Invariants:
//! - An unconfigured variant is a skip unless all variants are required.
//! - A failed launch is never retried within a [`SessionSet`].
//! - Failure summaries carry redacted text only.

use std::error::Error;
use std::future::Future;
use std::path::Path;
use std::sync::Arc;
use std::sync::LazyLock;
use std::sync::OnceLock;

use odh_image_probe::ContainerEngine;
use odh_image_probe::ContainerProbe;
use odh_image_probe::FileAuditSink;
use odh_image_probe::ImageVariant;
use odh_image_probe::LaunchRequest;
use odh_image_probe::NoopAuditSink;
use odh_image_probe::ProbeAuditSink;
use odh_image_probe::StderrAuditSink;
use odh_image_probe::attach_container;
use odh_image_probe::launch_container;
use odh_image_probe::redact_url_credentials;
use system_tests::config::AuditLogTarget;
use system_tests::config::ImageTestConfig;
use system_tests::config::ImageTestEnv;
use system_tests::config::VariantTarget;
use tokio::runtime::Runtime;
use tokio::sync::OnceCell;

use super::artifacts::STATUS_FAIL;
use super::artifacts::STATUS_PASS;
use super::artifacts::STATUS_SKIP;
use super::artifacts::TestReporter;

/// Shared probe handle for one variant.
pub type SharedProbe = Arc<dyn ContainerProbe>;
/// Result of one case body.
pub type CaseResult = Result<CaseOutcome, Box<dyn Error>>;

/// How a case body concluded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaseOutcome {
    /// Every assertion held.
    Pass,
    /// Required external input was absent.
    Skip(String),
}

/// Case body conclusion for a passing check.
pub fn pass() -> CaseResult {
    Ok(CaseOutcome::Pass)
}

/// Case body conclusion for a check that cannot run.
pub fn skip(reason: impl Into<String>) -> CaseResult {
    Ok(CaseOutcome::Skip(reason.into()))
}

static CONFIG: LazyLock<Result<ImageTestConfig, String>> = LazyLock::new(ImageTestConfig::load);

static RUNTIME: LazyLock<Result<Runtime, String>> = LazyLock::new(|| {
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .thread_name("odh-image-session")
        .build()
        .map_err(|err| format!("session runtime failed to start: {err}"))
});

/// Launched or attached containers and the audit sink for one test binary.
///
/// Suites share [`SESSIONS`]; offline harness tests build their own so each
/// case starts from an empty set.
pub struct SessionSet {
    /// Python variant session.
    python: OnceCell<Result<SharedProbe, String>>,
    /// CUDA variant session.
    cuda: OnceCell<Result<SharedProbe, String>>,
    /// Audit sink selected on first session start.
    audit: OnceLock<Result<Arc<dyn ProbeAuditSink>, String>>,
}

impl SessionSet {
    /// Creates an empty set; nothing starts until a case needs it.
    pub const fn new() -> Self {
        Self {
            python: OnceCell::const_new(),
            cuda: OnceCell::const_new(),
            audit: OnceLock::new(),
        }
    }

    const fn cell(&self, variant: ImageVariant) -> &OnceCell<Result<SharedProbe, String>> {
        match variant {
            ImageVariant::Python => &self.python,
            ImageVariant::Cuda => &self.cuda,
        }
    }

    /// Returns the audit sink selected by configuration, opening it once.
    fn audit_sink(&self, config: &ImageTestConfig) -> Result<Arc<dyn ProbeAuditSink>, String> {
        self.audit
            .get_or_init(|| match &config.audit_log {
                None => Ok(Arc::new(NoopAuditSink)),
                Some(AuditLogTarget::Stderr) => Ok(Arc::new(StderrAuditSink)),
                Some(AuditLogTarget::File(path)) => open_file_sink(path),
            })
            .clone()
    }
}

impl Default for SessionSet {
    fn default() -> Self {
        Self::new()
    }
}

/// Sessions shared by every suite case in the binary.
static SESSIONS: SessionSet = SessionSet::new();

/// Returns the binary-wide configuration.
pub fn config() -> Result<&'static ImageTestConfig, String> {
    CONFIG.as_ref().map_err(|err| format!("image test config: {err}"))
}

fn runtime() -> Result<&'static Runtime, String> {
    RUNTIME.as_ref().map_err(Clone::clone)
}

/// Runs one case against the session container for `variant`.
///
/// Writes a `pass`, `skip`, or `fail` summary for the case and returns the
/// body's error on failure.
pub fn run_case<F, Fut>(test_name: &str, variant: ImageVariant, body: F) -> Result<(), Box<dyn Error>>
where
    F: FnOnce(SharedProbe, &'static ImageTestConfig) -> Fut,
    Fut: Future<Output = CaseResult>,
{
    run_case_in(config()?, &SESSIONS, test_name, variant, body)
}

/// Runs one case with an explicit configuration and session set.
///
/// Failure notes and the returned error are credential-redacted.
pub fn run_case_in<F, Fut>(
    config: &'static ImageTestConfig,
    sessions: &'static SessionSet,
    test_name: &str,
    variant: ImageVariant,
    body: F,
) -> Result<(), Box<dyn Error>>
where
    F: FnOnce(SharedProbe, &'static ImageTestConfig) -> Fut,
    Fut: Future<Output = CaseResult>,
{
    let mut reporter = TestReporter::new(test_name, variant.as_str(), config.run_root.as_deref())?;
    let outcome = runtime()?.block_on(async {
        match session_probe(variant, config, sessions).await? {
            Some(probe) => body(probe, config).await,
            None => {
                let (image_key, container_key) = ImageTestEnv::variant_keys(variant);
                skip(format!(
                    "{variant} variant not configured; set {} or {}",
                    image_key.as_str(),
                    container_key.as_str()
                ))
            }
        }
    });
    match outcome {
        Ok(CaseOutcome::Pass) => {
            reporter.finish(STATUS_PASS, Vec::new())?;
            Ok(())
        }
        Ok(CaseOutcome::Skip(reason)) => {
            reporter.finish(STATUS_SKIP, vec![reason])?;
            Ok(())
        }
        Err(err) => {
            let message = redact_url_credentials(&err.to_string());
            match reporter.finish(STATUS_FAIL, vec![message.clone()]) {
                Ok(()) => Err(message.into()),
                Err(write_err) => {
                    Err(format!("{message} (failed to write summary: {write_err})").into())
                }
            }
        }
    }
}

/// Returns the shared probe for `variant`, starting it on first use.
async fn session_probe(
    variant: ImageVariant,
    config: &'static ImageTestConfig,
    sessions: &'static SessionSet,
) -> Result<Option<SharedProbe>, String> {
    let Some(target) = config.target(variant) else {
        if config.require_all_variants {
            let (image_key, container_key) = ImageTestEnv::variant_keys(variant);
            return Err(format!(
                "{variant} variant not configured and {} is set; set {} or {}",
                ImageTestEnv::RequireAllVariants.as_str(),
                image_key.as_str(),
                container_key.as_str()
            ));
        }
        return Ok(None);
    };
    sessions
        .cell(variant)
        .get_or_init(|| start_session(variant, target, config, sessions))
        .await
        .clone()
        .map(Some)
}

/// Launches or attaches the container for one variant.
async fn start_session(
    variant: ImageVariant,
    target: &VariantTarget,
    config: &ImageTestConfig,
    sessions: &SessionSet,
) -> Result<SharedProbe, String> {
    let engine = ContainerEngine::new(config.engine.clone());
    let audit = sessions.audit_sink(config)?;
    let container = match target {
        VariantTarget::Image(image) => {
            let request = LaunchRequest {
                variant,
                image: image.clone(),
                session_ttl: config.session_ttl,
            };
            launch_container(engine, &request, audit).await
        }
        VariantTarget::Container(container_id) => {
            attach_container(engine, variant, container_id, audit).await
        }
    }
    .map_err(|err| format!("{variant} session setup failed: {err}"))?;
    Ok(Arc::new(container.with_timeout_floor(config.timeout_floor)))
}

fn open_file_sink(path: &Path) -> Result<Arc<dyn ProbeAuditSink>, String> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .map_err(|err| format!("audit log dir {}: {err}", parent.display()))?;
    }
    let sink = FileAuditSink::new(path)
        .map_err(|err| format!("audit log {}: {err}", path.display()))?;
    Ok(Arc::new(sink))
}
