// system-tests/src/config/env.rs
// ============================================================================
// Module: Image Test Environment
// Description: Environment-backed configuration for image contract tests.
// Purpose: Centralize env parsing with strict UTF-8 validation.
// Dependencies: std, odh-image-probe
// ============================================================================

//! ## Overview
//! Environment values are parsed with strict UTF-8 enforcement to avoid silent
//! misconfiguration. Invalid UTF-8 fails closed. Values set in the environment
//! override the optional TOML file named by `ODH_IMAGE_TEST_CONFIG`.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::path::Path;
use std::path::PathBuf;
use std::time::Duration;

use odh_image_probe::DEFAULT_ENGINE;
use odh_image_probe::ImageVariant;

use super::file::ConfigFile;
use super::file::VariantFileConfig;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Idle lifetime of launched containers when none is configured.
pub const DEFAULT_SESSION_TTL: Duration = Duration::from_secs(900);
/// Python series expected from `python --version` when none is configured.
pub const DEFAULT_PYTHON_SERIES: &str = "3.12";
/// Audit log value selecting the stderr sink.
const AUDIT_STDERR: &str = "stderr";

// ============================================================================
// SECTION: Environment Constants
// ============================================================================

/// Environment keys for image test configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageTestEnv {
    /// Optional TOML config file path.
    ConfigFile,
    /// Container engine CLI binary.
    Engine,
    /// Python variant image reference.
    PythonImage,
    /// CUDA variant image reference.
    CudaImage,
    /// Running Python container to reuse.
    PythonContainer,
    /// Running CUDA container to reuse.
    CudaContainer,
    /// Timeout floor in seconds (positive integer).
    TimeoutSeconds,
    /// Idle lifetime of launched containers in seconds.
    SessionTtlSeconds,
    /// Optional artifact run root override.
    RunRoot,
    /// Audit log destination (`stderr` or a file path).
    AuditLog,
    /// Fail instead of skip for unconfigured variants (`true`/`false` or `1`/`0`).
    RequireAllVariants,
    /// Expected `python --version` series.
    PythonSeries,
    /// Expected `com.opendatahub.python` label value.
    PythonVersion,
}

impl ImageTestEnv {
    /// Every key, for tests that snapshot and restore the environment.
    pub const ALL: [Self; 13] = [
        Self::ConfigFile,
        Self::Engine,
        Self::PythonImage,
        Self::CudaImage,
        Self::PythonContainer,
        Self::CudaContainer,
        Self::TimeoutSeconds,
        Self::SessionTtlSeconds,
        Self::RunRoot,
        Self::AuditLog,
        Self::RequireAllVariants,
        Self::PythonSeries,
        Self::PythonVersion,
    ];

    /// Returns the canonical environment variable name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ConfigFile => "ODH_IMAGE_TEST_CONFIG",
            Self::Engine => "ODH_IMAGE_TEST_ENGINE",
            Self::PythonImage => "ODH_IMAGE_TEST_PYTHON_IMAGE",
            Self::CudaImage => "ODH_IMAGE_TEST_CUDA_IMAGE",
            Self::PythonContainer => "ODH_IMAGE_TEST_PYTHON_CONTAINER",
            Self::CudaContainer => "ODH_IMAGE_TEST_CUDA_CONTAINER",
            Self::TimeoutSeconds => "ODH_IMAGE_TEST_TIMEOUT_SEC",
            Self::SessionTtlSeconds => "ODH_IMAGE_TEST_SESSION_TTL_SEC",
            Self::RunRoot => "ODH_IMAGE_TEST_RUN_ROOT",
            Self::AuditLog => "ODH_IMAGE_TEST_AUDIT_LOG",
            Self::RequireAllVariants => "ODH_IMAGE_TEST_REQUIRE_ALL_VARIANTS",
            Self::PythonSeries => "ODH_IMAGE_TEST_PYTHON_SERIES",
            Self::PythonVersion => "PYTHON_VERSION",
        }
    }

    /// Returns the image and container keys for a variant.
    #[must_use]
    pub const fn variant_keys(variant: ImageVariant) -> (Self, Self) {
        match variant {
            ImageVariant::Python => (Self::PythonImage, Self::PythonContainer),
            ImageVariant::Cuda => (Self::CudaImage, Self::CudaContainer),
        }
    }
}

// ============================================================================
// SECTION: Config Types
// ============================================================================

/// How a variant's container is obtained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VariantTarget {
    /// Launch a fresh container from this image reference.
    Image(String),
    /// Reuse this running container.
    Container(String),
}

/// Where probe audit events go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuditLogTarget {
    /// JSON lines on stderr.
    Stderr,
    /// JSON lines appended to a file.
    File(PathBuf),
}

/// Typed image test configuration derived from environment variables and an
/// optional TOML file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageTestConfig {
    /// Container engine CLI binary.
    pub engine: PathBuf,
    /// Python variant target.
    pub python: Option<VariantTarget>,
    /// CUDA variant target.
    pub cuda: Option<VariantTarget>,
    /// Optional timeout floor applied to every command.
    pub timeout_floor: Option<Duration>,
    /// Idle lifetime of launched containers.
    pub session_ttl: Duration,
    /// Optional artifact run root override.
    pub run_root: Option<PathBuf>,
    /// Optional audit log destination.
    pub audit_log: Option<AuditLogTarget>,
    /// Fail instead of skip when a variant is not configured.
    pub require_all_variants: bool,
    /// Expected `python --version` series.
    pub python_series: String,
    /// Expected `com.opendatahub.python` label value.
    pub expected_python_version: Option<String>,
}

impl Default for ImageTestConfig {
    fn default() -> Self {
        Self {
            engine: PathBuf::from(DEFAULT_ENGINE),
            python: None,
            cuda: None,
            timeout_floor: None,
            session_ttl: DEFAULT_SESSION_TTL,
            run_root: None,
            audit_log: None,
            require_all_variants: false,
            python_series: DEFAULT_PYTHON_SERIES.to_string(),
            expected_python_version: None,
        }
    }
}

impl ImageTestConfig {
    /// Loads configuration from the optional config file and the environment.
    ///
    /// # Errors
    ///
    /// Returns an error when an environment value is not valid UTF-8, is empty
    /// (`PYTHON_VERSION` excepted), or fails validation, or when the config file cannot be loaded.
    pub fn load() -> Result<Self, String> {
        let mut config = Self::default();
        if let Some(path) = read_env_nonempty(ImageTestEnv::ConfigFile.as_str())? {
            let file = ConfigFile::load(Path::new(&path)).map_err(|err| err.to_string())?;
            config.apply_file(file)?;
        }
        config.apply_env()?;
        Ok(config)
    }

    /// Returns the configured target for a variant.
    #[must_use]
    pub const fn target(&self, variant: ImageVariant) -> Option<&VariantTarget> {
        match variant {
            ImageVariant::Python => self.python.as_ref(),
            ImageVariant::Cuda => self.cuda.as_ref(),
        }
    }

    /// Layers values from a parsed config file.
    fn apply_file(&mut self, file: ConfigFile) -> Result<(), String> {
        if let Some(engine) = file.engine {
            self.engine = PathBuf::from(engine);
        }
        self.python = file_target(ImageVariant::Python, file.python)?;
        self.cuda = file_target(ImageVariant::Cuda, file.cuda)?;
        if let Some(secs) = file.timeout_sec {
            self.timeout_floor = Some(positive_seconds("timeout_sec", secs)?);
        }
        if let Some(secs) = file.session_ttl_sec {
            self.session_ttl = positive_seconds("session_ttl_sec", secs)?;
        }
        if let Some(run_root) = file.run_root {
            self.run_root = Some(run_root);
        }
        if let Some(audit_log) = file.audit_log {
            self.audit_log = Some(parse_audit_target(&audit_log));
        }
        if let Some(require) = file.require_all_variants {
            self.require_all_variants = require;
        }
        if let Some(series) = file.python_series {
            self.python_series = series;
        }
        let version = file.expected_python_version;
        if let Some(version) = version.filter(|value| !value.trim().is_empty()) {
            self.expected_python_version = Some(version.trim().to_string());
        }
        Ok(())
    }

    /// Layers values from environment variables.
    fn apply_env(&mut self) -> Result<(), String> {
        if let Some(engine) = read_env_nonempty(ImageTestEnv::Engine.as_str())? {
            self.engine = PathBuf::from(engine);
        }
        for variant in ImageVariant::ALL {
            if let Some(target) = env_target(variant)? {
                match variant {
                    ImageVariant::Python => self.python = Some(target),
                    ImageVariant::Cuda => self.cuda = Some(target),
                }
            }
        }
        if let Some(raw) = read_env_nonempty(ImageTestEnv::TimeoutSeconds.as_str())? {
            self.timeout_floor =
                Some(parse_timeout_seconds(ImageTestEnv::TimeoutSeconds.as_str(), &raw)?);
        }
        if let Some(raw) = read_env_nonempty(ImageTestEnv::SessionTtlSeconds.as_str())? {
            self.session_ttl = parse_timeout_seconds(ImageTestEnv::SessionTtlSeconds.as_str(), &raw)?;
        }
        if let Some(run_root) = read_env_nonempty(ImageTestEnv::RunRoot.as_str())? {
            self.run_root = Some(PathBuf::from(run_root));
        }
        if let Some(audit_log) = read_env_nonempty(ImageTestEnv::AuditLog.as_str())? {
            self.audit_log = Some(parse_audit_target(&audit_log));
        }
        let require = read_env_nonempty(ImageTestEnv::RequireAllVariants.as_str())?;
        if require.is_some() {
            self.require_all_variants =
                parse_bool_env(ImageTestEnv::RequireAllVariants.as_str(), require)?;
        }
        if let Some(series) = read_env_nonempty(ImageTestEnv::PythonSeries.as_str())? {
            self.python_series = series.trim().to_string();
        }
        // An empty PYTHON_VERSION pins nothing.
        let version = read_env_strict(ImageTestEnv::PythonVersion.as_str())?;
        if let Some(version) = version.filter(|value| !value.trim().is_empty()) {
            self.expected_python_version = Some(version.trim().to_string());
        }
        Ok(())
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Reads an environment variable and enforces UTF-8 validity.
///
/// # Errors
///
/// Returns an error when the environment variable contains invalid UTF-8.
pub fn read_env_strict(name: &str) -> Result<Option<String>, String> {
    std::env::var_os(name).map_or(Ok(None), |raw| {
        raw.into_string().map(Some).map_err(|_| format!("{name} must be valid UTF-8"))
    })
}

/// Reads an environment variable and rejects empty values.
///
/// # Errors
///
/// Returns an error when the variable is set but empty or whitespace.
fn read_env_nonempty(name: &str) -> Result<Option<String>, String> {
    match read_env_strict(name)? {
        Some(value) if value.trim().is_empty() => Err(format!("{name} must not be empty")),
        Some(value) => Ok(Some(value)),
        None => Ok(None),
    }
}

/// Resolves a variant target from its image/container env pair.
///
/// # Errors
///
/// Returns an error when both keys are set.
fn env_target(variant: ImageVariant) -> Result<Option<VariantTarget>, String> {
    let (image_key, container_key) = ImageTestEnv::variant_keys(variant);
    let image = read_env_nonempty(image_key.as_str())?;
    let container = read_env_nonempty(container_key.as_str())?;
    match (image, container) {
        (Some(_), Some(_)) => Err(format!(
            "{} and {} are mutually exclusive",
            image_key.as_str(),
            container_key.as_str()
        )),
        (Some(image), None) => Ok(Some(VariantTarget::Image(image.trim().to_string()))),
        (None, Some(container)) => Ok(Some(VariantTarget::Container(container.trim().to_string()))),
        (None, None) => Ok(None),
    }
}

/// Resolves a variant target from its config file table.
///
/// # Errors
///
/// Returns an error when both `image` and `container` are set or either is empty.
fn file_target(
    variant: ImageVariant,
    table: Option<VariantFileConfig>,
) -> Result<Option<VariantTarget>, String> {
    let Some(table) = table else {
        return Ok(None);
    };
    let nonempty = |field: &str, value: String| {
        if value.trim().is_empty() {
            Err(format!("[{variant}].{field} must not be empty"))
        } else {
            Ok(value.trim().to_string())
        }
    };
    match (table.image, table.container) {
        (Some(_), Some(_)) => Err(format!("[{variant}] sets both image and container")),
        (Some(image), None) => Ok(Some(VariantTarget::Image(nonempty("image", image)?))),
        (None, Some(container)) => {
            Ok(Some(VariantTarget::Container(nonempty("container", container)?)))
        }
        (None, None) => Ok(None),
    }
}

/// Parses an audit destination; `stderr` selects the stderr sink.
fn parse_audit_target(raw: &str) -> AuditLogTarget {
    let trimmed = raw.trim();
    if trimmed.eq_ignore_ascii_case(AUDIT_STDERR) {
        AuditLogTarget::Stderr
    } else {
        AuditLogTarget::File(PathBuf::from(trimmed))
    }
}

/// Converts a positive integer number of seconds from the config file.
///
/// # Errors
///
/// Returns an error when the value is zero.
fn positive_seconds(field: &str, secs: u64) -> Result<Duration, String> {
    if secs == 0 {
        return Err(format!("{field} must be greater than zero"));
    }
    Ok(Duration::from_secs(secs))
}

/// Parses a positive timeout value from an environment variable string.
///
/// # Errors
///
/// Returns an error when the value is missing, non-numeric, or zero.
fn parse_timeout_seconds(name: &str, raw: &str) -> Result<Duration, String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(format!("{name} must be a positive integer number of seconds"));
    }
    let secs: u64 = trimmed
        .parse()
        .map_err(|_| format!("{name} must be a positive integer number of seconds"))?;
    positive_seconds(name, secs)
}

/// Parses a boolean environment variable.
///
/// # Errors
///
/// Returns an error when the value is not a recognized boolean literal.
fn parse_bool_env(name: &str, raw: Option<String>) -> Result<bool, String> {
    let Some(value) = raw else {
        return Ok(false);
    };
    let trimmed = value.trim();
    if trimmed.eq_ignore_ascii_case("true") || trimmed == "1" {
        return Ok(true);
    }
    if trimmed.eq_ignore_ascii_case("false") || trimmed == "0" {
        return Ok(false);
    }
    Err(format!("{name} must be 1, 0, true, or false"))
}
