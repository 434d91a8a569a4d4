// system-tests/src/contract.rs
// ============================================================================
// Module: Base Image Contract
// Description: Expected values every ODH base image must satisfy.
// Purpose: Keep the asserted literals in one place shared by all suites.
// Dependencies: std
// ============================================================================

//! ## Overview
//! Downstream workbench and runtime images build on these base images and
//! rely on the values below: the OpenShift-style arbitrary-UID layout rooted
//! at [`APP_ROOT`], the package index configuration, and the OCI labels.

// ============================================================================
// SECTION: Layout
// ============================================================================

/// Expands to the application root literal so paths below it can be
/// assembled with `concat!`.
macro_rules! app_root {
    () => {
        "/opt/app-root"
    };
}

/// Application root directory.
pub const APP_ROOT: &str = app_root!();
/// Working directory and `HOME`.
pub const WORKDIR: &str = concat!(app_root!(), "/src");
/// Directory that must be on `PATH`.
pub const APP_BIN: &str = concat!(app_root!(), "/bin");
/// Effective user id.
pub const UID: &str = "1001";
/// Effective group id.
pub const GID: &str = "0";
/// Forbidden username.
pub const ROOT_USER: &str = "root";

// ============================================================================
// SECTION: Filesystem
// ============================================================================

/// pip global configuration.
pub const PIP_CONF: &str = "/etc/pip.conf";
/// Section header required in [`PIP_CONF`].
pub const PIP_GLOBAL_SECTION: &str = "[global]";
/// uv configuration.
pub const UV_CONFIG: &str = "/etc/uv/uv.toml";
/// Permission fixup helper.
pub const FIX_PERMISSIONS: &str = "/usr/local/bin/fix-permissions";
/// File the runtime user must not be able to read.
pub const SHADOW: &str = "/etc/shadow";

// ============================================================================
// SECTION: Environment
// ============================================================================

/// Declared environment variables with exact expected values.
pub const REQUIRED_ENV: [(&str, &str); 6] = [
    ("HOME", WORKDIR),
    ("UV_CONFIG_FILE", UV_CONFIG),
    ("PYTHONDONTWRITEBYTECODE", "1"),
    ("PYTHONUNBUFFERED", "1"),
    ("PIP_NO_CACHE_DIR", "1"),
    ("UV_SYSTEM_PYTHON", "1"),
];

// ============================================================================
// SECTION: Labels
// ============================================================================

/// Labels that must be present and non-empty on every variant.
pub const REQUIRED_LABELS: [&str; 4] =
    ["name", "version", "io.k8s.display-name", SOURCE_LABEL];
/// Source repository label.
pub const SOURCE_LABEL: &str = "org.opencontainers.image.source";
/// Substring the source label must contain.
pub const SOURCE_HOST: &str = "github.com";
/// Accelerator label.
pub const ACCELERATOR_LABEL: &str = "com.opendatahub.accelerator";
/// Python version label.
pub const PYTHON_LABEL: &str = "com.opendatahub.python";

// ============================================================================
// SECTION: Tests
// ============================================================================
