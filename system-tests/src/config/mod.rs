// system-tests/src/config/mod.rs
// ============================================================================
// Module: Image Test Configuration
// Description: Centralized configuration for image contract tests.
// Purpose: Provide typed access to test environment settings and defaults.
// Dependencies: std, serde, thiserror, toml
// ============================================================================

//! ## Overview
//! Image test configuration is read from an optional TOML file and environment
//! variables and mapped into a small typed structure for reuse across test
//! helpers. Environment values override file values.

// ============================================================================
// SECTION: Modules
// ============================================================================

mod env;
mod file;

// ============================================================================
// SECTION: Tests
// ============================================================================


// ============================================================================
// SECTION: Re-exports
// ============================================================================

pub use env::AuditLogTarget;
pub use env::DEFAULT_PYTHON_SERIES;
pub use env::DEFAULT_SESSION_TTL;
pub use env::ImageTestConfig;
pub use env::ImageTestEnv;
pub use env::VariantTarget;
pub use env::read_env_strict;
pub use file::ConfigError;
pub use file::ConfigFile;
pub use file::MAX_CONFIG_FILE_SIZE;
pub use file::VariantFileConfig;
