// system-tests/tests/common.rs
// ============================================================================
// Module: Common Image Suite
// Description: Aggregates the contract checks shared by every image variant.
// Purpose: Run each shared check once per variant against one session container.
// Dependencies: suites/*, helpers
// ============================================================================

//! Common image suite entry point for system-tests.

mod helpers;

#[path = "suites/environment.rs"]
mod environment;
#[path = "suites/identity.rs"]
mod identity;
#[path = "suites/image_metadata.rs"]
mod image_metadata;
#[path = "suites/labels.rs"]
mod labels;
#[path = "suites/package_config.rs"]
mod package_config;
#[path = "suites/security.rs"]
mod security;
#[path = "suites/smoke.rs"]
mod smoke;
