// system-tests/src/lib.rs
// ============================================================================
// Module: ODH Image System Tests Library
// Description: Shared configuration and contract values for image tests.
// Purpose: Provide common utilities for the image contract test binaries.
// Dependencies: std, odh-image-probe
// ============================================================================

//! ## Overview
//! This crate hosts shared configuration and the expected image contract used
//! by the container suites in `system-tests/tests`.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;
pub mod contract;
