// system-tests/tests/helpers/mod.rs
// ============================================================================
// Module: Image Test Helpers
// Description: Shared helpers for the image contract suites.
// Purpose: Provide session fixtures, contract checks, and artifact utilities.
// Dependencies: system-tests, odh-image-probe
// ============================================================================

//! ## Overview
//! Shared helpers for the image contract suites.
//! Invariants:
//! - Each variant's container is started at most once per test binary.
//! - Failure messages never carry unredacted command output.

#![allow(dead_code, reason = "Shared helpers are reused across multiple test suites.")]

pub mod session;
