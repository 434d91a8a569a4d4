// system-tests/tests/suites/smoke.rs
// ============================================================================
// Module: Smoke Tests
// Description: Toolchain presence and package resolver reachability.
// Purpose: Confirm python, pip, and uv run and can resolve from the index.
// Dependencies: system-tests helpers, odh-image-probe, yare
// ============================================================================

//! Smoke tests run against every image variant.

use std::time::Duration;

use helpers::checks::describe;
use helpers::checks::expect_contains;
use helpers::checks::expect_success;
use helpers::session::pass;
use helpers::session::run_case;
use odh_image_probe::ImageVariant;
use yare::parameterized;

use crate::helpers;

/// Resolver checks may download index metadata.
const RESOLVER_TIMEOUT: Duration = Duration::from_secs(60);

/// Likely causes named when a resolver check fails.
const RESOLVER_HINT: &str =
    "check the configured index-url, the CA bundle trusted by the image, and /etc/pip.conf or /etc/uv/uv.toml syntax";

#[parameterized(python = { ImageVariant::Python }, cuda = { ImageVariant::Cuda })]
fn python_version_matches_series(variant: ImageVariant) -> Result<(), Box<dyn std::error::Error>> {
    run_case("python_version_matches_series", variant, |probe, config| async move {
        let output = probe.run_default("python --version").await?;
        expect_success(&output, "python --version")?;
        let combined = format!("{}{}", output.stdout, output.stderr);
        expect_contains(
            &combined,
            &format!("Python {}", config.python_series),
            "python --version",
        )?;
        pass()
    })
}

#[parameterized(python = { ImageVariant::Python }, cuda = { ImageVariant::Cuda })]
fn pip_is_available(variant: ImageVariant) -> Result<(), Box<dyn std::error::Error>> {
    run_case("pip_is_available", variant, |probe, _| async move {
        let output = probe.run_default("pip --version").await?;
        expect_success(&output, "pip --version")?;
        pass()
    })
}

#[parameterized(python = { ImageVariant::Python }, cuda = { ImageVariant::Cuda })]
fn uv_is_available(variant: ImageVariant) -> Result<(), Box<dyn std::error::Error>> {
    run_case("uv_is_available", variant, |probe, _| async move {
        let output = probe.run_default("uv --version").await?;
        expect_success(&output, "uv --version")?;
        pass()
    })
}

#[parameterized(python = { ImageVariant::Python }, cuda = { ImageVariant::Cuda })]
fn pip_resolves_from_index(variant: ImageVariant) -> Result<(), Box<dyn std::error::Error>> {
    run_case("pip_resolves_from_index", variant, |probe, _| async move {
        let output = probe
            .run("pip install --dry-run --upgrade setuptools", RESOLVER_TIMEOUT)
            .await?;
        if !output.success() {
            return Err(format!(
                "pip could not resolve setuptools; {RESOLVER_HINT}\n{}",
                describe(&output)
            )
            .into());
        }
        pass()
    })
}

#[parameterized(python = { ImageVariant::Python }, cuda = { ImageVariant::Cuda })]
fn uv_resolves_from_index(variant: ImageVariant) -> Result<(), Box<dyn std::error::Error>> {
    run_case("uv_resolves_from_index", variant, |probe, _| async move {
        let output = probe.run("echo 'setuptools' | uv pip compile -", RESOLVER_TIMEOUT).await?;
        if !output.success() {
            return Err(format!(
                "uv could not resolve setuptools; {RESOLVER_HINT}\n{}",
                describe(&output)
            )
            .into());
        }
        pass()
    })
}
