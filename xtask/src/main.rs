//! Custom cargo commands for the sitesearch crate.
//!
//! Usage:
//!   cargo xtask verify    - Tests, clippy for both targets, wasm build
//!   cargo xtask test      - Run all tests
//!   cargo xtask wasm      - Build the browser package with wasm-pack
//!   cargo xtask wasm-test - Run the DOM tests in headless Firefox
//!   cargo xtask check     - Quick check (native only)

use anyhow::{bail, Context, Result};
use std::env;
use std::path::PathBuf;
use std::process::Command;

const WASM_TARGET: &str = "wasm32-unknown-unknown";

fn main() -> Result<()> {
    let task = env::args().nth(1);
    match task.as_deref() {
        Some("verify") => verify()?,
        Some("test") => test()?,
        Some("wasm") => wasm()?,
        Some("wasm-test") => wasm_test()?,
        Some("check") => check()?,
        _ => print_help(),
    }
    Ok(())
}

fn print_help() {
    eprintln!(
        r#"
cargo xtask <COMMAND>

Commands:
  verify    Tests, clippy (native + wasm32), wasm-pack build
  test      Run all Rust tests
  wasm      Build pkg/ with wasm-pack (--target web)
  wasm-test Run runtime::wasm tests in headless Firefox (wasm-pack test)
  check     Quick check (cargo test + clippy, native only)
"#
    );
}

fn verify() -> Result<()> {
    println!("==========================================");
    println!("sitesearch verification");
    println!("==========================================\n");

    println!("[1/4] Running Rust tests...");
    run_cargo(&["test", "--quiet"])?;
    println!("✓ Tests passed\n");

    println!("[2/4] Running clippy (native)...");
    run_cargo(&["clippy", "--quiet", "--all-targets", "--", "-D", "warnings"])?;
    println!("✓ Clippy passed\n");

    println!("[3/4] Running clippy ({})...", WASM_TARGET);
    run_cargo(&[
        "clippy",
        "--quiet",
        "--lib",
        "--target",
        WASM_TARGET,
        "--no-default-features",
        "--features",
        "wasm",
        "--",
        "-D",
        "warnings",
    ])?;
    println!("✓ Clippy passed\n");

    println!("[4/4] Building wasm package...");
    wasm()?;
    println!("✓ pkg/ built\n");

    println!("==========================================");
    println!("✓ ALL CHECKS PASSED");
    println!("==========================================");
    Ok(())
}

fn test() -> Result<()> {
    run_cargo(&["test"])
}

fn wasm() -> Result<()> {
    let root = project_root()?;
    let status = Command::new("wasm-pack")
        .args([
            "build",
            "--target",
            "web",
            "--release",
            "--",
            "--no-default-features",
            "--features",
            "wasm",
        ])
        .current_dir(&root)
        .status()
        .context("Failed to run wasm-pack (is it installed?)")?;

    if !status.success() {
        bail!("wasm-pack build failed");
    }
    Ok(())
}

fn wasm_test() -> Result<()> {
    let root = project_root()?;
    let status = Command::new("wasm-pack")
        .args([
            "test",
            "--headless",
            "--firefox",
            "--lib",
            "--no-default-features",
            "--features",
            "wasm",
        ])
        .current_dir(&root)
        .status()
        .context("Failed to run wasm-pack (is it installed?)")?;

    if !status.success() {
        bail!("wasm-pack test failed");
    }
    Ok(())
}

fn check() -> Result<()> {
    println!("Running quick checks...\n");

    println!("[1/3] cargo check...");
    run_cargo(&["check"])?;

    println!("[2/3] cargo test...");
    run_cargo(&["test", "--quiet"])?;

    println!("[3/3] cargo clippy...");
    run_cargo(&["clippy", "--quiet", "--", "-D", "warnings"])?;

    println!("\n✓ Quick checks passed");
    Ok(())
}

// ============================================================================
// Helper functions
// ============================================================================

fn project_root() -> Result<PathBuf> {
    let manifest_dir = match env::var("CARGO_MANIFEST_DIR") {
        Ok(dir) => PathBuf::from(dir),
        Err(_) => env::current_dir().context("Failed to read current directory")?,
    };

    // xtask is in project_root/xtask, so go up one level
    let root = manifest_dir.parent().unwrap_or(&manifest_dir);
    Ok(root.to_path_buf())
}

fn run_cargo(args: &[&str]) -> Result<()> {
    let root = project_root()?;

    let status = Command::new("cargo")
        .args(args)
        .current_dir(&root)
        .status()
        .with_context(|| format!("Failed to run cargo {:?}", args))?;

    if !status.success() {
        bail!("cargo {:?} failed", args);
    }

    Ok(())
}
