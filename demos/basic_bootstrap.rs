//! Basic runtime validation example.
//!
//! This example demonstrates the core workflow for validating a license
//! and auto-applying injectables, and how to handle common error cases.
//!
//! # Running
//!
//! ```bash
//! export DEVPAYR_LICENSE="your-license-key"
//! cargo run --example basic_bootstrap
//! ```

use devpayr::{Config, DevpayrError, RuntimeValidator};
use std::path::PathBuf;

fn main() {
    // License key from the user (environment, config file, activation UI)
    let license =
        std::env::var("DEVPAYR_LICENSE").expect("Set DEVPAYR_LICENSE environment variable");

    let config = Config {
        license: Some(license),
        // Apply injectables automatically after a successful check
        handle_injectables: true,
        // Where injectables land; defaults to the system temp dir
        injectables_path: Some(PathBuf::from("./resources")),
        // Skip the network call when today's check already succeeded
        recheck: false,
        ..Config::default()
    };

    let validator = match RuntimeValidator::new(config) {
        Ok(v) => v,
        Err(e) => {
            eprintln!("Configuration error: {e}");
            std::process::exit(1);
        }
    };

    // This performs:
    // 1. Same-day cache check (no network call on a hit)
    // 2. HTTPS payment check against the DevPayr API
    // 3. Signature verification + decryption of each injectable
    // 4. Merge-and-write under the configured base path
    match validator.validate() {
        Ok(outcome) => {
            if outcome.from_cache {
                println!("✓ License valid (cached)");
            } else {
                println!("✓ License valid");
                for path in &outcome.written {
                    println!("  applied: {}", path.display());
                }
            }
        }
        Err(e) => {
            // Map typed errors to whatever failure behavior fits the app:
            // log, redirect, inline message. The core never decides this.
            match &e {
                DevpayrError::Unpaid => {
                    eprintln!("This copy is not licensed for production use.");
                }
                DevpayrError::SignatureError { slug } => {
                    // Security: the payload may have been tampered with
                    eprintln!("SECURITY: integrity check failed for '{slug}'");
                }
                DevpayrError::Transport(_) => {
                    eprintln!("Network error reaching the licensing service");
                }
                _ => {
                    eprintln!("Validation error: {e}");
                }
            }
            std::process::exit(1);
        }
    }
}
