//! # DevPayr
//!
//! **Runtime license validation and secure injectable delivery for Rust.**
//!
//! DevPayr validates that a project is licensed via the `has-paid` API
//! and, on success, delivers **injectables**: encrypted payloads that are
//! integrity-checked, decrypted with the license secret, and applied to
//! the local filesystem under well-defined merge policies — without ever
//! trusting the remote payload's path or content blindly.
//!
//! ## Features
//!
//! - **AES-256-CBC payload encryption** — keys derived from the license
//!   via SHA-256, never used raw
//! - **HMAC-SHA256 integrity signatures** — constant-time verification
//!   over the exact transmitted ciphertext
//! - **Safe filesystem delivery** — targets resolved strictly under the
//!   base path, traversal escapes rejected, atomic writes
//! - **Day-granularity validation cache** — one network call per day per
//!   license when rechecking is disabled, and a failure is never cached
//!   as success
//! - **Pluggable processing** — substitute your own
//!   [`InjectableProcessor`] per pipeline; no process-global state
//!
//! ## Quickstart
//!
//! ```no_run
//! use devpayr::{Config, RuntimeValidator};
//!
//! fn main() -> Result<(), devpayr::DevpayrError> {
//!     let config = Config {
//!         license: Some("your-license-key".to_string()),
//!         handle_injectables: true,
//!         ..Config::default()
//!     };
//!
//!     let validator = RuntimeValidator::new(config)?;
//!     let outcome = validator.validate()?;
//!
//!     if outcome.from_cache {
//!         println!("License validated from cache");
//!     } else {
//!         println!("License validated, {} injectable(s) applied", outcome.written.len());
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Trust model
//!
//! The license key is the secret: it decrypts injectables and keys their
//! signatures. The crate protects against:
//! - **Tampered payloads** — signature mismatches abort before any write
//! - **Malicious target paths** — a payload cannot write outside the
//!   configured base directory
//! - **Spoofed success** — anything but an affirmative paid response,
//!   including timeouts, fails closed
//!
//! Signature verification is advisory by configuration: it runs only when
//! a payload carries a signature *and* `injectables_verify` is enabled.
//! Disabling either is an explicit trust reduction the caller opts into.
//!
//! The core never prints, redirects, or exits — it only returns typed
//! results for the embedding application to interpret.

#![deny(warnings)]
#![deny(missing_docs)]
#![doc(html_root_url = "https://docs.rs/devpayr/0.1.0")]

// Core modules
pub mod clock;
pub mod config;
pub mod errors;

// Crypto layer
pub mod crypto;

// Protocol layer
pub mod protocol;

// Client layer
pub mod client;

// Service layer
pub mod services;

// Injectable delivery layer
pub mod inject;

// Cache layer
pub mod cache;

// Validator (main public API)
pub mod validator;

// Re-exports for public API
pub use cache::validation::ValidationCache;
pub use clock::{Clock, SystemClock};
pub use config::Config;
pub use errors::DevpayrError;
pub use inject::engine::InjectionEngine;
pub use inject::registry::{InjectableProcessor, ProcessOptions, ProcessorRegistry};
pub use protocol::models::{InjectMode, Injectable, PaymentCheckResponse};
pub use services::payment::{PaymentCheck, PaymentService};
pub use validator::{RuntimeValidator, ValidationOutcome};

#[cfg(any(test, feature = "test-seams"))]
pub use clock::MockClock;
