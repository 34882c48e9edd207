//! Runtime validator - the main public API.
//!
//! Drives the validation round: consult the day-granularity cache, call
//! the remote payment check on a miss, cache the success, and dispatch
//! injectables through the active processor. Every failure is a typed
//! error; the validator never prints, redirects, or exits.

use crate::cache::validation::ValidationCache;
use crate::clock::{Clock, SystemClock};
use crate::config::Config;
use crate::inject::engine::InjectionEngine;
use crate::inject::registry::{InjectableProcessor, ProcessOptions, ProcessorRegistry};
use crate::protocol::models::PaymentCheckResponse;
use crate::services::payment::{PaymentCheck, PaymentService};
use crate::DevpayrError;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::debug;

/// Result of a validation round.
#[derive(Debug)]
pub struct ValidationOutcome {
    /// Whether this round was satisfied from the same-day cache.
    pub from_cache: bool,

    /// The remote response, when a network round trip happened.
    pub response: Option<PaymentCheckResponse>,

    /// Paths written by injectable processing this round.
    pub written: Vec<PathBuf>,
}

/// Runtime license validator.
///
/// Create one per validation pipeline. The injectable processor override
/// is bound per-validator, so concurrent pipelines can carry different
/// processors without shared state.
pub struct RuntimeValidator {
    config: Config,
    clock: Arc<dyn Clock>,
    payment: Box<dyn PaymentCheck>,
    registry: ProcessorRegistry,
    cache: ValidationCache,
}

impl RuntimeValidator {
    /// Create a validator with the given configuration.
    ///
    /// Uses the system clock and the HTTP payment service.
    ///
    /// # Errors
    /// Returns an error if configuration validation or HTTP client
    /// creation fails.
    pub fn new(mut config: Config) -> Result<Self, DevpayrError> {
        config.validate()?;
        let payment = Box::new(PaymentService::new(&config)?);
        Ok(Self::assemble(
            config,
            Arc::new(SystemClock),
            payment,
            ValidationCache::new(),
        ))
    }

    /// Create a validator with explicit collaborators (for testing).
    #[cfg(any(test, feature = "test-seams"))]
    pub fn with_parts(
        mut config: Config,
        clock: Arc<dyn Clock>,
        payment: Box<dyn PaymentCheck>,
        cache: ValidationCache,
    ) -> Result<Self, DevpayrError> {
        config.validate()?;
        Ok(Self::assemble(config, clock, payment, cache))
    }

    fn assemble(
        config: Config,
        clock: Arc<dyn Clock>,
        payment: Box<dyn PaymentCheck>,
        cache: ValidationCache,
    ) -> Self {
        let registry = ProcessorRegistry::new(InjectionEngine::new(config.injectables_strict));
        Self {
            config,
            clock,
            payment,
            registry,
            cache,
        }
    }

    /// Bind a custom injectable processor for this validator.
    ///
    /// Set-once per validator; call [`reset_processor`](Self::reset_processor)
    /// first to rebind.
    pub fn set_processor(
        &mut self,
        processor: Arc<dyn InjectableProcessor>,
    ) -> Result<(), DevpayrError> {
        self.registry.set_processor(processor)
    }

    /// Drop any custom processor, restoring the default engine.
    pub fn reset_processor(&mut self) {
        self.registry.reset();
    }

    /// Perform license validation and optionally auto-process
    /// injectables.
    ///
    /// 1. With rechecking disabled, a same-day cache entry short-circuits
    ///    to success without any network call.
    /// 2. Otherwise the remote payment check runs; anything but a "paid"
    ///    response — including transport and parse failures — is an
    ///    error, never silently treated as success.
    /// 3. On success, today's date is cached, then injectables are
    ///    dispatched in list order when `injectables` and
    ///    `handle_injectables` are both enabled, stopping at the first
    ///    processing error.
    ///
    /// # Errors
    /// - `MissingLicense` - no license key configured
    /// - `Unpaid` - remote reports the project unpaid/unauthorized
    /// - `Transport`/`ApiResponse`/`Protocol` - the remote check failed
    /// - `SignatureError`/`DecodeError`/`DecryptionError`/`Io`/
    ///   `PathTraversal`/`InvalidInjectable` - injectable processing
    ///   failed
    pub fn validate(&self) -> Result<ValidationOutcome, DevpayrError> {
        let license = self
            .config
            .license
            .as_deref()
            .filter(|l| !l.is_empty())
            .ok_or(DevpayrError::MissingLicense)?;

        if !self.config.recheck && self.cache.is_fresh(license, self.clock.as_ref()) {
            debug!("license validated from same-day cache");
            return Ok(ValidationOutcome {
                from_cache: true,
                response: None,
                written: Vec::new(),
            });
        }

        let response = self.payment.check_project()?;
        if !response.has_paid() {
            return Err(DevpayrError::Unpaid);
        }

        // Cache before dispatch: the payment fact holds even if an
        // injectable later fails.
        self.cache.store(license, self.clock.as_ref())?;

        let mut written = Vec::new();
        if self.config.injectables
            && self.config.handle_injectables
            && !response.injectables().is_empty()
        {
            let options = ProcessOptions {
                secret: license.to_string(),
                base_path: self
                    .config
                    .injectables_path
                    .clone()
                    .unwrap_or_else(std::env::temp_dir),
                verify: self.config.injectables_verify,
            };
            written = self.registry.process(response.injectables(), &options)?;
        }

        Ok(ValidationOutcome {
            from_cache: false,
            response: Some(response),
            written,
        })
    }

    /// Get the current configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }
}
